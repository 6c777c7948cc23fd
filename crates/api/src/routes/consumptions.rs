//! Consumption routes, nested under their owning expense.

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::AppState;
use crate::routes::{error_response, internal_error};
use trickle_db::repositories::{ConsumptionError, ConsumptionRepository};
use trickle_shared::AppError;

/// Creates the consumption routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/expenses/{expense_id}/consumptions",
            get(list_consumptions).post(create_consumption),
        )
        .route(
            "/expenses/{expense_id}/consumptions/{id}",
            delete(delete_consumption),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Form body for recording a consumption.
#[derive(Debug, Deserialize)]
pub struct ConsumptionForm {
    /// Amount withdrawn. No sign constraint.
    pub amount: Decimal,
}

/// Output shape for a consumption in list responses.
#[derive(Debug, Serialize)]
pub struct ConsumptionListItem {
    /// Store-assigned identifier.
    pub id: i64,
    /// Effective time of the consumption.
    pub created_at: DateTime<FixedOffset>,
    /// Amount withdrawn.
    pub amount: Decimal,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/expenses/{expense_id}/consumptions` - List consumptions of an expense.
async fn list_consumptions(
    State(state): State<AppState>,
    Path(expense_id): Path<i64>,
) -> impl IntoResponse {
    let repo = ConsumptionRepository::new((*state.db).clone());

    match repo.list_for_expense(expense_id).await {
        Ok(consumptions) => {
            let items: Vec<ConsumptionListItem> = consumptions
                .into_iter()
                .map(|c| ConsumptionListItem {
                    id: c.id,
                    created_at: c.created_at,
                    amount: c.amount,
                })
                .collect();

            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, expense_id, "Failed to list consumptions");
            internal_error()
        }
    }
}

/// POST `/expenses/{expense_id}/consumptions` - Record a consumption.
async fn create_consumption(
    State(state): State<AppState>,
    Path(expense_id): Path<i64>,
    Form(payload): Form<ConsumptionForm>,
) -> impl IntoResponse {
    let repo = ConsumptionRepository::new((*state.db).clone());

    match repo.create(expense_id, payload.amount).await {
        Ok(consumption) => {
            info!(
                consumption_id = consumption.id,
                expense_id, "Consumption recorded"
            );
            (StatusCode::CREATED, Json(consumption)).into_response()
        }
        Err(e) => {
            error!(error = %e, expense_id, "Failed to record consumption");
            map_consumption_error(&e)
        }
    }
}

/// DELETE `/expenses/{expense_id}/consumptions/{id}` - Delete a consumption.
async fn delete_consumption(
    State(state): State<AppState>,
    Path((expense_id, id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    let repo = ConsumptionRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(consumption_id = id, expense_id, "Consumption deleted");
            StatusCode::OK.into_response()
        }
        Err(e) => {
            error!(error = %e, consumption_id = id, "Failed to delete consumption");
            map_consumption_error(&e)
        }
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps consumption errors to HTTP responses via the shared taxonomy.
fn map_consumption_error(e: &ConsumptionError) -> axum::response::Response {
    let app_error = match e {
        ConsumptionError::NotFound(id) => {
            AppError::NotFound(format!("Consumption not found: {id}"))
        }
        ConsumptionError::ExpenseNotFound(id) => {
            AppError::NotFound(format!("Expense not found: {id}"))
        }
        ConsumptionError::Database(db_err) => AppError::Database(db_err.to_string()),
    };
    error_response(&app_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_form_parses_amount() {
        let form: ConsumptionForm = serde_urlencoded::from_str("amount=42.50").unwrap();
        assert_eq!(form.amount, dec!(42.50));

        // Negative amounts are not rejected anywhere in the system.
        let negative: ConsumptionForm = serde_urlencoded::from_str("amount=-4").unwrap();
        assert_eq!(negative.amount, dec!(-4));
    }

    #[test]
    fn test_form_rejects_non_numeric_amount() {
        assert!(serde_urlencoded::from_str::<ConsumptionForm>("amount=lots").is_err());
        assert!(serde_urlencoded::from_str::<ConsumptionForm>("").is_err());
    }

    #[test]
    fn test_list_item_serializes_expected_keys() {
        let item = ConsumptionListItem {
            id: 3,
            created_at: "2026-08-29T12:00:00Z".parse().unwrap(),
            amount: dec!(10),
        };
        let value = serde_json::to_value(&item).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        for key in ["id", "created_at", "amount"] {
            assert!(object.contains_key(key), "missing key {key}");
        }
    }
}
