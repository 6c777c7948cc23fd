//! Expense routes.
//!
//! Write paths accept form-encoded fields (`name`, `interval`, `amount`,
//! `start_date`, `rollover`); read paths answer with the projection
//! computed fresh from the store at request time.

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{error, info};

use crate::AppState;
use crate::routes::{error_response, internal_error};
use trickle_core::accrual::{ExpenseProjection, project};
use trickle_db::entities::expenses;
use trickle_db::repositories::{ExpenseError, ExpenseInput, ExpenseRepository};
use trickle_shared::AppError;

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/{id}", put(update_expense).delete(delete_expense))
}

// ============================================================================
// Request Types
// ============================================================================

/// Form body for creating or replacing an expense.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    /// Display label.
    pub name: String,
    /// Days per accrual period.
    pub interval: i32,
    /// Value accrued per full interval.
    pub amount: Decimal,
    /// RFC3339 timestamp from which accrual begins.
    pub start_date: DateTime<Utc>,
    /// `"true"` sets the flag; any other value clears it.
    pub rollover: String,
}

impl ExpenseForm {
    fn into_input(self) -> ExpenseInput {
        ExpenseInput {
            name: self.name,
            interval_days: self.interval,
            amount: self.amount,
            start_date: self.start_date,
            rollover: self.rollover == "true",
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Builds the output projection for a stored expense, aggregating its
/// consumptions fresh from the store.
async fn project_expense(
    repo: &ExpenseRepository,
    expense: expenses::Model,
) -> Result<ExpenseProjection, axum::response::Response> {
    let consumed = match repo.consumed_total(expense.id).await {
        Ok(total) => total,
        Err(e) => {
            error!(error = %e, expense_id = expense.id, "Failed to aggregate consumptions");
            return Err(internal_error());
        }
    };

    // The CHECK constraint keeps stored intervals positive; a failure here
    // means the row was written outside the validated paths.
    let Ok(interval_days) = u32::try_from(expense.interval_days) else {
        error!(expense_id = expense.id, "Stored interval out of range");
        return Err(internal_error());
    };

    match project(
        expense.id,
        expense.name,
        interval_days,
        expense.amount,
        expense.start_date.with_timezone(&Utc),
        expense.rollover,
        consumed,
        Utc::now(),
    ) {
        Ok(projection) => Ok(projection),
        Err(e) => {
            error!(error = %e, expense_id = expense.id, "Stored expense failed projection");
            Err(internal_error())
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/expenses` - List all expenses with their derived accrual fields.
async fn list_expenses(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());

    let expenses = match repo.list().await {
        Ok(expenses) => expenses,
        Err(e) => {
            error!(error = %e, "Failed to list expenses");
            return internal_error();
        }
    };

    let mut projections = Vec::with_capacity(expenses.len());
    for expense in expenses {
        match project_expense(&repo, expense).await {
            Ok(projection) => projections.push(projection),
            Err(response) => return response,
        }
    }

    (StatusCode::OK, Json(projections)).into_response()
}

/// POST `/expenses` - Create a new expense.
async fn create_expense(
    State(state): State<AppState>,
    Form(payload): Form<ExpenseForm>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());

    match repo.create(payload.into_input()).await {
        Ok(expense) => {
            info!(expense_id = expense.id, name = %expense.name, "Expense created");
            match project_expense(&repo, expense).await {
                Ok(projection) => (StatusCode::CREATED, Json(projection)).into_response(),
                Err(response) => response,
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to create expense");
            map_expense_error(&e)
        }
    }
}

/// PUT `/expenses/{id}` - Fully replace an existing expense.
///
/// Answers 201 on success, same as the create path.
async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(payload): Form<ExpenseForm>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());

    match repo.update(id, payload.into_input()).await {
        Ok(expense) => {
            info!(expense_id = id, "Expense updated");
            match project_expense(&repo, expense).await {
                Ok(projection) => (StatusCode::CREATED, Json(projection)).into_response(),
                Err(response) => response,
            }
        }
        Err(e) => {
            error!(error = %e, expense_id = id, "Failed to update expense");
            map_expense_error(&e)
        }
    }
}

/// DELETE `/expenses/{id}` - Delete an expense and all its consumptions.
async fn delete_expense(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(expense_id = id, "Expense deleted");
            StatusCode::OK.into_response()
        }
        Err(e) => {
            error!(error = %e, expense_id = id, "Failed to delete expense");
            map_expense_error(&e)
        }
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps expense errors to HTTP responses via the shared taxonomy.
fn map_expense_error(e: &ExpenseError) -> axum::response::Response {
    let app_error = match e {
        ExpenseError::NotFound(id) => AppError::NotFound(format!("Expense not found: {id}")),
        ExpenseError::InvalidInterval => {
            AppError::Validation("Accrual interval must be at least one day".to_string())
        }
        ExpenseError::Database(db_err) => AppError::Database(db_err.to_string()),
    };
    error_response(&app_error)
}
