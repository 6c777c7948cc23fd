//! Consumption repository for withdrawal events against expenses.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{consumptions, expenses};

/// Error types for consumption operations.
#[derive(Debug, thiserror::Error)]
pub enum ConsumptionError {
    /// Consumption not found.
    #[error("Consumption not found: {0}")]
    NotFound(i64),

    /// Owning expense not found.
    #[error("Expense not found: {0}")]
    ExpenseNotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository for consumption CRUD operations.
#[derive(Debug, Clone)]
pub struct ConsumptionRepository {
    db: DatabaseConnection,
}

impl ConsumptionRepository {
    /// Creates a new consumption repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all consumptions recorded against an expense, oldest first.
    pub async fn list_for_expense(
        &self,
        expense_id: i64,
    ) -> Result<Vec<consumptions::Model>, ConsumptionError> {
        Ok(consumptions::Entity::find()
            .filter(consumptions::Column::ExpenseId.eq(expense_id))
            .order_by_asc(consumptions::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Records a consumption against an expense.
    ///
    /// The amount carries no sign constraint; negative values are accepted.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseNotFound` if `expense_id` does not refer to an
    /// existing expense.
    pub async fn create(
        &self,
        expense_id: i64,
        amount: Decimal,
    ) -> Result<consumptions::Model, ConsumptionError> {
        expenses::Entity::find_by_id(expense_id)
            .one(&self.db)
            .await?
            .ok_or(ConsumptionError::ExpenseNotFound(expense_id))?;

        let consumption = consumptions::ActiveModel {
            expense_id: Set(expense_id),
            amount: Set(amount),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        Ok(consumption.insert(&self.db).await?)
    }

    /// Deletes a consumption by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no consumption with that id exists.
    pub async fn delete(&self, id: i64) -> Result<(), ConsumptionError> {
        let result = consumptions::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(ConsumptionError::NotFound(id));
        }
        Ok(())
    }
}
