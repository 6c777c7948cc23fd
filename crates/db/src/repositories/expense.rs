//! Expense repository for expense database operations.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use crate::entities::{consumptions, expenses};
use trickle_core::accrual::sum_consumed;

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Expense not found.
    #[error("Expense not found: {0}")]
    NotFound(i64),

    /// Accrual interval must be at least one day.
    #[error("Accrual interval must be at least one day")]
    InvalidInterval,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or fully replacing an expense.
#[derive(Debug, Clone)]
pub struct ExpenseInput {
    /// Display label.
    pub name: String,
    /// Days per accrual period.
    pub interval_days: i32,
    /// Value accrued per full interval.
    pub amount: Decimal,
    /// Timestamp from which accrual begins.
    pub start_date: chrono::DateTime<Utc>,
    /// Stored flag, inert in all arithmetic.
    pub rollover: bool,
}

/// Expense repository for CRUD operations and consumption aggregation.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new expense and returns the row with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInterval` if the interval is zero or negative, or an
    /// error if the database operation fails.
    pub async fn create(&self, input: ExpenseInput) -> Result<expenses::Model, ExpenseError> {
        validate_interval(input.interval_days)?;

        let now = Utc::now().into();
        let expense = expenses::ActiveModel {
            name: Set(input.name),
            interval_days: Set(input.interval_days),
            amount: Set(input.amount),
            start_date: Set(input.start_date.into()),
            rollover: Set(input.rollover),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(expense.insert(&self.db).await?)
    }

    /// Lists all expenses ordered by id.
    pub async fn list(&self) -> Result<Vec<expenses::Model>, ExpenseError> {
        Ok(expenses::Entity::find()
            .order_by_asc(expenses::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Finds an expense by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no expense with that id exists.
    pub async fn find_by_id(&self, id: i64) -> Result<expenses::Model, ExpenseError> {
        expenses::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NotFound(id))
    }

    /// Fully replaces the mutable fields of an existing expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `InvalidInterval` for a
    /// zero or negative interval.
    pub async fn update(
        &self,
        id: i64,
        input: ExpenseInput,
    ) -> Result<expenses::Model, ExpenseError> {
        validate_interval(input.interval_days)?;

        let existing = self.find_by_id(id).await?;

        let mut active: expenses::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.interval_days = Set(input.interval_days);
        active.amount = Set(input.amount);
        active.start_date = Set(input.start_date.into());
        active.rollover = Set(input.rollover);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an expense together with all its consumptions.
    ///
    /// Both deletes run in a single transaction, so there is no window
    /// where the consumptions are gone but the expense remains (or vice
    /// versa).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no expense with that id exists.
    pub async fn delete(&self, id: i64) -> Result<(), ExpenseError> {
        let txn = self.db.begin().await?;

        let expense = expenses::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ExpenseError::NotFound(id))?;

        consumptions::Entity::delete_many()
            .filter(consumptions::Column::ExpenseId.eq(expense.id))
            .exec(&txn)
            .await?;

        expenses::Entity::delete_by_id(expense.id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Sums all consumption amounts recorded against an expense.
    ///
    /// Re-queries the store on every call; the total always reflects
    /// current state, never a cached snapshot.
    pub async fn consumed_total(&self, expense_id: i64) -> Result<Decimal, ExpenseError> {
        let rows = consumptions::Entity::find()
            .filter(consumptions::Column::ExpenseId.eq(expense_id))
            .all(&self.db)
            .await?;

        Ok(sum_consumed(rows.into_iter().map(|row| row.amount)))
    }
}

const fn validate_interval(interval_days: i32) -> Result<(), ExpenseError> {
    if interval_days <= 0 {
        return Err(ExpenseError::InvalidInterval);
    }
    Ok(())
}
