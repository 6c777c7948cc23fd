//! Initial migration for the expense tracker schema.
//!
//! Creates the expenses and consumptions tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS consumptions CASCADE; DROP TABLE IF EXISTS expenses CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Recurring budget lines accruing value by the hour
CREATE TABLE expenses (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    interval_days INTEGER NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    start_date TIMESTAMPTZ NOT NULL,
    rollover BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- The hourly rate divides by interval_days * 24
    CONSTRAINT chk_expenses_interval_positive CHECK (interval_days > 0)
);

-- Withdrawal events against one expense
CREATE TABLE consumptions (
    id BIGSERIAL PRIMARY KEY,
    expense_id BIGINT NOT NULL REFERENCES expenses(id) ON DELETE CASCADE,
    amount NUMERIC(19, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Index for the per-expense aggregation (most common query)
CREATE INDEX idx_consumptions_expense ON consumptions(expense_id);
";
