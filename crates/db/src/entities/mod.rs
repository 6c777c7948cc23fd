//! `SeaORM` entity definitions.

pub mod consumptions;
pub mod expenses;
