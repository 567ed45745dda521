use crate::SQLiteSqlWriter;
use sluice_core::{DialectRegistry, Driver};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct SQLiteDriver;
impl SQLiteDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for SQLiteDriver {
    type SqlWriter = SQLiteSqlWriter;

    const NAME: &'static str = "sqlite";
    fn sql_writer(&self) -> Self::SqlWriter {
        SQLiteSqlWriter::default()
    }
}

/// Make the dialect available as `sqlite` and `sqlite3`.
pub fn register(registry: &mut DialectRegistry) -> &mut DialectRegistry {
    let writer = Arc::new(SQLiteSqlWriter::default());
    registry
        .register(SQLiteDriver::NAME, writer.clone())
        .register("sqlite3", writer)
}
