use crate::PostgresSqlWriter;
use sluice_core::{DialectRegistry, Driver};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDriver;
impl PostgresDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for PostgresDriver {
    type SqlWriter = PostgresSqlWriter;

    const NAME: &'static str = "postgres";
    fn sql_writer(&self) -> Self::SqlWriter {
        PostgresSqlWriter::default()
    }
}

/// Make the dialect available as `postgres` and `postgresql`, the two URL schemes libpq accepts.
pub fn register(registry: &mut DialectRegistry) -> &mut DialectRegistry {
    let writer = Arc::new(PostgresSqlWriter::default());
    registry
        .register(PostgresDriver::NAME, writer.clone())
        .register("postgresql", writer)
}
