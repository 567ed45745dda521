use crate::MySQLSqlWriter;
use sluice_core::{DialectRegistry, Driver};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct MySQLDriver;
impl MySQLDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for MySQLDriver {
    type SqlWriter = MySQLSqlWriter;

    const NAME: &'static str = "mysql";
    fn sql_writer(&self) -> Self::SqlWriter {
        MySQLSqlWriter::default()
    }
}

/// Make the dialect available as `mysql` and `mariadb`.
pub fn register(registry: &mut DialectRegistry) -> &mut DialectRegistry {
    let writer = Arc::new(MySQLSqlWriter::default());
    registry
        .register(MySQLDriver::NAME, writer.clone())
        .register("mariadb", writer)
}
