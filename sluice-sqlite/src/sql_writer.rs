use sluice_core::{Context, SqlWriter};

#[derive(Debug, Default, Clone, Copy)]
pub struct SQLiteSqlWriter {}

impl SqlWriter for SQLiteSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }

    /// A negative limit means no limit at all.
    fn write_unbounded_limit(&self, _context: &mut Context, out: &mut String) {
        out.push_str(" LIMIT -1");
    }
}
