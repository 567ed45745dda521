use sluice_core::{Context, Operator, Result, SqlWriter, generic_operator_token, try_separated_by};

/// Largest row count MySQL accepts, it stands for "no limit" before an `OFFSET`.
const UNBOUNDED_LIMIT: &str = "18446744073709551615";

#[derive(Debug, Default, Clone, Copy)]
pub struct MySQLSqlWriter {}

impl SqlWriter for MySQLSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn name(&self) -> &'static str {
        "mysql"
    }

    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('`');
        self.write_escaped(context, out, value, '`', "``");
        out.push('`');
    }

    fn operator_token(&self, operator: Operator) -> Option<&'static str> {
        match operator {
            Operator::Regexp => Some(" REGEXP "),
            _ => generic_operator_token(operator),
        }
    }

    fn write_unbounded_limit(&self, _context: &mut Context, out: &mut String) {
        out.push_str(" LIMIT ");
        out.push_str(UNBOUNDED_LIMIT);
    }

    /// The generated key comes back through the executor last insert id.
    fn returns_generated_key(&self) -> bool {
        false
    }

    fn write_upsert_fragment(
        &self,
        context: &mut Context,
        out: &mut String,
        primary_key: &[&str],
        columns: &[&str],
    ) -> Result<()> {
        out.push_str(" ON DUPLICATE KEY UPDATE ");
        if columns.is_empty() {
            // Nothing to overwrite, a self assignment turns the conflict into a no-op
            if let Some(key) = primary_key.first() {
                self.write_field(context, out, key)?;
                out.push_str(" = ");
                self.write_field(context, out, key)?;
            }
            return Ok(());
        }
        try_separated_by(
            out,
            columns,
            |out, v| {
                self.write_field(context, out, v)?;
                out.push_str(" = VALUES(");
                self.write_field(context, out, v)?;
                out.push(')');
                Ok(())
            },
            ", ",
        )
    }
}
