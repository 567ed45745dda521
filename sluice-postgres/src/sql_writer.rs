use sluice_core::{Context, Operator, SqlWriter, generic_operator_token};

#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresSqlWriter {}

impl SqlWriter for PostgresSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn name(&self) -> &'static str {
        "postgres"
    }

    /// Numbered placeholder, the counter keeps running across the whole statement.
    fn write_placeholder(&self, context: &mut Context, out: &mut String) {
        let mut buffer = itoa::Buffer::new();
        out.push('$');
        out.push_str(buffer.format(context.counter));
    }

    fn operator_token(&self, operator: Operator) -> Option<&'static str> {
        match operator {
            Operator::ILike => Some(" ILIKE "),
            Operator::Regexp => Some(" ~ "),
            _ => generic_operator_token(operator),
        }
    }
}
