use crate::{AsValue, ErrorContext, Result, Value};

/// Static description of one record field, generated by `#[derive(Record)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Column name.
    pub name: &'static str,
    /// Rust field identifier.
    pub ident: &'static str,
    /// The column name was declared explicitly, the identifier is not matched against columns.
    pub renamed: bool,
    /// Type prototype, a payload-less variant of the field kind.
    pub value: Value,
    pub nullable: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
    /// Column filled by the database when the record holds the zero value.
    pub default_on_insert: bool,
}

impl FieldDef {
    /// Value of the field when the database provides nothing: `None` for nullable fields, the
    /// zero of the kind otherwise.
    pub fn zero_value(&self) -> Value {
        if self.nullable {
            self.value.as_null()
        } else {
            self.value.zero()
        }
    }

    /// Whether the column is left to the database on insert for this value.
    pub fn omitted_on_insert(&self, value: &Value) -> bool {
        (self.auto_increment || self.default_on_insert) && value.is_zero()
    }
}

/// Converts the materialized value of `field` into its Rust type, a missing or null value
/// decodes as the zero of the field.
pub fn decode_field<T: AsValue>(field: &FieldDef, value: Option<Value>) -> Result<T> {
    let value = match value {
        Some(v) if !v.is_null() => v,
        _ => field.zero_value(),
    };
    T::try_from_value(value).with_context(|| {
        format!(
            "While decoding the field `{}` (column `{}`)",
            field.ident, field.name
        )
    })
}
