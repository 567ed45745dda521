use crate::{Condition, TableRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    ASC,
    DESC,
}

/// Column of an `ORDER BY` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordered {
    pub field: String,
    pub order: Order,
}

impl Ordered {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: Order::ASC,
        }
    }
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: Order::DESC,
        }
    }
}

/// Everything a `SELECT` statement is made of.
///
/// ```rust
/// use sluice_core::{Condition, GenericSqlWriter, Ordered, Select, SqlWriter, TableRef};
/// let table = TableRef::new("users");
/// let condition = Condition::new().eq("active", true);
/// let order = [Ordered::desc("created_at")];
/// let query = GenericSqlWriter::new()
///     .render_select(
///         &Select::new(&table)
///             .fields(&["id", "name"])
///             .condition(&condition)
///             .order_by(&order)
///             .limit(10),
///     )
///     .unwrap();
/// assert_eq!(
///     query.sql,
///     r#"SELECT "id", "name" FROM "users" WHERE "active" = ? ORDER BY "created_at" DESC LIMIT ?"#
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Select<'a> {
    pub table: &'a TableRef,
    /// Projected fields, identifiers are quoted while expressions like `COUNT(*)` are kept.
    pub fields: &'a [&'a str],
    pub condition: Option<&'a Condition>,
    pub order_by: &'a [Ordered],
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub distinct: bool,
}

impl<'a> Select<'a> {
    pub fn new(table: &'a TableRef) -> Self {
        Self {
            table,
            fields: &["*"],
            condition: None,
            order_by: &[],
            limit: None,
            offset: None,
            distinct: false,
        }
    }
    pub fn fields(mut self, fields: &'a [&'a str]) -> Self {
        self.fields = fields;
        self
    }
    pub fn condition(mut self, condition: &'a Condition) -> Self {
        self.condition = Some(condition);
        self
    }
    pub fn order_by(mut self, order_by: &'a [Ordered]) -> Self {
        self.order_by = order_by;
        self
    }
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }
}
