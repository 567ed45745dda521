use crate::{
    Arity, Error, Linkage, Operator, Predicate, PredicateKind, Result, Value, count_placeholders,
    truncate_long,
};

/// Boolean predicate tree used as the `WHERE` clause of the rendered statements.
///
/// Every combinator consumes the tree and returns it extended, so filters read as a chain:
/// ```rust
/// use sluice_core::Condition;
/// let filter = Condition::new()
///     .eq("status", "active")
///     .ge("age", 18)
///     .or(Condition::new().is_null("deleted_at").or_eq("role", "admin"))
///     .like_if(false, "name", "ann");
/// assert_eq!(filter.payload(), 3);
/// ```
/// The `*_if` variants append a disabled node when their guard is false, the node is kept in
/// the tree but never rendered.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Condition {
    predicates: Vec<Predicate>,
}

macro_rules! scalar_combinators {
    ($($operator:ident => $and:ident, $or:ident, $and_if:ident, $or_if:ident;)+) => {
        $(
            #[doc = concat!("AND a `", stringify!($operator), "` comparison between `field` and `value`.")]
            pub fn $and(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
                self.leaf(Linkage::And, true, field, Operator::$operator, vec![value.into()])
            }
            #[doc = concat!("OR a `", stringify!($operator), "` comparison between `field` and `value`.")]
            pub fn $or(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
                self.leaf(Linkage::Or, true, field, Operator::$operator, vec![value.into()])
            }
            pub fn $and_if(self, enabled: bool, field: impl Into<String>, value: impl Into<Value>) -> Self {
                self.leaf(Linkage::And, enabled, field, Operator::$operator, vec![value.into()])
            }
            pub fn $or_if(self, enabled: bool, field: impl Into<String>, value: impl Into<Value>) -> Self {
                self.leaf(Linkage::Or, enabled, field, Operator::$operator, vec![value.into()])
            }
        )+
    };
}

macro_rules! list_combinators {
    ($($operator:ident => $and:ident, $or:ident, $and_if:ident, $or_if:ident;)+) => {
        $(
            pub fn $and<V: Into<Value>>(self, field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
                self.leaf(Linkage::And, true, field, Operator::$operator, values.into_iter().map(Into::into).collect())
            }
            pub fn $or<V: Into<Value>>(self, field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
                self.leaf(Linkage::Or, true, field, Operator::$operator, values.into_iter().map(Into::into).collect())
            }
            pub fn $and_if<V: Into<Value>>(self, enabled: bool, field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
                self.leaf(Linkage::And, enabled, field, Operator::$operator, values.into_iter().map(Into::into).collect())
            }
            pub fn $or_if<V: Into<Value>>(self, enabled: bool, field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
                self.leaf(Linkage::Or, enabled, field, Operator::$operator, values.into_iter().map(Into::into).collect())
            }
        )+
    };
}

macro_rules! null_combinators {
    ($($operator:ident => $and:ident, $or:ident, $and_if:ident, $or_if:ident;)+) => {
        $(
            pub fn $and(self, field: impl Into<String>) -> Self {
                self.leaf(Linkage::And, true, field, Operator::$operator, Vec::new())
            }
            pub fn $or(self, field: impl Into<String>) -> Self {
                self.leaf(Linkage::Or, true, field, Operator::$operator, Vec::new())
            }
            pub fn $and_if(self, enabled: bool, field: impl Into<String>) -> Self {
                self.leaf(Linkage::And, enabled, field, Operator::$operator, Vec::new())
            }
            pub fn $or_if(self, enabled: bool, field: impl Into<String>) -> Self {
                self.leaf(Linkage::Or, enabled, field, Operator::$operator, Vec::new())
            }
        )+
    };
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Number of enabled children that render something.
    pub fn payload(&self) -> usize {
        self.predicates.iter().filter(|v| v.has_payload()).count()
    }

    /// True when the tree renders to nothing, meaning no `WHERE` clause.
    pub fn is_empty(&self) -> bool {
        self.payload() == 0
    }

    fn append(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    fn leaf(
        self,
        linkage: Linkage,
        enabled: bool,
        field: impl Into<String>,
        operator: Operator,
        operands: Vec<Value>,
    ) -> Self {
        self.append(Predicate::new(
            linkage,
            enabled,
            PredicateKind::Leaf {
                field: field.into(),
                operator,
                operands,
            },
        ))
    }

    scalar_combinators! {
        Eq => eq, or_eq, eq_if, or_eq_if;
        NotEq => not_eq, or_not_eq, not_eq_if, or_not_eq_if;
        Ge => ge, or_ge, ge_if, or_ge_if;
        Gt => gt, or_gt, gt_if, or_gt_if;
        Le => le, or_le, le_if, or_le_if;
        Lt => lt, or_lt, lt_if, or_lt_if;
        Like => like, or_like, like_if, or_like_if;
        LikePrefix => like_prefix, or_like_prefix, like_prefix_if, or_like_prefix_if;
        LikeSuffix => like_suffix, or_like_suffix, like_suffix_if, or_like_suffix_if;
        ILike => ilike, or_ilike, ilike_if, or_ilike_if;
        Regexp => regexp, or_regexp, regexp_if, or_regexp_if;
    }

    list_combinators! {
        In => in_list, or_in_list, in_list_if, or_in_list_if;
        NotIn => not_in_list, or_not_in_list, not_in_list_if, or_not_in_list_if;
    }

    null_combinators! {
        IsNull => is_null, or_is_null, is_null_if, or_is_null_if;
        IsNotNull => is_not_null, or_is_not_null, is_not_null_if, or_is_not_null_if;
    }

    /// Appends a leaf built from data, typically an operator parsed with `Operator::from_str`.
    ///
    /// Fails when the operands do not match the arity of the operator.
    pub fn push(
        self,
        linkage: Linkage,
        field: impl Into<String>,
        operator: Operator,
        operands: Vec<Value>,
    ) -> Result<Self> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(Error::msg(format!(
                "Operator {operator} requires a field name"
            )));
        }
        let valid = match operator.arity() {
            Arity::None => operands.is_empty(),
            Arity::One => operands.len() == 1,
            Arity::Any => true,
            Arity::Placeholders => {
                return Err(Error::msg(format!(
                    "Raw fragments are appended with `and_raw` or `or_raw`, not on field `{}`",
                    truncate_long!(field)
                )));
            }
        };
        if !valid {
            return Err(Error::msg(format!(
                "Operator {operator} on field `{}` received {} operands",
                truncate_long!(field),
                operands.len()
            )));
        }
        Ok(self.leaf(linkage, true, field, operator, operands))
    }

    /// AND a nested group, parenthesized when it holds more than one predicate.
    pub fn and(self, condition: Condition) -> Self {
        self.group(Linkage::And, true, condition)
    }

    pub fn or(self, condition: Condition) -> Self {
        self.group(Linkage::Or, true, condition)
    }

    pub fn and_if(self, enabled: bool, condition: Condition) -> Self {
        self.group(Linkage::And, enabled, condition)
    }

    pub fn or_if(self, enabled: bool, condition: Condition) -> Self {
        self.group(Linkage::Or, enabled, condition)
    }

    fn group(self, linkage: Linkage, enabled: bool, condition: Condition) -> Self {
        self.append(Predicate::new(
            linkage,
            enabled,
            PredicateKind::Group(condition),
        ))
    }

    /// AND a raw SQL fragment, each `?` outside quoted literals consumes one operand.
    /// ```rust
    /// use sluice_core::{AsValue, Condition};
    /// let filter = Condition::new()
    ///     .and_raw("age BETWEEN ? AND ?", vec![18.as_value(), 65.as_value()])
    ///     .unwrap();
    /// assert!(Condition::new().and_raw("name = ?", vec![]).is_err());
    /// ```
    pub fn and_raw(self, sql: impl Into<String>, operands: Vec<Value>) -> Result<Self> {
        self.raw(Linkage::And, true, sql.into(), operands)
    }

    pub fn or_raw(self, sql: impl Into<String>, operands: Vec<Value>) -> Result<Self> {
        self.raw(Linkage::Or, true, sql.into(), operands)
    }

    pub fn and_raw_if(
        self,
        enabled: bool,
        sql: impl Into<String>,
        operands: Vec<Value>,
    ) -> Result<Self> {
        self.raw(Linkage::And, enabled, sql.into(), operands)
    }

    pub fn or_raw_if(
        self,
        enabled: bool,
        sql: impl Into<String>,
        operands: Vec<Value>,
    ) -> Result<Self> {
        self.raw(Linkage::Or, enabled, sql.into(), operands)
    }

    fn raw(
        self,
        linkage: Linkage,
        enabled: bool,
        sql: String,
        operands: Vec<Value>,
    ) -> Result<Self> {
        let placeholders = count_placeholders(&sql);
        if placeholders != operands.len() {
            return Err(Error::msg(format!(
                "Raw fragment `{}` has {} placeholders but received {} operands",
                truncate_long!(sql),
                placeholders,
                operands.len()
            )));
        }
        Ok(self.append(Predicate::new(
            linkage,
            enabled,
            PredicateKind::Raw { sql, operands },
        )))
    }
}
