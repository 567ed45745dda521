use crate::{Condition, Operator, Value};
use std::fmt::{self, Display, Formatter};

/// How a predicate combines with the siblings on its left.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    #[default]
    And,
    Or,
}

impl Display for Linkage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Linkage::And => "AND",
            Linkage::Or => "OR",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredicateKind {
    Leaf {
        field: String,
        operator: Operator,
        operands: Vec<Value>,
    },
    Raw {
        sql: String,
        operands: Vec<Value>,
    },
    Group(Condition),
}

/// Node of a [`Condition`] tree.
///
/// Built only through the `Condition` combinators, which validate arity and placeholder counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    linkage: Linkage,
    enabled: bool,
    kind: PredicateKind,
}

impl Predicate {
    pub(crate) fn new(linkage: Linkage, enabled: bool, kind: PredicateKind) -> Self {
        Self {
            linkage,
            enabled,
            kind,
        }
    }

    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn kind(&self) -> &PredicateKind {
        &self.kind
    }

    /// Whether the node renders anything: enabled, and for raw fragments and groups non empty.
    pub fn has_payload(&self) -> bool {
        if !self.enabled {
            return false;
        }
        match &self.kind {
            PredicateKind::Leaf { .. } => true,
            PredicateKind::Raw { sql, .. } => !sql.trim().is_empty(),
            PredicateKind::Group(condition) => condition.payload() > 0,
        }
    }
}
