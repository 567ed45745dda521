use crate::{Error, Result, truncate_long};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    NotEq,
    Ge,
    Gt,
    Le,
    Lt,
    Like,
    LikePrefix,
    LikeSuffix,
    In,
    NotIn,
    IsNull,
    IsNotNull,
    Raw,
    /// Case insensitive pattern match, not every dialect supports it.
    ILike,
    /// Regular expression match, not every dialect supports it.
    Regexp,
}

/// Number of operands an operator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    None,
    One,
    Any,
    /// As many as the placeholders of the raw fragment.
    Placeholders,
}

impl Operator {
    pub fn arity(&self) -> Arity {
        match self {
            Operator::IsNull | Operator::IsNotNull => Arity::None,
            Operator::In | Operator::NotIn => Arity::Any,
            Operator::Raw => Arity::Placeholders,
            _ => Arity::One,
        }
    }

    /// Operators wrapping their operand with `%`.
    pub fn is_like(&self) -> bool {
        matches!(
            self,
            Operator::Like | Operator::LikePrefix | Operator::LikeSuffix | Operator::ILike
        )
    }
}

impl FromStr for Operator {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        Ok(match normalized.to_ascii_uppercase().as_str() {
            "=" | "==" => Operator::Eq,
            "!=" | "<>" => Operator::NotEq,
            ">=" => Operator::Ge,
            ">" => Operator::Gt,
            "<=" => Operator::Le,
            "<" => Operator::Lt,
            "LIKE" => Operator::Like,
            "IN" => Operator::In,
            "NOT IN" => Operator::NotIn,
            "IS NULL" => Operator::IsNull,
            "IS NOT NULL" => Operator::IsNotNull,
            "ILIKE" => Operator::ILike,
            "REGEXP" | "~" => Operator::Regexp,
            _ => {
                return Err(Error::msg(format!(
                    "Unknown operator `{}`",
                    truncate_long!(s)
                )));
            }
        })
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::Eq => "Eq",
            Operator::NotEq => "NotEq",
            Operator::Ge => "Ge",
            Operator::Gt => "Gt",
            Operator::Le => "Le",
            Operator::Lt => "Lt",
            Operator::Like => "Like",
            Operator::LikePrefix => "LikePrefix",
            Operator::LikeSuffix => "LikeSuffix",
            Operator::In => "In",
            Operator::NotIn => "NotIn",
            Operator::IsNull => "IsNull",
            Operator::IsNotNull => "IsNotNull",
            Operator::Raw => "Raw",
            Operator::ILike => "ILike",
            Operator::Regexp => "Regexp",
        })
    }
}
