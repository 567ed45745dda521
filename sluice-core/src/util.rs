use std::borrow::Cow;

pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Same as [`separated_by`] but for callbacks that can fail.
pub fn try_separated_by<T, F, E>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) -> Result<(), E>
where
    F: FnMut(&mut String, T) -> Result<(), E>,
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v)?;
    }
    Ok(())
}

/// Longest prefix of `value` not exceeding `max` bytes that ends on a char boundary.
pub fn truncate_str(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[macro_export]
macro_rules! possibly_parenthesized {
    ($buff:ident, $cond:expr, $v:expr) => {
        if $cond {
            $buff.push('(');
            $v;
            $buff.push(')');
        } else {
            $v;
        }
    };
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            $crate::truncate_str(&$query, 497).trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}

/// Splits a raw SQL fragment on its `?` placeholders, ignoring the ones inside quoted literals
/// or quoted identifiers. A fragment with `n` placeholders yields `n + 1` pieces.
///
/// Only doubled quotes (`'it''s'`) escape a quote. Backslash escapes (`'it\'s'`) are MySQL
/// specific and not recognized, such a fragment must be rewritten with a doubled quote or its
/// placeholders will not be counted correctly.
pub fn split_placeholders(sql: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in sql.char_indices() {
        match (quote, c) {
            (None, '\'' | '"' | '`') => quote = Some(c),
            // A doubled quote closes and reopens the literal, the state ends up unchanged
            (Some(q), c) if q == c => quote = None,
            (None, '?') => {
                result.push(&sql[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    result.push(&sql[start..]);
    result
}

/// Number of `?` placeholders outside quoted literals.
pub fn count_placeholders(sql: &str) -> usize {
    split_placeholders(sql).len() - 1
}

/// Whether the field can be written as a (possibly qualified) identifier rather than
/// being an SQL expression.
pub fn is_identifier(field: &str) -> bool {
    !field.is_empty()
        && !field.chars().any(|c| {
            c.is_whitespace() || matches!(c, '(' | ')' | ',' | ';' | '\'' | '"' | '`')
        })
}

/// Column label as reported by a driver, without the table qualifier and quotes.
pub fn unqualified_column(label: &str) -> Cow<'_, str> {
    let name = label.rsplit('.').next().unwrap_or(label);
    let trimmed = name.trim_matches(|c| matches!(c, '"' | '`' | '[' | ']'));
    if trimmed.len() == label.len() {
        Cow::Borrowed(label)
    } else {
        Cow::Owned(trimmed.to_owned())
    }
}
