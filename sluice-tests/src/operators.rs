use crate::assert_aligned;
use sluice::{Condition, Driver, Linkage, Operator, Select, SqlWriter, TableRef, Value};
use std::sync::LazyLock;

static PRODUCTS: LazyLock<TableRef> = LazyLock::new(|| TableRef::new("products"));

const OPERATORS: [Operator; 15] = [
    Operator::Eq,
    Operator::NotEq,
    Operator::Ge,
    Operator::Gt,
    Operator::Le,
    Operator::Lt,
    Operator::Like,
    Operator::LikePrefix,
    Operator::LikeSuffix,
    Operator::In,
    Operator::NotIn,
    Operator::IsNull,
    Operator::IsNotNull,
    Operator::ILike,
    Operator::Regexp,
];

fn operands(operator: Operator) -> Vec<Value> {
    match operator {
        Operator::IsNull | Operator::IsNotNull => Vec::new(),
        Operator::In | Operator::NotIn => vec![1.into(), 2.into()],
        Operator::Regexp => vec!["^ab+c$".into()],
        _ => vec!["abc".into()],
    }
}

/// Every operator either renders the dialect token or fails without producing SQL.
pub fn operators<D: Driver>(driver: &D) {
    let writer = driver.sql_writer();
    for operator in OPERATORS {
        let condition = Condition::new()
            .push(Linkage::And, "name", operator, operands(operator))
            .expect("Failed to build the condition")
            .eq("category", 7);
        let result = writer.render_select(&Select::new(&PRODUCTS).condition(&condition));
        match writer.operator_token(operator) {
            Some(token) => {
                let query = result.unwrap_or_else(|e| {
                    panic!("Operator {operator} failed on the {} dialect: {e:#}", writer.name())
                });
                assert!(
                    query.sql.contains(token),
                    "Operator {operator} expected `{token}` in `{}`",
                    query.sql
                );
                assert_aligned(&query);
                assert_eq!(query.args.len(), operands(operator).len() + 1);
            }
            None => {
                let error = result.expect_err("An unsupported operator must not render");
                let message = format!("{error:#}");
                assert!(
                    message.contains(writer.name()),
                    "The error should name the dialect: {message}"
                );
            }
        }
    }
}

/// Operators parsed from text behave as the typed ones.
pub fn parsed_operators<D: Driver>(driver: &D) {
    let writer = driver.sql_writer();
    let condition = ["=", "<>", ">=", "like", "not  in", "is not null"]
        .into_iter()
        .zip([
            vec![1.into()],
            vec![2.into()],
            vec![3.into()],
            vec!["x".into()],
            vec![4.into(), 5.into()],
            vec![],
        ])
        .try_fold(Condition::new(), |condition, (token, operands)| {
            let operator = token.parse::<Operator>()?;
            condition.push(Linkage::Or, "value", operator, operands)
        })
        .expect("Failed to build the condition from text");
    let query = writer
        .render_select(&Select::new(&PRODUCTS).condition(&condition))
        .expect("Failed to render the select");
    assert_aligned(&query);
    assert_eq!(query.args.len(), 6);
    assert!(query.sql.contains(" NOT IN ("), "{}", query.sql);
    assert!(query.sql.contains(" IS NOT NULL"), "{}", query.sql);
    assert!("~~".parse::<Operator>().is_err());
    assert!(
        Condition::new()
            .push(Linkage::And, "value", Operator::Eq, vec![])
            .is_err()
    );
}

/// Empty lists still render valid SQL.
pub fn empty_lists<D: Driver>(driver: &D) {
    let writer = driver.sql_writer();
    let condition = Condition::new()
        .in_list("id", Vec::<i32>::new())
        .or_not_in_list("id", Vec::<i32>::new());
    let query = writer
        .render_select(&Select::new(&PRODUCTS).condition(&condition))
        .expect("Failed to render the select");
    assert!(query.sql.ends_with(" WHERE (1 = 0 OR 1 = 1)"), "{}", query.sql);
    assert!(query.args.is_empty());
}
