use sluice::{Condition, Driver, Ordered, Query, Select, SqlWriter, TableRef, Value};
use std::sync::LazyLock;

/// Positions of the placeholders found outside quoted text: `?` counts in order, `$n` yields
/// `n`.
pub fn placeholders(sql: &str) -> Vec<u32> {
    let mut result = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = sql.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(..), _) => {}
            (None, '\'' | '"' | '`') => quote = Some(c),
            (None, '?') => result.push(result.len() as u32 + 1),
            (None, '$') => {
                let digits = sql[i + 1..]
                    .chars()
                    .take_while(char::is_ascii_digit)
                    .count();
                if let Ok(n) = sql[i + 1..i + 1 + digits].parse() {
                    result.push(n);
                }
                for _ in 0..digits {
                    chars.next();
                }
            }
            _ => {}
        }
    }
    result
}

/// Panics unless the placeholders of `query` are numbered 1 to the number of arguments.
pub fn assert_aligned(query: &Query) {
    let found = placeholders(&query.sql);
    let expected = (1..=query.args.len() as u32).collect::<Vec<_>>();
    assert_eq!(
        found, expected,
        "Placeholders and arguments are not aligned in `{}` ({} arguments)",
        query.sql,
        query.args.len()
    );
}

static ORDERS: LazyLock<TableRef> = LazyLock::new(|| TableRef::new("orders").with_schema("shop"));

fn filter() -> Condition {
    Condition::new()
        .eq("status", "shipped")
        .or(Condition::new()
            .in_list("region", ["eu", "us", "apac"])
            .and_raw("weight > ? AND weight < ?", vec![1.into(), 10.into()])
            .expect("Failed to append the raw fragment"))
        .like_prefix("customer", "An")
        .not_in_list("id", Vec::<i64>::new())
        .is_not_null("shipped_at")
        .ge_if(false, "total", 100)
}

/// Arguments follow placeholders through every statement, including pagination.
pub fn alignment<D: Driver>(driver: &D) {
    let writer = driver.sql_writer();
    let condition = filter();
    let order_by = [Ordered::desc("created_at")];

    let query = writer
        .render_select(
            &Select::new(&ORDERS)
                .fields(&["id", "status", "total"])
                .condition(&condition)
                .order_by(&order_by)
                .limit(20)
                .offset(40),
        )
        .expect("Failed to render the select");
    assert_aligned(&query);
    assert_eq!(
        query.args,
        [
            Value::Varchar(Some("shipped".into())),
            Value::Varchar(Some("eu".into())),
            Value::Varchar(Some("us".into())),
            Value::Varchar(Some("apac".into())),
            Value::Int32(Some(1)),
            Value::Int32(Some(10)),
            Value::Varchar(Some("An%".into())),
            Value::Int64(Some(20)),
            Value::Int64(Some(40)),
        ]
    );

    let query = writer
        .render_select(&Select::new(&ORDERS).condition(&condition).offset(5))
        .expect("Failed to render the select with offset only");
    assert_aligned(&query);
    assert_eq!(query.args.last(), Some(&Value::Int64(Some(5))));

    let query = writer
        .render_count(&ORDERS, Some(&condition))
        .expect("Failed to render the count");
    assert_aligned(&query);
    assert_eq!(query.args.len(), 7);

    let query = writer
        .render_update(
            &ORDERS,
            &[("status", "delivered".into()), ("total", 12.5.into())],
            Some(&condition),
        )
        .expect("Failed to render the update");
    assert_aligned(&query);
    assert_eq!(query.args[0], Value::Varchar(Some("delivered".into())));
    assert_eq!(query.args[2], Value::Varchar(Some("shipped".into())));

    let query = writer
        .render_delete(&ORDERS, Some(&condition))
        .expect("Failed to render the delete");
    assert_aligned(&query);
    assert_eq!(query.args.len(), 7);

    let query = writer
        .render_insert_many(
            &ORDERS,
            &["id", "status"],
            &[
                vec![1.into(), "new".into()],
                vec![2.into(), "new".into()],
                vec![3.into(), Value::Varchar(None)],
            ],
        )
        .expect("Failed to render the batch insert");
    assert_aligned(&query);
    assert_eq!(query.args.len(), 6);

    let query = writer
        .render_upsert(
            &ORDERS,
            &[("id", 1.into()), ("status", "new".into())],
            &["id"],
        )
        .expect("Failed to render the upsert");
    assert_aligned(&query);
    assert_eq!(query.args.len(), 2);
}

/// A tree with nothing enabled means no `WHERE` clause and no arguments.
pub fn empty_tree<D: Driver>(driver: &D) {
    let writer = driver.sql_writer();
    let select_all = writer
        .render_select(&Select::new(&ORDERS))
        .expect("Failed to render the select");
    for condition in [
        Condition::new(),
        Condition::new().eq_if(false, "a", 1).or_is_null_if(false, "b"),
        Condition::new().and(Condition::new()).or(Condition::new().lt_if(false, "c", 2)),
    ] {
        assert!(condition.is_empty());
        let query = writer
            .render_select(&Select::new(&ORDERS).condition(&condition))
            .expect("Failed to render the select");
        assert_eq!(query, select_all);
        assert!(!query.sql.contains("WHERE"));
        assert!(query.args.is_empty());
        let query = writer
            .render_delete(&ORDERS, Some(&condition))
            .expect("Failed to render the delete");
        assert!(!query.sql.contains("WHERE"));
    }
}

/// Values inside quoted text are never mistaken for placeholders.
pub fn quoted_placeholders<D: Driver>(driver: &D) {
    let writer = driver.sql_writer();
    let condition = Condition::new()
        .and_raw("note <> '?' AND code = ?", vec!["x".into()])
        .expect("Failed to append the raw fragment")
        .eq("label", "what?");
    let query = writer
        .render_select(&Select::new(&ORDERS).condition(&condition))
        .expect("Failed to render the select");
    assert_aligned(&query);
    assert!(query.sql.contains("'?'"), "{}", query.sql);
    assert_eq!(query.args.len(), 2);
}
