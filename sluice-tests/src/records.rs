use crate::{RecordingExecutor, assert_aligned};
use rust_decimal::Decimal;
use sluice::{Condition, Driver, Executor, Ordered, Record, SqlWriter, Value, ZERO_DATE};
use time::{PrimitiveDateTime, Time, macros::datetime};
use uuid::Uuid;

#[derive(Record, Debug, Clone, PartialEq)]
#[sluice(name = "accounts")]
pub struct Account {
    #[sluice(primary_key, auto_increment)]
    pub id: i64,
    pub email: String,
    #[sluice(name = "is_active")]
    pub active: bool,
    pub balance: Option<Decimal>,
    pub token: Uuid,
    #[sluice(default_on_insert)]
    pub created_at: PrimitiveDateTime,
    #[sluice(skip)]
    pub session: Option<String>,
}

const LABELS: [&str; 6] = ["id", "email", "is_active", "balance", "token", "created_at"];

fn text(value: &str) -> Value {
    Value::Unknown(Some(value.into()))
}

fn ann() -> Account {
    Account {
        id: 0,
        email: "ann@example.com".into(),
        active: true,
        balance: Some(Decimal::new(1050, 2)),
        token: Uuid::nil(),
        created_at: PrimitiveDateTime::new(ZERO_DATE, Time::MIDNIGHT),
        session: Some("transient".into()),
    }
}

/// Record operations against a recording executor: statements, arguments and the mapping of
/// the scripted answers.
pub async fn records<D: Driver>(driver: D) {
    let mut executor = RecordingExecutor::new(driver);
    let returning = executor.driver().sql_writer().returns_generated_key();

    // Insert
    if returning {
        executor.respond_rows(&["id"], vec![vec![Value::Int64(Some(5))]]);
    } else {
        executor.respond_affected(1, Some(5));
    }
    let mut account = ann();
    let result = account
        .insert_one(&mut executor)
        .await
        .expect("Failed to insert the account");
    assert_eq!(result.rows_affected, 1);
    assert_eq!(result.last_affected_id, Some(5));
    let query = executor.last_query().expect("The insert was not recorded");
    assert!(query.sql.starts_with("INSERT INTO "), "{}", query.sql);
    assert_eq!(query.sql.contains(" RETURNING "), returning, "{}", query.sql);
    // Zero `id` and `created_at` are left to the database, `session` is never stored
    assert_eq!(
        query.args,
        [
            Value::Varchar(Some("ann@example.com".into())),
            Value::Boolean(Some(true)),
            Value::Decimal(Some(Decimal::new(1050, 2)), 0, 0),
            Value::Uuid(Some(Uuid::nil())),
        ]
    );
    account.id = 5;

    // Find by primary key, the answer comes back as text
    executor.respond_rows(
        &LABELS,
        vec![vec![
            text("5"),
            text("ann@example.com"),
            text("t"),
            Value::Null,
            text("00000000-0000-0000-0000-000000000000"),
            text("2025-03-01 08:00:00"),
        ]],
    );
    let found = Account::find_pk(&mut executor, &[5i64.into()])
        .await
        .expect("Failed to find the account")
        .expect("The account should be found");
    assert_eq!(
        found,
        Account {
            balance: None,
            created_at: datetime!(2025-03-01 08:00:00),
            session: None,
            ..account.clone()
        }
    );
    let query = executor.last_query().expect("The select was not recorded");
    assert_eq!(query.args, [Value::Int64(Some(5)), Value::Int64(Some(1))]);

    // Nothing found
    executor.respond(Vec::new());
    let missing = Account::find_one(&mut executor, &Condition::new().eq("email", "nobody"))
        .await
        .expect("Failed to look for the account");
    assert!(missing.is_none());

    // Many, columns in a different order and qualified
    executor.respond_rows(
        &["accounts.email", "accounts.id", "accounts.is_active"],
        vec![
            vec![text("bob@example.com"), Value::Int32(Some(6)), Value::Int8(Some(0))],
            vec![text("cid@example.com"), Value::Int32(Some(7)), Value::Int8(Some(1))],
        ],
    );
    let accounts = Account::find_many(
        &mut executor,
        &Condition::new().like_suffix("email", "@example.com"),
        &[Ordered::asc("id")],
        Some(10),
    )
    .await
    .expect("Failed to find the accounts");
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].id, 6);
    assert!(!accounts[0].active);
    assert_eq!(accounts[1].email, "cid@example.com");
    assert_eq!(accounts[1].balance, None);
    let query = executor.last_query().expect("The select was not recorded");
    assert_eq!(query.args[0], Value::Varchar(Some("%@example.com".into())));
    assert!(query.sql.contains(" ORDER BY "), "{}", query.sql);

    // Count
    executor.respond_rows(&["COUNT(*)"], vec![vec![Value::Int64(Some(2))]]);
    let count = Account::count(&mut executor, &Condition::new().eq("is_active", true))
        .await
        .expect("Failed to count the accounts");
    assert_eq!(count, 2);

    // Update never sets the primary key and filters on it
    executor.respond_affected(1, None);
    account
        .update(&mut executor)
        .await
        .expect("Failed to update the account");
    let query = executor.last_query().expect("The update was not recorded");
    assert!(query.sql.starts_with("UPDATE "), "{}", query.sql);
    assert_eq!(query.args.len(), 6);
    assert_eq!(query.args.last(), Some(&Value::Int64(Some(5))));

    // Save
    executor.respond_affected(1, None);
    account
        .save(&mut executor)
        .await
        .expect("Failed to save the account");

    // Delete
    executor.respond_affected(1, None);
    account
        .delete(&mut executor)
        .await
        .expect("Failed to delete the account");
    executor.respond_affected(0, None);
    assert!(
        account.delete(&mut executor).await.is_err(),
        "Deleting a missing row must fail"
    );

    // Empty conditions never reach the executor
    let before = executor.queries().len();
    assert!(
        Account::delete_many(&mut executor, &Condition::new())
            .await
            .is_err()
    );
    assert_eq!(executor.queries().len(), before);
    executor.respond_affected(3, None);
    let deleted = Account::delete_all(&mut executor)
        .await
        .expect("Failed to delete all the accounts");
    assert_eq!(deleted.rows_affected, 3);

    // Executor errors are passed through
    executor.respond_error("connection reset");
    let error = Account::find_one(&mut executor, &Condition::new())
        .await
        .expect_err("The executor error should surface");
    assert!(format!("{error:#}").contains("connection reset"));

    // Bad values name the column
    executor.respond_rows(&["id", "email"], vec![vec![text("five"), text("x")]]);
    let error = Account::find_one(&mut executor, &Condition::new())
        .await
        .expect_err("A non numeric id cannot be read");
    let message = format!("{error:#}");
    assert!(message.contains("`id`"), "{message}");
    assert!(message.contains("five"), "{message}");

    for query in executor.queries() {
        assert_aligned(query);
    }
}
