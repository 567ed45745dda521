#[cfg(test)]
mod tests {
    use sluice_core::{Condition, DialectRegistry, Driver, Select, SqlWriter, TableRef, Value};
    use sluice_sqlite::{SQLiteDriver, SQLiteSqlWriter, register};
    use sluice_tests::{execute_tests, init_logs};

    #[tokio::test]
    async fn sqlite() {
        init_logs();
        execute_tests(SQLiteDriver::new()).await;
    }

    #[test]
    fn sqlite_select() {
        let writer = SQLiteDriver::new().sql_writer();
        let condition = Condition::new()
            .like_prefix("title", "The")
            .le("pages", 300)
            .or_is_null("pages");
        let query = writer
            .render_select(
                &Select::new(&TableRef::new("books").with_alias("b"))
                    .fields(&["b.title", "b.pages"])
                    .condition(&condition)
                    .limit(3),
            )
            .expect("Failed to render the select");
        assert_eq!(
            query.sql,
            r#"SELECT "b"."title", "b"."pages" FROM "books" "b" WHERE ("title" LIKE ? AND "pages" <= ? OR "pages" IS NULL) LIMIT ?"#
        );
        assert_eq!(
            query.args,
            [
                Value::Varchar(Some("The%".into())),
                Value::Int32(Some(300)),
                Value::Int64(Some(3)),
            ]
        );
    }

    #[test]
    fn sqlite_offset_without_limit() {
        let query = SQLiteSqlWriter::default()
            .render_select(&Select::new(&TableRef::new("books")).offset(10))
            .expect("Failed to render the select");
        assert_eq!(query.sql, r#"SELECT * FROM "books" LIMIT -1 OFFSET ?"#);
    }

    #[test]
    fn sqlite_unsupported_operators() {
        let writer = SQLiteSqlWriter::default();
        let table = TableRef::new("books");
        for condition in [
            Condition::new().ilike("title", "the"),
            Condition::new().eq("id", 1).or_regexp("title", "^T"),
        ] {
            let error = writer
                .render_select(&Select::new(&table).condition(&condition))
                .expect_err("The operator does not exist in SQLite");
            assert!(error.to_string().contains("sqlite"), "{error}");
        }
    }

    #[test]
    fn sqlite_returning() {
        let query = SQLiteSqlWriter::default()
            .render_insert(&TableRef::new("books"), &[("title", "Dune".into())], &["id"])
            .expect("Failed to render the insert");
        assert_eq!(
            query.sql,
            r#"INSERT INTO "books" ("title") VALUES (?) RETURNING "id""#
        );
    }

    #[test]
    fn sqlite_registry() {
        let mut registry = DialectRegistry::new();
        register(&mut registry);
        assert_eq!(registry.names(), ["generic", "sqlite", "sqlite3"]);
        let writer = registry
            .for_url("sqlite://data.db?mode=rwc")
            .expect("The sqlite scheme should be registered");
        assert_eq!(writer.name(), "sqlite");
    }
}
