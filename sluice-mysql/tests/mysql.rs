#[cfg(test)]
mod tests {
    use sluice_core::{
        Condition, DialectRegistry, Driver, Ordered, Select, SqlWriter, TableRef, Value,
    };
    use sluice_mysql::{MySQLDriver, MySQLSqlWriter, register};
    use sluice_tests::{execute_tests, init_logs};

    #[tokio::test]
    async fn mysql() {
        init_logs();
        execute_tests(MySQLDriver::new()).await;
    }

    #[test]
    fn mysql_select() {
        let writer = MySQLDriver::new().sql_writer();
        let table = TableRef::new("users").with_schema("app");
        let condition = Condition::new()
            .eq("active", true)
            .and(Condition::new().regexp("name", "^A").or_in_list("id", [1, 2]));
        let order = [Ordered::desc("id")];
        let query = writer
            .render_select(
                &Select::new(&table)
                    .fields(&["id", "name"])
                    .condition(&condition)
                    .order_by(&order)
                    .limit(10)
                    .offset(30),
            )
            .expect("Failed to render the select");
        assert_eq!(
            query.sql,
            "SELECT `id`, `name` FROM `app`.`users` WHERE (`active` = ? AND (`name` REGEXP ? OR `id` IN (?, ?))) ORDER BY `id` DESC LIMIT ? OFFSET ?"
        );
        assert_eq!(
            query.args,
            [
                Value::Boolean(Some(true)),
                Value::Varchar(Some("^A".into())),
                Value::Int32(Some(1)),
                Value::Int32(Some(2)),
                Value::Int64(Some(10)),
                Value::Int64(Some(30)),
            ]
        );
    }

    #[test]
    fn mysql_offset_without_limit() {
        let query = MySQLSqlWriter::default()
            .render_select(&Select::new(&TableRef::new("users")).offset(5))
            .expect("Failed to render the select");
        assert_eq!(
            query.sql,
            "SELECT * FROM `users` LIMIT 18446744073709551615 OFFSET ?"
        );
        assert_eq!(query.args, [Value::Int64(Some(5))]);
    }

    #[test]
    fn mysql_ilike_unsupported() {
        let condition = Condition::new().ilike("name", "ann");
        let result = MySQLSqlWriter::default()
            .render_delete(&TableRef::new("users"), Some(&condition));
        let error = result.expect_err("ILIKE does not exist in MySQL");
        assert!(error.to_string().contains("mysql"), "{error}");
    }

    #[test]
    fn mysql_insert() {
        let writer = MySQLSqlWriter::default();
        assert!(!writer.returns_generated_key());
        let query = writer
            .render_insert(
                &TableRef::new("users"),
                &[("name", "Ann".into()), ("age", 30.into())],
                &["id"],
            )
            .expect("Failed to render the insert");
        assert_eq!(query.sql, "INSERT INTO `users` (`name`, `age`) VALUES (?, ?)");
    }

    #[test]
    fn mysql_upsert() {
        let writer = MySQLSqlWriter::default();
        let query = writer
            .render_upsert(
                &TableRef::new("users"),
                &[("id", 1.into()), ("name", "Ann".into()), ("age", 30.into())],
                &["id"],
            )
            .expect("Failed to render the upsert");
        assert_eq!(
            query.sql,
            "INSERT INTO `users` (`id`, `name`, `age`) VALUES (?, ?, ?) ON DUPLICATE KEY UPDATE `name` = VALUES(`name`), `age` = VALUES(`age`)"
        );
        let query = writer
            .render_upsert(&TableRef::new("tags"), &[("id", 1.into())], &["id"])
            .expect("Failed to render the upsert");
        assert_eq!(
            query.sql,
            "INSERT INTO `tags` (`id`) VALUES (?) ON DUPLICATE KEY UPDATE `id` = `id`"
        );
    }

    #[test]
    fn mysql_identifier_escaping() {
        let query = MySQLSqlWriter::default()
            .render_delete(&TableRef::new("we`ird"), None)
            .expect("Failed to render the delete");
        assert_eq!(query.sql, "DELETE FROM `we``ird`");
    }

    #[test]
    fn mysql_registry() {
        let mut registry = DialectRegistry::new();
        register(&mut registry);
        let writer = registry
            .for_url("mysql://root@localhost:3306/shop")
            .expect("The mysql scheme should be registered");
        assert_eq!(writer.name(), "mysql");
        assert_eq!(
            registry.get("MariaDB").expect("Alias missing").name(),
            "mysql"
        );
    }
}
