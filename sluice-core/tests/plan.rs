#[cfg(test)]
mod tests {
    use sluice_core::{
        ColumnPlan, FieldDef, Materializer, PlanCache, PlanCacheConfig, Record, Result,
        RowLabeled, RowNames, TableRef, Value, decode_field,
    };
    use std::{borrow::Cow, sync::Arc, thread};

    #[derive(Debug, PartialEq)]
    struct User {
        id: i64,
        display_name: String,
        active: bool,
        score: Option<f64>,
    }

    static TABLE: TableRef = TableRef {
        name: Cow::Borrowed("users"),
        schema: Cow::Borrowed(""),
        alias: Cow::Borrowed(""),
    };

    static FIELDS: [FieldDef; 4] = [
        FieldDef {
            name: "id",
            ident: "id",
            renamed: false,
            value: Value::Int64(None),
            nullable: false,
            primary_key: true,
            auto_increment: true,
            default_on_insert: false,
        },
        FieldDef {
            name: "display_name",
            ident: "display_name",
            renamed: false,
            value: Value::Varchar(None),
            nullable: false,
            primary_key: false,
            auto_increment: false,
            default_on_insert: false,
        },
        FieldDef {
            name: "active",
            ident: "active",
            renamed: false,
            value: Value::Boolean(None),
            nullable: false,
            primary_key: false,
            auto_increment: false,
            default_on_insert: false,
        },
        FieldDef {
            name: "score",
            ident: "score",
            renamed: false,
            value: Value::Float64(None),
            nullable: true,
            primary_key: false,
            auto_increment: false,
            default_on_insert: false,
        },
    ];

    impl Record for User {
        fn table_ref() -> &'static TableRef {
            &TABLE
        }
        fn fields() -> &'static [FieldDef] {
            &FIELDS
        }
        fn from_values(values: Vec<Value>) -> Result<Self> {
            let mut values = values.into_iter();
            Ok(Self {
                id: decode_field(&FIELDS[0], values.next())?,
                display_name: decode_field(&FIELDS[1], values.next())?,
                active: decode_field(&FIELDS[2], values.next())?,
                score: decode_field(&FIELDS[3], values.next())?,
            })
        }
        fn to_values(&self) -> Vec<Value> {
            vec![
                self.id.into(),
                self.display_name.clone().into(),
                self.active.into(),
                self.score.into(),
            ]
        }
    }

    fn labels(names: &[&str]) -> RowNames {
        names.iter().map(|v| v.to_string()).collect()
    }

    fn text(value: &str) -> Value {
        Value::Unknown(Some(value.into()))
    }

    #[test]
    fn plan_text_wire() {
        let row = RowLabeled::new(
            labels(&["id", "display_name", "active", "score"]),
            [text("7"), text("Ann"), text("1"), Value::Null].into(),
        );
        let user: User = Materializer::new(Default::default())
            .materialize(row)
            .unwrap();
        assert_eq!(
            user,
            User {
                id: 7,
                display_name: "Ann".into(),
                active: true,
                score: None,
            }
        );
    }

    #[test]
    fn plan_null_fallback() {
        let row = RowLabeled::new(
            labels(&["id", "display_name", "active", "score"]),
            [
                Value::Null,
                Value::Varchar(None),
                Value::Null,
                Value::Float32(Some(0.5)),
            ]
            .into(),
        );
        let user: User = Materializer::new(Default::default())
            .materialize(row)
            .unwrap();
        assert_eq!(
            user,
            User {
                id: 0,
                display_name: String::new(),
                active: false,
                score: Some(0.5),
            }
        );
    }

    #[test]
    fn plan_column_matching() {
        let plan = ColumnPlan::build::<User>(labels(&[
            "users.ID",
            "DisplayName",
            "extra",
            "Active",
        ]));
        let fields = plan.slots.iter().map(|v| v.field).collect::<Vec<_>>();
        assert_eq!(fields, [Some(0), Some(1), None, Some(2)]);
        assert_eq!(plan.unmapped_fields().collect::<Vec<_>>(), [3]);

        let values = plan
            .apply([Value::Int32(Some(3)), text("Bob"), text("ignored"), text("no")].into())
            .unwrap();
        assert_eq!(
            values,
            [
                Value::Int64(Some(3)),
                Value::Varchar(Some("Bob".into())),
                Value::Boolean(Some(false)),
                Value::Float64(None),
            ]
        );
    }

    #[test]
    fn plan_exact_match_wins() {
        // `ID` would match `id` case insensitively, the exact `id` column takes it first
        let plan = ColumnPlan::build::<User>(labels(&["ID", "id"]));
        let fields = plan.slots.iter().map(|v| v.field).collect::<Vec<_>>();
        assert_eq!(fields, [None, Some(0)]);
    }

    #[test]
    fn plan_declared_name_only() {
        static LOGIN: [FieldDef; 2] = [
            FieldDef {
                name: "login",
                ident: "user_name",
                renamed: true,
                value: Value::Varchar(None),
                nullable: false,
                primary_key: false,
                auto_increment: false,
                default_on_insert: false,
            },
            FieldDef {
                name: "last_seen",
                ident: "last_seen",
                renamed: false,
                value: Value::Varchar(None),
                nullable: false,
                primary_key: false,
                auto_increment: false,
                default_on_insert: false,
            },
        ];
        let plan = ColumnPlan::build_for(&LOGIN, labels(&["user_name", "LastSeen"]));
        let fields = plan.slots.iter().map(|v| v.field).collect::<Vec<_>>();
        assert_eq!(fields, [None, Some(1)]);
        let plan = ColumnPlan::build_for(&LOGIN, labels(&["accounts.Login"]));
        assert_eq!(plan.slots[0].field, Some(0));
    }

    #[test]
    fn plan_coercion_failure() {
        let row = RowLabeled::new(labels(&["id"]), [text("abc")].into());
        let error = Materializer::new(Default::default())
            .materialize::<User>(row)
            .unwrap_err();
        let message = format!("{error:#}");
        assert!(message.contains("`id`"), "{message}");
        assert!(message.contains("abc"), "{message}");
    }

    #[test]
    fn plan_row_length_mismatch() {
        let plan = ColumnPlan::build::<User>(labels(&["id", "active"]));
        assert!(plan.apply([Value::Int64(Some(1))].into()).is_err());
    }

    #[test]
    fn plan_cache_idempotent() {
        let cache = PlanCache::new(Default::default());
        let first = cache.plan::<User>(&labels(&["id", "active"]));
        let second = cache.plan::<User>(&labels(&["id", "active"]));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
        let other = cache.plan::<User>(&labels(&["active", "id"]));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn plan_cache_concurrent_first_use() {
        let cache = PlanCache::new(Default::default());
        let columns = labels(&["id", "display_name", "active", "score"]);
        let plans = thread::scope(|scope| {
            let handles = (0..8)
                .map(|_| scope.spawn(|| cache.plan::<User>(&columns)))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|v| v.join().unwrap())
                .collect::<Vec<_>>()
        });
        assert!(plans.iter().all(|v| Arc::ptr_eq(v, &plans[0])));
        assert!(Arc::ptr_eq(&plans[0], &cache.plan::<User>(&columns)));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits() + cache.misses(), 9);
        assert!(cache.misses() >= 1);
    }

    #[test]
    fn plan_cache_capacity() {
        let cache = PlanCache::new(PlanCacheConfig {
            max_entries: Some(1),
        });
        cache.plan::<User>(&labels(&["id"]));
        cache.plan::<User>(&labels(&["active"]));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn materialize_many() {
        let cache = Arc::new(PlanCache::default());
        let materializer = Materializer::new(cache.clone());
        let names = labels(&["id", "display_name"]);
        let rows = (1..=3).map(|i| {
            Ok(RowLabeled::new(
                names.clone(),
                [Value::Int64(Some(i)), text(&format!("user{i}"))].into(),
            ))
        });
        let users: Vec<User> = materializer.materialize_all(rows).unwrap();
        assert_eq!(users.len(), 3);
        assert_eq!(users[2].id, 3);
        assert_eq!(users[2].display_name, "user3");
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 0);

        let none: Option<User> = materializer.materialize_first(Vec::new()).unwrap();
        assert!(none.is_none());
        let failing = vec![Err(sluice_core::Error::msg("connection lost"))];
        assert!(materializer.materialize_all::<User>(failing).is_err());
    }
}
