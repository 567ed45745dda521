#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use sluice::{
        Materializer, PlanCache, PlanCacheConfig, Record, RowLabeled, RowNames, Value,
    };
    use std::sync::Arc;
    use time::{OffsetDateTime, macros::datetime};

    #[derive(Record, Debug, PartialEq)]
    struct Invoice {
        #[sluice(primary_key, auto_increment)]
        id: u64,
        customer_name: String,
        total: Decimal,
        paid: bool,
        issued_at: OffsetDateTime,
        notes: Option<String>,
        attachment: Vec<u8>,
    }

    fn labels(names: &[&str]) -> RowNames {
        names.iter().map(|v| v.to_string()).collect()
    }

    fn text(value: &str) -> Value {
        Value::Unknown(Some(value.into()))
    }

    #[test]
    fn materialize_text_wire() {
        let materializer = Materializer::new(Arc::new(PlanCache::default()));
        let row = RowLabeled::new(
            labels(&[
                "invoices.ID",
                "CustomerName",
                "total",
                "paid",
                "issued_at",
                "notes",
                "attachment",
            ]),
            [
                text("42"),
                text("Ann"),
                text("199.90"),
                text("false"),
                text("2025-01-31 23:59:59+01:00"),
                Value::Null,
                Value::Blob(Some([1u8, 2, 3].into())),
            ]
            .into(),
        );
        let invoice: Invoice = materializer
            .materialize(row)
            .expect("Failed to materialize the invoice");
        assert_eq!(
            invoice,
            Invoice {
                id: 42,
                customer_name: "Ann".into(),
                total: Decimal::new(19990, 2),
                paid: false,
                issued_at: datetime!(2025-01-31 23:59:59 +1),
                notes: None,
                attachment: vec![1, 2, 3],
            }
        );
    }

    #[test]
    fn materialize_zero_values() {
        let materializer = Materializer::new(Arc::new(PlanCache::default()));
        let row = RowLabeled::new(
            labels(&["id", "customer_name", "total", "notes", "unrelated"]),
            [
                Value::UInt32(Some(1)),
                Value::Null,
                Value::Null,
                Value::Varchar(Some("late".into())),
                Value::Int32(Some(-1)),
            ]
            .into(),
        );
        let invoice: Invoice = materializer
            .materialize(row)
            .expect("Failed to materialize the invoice");
        assert_eq!(invoice.id, 1);
        assert_eq!(invoice.customer_name, "");
        assert_eq!(invoice.total, Decimal::ZERO);
        assert!(!invoice.paid);
        assert_eq!(invoice.issued_at.date(), sluice::ZERO_DATE);
        assert_eq!(invoice.notes.as_deref(), Some("late"));
        assert!(invoice.attachment.is_empty());
    }

    #[test]
    fn materialize_many_shares_plans() {
        let cache = Arc::new(PlanCache::new(PlanCacheConfig {
            max_entries: Some(16),
        }));
        let materializer = Materializer::new(cache.clone());
        let first = labels(&["id", "paid"]);
        let second = labels(&["paid", "id"]);
        let rows = vec![
            Ok(RowLabeled::new(first.clone(), [text("1"), text("1")].into())),
            Ok(RowLabeled::new(first.clone(), [text("2"), text("0")].into())),
            Ok(RowLabeled::new(second.clone(), [text("yes"), text("3")].into())),
            Ok(RowLabeled::new(first, [text("4"), text("no")].into())),
        ];
        let invoices: Vec<Invoice> = materializer
            .materialize_all(rows)
            .expect("Failed to materialize the invoices");
        assert_eq!(
            invoices.iter().map(|v| (v.id, v.paid)).collect::<Vec<_>>(),
            [(1, true), (2, false), (3, true), (4, false)]
        );
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.hits(), 1);
        assert_eq!(Invoice::fields().len(), 7);
    }

    #[test]
    fn materialize_failure() {
        let materializer = Materializer::new(Arc::new(PlanCache::default()));
        let row = RowLabeled::new(labels(&["total"]), [text("a lot")].into());
        let error = materializer
            .materialize::<Invoice>(row)
            .expect_err("The total is not a number");
        let message = format!("{error:#}");
        assert!(message.contains("Invoice"), "{message}");
        assert!(message.contains("`total`"), "{message}");
        assert!(message.contains("a lot"), "{message}");
    }
}
