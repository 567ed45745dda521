#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use sluice_core::{AsValue, FieldDef, Value, ZERO_DATE, coerce, coercion_for, decode_field};
    use time::{
        Date, OffsetDateTime, PrimitiveDateTime, Time,
        macros::{date, datetime, time},
    };
    use uuid::Uuid;

    #[test]
    fn value_none() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Float32(Some(1.0)), Value::Null);
        assert!(Value::Int32(None).is_null());
        assert!(!Value::Int32(Some(0)).is_null());
        assert_eq!(Value::Int32(None), Value::Int32(None));
        assert!(Value::Varchar(None).same_type(&Value::Varchar(Some("a".into()))));
    }

    #[test]
    fn value_bool() {
        let val: Value = true.into();
        assert_eq!(val, Value::Boolean(Some(true)));
        assert_ne!(val, Value::Varchar(Some("true".into())));
        assert_eq!(bool::try_from_value(Value::Int8(Some(1))).unwrap(), true);
        assert_eq!(bool::try_from_value(Value::Int64(Some(0))).unwrap(), false);
        assert_eq!(bool::try_from_value(Value::UInt16(Some(8))).unwrap(), true);
        assert_eq!(bool::try_from_value("1".into()).unwrap(), true);
        assert_eq!(bool::try_from_value("yes".into()).unwrap(), true);
        assert_eq!(bool::try_from_value("OFF".into()).unwrap(), false);
        assert_eq!(bool::try_from_value(Value::Unknown(Some("t".into()))).unwrap(), true);
        assert_eq!(
            bool::try_from_value(Value::Blob(Some([1u8].into()))).unwrap(),
            true
        );
        assert!(bool::try_from_value(Value::Float32(Some(0.5))).is_err());
        assert!(bool::try_from_value("maybe".into()).is_err());
    }

    #[test]
    fn value_integers() {
        let val: Value = 127i8.into();
        assert_eq!(val, Value::Int8(Some(127)));
        assert_eq!(i8::try_from_value(Value::UInt8(Some(99))).unwrap(), 99);
        assert!(i8::try_from_value(Value::Int32(Some(128))).is_err());
        assert_eq!(i32::try_from_value(Value::Int64(Some(-5))).unwrap(), -5);
        assert!(i32::try_from_value(Value::Int64(Some(i64::MAX))).is_err());
        assert!(u64::try_from_value(Value::Int32(Some(-1))).is_err());
        assert_eq!(i64::try_from_value(Value::Float64(Some(3.0))).unwrap(), 3);
        assert!(i64::try_from_value(Value::Float64(Some(3.5))).is_err());
        assert_eq!(
            i32::try_from_value(Value::Decimal(Some(Decimal::new(1200, 2)), 0, 0)).unwrap(),
            12
        );
        assert_eq!(i64::try_from_value(Value::Boolean(Some(true))).unwrap(), 1);
    }

    #[test]
    fn value_integers_from_float_bounds() {
        let two_pow_63 = 9_223_372_036_854_775_808f64;
        let two_pow_64 = 18_446_744_073_709_551_616f64;
        assert!(i64::try_from_value(Value::Float64(Some(two_pow_63))).is_err());
        assert!(u64::try_from_value(Value::Float64(Some(two_pow_64))).is_err());
        assert_eq!(
            u64::try_from_value(Value::Float64(Some(two_pow_63))).unwrap(),
            1 << 63
        );
        assert_eq!(
            i64::try_from_value(Value::Float64(Some(-two_pow_63))).unwrap(),
            i64::MIN
        );
        assert!(i32::try_from_value(Value::Float64(Some(2_147_483_648.0))).is_err());
        assert_eq!(
            i32::try_from_value(Value::Float64(Some(2_147_483_647.0))).unwrap(),
            i32::MAX
        );
        assert!(u8::try_from_value(Value::Float32(Some(256.0))).is_err());
        assert_eq!(u8::try_from_value(Value::Float32(Some(255.0))).unwrap(), 255);
        assert!(i64::try_from_value(Value::Float64(Some(f64::NAN))).is_err());
        assert!(i64::try_from_value(Value::Float64(Some(f64::INFINITY))).is_err());
    }

    #[test]
    fn value_integers_from_text() {
        assert_eq!(i32::try_from_value(" 42 ".into()).unwrap(), 42);
        assert_eq!(i64::try_from_value("-9000".into()).unwrap(), -9000);
        assert_eq!(i32::try_from_value("7.00".into()).unwrap(), 7);
        assert_eq!(
            u32::try_from_value(Value::Blob(Some(b"123".as_slice().into()))).unwrap(),
            123
        );
        assert!(i32::try_from_value("7.5".into()).is_err());
        assert!(u8::try_from_value("300".into()).is_err());
        assert!(i8::try_from_value("-".into()).is_err());
        assert!(i64::try_from_value("abc".into()).is_err());
    }

    #[test]
    fn value_floats() {
        assert_eq!(f64::try_from_value("3.25".into()).unwrap(), 3.25);
        assert_eq!(f64::try_from_value(Value::Int32(Some(2))).unwrap(), 2.0);
        assert_eq!(f32::try_from_value(Value::Float64(Some(0.5))).unwrap(), 0.5);
        assert_eq!(
            f64::try_from_value(Value::Decimal(Some(Decimal::new(125, 2)), 0, 0)).unwrap(),
            1.25
        );
        assert!(f64::try_from_value("abc".into()).is_err());
    }

    #[test]
    fn value_decimal() {
        assert_eq!(
            Decimal::try_from_value("12.50".into()).unwrap(),
            Decimal::new(1250, 2)
        );
        assert_eq!(
            Decimal::try_from_value(Value::Int64(Some(7))).unwrap(),
            Decimal::new(7, 0)
        );
        assert!(Decimal::try_from_value("twelve".into()).is_err());
    }

    #[test]
    fn value_string() {
        assert_eq!(String::try_from_value(Value::Int64(Some(42))).unwrap(), "42");
        assert_eq!(String::try_from_value(Value::Float64(Some(1.5))).unwrap(), "1.5");
        assert_eq!(
            String::try_from_value(Value::Boolean(Some(true))).unwrap(),
            "true"
        );
        assert_eq!(
            String::try_from_value(Value::Blob(Some(b"Ann".as_slice().into()))).unwrap(),
            "Ann"
        );
        assert_eq!(
            String::try_from_value(Value::Date(Some(date!(2024 - 02 - 29)))).unwrap(),
            "2024-02-29"
        );
        assert_eq!(
            String::try_from_value(Value::Uuid(Some(Uuid::nil()))).unwrap(),
            "00000000-0000-0000-0000-000000000000"
        );
        assert!(String::try_from_value(Value::Varchar(None)).is_err());
        assert!(String::try_from_value(Value::Blob(Some([0xFFu8, 0xFE].into()))).is_err());
    }

    #[test]
    fn value_temporal() {
        assert_eq!(
            Date::try_from_value("2024-02-29".into()).unwrap(),
            date!(2024 - 02 - 29)
        );
        assert_eq!(
            Date::try_from_value(Value::Timestamp(Some(datetime!(2024-01-02 03:04:05)))).unwrap(),
            date!(2024 - 01 - 02)
        );
        assert_eq!(
            Time::try_from_value("13:45:10.5".into()).unwrap(),
            time!(13:45:10.5)
        );
        assert_eq!(
            Time::try_from_value("08:30".into()).unwrap(),
            time!(08:30)
        );
        assert_eq!(
            PrimitiveDateTime::try_from_value("2024-01-02T03:04:05".into()).unwrap(),
            datetime!(2024-01-02 03:04:05)
        );
        assert_eq!(
            PrimitiveDateTime::try_from_value("2024-01-02 03:04:05+02:00".into()).unwrap(),
            datetime!(2024-01-02 01:04:05)
        );
        assert_eq!(
            PrimitiveDateTime::try_from_value(Value::Int64(Some(0))).unwrap(),
            datetime!(1970-01-01 00:00:00)
        );
        assert_eq!(
            OffsetDateTime::try_from_value("2024-01-02 03:04:05Z".into()).unwrap(),
            datetime!(2024-01-02 03:04:05 UTC)
        );
        assert_eq!(
            OffsetDateTime::try_from_value("2024-01-02 03:04:05.25-05:30".into()).unwrap(),
            datetime!(2024-01-02 03:04:05.25 -5:30)
        );
        assert!(Date::try_from_value("02/29/2024".into()).is_err());
        assert!(OffsetDateTime::try_from_value("2024-01-02 03:04:05+2".into()).is_err());
    }

    #[test]
    fn value_uuid() {
        let uuid = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(
            Uuid::try_from_value("67e55044-10b1-426f-9247-bb680e5fe0c8".into()).unwrap(),
            uuid
        );
        assert_eq!(
            Uuid::try_from_value(Value::Blob(Some(uuid.as_bytes().as_slice().into()))).unwrap(),
            uuid
        );
        assert!(Uuid::try_from_value("not-a-uuid".into()).is_err());
    }

    #[test]
    fn value_option() {
        assert!(<Option<i32>>::NULLABLE);
        assert!(!<i32>::NULLABLE);
        assert_eq!(<Option<i32>>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(<Option<i32>>::try_from_value(Value::Int32(None)).unwrap(), None);
        assert_eq!(
            <Option<i32>>::try_from_value("5".into()).unwrap(),
            Some(5)
        );
        assert_eq!(None::<String>.as_value(), Value::Varchar(None));
        assert_eq!(<Option<Uuid>>::as_empty_value(), Value::Uuid(None));
    }

    #[test]
    fn value_zero() {
        assert_eq!(Value::Int32(None).zero(), Value::Int32(Some(0)));
        assert_eq!(Value::Varchar(None).zero(), Value::Varchar(Some(String::new())));
        assert_eq!(
            Value::Timestamp(None).zero(),
            Value::Timestamp(Some(PrimitiveDateTime::new(ZERO_DATE, Time::MIDNIGHT)))
        );
        assert_eq!(Value::Uuid(None).zero(), Value::Uuid(Some(Uuid::nil())));
        assert!(Value::Int64(Some(0)).is_zero());
        assert!(!Value::Int64(Some(3)).is_zero());
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Varchar(Some("abc".into())).to_string(), "'abc'");
        assert_eq!(Value::Int32(None).to_string(), "NULL::INTEGER");
        assert_eq!(
            Value::Blob(Some([0xCAu8, 0xFE].into())).to_string(),
            "X'CAFE'"
        );
        let long = "é".repeat(400);
        assert!(Value::Varchar(Some(long)).to_string().ends_with("...'"));
    }

    #[test]
    fn value_coercion() {
        assert_eq!(
            coerce::<i64>(Value::Unknown(Some("7".into()))).unwrap(),
            Value::Int64(Some(7))
        );
        let coercion = coercion_for(&Value::Boolean(None));
        assert_eq!(coercion("1".into()).unwrap(), Value::Boolean(Some(true)));
        let passthrough = coercion_for(&Value::Unknown(None));
        assert_eq!(passthrough("x".into()).unwrap(), Value::Varchar(Some("x".into())));
    }

    #[test]
    fn value_decode_field() {
        let field = FieldDef {
            name: "age",
            ident: "age",
            renamed: false,
            value: Value::Int32(None),
            nullable: false,
            primary_key: false,
            auto_increment: false,
            default_on_insert: false,
        };
        assert_eq!(decode_field::<i32>(&field, None).unwrap(), 0);
        assert_eq!(decode_field::<i32>(&field, Some(Value::Null)).unwrap(), 0);
        let error = decode_field::<i32>(&field, Some("old".into())).unwrap_err();
        let message = format!("{error:#}");
        assert!(message.contains("`age`"), "{message}");
        assert!(message.contains("old"), "{message}");
    }
}
