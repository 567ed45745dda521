use crate::{Error, Result, Value, truncate_long};
use anyhow::Context;
use atoi::{FromRadix10Checked, FromRadix10SignedChecked};
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use std::{any, borrow::Cow, str};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset, format_description::FormatItem,
    macros::format_description,
};
use uuid::Uuid;

/// Value conversion and parsing utilities. It is the central abstraction used to move between
/// native Rust types and the dynamically typed [`Value`] representation that backs query
/// arguments and row decoding.
///
/// # Conversion contract
/// `try_from_value` is total over the representations a driver can hand back for a kind:
/// - the canonical variant (e.g. `Value::Int32` for `i32`);
/// - alternate numeric widths, range checked;
/// - textual (`Varchar`, `Unknown`) and byte buffer (`Blob`) encodings, through [`AsValue::parse`].
///
/// Errors include the offending value and the destination type name.
///
/// # Examples
/// ```rust
/// use sluice_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i64 = AsValue::try_from_value(Value::Varchar(Some("42".into()))).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// Whether `None`/NULL is a legal value of this type.
    const NULLABLE: bool = false;
    /// Return the payload-less variant of this type, used as the type prototype.
    fn as_empty_value() -> Value;
    /// Convert this value into its owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Parse a full string into `Self`.
    fn parse(input: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::msg(format!(
            "Cannot parse `{}` as {}",
            truncate_long!(input.as_ref()),
            any::type_name::<Self>()
        )))
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn conversion_error<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {} to {}",
        value,
        any::type_name::<T>()
    ))
}

fn utf8<T>(bytes: &[u8]) -> Result<&str> {
    str::from_utf8(bytes).with_context(|| {
        format!(
            "Byte buffer of length {} is not valid UTF-8 text, cannot read it as {}",
            bytes.len(),
            any::type_name::<T>()
        )
    })
}

fn parse_decimal(input: &str) -> Option<Decimal> {
    let input = input.trim();
    input
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(input).ok())
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path, $radix:ident, $parse_radix:ident) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            #[allow(unreachable_patterns)]
            fn try_from_value(value: Value) -> Result<Self> {
                let out_of_range = |v: &dyn std::fmt::Display| {
                    Error::msg(format!(
                        "Value {v} is out of range for {}",
                        any::type_name::<Self>()
                    ))
                };
                match value {
                    $destination(Some(v)) => Ok(v),
                    Value::Int8(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range(&v)),
                    Value::Int16(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range(&v)),
                    Value::Int32(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range(&v)),
                    Value::Int64(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range(&v)),
                    Value::UInt8(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range(&v)),
                    Value::UInt16(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range(&v)),
                    Value::UInt32(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range(&v)),
                    Value::UInt64(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range(&v)),
                    Value::Boolean(Some(v)) => Ok(v as $source),
                    Value::Float32(Some(v)) => Self::try_from_value(Value::Float64(Some(v as f64))),
                    Value::Float64(Some(v)) => {
                        if v.fract() != 0.0
                            || v < <$source>::MIN as f64
                            // `MAX as f64` rounds up to the next power of two for the wide types
                            || v >= <$source>::MAX as f64 + 1.0
                        {
                            return Err(out_of_range(&v));
                        }
                        Ok(v as $source)
                    }
                    Value::Decimal(Some(v), ..) => {
                        if !v.is_integer() {
                            return Err(Error::msg(format!(
                                "Value {v}: Decimal is not an integer, cannot convert it to {}",
                                any::type_name::<Self>()
                            )));
                        }
                        v.to_i128()
                            .and_then(|i| <$source>::try_from(i).ok())
                            .ok_or_else(|| out_of_range(&v))
                    }
                    Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                        <Self as AsValue>::parse(v)
                    }
                    Value::Blob(Some(ref v)) => <Self as AsValue>::parse(utf8::<Self>(v)?),
                    _ => Err(conversion_error::<Self>(&value)),
                }
            }
            fn parse(input: impl AsRef<str>) -> Result<Self> {
                let value = input.as_ref().trim();
                let (result, consumed) = <$source as $radix>::$parse_radix(value.as_bytes());
                match result {
                    Some(v) if consumed == value.len() && value.bytes().any(|b| b.is_ascii_digit()) => {
                        Ok(v)
                    }
                    // Text encoded numerics like `7.00` are accepted when integral
                    _ => parse_decimal(value)
                        .filter(Decimal::is_integer)
                        .and_then(|v| v.to_i128())
                        .and_then(|v| <$source>::try_from(v).ok())
                        .ok_or_else(|| {
                            Error::msg(format!(
                                "Cannot parse `{}` as {}",
                                truncate_long!(value),
                                any::type_name::<Self>()
                            ))
                        }),
                }
            }
        }
    };
}

impl_as_value_integer!(i8, Value::Int8, FromRadix10SignedChecked, from_radix_10_signed_checked);
impl_as_value_integer!(i16, Value::Int16, FromRadix10SignedChecked, from_radix_10_signed_checked);
impl_as_value_integer!(i32, Value::Int32, FromRadix10SignedChecked, from_radix_10_signed_checked);
impl_as_value_integer!(i64, Value::Int64, FromRadix10SignedChecked, from_radix_10_signed_checked);
impl_as_value_integer!(u8, Value::UInt8, FromRadix10Checked, from_radix_10_checked);
impl_as_value_integer!(u16, Value::UInt16, FromRadix10Checked, from_radix_10_checked);
impl_as_value_integer!(u32, Value::UInt32, FromRadix10Checked, from_radix_10_checked);
impl_as_value_integer!(u64, Value::UInt64, FromRadix10Checked, from_radix_10_checked);

macro_rules! impl_as_value_float {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            #[allow(unreachable_patterns)]
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v),
                    Value::Float32(Some(v)) => Ok(v as _),
                    Value::Float64(Some(v)) => Ok(v as _),
                    Value::Int8(Some(v)) => Ok(v as _),
                    Value::Int16(Some(v)) => Ok(v as _),
                    Value::Int32(Some(v)) => Ok(v as _),
                    Value::Int64(Some(v)) => Ok(v as _),
                    Value::UInt8(Some(v)) => Ok(v as _),
                    Value::UInt16(Some(v)) => Ok(v as _),
                    Value::UInt32(Some(v)) => Ok(v as _),
                    Value::UInt64(Some(v)) => Ok(v as _),
                    Value::Boolean(Some(v)) => Ok(if v { 1.0 } else { 0.0 }),
                    Value::Decimal(Some(v), ..) => v.to_f64().map(|v| v as _).ok_or_else(|| {
                        Error::msg(format!(
                            "Value {v}: Decimal does not fit into {}",
                            any::type_name::<Self>()
                        ))
                    }),
                    Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                        <Self as AsValue>::parse(v)
                    }
                    Value::Blob(Some(ref v)) => <Self as AsValue>::parse(utf8::<Self>(v)?),
                    _ => Err(conversion_error::<Self>(&value)),
                }
            }
            fn parse(input: impl AsRef<str>) -> Result<Self> {
                let value = input.as_ref().trim();
                fast_float::parse::<$source, _>(value).map_err(|_| {
                    Error::msg(format!(
                        "Cannot parse `{}` as {}",
                        truncate_long!(value),
                        any::type_name::<Self>()
                    ))
                })
            }
        }
    };
}

impl_as_value_float!(f32, Value::Float32);
impl_as_value_float!(f64, Value::Float64);

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(Some(v)) => Ok(v),
            Value::Int8(Some(v)) => Ok(v != 0),
            Value::Int16(Some(v)) => Ok(v != 0),
            Value::Int32(Some(v)) => Ok(v != 0),
            Value::Int64(Some(v)) => Ok(v != 0),
            Value::UInt8(Some(v)) => Ok(v != 0),
            Value::UInt16(Some(v)) => Ok(v != 0),
            Value::UInt32(Some(v)) => Ok(v != 0),
            Value::UInt64(Some(v)) => Ok(v != 0),
            Value::Decimal(Some(v), ..) if v.is_integer() => Ok(!v.is_zero()),
            Value::Float64(Some(v)) if v.fract() == 0.0 => Ok(v != 0.0),
            Value::Float32(Some(v)) if v.fract() == 0.0 => Ok(v != 0.0),
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                <Self as AsValue>::parse(v)
            }
            // BIT(1) columns arrive as a single raw byte
            Value::Blob(Some(ref v)) if v.len() == 1 && v[0] <= 1 => Ok(v[0] == 1),
            Value::Blob(Some(ref v)) => <Self as AsValue>::parse(utf8::<Self>(v)?),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let value = input.as_ref().trim();
        const TRUE: [&str; 6] = ["1", "t", "true", "y", "yes", "on"];
        const FALSE: [&str; 6] = ["0", "f", "false", "n", "no", "off"];
        if TRUE.iter().any(|v| v.eq_ignore_ascii_case(value)) {
            Ok(true)
        } else if FALSE.iter().any(|v| v.eq_ignore_ascii_case(value)) {
            Ok(false)
        } else {
            Err(Error::msg(format!(
                "Cannot parse `{}` as bool",
                truncate_long!(value)
            )))
        }
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None, 0, 0)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self), 0, 0)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let error = || conversion_error::<Self>(&value);
        match value {
            Value::Decimal(Some(v), ..) => Ok(v),
            Value::Int8(Some(v)) => Ok(v.into()),
            Value::Int16(Some(v)) => Ok(v.into()),
            Value::Int32(Some(v)) => Ok(v.into()),
            Value::Int64(Some(v)) => Ok(v.into()),
            Value::UInt8(Some(v)) => Ok(v.into()),
            Value::UInt16(Some(v)) => Ok(v.into()),
            Value::UInt32(Some(v)) => Ok(v.into()),
            Value::UInt64(Some(v)) => Ok(v.into()),
            Value::Float32(Some(v)) => Decimal::from_f32(v).ok_or_else(error),
            Value::Float64(Some(v)) => Decimal::from_f64(v).ok_or_else(error),
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                <Self as AsValue>::parse(v)
            }
            Value::Blob(Some(ref v)) => <Self as AsValue>::parse(utf8::<Self>(v)?),
            _ => Err(error()),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        parse_decimal(input.as_ref()).ok_or_else(|| {
            Error::msg(format!(
                "Cannot parse `{}` as Decimal",
                truncate_long!(input.as_ref())
            ))
        })
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(match value {
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => v,
            Value::Blob(Some(v)) => String::from_utf8(v.into_vec())
                .context("Byte buffer is not valid UTF-8 text, cannot read it as String")?,
            Value::Boolean(Some(v)) => v.to_string(),
            Value::Int8(Some(v)) => itoa::Buffer::new().format(v).into(),
            Value::Int16(Some(v)) => itoa::Buffer::new().format(v).into(),
            Value::Int32(Some(v)) => itoa::Buffer::new().format(v).into(),
            Value::Int64(Some(v)) => itoa::Buffer::new().format(v).into(),
            Value::UInt8(Some(v)) => itoa::Buffer::new().format(v).into(),
            Value::UInt16(Some(v)) => itoa::Buffer::new().format(v).into(),
            Value::UInt32(Some(v)) => itoa::Buffer::new().format(v).into(),
            Value::UInt64(Some(v)) => itoa::Buffer::new().format(v).into(),
            Value::Float32(Some(v)) => ryu::Buffer::new().format(v).into(),
            Value::Float64(Some(v)) => ryu::Buffer::new().format(v).into(),
            Value::Decimal(Some(v), ..) => v.to_string(),
            Value::Date(Some(v)) => format_date(&v),
            Value::Time(Some(v)) => format_time(&v),
            Value::Timestamp(Some(v)) => format_timestamp(&v),
            Value::TimestampWithTimezone(Some(v)) => format_timestamptz(&v),
            Value::Uuid(Some(v)) => v.hyphenated().to_string(),
            _ => return Err(conversion_error::<Self>(&value)),
        })
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        Ok(input.as_ref().into())
    }
}

impl AsValue for Cow<'static, str> {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.into_owned()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        String::try_from_value(value).map(Cow::Owned)
    }
}

impl AsValue for Box<[u8]> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v),
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => Ok(v.into_bytes().into()),
            Value::Uuid(Some(v)) => Ok(v.as_bytes().as_slice().into()),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
}

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into_boxed_slice()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        <Box<[u8]>>::try_from_value(value).map(Into::into)
    }
}

static DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
static TIME_FORMATS: &[&[FormatItem<'static>]] = &[
    format_description!("[hour]:[minute]:[second].[subsecond]"),
    format_description!("[hour]:[minute]:[second]"),
    format_description!("[hour]:[minute]"),
];
static TIMESTAMP_FORMATS: &[&[FormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
];

pub(crate) fn format_date(value: &Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        value.year(),
        value.month() as u8,
        value.day()
    )
}

pub(crate) fn format_time(value: &Time) -> String {
    let mut result = format!(
        "{:02}:{:02}:{:02}",
        value.hour(),
        value.minute(),
        value.second()
    );
    let mut subsecond = value.nanosecond();
    if subsecond != 0 {
        let mut width = 9;
        while subsecond % 10 == 0 {
            subsecond /= 10;
            width -= 1;
        }
        result.push_str(&format!(".{:0width$}", subsecond));
    }
    result
}

pub(crate) fn format_timestamp(value: &PrimitiveDateTime) -> String {
    format!(
        "{} {}",
        format_date(&value.date()),
        format_time(&value.time())
    )
}

pub(crate) fn format_timestamptz(value: &OffsetDateTime) -> String {
    let offset = value.offset();
    let (h, m, _) = offset.as_hms();
    format!(
        "{} {}{}{:02}:{:02}",
        format_date(&value.date()),
        format_time(&value.time()),
        if offset.is_negative() { '-' } else { '+' },
        h.unsigned_abs(),
        m.unsigned_abs()
    )
}

/// Splits `2024-01-02 03:04:05+02:00` into the local part and its offset, `Z` meaning UTC.
fn split_offset(value: &str) -> Result<(&str, Option<UtcOffset>)> {
    if let Some(local) = value.strip_suffix(['Z', 'z']) {
        return Ok((local.trim_end(), Some(UtcOffset::UTC)));
    }
    // The offset sign can only appear after the time separator
    let Some(position) = value
        .char_indices()
        .skip(10)
        .find(|(_, c)| *c == '+' || *c == '-')
        .map(|(i, _)| i)
    else {
        return Ok((value, None));
    };
    let (local, offset) = value.split_at(position);
    let negative = offset.starts_with('-');
    let digits = offset[1..].replace(':', "");
    let parse = |v: &str| -> Result<i8> {
        v.parse::<i8>()
            .with_context(|| format!("Invalid time zone offset `{offset}`"))
    };
    let (hours, minutes) = match digits.len() {
        2 => (parse(&digits)?, 0),
        4 => (parse(&digits[..2])?, parse(&digits[2..])?),
        _ => return Err(Error::msg(format!("Invalid time zone offset `{offset}`"))),
    };
    let sign = if negative { -1 } else { 1 };
    let offset = UtcOffset::from_hms(sign * hours, sign * minutes, 0)
        .with_context(|| format!("Invalid time zone offset `{offset}`"))?;
    Ok((local.trim_end(), Some(offset)))
}

fn parse_local_timestamp(value: &str) -> Option<PrimitiveDateTime> {
    let normalized: Cow<str> = match value.as_bytes().get(10) {
        Some(b'T') | Some(b't') => {
            let mut v = value.to_owned();
            v.replace_range(10..11, " ");
            v.into()
        }
        _ => value.into(),
    };
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|f| PrimitiveDateTime::parse(&normalized, f).ok())
        .or_else(|| {
            Date::parse(&normalized, DATE_FORMAT)
                .ok()
                .map(|d| d.midnight())
        })
}

fn from_unix<T>(seconds: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(seconds).with_context(|| {
        format!(
            "Unix timestamp {seconds} is out of range for {}",
            any::type_name::<T>()
        )
    })
}

impl AsValue for Date {
    fn as_empty_value() -> Value {
        Value::Date(None)
    }
    fn as_value(self) -> Value {
        Value::Date(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.date()),
            Value::TimestampWithTimezone(Some(v)) => Ok(v.date()),
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                <Self as AsValue>::parse(v)
            }
            Value::Blob(Some(ref v)) => <Self as AsValue>::parse(utf8::<Self>(v)?),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let value = input.as_ref().trim();
        Date::parse(value, DATE_FORMAT)
            .ok()
            .or_else(|| {
                split_offset(value)
                    .ok()
                    .and_then(|(local, _)| parse_local_timestamp(local))
                    .map(|v| v.date())
            })
            .ok_or_else(|| {
                Error::msg(format!(
                    "Cannot parse `{}` as Date",
                    truncate_long!(value)
                ))
            })
    }
}

impl AsValue for Time {
    fn as_empty_value() -> Value {
        Value::Time(None)
    }
    fn as_value(self) -> Value {
        Value::Time(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Time(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.time()),
            Value::TimestampWithTimezone(Some(v)) => Ok(v.time()),
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                <Self as AsValue>::parse(v)
            }
            Value::Blob(Some(ref v)) => <Self as AsValue>::parse(utf8::<Self>(v)?),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let value = input.as_ref().trim();
        TIME_FORMATS
            .iter()
            .find_map(|f| Time::parse(value, f).ok())
            .ok_or_else(|| {
                Error::msg(format!(
                    "Cannot parse `{}` as Time",
                    truncate_long!(value)
                ))
            })
    }
}

impl AsValue for PrimitiveDateTime {
    fn as_empty_value() -> Value {
        Value::Timestamp(None)
    }
    fn as_value(self) -> Value {
        Value::Timestamp(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(Some(v)) => Ok(v),
            Value::TimestampWithTimezone(Some(v)) => {
                let v = v.to_offset(UtcOffset::UTC);
                Ok(PrimitiveDateTime::new(v.date(), v.time()))
            }
            Value::Date(Some(v)) => Ok(v.midnight()),
            Value::Int32(Some(v)) => Self::try_from_value(Value::Int64(Some(v as _))),
            Value::UInt32(Some(v)) => Self::try_from_value(Value::Int64(Some(v as _))),
            Value::Int64(Some(v)) => {
                let v = from_unix::<Self>(v)?;
                Ok(PrimitiveDateTime::new(v.date(), v.time()))
            }
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                <Self as AsValue>::parse(v)
            }
            Value::Blob(Some(ref v)) => <Self as AsValue>::parse(utf8::<Self>(v)?),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let value = input.as_ref().trim();
        let error = || {
            Error::msg(format!(
                "Cannot parse `{}` as PrimitiveDateTime",
                truncate_long!(value)
            ))
        };
        let (local, offset) = split_offset(value)?;
        let result = parse_local_timestamp(local).ok_or_else(error)?;
        Ok(match offset {
            Some(offset) => {
                let utc = result.assume_offset(offset).to_offset(UtcOffset::UTC);
                PrimitiveDateTime::new(utc.date(), utc.time())
            }
            None => result,
        })
    }
}

impl AsValue for OffsetDateTime {
    fn as_empty_value() -> Value {
        Value::TimestampWithTimezone(None)
    }
    fn as_value(self) -> Value {
        Value::TimestampWithTimezone(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::TimestampWithTimezone(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
            Value::Date(Some(v)) => Ok(v.midnight().assume_utc()),
            Value::Int32(Some(v)) => from_unix::<Self>(v as _),
            Value::UInt32(Some(v)) => from_unix::<Self>(v as _),
            Value::Int64(Some(v)) => from_unix::<Self>(v),
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                <Self as AsValue>::parse(v)
            }
            Value::Blob(Some(ref v)) => <Self as AsValue>::parse(utf8::<Self>(v)?),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let value = input.as_ref().trim();
        let (local, offset) = split_offset(value)?;
        let result = parse_local_timestamp(local).ok_or_else(|| {
            Error::msg(format!(
                "Cannot parse `{}` as OffsetDateTime",
                truncate_long!(value)
            ))
        })?;
        Ok(result.assume_offset(offset.unwrap_or(UtcOffset::UTC)))
    }
}

impl AsValue for Uuid {
    fn as_empty_value() -> Value {
        Value::Uuid(None)
    }
    fn as_value(self) -> Value {
        Value::Uuid(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                <Self as AsValue>::parse(v)
            }
            Value::Blob(Some(ref v)) if v.len() == 16 => {
                Uuid::from_slice(v).context("Cannot read a 16 bytes buffer as Uuid")
            }
            Value::Blob(Some(ref v)) => <Self as AsValue>::parse(utf8::<Self>(v)?),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let value = input.as_ref().trim();
        Uuid::parse_str(value)
            .with_context(|| format!("Cannot parse `{}` as Uuid", truncate_long!(value)))
    }
}

impl<T: AsValue> AsValue for Option<T> {
    const NULLABLE: bool = true;
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        T::parse(input).map(Some)
    }
}

impl<T: AsValue> AsValue for Box<T> {
    const NULLABLE: bool = T::NULLABLE;
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        (*self).as_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        T::try_from_value(value).map(Box::new)
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        T::parse(input).map(Box::new)
    }
}
