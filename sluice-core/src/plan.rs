use crate::{
    AsValue, ErrorContext, FieldDef, Record, Result, Row, RowNames, Value, unqualified_column,
};
use convert_case::{Case, Casing};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::{
    any::{TypeId, type_name},
    sync::{
        Arc, LazyLock,
        atomic::{AtomicU64, Ordering},
    },
};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Converts a non null wire value into the kind of a field.
pub type Coercion = fn(Value) -> Result<Value>;

/// Coercion into the native representation of `T`.
pub fn coerce<T: AsValue>(value: Value) -> Result<Value> {
    T::try_from_value(value).map(AsValue::as_value)
}

fn passthrough(value: Value) -> Result<Value> {
    Ok(value)
}

/// Coercion matching the kind of a type prototype.
pub fn coercion_for(kind: &Value) -> Coercion {
    match kind {
        Value::Null | Value::Unknown(..) => passthrough,
        Value::Boolean(..) => coerce::<bool>,
        Value::Int8(..) => coerce::<i8>,
        Value::Int16(..) => coerce::<i16>,
        Value::Int32(..) => coerce::<i32>,
        Value::Int64(..) => coerce::<i64>,
        Value::UInt8(..) => coerce::<u8>,
        Value::UInt16(..) => coerce::<u16>,
        Value::UInt32(..) => coerce::<u32>,
        Value::UInt64(..) => coerce::<u64>,
        Value::Float32(..) => coerce::<f32>,
        Value::Float64(..) => coerce::<f64>,
        Value::Decimal(..) => coerce::<Decimal>,
        Value::Varchar(..) => coerce::<String>,
        Value::Blob(..) => coerce::<Box<[u8]>>,
        Value::Date(..) => coerce::<Date>,
        Value::Time(..) => coerce::<Time>,
        Value::Timestamp(..) => coerce::<PrimitiveDateTime>,
        Value::TimestampWithTimezone(..) => coerce::<OffsetDateTime>,
        Value::Uuid(..) => coerce::<Uuid>,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanKey {
    pub record: TypeId,
    pub columns: RowNames,
}

/// Destination of one result column.
#[derive(Debug, Clone)]
pub struct ColumnSlot {
    pub column: String,
    /// Index into the record fields, `None` discards the column.
    pub field: Option<usize>,
    pub coercion: Coercion,
}

/// Mapping of a result column signature onto the fields of a record.
#[derive(Debug)]
pub struct ColumnPlan {
    pub columns: RowNames,
    pub slots: Box<[ColumnSlot]>,
    pub fields: &'static [FieldDef],
}

fn snake(value: &str) -> String {
    value.to_case(Case::Snake)
}

impl ColumnPlan {
    pub fn build<R: Record>(columns: RowNames) -> Self {
        Self::build_for(R::fields(), columns)
    }

    /// Matches every column to a field: exact name, then case insensitive, then snake case
    /// folded (against the column name, and the Rust identifier when the name was derived from
    /// it). A `table.` qualifier is ignored and every field is taken at most once.
    pub fn build_for(fields: &'static [FieldDef], columns: RowNames) -> Self {
        let names: Vec<String> = columns
            .iter()
            .map(|v| unqualified_column(v).into_owned())
            .collect();
        let snake_names: Vec<String> = names.iter().map(|v| snake(v)).collect();
        let snake_fields: Vec<(String, Option<String>)> = fields
            .iter()
            .map(|f| (snake(f.name), (!f.renamed).then(|| snake(f.ident))))
            .collect();
        let mut taken = vec![false; fields.len()];
        let mut mapping: Vec<Option<usize>> = vec![None; columns.len()];
        for pass in 0..3 {
            for (i, name) in names.iter().enumerate() {
                if mapping[i].is_some() {
                    continue;
                }
                let found = fields.iter().enumerate().position(|(j, field)| {
                    !taken[j]
                        && match pass {
                            0 => name == field.name,
                            1 => name.eq_ignore_ascii_case(field.name),
                            _ => {
                                snake_names[i] == snake_fields[j].0
                                    || snake_fields[j].1.as_ref() == Some(&snake_names[i])
                            }
                        }
                });
                if let Some(j) = found {
                    taken[j] = true;
                    mapping[i] = Some(j);
                }
            }
        }
        let slots = columns
            .iter()
            .zip(mapping)
            .map(|(column, field)| ColumnSlot {
                column: column.clone(),
                field,
                coercion: field
                    .map(|i| coercion_for(&fields[i].value))
                    .unwrap_or(passthrough),
            })
            .collect();
        Self {
            columns,
            slots,
            fields,
        }
    }

    /// Indexes of the fields no column maps to.
    pub fn unmapped_fields(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.fields.len()).filter(|i| !self.slots.iter().any(|s| s.field == Some(*i)))
    }

    /// Coerces a row into the field values, aligned with `fields`.
    ///
    /// Null becomes the field zero value (`None` for nullable fields), unmapped fields keep
    /// their zero value and unmapped columns are dropped.
    pub fn apply(&self, row: Row) -> Result<Vec<Value>> {
        if row.len() != self.slots.len() {
            return Err(crate::Error::msg(format!(
                "The row has {} values but the plan expects {} columns",
                row.len(),
                self.slots.len()
            )));
        }
        let mut result: Vec<Option<Value>> = vec![None; self.fields.len()];
        for (slot, value) in self.slots.iter().zip(row.into_vec()) {
            let Some(i) = slot.field else {
                continue;
            };
            let field = &self.fields[i];
            result[i] = Some(if value.is_null() {
                field.zero_value()
            } else {
                (slot.coercion)(value).with_context(|| {
                    format!(
                        "Cannot read the column `{}` into the field `{}`",
                        slot.column, field.ident
                    )
                })?
            });
        }
        Ok(result
            .into_iter()
            .zip(self.fields)
            .map(|(v, f)| v.unwrap_or_else(|| f.zero_value()))
            .collect())
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanCacheConfig {
    /// Number of plans after which the cache is reset, unbounded when `None`.
    pub max_entries: Option<usize>,
}

/// Concurrent cache of column plans keyed by record type and column signature.
///
/// Plans are built outside the map and published with a single insert, when two callers race
/// on the same key the first published plan wins and both get it.
#[derive(Debug, Default)]
pub struct PlanCache {
    plans: DashMap<PlanKey, Arc<ColumnPlan>>,
    config: PlanCacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
}

static GLOBAL: LazyLock<Arc<PlanCache>> = LazyLock::new(Default::default);

impl PlanCache {
    pub fn new(config: PlanCacheConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Process wide cache used by `Materializer::global`.
    pub fn global() -> Arc<PlanCache> {
        GLOBAL.clone()
    }

    pub fn config(&self) -> &PlanCacheConfig {
        &self.config
    }

    pub fn plan<R: Record>(&self, columns: &RowNames) -> Arc<ColumnPlan> {
        let key = PlanKey {
            record: TypeId::of::<R>(),
            columns: columns.clone(),
        };
        if let Some(plan) = self.plans.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return plan.value().clone();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let plan = Arc::new(ColumnPlan::build::<R>(columns.clone()));
        log::debug!(
            "Built the column plan of {} for [{}]",
            type_name::<R>(),
            columns.join(", ")
        );
        if let Some(max_entries) = self.config.max_entries {
            if self.plans.len() >= max_entries {
                log::warn!(
                    "The plan cache reached {} entries and will be cleared",
                    max_entries
                );
                self.plans.clear();
            }
        }
        self.plans.entry(key).or_insert(plan).value().clone()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.plans.clear();
    }
}
