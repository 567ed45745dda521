use crate::{ColumnPlan, ErrorContext, PlanCache, Record, Result, RowLabeled};
use std::{any::type_name, sync::Arc};

/// Turns labeled rows into records through the cached column plans.
///
/// ```rust,ignore
/// let users: Vec<User> = Materializer::global().materialize_all(rows)?;
/// ```
#[derive(Debug, Clone)]
pub struct Materializer {
    cache: Arc<PlanCache>,
}

impl Default for Materializer {
    fn default() -> Self {
        Self::global()
    }
}

impl Materializer {
    pub fn new(cache: Arc<PlanCache>) -> Self {
        Self { cache }
    }

    /// Materializer backed by the process wide plan cache.
    pub fn global() -> Self {
        Self::new(PlanCache::global())
    }

    pub fn cache(&self) -> &Arc<PlanCache> {
        &self.cache
    }

    pub fn materialize<R: Record>(&self, row: RowLabeled) -> Result<R> {
        let plan = self.cache.plan::<R>(&row.labels);
        Self::apply(&plan, row)
    }

    /// Materializes every row, the plan is looked up again only when the labels change.
    pub fn materialize_all<R: Record>(
        &self,
        rows: impl IntoIterator<Item = Result<RowLabeled>>,
    ) -> Result<Vec<R>> {
        let mut plan: Option<Arc<ColumnPlan>> = None;
        rows.into_iter()
            .map(|row| {
                let row = row?;
                let reusable = plan
                    .as_ref()
                    .filter(|v| Arc::ptr_eq(&v.columns, &row.labels) || v.columns == row.labels)
                    .cloned();
                let current = match reusable {
                    Some(v) => v,
                    None => {
                        let v = self.cache.plan::<R>(&row.labels);
                        plan = Some(v.clone());
                        v
                    }
                };
                Self::apply(&current, row)
            })
            .collect()
    }

    /// First row materialized, `None` when there are no rows.
    pub fn materialize_first<R: Record>(
        &self,
        rows: impl IntoIterator<Item = Result<RowLabeled>>,
    ) -> Result<Option<R>> {
        rows.into_iter()
            .next()
            .map(|row| self.materialize(row?))
            .transpose()
    }

    fn apply<R: Record>(plan: &ColumnPlan, row: RowLabeled) -> Result<R> {
        plan.apply(row.values)
            .and_then(R::from_values)
            .with_context(|| format!("While materializing a row into {}", type_name::<R>()))
    }
}
