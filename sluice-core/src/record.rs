use crate::{
    AsValue, Condition, Driver, Error, Executor, FieldDef, Linkage, Materializer, Operator,
    Ordered, Result, RowLabeled, RowsAffected, Select, SqlWriter, TableRef, Value,
    stream::{StreamExt, TryStreamExt},
};
use log::Level;
use std::future::Future;

/// Statically declared destination of result rows, usually implemented through
/// `#[derive(Record)]`.
///
/// The required methods describe the table and move the record in and out of field values,
/// the provided ones render the statements and run them through an [`Executor`].
pub trait Record: Sized + Send + 'static {
    fn table_ref() -> &'static TableRef;

    fn fields() -> &'static [FieldDef];

    /// Builds the record from values aligned with [`Record::fields`].
    fn from_values(values: Vec<Value>) -> Result<Self>;

    /// Field values aligned with [`Record::fields`].
    fn to_values(&self) -> Vec<Value>;

    fn column_names() -> Vec<&'static str> {
        Self::fields().iter().map(|v| v.name).collect()
    }

    fn primary_key_defs() -> impl Iterator<Item = &'static FieldDef> {
        Self::fields().iter().filter(|v| v.primary_key)
    }

    fn primary_key_values(&self) -> Vec<Value> {
        Self::fields()
            .iter()
            .zip(self.to_values())
            .filter(|(f, _)| f.primary_key)
            .map(|(_, v)| v)
            .collect()
    }

    /// Equality on every primary key column, it fails when the record declares no primary key
    /// so that no statement ends up unfiltered.
    fn primary_key_condition(values: &[Value]) -> Result<Condition> {
        let keys = Self::primary_key_defs().collect::<Vec<_>>();
        if keys.is_empty() {
            return Err(Error::msg(format!(
                "Table `{}` has no primary key",
                Self::table_ref().full_name()
            )));
        }
        if keys.len() != values.len() {
            return Err(Error::msg(format!(
                "Table `{}` has {} primary key columns but {} values were provided",
                Self::table_ref().full_name(),
                keys.len(),
                values.len()
            )));
        }
        keys.into_iter()
            .zip(values)
            .try_fold(Condition::new(), |condition, (field, value)| {
                condition.push(Linkage::And, field.name, Operator::Eq, vec![value.clone()])
            })
    }

    /// Columns of an `INSERT`, leaving out the ones the database fills.
    fn insert_values(&self) -> Vec<(&'static str, Value)> {
        Self::fields()
            .iter()
            .zip(self.to_values())
            .filter(|(f, v)| !f.omitted_on_insert(v))
            .map(|(f, v)| (f.name, v))
            .collect()
    }

    /// Columns of an `UPDATE`, primary keys are never set.
    fn update_values(&self) -> Vec<(&'static str, Value)> {
        Self::fields()
            .iter()
            .zip(self.to_values())
            .filter(|(f, _)| !f.primary_key)
            .map(|(f, v)| (f.name, v))
            .collect()
    }

    fn from_row(materializer: &Materializer, row: RowLabeled) -> Result<Self> {
        materializer.materialize(row)
    }

    /// Insert the record, `last_affected_id` holds the generated key when there is one.
    fn insert_one<Exec: Executor>(
        &self,
        executor: &mut Exec,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let writer = executor.driver().sql_writer();
        let returning = Self::fields()
            .iter()
            .filter(|v| v.auto_increment)
            .map(|v| v.name)
            .collect::<Vec<_>>();
        let fetch = writer.returns_generated_key() && !returning.is_empty();
        let query = writer.render_insert(Self::table_ref(), &self.insert_values(), &returning);
        async move {
            let query = query?;
            if !fetch {
                return executor.execute(query).await;
            }
            let rows = executor.fetch(query).try_collect::<Vec<_>>().await?;
            let last_affected_id = rows
                .first()
                .and_then(|row| row.values.first())
                .filter(|v| !v.is_null())
                .map(|v| i64::try_from_value(v.clone()))
                .transpose()?;
            Ok(RowsAffected {
                rows_affected: rows.len() as u64,
                last_affected_id,
            })
        }
    }

    /// Insert many records with a single statement.
    ///
    /// The rows share one column list: a column is left to the database only when every
    /// record would leave it out on its own (see [`Record::insert_one`]).
    fn insert_many<'a, Exec, It>(
        executor: &mut Exec,
        records: It,
    ) -> impl Future<Output = Result<RowsAffected>> + Send
    where
        Exec: Executor,
        It: IntoIterator<Item = &'a Self>,
    {
        let writer = executor.driver().sql_writer();
        let fields = Self::fields();
        let values = records
            .into_iter()
            .map(Self::to_values)
            .collect::<Vec<_>>();
        let kept = fields
            .iter()
            .enumerate()
            .map(|(i, f)| {
                values.is_empty()
                    || values
                        .iter()
                        .any(|row| row.get(i).is_some_and(|v| !f.omitted_on_insert(v)))
            })
            .collect::<Vec<_>>();
        let columns = fields
            .iter()
            .zip(&kept)
            .filter(|(_, kept)| **kept)
            .map(|(f, _)| f.name)
            .collect::<Vec<_>>();
        let rows = values
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&kept)
                    .filter(|(_, kept)| **kept)
                    .map(|(v, _)| v)
                    .collect()
            })
            .collect::<Vec<_>>();
        let query = writer.render_insert_many(Self::table_ref(), &columns, &rows);
        async move { executor.execute(query?).await }
    }

    fn find_pk<Exec: Executor>(
        executor: &mut Exec,
        primary_key: &[Value],
    ) -> impl Future<Output = Result<Option<Self>>> + Send {
        Self::find_pk_with(executor, Materializer::global(), primary_key)
    }

    /// Same as [`Record::find_pk`], the rows go through `materializer` and its plan cache.
    fn find_pk_with<Exec: Executor>(
        executor: &mut Exec,
        materializer: Materializer,
        primary_key: &[Value],
    ) -> impl Future<Output = Result<Option<Self>>> + Send {
        let condition = Self::primary_key_condition(primary_key);
        let query = condition.and_then(|condition| {
            executor.driver().sql_writer().render_select(
                &Select::new(Self::table_ref())
                    .fields(&Self::column_names())
                    .condition(&condition)
                    .limit(1),
            )
        });
        async move {
            let rows = executor.fetch(query?).collect::<Vec<_>>().await;
            materializer.materialize_first(rows)
        }
    }

    fn find_one<Exec: Executor>(
        executor: &mut Exec,
        condition: &Condition,
    ) -> impl Future<Output = Result<Option<Self>>> + Send {
        Self::find_one_with(executor, Materializer::global(), condition)
    }

    fn find_one_with<Exec: Executor>(
        executor: &mut Exec,
        materializer: Materializer,
        condition: &Condition,
    ) -> impl Future<Output = Result<Option<Self>>> + Send {
        let query = executor.driver().sql_writer().render_select(
            &Select::new(Self::table_ref())
                .fields(&Self::column_names())
                .condition(condition)
                .limit(1),
        );
        async move {
            let rows = executor.fetch(query?).collect::<Vec<_>>().await;
            materializer.materialize_first(rows)
        }
    }

    fn find_many<Exec: Executor>(
        executor: &mut Exec,
        condition: &Condition,
        order_by: &[Ordered],
        limit: Option<u64>,
    ) -> impl Future<Output = Result<Vec<Self>>> + Send {
        Self::find_many_with(executor, Materializer::global(), condition, order_by, limit)
    }

    fn find_many_with<Exec: Executor>(
        executor: &mut Exec,
        materializer: Materializer,
        condition: &Condition,
        order_by: &[Ordered],
        limit: Option<u64>,
    ) -> impl Future<Output = Result<Vec<Self>>> + Send {
        let columns = Self::column_names();
        let select = Select {
            limit,
            ..Select::new(Self::table_ref())
                .fields(&columns)
                .condition(condition)
                .order_by(order_by)
        };
        let query = executor.driver().sql_writer().render_select(&select);
        async move {
            let rows = executor.fetch(query?).collect::<Vec<_>>().await;
            materializer.materialize_all(rows)
        }
    }

    fn count<Exec: Executor>(
        executor: &mut Exec,
        condition: &Condition,
    ) -> impl Future<Output = Result<u64>> + Send {
        let query = executor
            .driver()
            .sql_writer()
            .render_count(Self::table_ref(), Some(condition));
        async move {
            let rows = executor.fetch(query?).try_collect::<Vec<_>>().await?;
            match rows.into_iter().next().and_then(|v| v.values.into_vec().into_iter().next()) {
                Some(value) => u64::try_from_value(value),
                None => Err(Error::msg(format!(
                    "The count of `{}` returned no rows",
                    Self::table_ref().full_name()
                ))),
            }
        }
    }

    /// Update every non key column of the row identified by the primary key.
    fn update<Exec: Executor>(
        &self,
        executor: &mut Exec,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let query = Self::primary_key_condition(&self.primary_key_values()).and_then(|condition| {
            executor.driver().sql_writer().render_update(
                Self::table_ref(),
                &self.update_values(),
                Some(&condition),
            )
        });
        async move { executor.execute(query?).await }
    }

    /// Insert the record or overwrite the row with the same primary key.
    fn save<Exec: Executor>(
        &self,
        executor: &mut Exec,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let primary_key = Self::primary_key_defs().map(|v| v.name).collect::<Vec<_>>();
        let query = executor.driver().sql_writer().render_upsert(
            Self::table_ref(),
            &self.insert_values(),
            &primary_key,
        );
        async move { executor.execute(query?).await }
    }

    /// Delete the row identified by the primary key, it must affect exactly one row.
    fn delete<Exec: Executor>(&self, executor: &mut Exec) -> impl Future<Output = Result<()>> + Send {
        let query = Self::primary_key_condition(&self.primary_key_values()).and_then(|condition| {
            executor
                .driver()
                .sql_writer()
                .render_delete(Self::table_ref(), Some(&condition))
        });
        async move {
            let result = executor.execute(query?).await?;
            if result.rows_affected == 1 {
                return Ok(());
            }
            let error = Error::msg(format!(
                "The query deleted {} rows instead of the expected 1",
                result.rows_affected
            ));
            log::log!(
                if result.rows_affected == 0 {
                    Level::Info
                } else {
                    Level::Error
                },
                "{}",
                error
            );
            Err(error)
        }
    }

    /// Delete the rows matching `condition`, an empty condition is refused: use
    /// [`Record::delete_all`].
    fn delete_many<Exec: Executor>(
        executor: &mut Exec,
        condition: &Condition,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let query = if condition.is_empty() {
            Err(Error::msg(format!(
                "Refusing to delete every row of `{}` from an empty condition",
                Self::table_ref().full_name()
            )))
        } else {
            executor
                .driver()
                .sql_writer()
                .render_delete(Self::table_ref(), Some(condition))
        };
        async move { executor.execute(query?).await }
    }

    fn delete_all<Exec: Executor>(
        executor: &mut Exec,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let query = executor
            .driver()
            .sql_writer()
            .render_delete(Self::table_ref(), None);
        async move { executor.execute(query?).await }
    }
}
