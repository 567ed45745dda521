use crate::SqlWriter;

/// Backend marker: names a dialect and builds its writer.
pub trait Driver: Send + Sync {
    type SqlWriter: SqlWriter + 'static;

    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}
