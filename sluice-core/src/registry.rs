use crate::{Error, ErrorContext, GenericSqlWriter, Result, SqlWriter, truncate_long};
use std::{
    collections::HashMap,
    fmt::{self, Debug, Formatter},
    sync::Arc,
};
use url::Url;

/// Dialect writers selectable by name or by connection URL scheme.
///
/// ```rust
/// use sluice_core::DialectRegistry;
/// let registry = DialectRegistry::new();
/// assert_eq!(registry.get("generic").unwrap().name(), "generic");
/// assert!(registry.for_url("oracle://localhost/db").is_err());
/// ```
#[derive(Clone)]
pub struct DialectRegistry {
    dialects: HashMap<String, Arc<dyn SqlWriter>>,
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectRegistry {
    /// Registry holding only the generic writer.
    pub fn new() -> Self {
        let mut result = Self {
            dialects: HashMap::new(),
        };
        result.register("generic", Arc::new(GenericSqlWriter::new()));
        result
    }

    /// Register `writer` under `name`, names are case insensitive and the last one wins.
    pub fn register(&mut self, name: &str, writer: Arc<dyn SqlWriter>) -> &mut Self {
        log::debug!("Registering the {} dialect as `{}`", writer.name(), name);
        self.dialects.insert(name.to_ascii_lowercase(), writer);
        self
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn SqlWriter>> {
        self.dialects
            .get(&name.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| {
                Error::msg(format!(
                    "Unknown dialect `{}`, registered: {}",
                    truncate_long!(name),
                    self.names().join(", ")
                ))
            })
    }

    /// Writer for the scheme of a connection URL like `postgres://user@host/db`.
    pub fn for_url(&self, url: &str) -> Result<Arc<dyn SqlWriter>> {
        let parsed = Url::parse(url)
            .with_context(|| format!("Invalid connection URL `{}`", truncate_long!(url)))?;
        self.get(parsed.scheme())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut result = self.dialects.keys().map(String::as_str).collect::<Vec<_>>();
        result.sort_unstable();
        result
    }
}

impl Debug for DialectRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("dialects", &self.names())
            .finish()
    }
}
