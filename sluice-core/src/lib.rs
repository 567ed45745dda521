mod as_value;
mod condition;
mod driver;
mod executor;
mod field;
mod materialize;
mod plan;
mod query;
mod record;
mod registry;
mod table_ref;
mod util;
mod value;
mod writer;

pub use ::anyhow::Context as ErrorContext;
pub use as_value::*;
pub use condition::*;
pub use driver::*;
pub use executor::*;
pub use field::*;
pub use materialize::*;
pub use plan::*;
pub use query::*;
pub use record::*;
pub use registry::*;
pub use table_ref::*;
pub use util::*;
pub use value::*;
pub use writer::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
