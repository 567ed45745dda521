mod context;
mod select;
mod sql_writer;

pub use context::*;
pub use select::*;
pub use sql_writer::*;
