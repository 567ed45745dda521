mod alignment;
mod operators;
mod recording;
mod records;

pub use alignment::{assert_aligned, placeholders};
pub use recording::*;
pub use records::Account;

use crate::{
    alignment::{alignment, empty_tree, quoted_placeholders},
    operators::{empty_lists, operators, parsed_operators},
    records::records,
};
use log::LevelFilter;
use sluice::Driver;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Dialect agnostic checks every dialect crate runs against its driver.
pub async fn execute_tests<D: Driver>(driver: D) {
    alignment(&driver);
    empty_tree(&driver);
    quoted_placeholders(&driver);
    operators(&driver);
    parsed_operators(&driver);
    empty_lists(&driver);
    records(driver).await;
}
