use sluice::{
    Driver, Error, Executor, Query, QueryResult, Result, RowLabeled, RowNames, RowsAffected,
    Value,
    stream::{self, Stream},
};
use std::collections::VecDeque;

/// Executor that records every query and answers with scripted results, in order.
///
/// A query with no scripted answer produces an empty stream.
#[derive(Debug)]
pub struct RecordingExecutor<D: Driver> {
    driver: D,
    queries: Vec<Query>,
    responses: VecDeque<Result<Vec<QueryResult>>>,
}

impl<D: Driver> RecordingExecutor<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            queries: Vec::new(),
            responses: VecDeque::new(),
        }
    }

    pub fn respond(&mut self, results: Vec<QueryResult>) -> &mut Self {
        self.responses.push_back(Ok(results));
        self
    }

    /// Answer the next query with rows sharing the same labels.
    pub fn respond_rows(&mut self, labels: &[&str], rows: Vec<Vec<Value>>) -> &mut Self {
        let labels: RowNames = labels.iter().map(|v| v.to_string()).collect();
        self.respond(
            rows.into_iter()
                .map(|v| QueryResult::Row(RowLabeled::new(labels.clone(), v.into())))
                .collect(),
        )
    }

    pub fn respond_affected(
        &mut self,
        rows_affected: u64,
        last_affected_id: Option<i64>,
    ) -> &mut Self {
        self.respond(vec![QueryResult::Affected(RowsAffected {
            rows_affected,
            last_affected_id,
        })])
    }

    pub fn respond_error(&mut self, message: &str) -> &mut Self {
        self.responses.push_back(Err(Error::msg(message.to_string())));
        self
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn last_query(&self) -> Option<&Query> {
        self.queries.last()
    }

    pub fn take_queries(&mut self) -> Vec<Query> {
        std::mem::take(&mut self.queries)
    }
}

impl<D: Driver> Executor for RecordingExecutor<D> {
    type Driver = D;

    fn driver(&self) -> &Self::Driver {
        &self.driver
    }

    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        log::debug!("[{}] {}", D::NAME, query);
        self.queries.push(query);
        let results: Vec<Result<QueryResult>> = match self.responses.pop_front() {
            Some(Ok(results)) => results.into_iter().map(Ok).collect(),
            Some(Err(e)) => vec![Err(e)],
            None => Vec::new(),
        };
        stream::iter(results)
    }
}
