use std::fmt::Display;

use serde::Serialize;

pub mod create_index;
pub mod expected_errors;

pub use create_index::{CreateIndex, IndexedColumn, SortOrder};
pub use expected_errors::{ExpectedErrors, ExpectedErrorsBuilder};

/// A generated statement ready for execution, together with the errors the
/// executor may safely ignore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    sql: String,
    expected_errors: ExpectedErrors,
    result_is_fully_deterministic: bool,
    could_affect_schema: bool,
}

/// How the executor should treat an engine error raised by a [Query].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorVerdict<'a> {
    /// Known limitation; the matching signature is attached.
    Expected(&'a str),
    /// Candidate bug.
    Unexpected,
}

impl Query {
    pub fn new(
        sql: String,
        expected_errors: ExpectedErrors,
        result_is_fully_deterministic: bool,
        could_affect_schema: bool,
    ) -> Self {
        Self {
            sql,
            expected_errors,
            result_is_fully_deterministic,
            could_affect_schema,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn expected_errors(&self) -> &ExpectedErrors {
        &self.expected_errors
    }

    pub fn result_is_fully_deterministic(&self) -> bool {
        self.result_is_fully_deterministic
    }

    /// The schema snapshot must be refreshed after executing this query.
    pub fn could_affect_schema(&self) -> bool {
        self.could_affect_schema
    }

    pub fn classify<'a>(&'a self, message: &str) -> ErrorVerdict<'a> {
        match self.expected_errors.find(message) {
            Some(signature) => ErrorVerdict::Expected(signature),
            None => ErrorVerdict::Unexpected,
        }
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql)
    }
}
