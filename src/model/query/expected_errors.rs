//! Error messages that are known to be benign for a generated statement.
//!
//! Signatures are plain substrings: an engine error is expected when its
//! message contains any of them.

use indexmap::IndexSet;
use serde::Serialize;

pub const PARSER_STACK_OVERFLOW: &str =
    "[SQLITE_ERROR] SQL error or missing database (parser stack overflow)";
pub const SUBQUERY_IN_INDEX: &str = "subqueries prohibited in index expressions";
pub const SUBQUERY_IN_PARTIAL_INDEX: &str =
    "subqueries prohibited in partial index WHERE clauses";
pub const NON_DETERMINISTIC_TIME: &str = "non-deterministic use of time() in an index";
pub const NON_DETERMINISTIC_STRFTIME: &str = "non-deterministic use of strftime() in an index";
pub const NON_DETERMINISTIC_JULIANDAY: &str =
    "non-deterministic use of julianday() in an index";
pub const NON_DETERMINISTIC_DATE: &str = "non-deterministic use of date() in an index";
pub const NON_DETERMINISTIC_DATETIME: &str = "non-deterministic use of datetime() in an index";
/// Single-quoted strings are sometimes resolved as column names.
pub const NO_SUCH_COLUMN: &str = "[SQLITE_ERROR] SQL error or missing database (no such column:";
pub const UNIQUE_CONSTRAINT_FAILED: &str =
    "[SQLITE_CONSTRAINT]  Abort due to constraint violation (UNIQUE constraint failed";
/// Raised under `PRAGMA case_sensitive_like=ON`.
pub const NON_DETERMINISTIC_FUNCTIONS_PROHIBITED: &str = "non-deterministic functions prohibited";

/// Reachable by every `CREATE INDEX`, whatever optional clauses it has.
pub const INDEX_BASELINE: &[&str] = &[
    PARSER_STACK_OVERFLOW,
    SUBQUERY_IN_INDEX,
    SUBQUERY_IN_PARTIAL_INDEX,
    NON_DETERMINISTIC_TIME,
    NON_DETERMINISTIC_STRFTIME,
    NON_DETERMINISTIC_JULIANDAY,
    NON_DETERMINISTIC_DATE,
    NON_DETERMINISTIC_DATETIME,
    NO_SUCH_COLUMN,
];

/// Failures any randomly generated expression can run into while evaluated.
pub const EXPRESSION_ERRORS: &[&str] = &[
    "[SQLITE_ERROR] SQL error or missing database (integer overflow)",
    "integer overflow",
    "String or BLOB exceeds size limit",
    "string or blob too big",
    "second argument to likelihood() must be a constant between 0.0 and 1.0",
    "ESCAPE expression must be a single character",
    "LIKE or GLOB pattern too complex",
    "malformed JSON",
    "JSON cannot hold BLOB values",
    "JSON path error",
    "FTS expression tree is too large",
    "too many arguments on function",
    "wrong number of arguments to function",
    "misuse of aggregate",
    "misuse of window function",
];

#[derive(Debug, Default, Clone)]
pub struct ExpectedErrorsBuilder {
    signatures: IndexSet<String>,
}

impl ExpectedErrorsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserting a signature twice is a no-op.
    pub fn add(&mut self, signature: impl Into<String>) -> &mut Self {
        self.signatures.insert(signature.into());
        self
    }

    pub fn extend<'a>(&mut self, signatures: impl IntoIterator<Item = &'a str>) -> &mut Self {
        self.signatures
            .extend(signatures.into_iter().map(str::to_string));
        self
    }

    /// Adds the unconditional signatures of an index definition.
    pub fn add_baseline(&mut self) -> &mut Self {
        self.extend(INDEX_BASELINE.iter().copied())
            .extend(EXPRESSION_ERRORS.iter().copied())
    }

    pub fn finish(self) -> ExpectedErrors {
        ExpectedErrors {
            signatures: self.signatures,
        }
    }
}

/// Frozen set of expected error signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExpectedErrors {
    signatures: IndexSet<String>,
}

impl ExpectedErrors {
    pub fn builder() -> ExpectedErrorsBuilder {
        ExpectedErrorsBuilder::new()
    }

    /// The set every `CREATE INDEX` carries before any optional clause.
    pub fn baseline() -> Self {
        let mut builder = Self::builder();
        builder.add_baseline();
        builder.finish()
    }

    pub fn contains(&self, signature: &str) -> bool {
        self.signatures.contains(signature)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.signatures.iter().map(String::as_str)
    }

    pub fn is_superset(&self, other: &ExpectedErrors) -> bool {
        self.signatures.is_superset(&other.signatures)
    }

    /// First signature contained in `message`.
    pub fn find(&self, message: &str) -> Option<&str> {
        self.iter().find(|signature| message.contains(signature))
    }

    pub fn matches(&self, message: &str) -> bool {
        self.find(message).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut builder = ExpectedErrors::builder();
        builder
            .add(UNIQUE_CONSTRAINT_FAILED)
            .add(UNIQUE_CONSTRAINT_FAILED);
        let errors = builder.finish();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(UNIQUE_CONSTRAINT_FAILED));
    }

    #[test]
    fn test_baseline_contents() {
        let baseline = ExpectedErrors::baseline();
        for signature in INDEX_BASELINE.iter().chain(EXPRESSION_ERRORS) {
            assert!(baseline.contains(signature), "missing {signature}");
        }
        assert!(!baseline.contains(UNIQUE_CONSTRAINT_FAILED));
        assert!(!baseline.contains(NON_DETERMINISTIC_FUNCTIONS_PROHIBITED));
    }

    #[test]
    fn test_matching_is_substring_containment() {
        let errors = ExpectedErrors::baseline();
        let message = "[SQLITE_ERROR] SQL error or missing database (no such column: 'abc')";
        assert_eq!(errors.find(message), Some(NO_SUCH_COLUMN));
        assert!(errors.matches("Runtime error: non-deterministic use of date() in an index"));
        assert!(!errors.matches("database disk image is malformed"));
        // not a pattern language
        assert!(!errors.matches("subqueries prohibited in index expression"));
    }

    #[test]
    fn test_superset() {
        let mut builder = ExpectedErrors::builder();
        builder.add_baseline().add(UNIQUE_CONSTRAINT_FAILED);
        let errors = builder.finish();
        assert!(errors.is_superset(&ExpectedErrors::baseline()));
        assert!(!ExpectedErrors::baseline().is_superset(&errors));
    }
}
