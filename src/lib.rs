//! Randomized `CREATE INDEX` generation for SQL fuzzing.
//!
//! Each generated [Query] carries the set of error messages that are known to
//! be benign for that exact statement, so an executor can tell expected
//! engine limitations apart from genuine bugs.

pub mod error;
pub mod generation;
pub mod model;
pub mod profile;

pub use error::{GenerationError, Result};
pub use generation::{
    generate_create_index, generate_index_statement, GenerationContext, GenerationState, Opts,
    Randomness, SeededRandomness,
};
pub use model::query::{ErrorVerdict, ExpectedErrors, Query};
pub use model::schema::SchemaProvider;
pub use model::table::{Column, ColumnType, Schema, Table};
pub use profile::Profile;
