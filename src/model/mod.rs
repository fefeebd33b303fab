pub mod expr;
pub mod query;
pub mod schema;
pub mod table;
