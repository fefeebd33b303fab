//! `CREATE INDEX` generation.
//!
//! Every optional clause is an independent coin flip appended in grammar
//! order, and each flip that makes a new failure reachable registers the
//! matching expected-error signature as it is taken.

use strum::VariantArray;

use crate::error::Result;
use crate::generation::{pick, ExpressionGenerator, GenerationContext, Randomness};
use crate::model::expr::Collation;
use crate::model::query::expected_errors::{
    NON_DETERMINISTIC_FUNCTIONS_PROHIBITED, UNIQUE_CONSTRAINT_FAILED,
};
use crate::model::query::{
    CreateIndex, ExpectedErrors, ExpectedErrorsBuilder, IndexedColumn, Query, SortOrder,
};
use crate::model::schema::SchemaProvider;
use crate::model::table::Table;

/// Generates a `CREATE INDEX` statement on a random indexable table.
///
/// Fails with a bailout when the schema has no table that is neither a view,
/// a virtual table, nor read-only.
pub fn generate_index_statement<R, C>(rng: &mut R, context: &C) -> Result<Query>
where
    R: Randomness + ?Sized,
    C: GenerationContext,
{
    generate_create_index(rng, context).map(|(_, query)| query)
}

/// Like [generate_index_statement], also returning the statement model so the
/// caller can track the new index in its schema.
pub fn generate_create_index<R, C>(rng: &mut R, context: &C) -> Result<(CreateIndex, Query)>
where
    R: Randomness + ?Sized,
    C: GenerationContext,
{
    let table = context
        .schema()
        .random_table_or_bailout(rng, Table::is_indexable)
        .inspect_err(|err| tracing::debug!("cannot generate CREATE INDEX: {err}"))?;

    let mut expected_errors = ExpectedErrors::builder();
    expected_errors.add_baseline();

    let create_index = create_index(rng, context, table, &mut expected_errors);

    let must_know_result = context.opts().must_know_result;
    if !must_know_result {
        expected_errors.add(NON_DETERMINISTIC_FUNCTIONS_PROHIBITED);
    }

    let expected_errors = expected_errors.finish();
    let sql = create_index.to_string();
    tracing::debug!(
        table = %table.name,
        expected_errors = expected_errors.len(),
        "generated: {sql}"
    );

    let query = Query::new(sql, expected_errors, !must_know_result, true);
    Ok((create_index, query))
}

fn create_index<R, C>(
    rng: &mut R,
    context: &C,
    table: &Table,
    expected_errors: &mut ExpectedErrorsBuilder,
) -> CreateIndex
where
    R: Randomness + ?Sized,
    C: GenerationContext,
{
    let unique = rng.boolean();
    if unique {
        // existing rows may already hold duplicates
        expected_errors.add(UNIQUE_CONSTRAINT_FAILED);
    }
    let if_not_exists = rng.boolean();
    tracing::trace!(unique, if_not_exists, "index header");

    let index_name = context.schema().free_index_name();
    let columns = table.context_columns();

    let indexed_columns = columns
        .iter()
        .map(|_| {
            let expr = context
                .expressions()
                .random_expression(rng, &columns, true);
            let collation = rng
                .boolean()
                .then(|| *pick(Collation::VARIANTS, rng));
            let order = match rng.index(3) {
                0 => None,
                1 => Some(SortOrder::Asc),
                _ => Some(SortOrder::Desc),
            };
            IndexedColumn {
                expr,
                collation,
                order,
            }
        })
        .collect::<Vec<_>>();

    let where_clause = rng.boolean().then(|| {
        context
            .expressions()
            .random_expression(rng, &columns, true)
    });
    tracing::trace!(partial = where_clause.is_some(), "index body");

    CreateIndex {
        unique,
        if_not_exists,
        index_name,
        table_name: table.name.clone(),
        columns: indexed_columns,
        where_clause,
    }
}
