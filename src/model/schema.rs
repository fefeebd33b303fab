use crate::error::{GenerationError, Result};
use crate::generation::{pick, Randomness};
use crate::model::table::{Schema, Table};

/// Read access to the schema that generators target.
pub trait SchemaProvider {
    /// Uniformly picks a table satisfying `predicate`, or bails out when no
    /// table qualifies.
    fn random_table_or_bailout<R, P>(&self, rng: &mut R, predicate: P) -> Result<&Table>
    where
        R: Randomness + ?Sized,
        P: Fn(&Table) -> bool;

    /// An index name that is not used by any table or index right now.
    fn free_index_name(&self) -> String;
}

impl SchemaProvider for Schema {
    fn random_table_or_bailout<R, P>(&self, rng: &mut R, predicate: P) -> Result<&Table>
    where
        R: Randomness + ?Sized,
        P: Fn(&Table) -> bool,
    {
        let candidates = self
            .tables
            .iter()
            .filter(|table| predicate(*table))
            .collect::<Vec<_>>();
        if candidates.is_empty() {
            return Err(GenerationError::bailout(format!(
                "none of the {} tables is eligible",
                self.tables.len()
            )));
        }
        Ok(*pick(&candidates, rng))
    }

    fn free_index_name(&self) -> String {
        // Tables and indexes share one case-insensitive namespace in SQLite
        let taken = |name: &str| {
            self.indexes
                .iter()
                .map(String::as_str)
                .chain(self.tables.iter().map(|table| table.name.as_str()))
                .any(|existing| existing.eq_ignore_ascii_case(name))
        };
        let mut i = 0usize;
        loop {
            let name = format!("i{i}");
            if !taken(&name) {
                return name;
            }
            i += 1;
        }
    }
}
