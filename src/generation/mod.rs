use std::ops::Range;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::schema::SchemaProvider;
use crate::model::table::Schema;

pub mod create_index;
pub mod expr;
pub mod opts;

pub use create_index::{generate_create_index, generate_index_statement};
pub use expr::{ExpressionGenerator, RandomExpressionGenerator};
pub use opts::{ExpressionOpts, Opts};

/// Source of every randomized grammar decision.
///
/// Generators never touch an RNG directly, so a run can be replayed from its
/// seed or driven by a scripted source in tests.
pub trait Randomness {
    /// A fair coin flip.
    fn boolean(&mut self) -> bool;
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;
    /// Uniform integer in `range`. `range` must be non-empty.
    fn integer(&mut self, range: Range<i64>) -> i64;
}

/// Seeded [Randomness] backed by ChaCha8, so that a seed fully determines the
/// generated statement sequence.
#[derive(Debug, Clone)]
pub struct SeededRandomness {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededRandomness {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Randomness for SeededRandomness {
    fn boolean(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot pick from an empty range");
        self.rng.random_range(0..len)
    }

    fn integer(&mut self, range: Range<i64>) -> i64 {
        self.rng.random_range(range)
    }
}

pub(crate) fn pick<'a, T, R: Randomness + ?Sized>(choices: &'a [T], rng: &mut R) -> &'a T {
    &choices[rng.index(choices.len())]
}

/// Everything a statement generator reads while producing one statement.
pub trait GenerationContext {
    type Schema: SchemaProvider;
    type Expressions: ExpressionGenerator;

    fn schema(&self) -> &Self::Schema;
    fn expressions(&self) -> &Self::Expressions;
    fn opts(&self) -> &Opts;
}

/// Plain [GenerationContext] owning its collaborators.
#[derive(Debug, Clone)]
pub struct GenerationState<S = Schema, E = RandomExpressionGenerator> {
    pub schema: S,
    pub expressions: E,
    pub opts: Opts,
}

impl GenerationState {
    pub fn new(schema: Schema, opts: Opts) -> Self {
        Self {
            schema,
            expressions: RandomExpressionGenerator::new(&opts.expression),
            opts,
        }
    }
}

impl<S: SchemaProvider, E: ExpressionGenerator> GenerationContext for GenerationState<S, E> {
    type Schema = S;
    type Expressions = E;

    fn schema(&self) -> &S {
        &self.schema
    }

    fn expressions(&self) -> &E {
        &self.expressions
    }

    fn opts(&self) -> &Opts {
        &self.opts
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Answers "no" to every decision: false, index 0, lowest integer.
    pub(crate) struct AlwaysNo;

    impl Randomness for AlwaysNo {
        fn boolean(&mut self) -> bool {
            false
        }

        fn index(&mut self, len: usize) -> usize {
            assert!(len > 0);
            0
        }

        fn integer(&mut self, range: Range<i64>) -> i64 {
            range.start
        }
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let mut a = SeededRandomness::new(12345);
        let mut b = SeededRandomness::new(12345);
        let seq_a: Vec<_> = (0..32).map(|_| (a.boolean(), a.index(7))).collect();
        let seq_b: Vec<_> = (0..32).map(|_| (b.boolean(), b.index(7))).collect();
        assert_eq!(seq_a, seq_b);
        assert_eq!(a.seed(), 12345);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = SeededRandomness::new(10);
        let mut b = SeededRandomness::new(20);
        let seq_a: Vec<_> = (0..64).map(|_| a.integer(0..1_000_000)).collect();
        let seq_b: Vec<_> = (0..64).map(|_| b.integer(0..1_000_000)).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn test_index_in_bounds() {
        let mut rng = SeededRandomness::new(7);
        for len in 1..20 {
            assert!(rng.index(len) < len);
        }
    }

    #[test]
    fn test_pick_with_always_no() {
        assert_eq!(*pick(&["a", "b", "c"], &mut AlwaysNo), "a");
    }
}
