//! Random expressions over a set of columns.

use strum::VariantArray;

use crate::generation::opts::ExpressionOpts;
use crate::generation::{pick, Randomness};
use crate::model::expr::{BinaryOperator, Collation, Expr, Literal, UnaryOperator};
use crate::model::table::{ColumnType, ContextColumn};

/// Produces expressions that only reference the given columns.
pub trait ExpressionGenerator {
    /// With `deterministic_only`, the result must evaluate to the same value
    /// for the same row every time (no clock, no randomness).
    fn random_expression<R: Randomness + ?Sized>(
        &self,
        rng: &mut R,
        columns: &[ContextColumn<'_>],
        deterministic_only: bool,
    ) -> Expr;
}

/// A SQL function known to the generator.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    /// Whether this function is deterministic (same inputs always give same output).
    pub is_deterministic: bool,
    /// Literal text arguments used instead of generated ones.
    pub fixed_args: &'static [&'static str],
}

impl FunctionDef {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            min_args: 1,
            max_args: 1,
            is_deterministic: true,
            fixed_args: &[],
        }
    }

    pub fn arity(mut self, min: usize, max: usize) -> Self {
        self.min_args = min;
        self.max_args = max;
        self
    }

    pub fn fixed_args(mut self, args: &'static [&'static str]) -> Self {
        self.fixed_args = args;
        self.min_args = args.len();
        self.max_args = args.len();
        self
    }

    pub fn non_deterministic(mut self) -> Self {
        self.is_deterministic = false;
        self
    }
}

/// Scalar functions the generator may call.
pub fn builtin_functions() -> Vec<FunctionDef> {
    vec![
        FunctionDef::new("abs"),
        FunctionDef::new("length"),
        FunctionDef::new("lower"),
        FunctionDef::new("upper"),
        FunctionDef::new("hex"),
        FunctionDef::new("quote"),
        FunctionDef::new("typeof"),
        FunctionDef::new("unicode"),
        FunctionDef::new("sign"),
        FunctionDef::new("likely"),
        FunctionDef::new("unlikely"),
        FunctionDef::new("json_valid"),
        FunctionDef::new("trim").arity(1, 2),
        FunctionDef::new("ltrim").arity(1, 2),
        FunctionDef::new("rtrim").arity(1, 2),
        FunctionDef::new("round").arity(1, 2),
        FunctionDef::new("substr").arity(2, 3),
        FunctionDef::new("instr").arity(2, 2),
        FunctionDef::new("ifnull").arity(2, 2),
        FunctionDef::new("nullif").arity(2, 2),
        FunctionDef::new("likelihood").arity(2, 2),
        FunctionDef::new("coalesce").arity(2, 4),
        FunctionDef::new("max").arity(2, 4),
        FunctionDef::new("min").arity(2, 4),
        FunctionDef::new("iif").arity(3, 3),
        // date/time over row values is deterministic
        FunctionDef::new("date"),
        FunctionDef::new("time"),
        FunctionDef::new("datetime"),
        FunctionDef::new("julianday"),
        FunctionDef::new("strftime").arity(2, 2),
        FunctionDef::new("random").arity(0, 0).non_deterministic(),
        FunctionDef::new("randomblob").non_deterministic(),
        FunctionDef::new("changes").arity(0, 0).non_deterministic(),
        FunctionDef::new("total_changes")
            .arity(0, 0)
            .non_deterministic(),
        FunctionDef::new("last_insert_rowid")
            .arity(0, 0)
            .non_deterministic(),
        FunctionDef::new("date")
            .fixed_args(&["now"])
            .non_deterministic(),
        FunctionDef::new("time")
            .fixed_args(&["now"])
            .non_deterministic(),
        FunctionDef::new("datetime")
            .fixed_args(&["now"])
            .non_deterministic(),
        FunctionDef::new("julianday")
            .fixed_args(&["now"])
            .non_deterministic(),
        FunctionDef::new("strftime")
            .fixed_args(&["%s", "now"])
            .non_deterministic(),
    ]
}

const TEXT_ALPHABET: &[char] = &[
    'a', 'b', 'c', 'x', 'y', 'z', 'A', 'Z', '0', '1', '9', ' ', '%', '_', '\'', '-', ':',
];

#[derive(Debug, Clone)]
pub struct RandomExpressionGenerator {
    max_depth: usize,
    functions: Vec<FunctionDef>,
}

impl RandomExpressionGenerator {
    pub fn new(opts: &ExpressionOpts) -> Self {
        Self {
            max_depth: opts.max_depth,
            functions: builtin_functions(),
        }
    }

    fn expr<R: Randomness + ?Sized>(
        &self,
        rng: &mut R,
        columns: &[ContextColumn<'_>],
        deterministic_only: bool,
        depth: usize,
    ) -> Expr {
        if depth == 0 || !rng.boolean() {
            return Self::leaf(rng, columns);
        }
        let depth = depth - 1;
        match rng.index(5) {
            0 => Expr::Unary(
                *pick(UnaryOperator::VARIANTS, rng),
                Box::new(self.expr(rng, columns, deterministic_only, depth)),
            ),
            1 => {
                let lhs = self.expr(rng, columns, deterministic_only, depth);
                let op = *pick(BinaryOperator::VARIANTS, rng);
                let rhs = self.expr(rng, columns, deterministic_only, depth);
                Expr::Binary(Box::new(lhs), op, Box::new(rhs))
            }
            2 => self.function_call(rng, columns, deterministic_only, depth),
            3 => Expr::Cast(
                Box::new(self.expr(rng, columns, deterministic_only, depth)),
                *pick(ColumnType::VARIANTS, rng),
            ),
            _ => Expr::Collate(
                Box::new(self.expr(rng, columns, deterministic_only, depth)),
                *pick(Collation::VARIANTS, rng),
            ),
        }
    }

    fn function_call<R: Randomness + ?Sized>(
        &self,
        rng: &mut R,
        columns: &[ContextColumn<'_>],
        deterministic_only: bool,
        depth: usize,
    ) -> Expr {
        let candidates = self
            .functions
            .iter()
            .filter(|function| function.is_deterministic || !deterministic_only)
            .collect::<Vec<_>>();
        let function = *pick(&candidates, rng);

        let args = if function.fixed_args.is_empty() {
            let num_args = function.min_args + rng.index(function.max_args - function.min_args + 1);
            (0..num_args)
                .map(|_| self.expr(rng, columns, deterministic_only, depth))
                .collect()
        } else {
            function
                .fixed_args
                .iter()
                .map(|arg| Expr::Literal(Literal::Text(arg.to_string())))
                .collect()
        };

        Expr::Function {
            name: function.name.to_string(),
            args,
        }
    }

    fn leaf<R: Randomness + ?Sized>(rng: &mut R, columns: &[ContextColumn<'_>]) -> Expr {
        if !columns.is_empty() && !rng.boolean() {
            let column = pick(columns, rng);
            return Expr::column(column.table_name, &column.column.name);
        }
        Expr::Literal(Self::literal(rng))
    }

    fn literal<R: Randomness + ?Sized>(rng: &mut R) -> Literal {
        match rng.index(5) {
            0 => Literal::Integer(rng.integer(-1000..1000)),
            1 => Literal::Float(rng.integer(-4000..4000) as f64 / 4.0),
            2 => {
                let len = rng.index(8);
                Literal::Text((0..len).map(|_| *pick(TEXT_ALPHABET, rng)).collect())
            }
            3 => {
                let len = rng.index(5);
                Literal::Blob((0..len).map(|_| rng.integer(0..256) as u8).collect())
            }
            _ => Literal::Null,
        }
    }
}

impl ExpressionGenerator for RandomExpressionGenerator {
    fn random_expression<R: Randomness + ?Sized>(
        &self,
        rng: &mut R,
        columns: &[ContextColumn<'_>],
        deterministic_only: bool,
    ) -> Expr {
        self.expr(rng, columns, deterministic_only, self.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::tests::AlwaysNo;
    use crate::generation::SeededRandomness;
    use crate::model::table::{Column, Table};

    fn table() -> Table {
        Table::new(
            "t0",
            vec![
                Column::new("c0", ColumnType::Integer),
                Column::new("c1", ColumnType::Text),
                Column::new("c2", ColumnType::Blob),
            ],
        )
    }

    fn non_deterministic_calls(expr: &Expr, functions: &[FunctionDef]) -> usize {
        match expr {
            Expr::Column(_) | Expr::Literal(_) => 0,
            Expr::Unary(_, e) | Expr::Cast(e, _) | Expr::Collate(e, _) => {
                non_deterministic_calls(e, functions)
            }
            Expr::Binary(lhs, _, rhs) => {
                non_deterministic_calls(lhs, functions) + non_deterministic_calls(rhs, functions)
            }
            Expr::Function { name, args } => {
                let now = args
                    .iter()
                    .any(|arg| *arg == Expr::Literal(Literal::Text("now".to_string())));
                let flagged = functions.iter().any(|f| {
                    !f.is_deterministic && f.name == name.as_str() && (f.fixed_args.is_empty() || now)
                });
                usize::from(flagged)
                    + args
                        .iter()
                        .map(|arg| non_deterministic_calls(arg, functions))
                        .sum::<usize>()
            }
        }
    }

    #[test]
    fn test_always_no_picks_first_column() {
        let table = table();
        let generator = RandomExpressionGenerator::new(&ExpressionOpts::default());
        let expr = generator.random_expression(&mut AlwaysNo, &table.context_columns(), true);
        assert_eq!(expr, Expr::column("t0", "c0"));
    }

    #[test]
    fn test_no_columns_yields_literal() {
        let generator = RandomExpressionGenerator::new(&ExpressionOpts::default());
        let expr = generator.random_expression(&mut AlwaysNo, &[], true);
        assert_eq!(expr, Expr::Literal(Literal::Integer(-1000)));
    }

    #[test]
    fn test_deterministic_only_excludes_non_deterministic_functions() {
        let table = table();
        let columns = table.context_columns();
        let opts = ExpressionOpts { max_depth: 6 };
        let generator = RandomExpressionGenerator::new(&opts);
        let functions = builtin_functions();
        let mut rng = SeededRandomness::new(42);
        for _ in 0..2000 {
            let expr = generator.random_expression(&mut rng, &columns, true);
            assert_eq!(non_deterministic_calls(&expr, &functions), 0, "{expr:?}");
        }
    }

    #[test]
    fn test_non_deterministic_functions_are_reachable() {
        let table = table();
        let columns = table.context_columns();
        let generator = RandomExpressionGenerator::new(&ExpressionOpts { max_depth: 6 });
        let functions = builtin_functions();
        let mut rng = SeededRandomness::new(42);
        let found = (0..5000).any(|_| {
            let expr = generator.random_expression(&mut rng, &columns, false);
            non_deterministic_calls(&expr, &functions) > 0
        });
        assert!(found);
    }

    #[test]
    fn test_references_only_given_columns_within_depth() {
        let table = table();
        let columns = table.context_columns();
        let opts = ExpressionOpts { max_depth: 4 };
        let generator = RandomExpressionGenerator::new(&opts);
        let mut rng = SeededRandomness::new(7);
        for _ in 0..1000 {
            let expr = generator.random_expression(&mut rng, &columns, true);
            assert!(expr.depth() <= opts.max_depth);
            for col in expr.column_refs() {
                assert_eq!(col.table, "t0");
                assert!(table.columns.iter().any(|c| c.name == col.column));
            }
        }
    }
}
