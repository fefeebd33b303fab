use std::fmt::Display;

use crate::model::expr::{Collation, Expr, SqlRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One entry of the indexed-column list.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedColumn {
    pub expr: Expr,
    pub collation: Option<Collation>,
    pub order: Option<SortOrder>,
}

/// `CREATE [UNIQUE] INDEX [IF NOT EXISTS] name ON table(columns) [WHERE expr]`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndex {
    pub unique: bool,
    pub if_not_exists: bool,
    pub index_name: String,
    pub table_name: String,
    pub columns: Vec<IndexedColumn>,
    pub where_clause: Option<Expr>,
}

impl Display for IndexedColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let expr = SqlRenderer::UNQUALIFIED.display(&self.expr);
        match self.collation {
            // COLLATE binds tighter than any operator
            Some(collation) if self.expr.is_compound() => {
                write!(f, "({expr}) COLLATE {collation}")?
            }
            Some(collation) => write!(f, "{expr} COLLATE {collation}")?,
            None => write!(f, "{expr}")?,
        }
        if let Some(order) = self.order {
            write!(f, " {order}")?;
        }
        Ok(())
    }
}

impl Display for CreateIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let renderer = SqlRenderer::UNQUALIFIED;

        write!(f, "CREATE")?;
        if self.unique {
            write!(f, " UNIQUE")?;
        }
        write!(f, " INDEX")?;
        if self.if_not_exists {
            write!(f, " IF NOT EXISTS")?;
        }
        write!(f, " {} ON {}(", self.index_name, self.table_name)?;
        for (i, column) in self.columns.iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            write!(f, "{column}")?;
        }
        write!(f, ")")?;
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {}", renderer.display(where_clause))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::expr::{BinaryOperator, Literal, UnaryOperator};

    #[test]
    fn test_create_index_display_minimal() {
        let stmt = CreateIndex {
            unique: false,
            if_not_exists: false,
            index_name: "i0".to_string(),
            table_name: "t0".to_string(),
            columns: vec![IndexedColumn {
                expr: Expr::column("t0", "c0"),
                collation: None,
                order: None,
            }],
            where_clause: None,
        };
        assert_eq!(stmt.to_string(), "CREATE INDEX i0 ON t0(c0)");
    }

    #[test]
    fn test_create_index_display_all_clauses() {
        let stmt = CreateIndex {
            unique: true,
            if_not_exists: true,
            index_name: "i3".to_string(),
            table_name: "t1".to_string(),
            columns: vec![
                IndexedColumn {
                    expr: Expr::column("t1", "c0"),
                    collation: Some(Collation::Rtrim),
                    order: Some(SortOrder::Desc),
                },
                IndexedColumn {
                    expr: Expr::Binary(
                        Box::new(Expr::column("t1", "c1")),
                        BinaryOperator::Multiply,
                        Box::new(Expr::Literal(Literal::Integer(2))),
                    ),
                    collation: None,
                    order: Some(SortOrder::Asc),
                },
            ],
            where_clause: Some(Expr::Binary(
                Box::new(Expr::column("t1", "c0")),
                BinaryOperator::IsNot,
                Box::new(Expr::Literal(Literal::Null)),
            )),
        };
        assert_eq!(
            stmt.to_string(),
            "CREATE UNIQUE INDEX IF NOT EXISTS i3 ON t1(c0 COLLATE RTRIM DESC,c1 * 2 ASC) WHERE c0 IS NOT NULL"
        );
    }

    #[test]
    fn test_collation_applies_to_whole_column_expression() {
        let column = IndexedColumn {
            expr: Expr::Binary(
                Box::new(Expr::column("t0", "c0")),
                BinaryOperator::Concat,
                Box::new(Expr::column("t0", "c1")),
            ),
            collation: Some(Collation::Nocase),
            order: Some(SortOrder::Asc),
        };
        assert_eq!(column.to_string(), "(c0 || c1) COLLATE NOCASE ASC");

        let negated = IndexedColumn {
            expr: Expr::Unary(
                UnaryOperator::Negative,
                Box::new(Expr::column("t0", "c0")),
            ),
            collation: Some(Collation::Rtrim),
            order: None,
        };
        assert_eq!(negated.to_string(), "(-c0) COLLATE RTRIM");

        let negative_literal = IndexedColumn {
            expr: Expr::Literal(Literal::Integer(-800)),
            collation: Some(Collation::Binary),
            order: Some(SortOrder::Desc),
        };
        assert_eq!(negative_literal.to_string(), "(-800) COLLATE BINARY DESC");

        // without a collation the bare expression is kept
        let plain = IndexedColumn {
            collation: None,
            ..column
        };
        assert_eq!(plain.to_string(), "c0 || c1 ASC");
    }
}
