//! Expression AST for index columns and partial-index predicates, and its
//! rendering to SQL text.

use std::fmt::{self, Display};

use crate::model::table::ColumnType;

/// A reference to a column, keeping the owning table so that the same tree
/// can be rendered either bare or fully qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(fl) => write!(f, "{fl:?}"),
            Self::Text(text) => write!(f, "'{}'", text.replace('\'', "''")),
            Self::Blob(blob) => write!(f, "X'{}'", hex::encode_upper(blob)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::VariantArray)]
pub enum UnaryOperator {
    #[strum(to_string = "-")]
    Negative,
    #[strum(to_string = "+")]
    Positive,
    #[strum(to_string = "NOT ")]
    Not,
    #[strum(to_string = "~")]
    BitwiseNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::VariantArray)]
pub enum BinaryOperator {
    #[strum(to_string = "+")]
    Add,
    #[strum(to_string = "-")]
    Subtract,
    #[strum(to_string = "*")]
    Multiply,
    #[strum(to_string = "/")]
    Divide,
    #[strum(to_string = "%")]
    Modulus,
    #[strum(to_string = "||")]
    Concat,
    #[strum(to_string = "=")]
    Equals,
    #[strum(to_string = "!=")]
    NotEquals,
    #[strum(to_string = "<")]
    Less,
    #[strum(to_string = "<=")]
    LessEquals,
    #[strum(to_string = ">")]
    Greater,
    #[strum(to_string = ">=")]
    GreaterEquals,
    #[strum(to_string = "IS")]
    Is,
    #[strum(to_string = "IS NOT")]
    IsNot,
    #[strum(to_string = "&")]
    BitwiseAnd,
    #[strum(to_string = "|")]
    BitwiseOr,
    #[strum(to_string = "AND")]
    And,
    #[strum(to_string = "OR")]
    Or,
}

/// Built-in collating sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::VariantArray)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Collation {
    Binary,
    Nocase,
    Rtrim,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(ColumnRef),
    Literal(Literal),
    Unary(UnaryOperator, Box<Expr>),
    Binary(Box<Expr>, BinaryOperator, Box<Expr>),
    Function { name: String, args: Vec<Expr> },
    Cast(Box<Expr>, ColumnType),
    Collate(Box<Expr>, Collation),
}

impl Expr {
    pub fn column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::Column(ColumnRef {
            table: table.into(),
            column: column.into(),
        })
    }

    /// All column references in the tree, in rendering order.
    pub fn column_refs(&self) -> Vec<&ColumnRef> {
        let mut refs = Vec::new();
        self.collect_column_refs(&mut refs);
        refs
    }

    fn collect_column_refs<'a>(&'a self, refs: &mut Vec<&'a ColumnRef>) {
        match self {
            Self::Column(col) => refs.push(col),
            Self::Literal(_) => {}
            Self::Unary(_, expr) | Self::Cast(expr, _) | Self::Collate(expr, _) => {
                expr.collect_column_refs(refs)
            }
            Self::Binary(lhs, _, rhs) => {
                lhs.collect_column_refs(refs);
                rhs.collect_column_refs(refs);
            }
            Self::Function { args, .. } => {
                for arg in args {
                    arg.collect_column_refs(refs);
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Self::Column(_) | Self::Literal(_) => 0,
            Self::Unary(_, expr) | Self::Cast(expr, _) | Self::Collate(expr, _) => {
                1 + expr.depth()
            }
            Self::Binary(lhs, _, rhs) => 1 + lhs.depth().max(rhs.depth()),
            Self::Function { args, .. } => 1 + args.iter().map(Expr::depth).max().unwrap_or(0),
        }
    }

    /// Operands that need parentheses to keep their grouping when printed.
    pub(crate) fn is_compound(&self) -> bool {
        match self {
            Self::Unary(..) | Self::Binary(..) | Self::Collate(..) => true,
            // `-` followed by `-1` would start a line comment
            Self::Literal(Literal::Integer(i)) => *i < 0,
            Self::Literal(Literal::Float(fl)) => fl.is_sign_negative(),
            _ => false,
        }
    }
}

/// Turns expressions into SQL text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlRenderer {
    /// Print column references as `table.column` instead of `column`.
    pub fully_qualified_names: bool,
}

impl SqlRenderer {
    /// Column references are printed bare. Index definitions reject
    /// qualified names.
    pub const UNQUALIFIED: Self = Self {
        fully_qualified_names: false,
    };

    pub fn render(&self, expr: &Expr) -> String {
        self.display(expr).to_string()
    }

    pub fn display<'a>(&'a self, expr: &'a Expr) -> Rendered<'a> {
        Rendered {
            renderer: self,
            expr,
        }
    }
}

pub struct Rendered<'a> {
    renderer: &'a SqlRenderer,
    expr: &'a Expr,
}

impl Rendered<'_> {
    fn operand(&self, expr: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.renderer.display(expr);
        if expr.is_compound() {
            write!(f, "({inner})")
        } else {
            write!(f, "{inner}")
        }
    }
}

impl Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expr {
            Expr::Column(col) if self.renderer.fully_qualified_names => {
                write!(f, "{}.{}", col.table, col.column)
            }
            Expr::Column(col) => write!(f, "{}", col.column),
            Expr::Literal(lit) => write!(f, "{lit}"),
            Expr::Unary(op, expr) => {
                write!(f, "{op}")?;
                self.operand(expr, f)
            }
            Expr::Binary(lhs, op, rhs) => {
                self.operand(lhs, f)?;
                write!(f, " {op} ")?;
                self.operand(rhs, f)
            }
            Expr::Function { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", self.renderer.display(arg))?;
                }
                write!(f, ")")
            }
            Expr::Cast(expr, column_type) => {
                write!(f, "CAST({} AS {column_type})", self.renderer.display(expr))
            }
            Expr::Collate(expr, collation) => {
                self.operand(expr, f)?;
                write!(f, " COLLATE {collation}")
            }
        }
    }
}
