use std::fmt::Display;

use indexmap::IndexSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, strum::VariantArray,
)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Blob,
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "INTEGER"),
            Self::Float => write!(f, "REAL"),
            Self::Text => write!(f, "TEXT"),
            Self::Blob => write!(f, "BLOB"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub is_view: bool,
    pub is_virtual: bool,
    pub is_read_only: bool,
}

impl Table {
    /// A plain, writable table.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            is_view: false,
            is_virtual: false,
            is_read_only: false,
        }
    }

    pub fn view(mut self) -> Self {
        self.is_view = true;
        self
    }

    pub fn virtual_table(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.is_read_only = true;
        self
    }

    /// Returns true if an index can be created on this table.
    pub fn is_indexable(&self) -> bool {
        !self.is_view && !self.is_virtual && !self.is_read_only
    }

    pub fn context_columns(&self) -> Vec<ContextColumn<'_>> {
        self.columns
            .iter()
            .map(|column| ContextColumn {
                table_name: &self.name,
                column,
            })
            .collect()
    }
}

/// A column together with the name of the table it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct ContextColumn<'a> {
    pub table_name: &'a str,
    pub column: &'a Column,
}

/// Snapshot of the database schema as seen by the generator.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub tables: Vec<Table>,
    /// Names of all indexes that currently exist, across every table.
    pub indexes: IndexSet<String>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn add_index(mut self, index_name: impl Into<String>) -> Self {
        self.indexes.insert(index_name.into());
        self
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexable_flags() {
        let columns = vec![Column::new("c0", ColumnType::Integer)];
        assert!(Table::new("t0", columns.clone()).is_indexable());
        assert!(!Table::new("v0", columns.clone()).view().is_indexable());
        assert!(!Table::new("vt0", columns.clone())
            .virtual_table()
            .is_indexable());
        assert!(!Table::new("ro0", columns).read_only().is_indexable());
    }
}
