use std::{fs, path::Path};

use anyhow::Context;
use garde::Validate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::generation::Opts;
use crate::model::table::{Column, ColumnType, Schema, Table};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    #[garde(dive)]
    pub opts: Opts,
    /// Seed for the decision source; random when absent
    #[garde(skip)]
    pub seed: Option<u64>,
    /// Number of statements to generate
    #[garde(range(min = 1, max = 100_000))]
    pub statements: usize,
    #[garde(length(min = 1), dive)]
    pub tables: Vec<TableProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct TableProfile {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(length(min = 1))]
    pub columns: Vec<Column>,
    #[serde(default)]
    #[garde(skip)]
    pub view: bool,
    #[serde(default)]
    #[garde(skip)]
    pub virtual_table: bool,
    #[serde(default)]
    #[garde(skip)]
    pub read_only: bool,
}

impl TableProfile {
    fn to_table(&self) -> Table {
        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            is_view: self.view,
            is_virtual: self.virtual_table,
            is_read_only: self.read_only,
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            opts: Opts::default(),
            seed: None,
            statements: 10,
            tables: vec![
                TableProfile {
                    name: "t0".to_string(),
                    columns: vec![
                        Column::new("c0", ColumnType::Integer),
                        Column::new("c1", ColumnType::Text),
                        Column::new("c2", ColumnType::Float),
                    ],
                    view: false,
                    virtual_table: false,
                    read_only: false,
                },
                TableProfile {
                    name: "t1".to_string(),
                    columns: vec![
                        Column::new("c0", ColumnType::Blob),
                        Column::new("c1", ColumnType::Integer),
                    ],
                    view: false,
                    virtual_table: false,
                    read_only: false,
                },
                TableProfile {
                    name: "v0".to_string(),
                    columns: vec![Column::new("c0", ColumnType::Integer)],
                    view: true,
                    virtual_table: false,
                    read_only: false,
                },
            ],
        }
    }
}

impl Profile {
    pub fn parse(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read profile {}", path.display()))?;
        // use json5 so we can support comments and trailing commas
        let profile: Profile = json5::from_str(&contents)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn schema(&self) -> Schema {
        self.tables
            .iter()
            .fold(Schema::new(), |schema, table| schema.add_table(table.to_table()))
    }
}
