use anyhow::{bail, Result};
use rusqlite::{params, Connection};

pub const DEFAULT_TIMESTAMP: &str = "(cast(strftime('%s','now') as int))";

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
                is_unique: false,
                default_value: None,
                foreign_key: None,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Real,
    Blob,
}

impl SqlType {
    fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Blob => "BLOB",
        }
    }
}

#[allow(unused)]
pub enum ForeignKeyOnChange {
    NoAction,
    Restrict,
    SetNull,
    SetDefault,
    Cascade,
}

impl ForeignKeyOnChange {
    fn as_sql(&self) -> &'static str {
        match self {
            ForeignKeyOnChange::NoAction => "NO ACTION",
            ForeignKeyOnChange::Restrict => "RESTRICT",
            ForeignKeyOnChange::SetNull => "SET NULL",
            ForeignKeyOnChange::SetDefault => "SET DEFAULT",
            ForeignKeyOnChange::Cascade => "CASCADE",
        }
    }
}

pub struct ForeignKey {
    pub foreign_table: &'static str,
    pub foreign_column: &'static str,
    pub on_delete: ForeignKeyOnChange,
}

pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
    pub is_unique: bool,
    pub default_value: Option<&'static str>,
    pub foreign_key: Option<&'static ForeignKey>,
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub indices: &'static [(&'static str, &'static str)],
    pub unique_constraints: &'static [&'static [&'static str]],
}

impl Table {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        let mut create_sql = format!("CREATE TABLE {} (", self.name);
        for (column_index, column) in self.columns.iter().enumerate() {
            if column_index > 0 {
                create_sql.push_str(", ");
            }
            create_sql.push_str(&format!("{} {}", column.name, column.sql_type.as_sql()));
            if column.is_primary_key {
                create_sql.push_str(" PRIMARY KEY");
            }
            if column.non_null {
                create_sql.push_str(" NOT NULL");
            }
            if column.is_unique {
                create_sql.push_str(" UNIQUE");
            }
            if let Some(default_value) = column.default_value {
                create_sql.push_str(&format!(" DEFAULT {}", default_value));
            }
            if let Some(foreign_key) = column.foreign_key {
                create_sql.push_str(&format!(
                    " REFERENCES {}({}) ON DELETE {}",
                    foreign_key.foreign_table,
                    foreign_key.foreign_column,
                    foreign_key.on_delete.as_sql(),
                ));
            }
        }

        for unique_constraint in self.unique_constraints {
            create_sql.push_str(&format!(", UNIQUE ({})", unique_constraint.join(", ")));
        }
        create_sql.push_str(");");
        conn.execute(&create_sql, params![])?;

        for (index_name, column_name) in self.indices {
            conn.execute(
                &format!(
                    "CREATE INDEX {} ON {}({});",
                    index_name, self.name, column_name
                ),
                params![],
            )?;
        }
        Ok(())
    }
}

pub struct VersionedSchema {
    pub version: usize,
    pub tables: &'static [Table],
    pub migration: Option<fn(&Connection) -> Result<()>>,
}

pub const BASE_DB_VERSION: usize = 99999;

impl VersionedSchema {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        conn.execute("PRAGMA foreign_keys = ON;", params![])?;
        for table in self.tables {
            table.create(conn)?;
        }
        conn.execute(
            &format!("PRAGMA user_version = {}", BASE_DB_VERSION + self.version),
            [],
        )?;
        Ok(())
    }

    /// Checks that each table exists with the expected column names and types.
    pub fn validate(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", table.name))?;
            let actual_columns: Vec<(String, String)> = stmt
                .query_map(params![], |row| {
                    Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            if actual_columns.len() != table.columns.len() {
                bail!(
                    "Table {} has {} columns, expected {} ({})",
                    table.name,
                    actual_columns.len(),
                    table.columns.len(),
                    table
                        .columns
                        .iter()
                        .map(|c| c.name)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }

            for ((actual_name, actual_type), expected) in
                actual_columns.iter().zip(table.columns.iter())
            {
                if actual_name != expected.name {
                    bail!(
                        "Table {} column name mismatch: expected {}, got {}",
                        table.name,
                        expected.name,
                        actual_name
                    );
                }
                if actual_type != expected.sql_type.as_sql() {
                    bail!(
                        "Table {} column {} type mismatch: expected {}, got {}",
                        table.name,
                        expected.name,
                        expected.sql_type.as_sql(),
                        actual_type
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TABLE: Table = Table {
        name: "test_table",
        columns: &[
            sqlite_column!("id", &SqlType::Text, is_primary_key = true),
            sqlite_column!("name", &SqlType::Text, non_null = true),
            sqlite_column!(
                "created",
                &SqlType::Integer,
                default_value = Some(DEFAULT_TIMESTAMP)
            ),
        ],
        indices: &[("idx_test_name", "name")],
        unique_constraints: &[&["name", "created"]],
    };

    const TEST_SCHEMA: VersionedSchema = VersionedSchema {
        version: 1,
        tables: &[TEST_TABLE],
        migration: None,
    };

    #[test]
    fn create_and_validate() {
        let conn = Connection::open_in_memory().unwrap();
        TEST_SCHEMA.create(&conn).unwrap();
        TEST_SCHEMA.validate(&conn).unwrap();

        let db_version: i64 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(db_version, BASE_DB_VERSION as i64 + 1);
    }

    #[test]
    fn validate_detects_missing_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE test_table (id TEXT PRIMARY KEY)", [])
            .unwrap();

        let result = TEST_SCHEMA.validate(&conn);
        assert!(result.is_err());
    }

    #[test]
    fn unique_constraint_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        TEST_SCHEMA.create(&conn).unwrap();

        conn.execute(
            "INSERT INTO test_table (id, name, created) VALUES ('a', 'x', 1)",
            [],
        )
        .unwrap();
        let duplicate = conn.execute(
            "INSERT INTO test_table (id, name, created) VALUES ('b', 'x', 1)",
            [],
        );
        assert!(duplicate.is_err());
    }
}
