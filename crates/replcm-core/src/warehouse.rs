//! Storage path resolution for databases, tables and partitions.
//!
//! The metadata store hands over descriptors that already carry resolved
//! location information; resolution here is pure path arithmetic with no
//! I/O. Partition directories follow the `key=value` convention with
//! filesystem-hostile characters percent-escaped.

use std::path::PathBuf;

use replcm_types::{make_error_msg, status_code::StatusCode, Result};

/// Directory name used for an empty partition value.
pub const DEFAULT_PARTITION_NAME: &str = "__DEFAULT_PARTITION__";

/// Database descriptor as provided by the metadata store.
#[derive(Debug, Clone)]
pub struct Database {
    pub name: String,
    /// Explicit storage location, if the database has one.
    pub location: Option<PathBuf>,
}

/// Table descriptor as provided by the metadata store.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    /// Explicit storage location, if the table has one.
    pub location: Option<PathBuf>,
    /// Partition column names, empty for non-partitioned tables.
    pub partition_keys: Vec<String>,
}

/// Partition descriptor as provided by the metadata store.
#[derive(Debug, Clone)]
pub struct Partition {
    /// One value per partition key of the owning table.
    pub values: Vec<String>,
    /// Explicit storage location, if the partition has one.
    pub location: Option<PathBuf>,
}

/// Resolves warehouse storage paths from metadata descriptors.
#[derive(Debug, Clone)]
pub struct Warehouse {
    root: PathBuf,
}

impl Warehouse {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage path of a database: its explicit location, or
    /// `<root>/<name>.db`.
    pub fn database_path(&self, db: &Database) -> PathBuf {
        match &db.location {
            Some(location) => location.clone(),
            None => self.root.join(format!("{}.db", db.name)),
        }
    }

    /// Storage path of a table: its explicit location, or a directory
    /// named after the table under the database path.
    pub fn table_path(&self, db: &Database, table: &Table) -> PathBuf {
        match &table.location {
            Some(location) => location.clone(),
            None => self.database_path(db).join(&table.name),
        }
    }

    /// Storage path of a partition: its explicit location, or the
    /// `key=value` directory chain under the table path.
    pub fn partition_path(
        &self,
        db: &Database,
        table: &Table,
        partition: &Partition,
    ) -> Result<PathBuf> {
        if let Some(location) = &partition.location {
            return Ok(location.clone());
        }
        let name = make_part_name(&table.partition_keys, &partition.values)?;
        Ok(self.table_path(db, table).join(name))
    }
}

/// Build the `k1=v1/k2=v2/...` relative path for a partition.
///
/// Fails with `INVALID_ARG` when the key and value lists disagree.
pub fn make_part_name(keys: &[String], values: &[String]) -> Result<String> {
    if keys.is_empty() || keys.len() != values.len() {
        return make_error_msg(
            StatusCode::INVALID_ARG,
            format!(
                "partition has {} values for {} keys",
                values.len(),
                keys.len()
            ),
        );
    }
    let parts: Vec<String> = keys
        .iter()
        .zip(values)
        .map(|(key, value)| format!("{}={}", escape_path_name(key), escape_path_name(value)))
        .collect();
    Ok(parts.join("/"))
}

/// Escape a partition key or value for use as a directory name component.
fn escape_path_name(name: &str) -> String {
    if name.is_empty() {
        return DEFAULT_PARTITION_NAME.to_string();
    }
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if needs_escape(c) {
            escaped.push_str(&format!("%{:02X}", c as u32));
        } else {
            escaped.push(c);
        }
    }
    escaped
}

fn needs_escape(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '"' | '#' | '%' | '\'' | '*' | '/' | ':' | '=' | '?' | '\\' | '{' | '}' | '[' | ']'
                | '^'
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn db(name: &str) -> Database {
        Database {
            name: name.to_string(),
            location: None,
        }
    }

    fn table(name: &str, keys: &[&str]) -> Table {
        Table {
            name: name.to_string(),
            location: None,
            partition_keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn test_default_paths() {
        let warehouse = Warehouse::new("/warehouse");
        let db1 = db("db1");
        let t1 = table("t1", &["dt"]);

        assert_eq!(
            warehouse.database_path(&db1),
            Path::new("/warehouse/db1.db")
        );
        assert_eq!(
            warehouse.table_path(&db1, &t1),
            Path::new("/warehouse/db1.db/t1")
        );

        let part = Partition {
            values: vec!["20160101".to_string()],
            location: None,
        };
        assert_eq!(
            warehouse.partition_path(&db1, &t1, &part).unwrap(),
            Path::new("/warehouse/db1.db/t1/dt=20160101")
        );
    }

    #[test]
    fn test_explicit_locations_win() {
        let warehouse = Warehouse::new("/warehouse");
        let db1 = Database {
            name: "db1".to_string(),
            location: Some(PathBuf::from("/elsewhere/db1")),
        };
        let t1 = Table {
            name: "t1".to_string(),
            location: Some(PathBuf::from("/external/t1")),
            partition_keys: vec!["dt".to_string()],
        };

        assert_eq!(warehouse.database_path(&db1), Path::new("/elsewhere/db1"));
        assert_eq!(warehouse.table_path(&db1, &t1), Path::new("/external/t1"));

        let part = Partition {
            values: vec!["x".to_string()],
            location: Some(PathBuf::from("/external/t1/custom")),
        };
        assert_eq!(
            warehouse.partition_path(&db1, &t1, &part).unwrap(),
            Path::new("/external/t1/custom")
        );
    }

    #[test]
    fn test_multi_key_partition() {
        let name = make_part_name(
            &["year".to_string(), "month".to_string()],
            &["2016".to_string(), "01".to_string()],
        )
        .unwrap();
        assert_eq!(name, "year=2016/month=01");
    }

    #[test]
    fn test_part_name_escaping() {
        let name = make_part_name(
            &["dt".to_string()],
            &["2016/01:01".to_string()],
        )
        .unwrap();
        assert_eq!(name, "dt=2016%2F01%3A01");
    }

    #[test]
    fn test_empty_value_uses_default_name() {
        let name = make_part_name(&["dt".to_string()], &[String::new()]).unwrap();
        assert_eq!(name, format!("dt={}", DEFAULT_PARTITION_NAME));
    }

    #[test]
    fn test_key_value_mismatch() {
        let err = make_part_name(
            &["a".to_string(), "b".to_string()],
            &["1".to_string()],
        )
        .unwrap_err();
        assert_eq!(err.code(), StatusCode::INVALID_ARG);

        let err = make_part_name(&[], &[]).unwrap_err();
        assert_eq!(err.code(), StatusCode::INVALID_ARG);
    }
}
