// DB Migrator Migration records
//
// Read-only view models supplied by a migration source. Nothing in the core
// mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum MigrationStatus {
    Migrated,
    Pending,
    Failed,
    Partial,
}

impl MigrationStatus {
    /// Icon shown next to a timeline card
    pub fn icon(&self) -> &'static str {
        match self {
            MigrationStatus::Migrated => "✓",
            MigrationStatus::Pending => "…",
            MigrationStatus::Failed => "✗",
            MigrationStatus::Partial => "⚠",
        }
    }
}

/// How a migration is authored. Doubles as the dashboard's view mode.
///
/// Parsing is exact (`JAVA`/`SQL`); this is also the persisted wire form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum MigrationType {
    #[default]
    Java,
    Sql,
}

impl MigrationType {
    /// Whether a migration belongs on the timeline in this mode.
    ///
    /// The JAVA view shows everything that is not file-based; the SQL view
    /// shows only file-based migrations.
    pub fn shows(&self, migration: &Migration) -> bool {
        match self {
            MigrationType::Java => migration.kind != MigrationType::Sql,
            MigrationType::Sql => migration.kind == MigrationType::Sql,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum SqlFileStatus {
    Run,
    Pending,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub date: String,
    pub message: String,
}

/// One file of a file-based (SQL) migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlFile {
    pub name: String,
    pub full_path: String,
    pub status: SqlFileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<DateTime<Utc>>,
    pub hash: String,
    /// Bytes
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Per-status file counts for a run or rollback list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SqlFileSummary {
    pub run: usize,
    pub pending: usize,
    pub failed: usize,
}

impl SqlFileSummary {
    pub fn of(files: &[SqlFile]) -> Self {
        files.iter().fold(Self::default(), |mut acc, file| {
            match file.status {
                SqlFileStatus::Run => acc.run += 1,
                SqlFileStatus::Pending => acc.pending += 1,
                SqlFileStatus::Failed => acc.failed += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.run + self.pending + self.failed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Migration {
    pub id: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub status: MigrationStatus,
    #[serde(rename = "type")]
    pub kind: MigrationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_down: Option<String>,
    #[serde(default)]
    pub affected_tables: Vec<String>,
    #[serde(default)]
    pub changelog: Vec<ChangelogEntry>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub run_files: Vec<SqlFile>,
    #[serde(default)]
    pub rollback_files: Vec<SqlFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_count: Option<u32>,
}

impl Migration {
    /// Run plus rollback files actually attached to this migration
    pub fn total_files(&self) -> usize {
        self.run_files.len() + self.rollback_files.len()
    }

    pub fn run_summary(&self) -> SqlFileSummary {
        SqlFileSummary::of(&self.run_files)
    }

    pub fn rollback_summary(&self) -> SqlFileSummary {
        SqlFileSummary::of(&self.rollback_files)
    }
}

/// Most recent migration by timestamp. Ties keep the earlier list position.
pub fn latest_migration(migrations: &[Migration]) -> Option<&Migration> {
    migrations
        .iter()
        .rev()
        .max_by_key(|migration| migration.timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn migration(id: &str, kind: MigrationType, day: u32) -> Migration {
        Migration {
            id: id.to_string(),
            version: format!("v{}", id),
            description: String::new(),
            author: "tester".to_string(),
            timestamp: Utc.with_ymd_and_hms(2023, 1, day, 0, 0, 0).unwrap(),
            status: MigrationStatus::Pending,
            kind,
            sql_up: None,
            sql_down: None,
            affected_tables: Vec::new(),
            changelog: Vec::new(),
            dependencies: Vec::new(),
            metadata: BTreeMap::new(),
            run_files: Vec::new(),
            rollback_files: Vec::new(),
            file_count: None,
        }
    }

    fn file(status: SqlFileStatus) -> SqlFile {
        SqlFile {
            name: "001.sql".to_string(),
            full_path: "/migrations/001.sql".to_string(),
            status,
            executed_at: None,
            hash: "abc".to_string(),
            size: 10,
            git_author: None,
            last_modified: None,
            content: None,
        }
    }

    #[test]
    fn test_mode_filter() {
        let java = migration("1", MigrationType::Java, 1);
        let sql = migration("2", MigrationType::Sql, 2);

        assert!(MigrationType::Java.shows(&java));
        assert!(!MigrationType::Java.shows(&sql));
        assert!(MigrationType::Sql.shows(&sql));
        assert!(!MigrationType::Sql.shows(&java));
    }

    #[test]
    fn test_latest_migration() {
        let list = vec![
            migration("1", MigrationType::Java, 3),
            migration("2", MigrationType::Java, 9),
            migration("3", MigrationType::Sql, 5),
        ];
        assert_eq!(latest_migration(&list).unwrap().id, "2");
        assert!(latest_migration(&[]).is_none());
    }

    #[test]
    fn test_latest_migration_tie_keeps_first() {
        let list = vec![
            migration("a", MigrationType::Java, 4),
            migration("b", MigrationType::Java, 4),
        ];
        assert_eq!(latest_migration(&list).unwrap().id, "a");
    }

    #[test]
    fn test_file_summary() {
        let mut m = migration("7", MigrationType::Sql, 1);
        m.run_files = vec![
            file(SqlFileStatus::Run),
            file(SqlFileStatus::Run),
            file(SqlFileStatus::Failed),
        ];
        m.rollback_files = vec![file(SqlFileStatus::Pending)];

        assert_eq!(m.total_files(), 4);
        assert_eq!(
            m.run_summary(),
            SqlFileSummary {
                run: 2,
                pending: 0,
                failed: 1
            }
        );
        assert_eq!(m.rollback_summary().total(), 1);
    }

    #[test]
    fn test_type_wire_format() {
        assert_eq!("SQL".parse::<MigrationType>(), Ok(MigrationType::Sql));
        assert!("sql".parse::<MigrationType>().is_err());
        assert_eq!(MigrationType::Java.to_string(), "JAVA");
        assert_eq!(MigrationStatus::Partial.to_string(), "PARTIAL");
        assert_eq!(SqlFileStatus::Run.to_string(), "RUN");

        let m = migration("1", MigrationType::Sql, 1);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["type"], "SQL");
        assert_eq!(json["status"], "PENDING");
    }
}
