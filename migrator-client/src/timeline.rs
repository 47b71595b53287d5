// DB Migrator timeline rendering
//
// Timeline cards and the detail panel for a selected migration, as text.

use migrator_utils::migration::SqlFileSummary;
use migrator_utils::{Migration, MigrationType, SqlFile};
use std::fmt::Write;

/// One timeline card: status icon, version, status, date and author, then
/// the description. SQL migrations add their file counts.
pub fn format_card(migration: &Migration, selected: bool) -> String {
    let marker = if selected { ">" } else { " " };
    let mut card = format!(
        "{} {} {:<8} {:<9} {} {}\n    {}",
        marker,
        migration.status.icon(),
        migration.version,
        migration.status.to_string(),
        migration.timestamp.format("%Y-%m-%d"),
        migration.author,
        migration.description
    );
    if migration.kind == MigrationType::Sql {
        let _ = write!(
            card,
            "\n    {} files, run {}",
            migration.total_files(),
            format_summary(&migration.run_summary())
        );
    }
    card
}

fn format_summary(summary: &SqlFileSummary) -> String {
    format!(
        "{} run / {} pending / {} failed",
        summary.run, summary.pending, summary.failed
    )
}

/// The whole timeline, one card per migration
pub fn render_timeline(migrations: &[&Migration], selected: Option<&str>) -> String {
    migrations
        .iter()
        .map(|m| format_card(m, selected == Some(m.id.as_str())))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_file(out: &mut String, file: &SqlFile) {
    let _ = write!(
        out,
        "\n  {:<8} {} ({} bytes, {})",
        file.status.to_string(),
        file.name,
        file.size,
        file.hash
    );
    if let Some(executed_at) = file.executed_at {
        let _ = write!(out, " executed {}", executed_at.format("%Y-%m-%d %H:%M:%S"));
    }
}

/// Detail panel for the selected migration
pub fn format_detail(migration: &Migration) -> String {
    let mut out = format!(
        "{} - {}\nStatus: {}  Type: {}  Author: {}  Date: {}",
        migration.version,
        migration.description,
        migration.status,
        migration.kind,
        migration.author,
        migration.timestamp.to_rfc3339()
    );

    if !migration.affected_tables.is_empty() {
        let _ = write!(out, "\nAffected tables: {}", migration.affected_tables.join(", "));
    }
    if !migration.dependencies.is_empty() {
        let _ = write!(out, "\nDepends on: {}", migration.dependencies.join(", "));
    }
    if let Some(sql_up) = &migration.sql_up {
        let _ = write!(out, "\n\n-- up\n{}", sql_up);
    }
    if let Some(sql_down) = &migration.sql_down {
        let _ = write!(out, "\n\n-- down\n{}", sql_down);
    }

    if migration.kind == MigrationType::Sql {
        let _ = write!(out, "\n\nRun files ({}):", format_summary(&migration.run_summary()));
        for file in &migration.run_files {
            format_file(&mut out, file);
        }
        let _ = write!(
            out,
            "\nRollback files ({}):",
            format_summary(&migration.rollback_summary())
        );
        for file in &migration.rollback_files {
            format_file(&mut out, file);
        }
    }

    if !migration.changelog.is_empty() {
        out.push_str("\n\nChangelog:");
        for entry in &migration.changelog {
            let _ = write!(out, "\n  {}  {}", entry.date, entry.message);
        }
    }
    if !migration.metadata.is_empty() {
        out.push_str("\n\nMetadata:");
        for (key, value) in &migration.metadata {
            let value = value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string());
            let _ = write!(out, "\n  {}: {}", key, value);
        }
    }
    out
}
