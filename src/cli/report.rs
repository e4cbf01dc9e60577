//! 運用者向けのコンソール出力
//!
//! 機械可読ではない。診断ログは `tracing` 側に出す。

use std::io::{
    self,
    Write,
};

use super::commands::TranslationsRun;
use crate::merge::MergeAction;
use crate::migration::{
    MigrationFailure,
    MigrationScript,
    MigrationSuccess,
};

/// カタログのファイル名（表示用）
fn file_name(run: &TranslationsRun) -> String {
    run.path.file_name().map_or_else(
        || run.path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

pub fn write_translations_report(out: &mut impl Write, run: &TranslationsRun) -> io::Result<()> {
    let secondary = &run.languages.secondary;

    for outcome in &run.report.outcomes {
        match &outcome.action {
            MergeAction::Inserted => writeln!(out, "Adding new key: {}", outcome.key)?,
            MergeAction::AddedSecondary => writeln!(
                out,
                "Adding {secondary} translation for existing key: {}",
                outcome.key
            )?,
            MergeAction::UpdatedSecondary { .. } => {
                writeln!(out, "Updating {secondary} translation for key: {}", outcome.key)?;
            }
            MergeAction::Skipped { reason } => {
                writeln!(out, "Skipping key {}: {reason}", outcome.key)?;
            }
            MergeAction::Unchanged => {}
        }
    }

    let file = file_name(run);
    if run.written {
        writeln!(out, "Updated {file} successfully.")
    } else if run.dry_run && run.report.changed() {
        writeln!(out, "Dry run: {} change(s) not written to {file}.", run.report.changes().count())
    } else {
        writeln!(out, "No changes needed in {file}.")
    }
}

pub fn write_migration_start(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "🚀 Starting Supabase Migration...")?;
    writeln!(out)
}

pub fn write_migration_success(out: &mut impl Write, success: &MigrationSuccess) -> io::Result<()> {
    writeln!(out, "✅ Migration {} completed successfully!", success.script)?;
    writeln!(out)?;
    writeln!(out, "Next steps:")?;
    writeln!(out, "1. Restart your app")?;
    writeln!(out, "2. Try syncing data")
}

pub fn write_migration_failure(out: &mut impl Write, failure: &MigrationFailure) -> io::Result<()> {
    writeln!(out, "❌ Error: {}", failure.error)?;
    writeln!(out)?;
    write!(out, "{}", failure.instructions)
}

pub fn write_sql(out: &mut impl Write, script: &MigrationScript) -> io::Result<()> {
    writeln!(out, "-- {}", script.description)?;
    writeln!(out, "{}", script.sql.trim())
}
