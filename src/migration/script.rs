//! Migration scripts and the manual fallback shown when they cannot be applied.

use std::fmt;

use crate::config::MigrationSettings;

/// A SQL script sent as one payload.
///
/// Scripts must be idempotent: the operator may run them again by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationScript {
    pub name: &'static str,
    pub description: &'static str,
    pub sql: &'static str,
}

impl MigrationScript {
    /// Adds `dealer_users.updated_at` and keeps it current with a trigger.
    pub const DEALER_USERS_UPDATED_AT: Self = Self {
        name: "dealer_users_updated_at",
        description: "Add updated_at column and trigger to dealer_users",
        sql: DEALER_USERS_UPDATED_AT_SQL,
    };
}

/// `dealer_users.updated_at` migration
const DEALER_USERS_UPDATED_AT_SQL: &str = r"
-- Add updated_at column to dealer_users table
ALTER TABLE dealer_users
ADD COLUMN IF NOT EXISTS updated_at TIMESTAMPTZ DEFAULT NOW();

-- Keep updated_at current on every row update
CREATE OR REPLACE FUNCTION update_updated_at_column()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ language 'plpgsql';

DROP TRIGGER IF EXISTS update_dealer_users_updated_at ON dealer_users;
CREATE TRIGGER update_dealer_users_updated_at
    BEFORE UPDATE ON dealer_users
    FOR EACH ROW
    EXECUTE FUNCTION update_updated_at_column();

-- Backfill rows created before the column existed
UPDATE dealer_users
SET updated_at = created_at
WHERE updated_at IS NULL;

ALTER TABLE dealer_users
ALTER COLUMN updated_at SET NOT NULL;
";

/// Steps for applying a script by hand through the dashboard SQL editor.
///
/// The rendered block ends with the full SQL, so it can be acted on as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualInstructions {
    pub dashboard_url: Option<String>,
    pub steps: Vec<String>,
    pub sql: &'static str,
}

impl ManualInstructions {
    /// `dashboardUrl` が未設定ならプロジェクト URL を使う
    #[must_use]
    pub fn new(
        script: &MigrationScript,
        settings: &MigrationSettings,
        project_url: Option<&str>,
    ) -> Self {
        let dashboard_url =
            settings.dashboard_url.as_deref().or(project_url).map(ToString::to_string);

        let open_step = dashboard_url.as_ref().map_or_else(
            || "Open the Supabase Dashboard and select your project".to_string(),
            |url| format!("Go to: {url}"),
        );

        let steps = vec![
            open_step,
            "Navigate to: SQL Editor".to_string(),
            format!("Paste the SQL below (also printed by `{PRINT_SQL_COMMAND}`)"),
            "Click 'Run'".to_string(),
        ];

        Self { dashboard_url, steps, sql: script.sql }
    }
}

/// スクリプトだけを出力するコマンド
const PRINT_SQL_COMMAND: &str = "ezcar-ops migrate --print-sql";

impl fmt::Display for ManualInstructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Please run the migration manually through the Supabase Dashboard:")?;
        writeln!(f)?;
        for (index, step) in self.steps.iter().enumerate() {
            writeln!(f, "{}. {step}", index + 1)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.sql.trim())
    }
}
