//! 単発のマイグレーション実行
//!
//! 失敗時は再試行せず、手動適用の手順を添えて返す。

use super::{
    Credentials,
    ManualInstructions,
    MigrationError,
    MigrationScript,
    SqlExecutor,
    SupabaseClient,
};
use crate::config::MigrationSettings;

/// 実行成功
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationSuccess {
    /// 適用したスクリプト名
    pub script: &'static str,
}

/// 実行失敗: エラー種別と手動適用の手順
#[derive(Debug)]
pub struct MigrationFailure {
    pub error: MigrationError,
    pub instructions: ManualInstructions,
}

/// `executor` でスクリプトを 1 回だけ実行する
pub async fn run_migration<E: SqlExecutor>(
    executor: &E,
    script: &MigrationScript,
    instructions: ManualInstructions,
) -> Result<MigrationSuccess, MigrationFailure> {
    tracing::info!(script = script.name, "Executing SQL migration");

    match executor.execute_sql(script.sql).await {
        Ok(()) => {
            tracing::info!(script = script.name, "Migration completed");
            Ok(MigrationSuccess { script: script.name })
        }
        Err(error) => {
            tracing::error!(script = script.name, %error, "Migration failed");
            Err(MigrationFailure { error, instructions })
        }
    }
}

/// 資格情報の解決から実行までをまとめて行う
///
/// 資格情報が無い場合はネットワークに接続せず失敗を返す。
pub async fn migrate<F>(
    script: &MigrationScript,
    settings: &MigrationSettings,
    lookup: F,
) -> Result<MigrationSuccess, MigrationFailure>
where
    F: Fn(&str) -> Option<String>,
{
    let credentials = Credentials::from_lookup(settings, lookup);
    let project_url = credentials.as_ref().ok().map(|c| c.project_url.as_str());
    let instructions = ManualInstructions::new(script, settings, project_url);

    let client = credentials
        .and_then(|credentials| SupabaseClient::new(&credentials, &settings.rpc_function));

    match client {
        Ok(client) => {
            tracing::info!(url = %client.rpc_url(), "Connected to Supabase");
            run_migration(&client, script, instructions).await
        }
        Err(error) => {
            tracing::error!(%error, "Cannot create Supabase client");
            Err(MigrationFailure { error, instructions })
        }
    }
}
