//! CLI エントリーポイント
/// コマンドライン引数
mod args;
/// サブコマンドの実行
mod commands;
/// コンソール出力
mod report;

use std::io::Write;
use std::process::ExitCode;

pub use args::{
    Cli,
    Command,
    MigrateArgs,
    TranslationsArgs,
};
pub use commands::{
    TranslationsRun,
    run_migrate,
    run_translations,
};
pub use report::{
    write_migration_failure,
    write_migration_start,
    write_migration_success,
    write_sql,
    write_translations_report,
};

use crate::config::ConfigManager;
use crate::migration::MigrationScript;

/// CLI を実行し、終了コードを返す
///
/// 設定・カタログの読み込み失敗、マイグレーション失敗は `FAILURE`。
pub async fn run(cli: Cli) -> ExitCode {
    let manager = match ConfigManager::load(&cli.workspace) {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!("Failed to load settings: {}", e);
            report_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout().lock();
    let (result, code) = match cli.command {
        Command::Translations(args) => match run_translations(&manager, &args) {
            Ok(run) => (write_translations_report(&mut stdout, &run), ExitCode::SUCCESS),
            Err(e) => {
                tracing::error!("Translation merge aborted: {}", e);
                report_error(&e);
                (Ok(()), ExitCode::FAILURE)
            }
        },
        Command::Migrate(args) if args.print_sql => {
            (write_sql(&mut stdout, &MigrationScript::DEALER_USERS_UPDATED_AT), ExitCode::SUCCESS)
        }
        Command::Migrate(args) => {
            let started = write_migration_start(&mut stdout).and_then(|()| stdout.flush());
            match (started, run_migrate(&manager, &args).await) {
                (Err(e), _) => (Err(e), ExitCode::FAILURE),
                (Ok(()), Ok(success)) => {
                    (write_migration_success(&mut stdout, &success), ExitCode::SUCCESS)
                }
                (Ok(()), Err(failure)) => {
                    (write_migration_failure(&mut stdout, &failure), ExitCode::FAILURE)
                }
            }
        }
    };

    if let Err(e) = result {
        tracing::error!("Failed to write report: {}", e);
        return ExitCode::FAILURE;
    }

    code
}

/// 致命的エラーを標準エラー出力に書く
fn report_error(error: &dyn std::error::Error) {
    let mut stderr = std::io::stderr().lock();
    if let Err(e) = writeln!(stderr, "Error: {error}") {
        tracing::error!("Failed to write to stderr: {}", e);
    }
}
