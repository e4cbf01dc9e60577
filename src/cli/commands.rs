//! サブコマンドの実行

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use super::args::{
    MigrateArgs,
    TranslationsArgs,
};
use crate::catalog::{
    CatalogError,
    load_catalog,
    save_catalog,
};
use crate::config::ConfigManager;
use crate::merge::{
    LanguagePair,
    MergeReport,
    merge_translations,
};
use crate::migration::{
    MigrationFailure,
    MigrationScript,
    MigrationSuccess,
    migrate,
};
use crate::translations::builtin_updates;

/// `translations` の実行結果
#[derive(Debug, Clone)]
pub struct TranslationsRun {
    pub path: PathBuf,
    pub languages: LanguagePair,
    pub report: MergeReport,
    /// ファイルを書き換えたか
    pub written: bool,
    pub dry_run: bool,
}

/// カタログを読み込み、マージし、変更があれば 1 回だけ書き出す
///
/// # Errors
/// 読み込みまたは書き出しに失敗した場合。読み込み失敗時は何も書き込まない。
pub fn run_translations(
    manager: &ConfigManager,
    args: &TranslationsArgs,
) -> Result<TranslationsRun, CatalogError> {
    let settings = &manager.settings().translations;
    let path = args.file.as_deref().map_or_else(|| manager.catalog_path(), |file| manager.resolve_path(file));

    let mut catalog = load_catalog(&path)?;
    tracing::debug!(keys = catalog.strings.len(), "Loaded string catalog");

    let updates = settings.updates.clone().unwrap_or_else(builtin_updates);
    let languages = settings.language_pair();
    let report = merge_translations(&mut catalog, &updates, &languages);

    let written = report.changed() && !args.dry_run;
    if written {
        save_catalog(&path, &catalog)?;
        tracing::info!(path = %path.display(), changes = report.changes().count(), "Updated string catalog");
    } else {
        tracing::info!(path = %path.display(), changed = report.changed(), "String catalog not written");
    }

    Ok(TranslationsRun { path, languages, report, written, dry_run: args.dry_run })
}

/// `migrate` の実行
///
/// 資格情報はプロセス環境変数を優先し、無ければ dotenv ファイルから読む。
pub async fn run_migrate(
    manager: &ConfigManager,
    args: &MigrateArgs,
) -> Result<MigrationSuccess, MigrationFailure> {
    let settings = &manager.settings().migration;
    let env_file = args
        .env_file
        .as_deref()
        .map_or_else(|| manager.resolve_path(Path::new(".env")), |file| manager.resolve_path(file));
    let dotenv = read_dotenv(&env_file);

    migrate(&MigrationScript::DEALER_USERS_UPDATED_AT, settings, |name| {
        std::env::var(name).ok().or_else(|| dotenv.get(name).cloned())
    })
    .await
}

/// dotenv ファイルを読み込む（存在しない場合は空）
///
/// プロセスの環境変数は変更しない。
fn read_dotenv(path: &Path) -> HashMap<String, String> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) => {
            tracing::debug!("No dotenv file at {:?}: {}", path, e);
            return HashMap::new();
        }
    };

    iter.filter_map(|item| match item {
        Ok(pair) => Some(pair),
        Err(e) => {
            tracing::warn!("Skipping malformed line in {:?}: {}", path, e);
            None
        }
    })
    .collect()
}
