//! ワークスペースと検証済み設定の保持

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    OpsSettings,
    loader,
};

/// 1 回の実行で使うワークスペースと設定
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 検証済みの設定
    settings: OpsSettings,

    /// 相対パスの基準
    workspace_root: PathBuf,
}

impl ConfigManager {
    /// `workspace_root` の `.ezcar-ops.json` を読み込んで検証する
    ///
    /// ファイルが無ければデフォルト設定を使う。
    pub fn load(workspace_root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let workspace_root = workspace_root.into();
        let settings = loader::load_from_workspace(&workspace_root)?.unwrap_or_default();

        Self::with_settings(workspace_root, settings)
    }

    /// 設定ファイルを介さずに作成する
    pub fn with_settings(
        workspace_root: impl Into<PathBuf>,
        settings: OpsSettings,
    ) -> Result<Self, ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        let workspace_root = workspace_root.into();
        tracing::debug!(workspace = %workspace_root.display(), ?settings, "Settings ready");

        Ok(Self { settings, workspace_root })
    }

    #[must_use]
    pub const fn settings(&self) -> &OpsSettings {
        &self.settings
    }

    /// ワークスペース相対のパスを解決する（絶対パスはそのまま）
    #[must_use]
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        self.workspace_root.join(path)
    }

    /// 文字列カタログのパス
    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.resolve_path(Path::new(&self.settings.translations.file_path))
    }
}
