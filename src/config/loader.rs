//! `.ezcar-ops.json` の読み込み

use std::io::ErrorKind;
use std::path::Path;

use super::{
    ConfigError,
    OpsSettings,
};

/// ワークスペース直下の設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".ezcar-ops.json";

/// ワークスペースの設定ファイルを読み込む
///
/// ファイルが無ければ `Ok(None)`。読めない・壊れている場合はパス付きのエラー。
pub(super) fn load_from_workspace(workspace_root: &Path) -> Result<Option<OpsSettings>, ConfigError> {
    let path = workspace_root.join(CONFIG_FILE_NAME);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(None);
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };

    let settings = serde_json::from_str(&content)
        .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;

    tracing::debug!(path = %path.display(), "Loaded configuration file");
    Ok(Some(settings))
}
