//! 文字列カタログの読み込みと書き出し

use std::io::ErrorKind;
use std::path::{
    Path,
    PathBuf,
};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{
    Map,
    Value,
};
use thiserror::Error;

use super::StringCatalog;

/// カタログ入出力エラー
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("File not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed string catalog {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize string catalog: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// カタログファイルを読み込む
///
/// # Errors
/// - ファイルが存在しない
/// - ファイル読み込みエラー
/// - JSON パースエラー、または `strings` が無い
pub fn load_catalog(path: &Path) -> Result<StringCatalog, CatalogError> {
    tracing::debug!("Loading string catalog from: {:?}", path);

    let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => CatalogError::NotFound(path.to_path_buf()),
        _ => CatalogError::Io { path: path.to_path_buf(), source },
    })?;

    parse_catalog(&content).map_err(|source| CatalogError::Parse { path: path.to_path_buf(), source })
}

/// JSON テキストからカタログを作成する
pub fn parse_catalog(text: &str) -> Result<StringCatalog, serde_json::Error> {
    serde_json::from_str(text)
}

/// 決定的な JSON テキストに変換する
///
/// 全階層のキーをソートし、2 スペースでインデントし、末尾に改行を付ける。
/// 非 ASCII 文字はエスケープせずそのまま出力する。
pub fn to_pretty_json(catalog: &StringCatalog) -> Result<String, CatalogError> {
    let value = sort_keys(serde_json::to_value(catalog)?);

    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"  "));
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');

    // serde_json は常に UTF-8 を出力する
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// カタログをファイルに書き出す
///
/// # Errors
/// - シリアライズエラー
/// - ファイル書き込みエラー
pub fn save_catalog(path: &Path, catalog: &StringCatalog) -> Result<(), CatalogError> {
    let text = to_pretty_json(catalog)?;

    std::fs::write(path, text)
        .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;

    tracing::debug!("Wrote string catalog to: {:?}", path);
    Ok(())
}

/// オブジェクトのキーを再帰的にソートする
///
/// `serde_json` の `preserve_order` が有効でも順序が変わらないよう、
/// ソート済みの順に挿入し直す。
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect::<Map<_, _>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
