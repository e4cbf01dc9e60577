//! 設定ファイル (`.ezcar-ops.json`) の型・読み込み・管理
/// Config file loader
mod loader;
/// Configuration manager
mod manager;
/// Configuration types and settings
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    MigrationSettings,
    OpsSettings,
    TranslationSettings,
    ValidationError,
};
