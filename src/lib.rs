//! ezcar-ops
//!
//! Ezcar24 の運用ツール: 文字列カタログへの翻訳マージと Supabase マイグレーション

pub mod catalog;
pub mod cli;
pub mod config;
pub mod merge;
pub mod migration;
pub mod translations;

pub use catalog::StringCatalog;
pub use merge::{
    LanguagePair,
    MergeReport,
    TranslationUpdate,
    merge_translations,
};
