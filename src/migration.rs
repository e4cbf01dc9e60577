//! Supabase SQL マイグレーション
/// Supabase RPC client
mod client;
/// 単発実行と失敗時の手順
mod runner;
/// 組み込みスクリプトと手動手順
mod script;

pub use client::{
    Credentials,
    MigrationError,
    SqlExecutor,
    SupabaseClient,
};
pub use runner::{
    MigrationFailure,
    MigrationSuccess,
    migrate,
    run_migration,
};
pub use script::{
    ManualInstructions,
    MigrationScript,
};
