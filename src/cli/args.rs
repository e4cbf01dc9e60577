//! コマンドライン引数

use std::path::PathBuf;

use clap::{
    Args,
    Parser,
    Subcommand,
};

/// Operator tools for the Ezcar24 apps.
#[derive(Debug, Parser)]
#[command(name = "ezcar-ops", version, about)]
pub struct Cli {
    /// Workspace root holding `.ezcar-ops.json` and `.env`
    #[arg(short = 'C', long, global = true, default_value = ".", env = "EZCAR_OPS_WORKSPACE")]
    pub workspace: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge the translation set into the string catalog
    Translations(TranslationsArgs),

    /// Apply the dealer_users.updated_at migration through the Supabase RPC
    Migrate(MigrateArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct TranslationsArgs {
    /// String catalog to patch (overrides `translations.filePath`)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Report what would change without writing the file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct MigrateArgs {
    /// Print the SQL script and exit without contacting the server
    #[arg(long)]
    pub print_sql: bool,

    /// Dotenv file with the credentials (default: `<workspace>/.env`)
    #[arg(long)]
    pub env_file: Option<PathBuf>,
}
