use clap::Parser;

pub const MAX_EXPORT_URL_TTL_MINUTES: i64 = 525_600;

/// Runtime settings, read once at startup from flags or the environment (`.env` included)
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = "Todo CRUD API with CSV exports to blob storage")]
pub struct Config {
    /// Postgres connection string
    #[clap(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Shared secret expected in the `x-api-key` header
    #[clap(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Azure storage connection string, exports are disabled without it
    #[clap(long, env = "AZURE_STORAGE_CONNECTION_STRING", hide_env_values = true)]
    pub storage_connection_string: Option<String>,

    /// Blob container receiving the exports
    #[clap(long, env = "AZURE_CONTAINER", default_value = "todo-exports")]
    pub container: String,

    /// How long an export download link stays valid, at most a year
    #[clap(
        long,
        env = "EXPORT_URL_TTL_MINUTES",
        default_value_t = 15,
        value_parser = clap::value_parser!(i64).range(1..=MAX_EXPORT_URL_TTL_MINUTES)
    )]
    pub export_url_ttl_minutes: i64,

    /// Address the server listens on
    #[clap(long, env = "API_URL", default_value = "localhost:9000")]
    pub bind: String,

    #[clap(long, env = "DB_POOL_SIZE", default_value_t = 10)]
    pub pool_size: u32,
}
