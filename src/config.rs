//! Command-line and environment configuration.

use std::net::SocketAddr;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "quill")]
#[command(about = "A small blog: HTML pages and a JSON API for users and posts")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "QUILL_ADDR", default_value = "127.0.0.1:8000")]
    pub addr: SocketAddr,

    /// Database URL, e.g. `sqlite://quill.db?mode=rwc`.
    #[arg(long, env = "QUILL_DATABASE_URL", default_value = "sqlite://quill.db?mode=rwc")]
    pub database_url: String,

    /// Upper bound on pooled database connections.
    #[arg(long, env = "QUILL_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Log filter directives; `RUST_LOG` wins when set.
    #[arg(long, env = "QUILL_LOG")]
    pub log_filter: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,

    /// Log every SQL statement.
    #[arg(long)]
    pub sql_log: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_arguments() {
        let config = Config::try_parse_from(["quill"]).unwrap();
        assert_eq!(config.max_connections, 5);
        assert!(!config.log_json);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "quill",
            "--addr",
            "0.0.0.0:9000",
            "--database-url",
            "sqlite::memory:",
            "--log-json",
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(config.log_json);
    }

    #[test]
    fn rejects_malformed_address() {
        assert!(Config::try_parse_from(["quill", "--addr", "nowhere"]).is_err());
    }
}
