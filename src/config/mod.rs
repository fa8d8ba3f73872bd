// Configuration module entry point
// Layers built-in defaults, an optional TOML file, environment and CLI flags

mod state;
mod types;

use std::net::SocketAddr;

use crate::cli::Cli;
use crate::error::StartupError;

// Re-export public types
pub use state::AppState;
pub use types::{
    AccessLogFormat, Config, HttpConfig, LoggingConfig, ServerConfig,
    UnknownExtensionPolicy,
};

/// Environment variable prefix, e.g. `COI_SERVER__SERVER__PORT=9000`
const ENV_PREFIX: &str = "COI_SERVER";

impl Config {
    /// Load configuration from the file named on the command line and apply CLI overrides
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let settings = Self::builder(&cli.config)?
            .set_override_option("server.root", cli.root.clone())?
            .set_override_option("server.host", cli.host.clone())?
            .set_override_option("server.port", cli.port.map(i64::from))?
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from specified file path (without extension), no CLI overrides
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::builder(config_path)?.build()?.try_deserialize()
    }

    fn builder(
        config_path: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.root", ".")?
            .set_default("http.unknown_extension", "reject")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "simple")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| StartupError::Address { addr, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does/not/exist/coi_server").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.root, ".");
        assert_eq!(cfg.http.unknown_extension, UnknownExtensionPolicy::Reject);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, AccessLogFormat::Simple);
        assert!(cfg.logging.access_log_file.is_none());
    }

    #[test]
    fn test_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9090
root = "dist"

[http]
unknown_extension = "octet_stream"

[logging]
access_log_format = "json"
"#,
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.root, "dist");
        assert_eq!(cfg.http.unknown_extension, UnknownExtensionPolicy::OctetStream);
        assert_eq!(cfg.logging.access_log_format, AccessLogFormat::Json);
    }

    #[test]
    fn test_tuning_keys_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9091
workers = 2

[performance]
keep_alive = false
connection_timeout = 30
max_connections = 16
"#,
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9091);
        let json = serde_json::to_value(&cfg).unwrap();
        assert!(json.get("performance").is_none());
        assert!(json["server"].get("workers").is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "coi_server",
            "--config",
            "does/not/exist/coi_server",
            "-p",
            "3000",
            "--host",
            "127.0.0.1",
            "/srv/app",
        ]);
        let cfg = Config::load(&cli).unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.root, "/srv/app");
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:3000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_invalid_host() {
        let mut cfg = Config::load_from("does/not/exist/coi_server").unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(matches!(
            cfg.get_socket_addr(),
            Err(StartupError::Address { .. })
        ));
    }
}
