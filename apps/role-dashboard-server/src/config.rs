//! Layered server configuration.
//!
//! Precedence, lowest first:
//! 1. built-in defaults
//! 2. YAML file passed with `--config`
//! 3. `ROLE_DASHBOARD_*` environment variables (`__` separates nested keys)
//! 4. `CONFIG_FILE_PATH` for the roles file path
//! 5. command line flags

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use role_dashboard::DashboardConfig;
use serde::{Deserialize, Serialize};

use crate::Cli;

/// Prefix of the environment variables overriding any setting.
pub const ENV_PREFIX: &str = "ROLE_DASHBOARD_";

/// Environment variable overriding the roles file path.
pub const ROLES_PATH_ENV: &str = "CONFIG_FILE_PATH";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub server: ListenConfig,
    pub logging: LoggingConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ListenConfig {
    /// Listen address; all interfaces by default.
    pub bind_addr: String,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive, used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl ServerConfig {
    /// Parsed listen address.
    ///
    /// # Errors
    /// Returns [`ConfigError::BindAddr`] if `server.bind_addr` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .bind_addr
            .parse()
            .map_err(|source| ConfigError::BindAddr {
                addr: self.server.bind_addr.clone(),
                source,
            })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        self.dashboard.validate()?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error(transparent)]
    Figment(#[from] Box<figment::Error>),

    #[error("invalid server.bind_addr '{addr}': {source}")]
    BindAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error(transparent)]
    Dashboard(#[from] role_dashboard::config::ConfigError),
}

/// Merge every configuration layer and validate the result.
///
/// # Errors
/// Returns [`ConfigError`] if the config file is missing, a layer does not
/// deserialize, or the merged values are invalid.
pub fn load(cli: &Cli) -> Result<ServerConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ServerConfig::default()));

    if let Some(path) = &cli.config {
        if !path.is_file() {
            return Err(ConfigError::MissingFile(path.clone()));
        }
        figment = figment.merge(Yaml::file(path));
    }

    figment = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(
            Env::raw()
                .only(&[ROLES_PATH_ENV])
                .map(|_| "dashboard.roles_path".into()),
        );

    if let Some(bind) = &cli.bind {
        figment = figment.merge(Serialized::default("server.bind_addr", bind));
    }
    if let Some(roles) = &cli.roles {
        figment = figment.merge(Serialized::default("dashboard.roles_path", roles));
    }
    if cli.json_logs {
        figment = figment.merge(Serialized::default("logging.json", true));
    }

    let cfg: ServerConfig = figment.extract().map_err(Box::new)?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use clap::Parser;
    use figment::Jail;
    use role_dashboard::ResolutionStrategy;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("role-dashboard-server").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_listen_on_all_interfaces() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let cfg = load(&cli(&[])).unwrap();

            assert_eq!(cfg, ServerConfig::default());
            assert_eq!(cfg.socket_addr().unwrap().port(), 8080);
            assert!(cfg.socket_addr().unwrap().ip().is_unspecified());
            assert_eq!(
                cfg.dashboard.roles_path,
                PathBuf::from("/config/roles.yaml")
            );
            Ok(())
        });
    }

    #[test]
    fn roles_path_env_overrides_default() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env(ROLES_PATH_ENV, "/etc/dashboard/roles.yaml");

            let cfg = load(&cli(&[])).unwrap();

            assert_eq!(
                cfg.dashboard.roles_path,
                PathBuf::from("/etc/dashboard/roles.yaml")
            );
            Ok(())
        });
    }

    #[test]
    fn file_env_and_flags_are_layered() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "dashboard.yaml",
                r"
server:
  bind_addr: 127.0.0.1:9000
logging:
  level: debug
dashboard:
  roles_path: /from/file.yaml
  strategy: groups
  headers:
    user: X-Auth-Request-User
",
            )?;
            jail.set_env("ROLE_DASHBOARD_LOGGING__LEVEL", "warn");
            jail.set_env(ROLES_PATH_ENV, "/from/env.yaml");

            let cfg = load(&cli(&["--config", "dashboard.yaml", "--bind", "127.0.0.1:9100"])).unwrap();

            assert_eq!(cfg.server.bind_addr, "127.0.0.1:9100");
            assert_eq!(cfg.logging.level, "warn");
            assert_eq!(cfg.dashboard.roles_path, PathBuf::from("/from/env.yaml"));
            assert_eq!(cfg.dashboard.strategy, ResolutionStrategy::Groups);
            assert_eq!(cfg.dashboard.headers.user, "X-Auth-Request-User");
            assert_eq!(cfg.dashboard.headers.groups, "X-Forwarded-Group");
            Ok(())
        });
    }

    #[test]
    fn roles_flag_wins_over_env() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env(ROLES_PATH_ENV, "/from/env.yaml");

            let cfg = load(&cli(&["--roles", "/from/flag.yaml", "--json-logs"])).unwrap();

            assert_eq!(cfg.dashboard.roles_path, PathBuf::from("/from/flag.yaml"));
            assert!(cfg.logging.json);
            Ok(())
        });
    }

    #[test]
    fn missing_config_file_is_an_error() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let err = load(&cli(&["--config", "absent.yaml"])).unwrap_err();
            assert!(matches!(err, ConfigError::MissingFile(_)));
            Ok(())
        });
    }

    #[test]
    fn unknown_fields_are_rejected() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("dashboard.yaml", "dashboard:\n  cache_ttl: 30\n")?;

            let err = load(&cli(&["--config", "dashboard.yaml"])).unwrap_err();
            assert!(matches!(err, ConfigError::Figment(_)));
            Ok(())
        });
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let err = load(&cli(&["--bind", "localhost"])).unwrap_err();
            assert!(matches!(err, ConfigError::BindAddr { .. }));
            Ok(())
        });
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("ROLE_DASHBOARD_DASHBOARD__HEADERS__USER", "not a header");

            let err = load(&cli(&[])).unwrap_err();
            assert!(matches!(err, ConfigError::Dashboard(_)));
            Ok(())
        });
    }
}
