// Configuration module entry point
// Layers defaults, config file, environment and command-line flags

mod state;
mod types;

use std::net::SocketAddr;
use std::path::Path;

use crate::cli::CliArgs;

pub use state::AppState;
pub use types::{Config, HttpConfig};

const DEFAULT_CONFIG_FILE: &str = "autoindex";

impl Config {
    /// Load configuration, lowest precedence first:
    /// defaults, config file, `AUTOINDEX_*` environment, command-line flags.
    ///
    /// The default config file is optional; one named with `--config` must exist.
    pub fn load(args: &CliArgs) -> Result<Self, config::ConfigError> {
        let config_file = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_file).required(args.config.is_some()))
            .add_source(
                config::Environment::with_prefix("AUTOINDEX")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3333)?
            .set_default("listing.root", ".")?
            .set_default("listing.show_hidden", true)?
            .set_default("listing.restrict_to_root", false)?
            .set_default("listing.binary_sizes", false)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default(
                "http.server_name",
                concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("http.enable_cors", false)?;

        if let Some(port) = args.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(host) = &args.host {
            builder = builder.set_override("server.host", host.as_str())?;
        }
        if let Some(dir) = &args.dir {
            builder = builder.set_override("listing.root", dir.as_str())?;
        }
        if let Some(template) = &args.template {
            builder = builder.set_override("listing.template", template.as_str())?;
        }

        builder.build()?.try_deserialize()
    }

    /// Reject configurations the server cannot start with
    pub fn validate(&self) -> Result<(), String> {
        let root = Path::new(&self.listing.root);
        if !root.is_dir() {
            return Err(format!(
                "Root directory '{}' does not exist or is not a directory",
                self.listing.root
            ));
        }
        match self.logging.access_log_format.as_str() {
            "combined" | "common" | "json" => {}
            other => return Err(format!("Unknown access log format '{other}'")),
        }
        self.get_socket_addr().map(|_| ())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args_for(dir: &Path) -> CliArgs {
        CliArgs {
            dir: Some(dir.display().to_string()),
            ..CliArgs::default()
        }
    }

    #[test]
    fn test_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::load(&args_for(tmp.path())).unwrap();
        assert_eq!(cfg.server.port, 3333);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert!(cfg.listing.show_hidden);
        assert!(!cfg.listing.restrict_to_root);
        assert!(cfg.listing.template.is_none());
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.http.server_name.starts_with("autoindex/"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_flags_override() {
        let tmp = TempDir::new().unwrap();
        let args = CliArgs {
            port: Some(8081),
            host: Some("0.0.0.0".to_string()),
            template: Some("page.html".to_string()),
            ..args_for(tmp.path())
        };
        let cfg = Config::load(&args).unwrap();
        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.get_socket_addr().unwrap().to_string(), "0.0.0.0:8081");
        assert_eq!(cfg.listing.template.as_deref(), Some("page.html"));
        assert_eq!(cfg.listing.root, tmp.path().display().to_string());
    }

    #[test]
    fn test_config_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("site.toml");
        std::fs::write(
            &file,
            "[server]\nport = 9090\n\n[listing]\nshow_hidden = false\nbinary_sizes = true\n",
        )
        .unwrap();

        let args = CliArgs {
            config: Some(file.display().to_string()),
            ..args_for(tmp.path())
        };
        let cfg = Config::load(&args).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert!(!cfg.listing.show_hidden);
        assert!(cfg.listing.binary_sizes);
    }

    #[test]
    fn test_named_config_file_must_exist() {
        let tmp = TempDir::new().unwrap();
        let args = CliArgs {
            config: Some(tmp.path().join("missing").display().to_string()),
            ..args_for(tmp.path())
        };
        assert!(Config::load(&args).is_err());
    }

    #[test]
    fn test_validate_missing_root() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::load(&args_for(&tmp.path().join("gone"))).unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("does not exist"));
    }

    #[test]
    fn test_validate_bad_log_format() {
        let tmp = TempDir::new().unwrap();
        let mut cfg = Config::load(&args_for(tmp.path())).unwrap();
        cfg.logging.access_log_format = "xml".to_string();
        assert!(cfg.validate().is_err());
    }
}
