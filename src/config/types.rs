// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

use crate::listing::SizeUnits;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub listing: ListingConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// What is listed and how
#[derive(Debug, Deserialize, Clone)]
pub struct ListingConfig {
    /// Directory served at `/`
    pub root: String,
    /// Page template file; the built-in template is used when unset
    #[serde(default)]
    pub template: Option<String>,
    pub show_hidden: bool,
    /// Only `/` itself may be requested (single fixed directory)
    pub restrict_to_root: bool,
    /// KiB/MiB instead of kB/MB
    pub binary_sizes: bool,
}

impl ListingConfig {
    pub const fn size_units(&self) -> SizeUnits {
        if self.binary_sizes {
            SizeUnits::Binary
        } else {
            SizeUnits::Decimal
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
}
