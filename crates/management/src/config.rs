//! Service management configuration.
//!
//! Every field has a default matching a stock device layout, so an absent or
//! partial file is fine:
//!
//! ```toml
//! transport-endpoint = "/dev/hwbinder"
//! library-paths = ["/odm/lib64/hw", "/vendor/lib64/hw", "/system/lib64/hw"]
//! retry-interval-ms = 1000
//! ```
//!
//! The file named by `HWSVC_CONFIG` is read on first use of [`ServiceManagementConfig::global`].

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "HWSVC_CONFIG";

#[cfg(target_pointer_width = "64")]
const HAL_LIBRARY_DIR: &str = "lib64/hw";
#[cfg(not(target_pointer_width = "64"))]
const HAL_LIBRARY_DIR: &str = "lib/hw";

/// Settings for registry acquisition and passthrough lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServiceManagementConfig {
	/// Kernel endpoint probed before contacting the registry.
	pub transport_endpoint: PathBuf,
	/// Passthrough search roots, highest priority first.
	pub library_paths: Vec<PathBuf>,
	/// Pause between registry connection attempts.
	pub retry_interval_ms: u64,
}

impl Default for ServiceManagementConfig {
	fn default() -> Self {
		Self {
			transport_endpoint: PathBuf::from(hwsvc_transport::DEFAULT_ENDPOINT),
			library_paths: default_library_paths(),
			retry_interval_ms: 1000,
		}
	}
}

impl ServiceManagementConfig {
	/// Parses a TOML document. Missing keys keep their defaults.
	pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(s)
	}

	/// Reads and parses the file at `path`.
	pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
			path: path.to_path_buf(),
			source,
		})
	}

	/// Loads the file named by `HWSVC_CONFIG`, or defaults when it is unset.
	pub fn load() -> Result<Self, ConfigError> {
		match std::env::var_os(CONFIG_ENV) {
			Some(path) => Self::from_path(Path::new(&path)),
			None => Ok(Self::default()),
		}
	}

	/// Process-wide configuration, loaded once.
	///
	/// A broken file is logged and replaced by defaults.
	pub fn global() -> &'static Self {
		static GLOBAL: OnceLock<ServiceManagementConfig> = OnceLock::new();
		GLOBAL.get_or_init(|| {
			Self::load().unwrap_or_else(|e| {
				warn!(error = %e, "Ignoring service management config");
				Self::default()
			})
		})
	}

	pub fn retry_interval(&self) -> Duration {
		Duration::from_millis(self.retry_interval_ms)
	}
}

/// Device-specific, vendor, then generic system HAL directories.
pub fn default_library_paths() -> Vec<PathBuf> {
	["/odm", "/vendor", "/system"]
		.into_iter()
		.map(|root| Path::new(root).join(HAL_LIBRARY_DIR))
		.collect()
}
