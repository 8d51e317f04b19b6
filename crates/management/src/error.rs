use std::path::PathBuf;

use thiserror::Error;

/// The dynamic loader rejected a passthrough module candidate.
#[derive(Error, Debug)]
#[error("failed to open {}: {reason}", path.display())]
pub struct LoadError {
	pub path: PathBuf,
	pub reason: String,
}

/// Errors that can occur when reading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse {}: {source}", path.display())]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}
