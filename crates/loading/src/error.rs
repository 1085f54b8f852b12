//! Error types for the fallible edges of the tracker.
//!
//! Tracking itself never fails; only parsing scope names and loading
//! configuration can.

use std::path::PathBuf;

use thiserror::Error;

/// A scope name did not match any [`LoadScope`](crate::LoadScope).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown loading scope: {0} (expected global, route or component)")]
pub struct ParseScopeError(pub String);

/// Errors that can occur when loading tracker configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The input was not valid TOML or did not match the config shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
