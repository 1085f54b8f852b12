//! Tracker configuration.
//!
//! Configuration is TOML and entirely optional; [`TrackerConfig::default`]
//! is what [`LoadingTracker::new`](crate::LoadingTracker::new) uses.
//!
//! ```toml
//! # "counted" (default) or "coalesced"
//! mode = "counted"
//! # Report keys active for longer than this from `stale_operations`.
//! stale_after_ms = 30000
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// How repeated starts of one (key, scope) pair are accounted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingMode {
	/// Per-key reference count. A key stays active until every start has a
	/// matching stop.
	#[default]
	Counted,
	/// Presence only. A second start is a no-op and the first stop
	/// deactivates the key for every caller sharing it.
	Coalesced,
}

/// Configuration for one [`LoadingTracker`](crate::LoadingTracker).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
	/// Start/stop accounting mode.
	pub mode: TrackingMode,
	/// Age after which an active key is reported as stale, in milliseconds.
	pub stale_after_ms: Option<u64>,
}

impl TrackerConfig {
	/// Parses a TOML string into a [`TrackerConfig`].
	pub fn from_toml_str(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	/// Reads and parses a TOML config file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}

	/// Sets the accounting mode.
	#[must_use]
	pub fn mode(mut self, mode: TrackingMode) -> Self {
		self.mode = mode;
		self
	}

	/// Sets the stale-operation threshold.
	#[must_use]
	pub fn stale_after(mut self, threshold: Duration) -> Self {
		self.stale_after_ms = Some(u64::try_from(threshold.as_millis()).unwrap_or(u64::MAX));
		self
	}

	/// Returns the stale-operation threshold, if configured.
	pub fn stale_threshold(&self) -> Option<Duration> {
		self.stale_after_ms.map(Duration::from_millis)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	#[test]
	fn empty_input_is_default() {
		let config = TrackerConfig::from_toml_str("").unwrap();
		assert_eq!(config, TrackerConfig::default());
		assert_eq!(config.mode, TrackingMode::Counted);
		assert_eq!(config.stale_threshold(), None);
	}

	#[test]
	fn parses_both_modes() {
		let counted = TrackerConfig::from_toml_str(r#"mode = "counted""#).unwrap();
		assert_eq!(counted.mode, TrackingMode::Counted);

		let coalesced = TrackerConfig::from_toml_str("mode = \"coalesced\"\nstale_after_ms = 1500\n").unwrap();
		assert_eq!(coalesced.mode, TrackingMode::Coalesced);
		assert_eq!(coalesced.stale_threshold(), Some(Duration::from_millis(1500)));
	}

	#[test]
	fn rejects_unknown_mode() {
		let err = TrackerConfig::from_toml_str(r#"mode = "set""#).unwrap_err();
		assert!(matches!(err, ConfigError::Toml(_)), "got {err:?}");
	}

	#[test]
	fn rejects_unknown_fields() {
		assert!(TrackerConfig::from_toml_str("timeout_ms = 5").is_err());
	}

	#[test]
	fn builder_sets_fields() {
		let config = TrackerConfig::default().mode(TrackingMode::Coalesced).stale_after(Duration::from_secs(2));
		assert_eq!(config.mode, TrackingMode::Coalesced);
		assert_eq!(config.stale_after_ms, Some(2000));
	}

	#[test]
	fn loads_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "mode = \"coalesced\"").unwrap();

		let config = TrackerConfig::load(file.path()).unwrap();
		assert_eq!(config.mode, TrackingMode::Coalesced);
	}

	#[test]
	fn missing_file_reports_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("loading.toml");

		let err = TrackerConfig::load(&path).unwrap_err();
		match err {
			ConfigError::Io { path: reported, .. } => assert_eq!(reported, path),
			other => panic!("expected I/O error, got {other:?}"),
		}
	}
}
