use std::borrow::{Borrow, Cow};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for one logical in-flight operation.
///
/// Keys are only unique within a [`LoadScope`](crate::LoadScope); the same
/// text under two scopes names two independent operations. Keys built from
/// `&'static str` do not allocate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpKey(Cow<'static, str>);

impl OpKey {
	/// Sentinel used when a caller does not name its operation.
	pub const DEFAULT: Self = Self::from_static("default");

	/// Creates a key from owned or static text.
	pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
		Self(key.into())
	}

	/// Creates a key from static text without allocating.
	pub const fn from_static(key: &'static str) -> Self {
		Self(Cow::Borrowed(key))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Default for OpKey {
	fn default() -> Self {
		Self::DEFAULT
	}
}

impl fmt::Display for OpKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for OpKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for OpKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&'static str> for OpKey {
	fn from(key: &'static str) -> Self {
		Self::from_static(key)
	}
}

impl From<String> for OpKey {
	fn from(key: String) -> Self {
		Self(Cow::Owned(key))
	}
}

impl From<&OpKey> for OpKey {
	fn from(key: &OpKey) -> Self {
		key.clone()
	}
}
