use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseScopeError;

/// How broadly a loading indicator should be interpreted.
///
/// Scopes partition the same bookkeeping; they do not nest. A key active in
/// [`LoadScope::Route`] says nothing about [`LoadScope::Global`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadScope {
	/// App-wide gating, e.g. a full-page spinner during the initial auth check.
	Global,
	/// A navigation transition waiting on destination data.
	Route,
	/// A single widget or panel.
	#[default]
	Component,
}

impl LoadScope {
	/// Every scope, in storage order.
	pub const ALL: [Self; 3] = [Self::Global, Self::Route, Self::Component];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Global => "global",
			Self::Route => "route",
			Self::Component => "component",
		}
	}

	pub(crate) const fn index(self) -> usize {
		match self {
			Self::Global => 0,
			Self::Route => 1,
			Self::Component => 2,
		}
	}
}

impl fmt::Display for LoadScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LoadScope {
	type Err = ParseScopeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|scope| scope.as_str() == s)
			.ok_or_else(|| ParseScopeError(s.to_string()))
	}
}

/// Aggregate "is anything loading" flags, one per scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeFlags {
	pub global: bool,
	pub route: bool,
	pub component: bool,
}

impl ScopeFlags {
	/// Returns the flag for one scope.
	pub const fn get(self, scope: LoadScope) -> bool {
		match scope {
			LoadScope::Global => self.global,
			LoadScope::Route => self.route,
			LoadScope::Component => self.component,
		}
	}

	pub(crate) fn set(&mut self, scope: LoadScope, busy: bool) {
		match scope {
			LoadScope::Global => self.global = busy,
			LoadScope::Route => self.route = busy,
			LoadScope::Component => self.component = busy,
		}
	}

	/// Returns true when any scope has an active key.
	pub const fn any(self) -> bool {
		self.global || self.route || self.component
	}
}
