use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::config::TrackingMode;
use crate::key::OpKey;
use crate::scope::{LoadScope, ScopeFlags};

/// Snapshot of one active (scope, key) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRecord {
	pub scope: LoadScope,
	pub key: OpKey,
	/// Outstanding starts. Always 1 in [`TrackingMode::Coalesced`].
	pub count: usize,
	/// Time since the key became active.
	pub age: Duration,
}

#[derive(Debug, Clone, Copy)]
struct ActiveEntry {
	count: usize,
	since: Instant,
}

/// Per-scope active-key bookkeeping.
///
/// A key is present in a scope iff it has an outstanding start under the
/// configured [`TrackingMode`]. Entries never hold a zero count.
#[derive(Debug, Default)]
pub(crate) struct ActiveRegistry {
	scopes: [FxHashMap<OpKey, ActiveEntry>; 3],
	epoch: u64,
}

impl ActiveRegistry {
	/// Marks `key` active and returns its outstanding count.
	pub fn start(&mut self, key: OpKey, scope: LoadScope, mode: TrackingMode) -> usize {
		let entry = self.scopes[scope.index()].entry(key).or_insert_with(|| ActiveEntry {
			count: 0,
			since: Instant::now(),
		});
		entry.count = match mode {
			TrackingMode::Counted => entry.count.saturating_add(1),
			TrackingMode::Coalesced => 1,
		};
		entry.count
	}

	/// Releases one start of `key`.
	///
	/// Returns `None` when the key was not active, otherwise the remaining
	/// count (0 once the key is gone).
	pub fn stop(&mut self, key: &str, scope: LoadScope, mode: TrackingMode) -> Option<usize> {
		let map = &mut self.scopes[scope.index()];
		let entry = map.get_mut(key)?;
		let remaining = match mode {
			TrackingMode::Counted => entry.count - 1,
			TrackingMode::Coalesced => 0,
		};
		if remaining == 0 {
			map.remove(key);
		} else {
			entry.count = remaining;
		}
		Some(remaining)
	}

	pub fn contains(&self, key: &str, scope: LoadScope) -> bool {
		self.scopes[scope.index()].contains_key(key)
	}

	pub fn is_scope_active(&self, scope: LoadScope) -> bool {
		!self.scopes[scope.index()].is_empty()
	}

	pub fn flags(&self) -> ScopeFlags {
		let mut flags = ScopeFlags::default();
		for scope in LoadScope::ALL {
			flags.set(scope, self.is_scope_active(scope));
		}
		flags
	}

	/// Returns active keys for one scope, or the deduplicated union of all
	/// scopes, sorted.
	pub fn keys(&self, scope: Option<LoadScope>) -> Vec<OpKey> {
		let mut keys: Vec<OpKey> = match scope {
			Some(scope) => self.scopes[scope.index()].keys().cloned().collect(),
			None => self.scopes.iter().flat_map(|map| map.keys().cloned()).collect(),
		};
		keys.sort();
		keys.dedup();
		keys
	}

	/// Empties every scope and advances the epoch. Returns the number of
	/// (scope, key) pairs removed.
	pub fn clear(&mut self) -> usize {
		let cleared = self.scopes.iter().map(|map| map.len()).sum();
		for map in &mut self.scopes {
			map.clear();
		}
		self.epoch = self.epoch.wrapping_add(1);
		cleared
	}

	/// Generation of the registry contents; bumped by every [`Self::clear`].
	pub const fn epoch(&self) -> u64 {
		self.epoch
	}

	/// Returns records sorted by scope, then key.
	pub fn records(&self, now: Instant) -> Vec<ActiveRecord> {
		let mut records: Vec<_> = LoadScope::ALL
			.into_iter()
			.flat_map(|scope| {
				self.scopes[scope.index()].iter().map(move |(key, entry)| ActiveRecord {
					scope,
					key: key.clone(),
					count: entry.count,
					age: now.saturating_duration_since(entry.since),
				})
			})
			.collect();
		records.sort_by(|a, b| a.scope.cmp(&b.scope).then_with(|| a.key.cmp(&b.key)));
		records
	}
}
