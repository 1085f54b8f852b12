//! Scoped loading tracker.
//!
//! [`LoadingTracker`] lets unrelated asynchronous operations declare
//! themselves in progress under an [`OpKey`] and a [`LoadScope`], and answers
//! "is anything loading here?" for a key, a scope, or the whole app. The
//! primary entry point is [`LoadingTracker::with_loading`], which pairs every
//! start with a stop on all exit paths.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::config::TrackerConfig;
use crate::key::OpKey;
use crate::registry::{ActiveRecord, ActiveRegistry};
use crate::scope::{LoadScope, ScopeFlags};


/// Key and scope for one tracked operation.
///
/// The default tracks [`OpKey::DEFAULT`] in [`LoadScope::Component`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Track {
	pub key: OpKey,
	pub scope: LoadScope,
}

impl Track {
	pub fn new(key: impl Into<OpKey>, scope: LoadScope) -> Self {
		Self { key: key.into(), scope }
	}

	pub fn global(key: impl Into<OpKey>) -> Self {
		Self::new(key, LoadScope::Global)
	}

	pub fn route(key: impl Into<OpKey>) -> Self {
		Self::new(key, LoadScope::Route)
	}

	pub fn component(key: impl Into<OpKey>) -> Self {
		Self::new(key, LoadScope::Component)
	}
}

#[derive(Debug)]
struct TrackerInner {
	config: TrackerConfig,
	registry: Mutex<ActiveRegistry>,
	flags: watch::Sender<ScopeFlags>,
}

/// Shared handle to one set of in-flight operations.
///
/// Cloning is cheap and every clone observes the same state. Inject the
/// handle where it is needed; separate trackers never share state.
#[derive(Debug, Clone)]
pub struct LoadingTracker {
	inner: Arc<TrackerInner>,
}

impl Default for LoadingTracker {
	fn default() -> Self {
		Self::new()
	}
}

impl LoadingTracker {
	/// Creates an empty tracker with the default configuration.
	pub fn new() -> Self {
		Self::with_config(TrackerConfig::default())
	}

	/// Creates an empty tracker with an explicit configuration.
	pub fn with_config(config: TrackerConfig) -> Self {
		let (flags, _) = watch::channel(ScopeFlags::default());
		Self {
			inner: Arc::new(TrackerInner {
				config,
				registry: Mutex::new(ActiveRegistry::default()),
				flags,
			}),
		}
	}

	pub fn config(&self) -> &TrackerConfig {
		&self.inner.config
	}

	/// Marks `key` active within `scope`.
	///
	/// Starting an already active key keeps it active; whether the extra start
	/// needs its own stop depends on [`TrackingMode`](crate::TrackingMode).
	pub fn start(&self, key: impl Into<OpKey>, scope: LoadScope) {
		self.start_in_epoch(key.into(), scope);
	}

	fn start_in_epoch(&self, key: OpKey, scope: LoadScope) -> u64 {
		let mut registry = self.inner.registry.lock();
		let count = registry.start(key.clone(), scope, self.inner.config.mode);
		tracing::trace!(scope = scope.as_str(), key = key.as_str(), count, "loading.start");
		self.publish(&registry);
		registry.epoch()
	}

	/// Releases one start of `key` within `scope`. Stopping an inactive key
	/// is a no-op.
	pub fn stop(&self, key: impl AsRef<str>, scope: LoadScope) {
		let mut registry = self.inner.registry.lock();
		self.stop_locked(&mut registry, key.as_ref(), scope);
	}

	fn stop_in_epoch(&self, key: &str, scope: LoadScope, epoch: u64) {
		let mut registry = self.inner.registry.lock();
		if registry.epoch() != epoch {
			tracing::trace!(scope = scope.as_str(), key, "loading.stop_after_clear");
			return;
		}
		self.stop_locked(&mut registry, key, scope);
	}

	fn stop_locked(&self, registry: &mut ActiveRegistry, key: &str, scope: LoadScope) {
		match registry.stop(key, scope, self.inner.config.mode) {
			Some(remaining) => {
				tracing::trace!(scope = scope.as_str(), key, remaining, "loading.stop");
				self.publish(registry);
			}
			None => tracing::trace!(scope = scope.as_str(), key, "loading.stop_inactive"),
		}
	}

	/// Pushes the aggregate flags to subscribers if any scope flipped.
	///
	/// Called with the registry lock held so flag updates are published in
	/// mutation order.
	fn publish(&self, registry: &ActiveRegistry) {
		let next = registry.flags();
		self.inner.flags.send_if_modified(|flags| {
			if *flags == next {
				return false;
			}
			for scope in LoadScope::ALL {
				match (flags.get(scope), next.get(scope)) {
					(false, true) => tracing::debug!(scope = scope.as_str(), "loading.scope_busy"),
					(true, false) => tracing::debug!(scope = scope.as_str(), "loading.scope_idle"),
					_ => {}
				}
			}
			*flags = next;
			true
		});
	}

	/// Returns whether `key` is active within `scope`.
	pub fn is_loading(&self, key: impl AsRef<str>, scope: LoadScope) -> bool {
		self.inner.registry.lock().contains(key.as_ref(), scope)
	}

	/// Returns whether any scope has an active key.
	pub fn is_any_loading(&self) -> bool {
		self.inner.registry.lock().flags().any()
	}

	/// Returns whether `scope` has any active key.
	pub fn is_scope_loading(&self, scope: LoadScope) -> bool {
		self.inner.registry.lock().is_scope_active(scope)
	}

	/// Returns the active keys of one scope, or of every scope when `scope` is
	/// `None`.
	///
	/// The union is deduplicated. Callers must not rely on ordering.
	pub fn active_keys(&self, scope: Option<LoadScope>) -> Vec<OpKey> {
		self.inner.registry.lock().keys(scope)
	}

	/// Empties every scope at once.
	///
	/// Operations still running keep running. Their guards become inert, so
	/// their eventual release cannot disturb keys started after the clear.
	pub fn clear_all(&self) {
		let mut registry = self.inner.registry.lock();
		let cleared = registry.clear();
		tracing::debug!(cleared, "loading.clear_all");
		self.publish(&registry);
	}

	/// Returns the current aggregate flags.
	pub fn flags(&self) -> ScopeFlags {
		*self.inner.flags.borrow()
	}

	/// Subscribes to aggregate flag changes.
	///
	/// The receiver is only notified when a scope flips between idle and
	/// busy. Do not hold a borrow of the receiver across tracker calls.
	pub fn subscribe(&self) -> watch::Receiver<ScopeFlags> {
		self.inner.flags.subscribe()
	}

	/// Returns every active (scope, key) pair, sorted by scope then key.
	pub fn snapshot(&self) -> Vec<ActiveRecord> {
		self.inner.registry.lock().records(Instant::now())
	}

	/// Returns active records older than the configured stale threshold and
	/// logs each one. Empty when no threshold is configured.
	///
	/// Reporting never removes a key.
	pub fn stale_operations(&self) -> Vec<ActiveRecord> {
		let Some(threshold) = self.inner.config.stale_threshold() else {
			return Vec::new();
		};
		let stale: Vec<_> = self.snapshot().into_iter().filter(|record| record.age >= threshold).collect();
		for record in &stale {
			tracing::warn!(
				scope = record.scope.as_str(),
				key = record.key.as_str(),
				count = record.count,
				age = ?record.age,
				"loading.stale"
			);
		}
		stale
	}

	/// Starts tracking `key` within `scope` until the returned guard drops.
	pub fn guard(&self, key: impl Into<OpKey>, scope: LoadScope) -> LoadingGuard {
		let key = key.into();
		let epoch = self.start_in_epoch(key.clone(), scope);
		LoadingGuard {
			tracker: self.clone(),
			key,
			scope,
			epoch,
			released: false,
		}
	}

	/// Tracks `task` under `track` for as long as it runs.
	///
	/// The key is started when the returned future is first polled and
	/// stopped on every exit path: completion, panic, or the future being
	/// dropped before completion. The task's output, including any `Err`, is
	/// returned unchanged.
	pub async fn with_loading<F>(&self, track: Track, task: F) -> F::Output
	where
		F: Future,
	{
		let _guard = self.guard(track.key, track.scope);
		task.await
	}
}

/// RAII scoped acquisition returned by [`LoadingTracker::guard`].
#[derive(Debug)]
#[must_use = "dropping the guard immediately stops tracking"]
pub struct LoadingGuard {
	tracker: LoadingTracker,
	key: OpKey,
	scope: LoadScope,
	epoch: u64,
	released: bool,
}

impl LoadingGuard {
	pub fn key(&self) -> &OpKey {
		&self.key
	}

	pub fn scope(&self) -> LoadScope {
		self.scope
	}

	/// Stops tracking now instead of at drop.
	pub fn release(mut self) {
		self.stop();
	}

	fn stop(&mut self) {
		if std::mem::replace(&mut self.released, true) {
			return;
		}
		self.tracker.stop_in_epoch(self.key.as_str(), self.scope, self.epoch);
	}
}

impl Drop for LoadingGuard {
	fn drop(&mut self) {
		self.stop();
	}
}
