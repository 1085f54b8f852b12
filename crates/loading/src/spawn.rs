use std::future::Future;

use tokio::task::JoinHandle;

use crate::tracker::{LoadingTracker, Track};

impl LoadingTracker {
	/// Spawns `fut` on the current tokio runtime, tracked under `track`.
	///
	/// Unlike [`Self::with_loading`], the key is started before this returns.
	/// It is stopped when the task finishes, panics, or is aborted.
	///
	/// # Panics
	///
	/// Panics when called outside a tokio runtime.
	pub fn spawn<F>(&self, track: Track, fut: F) -> JoinHandle<F::Output>
	where
		F: Future + Send + 'static,
		F::Output: Send + 'static,
	{
		tracing::trace!(scope = track.scope.as_str(), key = track.key.as_str(), "loading.spawn");
		let guard = self.guard(track.key, track.scope);
		tokio::spawn(async move {
			let _guard = guard;
			fut.await
		})
	}

	/// Runs blocking `f` on the tokio blocking pool, tracked under `track`.
	///
	/// The key is started before this returns and stopped once `f` returns or
	/// unwinds, or the task is aborted before `f` starts.
	///
	/// # Panics
	///
	/// Panics when called outside a tokio runtime.
	pub fn spawn_blocking<F, R>(&self, track: Track, f: F) -> JoinHandle<R>
	where
		F: FnOnce() -> R + Send + 'static,
		R: Send + 'static,
	{
		tracing::trace!(scope = track.scope.as_str(), key = track.key.as_str(), "loading.spawn_blocking");
		let guard = self.guard(track.key, track.scope);
		tokio::task::spawn_blocking(move || {
			let _guard = guard;
			f()
		})
	}
}
