//! Scoped in-flight operation tracking.
//!
//! Pages, widgets and app shells run asynchronous work concurrently and each
//! wants to know whether "its" work is still loading. Instead of wiring a
//! boolean per call site, operations register under a key and a scope:
//!
//! - [`LoadScope::Global`] gates the whole app (initial auth check),
//! - [`LoadScope::Route`] covers data needed before a destination renders,
//! - [`LoadScope::Component`] covers one widget's own fetches.
//!
//! ```
//! # async fn fetch_customers() -> Result<Vec<String>, std::io::Error> { Ok(Vec::new()) }
//! # async fn demo() -> Result<(), std::io::Error> {
//! use eatnbill_loading::{LoadScope, LoadingTracker, Track};
//!
//! let tracker = LoadingTracker::new();
//! let customers = tracker.with_loading(Track::component("customers:list"), fetch_customers()).await?;
//! assert!(!tracker.is_scope_loading(LoadScope::Component));
//! # let _ = customers;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod key;
pub mod registry;
pub mod scope;
mod spawn;
pub mod tracker;

pub use config::{TrackerConfig, TrackingMode};
pub use error::{ConfigError, ParseScopeError};
pub use key::OpKey;
pub use registry::ActiveRecord;
pub use scope::{LoadScope, ScopeFlags};
pub use tracker::{LoadingGuard, LoadingTracker, Track};
