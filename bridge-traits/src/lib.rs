//! # Host Bridge Traits
//!
//! Capabilities the playback core needs from its host but cannot implement
//! portably.
//!
//! ## Traits
//!
//! - [`MediaBackend`](playback::MediaBackend) - Attach, play, pause, stop and
//!   release one media resource at a time
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Hosts should
//! convert platform errors into it with an actionable message; a refused
//! play-intent is reported as [`BridgeError::Rejected`].
//!
//! ## Thread Safety
//!
//! On native targets every bridge trait requires `Send + Sync` (see
//! [`platform`]); on `wasm32` the bounds are dropped.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::error::Result;
//! use bridge_traits::playback::{MediaBackend, ResourceId, ResourceRequest};
//!
//! pub struct HtmlAudioBackend { /* ... */ }
//!
//! #[async_trait::async_trait(?Send)]
//! impl MediaBackend for HtmlAudioBackend {
//!     fn attach(&self, request: ResourceRequest) -> Result<ResourceId> {
//!         // create <audio>, set src, register canplay/error/ended listeners
//!         todo!()
//!     }
//!     async fn play(&self, resource: ResourceId) -> Result<()> {
//!         // await element.play()
//!         todo!()
//!     }
//!     // ...
//! }
//! ```

pub mod error;
pub mod logging;
pub mod platform;
pub mod playback;

pub use error::BridgeError;

pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use playback::{MediaBackend, MediaSource, ResourceId, ResourceMetadata, ResourceRequest};
