//! # Core Configuration Module
//!
//! Holds the host-provided bridges and runtime settings the player needs.
//!
//! ## Overview
//!
//! [`CoreConfig`] is built with [`CoreConfig::builder()`]. The builder fails
//! fast when a required bridge is missing so hosts get an actionable message
//! at startup rather than a silent widget.
//!
//! ## Required Dependencies
//!
//! - `MediaBackend` - attaches and drives the single media resource
//!
//! ## Optional Settings
//!
//! - `LoggingConfig` - when present, the service installs the global
//!   `tracing` subscriber during bootstrap
//! - event bus capacity and [`FeatureFlags`]
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .media_backend(Arc::new(HtmlAudioBackend::new()))
//!     .event_buffer_size(32)
//!     .autoplay_on_start(false)
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // Panics with an actionable CapabilityMissing error
//! let config = CoreConfig::builder()
//!     .build()
//!     .expect("Should fail - missing media backend");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use crate::logging::LoggingConfig;
use bridge_traits::MediaBackend;
use std::sync::Arc;

/// Upper bound for the event bus buffer.
const MAX_EVENT_BUFFER_SIZE: usize = 4096;

/// Runtime configuration for the player core.
#[derive(Clone)]
pub struct CoreConfig {
    /// Media backend that owns the platform's playable resource (required)
    pub media_backend: Arc<dyn MediaBackend>,

    /// Logging setup applied at bootstrap; `None` leaves the global
    /// subscriber to the host
    pub logging: Option<LoggingConfig>,

    /// Per-subscriber buffer of the playback event bus
    pub event_buffer_size: usize,

    pub features: FeatureFlags,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("media_backend", &"MediaBackend { ... }")
            .field("logging", &self.logging)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("features", &self.features)
            .finish()
    }
}

/// Feature flags control optional behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Publish coarse playback events on the event bus
    pub emit_events: bool,

    /// Issue a play-intent as soon as the service starts. Browsers usually
    /// reject this without a user gesture, which surfaces as a
    /// `PlaybackRejected` fault.
    pub autoplay_on_start: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            emit_events: true,
            autoplay_on_start: false,
        }
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        Ok(())
    }
}

fn media_backend_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "MediaBackend".to_string(),
        message: "A MediaBackend implementation is required to attach playable resources. \
                 Web: inject an HTMLAudioElement-backed adapter. \
                 Native: inject an adapter over the platform audio player."
            .to_string(),
    }
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    media_backend: Option<Arc<dyn MediaBackend>>,
    logging: Option<LoggingConfig>,
    event_buffer_size: Option<usize>,
    features: FeatureFlags,
}

impl CoreConfigBuilder {
    /// Sets the media backend bridge.
    pub fn media_backend(mut self, backend: Arc<dyn MediaBackend>) -> Self {
        self.media_backend = Some(backend);
        self
    }

    /// Installs this logging configuration during bootstrap.
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Sets the event bus buffer size (default 64).
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    pub fn emit_events(mut self, enabled: bool) -> Self {
        self.features.emit_events = enabled;
        self
    }

    pub fn autoplay_on_start(mut self, enabled: bool) -> Self {
        self.features.autoplay_on_start = enabled;
        self
    }

    /// Replaces all feature flags at once.
    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when no media backend was provided
    /// - [`Error::Config`] when a setting is out of range
    pub fn build(self) -> Result<CoreConfig> {
        let media_backend = self
            .media_backend
            .ok_or_else(media_backend_missing_error)?;

        let config = CoreConfig {
            media_backend,
            logging: self.logging,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            features: self.features,
        };

        config.validate()?;

        Ok(config)
    }
}
