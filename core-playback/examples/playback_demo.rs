//! # Playback Engine Usage Example
//!
//! Drives the playback engine through a short session against a console
//! media backend, acting as both the control surface (commands) and the
//! binding layer (resource callbacks).
//!
//! Run with: `cargo run --example playback_demo --package core-playback`

use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{MediaBackend, ResourceId, ResourceRequest};
use core_playback::{EngineState, PlaybackEngine, PlayerConfig, Result};
use parking_lot::Mutex;
use std::sync::Arc;

// ============================================================================
// Console Media Backend (for demonstration)
// ============================================================================

/// Prints every call and refuses the first play request, the way a browser
/// refuses autoplay before any user gesture.
struct ConsoleBackend {
    attached: Mutex<Option<ResourceId>>,
    refuse_next_play: Mutex<bool>,
}

impl ConsoleBackend {
    fn new() -> Self {
        Self {
            attached: Mutex::new(None),
            refuse_next_play: Mutex::new(true),
        }
    }

    fn current(&self) -> Option<ResourceId> {
        *self.attached.lock()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl MediaBackend for ConsoleBackend {
    fn attach(&self, request: ResourceRequest) -> BridgeResult<ResourceId> {
        let id = ResourceId::new();
        println!(
            "   [backend] attach {} ({}) muted={}",
            request.source.locator(),
            request.metadata.title.as_deref().unwrap_or("?"),
            request.muted
        );
        *self.attached.lock() = Some(id);
        Ok(id)
    }

    async fn play(&self, _resource: ResourceId) -> BridgeResult<()> {
        let mut refuse = self.refuse_next_play.lock();
        if *refuse {
            *refuse = false;
            println!("   [backend] play refused");
            return Err(BridgeError::Rejected(
                "NotAllowedError: play() failed because the user didn't interact with the document first"
                    .to_string(),
            ));
        }
        println!("   [backend] play");
        Ok(())
    }

    fn pause(&self, _resource: ResourceId) -> BridgeResult<()> {
        println!("   [backend] pause");
        Ok(())
    }

    fn stop(&self, _resource: ResourceId) -> BridgeResult<()> {
        println!("   [backend] stop");
        Ok(())
    }

    fn release(&self, _resource: ResourceId) -> BridgeResult<()> {
        println!("   [backend] release");
        *self.attached.lock() = None;
        Ok(())
    }

    fn set_muted(&self, _resource: ResourceId, muted: bool) -> BridgeResult<()> {
        println!("   [backend] muted={}", muted);
        Ok(())
    }
}

fn show(state: &EngineState) {
    println!(
        "   -> {:?} #{} \"{}\" muted={} fault={}",
        state.status,
        state.current_index,
        state.track.display_label(),
        state.muted,
        state
            .fault
            .as_ref()
            .map(|f| f.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
}

// ============================================================================
// Main Demo
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    println!("Core Playback - Engine Demo\n");

    let backend = Arc::new(ConsoleBackend::new());
    let engine = PlaybackEngine::from_config(&PlayerConfig::portfolio_default(), backend.clone())?;
    show(&engine.snapshot());

    println!("\nAutoplay attempt (refused)...");
    engine.toggle_playback().await;
    if let Some(id) = backend.current() {
        engine.on_resource_playable(id).await;
    }
    show(&engine.snapshot());

    println!("\nUser presses play...");
    engine.toggle_playback().await;
    if let Some(id) = backend.current() {
        engine.on_resource_playable(id).await;
    }
    show(&engine.snapshot());

    println!("\nMute, then skip ahead...");
    engine.toggle_mute();
    engine.next();
    if let Some(id) = backend.current() {
        engine.on_resource_playable(id).await;
    }
    show(&engine.snapshot());

    println!("\nNetwork drops mid-track...");
    if let Some(id) = backend.current() {
        engine.on_resource_fault(id, Some(2));
    }
    show(&engine.snapshot());

    println!("\nRecover by moving on...");
    engine.next();
    show(&engine.snapshot());

    println!("\nDemo completed.");

    Ok(())
}
