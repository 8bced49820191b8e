//! Scripted media backend shared by the engine integration tests.
//!
//! Records every call, tracks which resources are attached and audible, and
//! lets a test decide how each play request resolves.

#![allow(dead_code)]

use bridge_traits::error::{BridgeError, Result};
use bridge_traits::{MediaBackend, ResourceId, ResourceRequest};
use core_playback::{PlaybackEngine, Playlist, Track};
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Attach(ResourceId),
    Play(ResourceId),
    Pause(ResourceId),
    Stop(ResourceId),
    Release(ResourceId),
    SetMuted(ResourceId, bool),
}

/// How `play` answers.
#[derive(Debug, Clone)]
pub enum PlayMode {
    /// Resolve successfully right away.
    Immediate,
    /// Refuse with `BridgeError::Rejected`.
    Reject(String),
    /// Park until the test calls [`FakeBackend::resolve_next`].
    Deferred,
}

#[derive(Debug)]
struct FakeState {
    ops: Vec<Op>,
    requests: Vec<ResourceRequest>,
    attached: HashSet<ResourceId>,
    audible: HashSet<ResourceId>,
    stopped: HashSet<ResourceId>,
    max_attached: usize,
    overlaps: usize,
    release_without_stop: usize,
    play_mode: PlayMode,
    fail_attach: bool,
    deferred: VecDeque<(ResourceId, oneshot::Sender<Result<()>>)>,
}

impl FakeState {
    fn start(&mut self, resource: ResourceId) -> Result<()> {
        if !self.attached.contains(&resource) {
            return Err(BridgeError::UnknownResource(resource.to_string()));
        }
        self.stopped.remove(&resource);
        self.audible.insert(resource);
        Ok(())
    }
}

pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            state: Mutex::new(FakeState {
                ops: Vec::new(),
                requests: Vec::new(),
                attached: HashSet::new(),
                audible: HashSet::new(),
                stopped: HashSet::new(),
                max_attached: 0,
                overlaps: 0,
                release_without_stop: 0,
                play_mode: PlayMode::Immediate,
                fail_attach: false,
                deferred: VecDeque::new(),
            }),
        }
    }
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_play_mode(&self, mode: PlayMode) {
        self.state.lock().play_mode = mode;
    }

    pub fn set_fail_attach(&self, fail: bool) {
        self.state.lock().fail_attach = fail;
    }

    pub fn ops(&self) -> Vec<Op> {
        self.state.lock().ops.clone()
    }

    pub fn requests(&self) -> Vec<ResourceRequest> {
        self.state.lock().requests.clone()
    }

    /// The most recently attached resource.
    pub fn last_resource(&self) -> ResourceId {
        self.state
            .lock()
            .ops
            .iter()
            .rev()
            .find_map(|op| match op {
                Op::Attach(id) => Some(*id),
                _ => None,
            })
            .expect("nothing attached yet")
    }

    pub fn attached_count(&self) -> usize {
        self.state.lock().attached.len()
    }

    pub fn audible(&self) -> Vec<ResourceId> {
        self.state.lock().audible.iter().copied().collect()
    }

    pub fn attach_count(&self) -> usize {
        self.state
            .lock()
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Attach(_)))
            .count()
    }

    pub fn play_count(&self) -> usize {
        self.state
            .lock()
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Play(_)))
            .count()
    }

    pub fn pending_plays(&self) -> usize {
        self.state.lock().deferred.len()
    }

    /// Assert that no two resources were ever attached together and that
    /// every release came after a stop.
    pub fn assert_exclusive(&self) {
        let state = self.state.lock();
        assert!(state.max_attached <= 1, "{} resources attached at once", state.max_attached);
        assert_eq!(state.overlaps, 0, "attach while another resource was attached");
        assert_eq!(state.release_without_stop, 0, "resource released without stop");
    }

    /// Resolve the oldest parked play request.
    pub fn resolve_next(&self, outcome: Result<()>) {
        let (_, tx) = self
            .state
            .lock()
            .deferred
            .pop_front()
            .expect("no play request pending");
        let _ = tx.send(outcome);
    }
}

#[async_trait::async_trait]
impl MediaBackend for FakeBackend {
    fn attach(&self, request: ResourceRequest) -> Result<ResourceId> {
        let mut state = self.state.lock();
        if state.fail_attach {
            return Err(BridgeError::NotAvailable("unsupported source".into()));
        }
        if !state.attached.is_empty() {
            state.overlaps += 1;
        }

        let id = ResourceId::new();
        state.attached.insert(id);
        state.max_attached = state.max_attached.max(state.attached.len());
        state.ops.push(Op::Attach(id));
        state.requests.push(request);
        Ok(id)
    }

    async fn play(&self, resource: ResourceId) -> Result<()> {
        let rx = {
            let mut state = self.state.lock();
            state.ops.push(Op::Play(resource));
            match state.play_mode.clone() {
                PlayMode::Immediate => return state.start(resource),
                PlayMode::Reject(reason) => return Err(BridgeError::Rejected(reason)),
                PlayMode::Deferred => {
                    let (tx, rx) = oneshot::channel();
                    state.deferred.push_back((resource, tx));
                    rx
                }
            }
        };

        let outcome = rx
            .await
            .unwrap_or_else(|_| Err(BridgeError::OperationFailed("play abandoned".into())));
        match outcome {
            Ok(()) => self.state.lock().start(resource),
            Err(e) => Err(e),
        }
    }

    fn pause(&self, resource: ResourceId) -> Result<()> {
        let mut state = self.state.lock();
        state.ops.push(Op::Pause(resource));
        state.audible.remove(&resource);
        Ok(())
    }

    fn stop(&self, resource: ResourceId) -> Result<()> {
        let mut state = self.state.lock();
        state.ops.push(Op::Stop(resource));
        state.audible.remove(&resource);
        state.stopped.insert(resource);
        Ok(())
    }

    fn release(&self, resource: ResourceId) -> Result<()> {
        let mut state = self.state.lock();
        state.ops.push(Op::Release(resource));
        if !state.stopped.contains(&resource) {
            state.release_without_stop += 1;
        }
        state.audible.remove(&resource);
        state.attached.remove(&resource);
        Ok(())
    }

    fn set_muted(&self, resource: ResourceId, muted: bool) -> Result<()> {
        self.state.lock().ops.push(Op::SetMuted(resource, muted));
        Ok(())
    }
}

pub fn three_tracks() -> Playlist {
    Playlist::new(vec![
        Track::new("T0", "Artist 0", "/t0.mp3"),
        Track::new("T1", "Artist 1", "/t1.mp3"),
        Track::new("T2", "Artist 2", "https://cdn.example.com/t2.mp3"),
    ])
    .unwrap()
}

pub fn engine_with(playlist: Playlist) -> (Arc<PlaybackEngine>, Arc<FakeBackend>) {
    init_tracing();
    let backend = FakeBackend::new();
    let engine = Arc::new(PlaybackEngine::new(playlist, backend.clone()));
    (engine, backend)
}

pub fn engine() -> (Arc<PlaybackEngine>, Arc<FakeBackend>) {
    engine_with(three_tracks())
}

/// Let spawned tasks run until they park.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
