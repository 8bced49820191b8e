//! Call-order checks against a `mockall` media backend.

use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{MediaBackend, ResourceId, ResourceRequest};
use core_playback::{FaultKind, PlaybackEngine, PlaybackStatus, PlayerConfig};
use mockall::predicate::*;
use mockall::{mock, Sequence};
use std::sync::Arc;

mock! {
    pub Backend {}

    #[async_trait::async_trait]
    impl MediaBackend for Backend {
        fn attach(&self, request: ResourceRequest) -> BridgeResult<ResourceId>;
        async fn play(&self, resource: ResourceId) -> BridgeResult<()>;
        fn pause(&self, resource: ResourceId) -> BridgeResult<()>;
        fn stop(&self, resource: ResourceId) -> BridgeResult<()>;
        fn release(&self, resource: ResourceId) -> BridgeResult<()>;
        fn set_muted(&self, resource: ResourceId, muted: bool) -> BridgeResult<()>;
    }
}

fn engine(mock: MockBackend) -> PlaybackEngine {
    PlaybackEngine::from_config(&PlayerConfig::portfolio_default(), Arc::new(mock)).unwrap()
}

#[tokio::test]
async fn test_track_switch_stops_then_releases_then_attaches() {
    let first = ResourceId::new();
    let second = ResourceId::new();
    let mut mock = MockBackend::new();
    let mut seq = Sequence::new();

    mock.expect_attach()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(first));
    mock.expect_play()
        .with(eq(first))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    mock.expect_stop()
        .with(eq(first))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    mock.expect_release()
        .with(eq(first))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    mock.expect_attach()
        .withf(|request: &ResourceRequest| request.metadata.title.as_deref() == Some("montagem alquimia"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(second));

    let engine = engine(mock);
    engine.toggle_playback().await;
    engine.on_resource_playable(first).await;
    engine.next();

    assert_eq!(engine.snapshot().current_index, 1);
}

#[tokio::test]
async fn test_fault_stops_then_releases() {
    let resource = ResourceId::new();
    let mut mock = MockBackend::new();
    let mut seq = Sequence::new();

    mock.expect_attach()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(resource));
    mock.expect_stop()
        .with(eq(resource))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    mock.expect_release()
        .with(eq(resource))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    mock.expect_play().never();

    let engine = engine(mock);
    engine.toggle_playback().await;
    engine.on_resource_fault(resource, Some(1));

    let state = engine.snapshot();
    assert_eq!(state.status, PlaybackStatus::Errored);
    assert_eq!(state.fault.unwrap().kind, FaultKind::Aborted);
}

#[tokio::test]
async fn test_release_proceeds_when_stop_fails() {
    let first = ResourceId::new();
    let second = ResourceId::new();
    let mut mock = MockBackend::new();
    let mut seq = Sequence::new();

    mock.expect_attach()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(first));
    mock.expect_stop()
        .with(eq(first))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(BridgeError::OperationFailed("element gone".into())));
    mock.expect_release()
        .with(eq(first))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    mock.expect_attach()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(second));

    let engine = engine(mock);
    engine.select_track(1);
    engine.select_track(2);

    let state = engine.snapshot();
    assert_eq!(state.status, PlaybackStatus::Loading);
    assert_eq!(state.current_index, 2);
}

#[tokio::test]
async fn test_mute_applies_to_attached_resource() {
    let resource = ResourceId::new();
    let mut mock = MockBackend::new();

    mock.expect_attach()
        .withf(|request: &ResourceRequest| !request.muted)
        .times(1)
        .returning(move |_| Ok(resource));
    mock.expect_set_muted()
        .with(eq(resource), eq(true))
        .times(1)
        .returning(|_, _| Ok(()));

    let engine = engine(mock);
    engine.select_track(1);
    engine.toggle_mute();

    assert!(engine.snapshot().muted);
    assert_eq!(engine.snapshot().status, PlaybackStatus::Loading);
}
