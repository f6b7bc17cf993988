use std::sync::Arc;

use jobscout_core::{ProgressEvent, SessionId};
use jobscout_engine::{EventBroadcaster, ProgressSink, SessionRegistry};

#[test]
fn register_hands_out_unique_ids() {
    let registry = SessionRegistry::new();
    let (first, _) = registry.register();
    let (second, _) = registry.register();

    assert_ne!(first, second);
    assert!(registry.contains(&first));
    assert!(registry.contains(&second));
    assert_eq!(registry.active_count(), 2);
}

#[test]
fn request_stop_cancels_the_session_token() {
    let registry = SessionRegistry::new();
    let (id, token) = registry.register();

    assert!(!token.is_cancelled());
    assert!(registry.request_stop(&id));
    assert!(token.is_cancelled());

    // Idempotent while registered.
    assert!(registry.request_stop(&id));
}

#[test]
fn request_stop_for_unknown_sessions_is_rejected() {
    let registry = SessionRegistry::new();
    assert!(!registry.request_stop(&SessionId::from("no-such-session")));
}

#[test]
fn removed_sessions_no_longer_accept_stops() {
    let registry = SessionRegistry::new();
    let (id, _) = registry.register();

    registry.remove(&id);

    assert!(!registry.contains(&id));
    assert!(!registry.request_stop(&id));
    assert_eq!(registry.active_count(), 0);
}

#[test]
fn concurrent_stop_requests_are_safe() {
    let registry = Arc::new(SessionRegistry::new());
    let (id, token) = registry.register();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            let id = id.clone();
            std::thread::spawn(move || registry.request_stop(&id))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().expect("stop thread"));
    }
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn broadcaster_fans_events_out_to_every_observer() {
    let broadcaster = EventBroadcaster::new();
    let mut first = broadcaster.subscribe();
    let mut second = broadcaster.subscribe();
    assert_eq!(broadcaster.observer_count(), 2);

    let event = ProgressEvent::Info {
        message: "Stopping...".to_string(),
        session_id: SessionId::from("s1"),
    };
    broadcaster.emit(event.clone());

    assert_eq!(first.recv().await.expect("first observer"), event);
    assert_eq!(second.recv().await.expect("second observer"), event);
}

#[test]
fn emitting_without_observers_is_not_an_error() {
    let broadcaster = EventBroadcaster::new();
    broadcaster.emit(ProgressEvent::Info {
        message: "nobody listening".to_string(),
        session_id: SessionId::from("s1"),
    });
    assert_eq!(broadcaster.observer_count(), 0);
}
