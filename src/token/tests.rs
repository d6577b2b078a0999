use super::*;
use crate::bridge::{ChannelHost, HostCommand, SelectionPayload};
use crate::config::{Settings, Variation};
use crate::session::{MemorySessionStore, USERNAME_KEY};
use crate::test_helpers::*;

fn guard_for(
    session: Arc<MemorySessionStore>,
    service: Arc<MockStorageService>,
) -> (
    TokenGuard,
    tokio::sync::mpsc::UnboundedReceiver<HostCommand>,
) {
    let (host, rx) = ChannelHost::channel();
    let settings = Arc::new(Settings::with_service(
        launch_params(Variation::Resource, false),
        Arc::new(StaticConfigSource::new(&["*"])),
        service_config(),
    ));
    let guard = TokenGuard::new(settings, session, service, Arc::new(host));
    (guard, rx)
}

// ============================================================================
// Classification Tests
// ============================================================================

#[test]
fn test_classify_expired() {
    assert_eq!(classify_probe_failure(99, 100), ProbeFailure::Expired);
}

#[test]
fn test_classify_not_yet_expired() {
    assert_eq!(classify_probe_failure(101, 100), ProbeFailure::Rejected);
    // Expiring this very second still counts as alive
    assert_eq!(classify_probe_failure(100, 100), ProbeFailure::Rejected);
}

#[test]
fn test_token_state_into_token() {
    assert_eq!(TokenState::Valid("T".into()).into_token(), Some("T".to_string()));
    assert_eq!(TokenState::Absent.into_token(), None);
    assert_eq!(TokenState::Expired.into_token(), None);
    assert_eq!(TokenState::Revoked.into_token(), None);
}

// ============================================================================
// Guard Tests
// ============================================================================

#[tokio::test]
async fn test_no_record_skips_network() {
    let service = Arc::new(MockStorageService::new());
    let (guard, mut rx) = guard_for(Arc::new(MemorySessionStore::new()), Arc::clone(&service));

    let token = guard.get_valid_access_token(&service_config()).await;

    assert!(token.is_none());
    assert_eq!(service.probe_calls(), 0);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_valid_token_returned_unchanged() {
    let service = Arc::new(MockStorageService::new());
    let session = session_with_token("T-123", future_expiry());
    let (guard, mut rx) = guard_for(session, Arc::clone(&service));

    let token = guard.get_valid_access_token(&service_config()).await;

    assert_eq!(token.as_deref(), Some("T-123"));
    assert_eq!(service.probe_calls(), 1);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_token_is_probed_on_every_call() {
    let service = Arc::new(MockStorageService::new());
    let session = session_with_token("T", future_expiry());
    let (guard, _rx) = guard_for(session, Arc::clone(&service));

    guard.check(&service_config()).await;
    guard.check(&service_config()).await;

    assert_eq!(service.probe_calls(), 2);
}

#[tokio::test]
async fn test_refreshed_record_is_picked_up() {
    let service = Arc::new(MockStorageService::new());
    let session = session_with_token("old", future_expiry());
    let (guard, _rx) = guard_for(Arc::clone(&session), service);

    assert_eq!(guard.check(&service_config()).await, TokenState::Valid("old".into()));

    session
        .insert_token_record(
            AUTHORITY,
            CLIENT_ID,
            &crate::session::AccessTokenRecord {
                access_token: "new".to_string(),
                expires_at: future_expiry(),
            },
        )
        .unwrap();

    assert_eq!(guard.check(&service_config()).await, TokenState::Valid("new".into()));
}

#[tokio::test]
async fn test_failed_probe_with_expired_token_is_silent() {
    let service = Arc::new(MockStorageService::new());
    service.set_probe_ok(false);
    let session = session_with_token("T", past_expiry());
    session.insert(USERNAME_KEY, "alice");
    let (guard, mut rx) = guard_for(Arc::clone(&session), service);

    let state = guard.check(&service_config()).await;

    assert_eq!(state, TokenState::Expired);
    assert!(drain(&mut rx).is_empty());
    // Storage is left for the auth flow to refresh
    assert_eq!(session.get(USERNAME_KEY).as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_failed_probe_with_live_token_revokes() {
    let service = Arc::new(MockStorageService::new());
    service.set_probe_ok(false);
    let session = session_with_token("T", future_expiry());
    session.insert(USERNAME_KEY, "alice");
    let (guard, mut rx) = guard_for(Arc::clone(&session), service);

    let state = guard.check(&service_config()).await;

    assert_eq!(state, TokenState::Revoked);
    assert!(session.is_empty());

    let commands = drain(&mut rx);
    assert_eq!(
        commands,
        vec![
            HostCommand::PostMessage {
                payload: SelectionPayload::not_ready(),
                target_origin: HOST_ORIGIN.to_string(),
            },
            HostCommand::Reload,
        ]
    );
}
