// File store tests - conversation state persisted across store instances.

use skycast_session::{
    ConfirmationPhase, ConfirmationRequest, ConversationStore, FileConversationStore, modify,
};
use tempfile::tempdir;

fn seattle() -> ConfirmationRequest {
    ConfirmationRequest {
        location: "Seattle".into(),
        latitude: 47.6062,
        longitude: -122.3321,
        display_name: "Seattle, King County, Washington, United States".into(),
        state_code: Some("WA".into()),
    }
}

#[tokio::test]
async fn unknown_conversation_awaits_a_query() {
    let dir = tempdir().unwrap();
    let store = FileConversationStore::new(dir.path().join("sessions"));

    let state = store.load("ctx-new").await.unwrap();

    assert_eq!(state.phase(), ConfirmationPhase::AwaitingQuery);
    assert!(state.history("confirmation_agent").is_empty());
    assert!(!dir.path().join("sessions").exists());
}

#[tokio::test]
async fn pending_confirmation_survives_restart() {
    let dir = tempdir().unwrap();
    {
        let store = FileConversationStore::new(dir.path());
        modify(&store, "ctx-seattle", |state| {
            state.record_exchange("confirmation_agent", "Weather in Seattle?", "Found Seattle.");
            state.set_pending(seattle())
        })
        .await
        .unwrap();
    }

    let store = FileConversationStore::new(dir.path());
    let state = store.load("ctx-seattle").await.unwrap();

    assert_eq!(state.phase(), ConfirmationPhase::AwaitingConfirmation);
    assert_eq!(state.pending().map(|p| &p.request), Some(&seattle()));
    assert_eq!(state.history("confirmation_agent").len(), 2);

    let taken = modify(&store, "ctx-seattle", |state| state.take_pending())
        .await
        .unwrap();
    assert_eq!(taken, Some(seattle()));
    assert!(store.load("ctx-seattle").await.unwrap().pending().is_none());
}

#[tokio::test]
async fn conversations_are_kept_apart() {
    let dir = tempdir().unwrap();
    let store = FileConversationStore::new(dir.path());

    modify(&store, "ctx-a", |state| state.set_pending(seattle()))
        .await
        .unwrap();

    assert!(store.load("ctx-b").await.unwrap().pending().is_none());
    assert!(store.load("ctx-a").await.unwrap().pending().is_some());
}
