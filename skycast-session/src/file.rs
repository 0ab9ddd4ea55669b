use crate::error::StateAccessError;
use crate::state::ConversationState;
use crate::store::ConversationStore;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// Stores each conversation as a JSON document under one directory.
pub struct FileConversationStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileConversationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(id)))
    }
}

/// Conversation ids come from clients. `[A-Za-z0-9-]` is kept and every other
/// byte becomes `_XX`, so distinct ids never share a file.
fn file_stem(id: &str) -> String {
    if id.is_empty() {
        return "_".to_string();
    }
    let mut stem = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("_{byte:02X}"));
        }
    }
    stem
}

#[async_trait]
impl ConversationStore for FileConversationStore {
    async fn load(&self, id: &str) -> Result<ConversationState, StateAccessError> {
        let path = self.path_for(id);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                debug!(session_id = id, "Starting new conversation state");
                return Ok(ConversationState::new(id));
            }
            Err(source) => return Err(StateAccessError::Io { path, source }),
        };
        let state: ConversationState = serde_json::from_slice(&bytes)
            .map_err(|source| StateAccessError::Corrupt { path: path.clone(), source })?;
        if state.id != id {
            return Err(StateAccessError::ForeignRecord {
                path,
                expected: id.to_string(),
                found: state.id,
            });
        }
        Ok(state)
    }

    async fn save(&self, state: &ConversationState) -> Result<(), StateAccessError> {
        let _guard = self.write_lock.lock().await;
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StateAccessError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let body = serde_json::to_vec_pretty(state).map_err(|source| {
            StateAccessError::Serialize {
                id: state.id.clone(),
                source,
            }
        })?;

        let path = self.path_for(&state.id);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, body)
            .await
            .map_err(|source| StateAccessError::Io {
                path: staging.clone(),
                source,
            })?;
        fs::rename(&staging, &path)
            .await
            .map_err(|source| StateAccessError::Io { path, source })?;
        debug!(session_id = state.id.as_str(), "Conversation state written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConfirmationRequest;
    use tempfile::tempdir;

    fn boston() -> ConfirmationRequest {
        ConfirmationRequest {
            location: "Boston".into(),
            latitude: 42.36,
            longitude: -71.06,
            display_name: "Boston, MA".into(),
            state_code: Some("MA".into()),
        }
    }

    #[test]
    fn ids_are_escaped_for_the_filesystem() {
        assert_eq!(file_stem("../etc/passwd"), "_2E_2E_2Fetc_2Fpasswd");
        assert_eq!(file_stem("ctx-42"), "ctx-42");
        assert_eq!(file_stem("ctx_42"), "ctx_5F42");
        assert_eq!(file_stem(""), "_");
    }

    #[test]
    fn punctuation_variants_get_distinct_files() {
        let ids = ["user.a", "user_a", "user/a", "user a", "user_2Ea"];
        let stems: std::collections::HashSet<_> = ids.iter().map(|id| file_stem(id)).collect();
        assert_eq!(stems.len(), ids.len());
    }

    #[tokio::test]
    async fn similar_ids_do_not_share_state() {
        let dir = tempdir().expect("tempdir");
        let store = FileConversationStore::new(dir.path());

        let mut dotted = store.load("user.a").await.expect("load");
        dotted.set_pending(boston());
        store.save(&dotted).await.expect("save");

        let underscored = store.load("user_a").await.expect("load other");
        assert_eq!(underscored.id, "user_a");
        assert!(underscored.pending().is_none());
        assert_eq!(store.load("user.a").await.expect("reload"), dotted);
    }

    #[tokio::test]
    async fn record_for_another_conversation_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let store = FileConversationStore::new(dir.path());
        let mut other = ConversationState::new("ctx-other");
        other.set_pending(boston());
        let body = serde_json::to_vec(&other).expect("serialize");
        std::fs::write(dir.path().join("ctx-mine.json"), body).expect("write");

        let err = store.load("ctx-mine").await.expect_err("foreign record");
        assert!(matches!(
            err,
            StateAccessError::ForeignRecord { ref found, .. } if found == "ctx-other"
        ));
    }

    #[tokio::test]
    async fn state_survives_a_new_store_instance() {
        let dir = tempdir().expect("tempdir");
        let store = FileConversationStore::new(dir.path());

        let mut state = store.load("ctx-1").await.expect("load");
        state.record_exchange("confirmation_agent", "hi", "hello");
        state.set_pending(ConfirmationRequest {
            location: "Seattle".into(),
            latitude: 47.6,
            longitude: -122.3,
            display_name: "Seattle, WA".into(),
            state_code: Some("WA".into()),
        });
        store.save(&state).await.expect("save");

        let reopened = FileConversationStore::new(dir.path());
        let loaded = reopened.load("ctx-1").await.expect("reload");
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(dir.path().join("broken.json"), b"{not json").expect("write");
        let store = FileConversationStore::new(dir.path());

        let err = store.load("broken").await.expect_err("corrupt state");
        assert!(matches!(err, StateAccessError::Corrupt { .. }));
    }
}
