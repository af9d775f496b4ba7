//! File-backed conversation store.
//!
//! One JSON document per conversation under a base directory. Durable
//! across restarts on a single machine; writes go through a temp file plus
//! rename so a crash mid-write never leaves a torn document.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use uuid::Uuid;

use crate::error::StoreError;
use crate::survey::state::SurveyState;

use super::{ConversationStore, UserProfile};

/// On-disk document for one conversation.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct ConversationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<SurveyState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile: Option<UserProfile>,
}

/// JSON-file store rooted at a base directory.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed.
    pub async fn open(base_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&base_dir).await?;
        Ok(Self { base_dir })
    }

    fn path_for(&self, conversation_id: Uuid) -> PathBuf {
        self.base_dir.join(format!("{conversation_id}.json"))
    }

    async fn read_record(&self, conversation_id: Uuid) -> Result<ConversationRecord, StoreError> {
        match fs::read(self.path_for(conversation_id)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(ConversationRecord::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_record(
        &self,
        conversation_id: Uuid,
        record: &ConversationRecord,
    ) -> Result<(), StoreError> {
        let path = self.path_for(conversation_id);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(record)?;
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for FileStore {
    async fn get_state(&self, conversation_id: Uuid) -> Result<Option<SurveyState>, StoreError> {
        Ok(self.read_record(conversation_id).await?.state)
    }

    async fn set_state(
        &self,
        conversation_id: Uuid,
        state: &SurveyState,
    ) -> Result<(), StoreError> {
        let mut record = self.read_record(conversation_id).await?;
        record.state = Some(state.clone());
        self.write_record(conversation_id, &record).await
    }

    async fn get_profile(&self, conversation_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.read_record(conversation_id).await?.profile)
    }

    async fn set_profile(
        &self,
        conversation_id: Uuid,
        profile: &UserProfile,
    ) -> Result<(), StoreError> {
        let mut record = self.read_record(conversation_id).await?;
        record.profile = Some(profile.clone());
        self.write_record(conversation_id, &record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::open(dir.path().to_path_buf()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn state_roundtrip() {
        let (_dir, store) = temp_store().await;
        let id = Uuid::new_v4();

        assert!(store.get_state(id).await.unwrap().is_none());

        let mut state = SurveyState::new("free-text-feedback".into());
        state.score = 1;
        store.set_state(id, &state).await.unwrap();

        assert_eq!(store.get_state(id).await.unwrap(), Some(state));
    }

    #[tokio::test]
    async fn state_survives_a_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let id = Uuid::new_v4();

        {
            let store = FileStore::open(dir.path().to_path_buf()).await.unwrap();
            let mut state = SurveyState::new("finish".into());
            state.score = -1;
            store.set_state(id, &state).await.unwrap();
            store.set_profile(id, &UserProfile::new("Bob")).await.unwrap();
        }

        let reopened = FileStore::open(dir.path().to_path_buf()).await.unwrap();
        let state = reopened.get_state(id).await.unwrap().unwrap();
        assert_eq!(state.score, -1);
        assert_eq!(state.current_step.as_str(), "finish");
        assert_eq!(
            reopened.get_profile(id).await.unwrap(),
            Some(UserProfile::new("Bob"))
        );
    }

    #[tokio::test]
    async fn profile_write_keeps_existing_state() {
        let (_dir, store) = temp_store().await;
        let id = Uuid::new_v4();

        store
            .set_state(id, &SurveyState::new("start".into()))
            .await
            .unwrap();
        store.set_profile(id, &UserProfile::new("Cara")).await.unwrap();

        assert!(store.get_state(id).await.unwrap().is_some());
        assert!(store.get_profile(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn open_creates_missing_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("state").join("conversations");
        let store = FileStore::open(nested.clone()).await.unwrap();

        let id = Uuid::new_v4();
        store
            .set_state(id, &SurveyState::new("start".into()))
            .await
            .unwrap();
        assert!(nested.join(format!("{id}.json")).exists());
    }
}
