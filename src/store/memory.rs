//! In-memory conversation store.
//!
//! For local debugging only: everything here is gone when the process
//! restarts.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::survey::state::SurveyState;

use super::{ConversationStore, UserProfile};

/// HashMap-backed store guarded by async RwLocks.
#[derive(Default)]
pub struct MemoryStore {
    states: RwLock<HashMap<Uuid, SurveyState>>,
    profiles: RwLock<HashMap<Uuid, UserProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn get_state(&self, conversation_id: Uuid) -> Result<Option<SurveyState>, StoreError> {
        Ok(self.states.read().await.get(&conversation_id).cloned())
    }

    async fn set_state(
        &self,
        conversation_id: Uuid,
        state: &SurveyState,
    ) -> Result<(), StoreError> {
        self.states
            .write()
            .await
            .insert(conversation_id, state.clone());
        Ok(())
    }

    async fn get_profile(&self, conversation_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profiles.read().await.get(&conversation_id).cloned())
    }

    async fn set_profile(
        &self,
        conversation_id: Uuid,
        profile: &UserProfile,
    ) -> Result<(), StoreError> {
        self.profiles
            .write()
            .await
            .insert(conversation_id, profile.clone());
        Ok(())
    }
}
