//! Conversation state persistence.
//!
//! The survey runner reads and writes per-conversation state through the
//! backend-agnostic [`ConversationStore`] trait. Two providers exist,
//! selected by configuration: an in-memory map for local debugging and a
//! JSON-file store that survives restarts on a single machine. Whatever the
//! backend, a store must give read-your-writes consistency per conversation
//! key, and conversations never share state.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::StorageProvider;
use crate::error::StoreError;
use crate::survey::state::SurveyState;

/// User identity attached to a conversation. Referenced for audit logging
/// only; no ownership check is made against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_name: String,
}

impl UserProfile {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
        }
    }
}

/// Backend-agnostic store for survey state and user profiles, keyed by
/// conversation id.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Load the persisted survey state, if any.
    async fn get_state(&self, conversation_id: Uuid) -> Result<Option<SurveyState>, StoreError>;

    /// Persist the survey state for a conversation.
    async fn set_state(
        &self,
        conversation_id: Uuid,
        state: &SurveyState,
    ) -> Result<(), StoreError>;

    /// Load the user profile attached to a conversation, if any.
    async fn get_profile(&self, conversation_id: Uuid) -> Result<Option<UserProfile>, StoreError>;

    /// Attach a user profile to a conversation.
    async fn set_profile(
        &self,
        conversation_id: Uuid,
        profile: &UserProfile,
    ) -> Result<(), StoreError>;
}

/// Open the store selected by configuration.
pub async fn open(provider: &StorageProvider) -> Result<Arc<dyn ConversationStore>, StoreError> {
    match provider {
        StorageProvider::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageProvider::File { dir } => Ok(Arc::new(FileStore::open(dir.clone()).await?)),
    }
}
