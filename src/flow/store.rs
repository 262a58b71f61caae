//! Per-user conversation state and its store.
//!
//! State lives for the process lifetime and is lost on restart — an
//! accepted limitation. The store trait exists so a persistent backend
//! could be substituted without touching callers.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::flow::step::{AnswerField, Step};

/// One user's questionnaire progress: at most one per user id.
///
/// Answers accumulate monotonically (fields are added or overwritten,
/// never removed) until the state is deleted at the end of a flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub user_id: String,
    pub step: Step,
    pub answers: BTreeMap<AnswerField, String>,
}

impl ConversationState {
    pub fn new(user_id: impl Into<String>, step: Step) -> Self {
        Self {
            user_id: user_id.into(),
            step,
            answers: BTreeMap::new(),
        }
    }
}

/// Store for per-user conversation state.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Option<ConversationState>;
    async fn put(&self, state: ConversationState);
    async fn delete(&self, user_id: &str);
}

/// In-memory store — a process-wide map behind an async lock.
#[derive(Default)]
pub struct InMemoryStore {
    states: RwLock<HashMap<String, ConversationState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryStore {
    async fn get(&self, user_id: &str) -> Option<ConversationState> {
        self.states.read().await.get(user_id).cloned()
    }

    async fn put(&self, state: ConversationState) {
        self.states
            .write()
            .await
            .insert(state.user_id.clone(), state);
    }

    async fn delete(&self, user_id: &str) {
        self.states.write().await.remove(user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = InMemoryStore::new();
        assert!(store.get("15550001111").await.is_none());
    }

    #[tokio::test]
    async fn put_then_get() {
        let store = InMemoryStore::new();
        let mut state = ConversationState::new("15550001111", Step::AppName);
        state
            .answers
            .insert(AnswerField::AppName, "PixelRunner".into());
        store.put(state).await;

        let loaded = store.get("15550001111").await.unwrap();
        assert_eq!(loaded.step, Step::AppName);
        assert_eq!(
            loaded.answers.get(&AnswerField::AppName).map(String::as_str),
            Some("PixelRunner")
        );
    }

    #[tokio::test]
    async fn put_overwrites_existing() {
        let store = InMemoryStore::new();
        store
            .put(ConversationState::new("u1", Step::AppName))
            .await;
        store.put(ConversationState::new("u1", Step::Dau)).await;
        assert_eq!(store.get("u1").await.unwrap().step, Step::Dau);
    }

    #[tokio::test]
    async fn delete_removes_state() {
        let store = InMemoryStore::new();
        store
            .put(ConversationState::new("u1", Step::AppName))
            .await;
        store.delete("u1").await;
        assert!(store.get("u1").await.is_none());
    }

    #[tokio::test]
    async fn states_are_per_user() {
        let store = InMemoryStore::new();
        store
            .put(ConversationState::new("u1", Step::AppName))
            .await;
        store.put(ConversationState::new("u2", Step::Mau)).await;
        assert_eq!(store.get("u1").await.unwrap().step, Step::AppName);
        assert_eq!(store.get("u2").await.unwrap().step, Step::Mau);
    }
}
