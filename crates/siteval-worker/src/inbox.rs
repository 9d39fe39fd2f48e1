//! Actions recorded by other processes for the running worker.
//!
//! The CLI cannot reach the server's scheduler directly. It appends the
//! action to a list in the shared option store instead, and the worker
//! dispatches pending actions on every poll.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing;
use uuid::Uuid;

use siteval_core::result::AppResult;
use siteval_core::traits::option_store::OptionStore;
use siteval_core::types::UserId;
use siteval_store::keys::PENDING_ACTIONS;

use crate::task::ActionContext;

/// An action waiting to be dispatched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    /// Unique id, used to acknowledge the action
    pub id: Uuid,
    /// Hook to fire
    pub hook: String,
    /// Acting user, `None` for the system
    #[serde(default)]
    pub actor: Option<UserId>,
    /// Action arguments
    #[serde(default)]
    pub args: Vec<Value>,
    /// When the action was recorded
    pub recorded_at: DateTime<Utc>,
}

impl PendingAction {
    /// Record `hook` fired with `args` on behalf of `ctx`
    pub fn new(hook: impl Into<String>, ctx: ActionContext, args: Vec<Value>) -> Self {
        Self {
            id: Uuid::now_v7(),
            hook: hook.into(),
            actor: ctx.actor,
            args,
            recorded_at: Utc::now(),
        }
    }

    /// Context the action was fired in
    pub fn context(&self) -> ActionContext {
        ActionContext { actor: self.actor }
    }
}

/// List of pending actions stored under a single option key.
#[derive(Debug, Clone)]
pub struct ActionInbox {
    /// Option store holding the list
    store: Arc<dyn OptionStore>,
    /// Serializes read-modify-write cycles within this process
    mutation: Arc<Mutex<()>>,
}

impl ActionInbox {
    /// Create an inbox on top of `store`
    pub fn new(store: Arc<dyn OptionStore>) -> Self {
        Self {
            store,
            mutation: Arc::new(Mutex::new(())),
        }
    }

    async fn load(&self) -> AppResult<Vec<Value>> {
        match self.store.get(PENDING_ACTIONS).await? {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => {
                tracing::warn!("Action inbox holds a non-list value, discarding it: {}", other);
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }

    /// Append `action`
    pub async fn push(&self, action: &PendingAction) -> AppResult<()> {
        let _guard = self.mutation.lock().await;
        let mut items = self.load().await?;
        items.push(serde_json::to_value(action)?);
        self.store.put(PENDING_ACTIONS, Value::Array(items)).await?;
        tracing::debug!("Recorded action '{}' ({})", action.hook, action.id);
        Ok(())
    }

    /// Pending actions in recording order. Unreadable records are skipped.
    pub async fn pending(&self) -> AppResult<Vec<PendingAction>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter_map(|raw| match serde_json::from_value(raw.clone()) {
                Ok(action) => Some(action),
                Err(e) => {
                    tracing::warn!("Skipping unreadable pending action {}: {}", raw, e);
                    None
                }
            })
            .collect())
    }

    /// Remove the actions with the given ids, together with unreadable
    /// records. Returns how many records were removed.
    pub async fn acknowledge(&self, ids: &[Uuid]) -> AppResult<usize> {
        let _guard = self.mutation.lock().await;
        let acked: HashSet<&Uuid> = ids.iter().collect();
        let items = self.load().await?;
        let before = items.len();

        let kept: Vec<Value> = items
            .into_iter()
            .filter(|raw| match serde_json::from_value::<PendingAction>(raw.clone()) {
                Ok(action) => !acked.contains(&action.id),
                Err(_) => false,
            })
            .collect();

        let removed = before - kept.len();
        if removed > 0 {
            self.store.put(PENDING_ACTIONS, Value::Array(kept)).await?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::hooks;
    use serde_json::json;
    use siteval_store::MemoryOptionStore;

    fn make_inbox() -> (ActionInbox, MemoryOptionStore) {
        let store = MemoryOptionStore::new();
        (ActionInbox::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_push_and_pending_keep_order() {
        let (inbox, _store) = make_inbox();
        let user = UserId::new();
        let first = PendingAction::new(hooks::SAVE_POST, ActionContext::user(user), vec![json!(1)]);
        let second = PendingAction::new(hooks::SAVE_POST, ActionContext::system(), vec![json!(2)]);

        inbox.push(&first).await.unwrap();
        inbox.push(&second).await.unwrap();

        let pending = inbox.pending().await.unwrap();
        assert_eq!(pending, vec![first.clone(), second]);
        assert_eq!(pending[0].context(), ActionContext::user(user));
    }

    #[tokio::test]
    async fn test_acknowledge_keeps_actions_recorded_later() {
        let (inbox, _store) = make_inbox();
        let seen = PendingAction::new(hooks::SAVE_POST, ActionContext::system(), vec![json!(1)]);
        inbox.push(&seen).await.unwrap();
        let pending = inbox.pending().await.unwrap();

        // Recorded by another handle after the pending list was read.
        let late = PendingAction::new(hooks::SAVE_POST, ActionContext::system(), vec![json!(2)]);
        inbox.push(&late).await.unwrap();

        let ids: Vec<Uuid> = pending.iter().map(|action| action.id).collect();
        assert_eq!(inbox.acknowledge(&ids).await.unwrap(), 1);
        assert_eq!(inbox.pending().await.unwrap(), vec![late]);
    }

    #[tokio::test]
    async fn test_unreadable_records_are_skipped_and_dropped() {
        let (inbox, store) = make_inbox();
        let good = PendingAction::new(hooks::INIT, ActionContext::system(), vec![]);
        store
            .put(
                PENDING_ACTIONS,
                json!([{"hook": "save_post"}, serde_json::to_value(&good).unwrap()]),
            )
            .await
            .unwrap();

        assert_eq!(inbox.pending().await.unwrap(), vec![good]);
        assert_eq!(inbox.acknowledge(&[]).await.unwrap(), 1);
        assert_eq!(store.get(PENDING_ACTIONS).await.unwrap().unwrap().as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_non_list_value_reads_as_empty() {
        let (inbox, store) = make_inbox();
        store.put(PENDING_ACTIONS, json!({"oops": true})).await.unwrap();
        assert!(inbox.pending().await.unwrap().is_empty());
    }
}
