//! Single event validating a saved content item's permalink in the
//! background.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use siteval_core::result::AppResult;
use siteval_core::traits::access::UserAccess;
use siteval_core::traits::content::{ContentStore, ContentSupport};
use siteval_core::traits::validation::ValidationProvider;
use siteval_core::types::ContentId;

use crate::task::{ActionContext, BackgroundTask, Recurrence, hooks};

/// Validates one content item once, after it was saved, unless the saving
/// user already gets live validation through dev tools.
#[derive(Debug)]
pub struct SavePostValidationEvent {
    /// Validation provider
    provider: Arc<dyn ValidationProvider>,
    /// Content lookups
    content: Arc<dyn ContentStore>,
    /// Validation eligibility
    support: Arc<dyn ContentSupport>,
    /// Dev tools access
    access: Arc<dyn UserAccess>,
}

impl SavePostValidationEvent {
    /// The cron event name.
    pub const BACKGROUND_TASK_NAME: &'static str = "amp_single_post_validate";

    /// Create the task
    pub fn new(
        provider: Arc<dyn ValidationProvider>,
        content: Arc<dyn ContentStore>,
        support: Arc<dyn ContentSupport>,
        access: Arc<dyn UserAccess>,
    ) -> Self {
        Self {
            provider,
            content,
            support,
            access,
        }
    }
}

#[async_trait]
impl BackgroundTask for SavePostValidationEvent {
    fn event_name(&self) -> &str {
        Self::BACKGROUND_TASK_NAME
    }

    fn action_hook(&self) -> &str {
        hooks::SAVE_POST
    }

    fn recurrence(&self) -> Recurrence {
        Recurrence::Once
    }

    async fn should_schedule_event(&self, ctx: &ActionContext, args: &[Value]) -> bool {
        // Dev tools users get validation on save already.
        if self.access.is_user_enabled(ctx.actor.as_ref()) {
            return false;
        }

        let [arg] = args else {
            return false;
        };

        let Some(id) = ContentId::from_value(arg) else {
            return false;
        };

        match self.content.find(id).await {
            Ok(Some(item)) => !item.is_revision() && self.support.is_supported(&item),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Could not look up content {} for validation: {}", id, e);
                false
            }
        }
    }

    fn scheduled_args(&self, args: &[Value]) -> Vec<Value> {
        match args.first().and_then(ContentId::from_value) {
            Some(id) => vec![id.to_value()],
            None => args.to_vec(),
        }
    }

    async fn process(&self, args: &[Value]) -> AppResult<()> {
        let Some(id) = args.first().and_then(ContentId::from_value) else {
            tracing::debug!("No content id in event args {:?}", args);
            return Ok(());
        };

        let Some(item) = self.content.find(id).await? else {
            tracing::debug!("Content {} no longer exists, skipping validation", id);
            return Ok(());
        };

        match self
            .provider
            .get_url_validation(&item.permalink, &item.content_type, true)
            .await
        {
            Ok(Some(result)) => tracing::info!(
                "Validated content {} at '{}' (status {})",
                id,
                item.permalink,
                result.status_code
            ),
            Ok(None) => tracing::warn!("Validation of content {} returned no result", id),
            Err(e) => tracing::warn!("Validation of content {} failed: {}", id, e),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{DevToolsUserAccess, SupportedContentTypes};
    use crate::testing::{Answer, Call, RecordingProvider};
    use serde_json::json;
    use siteval_core::types::{ContentItem, UserId};
    use siteval_store::MemoryContentStore;

    struct Fixture {
        dev: UserId,
        content: MemoryContentStore,
        provider: Arc<RecordingProvider>,
        task: SavePostValidationEvent,
    }

    fn fixture(answer: Answer) -> Fixture {
        let dev = UserId::new();
        let content = MemoryContentStore::from_items([
            ContentItem::new(ContentId(1), "post", "http://x/?p=1"),
            ContentItem::new(ContentId(2), "post", "http://x/?p=1&rev=2").revision_of(ContentId(1)),
            ContentItem::new(ContentId(3), "attachment", "http://x/?attachment=3"),
            ContentItem::new(ContentId(4), "page", "http://x/about"),
        ]);
        let provider = Arc::new(RecordingProvider::answering(answer));
        let task = SavePostValidationEvent::new(
            provider.clone(),
            Arc::new(content.clone()),
            Arc::new(SupportedContentTypes::new(["post", "page"])),
            Arc::new(DevToolsUserAccess::new([dev])),
        );
        Fixture {
            dev,
            content,
            provider,
            task,
        }
    }

    #[tokio::test]
    async fn test_dev_tools_user_never_schedules() {
        let f = fixture(Answer::Success);
        let ctx = ActionContext::user(f.dev);
        for args in [vec![json!(1)], vec![json!(4)], vec![], vec![json!(1), json!(2)]] {
            assert!(!f.task.should_schedule_event(&ctx, &args).await);
        }
    }

    #[tokio::test]
    async fn test_arity_must_be_exactly_one() {
        let f = fixture(Answer::Success);
        let ctx = ActionContext::user(UserId::new());
        assert!(!f.task.should_schedule_event(&ctx, &[]).await);
        assert!(!f.task.should_schedule_event(&ctx, &[json!(1), json!(true)]).await);
        assert!(f.task.should_schedule_event(&ctx, &[json!(1)]).await);
    }

    #[tokio::test]
    async fn test_revision_unsupported_and_unknown_content_are_ineligible() {
        let f = fixture(Answer::Success);
        let ctx = ActionContext::system();
        assert!(!f.task.should_schedule_event(&ctx, &[json!(2)]).await);
        assert!(!f.task.should_schedule_event(&ctx, &[json!(3)]).await);
        assert!(!f.task.should_schedule_event(&ctx, &[json!(99)]).await);
        assert!(!f.task.should_schedule_event(&ctx, &[json!("not-an-id")]).await);
    }

    #[tokio::test]
    async fn test_eligible_content_by_regular_user() {
        let f = fixture(Answer::Success);
        let ctx = ActionContext::user(UserId::new());
        assert!(f.task.should_schedule_event(&ctx, &[json!(1)]).await);
        assert!(f.task.should_schedule_event(&ctx, &[json!("4")]).await);
    }

    #[test]
    fn test_scheduled_args_normalize_content_id() {
        let f = fixture(Answer::Success);
        assert_eq!(f.task.scheduled_args(&[json!("1")]), vec![json!(1)]);
        assert_eq!(f.task.scheduled_args(&[json!(" 4 ")]), vec![json!(4)]);
        assert_eq!(f.task.scheduled_args(&[json!(7)]), vec![json!(7)]);
        assert_eq!(f.task.scheduled_args(&[json!(null)]), vec![json!(null)]);
    }

    #[tokio::test]
    async fn test_process_forces_validation_of_permalink() {
        let f = fixture(Answer::Success);
        f.task.process(&[json!(4)]).await.unwrap();

        assert_eq!(
            f.provider.calls(),
            vec![Call {
                url: "http://x/about".to_string(),
                content_type: "page".to_string(),
                force: true,
            }]
        );
    }

    #[tokio::test]
    async fn test_process_skips_deleted_content() {
        let f = fixture(Answer::Success);
        f.content.remove(ContentId(1));

        f.task.process(&[json!(1)]).await.unwrap();

        assert!(f.provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_process_swallows_provider_failure() {
        let f = fixture(Answer::Error);
        f.task.process(&[json!(1)]).await.unwrap();
        assert_eq!(f.provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_process_without_id_is_noop() {
        let f = fixture(Answer::Success);
        f.task.process(&[]).await.unwrap();
        f.task.process(&[json!(null)]).await.unwrap();
        assert!(f.provider.calls().is_empty());
    }
}
