//! Queue draining and save_post flow against a file store and a live site.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};

use siteval_core::traits::option_store::OptionStore;
use siteval_core::types::{QueueEntry, UserId};
use siteval_store::FileOptionStore;
use siteval_store::keys::URL_VALIDATION_QUEUE;
use siteval_worker::jobs::{SavePostValidationEvent, UrlValidationCron};
use siteval_worker::task::{ActionContext, BackgroundTask, hooks};
use siteval_worker::{ActionInbox, EventScheduler, PendingAction, ValidationQueue};

use crate::helpers::{FakeSite, SLOW_RESPONSE, TestWorker, content_item};

#[tokio::test]
async fn test_drain_removes_validated_entries_and_persists_the_rest() {
    let site = FakeSite::start().await;
    let worker = TestWorker::new(json!([])).await;
    let queue = worker.runner.queue();

    let good = QueueEntry::new(site.url("/ok/a"), "post");
    let broken = QueueEntry::new(site.url("/broken/b"), "page");
    assert!(queue.enqueue(&good).await.unwrap());
    assert!(queue.enqueue(&broken).await.unwrap());
    assert!(!queue.enqueue(&good).await.unwrap());

    let mut raw = queue.load().await.unwrap();
    raw.insert("malformed".to_string(), json!({ "url": site.url("/ok/never") }));
    queue.save(raw).await.unwrap();

    let task = worker
        .runner
        .registry()
        .get(UrlValidationCron::BACKGROUND_TASK_NAME)
        .unwrap();
    task.process(&[]).await.unwrap();

    // Read back through a fresh store handle: the result is on disk.
    let reopened = FileOptionStore::new(worker.options_path()).await.unwrap();
    let stored = reopened.get(URL_VALIDATION_QUEUE).await.unwrap().unwrap();
    let Value::Object(stored) = stored else {
        panic!("queue is not a mapping: {stored}");
    };

    let mut keys: Vec<&String> = stored.keys().collect();
    keys.sort();
    let mut expected = vec![broken.hash(), "malformed".to_string()];
    expected.sort();
    assert_eq!(keys, expected.iter().collect::<Vec<_>>());
    assert_eq!(stored["malformed"], json!({ "url": site.url("/ok/never") }));

    let mut requests = site.requests();
    requests.sort();
    assert_eq!(requests, vec!["/broken/b".to_string(), "/ok/a".to_string()]);
}

#[tokio::test]
async fn test_drain_visits_at_most_one_batch_per_run() {
    let site = FakeSite::start().await;
    let worker = TestWorker::new(json!([])).await;
    let queue = worker.runner.queue();

    for i in 0..7 {
        queue
            .enqueue(&QueueEntry::new(site.url(&format!("/ok/{i}")), "post"))
            .await
            .unwrap();
    }

    let task = worker
        .runner
        .registry()
        .get(UrlValidationCron::BACKGROUND_TASK_NAME)
        .unwrap();

    task.process(&[]).await.unwrap();
    assert_eq!(queue.load().await.unwrap().len(), 2);
    assert_eq!(site.requests().len(), 5);

    task.process(&[]).await.unwrap();
    assert!(queue.load().await.unwrap().is_empty());
    assert_eq!(site.requests().len(), 7);
}

#[tokio::test]
async fn test_save_post_validates_eligible_content_inline() {
    let site = FakeSite::start().await;
    let worker = TestWorker::new(json!([
        content_item(1, "post", &site.url("/ok/post-1")),
        content_item(2, "attachment", &site.url("/ok/attachment-2")),
        { "id": 3, "type": "post", "permalink": site.url("/ok/post-1-rev"), "revision_of": 1 },
    ]))
    .await;
    let dispatcher = worker.runner.dispatcher();
    let ctx = ActionContext::user(UserId::new());

    for id in [2, 3, 99] {
        let ran = dispatcher.run_inline(hooks::SAVE_POST, &ctx, &[json!(id)]).await.unwrap();
        assert!(ran.is_empty(), "content {id} should not be validated");
    }
    assert!(site.requests().is_empty());

    let ran = dispatcher.run_inline(hooks::SAVE_POST, &ctx, &[json!(1)]).await.unwrap();
    assert_eq!(ran, vec![SavePostValidationEvent::BACKGROUND_TASK_NAME.to_string()]);
    assert_eq!(site.requests(), vec!["/ok/post-1".to_string()]);
}

#[tokio::test]
async fn test_save_post_is_scheduled_once_per_content() {
    let site = FakeSite::start().await;
    let worker = TestWorker::new(json!([content_item(1, "page", &site.url("/ok/about"))])).await;
    let dispatcher = worker.runner.dispatcher();
    let scheduler = worker.runner.scheduler();
    let ctx = ActionContext::system();

    assert_eq!(dispatcher.do_action(hooks::SAVE_POST, &ctx, &[json!(1)]).await.unwrap(), 1);
    assert_eq!(dispatcher.do_action(hooks::SAVE_POST, &ctx, &[json!("1")]).await.unwrap(), 0);
    assert_eq!(dispatcher.do_action(hooks::SAVE_POST, &ctx, &[json!(1)]).await.unwrap(), 0);
    assert_eq!(scheduler.pending_events().len(), 1);

    assert_eq!(
        scheduler
            .unschedule_all(SavePostValidationEvent::BACKGROUND_TASK_NAME)
            .await
            .unwrap(),
        1
    );
    assert!(site.requests().is_empty());
}

#[tokio::test]
async fn test_queue_shared_between_handles_on_same_file() {
    let worker = TestWorker::new(json!([])).await;
    let other = ValidationQueue::new(Arc::new(
        FileOptionStore::new(worker.options_path()).await.unwrap(),
    ));

    other
        .enqueue(&QueueEntry::new("http://example.test/", "post"))
        .await
        .unwrap();

    let rows = worker.runner.queue().rows().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].entry.as_ref().unwrap().url, "http://example.test/");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_entry_enqueued_by_another_handle_during_drain_is_kept() {
    let site = FakeSite::start().await;
    let worker = Arc::new(TestWorker::new(json!([])).await);
    let slow = QueueEntry::new(site.url("/slow/a"), "post");
    worker.runner.queue().enqueue(&slow).await.unwrap();

    let drain = {
        let worker = Arc::clone(&worker);
        tokio::spawn(async move {
            let task = worker
                .runner
                .registry()
                .get(UrlValidationCron::BACKGROUND_TASK_NAME)
                .unwrap();
            task.process(&[]).await
        })
    };

    // Another process enqueues while the slow URL is being validated.
    tokio::time::sleep(SLOW_RESPONSE / 4).await;
    let other = ValidationQueue::new(Arc::new(
        FileOptionStore::new(worker.options_path()).await.unwrap(),
    ));
    let late = QueueEntry::new("http://example.test/late", "page");
    assert!(other.enqueue(&late).await.unwrap());

    drain.await.unwrap().unwrap();

    let remaining = other.load().await.unwrap();
    assert_eq!(remaining.keys().collect::<Vec<_>>(), vec![&late.hash()]);
    assert_eq!(site.requests(), vec!["/slow/a".to_string()]);
}

#[tokio::test]
async fn test_save_recorded_by_another_handle_is_dispatched() {
    let site = FakeSite::start().await;
    let worker = TestWorker::new(json!([content_item(1, "post", &site.url("/ok/one"))])).await;

    // Content saved after the worker loaded the manifest.
    tokio::time::sleep(Duration::from_millis(20)).await;
    let manifest = worker.dir.path().join("content.json");
    let content = json!([
        content_item(1, "post", &site.url("/ok/one")),
        content_item(2, "page", &site.url("/ok/two")),
    ]);
    std::fs::write(&manifest, serde_json::to_vec(&content).unwrap()).unwrap();

    let inbox = ActionInbox::new(Arc::new(
        FileOptionStore::new(worker.options_path()).await.unwrap(),
    ));
    for id in [2, 99] {
        inbox
            .push(&PendingAction::new(hooks::SAVE_POST, ActionContext::system(), vec![json!(id)]))
            .await
            .unwrap();
    }

    assert_eq!(worker.runner.dispatch_pending().await.unwrap(), 1);
    assert!(inbox.pending().await.unwrap().is_empty());
    assert_eq!(worker.runner.scheduler().pending_events().len(), 1);

    worker
        .runner
        .scheduler()
        .unschedule_all(SavePostValidationEvent::BACKGROUND_TASK_NAME)
        .await
        .unwrap();
}
