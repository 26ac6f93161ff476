//! Spark scheduler refresh and completion against a mocked API.

mod common;

use std::pin::pin;

use futures::poll;
use mockito::Matcher;
use serde_json::json;
use socialspark_core::{SparkError, SparkScheduler, SparkStatus};

async fn mock_suggestion(server: &mut mockito::ServerGuard, contact_id: i64, body: &str) -> mockito::Mock {
    server
        .mock("GET", format!("/api/get/daily_suggestion/1/{contact_id}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn refresh_builds_tasks_in_rank_order_without_failed_ids() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/get/get-top-n/1/3")
        .with_status(200)
        .with_body("[5, 2, 9]")
        .create_async()
        .await;
    let _suggestion = mock_suggestion(&mut server, 5, r#""Call about the hike""#).await;
    let _mock = server
        .mock("GET", "/api/get/daily_suggestion/1/2")
        .with_status(404)
        .create_async()
        .await;
    let _suggestion = mock_suggestion(&mut server, 9, r#"["Share the playlist", "t-9"]"#).await;

    let scheduler = SparkScheduler::new(common::gateway(&server), "1");
    let count = scheduler.refresh(3).await.unwrap();

    let tasks = scheduler.tasks();
    assert_eq!(count, 2);
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, "5");
    assert_eq!(tasks[0].name, "Call about the hike");
    assert_eq!(tasks[1].id, "9");
    assert_eq!(tasks[1].suggestion_id.as_deref(), Some("t-9"));
    assert!(tasks.iter().all(|t| t.status() == SparkStatus::Pending));
}

#[tokio::test]
async fn empty_ranking_makes_no_suggestion_calls() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/get/get-top-n/1/4")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    let suggestions = server
        .mock("GET", Matcher::Regex(r"^/api/get/daily_suggestion/".into()))
        .expect(0)
        .create_async()
        .await;

    let scheduler = SparkScheduler::new(common::gateway(&server), "1");
    assert_eq!(scheduler.refresh(4).await.unwrap(), 0);
    assert!(scheduler.tasks().is_empty());
    suggestions.assert_async().await;
}

#[tokio::test]
async fn zero_requested_yields_empty_list() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/get/get-top-n/1/0")
        .with_status(200)
        .with_body("[1, 2]")
        .create_async()
        .await;

    let scheduler = SparkScheduler::new(common::gateway(&server), "1");
    assert_eq!(scheduler.refresh(0).await.unwrap(), 0);
    assert!(scheduler.tasks().is_empty());
}

#[tokio::test]
async fn phase_one_failure_clears_previous_tasks() {
    let mut server = mockito::Server::new_async().await;
    let ok = server
        .mock("GET", "/api/get/get-top-n/1/1")
        .with_status(200)
        .with_body("[7]")
        .expect(1)
        .create_async()
        .await;
    let _suggestion = mock_suggestion(&mut server, 7, r#""Wish happy birthday""#).await;

    let scheduler = SparkScheduler::new(common::gateway(&server), "1");
    scheduler.refresh(1).await.unwrap();
    assert_eq!(scheduler.tasks().len(), 1);
    ok.assert_async().await;
    ok.remove_async().await;

    let _mock = server
        .mock("GET", "/api/get/get-top-n/1/1")
        .with_status(500)
        .create_async()
        .await;

    let err = scheduler.refresh(1).await.unwrap_err();
    assert!(matches!(err, SparkError::Ranking(_)));
    assert!(scheduler.tasks().is_empty());
}

#[tokio::test]
async fn complete_flips_and_acknowledges() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/get/get-top-n/1/1")
        .with_status(200)
        .with_body("[5]")
        .create_async()
        .await;
    let _suggestion = mock_suggestion(&mut server, 5, r#""Call about the hike""#).await;
    let ack = server
        .mock("POST", "/api/create/spark/1/5")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({ "success": true })))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;

    let scheduler = SparkScheduler::new(common::gateway(&server), "1");
    scheduler.refresh(1).await.unwrap();
    let updates = scheduler.subscribe();

    scheduler.complete("5").await.unwrap();

    assert!(updates.has_changed().unwrap());
    assert!(scheduler.tasks()[0].is_completed);
    assert_eq!(scheduler.pending_count(), 0);

    // Completing again is a no-op: no second acknowledgement.
    scheduler.complete("5").await.unwrap();
    ack.assert_async().await;
}

#[tokio::test]
async fn complete_keeps_flag_when_acknowledgement_fails() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/get/get-top-n/1/1")
        .with_status(200)
        .with_body("[5]")
        .create_async()
        .await;
    let _suggestion = mock_suggestion(&mut server, 5, r#""Call about the hike""#).await;
    let ack = server
        .mock("POST", "/api/create/spark/1/5")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let scheduler = SparkScheduler::new(common::gateway(&server), "1");
    scheduler.refresh(1).await.unwrap();

    scheduler.complete("5").await.unwrap();

    assert!(scheduler.tasks()[0].is_completed);
    ack.assert_async().await;
}

async fn mock_two_rankings(server: &mut mockito::ServerGuard) -> Vec<mockito::Mock> {
    let mut mocks = vec![
        server
            .mock("GET", "/api/get/get-top-n/1/1")
            .with_status(200)
            .with_body("[1]")
            .create_async()
            .await,
        server
            .mock("GET", "/api/get/get-top-n/1/2")
            .with_status(200)
            .with_body("[2, 3]")
            .create_async()
            .await,
    ];
    for id in 1..=3 {
        mocks.push(mock_suggestion(server, id, &format!(r#""spark {id}""#)).await);
    }
    mocks
}

fn task_ids(scheduler: &SparkScheduler) -> Vec<String> {
    scheduler.tasks().into_iter().map(|t| t.id).collect()
}

#[tokio::test]
async fn newer_installed_refresh_supersedes_older() {
    let mut server = mockito::Server::new_async().await;
    let _mocks = mock_two_rankings(&mut server).await;
    let scheduler = SparkScheduler::new(common::gateway(&server), "1");

    let mut older = pin!(scheduler.refresh(1));
    assert!(poll!(older.as_mut()).is_pending());

    assert_eq!(scheduler.refresh(2).await.unwrap(), 2);
    assert!(matches!(older.await, Err(SparkError::Superseded)));
    assert_eq!(task_ids(&scheduler), vec!["2", "3"]);
}

#[tokio::test]
async fn dropped_newer_refresh_does_not_block_older() {
    let mut server = mockito::Server::new_async().await;
    let _mocks = mock_two_rankings(&mut server).await;
    let scheduler = SparkScheduler::new(common::gateway(&server), "1");

    let mut older = pin!(scheduler.refresh(1));
    assert!(poll!(older.as_mut()).is_pending());
    {
        let mut newer = pin!(scheduler.refresh(2));
        assert!(poll!(newer.as_mut()).is_pending());
    }

    assert_eq!(older.await.unwrap(), 1);
    assert_eq!(task_ids(&scheduler), vec!["1"]);
}

#[tokio::test]
async fn dropped_refresh_leaves_list_untouched() {
    let mut server = mockito::Server::new_async().await;
    let _mocks = mock_two_rankings(&mut server).await;
    let scheduler = SparkScheduler::new(common::gateway(&server), "1");
    scheduler.refresh(1).await.unwrap();
    let before = scheduler.tasks();
    let updates = scheduler.subscribe();

    {
        let mut cancelled = pin!(scheduler.refresh(2));
        assert!(poll!(cancelled.as_mut()).is_pending());
    }

    assert_eq!(scheduler.tasks(), before);
    assert!(!updates.has_changed().unwrap());

    // A later refresh still installs.
    assert_eq!(scheduler.refresh(2).await.unwrap(), 2);
    assert_eq!(task_ids(&scheduler), vec!["2", "3"]);
}
