//! End-to-end harvest against a mock GitHub API.

mod common;

use mockito::{Matcher, Server};
use serde_json::json;

use issue_harvest::domain::models::config::IssueListingConfig;
use issue_harvest::{
    HarvestService, IssuePersister, IssueRepository, IssueState, TimelineEvent,
};

use common::{mock_client, repo_path, setup_test_logging, temp_data_path};

#[tokio::test]
async fn test_pull_requests_are_skipped_and_issues_persisted() {
    setup_test_logging();
    let mut server = Server::new_async().await;

    let listing = server
        .mock("GET", repo_path("/issues").as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("state".into(), "all".into()),
            Matcher::UrlEncoded("per_page".into(), "100".into()),
            Matcher::UrlEncoded("sort".into(), "created".into()),
            Matcher::UrlEncoded("direction".into(), "asc".into()),
        ]))
        .with_status(200)
        .with_body(json!([{"number": 1}, {"number": 2, "pull_request": {}}]).to_string())
        .expect(1)
        .create_async()
        .await;

    let timeline = server
        .mock("GET", repo_path("/issues/1/timeline").as_str())
        .match_query(Matcher::UrlEncoded("per_page".into(), "100".into()))
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let pr_timeline = server
        .mock("GET", repo_path("/issues/2/timeline").as_str())
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (_dir, path) = temp_data_path();
    let (client, _) = mock_client(&server.url());
    let service = HarvestService::new(
        client,
        IssueListingConfig::default(),
        IssuePersister::new(&path),
    );

    let report = service.run().await.unwrap();
    assert_eq!(report.issues_written, 1);
    assert_eq!(report.pull_requests_skipped, 1);
    assert_eq!(report.malformed_skipped, 0);
    assert_eq!(report.output_path, path);

    let repository = IssueRepository::new(&path);
    let issues = repository.issues().await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].number, 1);
    assert!(issues[0].timeline_url.ends_with("/repos/octo/hello/issues/1/timeline"));

    listing.assert_async().await;
    timeline.assert_async().await;
    pr_timeline.assert_async().await;
}

#[tokio::test]
async fn test_full_records_survive_persist_and_load() {
    setup_test_logging();
    let mut server = Server::new_async().await;

    server
        .mock("GET", repo_path("/issues").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([
                {
                    "number": 7,
                    "html_url": "https://github.com/octo/hello/issues/7",
                    "title": "Lock file is not updated ✨",
                    "body": "Steps:\r\n1. run\r\n2. fail",
                    "state": "closed",
                    "user": {"login": "reporter"},
                    "labels": [{"name": "kind/bug"}, {"name": "status/triage"}],
                    "assignees": [{"login": "maintainer"}],
                    "comments": 1,
                    "created_at": "2023-01-05T08:00:00Z",
                    "updated_at": "2023-01-07T08:00:00Z",
                    "closed_at": "2023-01-07T08:00:00Z"
                },
                {"title": "no number here"},
                {"number": 7, "title": "repeated"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    server
        .mock("GET", repo_path("/issues/7/timeline").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([
                {"event": "labeled", "actor": {"login": "maintainer"}, "label": {"name": "kind/bug"}, "created_at": "2023-01-05T09:00:00Z"},
                {"body": "Can reproduce.\r\nThanks", "user": {"login": "maintainer"}, "created_at": "2023-01-06T09:00:00Z"},
                {"node_id": "mystery"},
                {"event": "closed", "actor": {"login": "maintainer"}, "created_at": "2023-01-07T08:00:00Z"}
            ])
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let (_dir, path) = temp_data_path();
    let (client, _) = mock_client(&server.url());
    let service = HarvestService::new(
        client,
        IssueListingConfig::default(),
        IssuePersister::new(&path),
    );

    let report = service.run().await.unwrap();
    assert_eq!(report.issues_written, 1);
    assert_eq!(report.malformed_skipped, 1);
    assert_eq!(report.duplicates_skipped, 1);
    assert_eq!(report.events_collected, 3);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let events = raw[0]["events"].as_array().unwrap();
    assert!(events
        .iter()
        .all(|e| e.as_object().unwrap().values().all(|v| !v.is_null())));

    let repository = IssueRepository::new(&path);
    let issue = &repository.issues().await.unwrap()[0];
    assert_eq!(issue.number, 7);
    assert_eq!(issue.title.as_deref(), Some("Lock file is not updated ✨"));
    assert_eq!(issue.state, Some(IssueState::Closed));
    assert_eq!(issue.text(), "Steps:\n1. run\n2. fail");
    assert_eq!(issue.label_names(), vec!["kind/bug", "status/triage"]);
    assert_eq!(issue.assignees, vec!["maintainer"]);
    assert_eq!(issue.comments, 1);
    assert!(issue.closed_date.is_some());

    let types: Vec<&str> = issue.events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(types, vec!["labeled", "commented", "closed"]);
    assert_eq!(issue.events[0].label.as_deref(), Some("kind/bug"));
    assert_eq!(
        issue.events[1],
        TimelineEvent::new("commented")
            .with_author(Some("maintainer".to_string()))
            .with_event_date(Some("2023-01-06T09:00:00Z".parse().unwrap()))
            .with_comment(Some("Can reproduce.\nThanks".to_string()))
    );
}

#[tokio::test]
async fn test_timeline_failure_aborts_without_writing() {
    setup_test_logging();
    let mut server = Server::new_async().await;

    server
        .mock("GET", repo_path("/issues").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([{"number": 1}]).to_string())
        .create_async()
        .await;
    server
        .mock("GET", repo_path("/issues/1/timeline").as_str())
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;

    let (_dir, path) = temp_data_path();
    let (client, _) = mock_client(&server.url());
    let service = HarvestService::new(
        client,
        IssueListingConfig::default(),
        IssuePersister::new(&path),
    );

    let err = service.run().await.unwrap_err();
    assert!(err.to_string().contains("404"));
    assert!(!path.exists());
}
