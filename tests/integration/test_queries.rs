//! Query execution against a mocked Azure DevOps.

use ado_assistant::{AdoError, AssistantError, QueryIntent};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::*;

async fn mount_work_items(server: &MockServer, items: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path(project_path("_apis/wit/workitems")))
        .and(query_param("errorPolicy", "omit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(items)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_open_bugs_returns_only_open_bugs() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(project_path("_apis/wit/wiql")))
        .and(body_string_contains("[System.WorkItemType] = 'Bug'"))
        .and(body_string_contains("NOT IN ('Closed', 'Resolved', 'Done')"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wiql_response(&[11, 12])))
        .expect(1)
        .mount(&server)
        .await;
    mount_work_items(
        &server,
        vec![work_item(11, "Bug", "Active", 1), work_item(12, "Bug", "New", 3)],
    )
    .await;

    let result = executor(&server)
        .run("Show me all open bugs", &session())
        .await
        .unwrap();

    assert_eq!(result.intent, QueryIntent::OpenBugs);
    assert_eq!(result.count, 2);
    assert_eq!(result.items.len(), 2);
    assert!(result
        .items
        .iter()
        .all(|item| item.kind == "Bug" && item.state != "Closed"));
    assert!(result.answer.starts_with("Found 2 bug(s):"));
    assert_eq!(result.stats.api_calls, 2);
    assert_eq!(
        result.items[0].url.as_deref(),
        Some(format!("{}/contoso/Fabrikam%20Fiber/_workitems/edit/11", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_unmatched_text_lists_active_items() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(project_path("_apis/wit/wiql")))
        .respond_with(ResponseTemplate::new(200).set_body_json(wiql_response(&[1, 2, 3])))
        .mount(&server)
        .await;
    mount_work_items(
        &server,
        vec![
            work_item(1, "Task", "Active", 2),
            work_item(2, "Bug", "New", 2),
            work_item(3, "Task", "Active", 2),
        ],
    )
    .await;

    let executor = executor(&server);
    let unmatched = executor
        .run("what's the weather on mars", &session())
        .await
        .unwrap();
    let generic = executor.run("anything", &session()).await.unwrap();

    assert_eq!(unmatched.intent, QueryIntent::Generic);
    assert_eq!(generic.intent, QueryIntent::Generic);
    assert_eq!(unmatched.count, generic.count);
    assert_eq!(unmatched.items, generic.items);
    assert!(unmatched.answer.starts_with("Active work items in project: 3"));

    let summary = unmatched.summary.unwrap();
    assert_eq!(summary.by_type.get("Task"), Some(&2));
}

#[tokio::test]
async fn test_execution_leaves_session_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(project_path("_apis/wit/wiql")))
        .respond_with(ResponseTemplate::new(200).set_body_json(wiql_response(&[])))
        .mount(&server)
        .await;

    let session = session();
    let before = session.clone();

    let result = executor(&server)
        .run("what's assigned to me", &session)
        .await
        .unwrap();

    assert_eq!(session, before);
    assert_eq!(result.intent, QueryIntent::MyItems);
    assert_eq!(result.count, 0);
    assert!(result.items.is_empty());
    assert_eq!(
        result.answer,
        "You have no work items currently assigned to you."
    );
}

#[tokio::test]
async fn test_detail_fetch_is_capped() {
    let server = MockServer::start().await;
    let ids: Vec<i64> = (1..=40).collect();

    Mock::given(method("POST"))
        .and(path(project_path("_apis/wit/wiql")))
        .respond_with(ResponseTemplate::new(200).set_body_json(wiql_response(&ids)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(project_path("_apis/wit/workitems")))
        .and(query_param("ids", "1,2,3,4,5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(
            (1..=5).map(|id| work_item(id, "Bug", "Active", 2)).collect(),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let result = executor(&server)
        .run("show me top 5 bugs", &session())
        .await
        .unwrap();

    assert_eq!(result.count, 40);
    assert_eq!(result.items.len(), 5);
    assert_eq!(result.params.limit, Some(5));
}

#[tokio::test]
async fn test_deleted_work_items_are_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(project_path("_apis/wit/wiql")))
        .respond_with(ResponseTemplate::new(200).set_body_json(wiql_response(&[1, 2])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(project_path("_apis/wit/workitems")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "value": [work_item(1, "User Story", "Active", 2), null]
        })))
        .mount(&server)
        .await;

    let result = executor(&server)
        .run("list user stories", &session())
        .await
        .unwrap();

    assert_eq!(result.intent, QueryIntent::UserStories);
    assert_eq!(result.items.len(), 1);
}

#[tokio::test]
async fn test_active_pull_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(project_path("_apis/git/pullrequests")))
        .and(query_param("searchCriteria.status", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(vec![json!({
            "pullRequestId": 7,
            "title": "Fix login redirect",
            "status": "active",
            "createdBy": {"displayName": "Grace Hopper"},
            "sourceRefName": "refs/heads/fix/login",
            "targetRefName": "refs/heads/main",
            "reviewers": [],
            "repository": {"name": "web"}
        })])))
        .expect(1)
        .mount(&server)
        .await;

    let result = executor(&server)
        .run("show me open pull requests", &session())
        .await
        .unwrap();

    assert_eq!(result.intent, QueryIntent::PullRequests);
    assert_eq!(result.items[0].kind, "Pull Request");
    assert_eq!(result.items[0].assigned_to.as_deref(), Some("Grace Hopper"));
    assert!(result.answer.contains("Fix login redirect"));
    assert_eq!(result.stats.api_calls, 1);
}

#[tokio::test]
async fn test_pull_request_count_covers_every_match() {
    let server = MockServer::start().await;
    let prs: Vec<_> = (1..=25)
        .map(|id| {
            json!({
                "pullRequestId": id,
                "title": format!("Change {}", id),
                "status": "active",
                "createdBy": {"displayName": "Grace Hopper"},
                "repository": {"name": "web"}
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path(project_path("_apis/git/pullrequests")))
        .and(query_param("searchCriteria.status", "active"))
        .and(query_param_is_missing("$top"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(prs)))
        .expect(1)
        .mount(&server)
        .await;

    let result = executor(&server)
        .run("show me open pull requests", &session())
        .await
        .unwrap();

    assert_eq!(result.count, 25);
    assert_eq!(result.items.len(), 20);
    assert!(result.answer.starts_with("Found 25 active pull request(s):"));
    assert!(result.answer.contains("... and 15 more"));
}

#[tokio::test]
async fn test_recent_builds_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(project_path("_apis/build/builds")))
        .and(query_param("$top", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(vec![
            json!({"id": 1, "buildNumber": "1.0.1", "status": "completed", "result": "succeeded",
                   "definition": {"name": "CI"}}),
            json!({"id": 2, "buildNumber": "1.0.2", "status": "completed", "result": "failed",
                   "definition": {"name": "CI"}}),
            json!({"id": 3, "buildNumber": "1.0.3", "status": "completed", "result": "succeeded",
                   "definition": {"name": "CI"}}),
        ])))
        .mount(&server)
        .await;

    let result = executor(&server)
        .run("how are the recent builds", &session())
        .await
        .unwrap();

    assert_eq!(result.intent, QueryIntent::Builds);
    assert!(result.answer.contains("Summary: 2 succeeded, 1 failed"));
}

#[tokio::test]
async fn test_sprint_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(project_path("_apis/wit/wiql")))
        .and(body_string_contains("[System.IterationPath] UNDER 'Fabrikam Fiber'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wiql_response(&[1, 2, 3, 4])))
        .mount(&server)
        .await;
    mount_work_items(
        &server,
        vec![
            work_item(1, "Task", "Done", 2),
            work_item(2, "Task", "Closed", 2),
            work_item(3, "Task", "Active", 2),
            work_item(4, "Bug", "New", 2),
        ],
    )
    .await;

    let result = executor(&server)
        .run("current sprint status", &session())
        .await
        .unwrap();

    assert_eq!(result.intent, QueryIntent::SprintStatus);
    assert_eq!(result.summary.unwrap().completion_percent, Some(50.0));
    assert!(result.answer.contains("Completion: 50.0% (2/4)"));
}

#[tokio::test]
async fn test_unknown_organization_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = executor(&server)
        .run("show me open bugs", &session())
        .await
        .unwrap_err();

    assert!(
        matches!(err, AssistantError::Ado(AdoError::NotFound(_))),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(project_path("_apis/wit/wiql")))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = executor(&server)
        .run("show me open bugs", &session())
        .await
        .unwrap_err();

    assert!(matches!(err, AssistantError::Ado(AdoError::Decode(_))));
}
