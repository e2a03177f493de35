/// Integration tests for the GraphQL API
///
/// Covers the full project/task lifecycle for one user and the isolation
/// guarantees between users.

mod common;

use common::{error_code, TestContext};
use serde_json::{json, Value};

const CREATE_PROJECT: &str = r#"
    mutation($input: CreateProjectInput!) {
        createProject(input: $input) { id name description userId createdAt updatedAt }
    }"#;

const CREATE_TASK: &str = r#"
    mutation($input: CreateTaskInput!) {
        createTask(input: $input) { id title status projectId userId }
    }"#;

async fn create_project(ctx: &TestContext, token: &str, name: &str) -> String {
    let response = ctx
        .graphql(Some(token), CREATE_PROJECT, json!({ "input": { "name": name } }))
        .await;
    assert!(response.get("errors").is_none(), "{}", response);
    response["data"]["createProject"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_task(ctx: &TestContext, token: &str, project_id: &str, title: &str) -> Value {
    ctx.graphql(
        Some(token),
        CREATE_TASK,
        json!({ "input": { "title": title, "projectId": project_id } }),
    )
    .await
}

#[tokio::test]
async fn test_project_and_task_lifecycle() {
    let ctx = TestContext::new();
    let token = ctx.register("alice").await;

    let created = ctx
        .graphql(
            Some(&token),
            CREATE_PROJECT,
            json!({ "input": { "name": "Launch", "description": "Q3 launch" } }),
        )
        .await;
    let project = &created["data"]["createProject"];
    assert_eq!(project["name"], "Launch");
    assert_eq!(project["description"], "Q3 launch");
    let project_id = project["id"].as_str().unwrap().to_string();

    let task = create_task(&ctx, &token, &project_id, "Write copy").await;
    let task = &task["data"]["createTask"];
    assert_eq!(task["status"], "BACKLOG");
    assert_eq!(task["projectId"], project_id.as_str());
    assert_eq!(task["userId"], project["userId"]);
    let task_id = task["id"].as_str().unwrap().to_string();

    let updated = ctx
        .graphql(
            Some(&token),
            r#"mutation($input: UpdateTaskInput!) {
                updateTask(input: $input) { id title status }
            }"#,
            json!({ "input": { "id": task_id, "status": "IN_PROGRESS" } }),
        )
        .await;
    assert_eq!(updated["data"]["updateTask"]["status"], "IN_PROGRESS");
    assert_eq!(updated["data"]["updateTask"]["title"], "Write copy");

    let listed = ctx
        .graphql(
            Some(&token),
            "query { projects { id name tasks { id status } } }",
            json!({}),
        )
        .await;
    let projects = listed["data"]["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["tasks"][0]["id"], task_id.as_str());
    assert_eq!(projects[0]["tasks"][0]["status"], "IN_PROGRESS");

    let deleted = ctx
        .graphql(
            Some(&token),
            "mutation($id: ID!) { deleteProject(id: $id) }",
            json!({ "id": project_id }),
        )
        .await;
    assert_eq!(deleted["data"]["deleteProject"], true);

    let gone = ctx
        .graphql(
            Some(&token),
            "query($id: ID!) { task(id: $id) { id } }",
            json!({ "id": task_id }),
        )
        .await;
    assert_eq!(error_code(&gone), Some("NOT_FOUND"));
}

#[tokio::test]
async fn test_update_project_changes_only_given_fields() {
    let ctx = TestContext::new();
    let token = ctx.register("alice").await;

    let created = ctx
        .graphql(
            Some(&token),
            CREATE_PROJECT,
            json!({ "input": { "name": "Site", "description": "Marketing site" } }),
        )
        .await;
    let id = created["data"]["createProject"]["id"].as_str().unwrap();

    let updated = ctx
        .graphql(
            Some(&token),
            r#"mutation($input: UpdateProjectInput!) {
                updateProject(input: $input) { name description }
            }"#,
            json!({ "input": { "id": id, "name": "Website" } }),
        )
        .await;

    assert_eq!(updated["data"]["updateProject"]["name"], "Website");
    assert_eq!(updated["data"]["updateProject"]["description"], "Marketing site");
}

#[tokio::test]
async fn test_other_users_resources_are_not_found() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice").await;
    let bob = ctx.register("bob").await;

    let project_id = create_project(&ctx, &alice, "Private").await;
    let task = create_task(&ctx, &alice, &project_id, "Secret").await;
    let task_id = task["data"]["createTask"]["id"].as_str().unwrap().to_string();

    let project = ctx
        .graphql(
            Some(&bob),
            "query($id: ID!) { project(id: $id) { id } }",
            json!({ "id": project_id }),
        )
        .await;
    assert_eq!(error_code(&project), Some("NOT_FOUND"));

    let tasks = ctx
        .graphql(
            Some(&bob),
            "query($id: ID!) { tasks(projectId: $id) { id } }",
            json!({ "id": project_id }),
        )
        .await;
    assert_eq!(error_code(&tasks), Some("NOT_FOUND"));

    let update = ctx
        .graphql(
            Some(&bob),
            r#"mutation($input: UpdateTaskInput!) { updateTask(input: $input) { id } }"#,
            json!({ "input": { "id": task_id, "title": "Mine now" } }),
        )
        .await;
    assert_eq!(error_code(&update), Some("NOT_FOUND"));

    let delete = ctx
        .graphql(
            Some(&bob),
            "mutation($id: ID!) { deleteProject(id: $id) }",
            json!({ "id": project_id }),
        )
        .await;
    assert_eq!(error_code(&delete), Some("NOT_FOUND"));

    let listed = ctx
        .graphql(Some(&bob), "query { projects { id } }", json!({}))
        .await;
    assert_eq!(listed["data"]["projects"], json!([]));

    // Alice still sees her untouched task
    let own = ctx
        .graphql(
            Some(&alice),
            "query($id: ID!) { task(id: $id) { title } }",
            json!({ "id": task_id }),
        )
        .await;
    assert_eq!(own["data"]["task"]["title"], "Secret");
}

#[tokio::test]
async fn test_create_task_on_foreign_project_is_not_found() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice").await;
    let bob = ctx.register("bob").await;

    let project_id = create_project(&ctx, &alice, "Private").await;
    let response = create_task(&ctx, &bob, &project_id, "Sneaky").await;
    assert_eq!(error_code(&response), Some("NOT_FOUND"));

    let tasks = ctx
        .graphql(
            Some(&alice),
            "query($id: ID!) { tasks(projectId: $id) { id } }",
            json!({ "id": project_id }),
        )
        .await;
    assert_eq!(tasks["data"]["tasks"], json!([]));
}

#[tokio::test]
async fn test_anonymous_requests_are_rejected() {
    let ctx = TestContext::new();

    let response = ctx.graphql(None, "query { projects { id } }", json!({})).await;
    assert_eq!(error_code(&response), Some("AUTHENTICATION_REQUIRED"));

    let response = ctx
        .graphql(
            Some("forged.token.value"),
            CREATE_PROJECT,
            json!({ "input": { "name": "Nope" } }),
        )
        .await;
    assert_eq!(error_code(&response), Some("AUTHENTICATION_REQUIRED"));
}

#[tokio::test]
async fn test_invalid_input_is_validation_error() {
    let ctx = TestContext::new();
    let token = ctx.register("alice").await;

    let response = ctx
        .graphql(Some(&token), CREATE_PROJECT, json!({ "input": { "name": "" } }))
        .await;
    assert_eq!(error_code(&response), Some("VALIDATION_ERROR"));
    assert!(response["errors"][0]["extensions"]["details"].is_array());

    let project_id = create_project(&ctx, &token, "Board").await;
    let response = create_task(&ctx, &token, &project_id, "").await;
    assert_eq!(error_code(&response), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_unknown_status_is_rejected() {
    let ctx = TestContext::new();
    let token = ctx.register("alice").await;

    let project_id = create_project(&ctx, &token, "Board").await;
    let task = create_task(&ctx, &token, &project_id, "Card").await;
    let task_id = task["data"]["createTask"]["id"].as_str().unwrap().to_string();

    let response = ctx
        .graphql(
            Some(&token),
            r#"mutation($input: UpdateTaskInput!) { updateTask(input: $input) { status } }"#,
            json!({ "input": { "id": task_id, "status": "ARCHIVED" } }),
        )
        .await;
    assert!(response["errors"].is_array());
    assert!(response["data"].is_null());
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    let ctx = TestContext::new();
    let token = ctx.register("alice").await;

    let project_id = create_project(&ctx, &token, "Board").await;
    let task = create_task(&ctx, &token, &project_id, "Card").await;
    let task_id = task["data"]["createTask"]["id"].as_str().unwrap().to_string();

    let delete = "mutation($id: ID!) { deleteTask(id: $id) }";
    let first = ctx.graphql(Some(&token), delete, json!({ "id": task_id })).await;
    assert_eq!(first["data"]["deleteTask"], true);

    let second = ctx.graphql(Some(&token), delete, json!({ "id": task_id })).await;
    assert_eq!(error_code(&second), Some("NOT_FOUND"));
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let ctx = TestContext::new();
    let token = ctx.register("alice").await;

    let response = ctx
        .graphql(
            Some(&token),
            "query { project(id: \"not-a-uuid\") { id } }",
            json!({}),
        )
        .await;
    assert_eq!(error_code(&response), Some("NOT_FOUND"));
}

#[tokio::test]
async fn test_done_back_to_backlog_keeps_title() {
    let ctx = TestContext::new();
    let token = ctx.register("alice").await;

    let created = ctx
        .graphql(
            Some(&token),
            r#"mutation { createProject(input: { name: "X" }) { id tasks { id } } }"#,
            json!({}),
        )
        .await;
    assert_eq!(created["data"]["createProject"]["tasks"], json!([]));
    let project_id = created["data"]["createProject"]["id"].as_str().unwrap();

    let task = create_task(&ctx, &token, project_id, "t1").await;
    let task_id = task["data"]["createTask"]["id"].as_str().unwrap().to_string();

    let set_status = r#"mutation($input: UpdateTaskInput!) {
        updateTask(input: $input) { title status }
    }"#;
    for status in ["DONE", "BACKLOG"] {
        let response = ctx
            .graphql(
                Some(&token),
                set_status,
                json!({ "input": { "id": task_id, "status": status } }),
            )
            .await;
        assert_eq!(response["data"]["updateTask"]["status"], status);
        assert_eq!(response["data"]["updateTask"]["title"], "t1");
    }
}
