mod common;

use axum::http::StatusCode;
use common::{TestApp, json_body, location};
use coursedesk::types::ProjectStatus;

#[tokio::test]
async fn student_creates_project_owned_by_self_with_default_status() {
    let mut app = TestApp::spawn().await;
    app.register("alice", "pw1", "student").await;
    app.login("alice", "pw1").await;

    let resp = app
        .post_form("/project/create", &[("title", "Rocketry")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");

    let alice = app
        .storage
        .find_user_by_username("alice")
        .await
        .expect("query")
        .expect("user");
    let projects = app.storage.list_all_projects().await.expect("list");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].title, "Rocketry");
    assert_eq!(projects[0].owner_id, alice.id);
    assert_eq!(projects[0].status, ProjectStatus::Planned);
}

#[tokio::test]
async fn teacher_cannot_create_a_project() {
    let mut app = TestApp::spawn().await;
    app.register("prof", "teachpass", "teacher").await;
    app.login("prof", "teachpass").await;

    let resp = app
        .post_form("/project/create", &[("title", "Sneaky")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");
    assert!(app.storage.list_all_projects().await.expect("list").is_empty());
}

#[tokio::test]
async fn non_owner_edit_is_forbidden_and_leaves_the_project_unchanged() {
    let mut app = TestApp::spawn().await;
    app.register("alice", "pw1", "student").await;
    app.register("bob", "pw2", "student").await;

    app.login("alice", "pw1").await;
    app.post_form("/project/create", &[("title", "Original")])
        .await;
    let project_id = app.storage.list_all_projects().await.expect("list")[0].id;

    app.clear_cookies();
    app.login("bob", "pw2").await;
    let resp = app
        .post_form(
            &format!("/project/{project_id}/edit"),
            &[("title", "Hijacked"), ("status", "completed")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), format!("/project/{project_id}"));

    let project = app
        .storage
        .find_project_by_id(project_id)
        .await
        .expect("query")
        .expect("project");
    assert_eq!(project.title, "Original");
    assert_eq!(project.status, ProjectStatus::Planned);

    // Anonymous users are turned away the same way.
    app.clear_cookies();
    let resp = app
        .post_form(
            &format!("/project/{project_id}/edit"),
            &[("title", "Anon")],
        )
        .await;
    assert_eq!(location(&resp), format!("/project/{project_id}"));
}

#[tokio::test]
async fn dashboard_scopes_by_role_and_orders_by_recent_update() {
    let mut app = TestApp::spawn().await;
    app.register("alice", "pw1", "student").await;
    app.register("bob", "pw2", "student").await;
    app.register("prof", "teachpass", "teacher").await;

    app.login("alice", "pw1").await;
    app.post_form("/project/create", &[("title", "Alice 1")])
        .await;
    app.post_form("/project/create", &[("title", "Alice 2")])
        .await;
    app.clear_cookies();

    app.login("bob", "pw2").await;
    app.post_form("/project/create", &[("title", "Bob 1")]).await;
    app.clear_cookies();

    // Alice sees only her own projects, newest update first.
    app.login("alice", "pw1").await;
    let dashboard = json_body(app.get("/dashboard").await).await;
    let titles: Vec<&str> = dashboard["projects"]
        .as_array()
        .expect("projects array")
        .iter()
        .map(|p| p["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["Alice 2", "Alice 1"]);

    // Editing bumps a project back to the top.
    let first_id = dashboard["projects"][1]["id"].as_i64().expect("id");
    app.post_form(
        &format!("/project/{first_id}/edit"),
        &[("title", "Alice 1"), ("status", "in_progress")],
    )
    .await;
    let dashboard = json_body(app.get("/dashboard").await).await;
    assert_eq!(dashboard["projects"][0]["title"], "Alice 1");
    app.clear_cookies();

    // The teacher sees everything in the same order.
    app.login("prof", "teachpass").await;
    let dashboard = json_body(app.get("/dashboard").await).await;
    let titles: Vec<&str> = dashboard["projects"]
        .as_array()
        .expect("projects array")
        .iter()
        .map(|p| p["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["Alice 1", "Bob 1", "Alice 2"]);
}

#[tokio::test]
async fn project_page_is_publicly_readable() {
    let mut app = TestApp::spawn().await;
    app.register("alice", "pw1", "student").await;
    app.login("alice", "pw1").await;
    app.post_form("/project/create", &[("title", "Public")])
        .await;
    let project_id = app.storage.list_all_projects().await.expect("list")[0].id;

    app.clear_cookies();
    let resp = app.get(&format!("/project/{project_id}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let view = json_body(resp).await;
    assert_eq!(view["project"]["title"], "Public");
    assert_eq!(view["project"]["owner"], "alice");
}

#[tokio::test]
async fn missing_project_redirects_to_dashboard() {
    let mut app = TestApp::spawn().await;

    let resp = app.get("/project/999").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");

    app.register("alice", "pw1", "student").await;
    app.login("alice", "pw1").await;
    let resp = app
        .post_form("/project/999/edit", &[("title", "Ghost")])
        .await;
    assert_eq!(location(&resp), "/dashboard");
}

#[tokio::test]
async fn end_to_end_student_scenario() {
    let mut app = TestApp::spawn().await;

    app.register("alice", "pw1", "student").await;
    app.login("alice", "pw1").await;

    app.post_form("/project/create", &[("title", "Проєкт A")])
        .await;
    let project_id = app.storage.list_all_projects().await.expect("list")[0].id;

    let resp = app
        .post_form(
            &format!("/project/{project_id}/edit"),
            &[("title", "Проєкт A"), ("status", "completed")],
        )
        .await;
    assert_eq!(location(&resp), format!("/project/{project_id}"));

    let view = json_body(app.get(&format!("/project/{project_id}")).await).await;
    assert_eq!(view["project"]["title"], "Проєкт A");
    assert_eq!(view["project"]["status"], "completed");
    assert_eq!(view["comments"].as_array().expect("comments").len(), 0);
    assert_eq!(view["grades"].as_array().expect("grades").len(), 0);
}
