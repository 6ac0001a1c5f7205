mod test_helpers;

use api::auth::generate_jwt;
use axum::{
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use db::test_utils::setup_test_db;
use tower::ServiceExt;

use test_helpers::{make_app, response_json, setup_test_data};

fn get_request(token: Option<&str>, query: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("GET")
        .uri(format!("/api/chapters/messages{}", query));
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn rejects_unauthenticated_callers() {
    let db = setup_test_db().await;
    let data = setup_test_data(&db).await;
    let app = make_app(db);

    let uri = format!("?action=get_messages&submission_id={}", data.submission.id);
    let response = app.oneshot(get_request(None, &uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Not authenticated");
}

#[tokio::test]
async fn rejects_garbage_tokens() {
    let db = setup_test_db().await;
    let data = setup_test_data(&db).await;
    let app = make_app(db);

    let uri = format!("?action=get_messages&submission_id={}", data.submission.id);
    let response = app
        .oneshot(get_request(Some("not-a-jwt"), &uri))
        .await
        .unwrap();

    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Not authenticated");
}

#[tokio::test]
async fn rejects_unknown_actions() {
    let db = setup_test_db().await;
    let data = setup_test_data(&db).await;
    let app = make_app(db);

    let (token, _) = generate_jwt(data.student.id, data.student.role);
    let response = app
        .oneshot(get_request(Some(&token), "?action=shred_everything"))
        .await
        .unwrap();

    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Invalid action");
}

#[tokio::test]
async fn rejects_missing_action() {
    let db = setup_test_db().await;
    let data = setup_test_data(&db).await;
    let app = make_app(db);

    let (token, _) = generate_jwt(data.student.id, data.student.role);
    let response = app.oneshot(get_request(Some(&token), "")).await.unwrap();

    let json = response_json(response).await;
    assert_eq!(json["error"], "Invalid action");
}

#[tokio::test]
async fn rejects_missing_or_invalid_submission_id() {
    let db = setup_test_db().await;
    let data = setup_test_data(&db).await;
    let app = make_app(db);

    let (token, _) = generate_jwt(data.student.id, data.student.role);

    for query in [
        "?action=get_messages",
        "?action=get_messages&submission_id=0",
        "?action=get_messages&submission_id=-4",
        "?action=get_messages&submission_id=abc",
    ] {
        let response = app
            .clone()
            .oneshot(get_request(Some(&token), query))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["success"], false, "query {query}");
        assert_eq!(json["error"], "Invalid request", "query {query}");
        assert!(json.get("messages").is_none());
    }
}

#[tokio::test]
async fn reports_unknown_submissions() {
    let db = setup_test_db().await;
    let data = setup_test_data(&db).await;
    let app = make_app(db);

    let (token, _) = generate_jwt(data.student.id, data.student.role);
    let response = app
        .oneshot(get_request(
            Some(&token),
            "?action=get_messages&submission_id=99999",
        ))
        .await
        .unwrap();

    let json = response_json(response).await;
    assert_eq!(json["error"], "Submission not found");
}

#[tokio::test]
async fn denies_users_outside_the_group() {
    let db = setup_test_db().await;
    let data = setup_test_data(&db).await;
    let app = make_app(db);

    let uri = format!("?action=get_messages&submission_id={}", data.submission.id);

    for user in [&data.outsider_student, &data.outsider_adviser] {
        let (token, _) = generate_jwt(user.id, user.role);
        let response = app
            .clone()
            .oneshot(get_request(Some(&token), &uri))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Access denied");
    }
}

#[tokio::test]
async fn lead_student_and_adviser_can_read_an_empty_thread() {
    let db = setup_test_db().await;
    let data = setup_test_data(&db).await;
    let app = make_app(db);

    let uri = format!("?action=get_messages&submission_id={}", data.submission.id);

    for user in [&data.student, &data.adviser] {
        let (token, _) = generate_jwt(user.id, user.role);
        let response = app
            .clone()
            .oneshot(get_request(Some(&token), &uri))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["messages"].as_array().unwrap().len(), 0);
        assert_eq!(json["current_user_id"], user.id);
    }
}
