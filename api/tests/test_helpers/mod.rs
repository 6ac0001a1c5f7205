use api::routes::routes;
use axum::{Router, body::Body, http::Request, response::Response};
use db::models::{
    research_group::Model as ResearchGroupModel, submission::Model as SubmissionModel,
    user::{Model as UserModel, Role},
};
use sea_orm::DatabaseConnection;
use std::convert::Infallible;
use tempfile::TempDir;
use tower::ServiceExt;
use tower::util::BoxCloneService;
use util::{config::AppConfig, state::AppState};

pub fn make_app(db: DatabaseConnection) -> BoxCloneService<Request<Body>, Response, Infallible> {
    let router: Router = Router::new().nest("/api", routes(AppState::new(db)));
    router.into_service().boxed_clone()
}

/// Point the storage root at a fresh temp directory. The returned guard keeps
/// the directory alive for the duration of the test.
pub fn setup_storage() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp storage root");
    AppConfig::set_storage_root(dir.path().to_string_lossy().to_string());
    dir
}

pub struct TestData {
    pub student: UserModel,
    pub adviser: UserModel,
    pub outsider_student: UserModel,
    pub outsider_adviser: UserModel,
    pub group: ResearchGroupModel,
    pub submission: SubmissionModel,
}

pub async fn setup_test_data(db: &DatabaseConnection) -> TestData {
    let student = UserModel::create(db, "Alice Mokoena", "alice@example.com", Role::Student)
        .await
        .unwrap();
    let adviser = UserModel::create(db, "Dr Naidoo", "naidoo@example.com", Role::Adviser)
        .await
        .unwrap();
    let outsider_student = UserModel::create(db, "Ben Dlamini", "ben@example.com", Role::Student)
        .await
        .unwrap();
    let outsider_adviser = UserModel::create(db, "Dr Pillay", "pillay@example.com", Role::Adviser)
        .await
        .unwrap();

    let group = ResearchGroupModel::create(db, "Knowledge Systems", student.id, adviser.id)
        .await
        .unwrap();
    let submission = SubmissionModel::create(db, group.id, 3).await.unwrap();

    TestData {
        student,
        adviser,
        outsider_student,
        outsider_adviser,
        group,
        submission,
    }
}

/// Build a multipart body from text fields plus an optional file part
/// (filename, content type, bytes). Returns the boundary and the raw body.
pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> (String, Vec<u8>) {
    let boundary = "----BoundaryTest".to_string();
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend(format!("--{}\r\n", boundary).as_bytes());
        body.extend(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                name, value
            )
            .as_bytes(),
        );
    }

    if let Some((filename, content_type, bytes)) = file {
        body.extend(format!("--{}\r\n", boundary).as_bytes());
        body.extend(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                filename, content_type
            )
            .as_bytes(),
        );
        body.extend(bytes);
        body.extend(b"\r\n");
    }

    body.extend(format!("--{}--\r\n", boundary).as_bytes());
    (boundary, body)
}

pub async fn response_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
