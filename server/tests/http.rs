mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use hub_server::build_router;
use products_directory::{Branch, Department, NewTeammate, OnboardingStatus};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn new_teammate(first: &str, last: &str, department: Department) -> NewTeammate {
    NewTeammate {
        first_name: first.into(),
        last_name: last.into(),
        email: format!("{}@lendingheights.test", first.to_lowercase()),
        phone: None,
        position: "Loan Officer, Senior".into(),
        department,
        branch: Branch::Savannah,
        nmls: None,
        headshot_url: None,
        start_date: None,
        birthday: None,
        onboarding_status: OnboardingStatus::Done,
        linkedin: None,
        calendly: None,
        manager_id: None,
    }
}

#[tokio::test]
async fn health_reports_database_status() {
    let app = common::spawn().await;
    let response = build_router(app.state.clone())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["db_ok"], true);
}

#[tokio::test]
async fn export_csv_is_an_attachment() {
    let app = common::spawn().await;
    let directory = &app.state.data.directory;
    directory
        .create(new_teammate("John", "Doe", Department::Sales))
        .await
        .unwrap();
    directory
        .create(new_teammate("Dana", "Whitfield", Department::Leadership))
        .await
        .unwrap();

    let response = build_router(app.state.clone())
        .oneshot(
            Request::get("/directory/export.csv?department=Sales")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv;charset=utf-8"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d");
    assert_eq!(disposition, format!("attachment; filename=\"team-{today}.csv\""));
    assert!(disposition.ends_with(".csv\""));

    let body = body_text(response).await;
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Full Name,First Name,Last Name,Position"));
    assert!(lines[1].starts_with("John Doe,John,Doe,\"Loan Officer, Senior\",Sales"));
}

#[tokio::test]
async fn export_rejects_unknown_labels() {
    let app = common::spawn().await;
    let response = build_router(app.state.clone())
        .oneshot(
            Request::get("/directory/export.csv?branch=Atlantis")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn headshot_upload_replaces_previous_file() {
    let app = common::spawn().await;
    let teammate = app
        .state
        .data
        .directory
        .create(new_teammate("Jane", "Smith", Department::Operations))
        .await
        .unwrap();
    let router = build_router(app.state.clone());

    let upload = |bytes: &'static [u8]| {
        Request::post(format!("/teammates/{}/headshot?filename=me.png", teammate.id))
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(Body::from(bytes))
            .unwrap()
    };

    let first = router.clone().oneshot(upload(b"first")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first: Value = serde_json::from_str(&body_text(first).await).unwrap();
    let first_url = first["headshotUrl"].as_str().unwrap().to_string();
    assert!(first_url.starts_with(&format!(
        "http://hub.test/files/teammate-headshots/{}/",
        teammate.id
    )));
    let first_key = first_url.trim_start_matches("http://hub.test/files/");
    assert!(app.scratch.join("files").join(first_key).exists());

    // Keys are millisecond timestamps.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let second = router.clone().oneshot(upload(b"second")).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let second: Value = serde_json::from_str(&body_text(second).await).unwrap();
    let second_url = second["headshotUrl"].as_str().unwrap().to_string();
    assert_ne!(second_url, first_url);
    assert!(!app.scratch.join("files").join(first_key).exists());

    let served = router
        .oneshot(
            Request::get(second_url.trim_start_matches("http://hub.test"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(body_text(served).await, "second");

    let profile = app.state.data.directory.get_profile(teammate.id).await.unwrap();
    assert_eq!(profile.teammate.headshot_url.as_deref(), Some(second_url.as_str()));
}

#[tokio::test]
async fn headshot_for_unknown_teammate_is_404() {
    let app = common::spawn().await;
    let response = build_router(app.state.clone())
        .oneshot(
            Request::post(format!("/teammates/{}/headshot?filename=a.png", uuid::Uuid::new_v4()))
                .body(Body::from("x"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn graphql_endpoint_executes_queries() {
    let app = common::spawn().await;
    let response = build_router(app.state.clone())
        .oneshot(
            Request::post("/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"query": "{ health { ok } version }"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["data"]["health"]["ok"], true);
}
