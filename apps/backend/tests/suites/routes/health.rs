use actix_web::http::StatusCode;
use actix_web::test;
use scistats::error::AppError;
use serde_json::Value;

use crate::support::submission::get;
use crate::support::{build_test_state, create_test_app, SOURCES};

#[actix_web::test]
async fn test_health_reports_store_and_catalog() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?).await;

    let resp = test::call_service(&app, get("/health", &[])).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert!(body.get("db_error").is_none());
    assert_eq!(body["sources"], SOURCES.len());
    assert_ne!(body["migrations"], "no_migrations");
    assert!(body["time"].is_string());

    Ok(())
}
