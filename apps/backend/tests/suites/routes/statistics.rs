use actix_web::http::StatusCode;
use actix_web::test;
use scistats::error::AppError;
use scistats_test_support::unique::unique_guid;
use serde_json::{json, Value};

use crate::support::submission::get;
use crate::support::{build_test_state, create_test_app, Submission};

#[actix_web::test]
async fn test_statistics_empty_store() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?).await;

    let resp = test::call_service(&app, get("/statistics", &[])).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([]));

    Ok(())
}

#[actix_web::test]
async fn test_statistics_per_source() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?).await;
    let submissions = [
        Submission::new(unique_guid(), "WoS").with_counts(1, 1, 9),
        Submission::new(unique_guid(), "ACM").with_counts(5, 10, 3),
        Submission::new(unique_guid(), "ACM")
            .with_name("Grace")
            .with_counts(2, 4, 4),
    ];
    for submission in &submissions {
        let resp = test::call_service(&app, submission.request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let body: Value = test::call_and_read_body_json(&app, get("/statistics", &[])).await;
    assert_eq!(
        body,
        json!([
            {"database": "ACM", "sum_dcount": 7, "sum_ccount": 14, "avg_hindex": 3},
            {"database": "WoS", "sum_dcount": 1, "sum_ccount": 1, "avg_hindex": 9}
        ])
    );

    Ok(())
}
