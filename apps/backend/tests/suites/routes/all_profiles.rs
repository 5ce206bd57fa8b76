use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test;
use scistats::error::AppError;
use scistats::repos::stats::{ProfileSummary, MAX_PAGE};
use scistats_test_support::error_body::assert_error_body;
use scistats_test_support::unique::unique_guid;

use crate::support::submission::get;
use crate::support::{build_test_state, create_test_app, Submission};

fn names(rows: &[ProfileSummary]) -> Vec<&str> {
    rows.iter().map(|r| r.name.as_str()).collect()
}

#[actix_web::test]
async fn test_pages_hold_ten_entries() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?).await;
    for h in 0..25 {
        let submission = Submission::new(unique_guid(), "ACM")
            .with_name(format!("P{h:02}"))
            .with_counts(1, 1, h);
        test::call_service(&app, submission.request()).await;
    }

    let page0: Vec<ProfileSummary> =
        test::call_and_read_body_json(&app, get("/all_profiles", &[("db", "ACM")])).await;
    assert_eq!(page0.len(), 10);
    assert_eq!(page0[0].name, "P00");

    let page2: Vec<ProfileSummary> = test::call_and_read_body_json(
        &app,
        get("/all_profiles", &[("db", "ACM"), ("page", "2")]),
    )
    .await;
    assert_eq!(names(&page2), vec!["P20", "P21", "P22", "P23", "P24"]);

    let page3: Vec<ProfileSummary> = test::call_and_read_body_json(
        &app,
        get("/all_profiles", &[("db", "ACM"), ("page", "3")]),
    )
    .await;
    assert!(page3.is_empty());

    Ok(())
}

#[actix_web::test]
async fn test_sort_by_hindex_desc() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?).await;
    for (name, h) in [("Ada", 3), ("Grace", 7), ("Edsger", 5)] {
        let submission = Submission::new(unique_guid(), "WoS")
            .with_name(name)
            .with_counts(1, 1, h);
        test::call_service(&app, submission.request()).await;
    }

    let rows: Vec<ProfileSummary> = test::call_and_read_body_json(
        &app,
        get(
            "/all_profiles",
            &[("db", "WoS"), ("sfield", "hindex"), ("sorder", "desc")],
        ),
    )
    .await;
    assert_eq!(names(&rows), vec!["Grace", "Edsger", "Ada"]);
    assert_eq!(rows[0].hindex, 7);

    Ok(())
}

#[actix_web::test]
async fn test_sort_by_creation_time() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?).await;
    for name in ["Ada", "Grace", "Edsger"] {
        test::call_service(
            &app,
            Submission::new(unique_guid(), "Scopus").with_name(name).request(),
        )
        .await;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let rows: Vec<ProfileSummary> = test::call_and_read_body_json(
        &app,
        get(
            "/all_profiles",
            &[("db", "Scopus"), ("sfield", "creation_time"), ("sorder", "desc")],
        ),
    )
    .await;
    assert_eq!(names(&rows), vec!["Edsger", "Grace", "Ada"]);

    Ok(())
}

#[actix_web::test]
async fn test_known_source_without_records_is_empty() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?).await;

    let resp = test::call_service(&app, get("/all_profiles", &[("db", "ACM")])).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let rows: Vec<ProfileSummary> = test::read_body_json(resp).await;
    assert!(rows.is_empty());

    Ok(())
}

#[actix_web::test]
async fn test_bad_listing_params_are_validation_errors() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?).await;

    let bad: [&[(&str, &str)]; 7] = [
        &[],
        &[("db", "IEEE")],
        &[("db", "ACM"), ("page", "-1")],
        &[("db", "ACM"), ("page", "first")],
        &[("db", "ACM"), ("page", "1000000000000000000")],
        &[("db", "ACM"), ("sfield", "name")],
        &[("db", "ACM"), ("sorder", "up")],
    ];
    for params in bad {
        let resp = test::call_service(&app, get("/all_profiles", params)).await;
        assert_error_body(resp, 1, "ERR_VALIDATION").await;
    }

    Ok(())
}

#[actix_web::test]
async fn test_page_beyond_offset_range_is_validation_error() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?).await;
    test::call_service(&app, Submission::new(unique_guid(), "ACM").request()).await;

    let resp = test::call_service(
        &app,
        get("/all_profiles", &[("db", "ACM"), ("page", "1000000000000000000")]),
    )
    .await;
    let body = assert_error_body(resp, 1, "ERR_VALIDATION").await;
    assert!(body.error_text.starts_with("page must be at most"));

    // the last addressable page is accepted and simply empty
    let last = MAX_PAGE.to_string();
    let rows: Vec<ProfileSummary> = test::call_and_read_body_json(
        &app,
        get("/all_profiles", &[("db", "ACM"), ("page", last.as_str())]),
    )
    .await;
    assert!(rows.is_empty());

    Ok(())
}
