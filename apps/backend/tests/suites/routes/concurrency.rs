use actix_web::http::StatusCode;
use actix_web::test;
use futures_util::future::join_all;
use scistats::error::AppError;
use scistats::repos::stats::ProfileSummary;
use scistats::routes::profiles::SubmitProfileResponse;
use scistats_test_support::unique::unique_guid;

use crate::support::submission::get;
use crate::support::{build_file_test_state, build_test_state, create_test_app, Submission};

#[actix_web::test]
async fn test_racing_submissions_on_file_store_leave_one_record() -> Result<(), AppError> {
    let (_dir, state) = build_file_test_state().await?;
    let app = create_test_app(state).await;
    let guid = unique_guid();

    let requests: Vec<_> = (1..=8)
        .map(|i| {
            Submission::new(&guid, "ACM")
                .with_counts(i, i, i)
                .request()
        })
        .collect();
    let responses = join_all(requests.into_iter().map(|req| test::call_service(&app, req))).await;

    let mut ids = Vec::new();
    for resp in responses {
        assert_eq!(resp.status(), StatusCode::OK, "every racer must succeed");
        let body: SubmitProfileResponse = test::read_body_json(resp).await;
        ids.push(body.internal_id);
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 8, "every submission stores its own record");

    let listing: Vec<ProfileSummary> =
        test::call_and_read_body_json(&app, get("/all_profiles", &[("db", "ACM")])).await;
    assert_eq!(listing.len(), 1, "one record per (guid, source)");
    assert_eq!(listing[0].name, "Ada");

    Ok(())
}

#[actix_web::test]
async fn test_racing_new_people_on_file_store_all_land() -> Result<(), AppError> {
    let (_dir, state) = build_file_test_state().await?;
    let app = create_test_app(state).await;

    let requests: Vec<_> = (0..6)
        .map(|i| {
            Submission::new(unique_guid(), "WoS")
                .with_name(format!("Person {i}"))
                .request()
        })
        .collect();
    let responses = join_all(requests.into_iter().map(|req| test::call_service(&app, req))).await;
    for resp in responses {
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let listing: Vec<ProfileSummary> =
        test::call_and_read_body_json(&app, get("/all_profiles", &[("db", "WoS")])).await;
    assert_eq!(listing.len(), 6);

    Ok(())
}

#[actix_web::test]
async fn test_queued_submissions_on_memory_store_leave_one_record() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?).await;
    let guid = unique_guid();

    let requests: Vec<_> = (1..=4)
        .map(|i| Submission::new(&guid, "Scopus").with_counts(i, i, i).request())
        .collect();
    let responses = join_all(requests.into_iter().map(|req| test::call_service(&app, req))).await;
    for resp in responses {
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let listing: Vec<ProfileSummary> =
        test::call_and_read_body_json(&app, get("/all_profiles", &[("db", "Scopus")])).await;
    assert_eq!(listing.len(), 1);

    Ok(())
}
