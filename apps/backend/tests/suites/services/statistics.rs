use scistats::error::AppError;
use scistats::repos::stats::SourceStats;
use scistats::services::{profiles, statistics};
use scistats_test_support::unique::unique_guid;

use crate::support::{build_test_state, Submission};

#[tokio::test]
async fn test_statistics_reflect_latest_submissions() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = state.db();
    let ada = unique_guid();

    profiles::submit(db, &Submission::new(&ada, "ACM").to_new_profile()).await?;
    profiles::submit(
        db,
        &Submission::new(unique_guid(), "ACM")
            .with_name("Grace")
            .with_counts(2, 4, 4)
            .to_new_profile(),
    )
    .await?;
    // replaced values must not be double counted
    profiles::submit(
        db,
        &Submission::new(&ada, "ACM")
            .with_counts(10, 20, 6)
            .to_new_profile(),
    )
    .await?;

    let totals = statistics::by_source(db).await?;
    assert_eq!(
        totals,
        vec![SourceStats {
            database: "ACM".to_string(),
            sum_dcount: 12,
            sum_ccount: 24,
            avg_hindex: 5,
        }]
    );

    Ok(())
}

#[tokio::test]
async fn test_statistics_empty_without_records() -> Result<(), AppError> {
    let state = build_test_state().await?;

    assert!(statistics::by_source(state.db()).await?.is_empty());

    Ok(())
}
