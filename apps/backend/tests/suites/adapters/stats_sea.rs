use std::time::Duration;

use scistats::db::txn::with_txn;
use scistats::error::AppError;
use scistats::errors::domain::{ConflictKind, DomainError};
use scistats::repos::stats::{
    self, NewStatRecord, ProfileListQuery, SortField, SortOrder, SourceStats, MAX_PAGE,
};
use time::OffsetDateTime;

use crate::support::build_test_state;
use crate::support::factory::{create_test_person, create_test_record, source_id};

fn names(rows: &[stats::ProfileSummary]) -> Vec<&str> {
    rows.iter().map(|r| r.name.as_str()).collect()
}

fn query(page: u64, sort: SortField, order: SortOrder) -> ProfileListQuery {
    ProfileListQuery { page, sort, order }
}

#[tokio::test]
async fn test_insert_then_find_for_pair() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let acm = source_id(txn, "ACM").await?;
            let (person_id, _) = create_test_person(txn, "Ada").await?;
            let before = OffsetDateTime::now_utc();

            let id = stats::insert(
                txn,
                NewStatRecord::new(person_id, acm, "https://example.com/ada")
                    .with_counts(5, 10, 3),
            )
            .await?;

            let record = stats::find(txn, person_id, acm)
                .await?
                .expect("record should exist");
            assert_eq!(record.id, id);
            assert_eq!((record.dcount, record.ccount, record.hindex), (5, 10, 3));
            assert_eq!(record.url, "https://example.com/ada");
            assert!(record.created_at >= before - Duration::from_secs(1));
            assert!(record.created_at <= OffsetDateTime::now_utc());

            Ok::<_, AppError>(())
        })
    })
    .await?;

    Ok(())
}

#[tokio::test]
async fn test_second_record_for_pair_conflicts() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let acm = source_id(txn, "ACM").await?;
            let (person_id, _) = create_test_person(txn, "Ada").await?;
            let record = NewStatRecord::new(person_id, acm, "https://example.com/ada");

            stats::insert(txn, record.clone()).await?;
            let err = stats::insert(txn, record)
                .await
                .expect_err("pair already has a record");
            assert!(
                matches!(err, DomainError::Conflict(ConflictKind::UniquePersonSource, _)),
                "unexpected error: {err:?}"
            );

            Ok::<_, AppError>(())
        })
    })
    .await?;

    Ok(())
}

#[tokio::test]
async fn test_record_for_missing_person_is_foreign_key_conflict() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let acm = source_id(txn, "ACM").await?;

            let err = stats::insert(
                txn,
                NewStatRecord::new(987_654, acm, "https://example.com/nobody"),
            )
            .await
            .expect_err("person does not exist");
            assert!(
                matches!(err, DomainError::Conflict(ConflictKind::ForeignKey, _)),
                "unexpected error: {err:?}"
            );

            Ok::<_, AppError>(())
        })
    })
    .await?;

    Ok(())
}

#[tokio::test]
async fn test_replace_swaps_record_for_pair() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let acm = source_id(txn, "ACM").await?;
            let wos = source_id(txn, "WoS").await?;
            let (person_id, _) = create_test_person(txn, "Ada").await?;

            let first = stats::replace(
                txn,
                NewStatRecord::new(person_id, acm, "https://example.com/v1").with_counts(1, 2, 3),
            )
            .await?;
            let other = stats::replace(
                txn,
                NewStatRecord::new(person_id, wos, "https://example.com/wos").with_counts(7, 8, 9),
            )
            .await?;
            let second = stats::replace(
                txn,
                NewStatRecord::new(person_id, acm, "https://example.com/v2").with_counts(4, 5, 6),
            )
            .await?;
            assert_ne!(first, second);

            let record = stats::find(txn, person_id, acm)
                .await?
                .expect("replacement should exist");
            assert_eq!(record.id, second);
            assert_eq!((record.dcount, record.ccount, record.hindex), (4, 5, 6));
            assert_eq!(record.url, "https://example.com/v2");

            // other sources are untouched
            let untouched = stats::find(txn, person_id, wos)
                .await?
                .expect("WoS record should survive");
            assert_eq!(untouched.id, other);

            Ok::<_, AppError>(())
        })
    })
    .await?;

    Ok(())
}

#[tokio::test]
async fn test_delete_absent_pair_is_noop() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let acm = source_id(txn, "ACM").await?;
            let (person_id, _) = create_test_person(txn, "Ada").await?;

            stats::delete(txn, person_id, acm).await?;
            assert!(stats::find(txn, person_id, acm).await?.is_none());

            Ok::<_, AppError>(())
        })
    })
    .await?;

    Ok(())
}

#[tokio::test]
async fn test_list_pages_through_source() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let acm = source_id(txn, "ACM").await?;
            let scopus = source_id(txn, "Scopus").await?;

            // inserted out of order so the listing has to sort
            for h in (0..25).rev() {
                create_test_record(txn, acm, &format!("P{h:02}"), h).await?;
            }
            create_test_record(txn, scopus, "Elsewhere", 100).await?;

            let asc = |page| query(page, SortField::Hindex, SortOrder::Asc);

            let first = stats::list_for_source(txn, acm, asc(0)).await?;
            assert_eq!(first.len(), 10);
            assert_eq!(first[0].name, "P00");
            assert_eq!(first[9].name, "P09");

            let last = stats::list_for_source(txn, acm, asc(2)).await?;
            assert_eq!(
                names(&last),
                vec!["P20", "P21", "P22", "P23", "P24"]
            );

            let past_end = stats::list_for_source(txn, acm, asc(3)).await?;
            assert!(past_end.is_empty());

            let desc = stats::list_for_source(
                txn,
                acm,
                query(0, SortField::Hindex, SortOrder::Desc),
            )
            .await?;
            assert_eq!(desc[0].name, "P24");
            assert_eq!(desc[0].hindex, 24);
            assert_eq!(desc[0].url, "https://example.com/p24");

            Ok::<_, AppError>(())
        })
    })
    .await?;

    Ok(())
}

#[tokio::test]
async fn test_list_far_pages_are_empty() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = state.db();
    let acm = source_id(db, "ACM").await?;
    create_test_record(db, acm, "Ada", 3).await?;

    for page in [MAX_PAGE, MAX_PAGE + 1, u64::MAX] {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let rows =
                stats::list_for_source(db, acm, query(page, SortField::Hindex, order)).await?;
            assert!(rows.is_empty(), "page {page}");
        }
    }

    Ok(())
}

#[tokio::test]
async fn test_list_ties_keep_insertion_order() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let acm = source_id(txn, "ACM").await?;
            for name in ["First", "Second", "Third"] {
                create_test_record(txn, acm, name, 5).await?;
            }

            for order in [SortOrder::Asc, SortOrder::Desc] {
                let rows =
                    stats::list_for_source(txn, acm, query(0, SortField::Hindex, order)).await?;
                assert_eq!(names(&rows), vec!["First", "Second", "Third"]);
            }

            Ok::<_, AppError>(())
        })
    })
    .await?;

    Ok(())
}

#[tokio::test]
async fn test_list_by_creation_time_follows_latest_submission() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = state.db();
    let acm = source_id(db, "ACM").await?;

    let mut people = Vec::new();
    for name in ["Ada", "Grace", "Edsger"] {
        let (person_id, _) = create_test_person(db, name).await?;
        stats::insert(db, NewStatRecord::new(person_id, acm, "https://example.com/x")).await?;
        people.push(person_id);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let by_time = |order| query(0, SortField::CreationTime, order);
    let asc = stats::list_for_source(db, acm, by_time(SortOrder::Asc)).await?;
    assert_eq!(names(&asc), vec!["Ada", "Grace", "Edsger"]);
    let desc = stats::list_for_source(db, acm, by_time(SortOrder::Desc)).await?;
    assert_eq!(names(&desc), vec!["Edsger", "Grace", "Ada"]);

    // a replacement is stamped anew and moves to the end
    stats::replace(db, NewStatRecord::new(people[0], acm, "https://example.com/y")).await?;
    let asc = stats::list_for_source(db, acm, by_time(SortOrder::Asc)).await?;
    assert_eq!(names(&asc), vec!["Grace", "Edsger", "Ada"]);

    Ok(())
}

#[tokio::test]
async fn test_aggregate_sums_and_truncates_average() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let acm = source_id(txn, "ACM").await?;
            let wos = source_id(txn, "WoS").await?;

            for (name, d, c, h) in [("Ada", 5, 10, 3), ("Grace", 2, 4, 4)] {
                let (person_id, _) = create_test_person(txn, name).await?;
                stats::insert(
                    txn,
                    NewStatRecord::new(person_id, acm, "https://example.com/a").with_counts(d, c, h),
                )
                .await?;
            }
            let (person_id, _) = create_test_person(txn, "Edsger").await?;
            stats::insert(
                txn,
                NewStatRecord::new(person_id, wos, "https://example.com/w").with_counts(1, 1, 9),
            )
            .await?;

            let totals = stats::aggregate_by_source(txn).await?;
            // Scopus has no records and is left out
            assert_eq!(
                totals,
                vec![
                    SourceStats {
                        database: "ACM".to_string(),
                        sum_dcount: 7,
                        sum_ccount: 14,
                        avg_hindex: 3,
                    },
                    SourceStats {
                        database: "WoS".to_string(),
                        sum_dcount: 1,
                        sum_ccount: 1,
                        avg_hindex: 9,
                    },
                ]
            );

            Ok::<_, AppError>(())
        })
    })
    .await?;

    Ok(())
}

#[tokio::test]
async fn test_aggregate_of_empty_store_is_empty() -> Result<(), AppError> {
    let state = build_test_state().await?;

    assert!(stats::aggregate_by_source(state.db()).await?.is_empty());

    Ok(())
}
