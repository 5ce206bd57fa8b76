//! Profile submission and lookup.
//!
//! Every function runs against the caller's connection; routes hand in the
//! request transaction so a submission either fully persists or not at all.

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::repos::stats::{NewStatRecord, ProfileListQuery, ProfileSummary};
use crate::repos::{persons, sources, stats};
use crate::state::source_catalog::SourceCatalog;
use crate::validation;

/// A validated submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub guid: String,
    pub name: String,
    pub source: String,
    pub dcount: i32,
    pub ccount: i32,
    pub hindex: i32,
    pub url: String,
}

/// Optional counters a caller may ask for when fetching a profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileFields {
    pub dcount: bool,
    pub ccount: bool,
}

/// Single profile as returned to clients; unrequested counters are `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileView {
    pub name: String,
    pub hindex: i32,
    pub url: String,
    pub dcount: Option<i32>,
    pub ccount: Option<i32>,
}

/// Resolve a source that passed catalog validation.
///
/// The catalog is loaded from this table, so a miss means the store changed
/// underneath the running process.
async fn resolve_source<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    source: &str,
) -> Result<i64, DomainError> {
    sources::find_id_by_name(conn, source).await?.ok_or_else(|| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("Data source '{source}' is missing from the store"),
        )
    })
}

/// Upsert stats for (guid, source) and return the new record id.
///
/// An unseen guid creates the person with the submitted name; a known guid
/// keeps its stored name. Any previous record for the pair is replaced.
pub async fn submit<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile: &NewProfile,
) -> Result<i64, DomainError> {
    let database_id = resolve_source(conn, &profile.source).await?;

    let person_id = match persons::find_by_guid(conn, &profile.guid).await? {
        Some(person) => person.id,
        None => {
            let id = persons::insert(conn, &profile.guid, &profile.name).await?;
            debug!(guid = %Redacted(&profile.guid), person_id = id, "person created");
            id
        }
    };

    let record = NewStatRecord::new(person_id, database_id, profile.url.clone()).with_counts(
        profile.dcount,
        profile.ccount,
        profile.hindex,
    );
    let stat_id = stats::replace(conn, record).await?;

    info!(
        guid = %Redacted(&profile.guid),
        source = %profile.source,
        stat_id,
        "profile stats stored"
    );
    Ok(stat_id)
}

/// Fetch the record for (guid, source).
///
/// The person is looked up first, so an unknown guid is reported as such
/// whatever the source. A known guid with a source outside `catalog` is a
/// validation error.
pub async fn fetch<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    catalog: &SourceCatalog,
    guid: &str,
    source: &str,
    fields: ProfileFields,
) -> Result<ProfileView, DomainError> {
    let person = persons::find_by_guid(conn, guid)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Person, "Unknown person GUID"))?;
    validation::source(catalog, source)?;

    let pair_missing =
        || DomainError::not_found(NotFoundKind::StatRecord, "Record not found for pair [GUID, DB]");

    let database_id = sources::find_id_by_name(conn, source)
        .await?
        .ok_or_else(pair_missing)?;
    let record = stats::find(conn, person.id, database_id)
        .await?
        .ok_or_else(pair_missing)?;

    Ok(ProfileView {
        name: person.name,
        hindex: record.hindex,
        url: record.url,
        dcount: fields.dcount.then_some(record.dcount),
        ccount: fields.ccount.then_some(record.ccount),
    })
}

/// One page of profiles recorded for `source`.
pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    source: &str,
    query: ProfileListQuery,
) -> Result<Vec<ProfileSummary>, DomainError> {
    let database_id = resolve_source(conn, source).await?;
    stats::list_for_source(conn, database_id, query).await
}
