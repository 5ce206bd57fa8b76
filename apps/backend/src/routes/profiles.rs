use std::time::Duration;

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, OneOrMany};
use tracing::warn;

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::extractors::ValidatedQuery;
use crate::repos::stats::{ProfileListQuery, SortField, SortOrder};
use crate::services::profiles::{self, NewProfile, ProfileFields};
use crate::state::app_state::AppState;
use crate::state::source_catalog::SourceCatalog;
use crate::validation;

/// A submission that loses a race is rerun this many times in total.
const SUBMIT_ATTEMPTS: u32 = 10;
/// Linear backoff step between reruns
const SUBMIT_BACKOFF_MS: u64 = 5;

#[serde_as]
#[derive(Debug, Deserialize)]
pub struct SubmitProfileParams {
    pub guid: String,
    pub name: String,
    pub db: String,
    #[serde_as(as = "DisplayFromStr")]
    pub dcount: i64,
    #[serde_as(as = "DisplayFromStr")]
    pub ccount: i64,
    #[serde_as(as = "DisplayFromStr")]
    pub hindex: i64,
    pub url: String,
}

impl SubmitProfileParams {
    fn validate(self, catalog: &SourceCatalog) -> Result<NewProfile, DomainError> {
        validation::guid(&self.guid)?;
        validation::name(&self.name)?;
        validation::source(catalog, &self.db)?;
        let dcount = validation::count("dcount", self.dcount)?;
        let ccount = validation::count("ccount", self.ccount)?;
        let hindex = validation::count("hindex", self.hindex)?;
        validation::url(&self.url)?;

        Ok(NewProfile {
            guid: self.guid,
            name: self.name,
            source: self.db,
            dcount,
            ccount,
            hindex,
            url: self.url,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitProfileResponse {
    pub internal_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileField {
    Dcount,
    Ccount,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub struct FetchProfileParams {
    pub guid: String,
    pub db: String,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub fields: Vec<ProfileField>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub struct ListProfilesParams {
    pub db: String,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub sfield: SortField,
    #[serde(default)]
    pub sorder: SortOrder,
}

async fn submit_profile(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    params: ValidatedQuery<SubmitProfileParams>,
) -> Result<HttpResponse, AppError> {
    let profile = params.into_inner().validate(app_state.sources())?;

    let mut attempt = 1;
    let internal_id = loop {
        let profile = profile.clone();
        let result = with_txn(Some(&req), &app_state, move |txn| {
            Box::pin(async move {
                profiles::submit(txn, &profile)
                    .await
                    .map_err(AppError::from)
            })
        })
        .await;

        match result {
            // A concurrent submission holds the write lock or committed the
            // same guid or pair first; a fresh transaction sees its rows.
            Err(err) if err.is_retryable() && attempt < SUBMIT_ATTEMPTS => {
                warn!(attempt, error = %err, "profile submission raced, retrying");
                tokio::time::sleep(Duration::from_millis(SUBMIT_BACKOFF_MS * u64::from(attempt)))
                    .await;
                attempt += 1;
            }
            other => break other?,
        }
    };

    Ok(HttpResponse::Ok().json(SubmitProfileResponse { internal_id }))
}

async fn fetch_profile(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    params: ValidatedQuery<FetchProfileParams>,
) -> Result<HttpResponse, AppError> {
    let FetchProfileParams { guid, db, fields } = params.into_inner();
    validation::guid(&guid)?;

    let fields = ProfileFields {
        dcount: fields.contains(&ProfileField::Dcount),
        ccount: fields.contains(&ProfileField::Ccount),
    };

    let catalog = app_state.sources.clone();
    let view = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            profiles::fetch(txn, &catalog, &guid, &db, fields)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(view))
}

async fn list_profiles(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    params: ValidatedQuery<ListProfilesParams>,
) -> Result<HttpResponse, AppError> {
    let ListProfilesParams {
        db,
        page,
        sfield,
        sorder,
    } = params.into_inner();
    validation::source(app_state.sources(), &db)?;
    let query = ProfileListQuery {
        page: validation::page(page.unwrap_or(0))?,
        sort: sfield,
        order: sorder,
    };

    let items = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            profiles::list(txn, &db, query)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(items))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        super::resource("/profile")
            .route(web::post().to(submit_profile))
            .route(web::get().to(fetch_profile)),
    )
    .service(super::resource("/all_profiles").route(web::get().to(list_profiles)));
}
