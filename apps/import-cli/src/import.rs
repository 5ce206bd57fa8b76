//! CSV loading into the stats store.
//!
//! Rows are read and validated up front; the store is only touched once the
//! whole file is known to be good, and then inside a single transaction.

use std::io::Read;

use scistats::errors::domain::DomainError;
use scistats::repos::stats::NewStatRecord;
use scistats::repos::{persons, sources, stats};
use scistats::services::profiles::NewProfile;
use scistats::{validation, AppError};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("row {row}: unreadable record: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("row {row}: {detail}")]
    InvalidRow { row: usize, detail: String },
    #[error(transparent)]
    Store(#[from] AppError),
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    guid: String,
    name: String,
    database: String,
    dcount: i64,
    ccount: i64,
    hindex: i64,
    url: String,
}

impl CsvRow {
    fn validate(self) -> Result<NewProfile, DomainError> {
        validation::guid(&self.guid)?;
        validation::name(&self.name)?;
        if self.database.is_empty() {
            return Err(DomainError::validation("database must not be empty"));
        }
        let dcount = validation::count("dcount", self.dcount)?;
        let ccount = validation::count("ccount", self.ccount)?;
        let hindex = validation::count("hindex", self.hindex)?;
        validation::url(&self.url)?;

        Ok(NewProfile {
            guid: self.guid,
            name: self.name,
            source: self.database,
            dcount,
            ccount,
            hindex,
            url: self.url,
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows: usize,
    pub persons_created: usize,
    pub sources_created: usize,
}

/// Parse and validate every row. Row numbers are 1-based and skip the header.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<NewProfile>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, record) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = idx + 1;
        let record = record.map_err(|source| ImportError::Csv { row, source })?;
        let profile = record.validate().map_err(|e| ImportError::InvalidRow {
            row,
            detail: e.to_string(),
        })?;
        rows.push(profile);
    }
    Ok(rows)
}

/// Remove all stats, persons and sources, in foreign-key order.
async fn wipe<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<(), DomainError> {
    let stats_removed = stats::delete_all(conn).await?;
    let persons_removed = persons::delete_all(conn).await?;
    let sources_removed = sources::delete_all(conn).await?;
    info!(stats_removed, persons_removed, sources_removed, "import=wiped");
    Ok(())
}

async fn load<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    rows: &[NewProfile],
) -> Result<ImportSummary, DomainError> {
    let mut summary = ImportSummary::default();

    for profile in rows {
        let database_id = match sources::find_id_by_name(conn, &profile.source).await? {
            Some(id) => id,
            None => {
                summary.sources_created += 1;
                sources::insert(conn, &profile.source).await?
            }
        };
        // a guid seen earlier in the file keeps its first name
        let person_id = match persons::find_by_guid(conn, &profile.guid).await? {
            Some(person) => person.id,
            None => {
                summary.persons_created += 1;
                persons::insert(conn, &profile.guid, &profile.name).await?
            }
        };

        let record = NewStatRecord::new(person_id, database_id, profile.url.clone()).with_counts(
            profile.dcount,
            profile.ccount,
            profile.hindex,
        );
        stats::replace(conn, record).await?;
        summary.rows += 1;
    }

    Ok(summary)
}

/// Load `rows` in one transaction, clearing the store first unless `keep_existing`.
pub async fn run(
    db: &DatabaseConnection,
    rows: &[NewProfile],
    keep_existing: bool,
) -> Result<ImportSummary, ImportError> {
    let txn = db.begin().await.map_err(AppError::from)?;

    let result = async {
        if !keep_existing {
            wipe(&txn).await?;
        }
        load(&txn, rows).await
    }
    .await;

    match result {
        Ok(summary) => {
            txn.commit().await.map_err(AppError::from)?;
            Ok(summary)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            Err(AppError::from(err).into())
        }
    }
}
