use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use scistats::config::db::{db_url, DbKind, PoolSettings};
use scistats::infra::db::bootstrap_db;
use tracing::info;

mod import;

#[derive(Clone, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
}

#[derive(Parser)]
#[command(name = "scistats-import")]
#[command(about = "Load bibliometric records from a CSV file")]
struct Args {
    /// CSV file with header guid,name,database,dcount,ccount,hindex,url
    file: PathBuf,

    /// Database type
    #[arg(short, long, value_enum, default_value = "sqlite-file")]
    db: Db,

    /// Add to the existing data instead of replacing it
    #[arg(long)]
    keep_existing: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("scistats_import=info,scistats=info,migration=warn,sqlx=warn")
        .init();

    let args = Args::parse();

    let file = match File::open(&args.file) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open {}: {e}", args.file.display());
            std::process::exit(1);
        }
    };
    let rows = match import::read_rows(BufReader::new(file)) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Import aborted: {e}");
            std::process::exit(1);
        }
    };
    info!(rows = rows.len(), file = %args.file.display(), "import=validated");

    let db_kind = match args.db {
        Db::Postgres => DbKind::Postgres,
        Db::SqliteFile => DbKind::SqliteFile,
    };
    let db = match connect(db_kind).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Cannot open store: {e}");
            std::process::exit(1);
        }
    };

    match import::run(&db, &rows, args.keep_existing).await {
        Ok(summary) => info!(
            rows = summary.rows,
            persons_created = summary.persons_created,
            sources_created = summary.sources_created,
            keep_existing = args.keep_existing,
            "import=done"
        ),
        Err(e) => {
            eprintln!("Import failed: {e}");
            std::process::exit(1);
        }
    }
}

async fn connect(db_kind: DbKind) -> Result<sea_orm::DatabaseConnection, scistats::AppError> {
    let url = db_url(db_kind)?;
    let settings = PoolSettings::from_env()?;
    bootstrap_db(db_kind, &url, &settings).await
}
