//! SeaORM adapter for stat records.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, NotSet, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::{databases, persons, stats};

pub mod dto;

pub use dto::{NewStatRecord, ProfileRow, SourcePage, SourceTotalsRow};

pub async fn find_for_pair<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    person_id: i64,
    database_id: i64,
) -> Result<Option<stats::Model>, sea_orm::DbErr> {
    stats::Entity::find()
        .filter(stats::Column::PersonId.eq(person_id))
        .filter(stats::Column::DatabaseId.eq(database_id))
        .one(conn)
        .await
}

pub async fn create_stat<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: NewStatRecord,
) -> Result<stats::Model, sea_orm::DbErr> {
    let stat_active = stats::ActiveModel {
        id: NotSet,
        person_id: Set(dto.person_id),
        database_id: Set(dto.database_id),
        dcount: Set(dto.dcount),
        ccount: Set(dto.ccount),
        hindex: Set(dto.hindex),
        url: Set(dto.url),
        creationtime: Set(time::OffsetDateTime::now_utc()),
    };

    stat_active.insert(conn).await
}

pub async fn delete_for_pair<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    person_id: i64,
    database_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = stats::Entity::delete_many()
        .filter(stats::Column::PersonId.eq(person_id))
        .filter(stats::Column::DatabaseId.eq(database_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

pub async fn delete_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, sea_orm::DbErr> {
    let res = stats::Entity::delete_many().exec(conn).await?;
    Ok(res.rows_affected)
}

/// Page of (person name, hindex, url) for one source.
///
/// Ties on the sort column are broken by `stats.id` so pages never overlap.
pub async fn list_for_source<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    page: SourcePage,
) -> Result<Vec<ProfileRow>, sea_orm::DbErr> {
    stats::Entity::find()
        .select_only()
        .column_as(persons::Column::Name, "name")
        .column_as(stats::Column::Hindex, "hindex")
        .column_as(stats::Column::Url, "url")
        .join(JoinType::InnerJoin, stats::Relation::Person.def())
        .filter(stats::Column::DatabaseId.eq(page.database_id))
        .order_by(page.order_by, page.order)
        .order_by_asc(stats::Column::Id)
        .offset(page.offset)
        .limit(page.limit)
        .into_model::<ProfileRow>()
        .all(conn)
        .await
}

/// Sums and record count per source name, for sources with at least one record.
pub async fn totals_by_source<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<SourceTotalsRow>, sea_orm::DbErr> {
    stats::Entity::find()
        .select_only()
        .column_as(databases::Column::Name, "database")
        .column_as(
            Expr::col((stats::Entity, stats::Column::Dcount)).sum(),
            "sum_dcount",
        )
        .column_as(
            Expr::col((stats::Entity, stats::Column::Ccount)).sum(),
            "sum_ccount",
        )
        .column_as(
            Expr::col((stats::Entity, stats::Column::Hindex)).sum(),
            "sum_hindex",
        )
        .column_as(Expr::col((stats::Entity, stats::Column::Id)).count(), "records")
        .join(JoinType::InnerJoin, stats::Relation::Database.def())
        .group_by(databases::Column::Name)
        .order_by_asc(databases::Column::Name)
        .into_model::<SourceTotalsRow>()
        .all(conn)
        .await
}
