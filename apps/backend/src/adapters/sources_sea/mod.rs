//! SeaORM adapter for data sources (`databases` table).

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::databases;

pub async fn find_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<Option<databases::Model>, sea_orm::DbErr> {
    databases::Entity::find()
        .filter(databases::Column::Name.eq(name))
        .one(conn)
        .await
}

pub async fn list_names<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<String>, sea_orm::DbErr> {
    databases::Entity::find()
        .select_only()
        .column(databases::Column::Name)
        .order_by_asc(databases::Column::Name)
        .into_tuple::<String>()
        .all(conn)
        .await
}

pub async fn create_source<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<databases::Model, sea_orm::DbErr> {
    let source_active = databases::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
    };

    source_active.insert(conn).await
}

pub async fn delete_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, sea_orm::DbErr> {
    let res = databases::Entity::delete_many().exec(conn).await?;
    Ok(res.rows_affected)
}
