//! SeaORM adapter for persons.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::entities::persons;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn find_by_guid<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    guid: &str,
) -> Result<Option<persons::Model>, sea_orm::DbErr> {
    persons::Entity::find()
        .filter(persons::Column::Guid.eq(guid))
        .one(conn)
        .await
}

pub async fn create_person<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    guid: &str,
    name: &str,
) -> Result<persons::Model, sea_orm::DbErr> {
    let person_active = persons::ActiveModel {
        id: NotSet,
        guid: Set(guid.to_string()),
        name: Set(name.to_string()),
    };

    person_active.insert(conn).await
}

pub async fn delete_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, sea_orm::DbErr> {
    let res = persons::Entity::delete_many().exec(conn).await?;
    Ok(res.rows_affected)
}
