//! Person repository functions (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;

use crate::adapters::persons_sea as persons_adapter;
use crate::errors::domain::DomainError;

/// Person domain model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: i64,
    pub guid: String,
    pub name: String,
}

pub async fn find_by_guid<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    guid: &str,
) -> Result<Option<Person>, DomainError> {
    let person = persons_adapter::find_by_guid(conn, guid).await?;
    Ok(person.map(Person::from))
}

/// Create a person and return its id.
///
/// Fails with `ConflictKind::UniqueGuid` when the guid is already taken.
pub async fn insert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    guid: &str,
    name: &str,
) -> Result<i64, DomainError> {
    let person = persons_adapter::create_person(conn, guid, name).await?;
    Ok(person.id)
}

/// Remove every person. Stat records must be removed first.
pub async fn delete_all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, DomainError> {
    Ok(persons_adapter::delete_all(conn).await?)
}

impl From<crate::entities::persons::Model> for Person {
    fn from(model: crate::entities::persons::Model) -> Self {
        Self {
            id: model.id,
            guid: model.guid,
            name: model.name,
        }
    }
}
