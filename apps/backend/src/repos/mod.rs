//! Data access for the domain layer (generic over ConnectionTrait).

pub mod persons;
pub mod sources;
pub mod stats;
