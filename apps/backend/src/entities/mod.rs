pub mod databases;
pub mod persons;
pub mod stats;

pub use databases::Entity as Databases;
pub use databases::Model as Database;
pub use persons::Entity as Persons;
pub use persons::Model as Person;
pub use stats::Entity as Stats;
pub use stats::Model as Stat;
