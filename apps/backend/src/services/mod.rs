pub mod profiles;
pub mod statistics;
