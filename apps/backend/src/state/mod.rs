pub mod app_state;
pub mod source_catalog;
