pub mod application_schema;
pub mod auth_schema;
pub mod catalog_schema;
