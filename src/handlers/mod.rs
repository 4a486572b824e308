pub mod admin_handler;
pub mod application_handler;
pub mod catalog_handler;

#[path = "auth_handler/login_handler.rs"]
pub mod login_handler;

#[cfg(test)]
pub(crate) mod test_support;
