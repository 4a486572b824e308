pub mod application;
pub mod catalog;
pub mod filter;
