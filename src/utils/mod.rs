pub mod attachment;
pub mod identifier;
pub mod jwt;
pub mod password;
pub mod response;
pub mod validation;
