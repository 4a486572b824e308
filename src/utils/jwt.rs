use chrono::Utc;
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error as JwtError,
};
use serde::{Deserialize, Serialize};

pub const ADMIN_SUBJECT: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_secs: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

// function for generate token jwt
pub fn generate_token(subject: &str, config: &JwtConfig) -> Result<String, JwtError> {
    let exp = (Utc::now().timestamp() + config.expiration_secs).max(0) as usize;

    encode(
        &Header::default(),
        &Claims {
            sub: subject.to_string(),
            exp,
        },
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

// function for verify token jwt
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, JwtError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}
