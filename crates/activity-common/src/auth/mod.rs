//! Authentication utilities

mod jwt;
mod password;

pub use jwt::{Claims, JwtService, TokenPair, TokenType};
pub use password::{
    hash_password, validate_password_length, verify_password, PasswordService, PASSWORD_MAX_LEN,
    PASSWORD_MIN_LEN,
};
