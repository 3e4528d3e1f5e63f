//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id, zeroized clear text)
//! - Signed bearer token codec (HMAC-SHA256 claims)
//! - Cookie management
//! - Rate limiting infrastructure
//! - Small cryptographic utilities

pub mod cookie;
pub mod crypto;
pub mod net;
pub mod password;
pub mod rate_limit;
pub mod token;
