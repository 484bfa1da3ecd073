//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, SHA-256, constant-time comparison)
//! - Password credentials (salted Argon2id derivation, `key.salt` encoding)
//! - Cookie management
//! - Client fingerprinting

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
