//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id, random per-password salt)
//! - Document storage: in-memory and PostgreSQL JSONB collections with
//!   atomic single-document updates

pub mod document;
pub mod password;
