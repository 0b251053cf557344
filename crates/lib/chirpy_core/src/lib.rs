//! # chirpy_core
//!
//! Core domain logic for Chirpy: authentication and sessions, domain models,
//! persistence and chirp validation.

pub mod auth;
pub mod chirps;
pub mod migrate;
pub mod models;
pub mod store;
