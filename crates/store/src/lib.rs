//! Digimon record storage
//!
//! This crate provides:
//! - Decoding of loosely-typed request bodies into candidate records
//! - Field validation of those candidates
//! - Sea-ORM entity and connection management for the digimons table
//! - The record store enforcing unique names on create and update
//! - Sample data seeding

pub mod config;
pub mod database;
pub mod digimons;
pub mod entity;
pub mod error;
pub mod input;
pub mod seed;
pub mod validation;

// Re-export commonly used types
pub use config::DatabaseConfig;
pub use database::Database;
pub use digimons::{parse_id, DigimonStore, NewDigimon};
pub use entity::digimons::Model as Digimon;
pub use entity::{DigimonLevel, DigimonType};
pub use error::{Result, StoreError};
pub use input::DigimonInput;
pub use seed::seed_sample_data;
pub use validation::{validate_digimon, FieldError};

pub use sea_orm::DbErr;
