//! Sea-ORM entities for the DigiWorld tables

pub mod digimons;
pub mod sea_orm_active_enums;

// Re-export entities for convenience
pub use digimons::Entity as Digimons;
pub use sea_orm_active_enums::{DigimonLevel, DigimonType};
