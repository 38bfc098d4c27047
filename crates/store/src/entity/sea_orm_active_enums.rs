//! String-backed enums stored in the digimons table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Evolution stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum DigimonLevel {
    #[sea_orm(string_value = "Fresh")]
    Fresh,
    #[sea_orm(string_value = "In-Training")]
    #[serde(rename = "In-Training")]
    InTraining,
    #[sea_orm(string_value = "Rookie")]
    Rookie,
    #[sea_orm(string_value = "Champion")]
    Champion,
    #[sea_orm(string_value = "Ultimate")]
    Ultimate,
    #[sea_orm(string_value = "Mega")]
    Mega,
}

impl DigimonLevel {
    /// Exact, case-sensitive lookup by display name
    pub fn parse(value: &str) -> Option<Self> {
        Self::try_from_value(&value.to_string()).ok()
    }
}

impl fmt::Display for DigimonLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

/// Attribute type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum DigimonType {
    #[sea_orm(string_value = "Vaccine")]
    Vaccine,
    #[sea_orm(string_value = "Data")]
    Data,
    #[sea_orm(string_value = "Virus")]
    Virus,
    #[sea_orm(string_value = "Free")]
    Free,
}

impl DigimonType {
    pub fn parse(value: &str) -> Option<Self> {
        Self::try_from_value(&value.to_string()).ok()
    }
}

impl fmt::Display for DigimonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}
