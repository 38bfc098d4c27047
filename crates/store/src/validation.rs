//! Field-level validation of candidate records
//!
//! The checks are structural only. `level` and `type` must be non-empty
//! text but are not matched against their enums here, and name uniqueness
//! is left to the store because it depends on existing rows.

use serde::{Deserialize, Serialize};

use crate::input::{DigimonInput, NumberInput, TextInput};

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a candidate record. An empty result means the record is
/// structurally acceptable. Errors are reported in field order: name,
/// level, type, description, attackPower, defenseValue.
pub fn validate_digimon(input: &DigimonInput) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !is_non_blank(&input.name) {
        errors.push(FieldError::new("name", "Name is required"));
    }

    if !is_non_empty(&input.level) {
        errors.push(FieldError::new("level", "Level is required"));
    }

    if !is_non_empty(&input.digimon_type) {
        errors.push(FieldError::new("type", "Type is required"));
    }

    if !is_non_blank(&input.description) {
        errors.push(FieldError::new("description", "Description is required"));
    }

    if !is_valid_stat(&input.attack_power) {
        errors.push(FieldError::new(
            "attackPower",
            "Attack power must be a valid number",
        ));
    }

    if !is_valid_stat(&input.defense_value) {
        errors.push(FieldError::new(
            "defenseValue",
            "Defense value must be a valid number",
        ));
    }

    errors
}

fn is_non_blank(value: &TextInput) -> bool {
    value.as_text().is_some_and(|s| !s.trim().is_empty())
}

fn is_non_empty(value: &TextInput) -> bool {
    value.as_text().is_some_and(|s| !s.is_empty())
}

/// Stats are optional at this stage; when given they must be integers >= 0
fn is_valid_stat(value: &NumberInput) -> bool {
    if !value.is_provided() {
        return true;
    }
    value.to_int().is_some_and(|n| n >= 0)
}
