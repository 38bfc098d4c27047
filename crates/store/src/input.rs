//! Decoding of untrusted request bodies into a typed candidate record
//!
//! Nothing here rejects input. Every JSON value decodes into a
//! [`DigimonInput`]; deciding what is acceptable is the job of
//! [`crate::validation`] and the store's coercion step.

use serde_json::{Map, Value};

/// A text attribute as it arrived on the wire
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextInput {
    /// Key absent or `null`
    #[default]
    Missing,
    Text(String),
    /// Present but not a JSON string
    NotText,
}

impl TextInput {
    fn decode(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => TextInput::Missing,
            Some(Value::String(s)) => TextInput::Text(s.clone()),
            Some(_) => TextInput::NotText,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TextInput::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// A numeric attribute as it arrived on the wire
///
/// Numbers and strings are both kept in their textual form so that the
/// same lenient integer parsing applies to `110` and `"110"`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NumberInput {
    /// Key absent, `null` or `false`
    #[default]
    Missing,
    Raw(String),
    /// `true`, an array or an object
    NotNumeric,
}

impl NumberInput {
    fn decode(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => NumberInput::Missing,
            Some(Value::String(s)) => NumberInput::Raw(s.clone()),
            Some(Value::Number(n)) => NumberInput::Raw(n.to_string()),
            Some(_) => NumberInput::NotNumeric,
        }
    }

    /// Whether the value should be checked at all. Blank values are
    /// skipped by the validator and rejected later during coercion.
    pub fn is_provided(&self) -> bool {
        match self {
            NumberInput::Missing => false,
            NumberInput::Raw(s) => !s.is_empty(),
            NumberInput::NotNumeric => true,
        }
    }

    /// Leading-integer value, if any
    pub fn to_int(&self) -> Option<i32> {
        match self {
            NumberInput::Raw(s) => parse_leading_int(s),
            _ => None,
        }
    }
}

/// Candidate record decoded from a request body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DigimonInput {
    pub name: TextInput,
    pub level: TextInput,
    pub digimon_type: TextInput,
    pub description: TextInput,
    pub image_url: TextInput,
    pub attack_power: NumberInput,
    pub defense_value: NumberInput,
}

impl DigimonInput {
    /// Decode any JSON value. Non-object values decode with every field missing.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            name: TextInput::decode(map.get("name")),
            level: TextInput::decode(map.get("level")),
            digimon_type: TextInput::decode(map.get("type")),
            description: TextInput::decode(map.get("description")),
            image_url: TextInput::decode(map.get("imageUrl")),
            attack_power: NumberInput::decode(map.get("attackPower")),
            defense_value: NumberInput::decode(map.get("defenseValue")),
        }
    }
}

/// Parse the integer at the start of `raw`.
///
/// Leading whitespace and a single sign are accepted, then at least one
/// decimal digit; anything after the digits is ignored. `"12.7"` yields 12,
/// `"8 bits"` yields 8, `"abc"` yields `None`. Values that do not fit an
/// `i32` yield `None`.
pub fn parse_leading_int(raw: &str) -> Option<i32> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}
