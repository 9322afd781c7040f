//! Free-form and structured postal addresses.

use super::error::PropertyError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The semantic type a structured address field must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Integer,
    Text,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Integer => f.write_str("integer"),
            FieldKind::Text => f.write_str("text"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    StreetNumber,
    StreetName,
    UnitNumber,
    City,
    State,
    Province,
    Region,
    ZipCode,
    Country,
}

/// Every key a structured address may carry, with the kind its value must have.
pub static ADDRESS_FIELDS: [(AddressField, &str, FieldKind); 9] = [
    (AddressField::StreetNumber, "street_number", FieldKind::Integer),
    (AddressField::StreetName, "street_name", FieldKind::Text),
    (AddressField::UnitNumber, "unit_number", FieldKind::Integer),
    (AddressField::City, "city", FieldKind::Text),
    (AddressField::State, "state", FieldKind::Text),
    (AddressField::Province, "province", FieldKind::Text),
    (AddressField::Region, "region", FieldKind::Text),
    (AddressField::ZipCode, "zip_code", FieldKind::Text),
    (AddressField::Country, "country", FieldKind::Text),
];

impl AddressField {
    pub fn from_key(key: &str) -> Option<Self> {
        ADDRESS_FIELDS
            .iter()
            .find(|(_, k, _)| *k == key)
            .map(|(field, _, _)| *field)
    }

    pub fn key(self) -> &'static str {
        self.entry().1
    }

    pub fn kind(self) -> FieldKind {
        self.entry().2
    }

    fn entry(self) -> &'static (AddressField, &'static str, FieldKind) {
        // The table lists the variants in declaration order.
        &ADDRESS_FIELDS[self as usize]
    }
}

/// A postal address broken into its whitelisted parts. Any subset may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructuredAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Storage for one field, typed by the kind of value it holds.
enum Slot<'a> {
    Integer(&'a mut Option<i64>),
    Text(&'a mut Option<String>),
}

impl StructuredAddress {
    /// Validates a loosely-typed key/value record.
    ///
    /// Unknown keys are reported together before any value is type-checked.
    pub fn from_record<'a, I>(record: I) -> Result<Self, PropertyError>
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let entries: Vec<(&str, &Value)> = record.into_iter().collect();

        let invalid: Vec<String> = entries
            .iter()
            .filter(|(key, _)| AddressField::from_key(key).is_none())
            .map(|(key, _)| key.to_string())
            .collect();
        if !invalid.is_empty() {
            return Err(PropertyError::InvalidAddressKeys(invalid));
        }

        let mut address = StructuredAddress::default();
        for (key, value) in entries {
            // Filtered above.
            let Some(field) = AddressField::from_key(key) else { continue };
            let type_error = |expected| PropertyError::AddressFieldType { key: field.key(), expected };
            match address.slot(field) {
                Slot::Integer(slot) => {
                    *slot = Some(value.as_i64().ok_or_else(|| type_error(FieldKind::Integer))?);
                }
                Slot::Text(slot) => {
                    *slot = Some(value.as_str().ok_or_else(|| type_error(FieldKind::Text))?.to_string());
                }
            }
        }
        Ok(address)
    }

    fn slot(&mut self, field: AddressField) -> Slot<'_> {
        match field {
            AddressField::StreetNumber => Slot::Integer(&mut self.street_number),
            AddressField::UnitNumber => Slot::Integer(&mut self.unit_number),
            AddressField::StreetName => Slot::Text(&mut self.street_name),
            AddressField::City => Slot::Text(&mut self.city),
            AddressField::State => Slot::Text(&mut self.state),
            AddressField::Province => Slot::Text(&mut self.province),
            AddressField::Region => Slot::Text(&mut self.region),
            AddressField::ZipCode => Slot::Text(&mut self.zip_code),
            AddressField::Country => Slot::Text(&mut self.country),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == StructuredAddress::default()
    }
}

/// An address given either as one line of text or as a structured record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Address {
    Text(String),
    Structured(StructuredAddress),
}

impl Address {
    /// Classifies a loosely-typed value. `null` is handled by the caller as "absent".
    pub fn from_value(value: &Value) -> Result<Self, PropertyError> {
        match value {
            Value::String(s) => Ok(Address::Text(s.clone())),
            Value::Object(map) => {
                StructuredAddress::from_record(map.iter().map(|(k, v)| (k.as_str(), v)))
                    .map(Address::Structured)
            }
            _ => Err(PropertyError::AddressShape),
        }
    }
}

impl From<StructuredAddress> for Address {
    fn from(value: StructuredAddress) -> Self {
        Address::Structured(value)
    }
}
