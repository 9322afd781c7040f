//! Defines the error types for the property module.
use super::address::FieldKind;
use crate::error::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    #[error("property input must be a record with optional 'name', 'address' and 'location' keys")]
    InputShape,
    #[error("unexpected property field '{0}'")]
    UnknownField(String),
    #[error("name must be text")]
    NameNotText,
    #[error("address must be either text or a structured record")]
    AddressShape,
    #[error("address contains invalid keys: {}", .0.join(", "))]
    InvalidAddressKeys(Vec<String>),
    #[error("invalid type for address key '{key}': expected {expected}")]
    AddressFieldType { key: &'static str, expected: FieldKind },
    #[error("location must be a pair of length 2 containing numeric values")]
    LocationShape,
    #[error("location pair must contain two numeric values")]
    LocationNotNumeric,
    #[error("invalid latitude {0}: must be between -90 and 90 degrees")]
    Latitude(f64),
    #[error("invalid longitude {0}: must be between -180 and 180 degrees")]
    Longitude(f64),
}

impl PropertyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PropertyError::InputShape
            | PropertyError::UnknownField(_)
            | PropertyError::NameNotText
            | PropertyError::AddressShape
            | PropertyError::LocationShape
            | PropertyError::LocationNotNumeric => ErrorKind::Type,
            PropertyError::InvalidAddressKeys(_)
            | PropertyError::AddressFieldType { .. }
            | PropertyError::Latitude(_)
            | PropertyError::Longitude(_) => ErrorKind::Value,
        }
    }
}
