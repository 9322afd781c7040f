//! Identity of the real-estate asset a cash-flow model describes.
//!
//! A `Property` is validated in one step and is immutable afterwards: every
//! field is checked before the value exists, so a constructed `Property`
//! always holds a text name (if any), a well-formed address (if any) and an
//! in-range location (if any).

pub use self::address::{Address, AddressField, FieldKind, StructuredAddress, ADDRESS_FIELDS};
pub use self::error::PropertyError;
pub use self::location::{Location, LATITUDE_RANGE, LONGITUDE_RANGE};

mod address;
mod error;
mod location;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Property {
    name: Option<String>,
    address: Option<Address>,
    location: Option<Location>,
}

impl Property {
    /// Typed constructor. Only the location range can fail here.
    pub fn new(
        name: Option<String>,
        address: Option<Address>,
        location: Option<(f64, f64)>,
    ) -> Result<Self, PropertyError> {
        let location = location
            .map(|(lat, lon)| Location::new(lat, lon))
            .transpose()?;
        tracing::debug!(name = ?name, has_address = address.is_some(), "property validated");
        Ok(Self { name, address, location })
    }

    /// Validates loosely-typed parts. `None` and JSON `null` both mean "absent",
    /// and an absent field never affects the validation of the others.
    pub fn from_parts(
        name: Option<&Value>,
        address: Option<&Value>,
        location: Option<&Value>,
    ) -> Result<Self, PropertyError> {
        let name = match present(name) {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(PropertyError::NameNotText),
        };
        let address = present(address).map(Address::from_value).transpose()?;
        let location = present(location).map(Location::from_value).transpose()?;

        tracing::debug!(name = ?name, has_address = address.is_some(), "property validated");
        Ok(Self { name, address, location })
    }

    /// Validates a record such as
    /// `{"name": "Tower", "address": {"city": "Austin"}, "location": [30.26, -97.74]}`.
    pub fn from_value(value: &Value) -> Result<Self, PropertyError> {
        let record = value.as_object().ok_or(PropertyError::InputShape)?;
        if let Some(key) = record
            .keys()
            .find(|k| !matches!(k.as_str(), "name" | "address" | "location"))
        {
            return Err(PropertyError::UnknownField(key.clone()));
        }
        Self::from_parts(record.get("name"), record.get("address"), record.get("location"))
    }

    pub fn name(&self) -> Option<&str> { self.name.as_deref() }
    pub fn address(&self) -> Option<&Address> { self.address.as_ref() }
    pub fn location(&self) -> Option<Location> { self.location }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

impl TryFrom<Value> for Property {
    type Error = PropertyError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Property::from_value(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn valid_location() -> Value {
        json!([40.7128, -74.0060])
    }

    #[fixture]
    fn valid_address() -> Value {
        json!({
            "street_number": 123,
            "street_name": "Main St",
            "city": "New York",
            "state": "NY",
            "zip_code": "10001"
        })
    }

    fn build(name: Value, address: Value, location: Value) -> Result<Property, PropertyError> {
        Property::from_parts(Some(&name), Some(&address), Some(&location))
    }

    #[rstest]
    fn test_initialization_with_valid_data(valid_location: Value, valid_address: Value) {
        let prop = build(json!("Test Property"), valid_address, valid_location).unwrap();
        assert_eq!(prop.name(), Some("Test Property"));
        assert_eq!(prop.location().map(|l| l.as_tuple()), Some((40.7128, -74.0060)));
        let expected = StructuredAddress {
            street_number: Some(123),
            street_name: Some("Main St".into()),
            city: Some("New York".into()),
            state: Some("NY".into()),
            zip_code: Some("10001".into()),
            ..Default::default()
        };
        assert_eq!(prop.address(), Some(&Address::Structured(expected)));
    }

    #[test]
    fn test_initialization_missing_optional() {
        let prop = Property::from_parts(Some(&json!("Basic Property")), None, None).unwrap();
        assert_eq!(prop.name(), Some("Basic Property"));
        assert!(prop.address().is_none());
        assert!(prop.location().is_none());
    }

    #[test]
    fn test_all_absent_is_valid() {
        let prop = Property::from_parts(Some(&Value::Null), None, Some(&Value::Null)).unwrap();
        assert_eq!(prop, Property::new(None, None, None).unwrap());
    }

    #[test]
    fn test_text_address_is_kept_verbatim() {
        let prop = build(json!("Loft"), json!("  12 Rue de Rivoli, Paris "), Value::Null).unwrap();
        assert_eq!(prop.address(), Some(&Address::Text("  12 Rue de Rivoli, Paris ".into())));
    }

    #[test]
    fn test_location_stored_as_converted_floats() {
        let prop = build(Value::Null, Value::Null, json!([45, "-122.5"])).unwrap();
        let loc = prop.location().unwrap();
        assert_eq!(loc.latitude(), 45.0);
        assert_eq!(loc.longitude(), -122.5);
    }

    #[rstest]
    #[case(json!(123))]
    #[case(json!(["Tower"]))]
    #[case(json!({"first": "Tower"}))]
    fn test_invalid_name(#[case] name: Value, valid_location: Value, valid_address: Value) {
        let err = build(name, valid_address, valid_location).unwrap_err();
        assert_eq!(err, PropertyError::NameNotText);
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[rstest]
    fn test_invalid_location_type(valid_address: Value) {
        let err = build(json!("Test Property"), valid_address, json!("Not a tuple")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[rstest]
    fn test_invalid_location_values(valid_address: Value) {
        let err = build(json!("Test Property"), valid_address, json!([200, 90])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_invalid_address_type() {
        let err = build(json!("Test Property"), json!([123, "Main St"]), Value::Null).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[rstest]
    fn test_address_invalid_keys(mut valid_address: Value) {
        valid_address["neighborhood"] = json!("Neighborhood 1");
        let err = build(json!("Test Property"), valid_address, Value::Null).unwrap_err();
        assert!(matches!(err, PropertyError::InvalidAddressKeys(_)));
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[rstest]
    fn test_address_invalid_value_type(mut valid_address: Value) {
        valid_address["street_number"] = json!("123A");
        let err = build(json!("Test Property"), valid_address, Value::Null).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(err.to_string().contains("street_number"));
    }

    #[test]
    fn test_typed_constructor_checks_range() {
        let addr = Address::Text("1 Main St".into());
        assert!(Property::new(Some("A".into()), Some(addr.clone()), Some((10.0, 10.0))).is_ok());
        let err = Property::new(Some("A".into()), Some(addr), Some((10.0, 190.0))).unwrap_err();
        assert!(matches!(err, PropertyError::Longitude(_)));
    }

    #[rstest]
    #[case(json!("Tower"), PropertyError::InputShape)]
    #[case(json!([1, 2]), PropertyError::InputShape)]
    #[case(json!({"name": "Tower", "price": 10}), PropertyError::UnknownField("price".into()))]
    fn test_from_value_rejects_bad_records(#[case] input: Value, #[case] expected: PropertyError) {
        let err = Property::from_value(&input).unwrap_err();
        assert_eq!(err, expected);
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[rstest]
    fn test_json_round_trip(valid_location: Value, valid_address: Value) {
        let input = json!({"name": "Tower", "address": valid_address, "location": valid_location});
        let prop: Property = serde_json::from_value(input).unwrap();
        let back: Property = serde_json::from_value(serde_json::to_value(&prop).unwrap()).unwrap();
        assert_eq!(prop, back);
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let input = json!({"name": "Tower", "location": [0.0, 500.0]});
        let err = serde_json::from_value::<Property>(input).unwrap_err();
        assert!(err.to_string().contains("longitude"));
    }
}
