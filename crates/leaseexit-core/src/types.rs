use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Opaque structured payload attached to workflow records
///
/// Wraps a JSON value so lease data, form data, and notification data can
/// flow through the engine without the engine committing to their shape.
/// Validation rules inspect individual fields through the accessors here.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DataPacket {
    /// The inner JSON value
    pub value: serde_json::Value,
}

impl DataPacket {
    /// Create a new data packet from a JSON value
    #[inline]
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Create a null data packet
    #[inline]
    pub fn null() -> Self {
        Self {
            value: serde_json::Value::Null,
        }
    }

    /// Get the inner JSON value
    #[inline]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.value
    }

    /// Take ownership of the inner JSON value
    #[inline]
    pub fn into_value(self) -> serde_json::Value {
        self.value
    }

    /// Check if the data packet is null
    #[inline]
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Look up a top-level field by name
    ///
    /// Returns `None` when the packet is not an object or the field is
    /// absent. Form validation is built on this accessor.
    #[inline]
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.value.as_object().and_then(|map| map.get(name))
    }

    /// Check whether a top-level field is present
    #[inline]
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Names of the top-level fields, empty for non-object packets
    pub fn field_names(&self) -> Vec<&str> {
        self.value
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Try to convert the data packet to a specific type
    pub fn to<T>(&self) -> Result<T, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        serde_json::from_value(self.value.clone())
    }

    /// Create a data packet from a serializable value
    pub fn from<T>(value: &T) -> Result<Self, serde_json::Error>
    where
        T: Serialize,
    {
        Ok(Self::new(serde_json::to_value(value)?))
    }

    /// Create an object data packet with a single key-value pair
    #[inline]
    pub fn singleton(key: &str, value: serde_json::Value) -> Self {
        let mut map = serde_json::Map::new();
        map.insert(key.to_string(), value);
        Self::new(serde_json::Value::Object(map))
    }
}

impl Default for DataPacket {
    fn default() -> Self {
        Self::null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_lookup() {
        let packet = DataPacket::new(json!({"lease_id": "L1", "term_months": 24}));

        assert_eq!(packet.field("lease_id").unwrap(), &json!("L1"));
        assert_eq!(packet.field("term_months").unwrap(), &json!(24));
        assert!(packet.field("missing").is_none());
        assert!(packet.has_field("lease_id"));
        assert!(!packet.has_field("missing"));
    }

    #[test]
    fn test_field_lookup_on_non_object() {
        let packet = DataPacket::new(json!("just a string"));
        assert!(packet.field("anything").is_none());
        assert!(packet.field_names().is_empty());
    }

    #[test]
    fn test_field_names() {
        let packet = DataPacket::new(json!({"a": 1, "b": 2}));
        let mut names = packet.field_names();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_null_packet() {
        let packet = DataPacket::null();
        assert!(packet.is_null());
        assert_eq!(DataPacket::default(), packet);
    }

    #[test]
    fn test_typed_round_trip() {
        #[derive(Serialize, Deserialize, PartialEq, Debug)]
        struct LeaseData {
            property_name: String,
            exit_reason: String,
        }

        let lease = LeaseData {
            property_name: "100 Main St".to_string(),
            exit_reason: "end of term".to_string(),
        };

        let packet = DataPacket::from(&lease).unwrap();
        assert_eq!(packet.field("property_name").unwrap(), "100 Main St");

        let back: LeaseData = packet.to().unwrap();
        assert_eq!(back, lease);
    }

    #[test]
    fn test_singleton() {
        let packet = DataPacket::singleton("status", json!("active"));
        assert_eq!(packet.field("status").unwrap(), "active");
        assert_eq!(packet.field_names().len(), 1);
    }

    #[test]
    fn test_transparent_serialization() {
        let packet = DataPacket::new(json!({"nested": {"list": [1, 2]}}));
        let serialized = serde_json::to_string(&packet).unwrap();
        assert_eq!(serialized, r#"{"nested":{"list":[1,2]}}"#);

        let deserialized: DataPacket = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, packet);
    }
}
