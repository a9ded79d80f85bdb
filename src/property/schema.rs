//! Property descriptors exchanged with the remote platform.
//!
//! A [`Property`] describes one named input or field: its type, its
//! constraints, a default, and a few behavioural flags. Each shape is its own
//! variant carrying only the fields that make sense for it.
//!
//! # Wire Format
//!
//! Descriptors travel as JSON objects in the platform's schema dialect:
//!
//! ```json
//! {
//!   "type": "string",
//!   "title": "Flavor",
//!   "default": "small",
//!   "enum": ["small", "medium", "large"],
//!   "recreateOnUpdate": true
//! }
//! ```
//!
//! A descriptor without `type` but with `$ref` is a [`ReferenceProperty`].
//! Keys this module does not model are kept in [`PropertyMeta::extensions`]
//! and written back after the known keys.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use super::errors::PropertyError;
use super::OrderedPropertyMap;

/// The declared type tag of a property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// A string value.
    String,
    /// A whole number.
    Integer,
    /// Any JSON number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// A JSON array.
    Array,
    /// A JSON object with named properties.
    Object,
}

impl PropertyType {
    /// Returns the wire tag for this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "integer" => Ok(Self::Integer),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            other => Err(PropertyError::UnknownType {
                found: other.to_string(),
            }),
        }
    }
}

/// Fields shared by every property shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyMeta {
    /// Human-readable label.
    pub title: Option<String>,
    /// Longer help text.
    pub description: Option<String>,
    /// Value used when the caller supplies none.
    pub default: Option<Value>,
    /// The platform stores the value encrypted and never echoes it back.
    pub encrypted: bool,
    /// The value is computed remotely and cannot be set.
    pub read_only: bool,
    /// Changing the value replaces the remote object instead of updating it.
    pub recreate_on_update: bool,
    /// Descriptor keys with no dedicated field, in wire order.
    pub extensions: Map<String, Value>,
}

/// A string property.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringProperty {
    pub meta: PropertyMeta,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    /// Regular expression the value must contain a match for. Anchor it
    /// with `^` and `$` to match the whole value.
    pub pattern: Option<String>,
    /// Free-form format hint such as `date-time` or `uri`.
    pub format: Option<String>,
    /// Allowed values (`enum` on the wire). Empty means unrestricted.
    pub allowed: Vec<String>,
}

/// An integer or number property.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NumericProperty {
    pub meta: PropertyMeta,
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    /// Allowed values (`enum` on the wire). Empty means unrestricted.
    pub allowed: Vec<Number>,
}

/// A boolean property.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BooleanProperty {
    pub meta: PropertyMeta,
}

/// An array property.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArrayProperty {
    pub meta: PropertyMeta,
    /// Descriptor every element must satisfy.
    pub items: Option<Box<Property>>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

/// An object property with its own ordered set of nested properties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectProperty {
    pub meta: PropertyMeta,
    pub properties: OrderedPropertyMap,
    /// Nested names that must be present in a value.
    pub required: Vec<String>,
}

/// A reference to a descriptor defined elsewhere on the platform.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceProperty {
    pub meta: PropertyMeta,
    /// The `$ref` target.
    pub target: String,
}

/// A typed, constrained property descriptor.
///
/// # Example
///
/// ```rust
/// use automation_provider::property::{Property, PropertyType, StringProperty};
/// use serde_json::json;
///
/// let property: Property = serde_json::from_value(json!({
///     "type": "string",
///     "maxLength": 8,
///     "encrypted": true
/// }))
/// .unwrap();
///
/// assert_eq!(property.property_type(), Some(PropertyType::String));
/// assert!(property.meta().encrypted);
/// assert!(matches!(property, Property::String(StringProperty { max_length: Some(8), .. })));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Property {
    String(StringProperty),
    Integer(NumericProperty),
    Number(NumericProperty),
    Boolean(BooleanProperty),
    Array(ArrayProperty),
    Object(ObjectProperty),
    Reference(ReferenceProperty),
}

/// The zero value: an untyped string descriptor with no constraints.
impl Default for Property {
    fn default() -> Self {
        Self::String(StringProperty::default())
    }
}

impl Property {
    /// Returns the declared type, or `None` for references.
    #[must_use]
    pub const fn property_type(&self) -> Option<PropertyType> {
        match self {
            Self::String(_) => Some(PropertyType::String),
            Self::Integer(_) => Some(PropertyType::Integer),
            Self::Number(_) => Some(PropertyType::Number),
            Self::Boolean(_) => Some(PropertyType::Boolean),
            Self::Array(_) => Some(PropertyType::Array),
            Self::Object(_) => Some(PropertyType::Object),
            Self::Reference(_) => None,
        }
    }

    /// Returns the fields shared by every shape.
    #[must_use]
    pub const fn meta(&self) -> &PropertyMeta {
        match self {
            Self::String(p) => &p.meta,
            Self::Integer(p) | Self::Number(p) => &p.meta,
            Self::Boolean(p) => &p.meta,
            Self::Array(p) => &p.meta,
            Self::Object(p) => &p.meta,
            Self::Reference(p) => &p.meta,
        }
    }

    /// Returns the shared fields mutably.
    pub fn meta_mut(&mut self) -> &mut PropertyMeta {
        match self {
            Self::String(p) => &mut p.meta,
            Self::Integer(p) | Self::Number(p) => &mut p.meta,
            Self::Boolean(p) => &mut p.meta,
            Self::Array(p) => &mut p.meta,
            Self::Object(p) => &mut p.meta,
            Self::Reference(p) => &mut p.meta,
        }
    }

    /// Returns a builder-style copy with `title` set.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.meta_mut().title = Some(title.into());
        self
    }

    /// Returns a builder-style copy with `default` set.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.meta_mut().default = Some(default.into());
        self
    }

    /// Creates an unconstrained string property.
    #[must_use]
    pub fn string() -> Self {
        Self::String(StringProperty::default())
    }

    /// Creates an unconstrained integer property.
    #[must_use]
    pub fn integer() -> Self {
        Self::Integer(NumericProperty::default())
    }

    /// Creates an unconstrained number property.
    #[must_use]
    pub fn number() -> Self {
        Self::Number(NumericProperty::default())
    }

    /// Creates a boolean property.
    #[must_use]
    pub fn boolean() -> Self {
        Self::Boolean(BooleanProperty::default())
    }

    /// Creates an array property whose elements follow `items`.
    #[must_use]
    pub fn array(items: Self) -> Self {
        Self::Array(ArrayProperty {
            items: Some(Box::new(items)),
            ..ArrayProperty::default()
        })
    }

    /// Creates an object property with the given nested properties.
    #[must_use]
    pub fn object(properties: OrderedPropertyMap) -> Self {
        Self::Object(ObjectProperty {
            properties,
            ..ObjectProperty::default()
        })
    }

    /// Creates a reference to a remotely defined descriptor.
    #[must_use]
    pub fn reference(target: impl Into<String>) -> Self {
        Self::Reference(ReferenceProperty {
            target: target.into(),
            ..ReferenceProperty::default()
        })
    }
}

/// Returns the JSON kind name of a value, for error messages.
pub(crate) const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn take_string(
    fields: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, PropertyError> {
    match fields.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(PropertyError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}

fn take_bool(fields: &mut Map<String, Value>, field: &'static str) -> Result<bool, PropertyError> {
    match fields.remove(field) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(b),
        Some(_) => Err(PropertyError::InvalidField {
            field,
            expected: "a boolean",
        }),
    }
}

fn take_count(
    fields: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Option<u64>, PropertyError> {
    match fields.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_u64().map(Some).ok_or(PropertyError::InvalidField {
            field,
            expected: "a non-negative integer",
        }),
        Some(_) => Err(PropertyError::InvalidField {
            field,
            expected: "a non-negative integer",
        }),
    }
}

fn take_number(
    fields: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Option<Number>, PropertyError> {
    match fields.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n)),
        Some(_) => Err(PropertyError::InvalidField {
            field,
            expected: "a number",
        }),
    }
}

fn take_array(
    fields: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Vec<Value>, PropertyError> {
    match fields.remove(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => Ok(values),
        Some(_) => Err(PropertyError::InvalidField {
            field,
            expected: "an array",
        }),
    }
}

fn take_strings(
    fields: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, PropertyError> {
    take_array(fields, field)?
        .into_iter()
        .map(|value| match value {
            Value::String(s) => Ok(s),
            _ => Err(PropertyError::InvalidField {
                field,
                expected: "an array of strings",
            }),
        })
        .collect()
}

fn take_numbers(
    fields: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Vec<Number>, PropertyError> {
    take_array(fields, field)?
        .into_iter()
        .map(|value| match value {
            Value::Number(n) => Ok(n),
            _ => Err(PropertyError::InvalidField {
                field,
                expected: "an array of numbers",
            }),
        })
        .collect()
}

impl PropertyMeta {
    /// Removes the shared fields from `fields`. Extensions are filled later,
    /// once the shape-specific fields have been taken too.
    fn take_from(fields: &mut Map<String, Value>) -> Result<Self, PropertyError> {
        Ok(Self {
            title: take_string(fields, "title")?,
            description: take_string(fields, "description")?,
            default: fields.remove("default"),
            encrypted: take_bool(fields, "encrypted")?,
            read_only: take_bool(fields, "readOnly")?,
            recreate_on_update: take_bool(fields, "recreateOnUpdate")?,
            extensions: Map::new(),
        })
    }

    fn write_leading(&self, out: &mut Map<String, Value>) {
        if let Some(title) = &self.title {
            out.insert("title".to_string(), Value::from(title.as_str()));
        }
        if let Some(description) = &self.description {
            out.insert("description".to_string(), Value::from(description.as_str()));
        }
        if let Some(default) = &self.default {
            out.insert("default".to_string(), default.clone());
        }
    }

    fn write_trailing(&self, out: &mut Map<String, Value>) {
        if self.encrypted {
            out.insert("encrypted".to_string(), Value::Bool(true));
        }
        if self.read_only {
            out.insert("readOnly".to_string(), Value::Bool(true));
        }
        if self.recreate_on_update {
            out.insert("recreateOnUpdate".to_string(), Value::Bool(true));
        }
        for (key, value) in &self.extensions {
            out.insert(key.clone(), value.clone());
        }
    }
}

impl TryFrom<Value> for Property {
    type Error = PropertyError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(PropertyError::NotAnObject {
                    found: json_kind(&other),
                })
            }
        };

        let type_tag = take_string(&mut fields, "type")?;
        let reference = if type_tag.is_none() {
            take_string(&mut fields, "$ref")?
        } else {
            None
        };
        let mut meta = PropertyMeta::take_from(&mut fields)?;

        let mut property = match (type_tag, reference) {
            (None, Some(target)) => Self::Reference(ReferenceProperty {
                meta: PropertyMeta::default(),
                target,
            }),
            (None, None) => return Err(PropertyError::MissingType),
            (Some(tag), _) => match tag.parse::<PropertyType>()? {
                PropertyType::String => Self::String(StringProperty {
                    meta: PropertyMeta::default(),
                    min_length: take_count(&mut fields, "minLength")?,
                    max_length: take_count(&mut fields, "maxLength")?,
                    pattern: take_string(&mut fields, "pattern")?,
                    format: take_string(&mut fields, "format")?,
                    allowed: take_strings(&mut fields, "enum")?,
                }),
                kind @ (PropertyType::Integer | PropertyType::Number) => {
                    let numeric = NumericProperty {
                        meta: PropertyMeta::default(),
                        minimum: take_number(&mut fields, "minimum")?,
                        maximum: take_number(&mut fields, "maximum")?,
                        allowed: take_numbers(&mut fields, "enum")?,
                    };
                    if kind == PropertyType::Integer {
                        Self::Integer(numeric)
                    } else {
                        Self::Number(numeric)
                    }
                }
                PropertyType::Boolean => Self::Boolean(BooleanProperty::default()),
                PropertyType::Array => {
                    let items = match fields.remove("items") {
                        None | Some(Value::Null) => None,
                        Some(items) => Some(Box::new(Self::try_from(items)?)),
                    };
                    Self::Array(ArrayProperty {
                        meta: PropertyMeta::default(),
                        items,
                        min_items: take_count(&mut fields, "minItems")?,
                        max_items: take_count(&mut fields, "maxItems")?,
                    })
                }
                PropertyType::Object => {
                    let properties = match fields.remove("properties") {
                        None | Some(Value::Null) => OrderedPropertyMap::new(),
                        Some(Value::Object(nested)) => {
                            let mut properties = OrderedPropertyMap::new();
                            for (name, value) in nested {
                                if name.is_empty() {
                                    return Err(PropertyError::EmptyName);
                                }
                                properties.set(name, Self::try_from(value)?);
                            }
                            properties
                        }
                        Some(_) => {
                            return Err(PropertyError::InvalidField {
                                field: "properties",
                                expected: "an object",
                            })
                        }
                    };
                    Self::Object(ObjectProperty {
                        meta: PropertyMeta::default(),
                        properties,
                        required: take_strings(&mut fields, "required")?,
                    })
                }
            },
        };

        meta.extensions = fields;
        *property.meta_mut() = meta;
        Ok(property)
    }
}

impl From<&Property> for Value {
    fn from(property: &Property) -> Self {
        let mut out = Map::new();
        let meta = property.meta();

        match property {
            Property::Reference(p) => {
                out.insert("$ref".to_string(), Self::from(p.target.as_str()));
            }
            other => {
                if let Some(kind) = other.property_type() {
                    out.insert("type".to_string(), Self::from(kind.as_str()));
                }
            }
        }
        meta.write_leading(&mut out);

        match property {
            Property::String(p) => {
                if let Some(min) = p.min_length {
                    out.insert("minLength".to_string(), Self::from(min));
                }
                if let Some(max) = p.max_length {
                    out.insert("maxLength".to_string(), Self::from(max));
                }
                if let Some(pattern) = &p.pattern {
                    out.insert("pattern".to_string(), Self::from(pattern.as_str()));
                }
                if let Some(format) = &p.format {
                    out.insert("format".to_string(), Self::from(format.as_str()));
                }
                if !p.allowed.is_empty() {
                    let allowed = p.allowed.iter().map(|s| Self::from(s.as_str())).collect();
                    out.insert("enum".to_string(), Self::Array(allowed));
                }
            }
            Property::Integer(p) | Property::Number(p) => {
                if let Some(min) = &p.minimum {
                    out.insert("minimum".to_string(), Self::Number(min.clone()));
                }
                if let Some(max) = &p.maximum {
                    out.insert("maximum".to_string(), Self::Number(max.clone()));
                }
                if !p.allowed.is_empty() {
                    let allowed = p.allowed.iter().cloned().map(Self::Number).collect();
                    out.insert("enum".to_string(), Self::Array(allowed));
                }
            }
            Property::Array(p) => {
                if let Some(items) = &p.items {
                    out.insert("items".to_string(), Self::from(items.as_ref()));
                }
                if let Some(min) = p.min_items {
                    out.insert("minItems".to_string(), Self::from(min));
                }
                if let Some(max) = p.max_items {
                    out.insert("maxItems".to_string(), Self::from(max));
                }
            }
            Property::Object(p) => {
                let nested = p
                    .properties
                    .iter()
                    .map(|(name, value)| (name.to_string(), Self::from(value)))
                    .collect();
                out.insert("properties".to_string(), Self::Object(nested));
                if !p.required.is_empty() {
                    let required = p.required.iter().map(|s| Self::from(s.as_str())).collect();
                    out.insert("required".to_string(), Self::Array(required));
                }
            }
            Property::Boolean(_) | Property::Reference(_) => {}
        }

        meta.write_trailing(&mut out);
        Self::Object(out)
    }
}

impl Serialize for Property {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Property {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::try_from(value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_property_reads_constraints() {
        let property = Property::try_from(json!({
            "type": "string",
            "title": "Name",
            "minLength": 1,
            "maxLength": 63,
            "pattern": "^[a-z-]+$",
            "enum": ["alpha", "beta"]
        }))
        .unwrap();

        let Property::String(p) = property else {
            panic!("expected string property");
        };
        assert_eq!(p.meta.title.as_deref(), Some("Name"));
        assert_eq!(p.min_length, Some(1));
        assert_eq!(p.max_length, Some(63));
        assert_eq!(p.pattern.as_deref(), Some("^[a-z-]+$"));
        assert_eq!(p.allowed, vec!["alpha".to_string(), "beta".to_string()]);
    }

    #[test]
    fn test_flags_are_read_from_camel_case_keys() {
        let property = Property::try_from(json!({
            "type": "boolean",
            "encrypted": true,
            "readOnly": true,
            "recreateOnUpdate": true
        }))
        .unwrap();

        let meta = property.meta();
        assert!(meta.encrypted);
        assert!(meta.read_only);
        assert!(meta.recreate_on_update);
    }

    #[test]
    fn test_reference_without_type() {
        let property = Property::try_from(json!({"$ref": "/data/vcenter/networks"})).unwrap();
        assert_eq!(property, Property::reference("/data/vcenter/networks"));
        assert!(property.property_type().is_none());
    }

    #[test]
    fn test_missing_type_is_rejected() {
        let result = Property::try_from(json!({"title": "No type"}));
        assert_eq!(result, Err(PropertyError::MissingType));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = Property::try_from(json!({"type": "secret"}));
        assert!(matches!(
            result,
            Err(PropertyError::UnknownType { found }) if found == "secret"
        ));
    }

    #[test]
    fn test_non_object_descriptor_is_rejected() {
        let result = Property::try_from(json!([1, 2]));
        assert_eq!(result, Err(PropertyError::NotAnObject { found: "array" }));
    }

    #[test]
    fn test_wrongly_typed_field_is_rejected() {
        let result = Property::try_from(json!({"type": "string", "maxLength": "ten"}));
        assert!(matches!(
            result,
            Err(PropertyError::InvalidField { field: "maxLength", .. })
        ));
    }

    #[test]
    fn test_empty_nested_name_is_rejected() {
        let result = Property::try_from(json!({
            "type": "object",
            "properties": {"": {"type": "string"}}
        }));
        assert_eq!(result, Err(PropertyError::EmptyName));
    }

    #[test]
    fn test_large_integer_bounds_keep_their_digits() {
        let property: Property = serde_json::from_str(
            r#"{"type":"integer","maximum":123456789012345678901234567890}"#,
        )
        .unwrap();

        let encoded = serde_json::to_string(&property).unwrap();
        assert_eq!(
            encoded,
            r#"{"type":"integer","maximum":123456789012345678901234567890}"#
        );
    }

    #[test]
    fn test_unknown_keys_survive_as_extensions() {
        let property = Property::try_from(json!({
            "type": "string",
            "const": "fixed",
            "$data": "/other"
        }))
        .unwrap();

        let extensions = &property.meta().extensions;
        assert_eq!(extensions.get("const"), Some(&json!("fixed")));
        assert_eq!(extensions.get("$data"), Some(&json!("/other")));

        let value = Value::from(&property);
        assert_eq!(value.get("const"), Some(&json!("fixed")));
    }

    #[test]
    fn test_nested_object_properties_keep_wire_order() {
        let property: Property = serde_json::from_str(
            r#"{"type":"object","properties":{"zeta":{"type":"string"},"alpha":{"type":"integer"},"mid":{"type":"boolean"}},"required":["zeta"]}"#,
        )
        .unwrap();

        let Property::Object(object) = &property else {
            panic!("expected object property");
        };
        let names: Vec<&str> = object.properties.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(object.required, vec!["zeta".to_string()]);
    }

    #[test]
    fn test_encoding_uses_a_fixed_key_order() {
        let mut property = Property::string()
            .with_title("Flavor")
            .with_default("small");
        property.meta_mut().recreate_on_update = true;

        let encoded = serde_json::to_string(&property).unwrap();
        assert_eq!(
            encoded,
            r#"{"type":"string","title":"Flavor","default":"small","recreateOnUpdate":true}"#
        );
    }

    #[test]
    fn test_array_items_round_trip() {
        let original = Property::array(Property::integer().with_default(3));
        let restored = Property::try_from(Value::from(&original)).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_zero_value_is_untyped_string() {
        let zero = Property::default();
        assert_eq!(zero.property_type(), Some(PropertyType::String));
        assert_eq!(zero.meta(), &PropertyMeta::default());
    }

    #[test]
    fn test_property_type_parses_and_displays() {
        assert_eq!("array".parse::<PropertyType>().unwrap(), PropertyType::Array);
        assert_eq!(PropertyType::Object.to_string(), "object");
    }
}
