//! Checking candidate values against property descriptors.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::{Number, Value};

use super::errors::ValidationError;
use super::schema::json_kind;
use super::{
    ArrayProperty, NumericProperty, ObjectProperty, Property, PropertyType, StringProperty,
};

impl Property {
    /// Checks `value` against this descriptor's type and constraints.
    ///
    /// `null` is accepted for every type: an unset input is the caller's
    /// concern, not the descriptor's. References accept anything since their
    /// target lives on the platform.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found. Failures inside arrays
    /// and objects are wrapped in [`ValidationError::Nested`] with the
    /// element's index or name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use automation_provider::property::{Property, ValidationError};
    /// use serde_json::json;
    ///
    /// let cpu: Property = serde_json::from_value(json!({
    ///     "type": "integer", "minimum": 1, "maximum": 16
    /// }))
    /// .unwrap();
    ///
    /// assert!(cpu.validate(&json!(4)).is_ok());
    /// assert!(matches!(
    ///     cpu.validate(&json!(32)),
    ///     Err(ValidationError::AboveMaximum { .. })
    /// ));
    /// ```
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        if value.is_null() {
            return Ok(());
        }
        match self {
            Self::String(p) => validate_string(p, value),
            Self::Integer(p) => validate_number(p, PropertyType::Integer, value),
            Self::Number(p) => validate_number(p, PropertyType::Number, value),
            Self::Boolean(_) => match value {
                Value::Bool(_) => Ok(()),
                other => Err(mismatch(PropertyType::Boolean, other)),
            },
            Self::Array(p) => validate_array(p, value),
            Self::Object(p) => validate_object(p, value),
            Self::Reference(_) => Ok(()),
        }
    }
}

fn mismatch(expected: PropertyType, found: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        expected,
        found: json_kind(found),
    }
}

fn nested(path: String, source: ValidationError) -> ValidationError {
    ValidationError::Nested {
        path,
        source: Box::new(source),
    }
}

fn check_length(length: u64, min: Option<u64>, max: Option<u64>) -> Result<(), ValidationError> {
    if let Some(minimum) = min.filter(|&m| length < m) {
        return Err(ValidationError::TooShort { length, minimum });
    }
    if let Some(maximum) = max.filter(|&m| length > m) {
        return Err(ValidationError::TooLong { length, maximum });
    }
    Ok(())
}

fn validate_string(property: &StringProperty, value: &Value) -> Result<(), ValidationError> {
    let Value::String(s) = value else {
        return Err(mismatch(PropertyType::String, value));
    };

    let length = s.chars().count() as u64;
    check_length(length, property.min_length, property.max_length)?;

    if let Some(pattern) = &property.pattern {
        let regex = Regex::new(pattern).map_err(|source| ValidationError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        if !regex.is_match(s) {
            return Err(ValidationError::PatternMismatch {
                value: s.clone(),
                pattern: pattern.clone(),
            });
        }
    }

    if !property.allowed.is_empty() && !property.allowed.iter().any(|a| a == s) {
        return Err(ValidationError::NotAllowed {
            value: value.to_string(),
        });
    }
    Ok(())
}

/// A JSON number read from its source text as sign, significant digits and
/// a power of ten, so values past `u64` or `f64` precision compare exactly.
///
/// Leading and trailing zeros are stripped from `digits`, which is empty for
/// zero. Zero is never negative.
#[derive(Debug, PartialEq, Eq)]
struct Decimal {
    negative: bool,
    digits: Vec<u8>,
    exponent: i64,
}

impl Decimal {
    fn parse(n: &Number) -> Option<Self> {
        let text = n.to_string();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.as_str()),
        };
        let (mantissa, exponent) = match unsigned.split_once(|c: char| c == 'e' || c == 'E') {
            Some((mantissa, exponent)) => (mantissa, exponent.parse::<i64>().ok()?),
            None => (unsigned, 0),
        };
        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

        let mut digits: Vec<u8> = whole.bytes().chain(fraction.bytes()).collect();
        if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        let mut exponent = exponent.checked_sub(i64::try_from(fraction.len()).ok()?)?;

        let leading = digits.iter().take_while(|&&d| d == b'0').count();
        digits.drain(..leading);
        while digits.last() == Some(&b'0') {
            digits.pop();
            exponent = exponent.checked_add(1)?;
        }

        Some(Self {
            negative: negative && !digits.is_empty(),
            digits,
            exponent,
        })
    }

    /// Power of ten just above the most significant digit.
    fn magnitude(&self) -> i64 {
        let len = i64::try_from(self.digits.len()).unwrap_or(i64::MAX);
        self.exponent.saturating_add(len)
    }

    fn cmp_abs(&self, other: &Self) -> Ordering {
        match (self.digits.is_empty(), other.digits.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self
                .magnitude()
                .cmp(&other.magnitude())
                .then_with(|| self.digits.cmp(&other.digits)),
        }
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_abs(other),
            (true, true) => other.cmp_abs(self),
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare(a: &Number, b: &Number) -> Option<Ordering> {
    Some(Decimal::parse(a)?.cmp(&Decimal::parse(b)?))
}

/// Integers are written without a fraction or an exponent.
fn is_integer(n: &Number) -> bool {
    !n.to_string().contains(|c: char| matches!(c, '.' | 'e' | 'E'))
}

fn validate_number(
    property: &NumericProperty,
    kind: PropertyType,
    value: &Value,
) -> Result<(), ValidationError> {
    let n = match value {
        Value::Number(n) if kind == PropertyType::Number || is_integer(n) => n,
        other => return Err(mismatch(kind, other)),
    };

    if let Some(minimum) = &property.minimum {
        if compare(n, minimum) == Some(Ordering::Less) {
            return Err(ValidationError::BelowMinimum {
                value: n.clone(),
                minimum: minimum.clone(),
            });
        }
    }
    if let Some(maximum) = &property.maximum {
        if compare(n, maximum) == Some(Ordering::Greater) {
            return Err(ValidationError::AboveMaximum {
                value: n.clone(),
                maximum: maximum.clone(),
            });
        }
    }

    if !property.allowed.is_empty()
        && !property
            .allowed
            .iter()
            .any(|a| compare(a, n) == Some(Ordering::Equal))
    {
        return Err(ValidationError::NotAllowed {
            value: n.to_string(),
        });
    }
    Ok(())
}

fn validate_array(property: &ArrayProperty, value: &Value) -> Result<(), ValidationError> {
    let Value::Array(elements) = value else {
        return Err(mismatch(PropertyType::Array, value));
    };

    check_length(
        elements.len() as u64,
        property.min_items,
        property.max_items,
    )?;

    if let Some(items) = &property.items {
        for (index, element) in elements.iter().enumerate() {
            items
                .validate(element)
                .map_err(|source| nested(format!("[{index}]"), source))?;
        }
    }
    Ok(())
}

fn validate_object(property: &ObjectProperty, value: &Value) -> Result<(), ValidationError> {
    let Value::Object(fields) = value else {
        return Err(mismatch(PropertyType::Object, value));
    };

    if let Some(name) = property
        .required
        .iter()
        .find(|name| !fields.contains_key(name.as_str()))
    {
        return Err(ValidationError::MissingRequired { name: name.clone() });
    }

    for (name, descriptor) in &property.properties {
        if let Some(field) = fields.get(name) {
            descriptor
                .validate(field)
                .map_err(|source| nested(name.to_string(), source))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::OrderedPropertyMap;
    use serde_json::json;

    fn property(descriptor: Value) -> Property {
        Property::try_from(descriptor).unwrap()
    }

    #[test]
    fn test_type_mismatch() {
        let err = Property::boolean().validate(&json!("yes")).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TypeMismatch {
                expected: PropertyType::Boolean,
                found: "string"
            }
        ));
    }

    #[test]
    fn test_null_is_always_accepted() {
        assert!(Property::integer().validate(&Value::Null).is_ok());
    }

    #[test]
    fn test_integer_rejects_fractional_numbers() {
        assert!(Property::integer().validate(&json!(1.5)).is_err());
        assert!(Property::number().validate(&json!(1.5)).is_ok());
    }

    #[test]
    fn test_string_length_counts_characters() {
        let p = property(json!({"type": "string", "minLength": 2, "maxLength": 3}));
        assert!(p.validate(&json!("héé")).is_ok());
        assert!(matches!(
            p.validate(&json!("a")),
            Err(ValidationError::TooShort { length: 1, minimum: 2 })
        ));
        assert!(matches!(
            p.validate(&json!("abcd")),
            Err(ValidationError::TooLong { length: 4, maximum: 3 })
        ));
    }

    #[test]
    fn test_string_pattern() {
        let p = property(json!({"type": "string", "pattern": "^[a-z]+$"}));
        assert!(p.validate(&json!("web")).is_ok());
        assert!(matches!(
            p.validate(&json!("Web1")),
            Err(ValidationError::PatternMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let p = property(json!({"type": "string", "pattern": "(unclosed"}));
        assert!(matches!(
            p.validate(&json!("x")),
            Err(ValidationError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_string_enum() {
        let p = property(json!({"type": "string", "enum": ["small", "large"]}));
        assert!(p.validate(&json!("small")).is_ok());
        assert!(matches!(
            p.validate(&json!("medium")),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_large_integer_bounds_compare_exactly() {
        let p = property(json!({"type": "integer", "maximum": 9_007_199_254_740_993_u64}));
        assert!(p.validate(&json!(9_007_199_254_740_993_u64)).is_ok());
        assert!(matches!(
            p.validate(&json!(9_007_199_254_740_994_u64)),
            Err(ValidationError::AboveMaximum { .. })
        ));
    }

    #[test]
    fn test_integer_beyond_u64_is_an_integer() {
        let p: Property = serde_json::from_str(r#"{"type":"integer"}"#).unwrap();
        let value: Value = serde_json::from_str("123456789012345678901234567890").unwrap();

        assert!(p.validate(&value).is_ok());
        assert!(p.validate(&serde_json::from_str("1e30").unwrap()).is_err());
    }

    #[test]
    fn test_bounds_beyond_f64_precision_compare_exactly() {
        let p: Property =
            serde_json::from_str(r#"{"type":"number","maximum":123456789012345678901234567890}"#)
                .unwrap();
        let at: Value = serde_json::from_str("123456789012345678901234567890").unwrap();
        let above: Value = serde_json::from_str("123456789012345678901234567891").unwrap();

        assert!(p.validate(&at).is_ok());
        assert!(matches!(
            p.validate(&above),
            Err(ValidationError::AboveMaximum { .. })
        ));
    }

    #[test]
    fn test_enum_beyond_f64_precision_compares_exactly() {
        let p: Property = serde_json::from_str(
            r#"{"type":"integer","enum":[123456789012345678901234567890]}"#,
        )
        .unwrap();
        let listed: Value = serde_json::from_str("123456789012345678901234567890").unwrap();
        let neighbour: Value = serde_json::from_str("123456789012345678901234567891").unwrap();

        assert!(p.validate(&listed).is_ok());
        assert!(matches!(
            p.validate(&neighbour),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_decimal_ordering() {
        let decimal = |text: &str| Decimal::parse(&serde_json::from_str(text).unwrap()).unwrap();

        assert_eq!(decimal("1.50"), decimal("1.5"));
        assert_eq!(decimal("1.5e1"), decimal("15"));
        assert_eq!(decimal("-0.0"), decimal("0"));
        assert!(decimal("-1e2") < decimal("-99.5"));
        assert!(decimal("0.001") < decimal("0.01"));
        assert!(decimal("2") > decimal("15e-1"));
        assert!(decimal("-3") < decimal("0"));
    }

    #[test]
    fn test_negative_and_unsigned_compare() {
        let p = property(json!({"type": "integer", "minimum": -5, "maximum": u64::MAX}));
        assert!(p.validate(&json!(-5)).is_ok());
        assert!(p.validate(&json!(u64::MAX)).is_ok());
        assert!(matches!(
            p.validate(&json!(-6)),
            Err(ValidationError::BelowMinimum { .. })
        ));
    }

    #[test]
    fn test_numeric_enum() {
        let p = property(json!({"type": "number", "enum": [1, 2.5]}));
        assert!(p.validate(&json!(2.5)).is_ok());
        assert!(p.validate(&json!(3)).is_err());
    }

    #[test]
    fn test_array_items_report_index() {
        let mut p = Property::array(property(json!({"type": "integer", "minimum": 0})));
        if let Property::Array(array) = &mut p {
            array.max_items = Some(3);
        }

        assert!(p.validate(&json!([0, 1, 2])).is_ok());
        let err = p.validate(&json!([0, -1])).unwrap_err();
        assert_eq!(err.to_string(), "[1]: -1 is less than the minimum of 0");
        assert!(matches!(
            p.validate(&json!([0, 1, 2, 3])),
            Err(ValidationError::TooLong { length: 4, maximum: 3 })
        ));
    }

    #[test]
    fn test_object_required_and_nested() {
        let mut properties = OrderedPropertyMap::new();
        properties.set("name", Property::string());
        properties.set("port", property(json!({"type": "integer", "maximum": 65535})));
        let mut p = Property::object(properties);
        if let Property::Object(object) = &mut p {
            object.required.push("name".to_string());
        }

        assert!(p.validate(&json!({"name": "web", "port": 443})).is_ok());
        assert!(matches!(
            p.validate(&json!({"port": 443})),
            Err(ValidationError::MissingRequired { ref name }) if name == "name"
        ));
        let err = p
            .validate(&json!({"name": "web", "port": 70000}))
            .unwrap_err();
        assert!(err.to_string().starts_with("port: "));
    }

    #[test]
    fn test_reference_accepts_anything() {
        assert!(Property::reference("/remote").validate(&json!({"x": 1})).is_ok());
    }
}
