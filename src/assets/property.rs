//! Typed property extraction over the loosely-typed document tree.
//!
//! Every entity constructor reads its fields through a [`PropertyReader`],
//! so that a missing key, a type mismatch or an ambiguous case-insensitive
//! match is reported with the property name, the entity type and the
//! operation that was reading it.

use std::path::PathBuf;

use crate::core::errors::ParseError;
use crate::core::value::{Lookup, Map, Value};

static EMPTY_MAP: Map = Map::EMPTY;
static NULL: Value = Value::Null;

/// Conversion from a tree node into a typed property value.
pub trait FromValue<'a>: Sized {
    /// Description used in type mismatch errors.
    const EXPECTED: &'static str;

    fn from_value(value: &'a Value) -> Option<Self>;

    /// Value returned for an absent optional property.
    fn default_value() -> Self;
}

impl<'a> FromValue<'a> for &'a Value {
    const EXPECTED: &'static str = "a value";

    fn from_value(value: &'a Value) -> Option<Self> {
        Some(value)
    }

    fn default_value() -> Self {
        &NULL
    }
}

impl<'a> FromValue<'a> for &'a str {
    const EXPECTED: &'static str = "a string";

    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_str()
    }

    fn default_value() -> Self {
        ""
    }
}

impl<'a> FromValue<'a> for String {
    const EXPECTED: &'static str = "a string";

    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn default_value() -> Self {
        String::new()
    }
}

impl<'a> FromValue<'a> for PathBuf {
    const EXPECTED: &'static str = "a path string";

    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_str().map(PathBuf::from)
    }

    fn default_value() -> Self {
        PathBuf::new()
    }
}

impl<'a> FromValue<'a> for bool {
    const EXPECTED: &'static str = "a boolean";

    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_bool()
    }

    fn default_value() -> Self {
        false
    }
}

impl<'a> FromValue<'a> for i64 {
    const EXPECTED: &'static str = "an integer";

    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_i64()
    }

    fn default_value() -> Self {
        0
    }
}

impl<'a> FromValue<'a> for &'a [Value] {
    const EXPECTED: &'static str = "a list";

    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_list()
    }

    fn default_value() -> Self {
        &[]
    }
}

impl<'a> FromValue<'a> for &'a Map {
    const EXPECTED: &'static str = "a map";

    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_map()
    }

    fn default_value() -> Self {
        &EMPTY_MAP
    }
}

impl<'a> FromValue<'a> for Vec<String> {
    const EXPECTED: &'static str = "a list of strings";

    fn from_value(value: &'a Value) -> Option<Self> {
        value
            .as_list()?
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect()
    }

    fn default_value() -> Self {
        Vec::new()
    }
}

/// Reads typed properties from one entity's map.
#[derive(Debug, Clone, Copy)]
pub struct PropertyReader<'a> {
    map: &'a Map,
    entity: &'static str,
    operation: &'static str,
    case_sensitive: bool,
}

impl<'a> PropertyReader<'a> {
    pub fn new(map: &'a Map, entity: &'static str, operation: &'static str) -> Self {
        PropertyReader {
            map,
            entity,
            operation,
            case_sensitive: true,
        }
    }

    /// Reader over `value`, which must itself be a map.
    pub fn for_value(
        value: &'a Value,
        entity: &'static str,
        operation: &'static str,
    ) -> Result<Self, ParseError> {
        match value.as_map() {
            Some(map) => Ok(PropertyReader::new(map, entity, operation)),
            None => Err(ParseError::TypeMismatch {
                property: "<self>".to_string(),
                entity,
                operation,
                expected: "a map",
                found: value.kind(),
            }),
        }
    }

    /// Match keys ignoring ASCII case from now on.
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    pub fn map(&self) -> &'a Map {
        self.map
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Look up `name` and convert it to `T`.
    ///
    /// When `optional` is set, an absent (or null) key yields
    /// `T::default_value()`; otherwise absence is an error. A type mismatch
    /// or an ambiguous case-insensitive match is always an error.
    pub fn get_property<T: FromValue<'a>>(
        &self,
        name: &str,
        case_sensitive: bool,
        optional: bool,
    ) -> Result<T, ParseError> {
        match self.lookup::<T>(name, case_sensitive)? {
            Some(value) => Ok(value),
            None if optional => Ok(T::default_value()),
            None => Err(ParseError::MissingProperty {
                property: name.to_string(),
                entity: self.entity,
                operation: self.operation,
            }),
        }
    }

    fn lookup<T: FromValue<'a>>(
        &self,
        name: &str,
        case_sensitive: bool,
    ) -> Result<Option<T>, ParseError> {
        let value = match self.map.lookup(name, case_sensitive) {
            Lookup::Found(value) if value.is_null() => return Ok(None),
            Lookup::Found(value) => value,
            Lookup::Missing => return Ok(None),
            Lookup::Ambiguous(keys) => {
                return Err(ParseError::AmbiguousProperty {
                    property: name.to_string(),
                    entity: self.entity,
                    operation: self.operation,
                    candidates: keys.into_iter().map(str::to_string).collect(),
                })
            }
        };

        T::from_value(value)
            .map(Some)
            .ok_or_else(|| ParseError::TypeMismatch {
                property: name.to_string(),
                entity: self.entity,
                operation: self.operation,
                expected: T::EXPECTED,
                found: value.kind(),
            })
    }

    /// A required property.
    pub fn required<T: FromValue<'a>>(&self, name: &str) -> Result<T, ParseError> {
        self.get_property(name, self.case_sensitive, false)
    }

    /// An optional property, defaulted when absent.
    pub fn optional<T: FromValue<'a>>(&self, name: &str) -> Result<T, ParseError> {
        self.get_property(name, self.case_sensitive, true)
    }

    /// An optional property, `None` when absent.
    pub fn maybe<T: FromValue<'a>>(&self, name: &str) -> Result<Option<T>, ParseError> {
        self.lookup(name, self.case_sensitive)
    }

    pub fn string(&self, name: &str) -> Result<&'a str, ParseError> {
        self.required(name)
    }

    pub fn optional_string(&self, name: &str) -> Result<Option<&'a str>, ParseError> {
        self.maybe(name)
    }

    pub fn optional_bool(&self, name: &str) -> Result<bool, ParseError> {
        self.optional(name)
    }

    pub fn optional_list(&self, name: &str) -> Result<&'a [Value], ParseError> {
        self.optional(name)
    }

    pub fn map_property(&self, name: &str) -> Result<&'a Map, ParseError> {
        self.required(name)
    }

    pub fn optional_map(&self, name: &str) -> Result<&'a Map, ParseError> {
        self.optional(name)
    }

    /// An invalid-value error for `property` of this entity.
    pub fn invalid(&self, property: &str, reason: impl Into<String>) -> ParseError {
        ParseError::InvalidValue {
            property: property.to_string(),
            entity: self.entity,
            operation: self.operation,
            reason: reason.into(),
        }
    }
}

/// Build one child entity per entry of `map`, stopping at the first error.
///
/// Errors are wrapped with `entity` and the entry key.
pub fn parse_entries<'a, T>(
    map: &'a Map,
    entity: &'static str,
    mut build: impl FnMut(&'a str, &'a Value) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    map.iter()
        .map(|(key, value)| build(key, value).map_err(|e| e.in_entity(entity, key)))
        .collect()
}

/// Keys of a map whose values carry no information (`{"path": {}}` style).
pub fn key_list(map: &Map) -> Vec<String> {
    map.keys().map(str::to_string).collect()
}
