//! Filterable property declarations for one endpoint.

use std::collections::HashSet;

use crate::endpoint::RegistryError;
use crate::value::ValueType;

/// A property that may appear in a filter expression
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    /// Request-facing name
    pub name: String,
    /// Storage column the predicate is emitted against
    pub column: String,
    pub declared_type: ValueType,
    /// Array-valued column, only tested for membership
    pub is_array: bool,
    /// Allowed members when `declared_type` is `Enum`
    pub enum_values: Option<Vec<String>>,
}

impl PropertyDescriptor {
    /// Creates a scalar property stored in a column of the same name
    pub fn new(name: impl Into<String>, declared_type: ValueType) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            declared_type,
            is_array: false,
            enum_values: None,
        }
    }

    /// Creates an enum property with its allowed members
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut desc = Self::new(name, ValueType::Enum);
        desc.enum_values = Some(values.into_iter().map(Into::into).collect());
        desc
    }

    /// Marks the property as array-valued
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Overrides the storage column
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Finds the declared spelling of an enum member, ignoring case
    pub fn enum_member(&self, value: &str) -> Option<&str> {
        self.enum_values
            .as_ref()?
            .iter()
            .find(|v| v.eq_ignore_ascii_case(value))
            .map(String::as_str)
    }
}

/// The validated set of filterable properties of an endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyRegistry {
    properties: Vec<PropertyDescriptor>,
}

impl PropertyRegistry {
    /// Validates and builds a registry.
    ///
    /// Names must be unique (case-insensitively) and enum properties must
    /// declare at least one member.
    pub fn new(properties: Vec<PropertyDescriptor>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for prop in &properties {
            if !seen.insert(prop.name.to_ascii_lowercase()) {
                return Err(RegistryError::DuplicateProperty(prop.name.clone()));
            }
            if prop.declared_type == ValueType::Enum
                && prop.enum_values.as_ref().map_or(true, Vec::is_empty)
            {
                return Err(RegistryError::EmptyEnum(prop.name.clone()));
            }
        }
        Ok(Self { properties })
    }

    /// Looks up a property by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Returns the declared names in declaration order
    pub fn names(&self) -> Vec<String> {
        self.properties.iter().map(|p| p.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let reg = PropertyRegistry::new(vec![PropertyDescriptor::new("airDate", ValueType::Date)])
            .unwrap();
        assert_eq!(reg.get("airdate").unwrap().name, "airDate");
        assert!(reg.get("air").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = PropertyRegistry::new(vec![
            PropertyDescriptor::new("year", ValueType::Int),
            PropertyDescriptor::new("Year", ValueType::Int),
        ])
        .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateProperty("Year".into()));
    }

    #[test]
    fn test_enum_without_members_rejected() {
        let err = PropertyRegistry::new(vec![PropertyDescriptor::new("genre", ValueType::Enum)])
            .unwrap_err();
        assert_eq!(err, RegistryError::EmptyEnum("genre".into()));

        let empty: Vec<String> = Vec::new();
        let err = PropertyRegistry::new(vec![PropertyDescriptor::enumeration("genre", empty)])
            .unwrap_err();
        assert_eq!(err, RegistryError::EmptyEnum("genre".into()));
    }

    #[test]
    fn test_enum_member_normalized() {
        let genre = PropertyDescriptor::enumeration("genre", ["Action", "Drama"]);
        assert_eq!(genre.enum_member("action"), Some("Action"));
        assert_eq!(genre.enum_member("comedy"), None);
    }
}
