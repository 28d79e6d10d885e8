//! Sortable property declarations for one endpoint.

use std::collections::HashSet;

use crate::endpoint::RegistryError;
use crate::value::ValueType;

/// A property that may be named in a `sort` token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortableDescriptor {
    /// Request-facing name
    pub name: String,
    /// Storage column the ORDER BY and boundary reference
    pub column: String,
    pub value_type: ValueType,
    pub nullable: bool,
}

impl SortableDescriptor {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            value_type,
            nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }
}

/// The validated sortable set of an endpoint, with its primary key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRegistry {
    keys: Vec<SortableDescriptor>,
    primary_key: SortableDescriptor,
    default_sort: Vec<String>,
}

impl SortRegistry {
    /// Validates and builds a registry.
    ///
    /// The primary key must be non-nullable and of type `int` or `string`,
    /// and sortable names must be unique (case-insensitively).
    pub fn new(
        keys: Vec<SortableDescriptor>,
        primary_key: SortableDescriptor,
    ) -> Result<Self, RegistryError> {
        if primary_key.nullable {
            return Err(RegistryError::NullablePrimaryKey(primary_key.name));
        }
        if !matches!(primary_key.value_type, ValueType::Int | ValueType::Str) {
            return Err(RegistryError::UnsupportedPrimaryKey {
                name: primary_key.name,
                value_type: primary_key.value_type,
            });
        }
        let mut seen = HashSet::new();
        for key in &keys {
            if !seen.insert(key.name.to_ascii_lowercase()) {
                return Err(RegistryError::DuplicateProperty(key.name.clone()));
            }
        }
        Ok(Self {
            keys,
            primary_key,
            default_sort: Vec::new(),
        })
    }

    /// Sets the tokens used when a request names no sort.
    ///
    /// The tokens are resolved once here so that a bad default fails at
    /// registration instead of on every request.
    pub fn with_default_sort<I, S>(mut self, tokens: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_sort = tokens.into_iter().map(Into::into).collect();
        let none: [&str; 0] = [];
        super::resolve_with_seed(&none, &self, || 0)
            .map_err(|e| RegistryError::InvalidDefaultSort(e.to_string()))?;
        Ok(self)
    }

    /// Looks up a sortable key by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&SortableDescriptor> {
        self.keys.iter().find(|k| k.name.eq_ignore_ascii_case(name))
    }

    pub fn primary_key(&self) -> &SortableDescriptor {
        &self.primary_key
    }

    pub fn default_sort(&self) -> &[String] {
        &self.default_sort
    }

    /// Returns the sortable names in declaration order
    pub fn names(&self) -> Vec<String> {
        self.keys.iter().map(|k| k.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk() -> SortableDescriptor {
        SortableDescriptor::new("id", ValueType::Int)
    }

    #[test]
    fn test_nullable_primary_key_rejected() {
        let err = SortRegistry::new(Vec::new(), pk().nullable()).unwrap_err();
        assert_eq!(err, RegistryError::NullablePrimaryKey("id".into()));
    }

    #[test]
    fn test_float_primary_key_rejected() {
        let err = SortRegistry::new(Vec::new(), SortableDescriptor::new("id", ValueType::Float))
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnsupportedPrimaryKey { .. }));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = SortRegistry::new(
            vec![
                SortableDescriptor::new("name", ValueType::Str),
                SortableDescriptor::new("NAME", ValueType::Str),
            ],
            pk(),
        )
        .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateProperty("NAME".into()));
    }

    #[test]
    fn test_bad_default_sort_rejected() {
        let err = SortRegistry::new(vec![SortableDescriptor::new("name", ValueType::Str)], pk())
            .unwrap()
            .with_default_sort(["-rating"])
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDefaultSort(_)));
    }

    #[test]
    fn test_lookup() {
        let reg = SortRegistry::new(
            vec![SortableDescriptor::new("airDate", ValueType::Date).with_column("air_date")],
            pk(),
        )
        .unwrap();
        assert_eq!(reg.get("AIRDATE").unwrap().column, "air_date");
        assert_eq!(reg.names(), vec!["airDate"]);
    }
}
