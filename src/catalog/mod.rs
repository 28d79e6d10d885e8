//! # Catalog
//!
//! Declares the list resources a process serves. Each resource becomes a
//! `ListEndpoint` plus the `MemoryTable` holding its rows. The catalog is
//! read once at startup; any invalid declaration stops the process before a
//! request is served.
//!
//! ```json
//! {
//!   "resources": {
//!     "shows": {
//!       "primary_key": { "name": "id", "type": "int" },
//!       "filters": [
//!         { "name": "genre", "type": "enum", "values": ["action", "drama"] },
//!         { "name": "tags", "type": "string", "array": true }
//!       ],
//!       "sorts": [{ "name": "rating", "type": "float", "nullable": true }],
//!       "default_sort": ["-rating"],
//!       "rows": []
//!     }
//!   }
//! }
//! ```

mod defs;
mod errors;

pub use defs::{CatalogDef, FilterDef, KeyDef, ResourceDef, SortDef};
pub use errors::{CatalogError, CatalogResult};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::endpoint::{ListEndpoint, DEFAULT_LIMIT, MAX_LIMIT};
use crate::executor::MemoryTable;
use crate::filter::{PropertyDescriptor, PropertyRegistry};
use crate::observability::{log_event_with_fields, Event};
use crate::sort::{SortRegistry, SortableDescriptor};
use crate::value::ValueType;

/// Limits applied to resources that declare none
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitDefaults {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for LimitDefaults {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

/// One served resource
#[derive(Debug, Clone)]
pub struct Resource {
    pub endpoint: ListEndpoint,
    pub table: MemoryTable,
}

/// All served resources, by name
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    resources: BTreeMap<String, Resource>,
}

impl Catalog {
    /// Reads and registers a catalog file
    pub fn load(path: &Path, limits: LimitDefaults) -> CatalogResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let def: CatalogDef = serde_json::from_str(&content)?;
        let catalog = Self::from_def(def, limits)?;

        let count = catalog.len().to_string();
        let path = path.display().to_string();
        log_event_with_fields(
            Event::CatalogLoaded,
            &[("path", path.as_str()), ("resources", count.as_str())],
        );
        Ok(catalog)
    }

    /// Registers every resource of a parsed catalog
    pub fn from_def(def: CatalogDef, limits: LimitDefaults) -> CatalogResult<Self> {
        let mut resources = BTreeMap::new();
        for (name, resource) in def.resources {
            let built = build_resource(&name, resource, limits)?;
            log_registered(&built.endpoint, built.table.len());
            resources.insert(name, built);
        }
        Ok(Self { resources })
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.resources.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

fn build_resource(name: &str, def: ResourceDef, limits: LimitDefaults) -> CatalogResult<Resource> {
    let registry_err = |source| CatalogError::Registry {
        resource: name.to_string(),
        source,
    };

    let mut properties = Vec::with_capacity(def.filters.len());
    for filter in def.filters {
        properties.push(property(name, filter)?);
    }
    let filters = PropertyRegistry::new(properties).map_err(registry_err)?;

    let keys = def.sorts.into_iter().map(sortable).collect();
    let primary_key = key(def.primary_key);
    let mut sorts = SortRegistry::new(keys, primary_key).map_err(registry_err)?;
    if !def.default_sort.is_empty() {
        sorts = sorts
            .with_default_sort(def.default_sort)
            .map_err(registry_err)?;
    }

    let endpoint = ListEndpoint::new(name, filters, sorts)
        .with_limits(
            def.default_limit.unwrap_or(limits.default_limit),
            def.max_limit.unwrap_or(limits.max_limit),
        )
        .map_err(registry_err)?;

    Ok(Resource {
        endpoint,
        table: MemoryTable::new(def.rows),
    })
}

fn property(resource: &str, def: FilterDef) -> CatalogResult<PropertyDescriptor> {
    let invalid = |reason: &str| CatalogError::InvalidProperty {
        resource: resource.to_string(),
        property: def.name.clone(),
        reason: reason.to_string(),
    };

    let mut desc = match (def.value_type, &def.values) {
        (ValueType::Enum, Some(values)) => PropertyDescriptor::enumeration(&def.name, values.clone()),
        (ValueType::Enum, None) => PropertyDescriptor::enumeration(&def.name, Vec::<String>::new()),
        (_, Some(_)) => return Err(invalid("values are only allowed on enum properties")),
        (value_type, None) => PropertyDescriptor::new(&def.name, value_type),
    };
    if def.array {
        desc = desc.array();
    }
    if let Some(column) = def.column {
        desc = desc.with_column(column);
    }
    Ok(desc)
}

fn sortable(def: SortDef) -> SortableDescriptor {
    let mut desc = SortableDescriptor::new(def.name, def.value_type);
    if def.nullable {
        desc = desc.nullable();
    }
    if let Some(column) = def.column {
        desc = desc.with_column(column);
    }
    desc
}

fn key(def: KeyDef) -> SortableDescriptor {
    let desc = SortableDescriptor::new(def.name, def.value_type);
    match def.column {
        Some(column) => desc.with_column(column),
        None => desc,
    }
}

fn log_registered(endpoint: &ListEndpoint, rows: usize) {
    let filters = endpoint.filters().names().join(",");
    let sorts = endpoint.sorts().names().join(",");
    let default_sort = endpoint.sorts().default_sort().join(",");
    let default_limit = endpoint.default_limit().to_string();
    let max_limit = endpoint.max_limit().to_string();
    let rows = rows.to_string();
    log_event_with_fields(
        Event::EndpointRegistered,
        &[
            ("resource", endpoint.name()),
            ("filters", filters.as_str()),
            ("sorts", sorts.as_str()),
            ("default_sort", default_sort.as_str()),
            ("default_limit", default_limit.as_str()),
            ("max_limit", max_limit.as_str()),
            ("primary_key", endpoint.sorts().primary_key().name.as_str()),
            ("rows", rows.as_str()),
        ],
    );
}
