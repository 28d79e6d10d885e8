//! Cursor wire format.
//!
//! A token is the base64url (no padding) encoding of a JSON array holding
//! one entry per sort key followed by the primary key. For a random sort
//! the array is `[hash(seed, pk), pk]`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::Value as JsonValue;

use super::errors::{CursorError, CursorResult};
use crate::sort::{seeded_hash, SortSpec};
use crate::value::{Value, ValueType};

// Upper bound on untrusted token input
const MAX_TOKEN_LEN: usize = 4096;

/// Boundary values of the last row of a page
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    values: Vec<Option<Value>>,
}

impl Cursor {
    pub fn new(values: Vec<Option<Value>>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The primary-key value, always the last entry
    pub fn primary_key(&self) -> Option<&Value> {
        self.values.last().and_then(Option::as_ref)
    }
}

struct Slot<'a> {
    name: &'a str,
    column: &'a str,
    value_type: ValueType,
    nullable: bool,
}

/// Describes each cursor position for a sort (random marker excluded)
fn slots(spec: &SortSpec) -> Vec<Slot<'_>> {
    spec.keys()
        .iter()
        .chain(std::iter::once(spec.primary_key()))
        .map(|k| Slot {
            name: &k.name,
            column: k.column(),
            value_type: k.value_type,
            nullable: k.nullable,
        })
        .collect()
}

fn read_slot(row: &JsonValue, slot: &Slot<'_>) -> CursorResult<Option<Value>> {
    match row.get(slot.column) {
        None | Some(JsonValue::Null) if slot.nullable => Ok(None),
        None | Some(JsonValue::Null) => Err(CursorError::MissingField {
            key: slot.name.to_string(),
        }),
        Some(field) => Value::from_json(field, slot.value_type)
            .map(Some)
            .ok_or_else(|| CursorError::InvalidField {
                key: slot.name.to_string(),
            }),
    }
}

/// Reads the boundary tuple of a row for the given sort
pub fn extract(row: &JsonValue, spec: &SortSpec) -> CursorResult<Cursor> {
    let slots = slots(spec);
    match spec.random_seed() {
        Some(seed) => {
            let pk_slot = &slots[slots.len() - 1];
            let pk = read_slot(row, pk_slot)?.ok_or_else(|| CursorError::MissingField {
                key: pk_slot.name.to_string(),
            })?;
            Ok(Cursor::new(vec![Some(Value::Int(seeded_hash(seed, &pk))), Some(pk)]))
        }
        None => {
            let values = slots
                .iter()
                .map(|slot| read_slot(row, slot))
                .collect::<CursorResult<Vec<_>>>()?;
            Ok(Cursor::new(values))
        }
    }
}

/// Serializes a cursor into an opaque token
pub fn encode_cursor(cursor: &Cursor) -> String {
    let array: Vec<JsonValue> = cursor
        .values
        .iter()
        .map(|v| v.as_ref().map_or(JsonValue::Null, Value::to_json))
        .collect();
    let json = JsonValue::Array(array).to_string();
    URL_SAFE_NO_PAD.encode(json.as_bytes())
}

/// Encodes the boundary of `row` under `spec`
pub fn encode(row: &JsonValue, spec: &SortSpec) -> CursorResult<String> {
    Ok(encode_cursor(&extract(row, spec)?))
}

/// Decodes a token issued for `spec`.
///
/// Any token that is not exactly the tuple `spec` would produce is
/// `Malformed`: bad base64 or JSON, wrong arity, wrong value types, NULL in
/// a non-nullable slot, or a random marker issued under another seed.
pub fn decode(token: &str, spec: &SortSpec) -> CursorResult<Cursor> {
    if token.is_empty() {
        return Err(CursorError::malformed("empty token"));
    }
    if token.len() > MAX_TOKEN_LEN {
        return Err(CursorError::malformed(format!(
            "token exceeds {} characters",
            MAX_TOKEN_LEN
        )));
    }
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| CursorError::malformed("token is not base64url"))?;
    let array: Vec<JsonValue> = serde_json::from_slice(&bytes)
        .map_err(|_| CursorError::malformed("token does not hold a JSON array"))?;

    if array.len() != spec.cursor_arity() {
        return Err(CursorError::malformed(format!(
            "expected {} values, found {}",
            spec.cursor_arity(),
            array.len()
        )));
    }

    let slots = slots(spec);
    match spec.random_seed() {
        Some(seed) => {
            let marker = decode_value(&array[0], "random", ValueType::Int, false)?;
            let pk_slot = &slots[slots.len() - 1];
            let pk = decode_value(&array[1], pk_slot.name, pk_slot.value_type, false)?;
            if let (Some(Value::Int(marker)), Some(pk)) = (&marker, &pk) {
                if *marker != seeded_hash(seed, pk) {
                    return Err(CursorError::malformed(
                        "cursor was issued for a different random seed",
                    ));
                }
            }
            Ok(Cursor::new(vec![marker, pk]))
        }
        None => {
            let values = array
                .iter()
                .zip(slots.iter())
                .map(|(json, slot)| decode_value(json, slot.name, slot.value_type, slot.nullable))
                .collect::<CursorResult<Vec<_>>>()?;
            Ok(Cursor::new(values))
        }
    }
}

fn decode_value(
    json: &JsonValue,
    name: &str,
    value_type: ValueType,
    nullable: bool,
) -> CursorResult<Option<Value>> {
    if json.is_null() {
        if nullable {
            return Ok(None);
        }
        return Err(CursorError::malformed(format!("'{}' cannot be null", name)));
    }
    Value::from_json(json, value_type)
        .map(Some)
        .ok_or_else(|| CursorError::malformed(format!("'{}' is not a valid {}", name, value_type)))
}
