//! Context Fingerprint Module
//!
//! Reduces a rendering context to a short, deterministic string used to tell
//! apart rendered-output cache entries of the same template.
//!
//! Object keys are visited in sorted order at every nesting level, so two
//! contexts that are equal as values hash identically no matter how they were
//! built. No other normalization is attempted: contexts with different key
//! sets or differently typed values are different cache keys.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde_json::Value;

// == Type Tags ==
// Distinct tags keep e.g. the string "1" and the number 1 apart.
const TAG_NULL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_NUMBER: u8 = 2;
const TAG_STRING: u8 = 3;
const TAG_ARRAY: u8 = 4;
const TAG_OBJECT: u8 = 5;

// == Fingerprint ==
/// Returns the 64-bit fingerprint of `context` as 16 lowercase hex digits.
pub fn fingerprint(context: &Value) -> String {
    let mut hasher = DefaultHasher::new();
    hash_value(context, &mut hasher);
    format!("{:016x}", hasher.finish())
}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => TAG_NULL.hash(state),
        Value::Bool(b) => {
            TAG_BOOL.hash(state);
            b.hash(state);
        }
        Value::Number(n) => {
            TAG_NUMBER.hash(state);
            // The canonical textual form distinguishes 1 from 1.0 the same
            // way serde_json does.
            n.to_string().hash(state);
        }
        Value::String(s) => {
            TAG_STRING.hash(state);
            s.hash(state);
        }
        Value::Array(items) => {
            TAG_ARRAY.hash(state);
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        Value::Object(map) => {
            TAG_OBJECT.hash(state);
            map.len().hash(state);
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            for key in keys {
                key.hash(state);
                hash_value(&map[key], state);
            }
        }
    }
}
