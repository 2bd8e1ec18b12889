//! A keyed snapshot of game state.
//!
//! Formulas are generic over the state type, so a host normally passes its
//! own player struct. `StateSnapshot` is a ready-made alternative for hosts
//! that only have loosely typed data (a save file, a scripted test): a map
//! from key to JSON value with typed accessors.

use crate::numeric::{BigNumber, StatNumber};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;

/// JSON has no non-finite numbers, so they are stored under these names.
const INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";
const NAN: &str = "NaN";

fn non_finite_name(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some(NAN)
    } else if value == f64::INFINITY {
        Some(INFINITY)
    } else if value == f64::NEG_INFINITY {
        Some(NEG_INFINITY)
    } else {
        None
    }
}

fn parse_non_finite(name: &str) -> Option<f64> {
    match name {
        INFINITY => Some(f64::INFINITY),
        NEG_INFINITY => Some(f64::NEG_INFINITY),
        NAN => Some(f64::NAN),
        _ => None,
    }
}

/// The float behind `value` if it is one of the numeric types and is not
/// finite.
fn non_finite(value: &dyn Any) -> Option<f64> {
    let float = if let Some(v) = value.downcast_ref::<f64>() {
        *v
    } else if let Some(v) = value.downcast_ref::<f32>() {
        f64::from(*v)
    } else if let Some(v) = value.downcast_ref::<StatNumber>() {
        // a finite big number may still saturate to infinity as an f64
        return (!v.is_finite()).then(|| v.to_f64());
    } else if let Some(v) = value.downcast_ref::<BigNumber>() {
        v.mantissa()
    } else {
        return None;
    };
    (!float.is_finite()).then_some(float)
}

/// Loosely typed game state.
///
/// # Examples
///
/// ```rust
/// use statsheet::StateSnapshot;
/// use statsheet::numeric::{BigNumber, StatNumber};
///
/// let mut snapshot = StateSnapshot::new();
/// snapshot.set("ascensionCount", 12);
/// snapshot.set("unlocks.prestige", true);
/// snapshot.set("obtainium", BigNumber::new(3.0, 400));
///
/// assert_eq!(snapshot.number("ascensionCount"), StatNumber::Float(12.0));
/// assert_eq!(snapshot.number("obtainium"), StatNumber::Big(BigNumber::new(3.0, 400)));
/// assert!(snapshot.flag("unlocks.prestige"));
/// assert!(!snapshot.flag("unlocks.transcend"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    data: HashMap<String, serde_json::Value>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a flat JSON object.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Store a value. Values that cannot be serialized are not stored.
    ///
    /// Non-finite floats are kept as `"Infinity"`, `"-Infinity"` or
    /// `"NaN"`, which [`number`](Self::number) reads back.
    pub fn set<T: Serialize + Any>(&mut self, key: impl Into<String>, value: T) {
        let stored = match non_finite(&value).and_then(non_finite_name) {
            Some(name) => Ok(Value::from(name)),
            None => serde_json::to_value(value),
        };
        if let Ok(json_value) = stored {
            self.data.insert(key.into(), json_value);
        }
    }

    /// Read a value as `T`, `None` if absent or of another shape.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data.get(key).and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// A numeric value, zero when absent.
    ///
    /// The strings `"Infinity"`, `"-Infinity"` and `"NaN"` read as the
    /// matching non-finite float, so save files can carry uncapped values.
    pub fn number(&self, key: &str) -> StatNumber {
        if let Some(Value::String(name)) = self.data.get(key) {
            if let Some(value) = parse_non_finite(name) {
                return StatNumber::Float(value);
            }
        }
        self.get(key).unwrap_or(StatNumber::ZERO)
    }

    /// A boolean value, `false` when absent.
    ///
    /// Numbers count as set when non-zero, so `achievements.183 = 1` works
    /// as a flag.
    pub fn flag(&self, key: &str) -> bool {
        match self.data.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            _ => false,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
