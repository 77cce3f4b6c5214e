use serde_json::Value;

/// Outcome of a cache read.
///
/// `Found(Value::Null)` is a cached `null` and short-circuits the computation
/// like any other value. Only `Missing` triggers a recompute.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// The store holds a value for the key
    Found(Value),
    /// The store has nothing for the key, or the read failed
    Missing,
}

impl CacheLookup {
    /// Map a store `get` result to a lookup.
    pub fn from_store(value: Option<Value>) -> Self {
        match value {
            Some(value) => Self::Found(value),
            None => Self::Missing,
        }
    }

    /// Returns `true` for `Found`, including a cached `null`.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The cached value, if any.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing => None,
        }
    }
}
