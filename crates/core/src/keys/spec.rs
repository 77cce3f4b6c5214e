//! Key material supplied by callers.

use std::fmt;
use std::sync::Arc;

/// An ordered set of cache key strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeySet(Vec<String>);

impl KeySet {
    /// Create a key set from any collection of strings.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    /// First key, if any.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Returns `true` if the set holds no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of keys in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate the keys in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Consume the set into its keys.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for KeySet {
    fn from(key: &str) -> Self {
        Self(vec![key.to_owned()])
    }
}

impl From<String> for KeySet {
    fn from(key: String) -> Self {
        Self(vec![key])
    }
}

impl From<Vec<String>> for KeySet {
    fn from(keys: Vec<String>) -> Self {
        Self(keys)
    }
}

impl From<Vec<&str>> for KeySet {
    fn from(keys: Vec<&str>) -> Self {
        Self::new(keys)
    }
}

impl<const N: usize> From<[&str; N]> for KeySet {
    fn from(keys: [&str; N]) -> Self {
        Self::new(keys)
    }
}

impl FromIterator<String> for KeySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Function producing key material from a call's arguments.
pub type KeyGenerator<A> = Arc<dyn Fn(&A) -> KeySet + Send + Sync>;

/// Key or namespace material: a fixed value, or a generator over the args.
pub enum KeySpec<A: ?Sized> {
    /// Used verbatim
    Literal(KeySet),
    /// Invoked with the call's arguments
    Generator(KeyGenerator<A>),
}

impl<A: ?Sized> KeySpec<A> {
    /// Fixed key material.
    pub fn literal<K: Into<KeySet>>(keys: K) -> Self {
        Self::Literal(keys.into())
    }

    /// Key material computed from the arguments of each call.
    pub fn generator<F, K>(generate: F) -> Self
    where
        F: Fn(&A) -> K + Send + Sync + 'static,
        K: Into<KeySet>,
    {
        Self::Generator(Arc::new(move |args: &A| generate(args).into()))
    }

    /// Produce the key set for one call.
    pub fn resolve(&self, args: &A) -> KeySet {
        match self {
            Self::Literal(keys) => keys.clone(),
            Self::Generator(generate) => generate(args),
        }
    }
}

impl<A: ?Sized> Clone for KeySpec<A> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(keys) => Self::Literal(keys.clone()),
            Self::Generator(generate) => Self::Generator(Arc::clone(generate)),
        }
    }
}

impl<A: ?Sized> fmt::Debug for KeySpec<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(keys) => f.debug_tuple("Literal").field(keys).finish(),
            Self::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

impl<A: ?Sized> From<&str> for KeySpec<A> {
    fn from(key: &str) -> Self {
        Self::literal(key)
    }
}

impl<A: ?Sized> From<String> for KeySpec<A> {
    fn from(key: String) -> Self {
        Self::literal(key)
    }
}
