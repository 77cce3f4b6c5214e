//! Final cache key composition.

use std::fmt;

use cacheable_common::{CacheError, CacheResult};
use serde::Serialize;

use super::digest::args_digest;
use super::spec::KeySpec;

/// Separator between a namespace and a key.
pub const NAMESPACE_SEPARATOR: char = ':';

/// Separator between a method identity and its argument digest.
pub const DIGEST_SEPARATOR: char = '@';

/// Compose the final cache keys for one call.
///
/// - With a key spec, its keys are used as given.
/// - Without one, the sole key is `"<method>@<digest(args)>"`.
/// - With a namespace spec, every key is prefixed with `"<namespace>:"`
///   using the first namespace string produced. A namespace that produces no
///   string, or an empty one, adds no prefix. This holds for generators as
///   well as literals: a generator returning `""` yields `"key"`, never
///   `":key"`.
///
/// # Errors
/// Returns `CacheError::InvalidKey` if the key spec produced no keys, and
/// `CacheError::Serialization` if the arguments cannot be serialized.
pub fn compose_keys<A>(
    key: Option<&KeySpec<A>>,
    namespace: Option<&KeySpec<A>>,
    method: &str,
    args: &A,
) -> CacheResult<Vec<String>>
where
    A: Serialize + ?Sized,
{
    let keys = match key {
        Some(spec) => spec.resolve(args).into_vec(),
        None => vec![format!("{method}{DIGEST_SEPARATOR}{}", args_digest(args)?)],
    };

    if keys.is_empty() {
        return Err(CacheError::invalid_key(format!("key material for '{method}' is empty")));
    }

    let prefix = namespace
        .map(|spec| spec.resolve(args))
        .and_then(|set| set.first().filter(|ns| !ns.is_empty()).map(str::to_owned));

    Ok(match prefix {
        Some(ns) => keys.into_iter().map(|key| format!("{ns}{NAMESPACE_SEPARATOR}{key}")).collect(),
        None => keys,
    })
}

/// Key and namespace specs for one cached method.
///
/// Built once per method by the interception layer, then asked for the keys
/// of every call.
///
/// # Example
///
/// ```
/// use cacheable_core::{KeyComposer, KeySpec};
///
/// let composer = KeyComposer::<(u64,)>::new("UserService.find")
///     .with_namespace(KeySpec::literal("users"));
///
/// let keys = composer.compose(&(42,)).unwrap();
/// assert_eq!(keys.len(), 1);
/// assert!(keys[0].starts_with("users:UserService.find@"));
/// ```
pub struct KeyComposer<A: ?Sized> {
    method: String,
    key: Option<KeySpec<A>>,
    namespace: Option<KeySpec<A>>,
}

impl<A: ?Sized> Clone for KeyComposer<A> {
    fn clone(&self) -> Self {
        Self { method: self.method.clone(), key: self.key.clone(), namespace: self.namespace.clone() }
    }
}

impl<A: ?Sized> fmt::Debug for KeyComposer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyComposer")
            .field("method", &self.method)
            .field("key", &self.key)
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl<A> KeyComposer<A>
where
    A: Serialize + ?Sized,
{
    /// Composer deriving keys from `method` and the argument digest.
    pub fn new<M: Into<String>>(method: M) -> Self {
        Self { method: method.into(), key: None, namespace: None }
    }

    /// Use explicit key material instead of the argument digest.
    #[must_use]
    pub fn with_key(mut self, key: KeySpec<A>) -> Self {
        self.key = Some(key);
        self
    }

    /// Prefix every key with a namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: KeySpec<A>) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// Method identity used for derived keys.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// All keys for a call, in order.
    ///
    /// # Errors
    /// See [`compose_keys`].
    pub fn compose(&self, args: &A) -> CacheResult<Vec<String>> {
        compose_keys(self.key.as_ref(), self.namespace.as_ref(), &self.method, args)
    }

    /// The key the read path resolves against: the first composed key.
    ///
    /// # Errors
    /// See [`compose_keys`].
    pub fn primary_key(&self, args: &A) -> CacheResult<String> {
        self.compose(args)?
            .into_iter()
            .next()
            .ok_or_else(|| CacheError::invalid_key(format!("no key for '{}'", self.method)))
    }
}
