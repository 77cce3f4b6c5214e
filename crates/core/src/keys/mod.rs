//! Cache key composition.
//!
//! Turns explicit key material, or a method identity plus its arguments,
//! into the final key strings the coalescer and the store operate on. Pure
//! and deterministic: no I/O, same inputs give the same keys.
//!
//! ```
//! use cacheable_core::keys::{compose_keys, KeySpec};
//!
//! let key = KeySpec::<()>::literal("k");
//! let namespace = KeySpec::<()>::generator(|_| "ns");
//! assert_eq!(compose_keys(Some(&key), Some(&namespace), "m", &()).unwrap(), vec!["ns:k"]);
//! ```

mod composer;
mod digest;
mod spec;

pub use composer::{compose_keys, KeyComposer, DIGEST_SEPARATOR, NAMESPACE_SEPARATOR};
pub use digest::{args_digest, canonical_args, DIGEST_BYTES};
pub use spec::{KeyGenerator, KeySet, KeySpec};
