//! Macros for reducing boilerplate code
//!
//! Configuration enums are read from environment variables and config files
//! as short lowercase labels. These macros generate the label conversions.

/// Implements `Display` and `FromStr` for label-style configuration enums
///
/// Each variant maps to one canonical label (used by `Display`) and any
/// number of aliases accepted by `FromStr`. Parsing is case-insensitive and
/// ignores surrounding whitespace.
///
/// # Example
///
/// ```rust
/// use cacheable_common::impl_label_conversions;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// pub enum Backend {
///     Memory,
///     Remote,
/// }
///
/// impl_label_conversions!(Backend {
///     Memory => "memory" | "in-memory",
///     Remote => "remote",
/// });
///
/// assert_eq!(Backend::Memory.to_string(), "memory");
/// assert_eq!("In-Memory".parse::<Backend>(), Ok(Backend::Memory));
/// ```
#[macro_export]
macro_rules! impl_label_conversions {
    ($enum_name:ident { $($variant:ident => $label:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($label),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($label $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
