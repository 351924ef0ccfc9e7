//! PII field variants and the resolution protocol

use super::mask::{mask_fn, MaskFunction};
use super::mode::PiiMode;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

/// The output of a resolution: a key/value pair ready to be written
///
/// An empty key means the field is omitted from the record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedField {
    pub key: String,
    pub value: String,
}

impl ResolvedField {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The omission marker
    pub fn skip() -> Self {
        Self::default()
    }

    /// Whether this field is dropped from the record
    pub fn is_skip(&self) -> bool {
        self.key.is_empty()
    }
}

/// Turns a sensitive field into its written form for a given mode
///
/// Resolution happens when the record is emitted, never when the field is
/// built, so the same field renders differently under differently configured
/// loggers.
pub trait Resolve {
    fn resolve(&self, mode: PiiMode) -> ResolvedField;
}

/// A sensitive key/value pair handled by the logger's PII mode
#[derive(Clone, PartialEq, Eq)]
pub struct PiiField {
    key: String,
    value: String,
}

impl PiiField {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Resolve against an explicit mask function instead of the process-wide one
    pub fn resolve_with(&self, mode: PiiMode, mask: Option<&MaskFunction>) -> ResolvedField {
        match mode {
            PiiMode::None => ResolvedField::new(self.key.as_str(), self.value.as_str()),
            PiiMode::Hash => ResolvedField::new(self.key.as_str(), hash(&self.value)),
            PiiMode::Mask => match mask {
                Some(mask) => mask.apply(&self.key, &self.value),
                None => ResolvedField::skip(),
            },
            PiiMode::Remove => ResolvedField::skip(),
        }
    }
}

impl Resolve for PiiField {
    fn resolve(&self, mode: PiiMode) -> ResolvedField {
        if mode == PiiMode::Mask {
            return self.resolve_with(mode, mask_fn().as_deref());
        }
        self.resolve_with(mode, None)
    }
}

// Debug output never carries the raw value.
impl fmt::Debug for PiiField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PiiField")
            .field("key", &self.key)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Signature of a custom resolver: `(mode, key, value) -> ResolvedField`
pub type ResolveFn = dyn Fn(PiiMode, &str, &str) -> ResolvedField + Send + Sync;

/// A sensitive key/value pair that brings its own resolver
///
/// The resolver receives the logger's mode and decides everything itself; the
/// standard mode table is never consulted.
#[derive(Clone)]
pub struct CustomPiiField {
    key: String,
    value: String,
    resolver: Arc<ResolveFn>,
}

impl CustomPiiField {
    /// Returns `None` when `key` or `value` is empty
    pub fn new<F>(key: impl Into<String>, value: impl Into<String>, resolver: F) -> Option<Self>
    where
        F: Fn(PiiMode, &str, &str) -> ResolvedField + Send + Sync + 'static,
    {
        custom_pii(key, value, Some(Arc::new(resolver)))
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Resolve for CustomPiiField {
    fn resolve(&self, mode: PiiMode) -> ResolvedField {
        (self.resolver)(mode, &self.key, &self.value)
    }
}

impl fmt::Debug for CustomPiiField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPiiField")
            .field("key", &self.key)
            .field("value", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Build a standard PII field
pub fn pii(key: impl Into<String>, value: impl Into<String>) -> PiiField {
    PiiField::new(key, value)
}

/// Build a PII field with a custom resolver
///
/// Returns `None` if the key is empty, the value is empty, or no resolver is
/// given. A `None` passed to a logger is silently dropped, so call sites never
/// need error handling.
///
/// # Example
///
/// ```
/// use piilog::pii::{custom_pii, resolver, PiiMode, Resolve, ResolvedField};
///
/// let card = custom_pii(
///     "card",
///     "4111111111111111",
///     Some(resolver(|mode, key, value| match mode {
///         PiiMode::None => ResolvedField::new(key, value),
///         _ => ResolvedField::new(key, format!("****{}", &value[value.len() - 4..])),
///     })),
/// )
/// .unwrap();
///
/// assert_eq!(card.resolve(PiiMode::Hash).value, "****1111");
/// assert!(custom_pii("card", "", Some(resolver(|_, k, v| ResolvedField::new(k, v)))).is_none());
/// ```
pub fn custom_pii(
    key: impl Into<String>,
    value: impl Into<String>,
    resolver: Option<Arc<ResolveFn>>,
) -> Option<CustomPiiField> {
    let key = key.into();
    let value = value.into();
    let resolver = resolver?;
    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some(CustomPiiField {
        key,
        value,
        resolver,
    })
}

/// Box a closure as a custom resolver
pub fn resolver<F>(f: F) -> Arc<ResolveFn>
where
    F: Fn(PiiMode, &str, &str) -> ResolvedField + Send + Sync + 'static,
{
    Arc::new(f)
}

/// SHA-256 of the raw bytes, lowercase hex
fn hash(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}
