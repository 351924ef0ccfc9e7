//! Sensitive log fields
//!
//! A PII field is a key/value pair that declares itself sensitive. It is not
//! rendered when it is built: the logger that emits it resolves it against its
//! [`PiiMode`] at emission time.
//!
//! - [`PiiField`] follows the mode table: `none` keeps the value, `hash`
//!   replaces it with its SHA-256 hex digest, `mask` hands it to the
//!   process-wide [`MaskFunction`], `remove` drops the field.
//! - [`CustomPiiField`] carries its own resolver and ignores the table.
//!
//! ```
//! use piilog::pii::{pii, PiiMode, Resolve};
//!
//! let email = pii("email", "alice@example.com");
//! assert_eq!(email.resolve(PiiMode::None).value, "alice@example.com");
//! assert_eq!(email.resolve(PiiMode::Hash).value.len(), 64);
//! assert!(email.resolve(PiiMode::Remove).is_skip());
//! ```

pub mod field;
pub mod mask;
pub mod mode;

pub use field::{custom_pii, pii, resolver, CustomPiiField, PiiField, Resolve, ResolveFn, ResolvedField};
pub use mask::{clear_mask_fn, mask_fn, replace_mask_fn, set_mask_fn, MaskFunction};
pub use mode::PiiMode;
