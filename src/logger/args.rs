//! Structured log arguments
//!
//! Structured emission takes an interleaved key/value sequence. Plain values
//! are [`Arg::Value`]; sensitive fields are [`Arg::Pii`] and
//! [`Arg::CustomPii`]; a custom field whose construction failed arrives as
//! [`Arg::Absent`].
//!
//! Scanning rules:
//! - a PII field stands for a whole key/value field. Placed after a plain key
//!   it takes that key's place, so `["user", pii("email", v)]` renders as
//!   `email` (or nothing, if the mode omits it).
//! - a plain key followed by a plain value renders as `key: value`
//! - a pair whose key is not a string is not rendered as a field; it is kept
//!   as `[key, value]` in the `ignored` list, as is a trailing key without a
//!   value
//! - [`Arg::Absent`] and omitted resolutions vanish

use crate::backend::Fields;
use crate::pii::{CustomPiiField, MaskFunction, PiiField, PiiMode, Resolve, ResolvedField};
use serde_json::Value;

/// Key of the list of arguments that could not form a field
pub const IGNORED_KEY: &str = "ignored";

/// One element of a structured key/value sequence
#[derive(Debug, Clone)]
pub enum Arg {
    Value(Value),
    Pii(PiiField),
    CustomPii(CustomPiiField),
    Absent,
}

macro_rules! impl_from_for_arg {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_from_for_arg!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String, &str, Value,
);

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Value(Value::from(value.as_str()))
    }
}

impl From<PiiField> for Arg {
    fn from(field: PiiField) -> Self {
        Arg::Pii(field)
    }
}

impl From<CustomPiiField> for Arg {
    fn from(field: CustomPiiField) -> Self {
        Arg::CustomPii(field)
    }
}

impl From<Option<CustomPiiField>> for Arg {
    fn from(field: Option<CustomPiiField>) -> Self {
        field.map_or(Arg::Absent, Arg::CustomPii)
    }
}

impl From<Option<PiiField>> for Arg {
    fn from(field: Option<PiiField>) -> Self {
        field.map_or(Arg::Absent, Arg::Pii)
    }
}

enum Scanned {
    Plain(Value),
    Field(Option<ResolvedField>),
}

impl Arg {
    fn scan(self, mode: PiiMode, mask: Option<&MaskFunction>) -> Scanned {
        match self {
            Arg::Value(value) => Scanned::Plain(value),
            Arg::Pii(field) => Scanned::Field(Some(match mask {
                Some(mask) => field.resolve_with(mode, Some(mask)),
                None => field.resolve(mode),
            })),
            Arg::CustomPii(field) => Scanned::Field(Some(field.resolve(mode))),
            Arg::Absent => Scanned::Field(None),
        }
    }
}

/// Resolve every field in `args` for `mode` and pair up the plain keys and values
///
/// `mask` overrides the process-wide mask function when given.
pub fn resolve_args<I>(mode: PiiMode, mask: Option<&MaskFunction>, args: I) -> Fields
where
    I: IntoIterator<Item = Arg>,
{
    let mut fields = Fields::new();
    let mut ignored = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.scan(mode, mask) {
            Scanned::Field(resolved) => push_resolved(&mut fields, resolved),
            Scanned::Plain(key) => match args.next().map(|value| value.scan(mode, mask)) {
                Some(Scanned::Plain(value)) => match key {
                    Value::String(key) => fields.push((key, value)),
                    key => ignored.push(Value::Array(vec![key, value])),
                },
                Some(Scanned::Field(resolved)) => push_resolved(&mut fields, resolved),
                None => ignored.push(key),
            },
        }
    }

    if !ignored.is_empty() {
        fields.push((IGNORED_KEY.to_string(), Value::Array(ignored)));
    }
    fields
}

fn push_resolved(fields: &mut Fields, resolved: Option<ResolvedField>) {
    if let Some(field) = resolved.filter(|field| !field.is_skip()) {
        fields.push((field.key, Value::String(field.value)));
    }
}
