//! Process-wide mask function
//!
//! The mask function is consulted by standard PII fields when a logger runs in
//! [`PiiMode::Mask`](super::PiiMode::Mask). It lives in a single slot that can
//! be replaced at any time; every resolution loads the slot when it runs, so a
//! resolution racing a replacement sees either the old or the new function,
//! never a torn value.
//!
//! The installed function may be called from many threads at once.

use super::field::ResolvedField;
use arc_swap::ArcSwapOption;
use std::fmt;
use std::sync::Arc;

static MASK_FN: ArcSwapOption<MaskFunction> = ArcSwapOption::const_empty();

/// A `(key, value) -> ResolvedField` masking strategy
pub struct MaskFunction {
    f: Box<dyn Fn(&str, &str) -> ResolvedField + Send + Sync>,
}

impl MaskFunction {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> ResolvedField + Send + Sync + 'static,
    {
        Self { f: Box::new(f) }
    }

    /// Mask a single key/value pair
    pub fn apply(&self, key: &str, value: &str) -> ResolvedField {
        (self.f)(key, value)
    }
}

impl fmt::Debug for MaskFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MaskFunction(..)")
    }
}

/// Install `f` as the process-wide mask function
///
/// # Example
///
/// ```
/// use piilog::pii::{self, PiiMode, ResolvedField, Resolve};
///
/// pii::set_mask_fn(|key, value| {
///     let visible: String = value.chars().take(2).collect();
///     ResolvedField::new(key, format!("{visible}***"))
/// });
///
/// let field = pii::pii("email", "alice@example.com");
/// assert_eq!(field.resolve(PiiMode::Mask).value, "al***");
/// # pii::clear_mask_fn();
/// ```
pub fn set_mask_fn<F>(f: F)
where
    F: Fn(&str, &str) -> ResolvedField + Send + Sync + 'static,
{
    MASK_FN.store(Some(Arc::new(MaskFunction::new(f))));
    tracing::debug!("PII mask function installed");
}

/// Replace the mask function, returning the previous one
pub fn replace_mask_fn(f: Option<Arc<MaskFunction>>) -> Option<Arc<MaskFunction>> {
    MASK_FN.swap(f)
}

/// Remove the mask function; mask-mode fields are omitted afterwards
pub fn clear_mask_fn() {
    MASK_FN.store(None);
}

/// The mask function in effect right now
pub fn mask_fn() -> Option<Arc<MaskFunction>> {
    MASK_FN.load_full()
}

/// Serializes tests that install or clear the process-wide mask function
#[cfg(test)]
pub(crate) fn test_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_set_and_clear() {
        let _guard = test_lock();

        set_mask_fn(|key, _| ResolvedField::new(key, "***"));
        let installed = mask_fn().expect("mask function installed");
        assert_eq!(installed.apply("k", "v"), ResolvedField::new("k", "***"));

        clear_mask_fn();
        assert!(mask_fn().is_none());
    }

    #[test]
    fn test_replace_returns_previous() {
        let _guard = test_lock();

        set_mask_fn(|_, _| ResolvedField::new("first", "1"));
        let previous = replace_mask_fn(Some(Arc::new(MaskFunction::new(|_, _| {
            ResolvedField::new("second", "2")
        }))));

        let previous = previous.expect("first function returned");
        assert_eq!(previous.apply("k", "v").key, "first");
        assert_eq!(mask_fn().unwrap().apply("k", "v").key, "second");

        clear_mask_fn();
    }

    #[test]
    fn test_concurrent_replacement_never_tears() {
        let _guard = test_lock();

        let writers: Vec<_> = (0..4)
            .map(|i| {
                thread::spawn(move || {
                    for n in 0..500 {
                        let tag = format!("{i}-{n}");
                        set_mask_fn(move |key, _| ResolvedField::new(key, tag.clone()));
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                thread::spawn(|| {
                    for _ in 0..500 {
                        if let Some(f) = mask_fn() {
                            let resolved = f.apply("user", "alice");
                            assert_eq!(resolved.key, "user");
                            assert!(resolved.value.contains('-'));
                        }
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.join().unwrap();
        }

        clear_mask_fn();
    }
}
