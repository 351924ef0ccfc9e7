//! Leveled structured logging with PII resolution
//!
//! [`Logger`] is the entry point. Structured calls take a key/value sequence
//! built with [`args!`](crate::args):
//!
//! ```
//! use piilog::{args, infow, pii, Logger};
//!
//! let logger = Logger::nop();
//! logger.infow("order placed", args!["order_id", 1042, pii("email", "a@b.com")]);
//!
//! // Same record, plus the calling function under `func`
//! infow!(logger, "order placed", "order_id", 1042, pii("email", "a@b.com"));
//! ```

pub mod args;
pub mod global;
pub mod structured;

pub use args::{resolve_args, Arg, IGNORED_KEY};
pub use global::{global, set_global};
pub use structured::{Logger, LoggerBuilder};

/// Build a `Vec<Arg>` from plain values and PII fields
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::logger::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::logger::Arg::from($arg)),+]
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn here() {}
        fn name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = name_of(here);
        name.strip_suffix("::here").unwrap_or(name)
    }};
}

/// Structured debug record with the calling function under `func`
#[macro_export]
macro_rules! debugw {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.logw_in(
            $crate::domain::Level::Debug,
            ::std::convert::AsRef::<str>::as_ref(&$msg),
            $crate::args![$($arg),*],
            $crate::__function_path!(),
        )
    };
}

/// Structured info record with the calling function under `func`
#[macro_export]
macro_rules! infow {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.logw_in(
            $crate::domain::Level::Info,
            ::std::convert::AsRef::<str>::as_ref(&$msg),
            $crate::args![$($arg),*],
            $crate::__function_path!(),
        )
    };
}

/// Structured warn record with the calling function under `func`
#[macro_export]
macro_rules! warnw {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.logw_in(
            $crate::domain::Level::Warn,
            ::std::convert::AsRef::<str>::as_ref(&$msg),
            $crate::args![$($arg),*],
            $crate::__function_path!(),
        )
    };
}

/// Structured error record with the calling function under `func`
#[macro_export]
macro_rules! errorw {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.logw_in(
            $crate::domain::Level::Error,
            ::std::convert::AsRef::<str>::as_ref(&$msg),
            $crate::args![$($arg),*],
            $crate::__function_path!(),
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::backend::{JsonBackend, SharedBuffer, Sink};
    use crate::domain::Level;
    use crate::logger::Logger;
    use crate::pii::{pii, PiiMode};
    use std::sync::Arc;

    fn capture() -> (Logger, SharedBuffer) {
        let out = SharedBuffer::new();
        let backend = JsonBackend::new(Level::Debug, Sink::buffer(&out), Sink::buffer(&out));
        let logger = Logger::builder()
            .backend(Arc::new(backend))
            .pii_mode(PiiMode::Remove)
            .build();
        (logger, out)
    }

    #[test]
    fn test_macro_fills_func() {
        let (logger, out) = capture();

        crate::infow!(logger, "from macro", "n", 1, pii("email", "a@b.com"));

        let record = &out.records().unwrap()[0];
        assert_eq!(record["msg"], "from macro");
        assert_eq!(record["n"], 1);
        assert!(record.get("email").is_none());
        assert_eq!(
            record["func"],
            "piilog::logger::tests::test_macro_fills_func"
        );
    }

    #[test]
    fn test_macro_accepts_owned_message() {
        let (logger, out) = capture();

        crate::warnw!(logger, format!("attempt {}", 2));
        crate::debugw!(logger, "trailing comma", "k", "v",);

        let records = out.records().unwrap();
        assert_eq!(records[0]["msg"], "attempt 2");
        assert_eq!(records[0]["lvl"], "warn");
        assert_eq!(records[1]["k"], "v");
    }

    #[test]
    fn test_method_calls_leave_func_out() {
        let (logger, out) = capture();

        logger.errorw("no macro", crate::args![]);

        assert!(out.records().unwrap()[0].get("func").is_none());
    }
}
