//! Process-wide logger
//!
//! Until [`set_global`] is called the global logger writes JSON to
//! stdout/stderr at debug level with PII mode `none`.

use super::args::Arg;
use super::structured::Logger;
use crate::config::Configuration;
use crate::domain::Result;
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<ArcSwap<Logger>> = OnceLock::new();

fn slot() -> &'static ArcSwap<Logger> {
    GLOBAL.get_or_init(|| ArcSwap::from_pointee(Logger::must_new(&Configuration::default())))
}

/// The current global logger
pub fn global() -> Arc<Logger> {
    slot().load_full()
}

/// Replace the global logger, returning the previous one
///
/// Calls already in flight finish on the logger they started with.
pub fn set_global(logger: Logger) -> Arc<Logger> {
    let previous = slot().swap(Arc::new(logger));
    tracing::debug!(pii_mode = %global().pii_mode(), "Global logger replaced");
    previous
}

macro_rules! forward_level {
    ($plain:ident, $formatted:ident, $structured:ident) => {
        #[track_caller]
        pub fn $plain(msg: impl fmt::Display) {
            global().$plain(msg);
        }

        #[track_caller]
        pub fn $formatted(args: fmt::Arguments<'_>) {
            global().$formatted(args);
        }

        #[track_caller]
        pub fn $structured<I>(msg: &str, args: I)
        where
            I: IntoIterator<Item = Arg>,
        {
            global().$structured(msg, args);
        }
    };
}

forward_level!(debug, debugf, debugw);
forward_level!(info, infof, infow);
forward_level!(warn, warnf, warnw);
forward_level!(error, errorf, errorw);

#[track_caller]
pub fn panic(msg: impl fmt::Display) -> ! {
    global().panic(msg)
}

#[track_caller]
pub fn panicf(args: fmt::Arguments<'_>) -> ! {
    global().panicf(args)
}

#[track_caller]
pub fn panicw<I>(msg: &str, args: I) -> !
where
    I: IntoIterator<Item = Arg>,
{
    global().panicw(msg, args)
}

/// Exits the process with status 1 after writing
#[track_caller]
pub fn fatal(msg: impl fmt::Display) -> ! {
    global().fatal(msg)
}

#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) -> ! {
    global().fatalf(args)
}

#[track_caller]
pub fn fatalw<I>(msg: &str, args: I) -> !
where
    I: IntoIterator<Item = Arg>,
{
    global().fatalw(msg, args)
}

/// Flush the global logger
pub fn sync() -> Result<()> {
    global().sync()
}
