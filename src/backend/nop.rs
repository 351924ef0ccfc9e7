//! Backend that discards every record

use super::{Backend, Fields, Record};
use crate::domain::{Level, Result};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct NopBackend;

impl Backend for NopBackend {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn write(&self, _record: &Record<'_>) {}

    fn with_fields(&self, _fields: Fields) -> Arc<dyn Backend> {
        Arc::new(NopBackend)
    }

    fn named(&self, _name: &str) -> Arc<dyn Backend> {
        Arc::new(NopBackend)
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}
