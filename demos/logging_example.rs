//! Example demonstrating PII-aware structured logging
//!
//! Run with: cargo run --example logging_example

use piilog::backend::{init_tracing, TracingBackend};
use piilog::config::{Configuration, TracingConfig};
use piilog::pii::ResolvedField;
use piilog::{args, custom_pii, infow, pii, resolver, Level, Logger, PiiMode};
use std::sync::Arc;

fn main() -> piilog::Result<()> {
    // Same call site, every mode
    for mode in [PiiMode::None, PiiMode::Hash, PiiMode::Mask, PiiMode::Remove] {
        let logger = Logger::new(
            &Configuration::new(Level::Debug, mode).with_application("logging_example", "0.1.0"),
        )?;
        logger.infow(
            "customer signed in",
            args!["customer", pii("email", "alice@example.com"), "attempt", 1],
        );
    }

    // Mask mode needs a mask function; without one the field is dropped
    piilog::set_mask_fn(|key, value| {
        let visible: String = value.chars().take(2).collect();
        ResolvedField::new(key, format!("{visible}***"))
    });
    let logger = Logger::new(&Configuration::new(Level::Debug, PiiMode::Mask))?;
    logger.infow("masked", args![pii("email", "alice@example.com")]);

    // A custom field decides its own rendering
    let card = custom_pii(
        "card",
        "4111111111111111",
        Some(resolver(|mode, key, value| match mode {
            PiiMode::None => ResolvedField::new(key, value),
            _ => ResolvedField::new(key, format!("****{}", &value[value.len() - 4..])),
        })),
    );
    logger.infow("payment accepted", args![card, "amount", 1299]);

    // Derived loggers carry resolved context
    let request = logger.with(args!["request_id", "r-42", pii("ip", "10.0.0.7")]).named("http");
    infow!(request, "request handled", "status", 200);
    request.warnf(format_args!("slow response: {}ms", 870));

    // Forward records into `tracing`
    let _guard = init_tracing("info", &TracingConfig::default())?;
    let bridged = Logger::builder()
        .backend(Arc::new(TracingBackend::new()))
        .pii_mode(PiiMode::Hash)
        .build();
    bridged.infow("through tracing", args![pii("email", "alice@example.com")]);

    logger.sync()
}
