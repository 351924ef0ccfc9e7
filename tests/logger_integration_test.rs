//! Integration tests for the logger: PII resolution, routing, derivation and
//! the global logger

use piilog::backend::{JsonBackend, SharedBuffer, Sink};
use piilog::config::{Configuration, OutputConfig};
use piilog::pii::{clear_mask_fn, set_mask_fn};
use piilog::{args, custom_pii, infow, pii, resolver, Level, Logger, PiiMode, ResolvedField};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;
use test_case::test_case;

// Serializes tests that touch the process-wide mask function or global logger
static GLOBAL_MUTEX: Mutex<()> = Mutex::new(());

fn lock() -> std::sync::MutexGuard<'static, ()> {
    GLOBAL_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
}

fn buffered(min_level: Level, mode: PiiMode) -> (Logger, SharedBuffer, SharedBuffer) {
    let info = SharedBuffer::new();
    let error = SharedBuffer::new();
    let backend = JsonBackend::new(min_level, Sink::buffer(&info), Sink::buffer(&error));
    let logger = Logger::builder()
        .backend(Arc::new(backend))
        .pii_mode(mode)
        .build();
    (logger, info, error)
}

fn field_keys(record: &Value) -> Vec<String> {
    const STANDARD: [&str; 5] = ["lvl", "ts", "caller", "msg", "stacktrace"];
    record
        .as_object()
        .unwrap()
        .keys()
        .filter(|key| !STANDARD.contains(&key.as_str()))
        .cloned()
        .collect()
}

#[test_case(PiiMode::None, Some("a@b.com"); "none keeps the value")]
#[test_case(PiiMode::Hash, Some("fb98d44ad7501a959f3f4f4a3f004fe2d9e581ea6207e218c4b02c08a4d75adf"); "hash digests the value")]
#[test_case(PiiMode::Remove, None; "remove drops the field")]
fn test_mode_applied_to_mixed_args(mode: PiiMode, email: Option<&str>) {
    let (logger, info, _) = buffered(Level::Debug, mode);

    logger.infow("signed in", args!["user", pii("email", "a@b.com"), "count", 3]);

    let record = &info.records().unwrap()[0];
    assert_eq!(record["count"], 3);
    assert_eq!(record.get("email").and_then(Value::as_str), email);
    assert!(record.get("user").is_none());
}

#[test]
fn test_mask_mode_uses_installed_function() {
    let _guard = lock();
    set_mask_fn(|key, value| ResolvedField::new(key, format!("{}***", &value[..1])));
    let (logger, info, _) = buffered(Level::Debug, PiiMode::Mask);

    logger.infow("signed in", args![pii("email", "a@b.com")]);

    clear_mask_fn();
    assert_eq!(info.records().unwrap()[0]["email"], "a***");
}

#[test]
fn test_mask_mode_without_function_drops_field() {
    let _guard = lock();
    clear_mask_fn();
    let (logger, info, _) = buffered(Level::Debug, PiiMode::Mask);

    logger.infow("signed in", args![pii("email", "a@b.com"), "count", 1]);

    assert_eq!(field_keys(&info.records().unwrap()[0]), vec!["count"]);
}

#[test]
fn test_mask_function_reassigned_while_logging() {
    let _guard = lock();
    set_mask_fn(|key, _| ResolvedField::new(key, "first"));
    let (logger, info, _) = buffered(Level::Debug, PiiMode::Mask);

    let writers: Vec<_> = (0..4)
        .map(|_| {
            let logger = logger.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    logger.infow("tick", args![pii("email", "a@b.com")]);
                }
            })
        })
        .collect();
    for i in 0..50 {
        if i % 2 == 0 {
            set_mask_fn(|key, _| ResolvedField::new(key, "second"));
        } else {
            set_mask_fn(|key, _| ResolvedField::new(key, "first"));
        }
    }
    for writer in writers {
        writer.join().unwrap();
    }
    clear_mask_fn();

    let records = info.records().unwrap();
    assert_eq!(records.len(), 200);
    for record in records {
        let masked = record["email"].as_str().unwrap();
        assert!(masked == "first" || masked == "second", "unexpected {masked}");
    }
}

#[test]
fn test_custom_field_resolver_decides_output() {
    let (logger, info, _) = buffered(Level::Debug, PiiMode::Remove);
    let card = custom_pii(
        "card",
        "4111111111111111",
        Some(resolver(|_, key, value| {
            ResolvedField::new(key, format!("****{}", &value[value.len() - 4..]))
        })),
    );

    logger.infow("charged", args![card]);

    assert_eq!(info.records().unwrap()[0]["card"], "****1111");
}

#[test]
fn test_invalid_custom_field_is_silently_dropped() {
    let (logger, info, _) = buffered(Level::Debug, PiiMode::None);
    let missing_resolver = custom_pii("card", "4111", None);

    logger.infow("charged", args!["card", missing_resolver, "amount", 10]);

    assert_eq!(field_keys(&info.records().unwrap()[0]), vec!["amount"]);
}

#[test]
fn test_with_resolves_under_parent_mode() {
    let (logger, info, _) = buffered(Level::Debug, PiiMode::Remove);

    let derived = logger.with(args!["request_id", "r-7", pii("email", "a@b.com")]);
    derived.infow("handled", args!["status", 200]);
    derived.with(args!["step", 2]).info("nested");

    let records = info.records().unwrap();
    assert_eq!(field_keys(&records[0]), vec!["request_id", "status"]);
    assert_eq!(field_keys(&records[1]), vec!["request_id", "step"]);
    assert_eq!(derived.pii_mode(), PiiMode::Remove);
}

#[test]
fn test_level_filtering_and_routing() {
    let (logger, info, error) = buffered(Level::Info, PiiMode::None);

    logger.debug("hidden");
    logger.info("shown");
    logger.warn("to error sink");
    logger.error("to error sink too");

    let info_records = info.records().unwrap();
    assert_eq!(info_records.len(), 1);
    assert_eq!(info_records[0]["msg"], "shown");

    let levels: Vec<String> = error
        .records()
        .unwrap()
        .iter()
        .map(|record| record["lvl"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(levels, vec!["warn", "error"]);
}

#[test]
fn test_fields_never_replace_record_keys() {
    let (logger, info, error) = buffered(Level::Debug, PiiMode::None);

    logger.infow("real message", args![pii("msg", "alice@example.com"), "lvl", "error"]);

    assert!(error.is_empty());
    let record = &info.records().unwrap()[0];
    assert_eq!(record["msg"], "real message");
    assert_eq!(record["lvl"], "info");
    assert_eq!(record["fields.msg"], "alice@example.com");
    assert_eq!(record["fields.lvl"], "error");
}

#[test]
fn test_unusable_arguments_collected_under_ignored() {
    let (logger, info, _) = buffered(Level::Debug, PiiMode::None);

    logger.infow("odd args", args![42, "answer", "count", 1, "orphan"]);

    let record = &info.records().unwrap()[0];
    assert_eq!(field_keys(record), vec!["count", "ignored"]);
    assert_eq!(record["ignored"], serde_json::json!([[42, "answer"], "orphan"]));
}

#[test]
fn test_logw_at_dynamic_level() {
    let (logger, _, error) = buffered(Level::Debug, PiiMode::None);

    logger.logw(Level::Error, "dynamic", args!["k", "v"]);

    assert_eq!(error.records().unwrap()[0]["k"], "v");
}

#[test]
fn test_macro_names_calling_function() {
    let (logger, info, _) = buffered(Level::Debug, PiiMode::None);

    infow!(logger, "via macro", "k", 1);

    let func = info.records().unwrap()[0]["func"].as_str().unwrap().to_string();
    assert!(func.ends_with("test_macro_names_calling_function"), "{func}");
}

#[test]
fn test_configuration_writes_application_keys_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let info_path = temp_dir.path().join("info.log");
    let error_path = temp_dir.path().join("error.log");

    let mut config = Configuration::new(Level::Debug, PiiMode::Hash).with_application("billing", "1.4.2");
    config.name = "api".to_string();
    config.output = OutputConfig {
        info_path: info_path.to_string_lossy().to_string(),
        error_path: error_path.to_string_lossy().to_string(),
    };

    let logger = Logger::new(&config).unwrap();
    logger.named("db").infow("query", args![pii("user", "v")]);
    logger.error("failed");
    logger.sync().unwrap();

    let info_line = std::fs::read_to_string(&info_path).unwrap();
    let record: Value = serde_json::from_str(info_line.trim()).unwrap();
    assert_eq!(record["app"], "billing");
    assert_eq!(record["version"], "1.4.2");
    assert_eq!(record["name"], "api.db");
    assert_eq!(
        record["user"],
        "4c94485e0c21ae6c41ce1dfe7b6bfaceea5ab68e40a2476f50208e526f506080"
    );

    let error_line = std::fs::read_to_string(&error_path).unwrap();
    let record: Value = serde_json::from_str(error_line.trim()).unwrap();
    assert_eq!(record["msg"], "failed");
    assert!(record["stacktrace"].as_str().is_some());
}

#[test]
fn test_directory_as_output_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Configuration::default();
    config.output.info_path = temp_dir.path().to_string_lossy().to_string();

    let err = Logger::new(&config).unwrap_err();
    assert!(matches!(err, piilog::LogError::Io(_)));
}

#[test]
fn test_nop_logger() {
    let logger = Logger::nop();
    logger.infow("nothing", args![pii("email", "a@b.com")]);
    assert!(logger.sync().is_ok());
}

#[test]
#[should_panic(expected = "logger has not been initialized - panicking")]
fn test_uninitialized_logger_panics_on_use() {
    Logger::default().with(args!["k", "v"]);
}

#[test]
fn test_global_logger_replacement() {
    let _guard = lock();
    let (logger, info, _) = buffered(Level::Debug, PiiMode::Remove);

    let previous = piilog::set_global(logger);
    piilog::infow("through global", args![pii("email", "a@b.com"), "n", 1]);
    piilog::info("plain");
    piilog::sync().unwrap();
    piilog::set_global((*previous).clone());

    let records = info.records().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(field_keys(&records[0]), vec!["n"]);
    assert_eq!(records[1]["msg"], "plain");
}
