//! Integration tests for Settings loading with layered precedence.
//!
//! Layers (lowest to highest): defaults, global file, explicit file,
//! `CHECKTREE_*` environment variables. The global file is always a temp
//! file here, and environment access is serialized through `ENV_LOCK` with
//! all ambient `CHECKTREE_*` variables removed first.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

use checktree::application::ApplicationError;
use checktree::config::{Settings, ENV_PREFIX};
use checktree::util::testing;

static ENV_LOCK: Mutex<()> = Mutex::new(());

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

/// Locks the process environment and clears every `CHECKTREE_*` variable.
fn isolated_env() -> MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let prefix = format!("{}_", ENV_PREFIX);
    for (key, _) in std::env::vars() {
        if key.starts_with(&prefix) {
            std::env::remove_var(key);
        }
    }
    guard
}

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ============================================================
// File layers
// ============================================================

#[test]
fn given_explicit_config_when_load_then_overrides_specified_fields() {
    let _env = isolated_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "checktree.toml",
        r#"
placeholder = "(untitled)"

[glyphs]
checked = "[*]"
"#,
    );

    let settings = Settings::load_from(None, Some(&path)).expect("load settings");

    assert_eq!(settings.placeholder, "(untitled)");
    assert_eq!(settings.glyphs.checked, "[*]");
    assert_eq!(settings.glyphs.unchecked, "[ ]");
    assert!(settings.color);
}

#[test]
fn given_global_and_explicit_config_when_load_then_explicit_wins_per_field() {
    let _env = isolated_env();
    let dir = TempDir::new().unwrap();
    let global = write_config(&dir, "global.toml", "placeholder = \"global\"\ncolor = false\n");
    let explicit = write_config(&dir, "explicit.toml", "placeholder = \"explicit\"\n");

    let settings = Settings::load_from(Some(&global), Some(&explicit)).expect("load settings");

    assert_eq!(settings.placeholder, "explicit");
    assert!(!settings.color);
}

#[test]
fn given_missing_global_config_when_load_then_defaults() {
    let _env = isolated_env();
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("checktree").join("checktree.toml");

    let settings = Settings::load_from(Some(&global), None).expect("load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_document_path_with_env_var_when_load_then_path_expanded() {
    let _env = isolated_env();
    let dir = TempDir::new().unwrap();
    std::env::set_var("CT_CONFIG_TEST_LISTS", "/srv/lists");
    let path = write_config(
        &dir,
        "checktree.toml",
        "document = \"$CT_CONFIG_TEST_LISTS/home.json\"\n",
    );

    let settings = Settings::load_from(None, Some(&path)).expect("load settings");

    assert_eq!(
        settings.document.as_deref(),
        Some(Path::new("/srv/lists/home.json"))
    );
}

// ============================================================
// Environment layer
// ============================================================

#[test]
fn given_env_overrides_when_load_then_top_level_and_nested_keys_win() {
    let _env = isolated_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "checktree.toml", "placeholder = \"(untitled)\"\n");
    std::env::set_var("CHECKTREE_PLACEHOLDER", "from-env");
    std::env::set_var("CHECKTREE_GLYPHS__CHECKED", "[E]");

    let result = Settings::load_from(None, Some(&path));
    std::env::remove_var("CHECKTREE_PLACEHOLDER");
    std::env::remove_var("CHECKTREE_GLYPHS__CHECKED");
    let settings = result.expect("load settings");

    assert_eq!(settings.placeholder, "from-env");
    assert_eq!(settings.glyphs.checked, "[E]");
    assert_eq!(settings.glyphs.partial, "[-]");
}

#[test]
fn given_env_bool_and_document_when_load_then_parsed_and_expanded() {
    let _env = isolated_env();
    std::env::set_var("CT_CONFIG_TEST_ENV_LISTS", "/opt/lists");
    std::env::set_var("CHECKTREE_COLOR", "false");
    std::env::set_var("CHECKTREE_DOCUMENT", "$CT_CONFIG_TEST_ENV_LISTS/todo.json");

    let result = Settings::load_from(None, None);
    std::env::remove_var("CHECKTREE_COLOR");
    std::env::remove_var("CHECKTREE_DOCUMENT");
    let settings = result.expect("load settings");

    assert!(!settings.color);
    assert_eq!(
        settings.document.as_deref(),
        Some(Path::new("/opt/lists/todo.json"))
    );
}

// ============================================================
// Errors and rendering
// ============================================================

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let _env = isolated_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let err = Settings::load_from(None, Some(&path)).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Config { ref message } if message.contains("absent.toml")
    ));
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let _env = isolated_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "broken.toml", "color = \"maybe\"\n");

    let err = Settings::load_from(None, Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_effective_settings_when_rendered_then_toml_parses_back() {
    let settings = Settings::default();

    let rendered = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&rendered).unwrap();

    assert_eq!(parsed, settings);
    assert!(rendered.contains("[glyphs]"));
}
