//! Architecture enforcement lint - keeps the state machines independent of the UI.
//!
//! Session, navigation, panels, storage and the bus are plain Rust so they can
//! be driven from unit tests without a renderer. Only `src/app/` may talk to
//! Dioxus. Inside the app layer, pages reach the mock backend through
//! `PanelsContext` rather than constructing their own.

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Patterns that pull the UI framework into core modules
const UI_PATTERNS: &[(&str, &str)] = &[
    ("use dioxus", "Move the UI code into src/app/"),
    ("dioxus::", "Move the UI code into src/app/"),
    ("Signal<", "Core state is owned by value; wrap it in a signal in src/app/"),
    ("rsx!", "Components live in src/app/components or src/app/pages"),
];

/// Core modules that must stay renderer-free
const CORE_PATHS: &[&str] = &[
    "src/bus/",
    "src/navigation/",
    "src/panels/",
    "src/session/",
    "src/storage/",
    "src/timer.rs",
    "src/transition.rs",
];

/// App files allowed to build the backend
const BACKEND_OWNERS: &[&str] = &["src/app/panels_context.rs"];

fn relative(path: &Path) -> String {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
        .replace('\\', "/")
}

fn find_all(content: &str, pattern: &str) -> Vec<usize> {
    let mut lines = Vec::new();
    let mut search_from = 0;
    while let Some(pos) = content[search_from..].find(pattern) {
        let absolute_pos = search_from + pos;
        lines.push(content[..absolute_pos].matches('\n').count() + 1);
        search_from = absolute_pos + pattern.len();
    }
    lines
}

fn rust_files() -> impl Iterator<Item = walkdir::DirEntry> {
    let src_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    WalkDir::new(src_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
}

#[test]
fn core_modules_do_not_depend_on_the_ui() {
    let mut violations = Vec::new();

    for entry in rust_files() {
        let path = relative(entry.path());
        if !CORE_PATHS.iter().any(|core| path.starts_with(core)) {
            continue;
        }
        let content = fs::read_to_string(entry.path()).expect("readable source file");

        for (pattern, suggestion) in UI_PATTERNS {
            for line in find_all(&content, pattern) {
                violations.push(format!("  {}:{}\n    Found: {}\n    Fix: {}\n", path, line, pattern, suggestion));
            }
        }
    }

    if !violations.is_empty() {
        panic!(
            "\n\nARCHITECTURE VIOLATION: core modules must not use Dioxus\n\n{}",
            violations.join("\n")
        );
    }
}

#[test]
fn pages_use_the_shared_backend() {
    let mut violations = Vec::new();

    for entry in rust_files() {
        let path = relative(entry.path());
        if !path.starts_with("src/app/") || BACKEND_OWNERS.contains(&path.as_str()) {
            continue;
        }
        let content = fs::read_to_string(entry.path()).expect("readable source file");

        for line in find_all(&content, "MockBackend") {
            violations.push(format!("  {}:{}", path, line));
        }
    }

    assert!(
        violations.is_empty(),
        "Pages must go through PanelsContext for backend calls:\n{}",
        violations.join("\n")
    );
}

#[test]
fn every_menu_has_a_view() {
    let app_mod = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("app")
        .join("mod.rs");
    let content = fs::read_to_string(&app_mod).expect("Failed to read app/mod.rs");

    for variant in [
        "Home",
        "House3d",
        "Devices",
        "Security",
        "Music",
        "Chat",
        "Routines",
        "Config",
        "RecoverPassword",
        "Login",
    ] {
        assert!(
            content.contains(&format!("MenuKey::{}", variant)),
            "Shell does not handle MenuKey::{}",
            variant
        );
    }
}
