#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! AST-level test to keep every channel bounded.
//!
//! The app bus is a bounded `futures` mpsc channel: publishers use
//! `try_send` and drop the event (with a warning) when the shell falls
//! behind. An unbounded channel would instead queue navigation and logout
//! requests without limit while a page is busy.
//!
//! Example of bad code:
//! ```ignore
//! let (tx, rx) = mpsc::unbounded();
//! ```
//!
//! Example of correct code:
//! ```ignore
//! let (bus, stream) = EventBus::channel(BUS_CAPACITY);
//! ```

use std::fs;
use std::path::Path;
use syn::visit::Visit;
use syn::{Expr, ExprCall, File};
use walkdir::WalkDir;

const UNBOUNDED_CONSTRUCTORS: &[&str] = &["unbounded", "unbounded_channel"];

struct UnboundedVisitor {
    current_file: String,
    violations: Vec<(String, String)>,
}

impl<'ast> Visit<'ast> for UnboundedVisitor {
    fn visit_expr_call(&mut self, call: &'ast ExprCall) {
        if let Expr::Path(path) = &*call.func {
            if let Some(last) = path.path.segments.last() {
                let name = last.ident.to_string();
                if UNBOUNDED_CONSTRUCTORS.contains(&name.as_str()) {
                    self.violations
                        .push((self.current_file.clone(), format!("{}() call", name)));
                }
            }
        }
        syn::visit::visit_expr_call(self, call);
    }
}

fn analyze_source(file: &str, source: &str) -> Vec<(String, String)> {
    let syntax: File = match syn::parse_file(source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Warning: Failed to parse {}: {}", file, e);
            return vec![];
        }
    };

    let mut visitor = UnboundedVisitor {
        current_file: file.to_string(),
        violations: Vec::new(),
    };
    visitor.visit_file(&syntax);
    visitor.violations
}

#[test]
fn detects_unbounded_constructors() {
    let bad_code = r#"
        fn wire() {
            let (tx, rx) = futures::channel::mpsc::unbounded();
            let (tx2, rx2) = tokio::sync::mpsc::unbounded_channel::<u8>();
        }
    "#;
    assert_eq!(analyze_source("test.rs", bad_code).len(), 2);
}

#[test]
fn allows_bounded_channel() {
    let good_code = r#"
        fn wire() {
            let (sender, receiver) = mpsc::channel(32);
        }
    "#;
    assert!(analyze_source("test.rs", good_code).is_empty());
}

#[test]
fn no_unbounded_channel_violations() {
    let src_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");

    let mut all_violations = Vec::new();

    for entry in WalkDir::new(&src_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
    {
        let content = match fs::read_to_string(entry.path()) {
            Ok(c) => c,
            Err(_) => continue,
        };
        all_violations.extend(analyze_source(&entry.path().display().to_string(), &content));
    }

    if !all_violations.is_empty() {
        let mut error_msg = String::from(
            "\n\nFound unbounded channels!\n\
             Use a bounded channel and try_send so a slow consumer sheds load.\n\
             Violations:\n",
        );

        for (file, context) in &all_violations {
            error_msg.push_str(&format!("  - {}: {}\n", file, context));
        }

        panic!("{}", error_msg);
    }
}
