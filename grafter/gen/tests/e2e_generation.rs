//! End-to-end tests: generate code and verify it compiles.
//!
//! These tests exercise the full pipeline from introspection JSON to a
//! compiled crate depending on the `grafter` runtime. They are slow since
//! they invoke cargo.

use std::fs;
use std::path::Path;
use std::process::Command;

use grafter_define::parse_introspection;
use grafter_gen::config::GeneratorConfig;
use grafter_gen::output::generate_and_write;
use tempfile::TempDir;

fn write_crate(root: &Path) {
    let runtime = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    let manifest = format!(
        r#"[package]
name = "generated-client"
version = "0.0.0"
edition = "2024"

[dependencies]
grafter = {{ path = {:?} }}
serde = {{ version = "1.0", features = ["derive"] }}

[workspace]
"#,
        runtime.canonicalize().unwrap()
    );
    fs::write(root.join("Cargo.toml"), manifest).unwrap();
    fs::write(root.join("src/lib.rs"), "pub mod graphql;\n").unwrap();
}

/// Tests that generated code compiles successfully.
#[test]
#[ignore = "slow: compiles generated code"]
fn generated_code_compiles() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let src_dir = temp_dir.path().join("src");
    fs::create_dir_all(&src_dir).unwrap();

    let schema = parse_introspection(include_str!("../fixtures/schema.json")).unwrap();
    generate_and_write(&schema, &GeneratorConfig::default(), &src_dir.join("graphql"), false)
        .expect("Failed to generate code");
    write_crate(temp_dir.path());

    let output = Command::new("cargo")
        .args(["check", "--manifest-path"])
        .arg(temp_dir.path().join("Cargo.toml"))
        .output()
        .expect("Failed to run cargo check");

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        panic!(
            "Generated code failed to compile:\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
            stdout, stderr
        );
    }
}
