// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Build script to generate one test per directory under `cases/`.
//!
//! A case is a directory holding `main.fut`. When the directory also holds
//! `error.txt`, the case is expected to fail to parse.

use std::env;
use std::fmt::Write as _;
use std::fs;

use camino::Utf8PathBuf;

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let cases_dir = Utf8PathBuf::from(manifest_dir).join("cases");

    // Rerun when cases are added or removed
    println!("cargo:rerun-if-changed={cases_dir}");

    let mut cases: Vec<String> = Vec::new();
    if cases_dir.exists() {
        for entry in cases_dir.read_dir_utf8().expect("Failed to read cases/ directory") {
            let entry = entry.expect("Failed to read directory entry");
            if entry.path().join("main.fut").is_file() {
                cases.push(entry.file_name().to_string());
            }
        }
    }
    cases.sort();

    let mut code = String::from("// Auto-generated from `cases/` by build.rs; do not edit manually.\n");
    for case in &cases {
        let test_name = case.replace(['-', '.'], "_");
        writeln!(
            code,
            "\n#[test]\nfn case_{test_name}() {{\n    run_case(\"{case}\");\n}}"
        )
        .expect("Failed to format test");
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest_path = Utf8PathBuf::from(out_dir).join("generated_tests.rs");
    fs::write(dest_path, code).expect("Failed to write generated_tests.rs");
}
