//! Integration tests for the forge pipeline.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use forge_spec::{
    BssValue, CollectedDiagnostics, DiagnosticKind, DocumentFormat, ForgeConfig, ForgeError,
    Normalizer, OutputFormat, RawDocument, RecordValue, SpecForge, SpecReader, SpecValidator,
};
use tempfile::tempdir;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../specs/base64_encoder.specforge.yaml")
}

fn parse(src: &str) -> RawDocument {
    SpecReader::parse_str(src, DocumentFormat::Yaml).unwrap()
}

/// Minimal document: identity plus one structure, everything else absent.
#[test]
fn test_end_to_end_minimal_document() {
    let src = r#"
metadata:
  name: memcpy_impl
  version: "1.0"
  description: fast copy
structures:
  Header:
    fields:
      - name: len
        type: u32
        description: length
"#;
    let report = SpecForge::default().forge_str(src, OutputFormat::Text).unwrap();

    let expected = [
        "=== SPECIFICATION ===",
        "Name: memcpy_impl",
        "Version: 1.0",
        "Description: fast copy",
        "",
        "=== HEADER FORMAT ===",
        "Border Line: ",
        "File Name Line: ",
        "Description Line: ",
        "Blank Comment: ",
        "Assembly Lines:",
        "Directives:",
        "",
        "=== REGISTER USAGE ===",
        "=== DATA STRUCTURES ===",
        "Structure: Header",
        "Documentation: ",
        "Fields:",
        "  len (u32): length",
        "",
        "=== ALGORITHMS ===",
        "=== ERROR HANDLING ===",
        "Strategies:",
        "Error Types:",
        "Syscall Requirements:",
        "",
        "=== SECTION REQUIREMENTS ===",
        "Data Section:",
        "BSS Section:",
        "Text Section:",
        "",
        "=== PERFORMANCE ===",
        "Time Complexity: ",
        "Space Complexity: ",
        "Constraints:",
        "Register Usage:",
        "Memory Access:",
        "Benchmarks:",
        "",
        "=== TESTING ===",
        "Unit Tests:",
        "Integration Tests:",
        "Conformance Tests:",
        "",
        "=== CODE STYLE ===",
        "Indentation:",
        "Comments:",
        "Naming:",
        "Organization:",
    ]
    .join("\n");

    assert_eq!(report, expected);
}

#[test]
fn test_sample_document_renders_every_section() {
    let raw = SpecReader::read_path(sample_path()).unwrap();
    let sink = Arc::new(CollectedDiagnostics::new());
    let forge = SpecForge::default().with_diagnostics(sink.clone());

    let report = forge.forge(&raw, OutputFormat::Text).unwrap();

    assert!(report.contains("Name: base64_encoder\nVersion: 1.0.0\n"));
    assert!(report.contains("author: SpecForge Contributors\ntarget: x86_64-linux\n"));
    assert!(report.contains("Register: rax\nPurpose: syscall number and return value\nByte Registers: al, ah\nConstraints:\n  - Clobbered by every syscall\n"));
    assert!(report.contains("  leftover (u8[2]): bytes carried over to the next block\n    - at most two bytes\n"));
    assert!(report.contains("Complexity:\n  space: O(1)\n"));
    assert!(report.contains("    One Byte:\n      - Emit two characters followed by \"==\"\n"));
    assert!(report.contains("Examples:\n  Example 1:\n    input: Man\n    output: TWFu\n"));
    assert!(report.contains("Steps:\n  general:\n    - Encode leftover bytes\n    - Append padding\n"));
    assert!(report.contains("Strategies:\n  general:\n    - Check every syscall return value\n"));
    assert!(report.contains("  read_failure:\n    Description: Handle read_failure\n    Handling:\n      - Detect\n      - Log\n      - Handle\n"));
    assert!(report.contains("  write_failure:\n    Description: Output could not be written\n    Handling:\n      - Detect\n      - Exit\n"));
    assert!(report.contains("  out_buf:\n    Size: IN_LEN * 4 / 3\n    Align: 16\n"));
    assert!(report.contains("  one_megabyte:\n    Input Size: 1 MiB\n    Expected Time: < 5 ms\n    Requirements:\n      - Warm cache\n"));
    assert!(report.contains("  empty input:\n    Input: TBD\n    Expected Output: TBD\n"));
    assert!(report.contains("  pipe through coreutils base64 -d:\n  large file:\n    steps:\n"));
    assert!(report.contains("  Standard: RFC 4648\n  Test Vectors:\n    Input: f\n    Output: Zg==\n    Input: fo\n    Output: Zm8=\n"));
    assert!(report.ends_with("Organization:\n  - .data, then .bss, then .text"));

    // The two flat lists are coerced; nothing is skipped.
    let items = sink.items();
    let paths: Vec<_> = items.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, vec!["algorithms.flush.steps", "error_handling.strategies"]);
    assert!(items.iter().all(|d| d.kind == DiagnosticKind::Coerced));
}

#[test]
fn test_algorithm_order_is_preserved() {
    let src = r#"
metadata: {name: n, version: "1", description: d}
algorithms:
  charlie: {steps: {s: [c1, c2]}}
  alpha: {steps: {s: [a1]}}
  bravo: {steps: {second: [b2], first: [b1]}}
"#;
    let report = SpecForge::default().forge_str(src, OutputFormat::Text).unwrap();

    let c = report.find("Algorithm: charlie").unwrap();
    let a = report.find("Algorithm: alpha").unwrap();
    let b = report.find("Algorithm: bravo").unwrap();
    assert!(c < a && a < b);

    assert!(report.contains("    - c1\n    - c2\n"));
    let second = report.find("  second:").unwrap();
    let first = report.find("  first:").unwrap();
    assert!(second < first);
}

#[test]
fn test_any_subset_of_sections_may_be_missing() {
    const OPTIONAL: [&str; 9] = [
        "header_format",
        "register_usage",
        "structures",
        "algorithms",
        "error_handling",
        "section_requirements",
        "performance",
        "testing",
        "code_style",
    ];
    let full = SpecReader::read_path(sample_path()).unwrap();
    let sink = CollectedDiagnostics::new();
    let normalizer = Normalizer::new(&sink);

    for mask in 0u32..(1 << OPTIONAL.len()) {
        let mut root = full.root().clone();
        for (bit, key) in OPTIONAL.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                root.remove(*key);
            }
        }
        let spec = normalizer
            .normalize(&RawDocument::from_mapping(root))
            .unwrap_or_else(|e| panic!("mask {:#b} failed: {}", mask, e));

        let missing = |key: &str| mask & (1 << OPTIONAL.iter().position(|k| *k == key).unwrap()) != 0;
        if missing("header_format") {
            assert_eq!(spec.header_format, Default::default());
        }
        if missing("register_usage") {
            assert!(spec.register_usage.general_purpose.is_empty());
        }
        if missing("structures") {
            assert!(spec.structures.is_empty());
        }
        if missing("algorithms") {
            assert!(spec.algorithms.is_empty());
        }
        if missing("error_handling") {
            assert_eq!(spec.error_handling, Default::default());
        }
        if missing("section_requirements") {
            assert_eq!(spec.section_requirements, Default::default());
        }
        if missing("performance") {
            assert_eq!(spec.performance, Default::default());
        }
        if missing("testing") {
            assert_eq!(spec.testing, Default::default());
        }
        if missing("code_style") {
            assert_eq!(spec.code_style, Default::default());
        }
    }
}

#[test]
fn test_each_identity_field_is_required() {
    let forge = SpecForge::default().without_cache();
    for (field, src) in [
        ("metadata.name", "metadata: {version: '1', description: d}"),
        ("metadata.version", "metadata: {name: n, description: d}"),
        ("metadata.description", "metadata: {name: n, version: '1'}"),
    ] {
        match forge.forge_str(src, OutputFormat::Text) {
            Err(ForgeError::MissingField(f)) => assert_eq!(f, field),
            other => panic!("expected {} to be reported, got {:?}", field, other),
        }
    }
}

#[test]
fn test_json_document_from_disk() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("copy.json");
    fs::write(
        &path,
        r#"{
  "metadata": {"name": "memcpy_impl", "version": "1.0", "description": "fast copy"},
  "section_requirements": {"bss": [{"name": "buf", "size": 64, "align": 8, "purpose": "scratch"}]}
}"#,
    )
    .unwrap();

    let raw = SpecReader::read_path(&path).unwrap();
    let spec = SpecForge::default().specification(&raw).unwrap();
    assert_eq!(spec.section_requirements.bss[0].size, BssValue::Bytes(64));

    let yaml_path = temp.path().join("copy.yaml");
    fs::write(&yaml_path, "metadata: {name: memcpy_impl, version: '1.0', description: fast copy}\nsection_requirements: {bss: [{name: buf, size: 64, align: 8, purpose: scratch}]}\n").unwrap();
    let from_yaml = SpecReader::read_path(&yaml_path).unwrap();

    let forge = SpecForge::default();
    assert_eq!(
        forge.forge(&raw, OutputFormat::Text).unwrap(),
        forge.forge(&from_yaml, OutputFormat::Text).unwrap()
    );
}

#[test]
fn test_missing_and_malformed_files() {
    let temp = tempdir().unwrap();

    let err = SpecReader::read_path(temp.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ForgeError::NotFound(_)));

    let list = temp.path().join("list.yaml");
    fs::write(&list, "- metadata\n- structures\n").unwrap();
    let err = SpecReader::read_path(&list).unwrap_err();
    assert!(err.is_parse_failure());
}

#[test]
fn test_config_controls_indentation() {
    let config = ForgeConfig::from_toml_str("indent_width = 4\ncache_enabled = false\n").unwrap();
    let forge = SpecForge::new(config);
    assert!(forge.cache().is_none());

    let report = forge
        .forge_str(
            "metadata: {name: n, version: '1', description: d}\ncode_style: {naming: [snake_case]}",
            OutputFormat::Text,
        )
        .unwrap();
    assert!(report.contains("Naming:\n    - snake_case\n"));
}

#[test]
fn test_validation_of_sample() {
    let raw = SpecReader::read_path(sample_path()).unwrap();
    let result = SpecValidator::validate_document(&raw);
    assert!(result.valid, "{:?}", result.errors);

    let spec = SpecForge::default().specification(&raw).unwrap();
    let result = SpecValidator::validate_specification(&spec);
    assert_eq!(
        result.warnings,
        vec!["Unit test 'empty input' still has placeholder input or expected output"]
    );
}

#[test]
fn test_unit_test_values_keep_structure() {
    let src = r#"
metadata: {name: n, version: "1", description: d}
testing:
  unit_tests:
    - name: table
      input: {bytes: [1, 2, 3]}
      expected_output: 3
"#;
    let spec = SpecForge::default().specification(&parse(src)).unwrap();
    let case = &spec.testing.unit_tests[0];
    assert!(matches!(case.input, RecordValue::Map(_)));
    assert_eq!(case.expected_output.inline().as_deref(), Some("3"));

    let report = SpecForge::default().forge_str(src, OutputFormat::Text).unwrap();
    assert!(report.contains("  table:\n    Input:\n      bytes:\n        - 1\n        - 2\n        - 3\n    Expected Output: 3\n"));
}
