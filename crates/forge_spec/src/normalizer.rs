//! Raw document to typed model.
//!
//! One routine per top-level section. Each is total over missing or malformed
//! input: anything it cannot use is replaced with the empty default and
//! reported to the [`Diagnostics`] sink. The only failure is a missing
//! `metadata.name`, `metadata.version` or `metadata.description`.

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::{ForgeError, ForgeResult};
use crate::models::*;
use crate::raw::{
    as_mapping, kind, opt_text, plain, record, scalar_text, text, RawDocument, RawEntry, Record,
    RecordValue,
};

/// Metadata keys that must be present, in the order they are checked.
pub const REQUIRED_METADATA: [&str; 3] = ["name", "version", "description"];

/// Converts a [`RawDocument`] into a [`Specification`].
pub struct Normalizer<'a> {
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> Normalizer<'a> {
    pub fn new(diagnostics: &'a dyn Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Normalize every section of the document.
    pub fn normalize(&self, doc: &RawDocument) -> ForgeResult<Specification> {
        let metadata = self.metadata(doc)?;
        debug!("Normalizing specification '{}' v{}", metadata.name, metadata.version);

        Ok(Specification {
            metadata,
            header_format: self.header_format(doc),
            register_usage: self.register_usage(doc),
            structures: self.structures(doc),
            algorithms: self.algorithms(doc),
            error_handling: self.error_handling(doc),
            section_requirements: self.section_requirements(doc),
            performance: self.performance(doc),
            testing: self.testing(doc),
            code_style: self.code_style(doc),
        })
    }

    pub fn metadata(&self, doc: &RawDocument) -> ForgeResult<Metadata> {
        let empty = Mapping::new();
        let meta = self.mapping(doc.get("metadata"), "metadata").unwrap_or(&empty);

        let required = |key: &str| {
            meta.get(key)
                .and_then(scalar_text)
                .ok_or_else(|| ForgeError::MissingField(format!("metadata.{}", key)))
        };
        let name = required("name")?;
        let version = required("version")?;
        let description = required("description")?;

        let extra = record(meta)
            .into_iter()
            .filter(|(k, _)| !REQUIRED_METADATA.contains(&k.as_str()))
            .collect();

        Ok(Metadata {
            name,
            version,
            description,
            extra,
        })
    }

    pub fn header_format(&self, doc: &RawDocument) -> HeaderFormat {
        let empty = Mapping::new();
        let header = self.mapping(doc.get("header_format"), "header_format").unwrap_or(&empty);

        HeaderFormat {
            border_line: text(header, "border_line"),
            file_name_line: text(header, "file_name_line"),
            description_line: text(header, "description_line"),
            blank_comment: text(header, "blank_comment"),
            assembly_lines: self.list(header, "assembly_lines", "header_format"),
            directives: self.list(header, "directives", "header_format"),
        }
    }

    pub fn register_usage(&self, doc: &RawDocument) -> RegisterUsage {
        let registers = match doc.get("register_usage").map(plain) {
            Some(Value::Sequence(_)) => {
                self.coerced("register_usage", "bare list read as general_purpose registers");
                doc.get("register_usage")
            }
            _ => doc
                .section("register_usage")
                .and_then(|usage| usage.get("general_purpose")),
        };

        let general_purpose = self
            .mappings(registers, "register_usage.general_purpose")
            .into_iter()
            .map(|reg| RegisterInfo {
                name: text(reg, "name"),
                purpose: text(reg, "purpose"),
                byte_regs: self.list(reg, "byte_regs", "register_usage.general_purpose"),
                constraints: self.list(reg, "constraints", "register_usage.general_purpose"),
            })
            .collect::<Vec<_>>();

        debug!("Normalized {} registers", general_purpose.len());
        RegisterUsage { general_purpose }
    }

    pub fn structures(&self, doc: &RawDocument) -> IndexMap<String, DataStructure> {
        let mut structures = IndexMap::new();

        for (name, value) in self.named_entries(doc.get("structures"), "structures") {
            let path = format!("structures.{}", name);
            let empty = Mapping::new();
            let raw = self.mapping(Some(value), &path).unwrap_or(&empty);

            let fields_path = format!("{}.fields", path);
            let fields = self
                .mappings(raw.get("fields"), &fields_path)
                .into_iter()
                .map(|field| Field {
                    name: text(field, "name"),
                    ty: text(field, "type"),
                    description: text(field, "description"),
                    constraints: self.list(field, "constraints", &fields_path),
                })
                .collect();

            let structure = DataStructure {
                name: name.clone(),
                fields,
                documentation: text(raw, "documentation"),
                constraints: self.list(raw, "constraints", &path),
                examples: self.list(raw, "examples", &path),
                complexity: self
                    .scalar_map(raw.get("complexity"), &format!("{}.complexity", path)),
            };
            structures.insert(name, structure);
        }

        debug!("Normalized {} structures", structures.len());
        structures
    }

    pub fn algorithms(&self, doc: &RawDocument) -> IndexMap<String, Algorithm> {
        let mut algorithms = IndexMap::new();

        for (name, value) in self.named_entries(doc.get("algorithms"), "algorithms") {
            let path = format!("algorithms.{}", name);
            let empty = Mapping::new();
            let raw = self.mapping(Some(value), &path).unwrap_or(&empty);

            let algorithm = Algorithm {
                name: name.clone(),
                description: text(raw, "description"),
                implementation_requirements: self.implementation_requirements(
                    raw.get("implementation_requirements"),
                    &format!("{}.implementation_requirements", path),
                ),
                steps: self.steps(raw.get("steps"), &format!("{}.steps", path)),
                complexity: self
                    .scalar_map(raw.get("complexity"), &format!("{}.complexity", path)),
                edge_cases: self.list(raw, "edge_cases", &path),
                preconditions: self.list(raw, "preconditions", &path),
                postconditions: self.list(raw, "postconditions", &path),
                invariants: self.list(raw, "invariants", &path),
                examples: self
                    .mappings(raw.get("examples"), &format!("{}.examples", path))
                    .into_iter()
                    .map(record)
                    .collect(),
            };
            algorithms.insert(name, algorithm);
        }

        debug!("Normalized {} algorithms", algorithms.len());
        algorithms
    }

    fn implementation_requirements(
        &self,
        value: Option<&Value>,
        path: &str,
    ) -> ImplementationRequirements {
        let empty = Mapping::new();
        let req = self.mapping(value, path).unwrap_or(&empty);
        let padding_path = format!("{}.padding_rules", path);
        let padding = self
            .mapping(req.get("padding_rules"), &padding_path)
            .unwrap_or(&empty);

        ImplementationRequirements {
            memory_operations: self.list(req, "memory_operations", path),
            encoding_requirements: self.list(req, "encoding_requirements", path),
            leftover_handling: self.list(req, "leftover_handling", path),
            padding_rules: PaddingRules {
                one_byte: self.list(padding, "one_byte", &padding_path),
                two_bytes: self.list(padding, "two_bytes", &padding_path),
            },
        }
    }

    /// Steps are a mapping of step name to actions. A flat list becomes a
    /// single `general` step.
    fn steps(&self, value: Option<&Value>, path: &str) -> IndexMap<String, Vec<String>> {
        match value.map(plain) {
            None | Some(Value::Null) => IndexMap::new(),
            Some(Value::Mapping(_)) => self.list_map(value, path),
            Some(Value::Sequence(_)) => {
                self.coerced(path, format!("flat list folded into step '{}'", GENERAL_GROUP));
                IndexMap::from([(GENERAL_GROUP.to_string(), self.strings(value, path))])
            }
            Some(other) => {
                self.skipped(path, format!("expected a mapping of steps, found {}", kind(other)));
                IndexMap::new()
            }
        }
    }

    pub fn error_handling(&self, doc: &RawDocument) -> ErrorHandling {
        let empty = Mapping::new();
        let raw = self.mapping(doc.get("error_handling"), "error_handling").unwrap_or(&empty);

        let strategies = match raw.get("strategies").map(plain) {
            None | Some(Value::Null) => IndexMap::new(),
            Some(Value::Sequence(_)) => {
                self.coerced(
                    "error_handling.strategies",
                    format!("flat list folded into strategy '{}'", GENERAL_GROUP),
                );
                let strategies = self.list(raw, "strategies", "error_handling");
                IndexMap::from([(GENERAL_GROUP.to_string(), strategies)])
            }
            Some(Value::Mapping(_)) => {
                self.list_map(raw.get("strategies"), "error_handling.strategies")
            }
            Some(other) => {
                self.skipped(
                    "error_handling.strategies",
                    format!("expected a list or mapping, found {}", kind(other)),
                );
                IndexMap::new()
            }
        };

        let error_types = self
            .entries(raw.get("error_types"), "error_handling.error_types")
            .into_iter()
            .map(|entry| match entry {
                RawEntry::Bare(name) => ErrorType::from_name(name),
                RawEntry::Full(err) => {
                    let name = text(err, "name");
                    let description = opt_text(err, "description")
                        .unwrap_or_else(|| default_error_description(&name));
                    let handling = match err.get("handling") {
                        Some(v) if !plain(v).is_null() => {
                            self.strings(Some(v), "error_handling.error_types")
                        }
                        _ => default_error_handling(),
                    };
                    ErrorType {
                        name,
                        description,
                        handling,
                    }
                }
            })
            .collect();

        ErrorHandling {
            strategies,
            error_types,
            syscall_requirements: self.list(raw, "syscall_requirements", "error_handling"),
        }
    }

    pub fn section_requirements(&self, doc: &RawDocument) -> SectionRequirements {
        let empty = Mapping::new();
        let raw = self
            .mapping(doc.get("section_requirements"), "section_requirements")
            .unwrap_or(&empty);

        let variables = match raw.get("bss").map(plain) {
            Some(Value::Mapping(bss)) => bss.get("variables"),
            Some(Value::Sequence(_)) => raw.get("bss"),
            _ => None,
        };

        let bss = self
            .mappings(variables, "section_requirements.bss")
            .into_iter()
            .map(|var| {
                let name = text(var, "name");
                BssVariable {
                    size: self.bss_value(var, "size", &name),
                    align: self.bss_value(var, "align", &name),
                    purpose: text(var, "purpose"),
                    name,
                }
            })
            .collect();

        SectionRequirements {
            data: self.list(raw, "data", "section_requirements"),
            bss,
            text: self.list_map(raw.get("text"), "section_requirements.text"),
        }
    }

    /// A size or alignment as written: integers stay numeric, anything
    /// scalar is kept as text.
    fn bss_value(&self, var: &Mapping, key: &str, variable: &str) -> BssValue {
        match var.get(key).map(plain) {
            None | Some(Value::Null) => BssValue::default(),
            Some(Value::Number(n)) => match n.as_u64() {
                Some(value) => BssValue::Bytes(value),
                None => BssValue::Expr(n.to_string()),
            },
            Some(other) => match scalar_text(other) {
                Some(text) => BssValue::Expr(text),
                None => {
                    self.skipped(
                        format!("section_requirements.bss.{}.{}", variable, key),
                        format!("expected a number or expression, found {}", kind(other)),
                    );
                    BssValue::default()
                }
            },
        }
    }

    pub fn performance(&self, doc: &RawDocument) -> Performance {
        let empty = Mapping::new();
        let raw = self.mapping(doc.get("performance"), "performance").unwrap_or(&empty);

        let benchmarks = self
            .mappings(raw.get("benchmarks"), "performance.benchmarks")
            .into_iter()
            .map(|bench| Benchmark {
                name: text(bench, "name"),
                input_size: text(bench, "input_size"),
                expected_time: text(bench, "expected_time"),
                requirements: self.list(bench, "requirements", "performance.benchmarks"),
            })
            .collect();

        Performance {
            time_complexity: text(raw, "time_complexity"),
            space_complexity: text(raw, "space_complexity"),
            constraints: self.list(raw, "constraints", "performance"),
            register_usage: self.list(raw, "register_usage", "performance"),
            memory_access: self.list(raw, "memory_access", "performance"),
            benchmarks,
        }
    }

    pub fn testing(&self, doc: &RawDocument) -> Testing {
        let empty = Mapping::new();
        let raw = self.mapping(doc.get("testing"), "testing").unwrap_or(&empty);

        let unit_tests = self
            .entries(raw.get("unit_tests"), "testing.unit_tests")
            .into_iter()
            .map(|entry| match entry {
                RawEntry::Bare(name) => TestCase::placeholder(name),
                RawEntry::Full(test) => TestCase {
                    name: text(test, "name"),
                    input: value_or_placeholder(test.get("input")),
                    expected_output: value_or_placeholder(test.get("expected_output")),
                    validation: self.list(test, "validation", "testing.unit_tests"),
                },
            })
            .collect();

        Testing {
            unit_tests,
            integration_tests: self.records(
                raw.get("integration_tests"),
                "testing.integration_tests",
                "name",
            ),
            conformance_tests: self.records(
                raw.get("conformance_tests"),
                "testing.conformance_tests",
                "standard",
            ),
        }
    }

    pub fn code_style(&self, doc: &RawDocument) -> CodeStyle {
        let empty = Mapping::new();
        let raw = self.mapping(doc.get("code_style"), "code_style").unwrap_or(&empty);

        CodeStyle {
            indentation: self.list(raw, "indentation", "code_style"),
            comments: self.list(raw, "comments", "code_style"),
            naming: self.list(raw, "naming", "code_style"),
            organization: self.list(raw, "organization", "code_style"),
        }
    }

    /// Open-ended records; a bare string is wrapped as `{bare_key: string}`.
    fn records(&self, value: Option<&Value>, path: &str, bare_key: &str) -> Vec<Record> {
        self.entries(value, path)
            .into_iter()
            .map(|entry| match entry {
                RawEntry::Bare(s) => Record::from([(bare_key.to_string(), RecordValue::Text(s))]),
                RawEntry::Full(map) => record(map),
            })
            .collect()
    }

    /// Items of a list, or nothing if the value is absent or not a list.
    fn items<'v>(&self, value: Option<&'v Value>, path: &str) -> &'v [Value] {
        match value.map(plain) {
            None | Some(Value::Null) => &[],
            Some(Value::Sequence(items)) => items.as_slice(),
            Some(other) => {
                self.skipped(path, format!("expected a list, found {}", kind(other)));
                &[]
            }
        }
    }

    /// String-or-mapping list entries.
    fn entries<'v>(&self, value: Option<&'v Value>, path: &str) -> Vec<RawEntry<'v>> {
        self.items(value, path)
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let entry = RawEntry::classify(item);
                if entry.is_none() {
                    self.skipped(
                        path,
                        format!("entry {} is {}, expected a string or mapping", index, kind(item)),
                    );
                }
                entry
            })
            .collect()
    }

    /// Mapping-only list entries.
    fn mappings<'v>(&self, value: Option<&'v Value>, path: &str) -> Vec<&'v Mapping> {
        self.items(value, path)
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let map = as_mapping(item);
                if map.is_none() {
                    self.skipped(
                        path,
                        format!("entry {} is {}, expected a mapping", index, kind(item)),
                    );
                }
                map
            })
            .collect()
    }

    /// Entries of a name-keyed mapping section, in document order.
    fn named_entries<'v>(&self, value: Option<&'v Value>, path: &str) -> Vec<(String, &'v Value)> {
        let Some(map) = self.mapping(value, path) else {
            return Vec::new();
        };
        map.iter()
            .filter_map(|(k, v)| Some((self.key_name(k, path)?, v)))
            .collect()
    }

    /// Strings under `key`. A bare scalar becomes a one-element list.
    fn list(&self, map: &Mapping, key: &str, path: &str) -> Vec<String> {
        self.strings(map.get(key), &format!("{}.{}", path, key))
    }

    fn strings(&self, value: Option<&Value>, path: &str) -> Vec<String> {
        match value.map(plain) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    let text = scalar_text(item);
                    if text.is_none() {
                        self.skipped(
                            path,
                            format!("entry {} is {}, expected a string", index, kind(item)),
                        );
                    }
                    text
                })
                .collect(),
            Some(other) => match scalar_text(other) {
                Some(text) => vec![text],
                None => {
                    self.skipped(path, format!("expected a list of strings, found {}", kind(other)));
                    Vec::new()
                }
            },
        }
    }

    /// Name to scalar, such as complexity metrics. Null values become empty text.
    fn scalar_map(&self, value: Option<&Value>, path: &str) -> IndexMap<String, String> {
        let Some(map) = self.mapping(value, path) else {
            return IndexMap::new();
        };
        map.iter()
            .filter_map(|(k, v)| {
                let name = self.key_name(k, path)?;
                match plain(v) {
                    Value::Null => Some((name, String::new())),
                    other => match scalar_text(other) {
                        Some(text) => Some((name, text)),
                        None => {
                            self.skipped(
                                format!("{}.{}", path, name),
                                format!("expected a scalar, found {}", kind(other)),
                            );
                            None
                        }
                    },
                }
            })
            .collect()
    }

    /// Name to ordered strings, such as steps or text section categories.
    fn list_map(&self, value: Option<&Value>, path: &str) -> IndexMap<String, Vec<String>> {
        let Some(map) = self.mapping(value, path) else {
            return IndexMap::new();
        };
        map.iter()
            .filter_map(|(k, v)| {
                let name = self.key_name(k, path)?;
                let items = self.strings(Some(v), &format!("{}.{}", path, name));
                Some((name, items))
            })
            .collect()
    }

    fn key_name(&self, key: &Value, path: &str) -> Option<String> {
        let name = scalar_text(key);
        if name.is_none() {
            self.skipped(path, format!("key of {} is not a name", kind(key)));
        }
        name
    }

    /// A value expected to be a mapping. Null and absent are silently `None`.
    fn mapping<'v>(&self, value: Option<&'v Value>, path: &str) -> Option<&'v Mapping> {
        match value.map(plain) {
            None | Some(Value::Null) => None,
            Some(Value::Mapping(map)) => Some(map),
            Some(other) => {
                self.skipped(path, format!("expected a mapping, found {}; using defaults", kind(other)));
                None
            }
        }
    }

    fn coerced(&self, path: impl Into<String>, message: impl Into<String>) {
        self.diagnostics.report(Diagnostic {
            kind: DiagnosticKind::Coerced,
            path: path.into(),
            message: message.into(),
        });
    }

    fn skipped(&self, path: impl Into<String>, message: impl Into<String>) {
        self.diagnostics.report(Diagnostic {
            kind: DiagnosticKind::Skipped,
            path: path.into(),
            message: message.into(),
        });
    }
}

fn value_or_placeholder(value: Option<&Value>) -> RecordValue {
    match value {
        Some(v) if !plain(v).is_null() => RecordValue::from_value(v),
        _ => RecordValue::from(PLACEHOLDER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectedDiagnostics;

    fn doc(src: &str) -> RawDocument {
        RawDocument::from_value(serde_yaml::from_str(src).unwrap()).unwrap()
    }

    const META: &str = "metadata: {name: memcpy_impl, version: '1.0', description: fast copy}\n";

    #[test]
    fn test_missing_sections_default() {
        let sink = CollectedDiagnostics::new();
        let spec = Normalizer::new(&sink).normalize(&doc(META)).unwrap();

        assert_eq!(spec.metadata.name, "memcpy_impl");
        assert_eq!(spec.header_format, HeaderFormat::default());
        assert_eq!(spec.register_usage, RegisterUsage::default());
        assert!(spec.structures.is_empty());
        assert!(spec.algorithms.is_empty());
        assert_eq!(spec.error_handling, ErrorHandling::default());
        assert_eq!(spec.section_requirements, SectionRequirements::default());
        assert_eq!(spec.performance, Performance::default());
        assert_eq!(spec.testing, Testing::default());
        assert_eq!(spec.code_style, CodeStyle::default());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_missing_metadata_fields_are_named() {
        let sink = CollectedDiagnostics::new();
        let normalizer = Normalizer::new(&sink);

        let cases = [
            ("metadata: {version: '1', description: d}", "metadata.name"),
            ("metadata: {name: n, description: d}", "metadata.version"),
            ("metadata: {name: n, version: '1'}", "metadata.description"),
            ("metadata: {name: n, version: '1', description: ~}", "metadata.description"),
            ("structures: {}", "metadata.name"),
        ];
        for (src, field) in cases {
            match normalizer.normalize(&doc(src)) {
                Err(ForgeError::MissingField(f)) => assert_eq!(f, field, "for {}", src),
                other => panic!("expected missing {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_metadata_extra_keys_kept_in_order() {
        let sink = CollectedDiagnostics::new();
        let src = "metadata: {name: n, author: me, version: 2, description: d, license: MIT}";
        let meta = Normalizer::new(&sink).metadata(&doc(src)).unwrap();

        assert_eq!(meta.version, "2");
        let keys: Vec<_> = meta.extra.keys().cloned().collect();
        assert_eq!(keys, vec!["author", "license"]);
    }

    #[test]
    fn test_strategy_shapes() {
        let sink = CollectedDiagnostics::new();
        let normalizer = Normalizer::new(&sink);

        let eh = normalizer.error_handling(&doc(
            "error_handling: {strategies: [check bounds, log]}",
        ));
        assert_eq!(eh.strategies.len(), 1);
        assert_eq!(eh.strategies["general"], vec!["check bounds", "log"]);

        let eh = normalizer.error_handling(&doc("error_handling: {strategies: {io: [retry]}}"));
        assert_eq!(eh.strategies.len(), 1);
        assert_eq!(eh.strategies["io"], vec!["retry"]);

        let eh = normalizer.error_handling(&doc("error_handling: {strategies: 7}"));
        assert!(eh.strategies.is_empty());
    }

    #[test]
    fn test_error_type_expansion_is_idempotent() {
        let sink = CollectedDiagnostics::new();
        let normalizer = Normalizer::new(&sink);

        let bare = normalizer.error_handling(&doc("error_handling: {error_types: [overflow]}"));
        let full = normalizer.error_handling(&doc(
            "error_handling:\n  error_types:\n    - name: overflow\n      description: Handle overflow\n      handling: [Detect, Log, Handle]\n",
        ));
        let partial = normalizer.error_handling(&doc(
            "error_handling: {error_types: [{name: overflow}]}",
        ));

        assert_eq!(bare.error_types, vec![ErrorType::from_name("overflow")]);
        assert_eq!(bare.error_types, full.error_types);
        assert_eq!(bare.error_types, partial.error_types);
    }

    #[test]
    fn test_error_type_explicit_empty_handling_is_kept() {
        let sink = CollectedDiagnostics::new();
        let eh = Normalizer::new(&sink).error_handling(&doc(
            "error_handling: {error_types: [{name: eof, handling: []}]}",
        ));
        assert!(eh.error_types[0].handling.is_empty());
    }

    #[test]
    fn test_unit_test_shapes() {
        let sink = CollectedDiagnostics::new();
        let testing = Normalizer::new(&sink).testing(&doc(
            "testing:\n  unit_tests:\n    - empty input\n    - name: one byte\n      input: 'M'\n      validation: [check padding]\n    - 12\n",
        ));

        assert_eq!(testing.unit_tests.len(), 2);
        assert_eq!(testing.unit_tests[0], TestCase::placeholder("empty input"));

        let full = &testing.unit_tests[1];
        assert_eq!(full.input, RecordValue::from("M"));
        assert_eq!(full.expected_output, RecordValue::from(PLACEHOLDER));
        assert_eq!(full.validation, vec!["check padding"]);

        let skipped = sink.items();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].kind, DiagnosticKind::Skipped);
        assert_eq!(skipped[0].path, "testing.unit_tests");
    }

    #[test]
    fn test_integration_and_conformance_wrapping() {
        let sink = CollectedDiagnostics::new();
        let testing = Normalizer::new(&sink).testing(&doc(
            "testing:\n  integration_tests: [roundtrip, {name: pipe, steps: [a, b]}]\n  conformance_tests: [RFC 4648]\n",
        ));

        assert_eq!(testing.integration_tests[0]["name"], RecordValue::from("roundtrip"));
        assert_eq!(testing.integration_tests[1].len(), 2);
        assert_eq!(testing.conformance_tests[0]["standard"], RecordValue::from("RFC 4648"));
        assert_eq!(testing.conformance_tests[0].len(), 1);
    }

    #[test]
    fn test_algorithm_order_and_steps() {
        let sink = CollectedDiagnostics::new();
        let algorithms = Normalizer::new(&sink).algorithms(&doc(
            "algorithms:\n  zeta:\n    steps:\n      load: [read, check]\n      emit: write\n  alpha: {}\n  mid:\n    steps: [one, two]\n",
        ));

        let names: Vec<_> = algorithms.keys().cloned().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);

        let zeta = &algorithms["zeta"];
        let steps: Vec<_> = zeta.steps.keys().cloned().collect();
        assert_eq!(steps, vec!["load", "emit"]);
        assert_eq!(zeta.steps["load"], vec!["read", "check"]);
        assert_eq!(zeta.steps["emit"], vec!["write"]);

        assert!(algorithms["alpha"].steps.is_empty());
        assert_eq!(algorithms["mid"].steps["general"], vec!["one", "two"]);

        let items = sink.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, DiagnosticKind::Coerced);
        assert_eq!(items[0].path, "algorithms.mid.steps");
    }

    #[test]
    fn test_bss_shapes_and_sizes() {
        let sink = CollectedDiagnostics::new();
        let normalizer = Normalizer::new(&sink);

        let nested = normalizer.section_requirements(&doc(
            "section_requirements:\n  bss:\n    variables:\n      - {name: buf, size: 4096, align: 16, purpose: scratch}\n      - {name: out, size: BUF_LEN * 4 / 3, align: '8', purpose: output}\n",
        ));
        assert_eq!(nested.bss.len(), 2);
        assert_eq!(nested.bss[0].size, BssValue::Bytes(4096));
        assert_eq!(nested.bss[0].align, BssValue::Bytes(16));
        assert_eq!(nested.bss[1].size, BssValue::Expr("BUF_LEN * 4 / 3".into()));
        assert_eq!(nested.bss[1].align, BssValue::Expr("8".into()));

        let flat = normalizer.section_requirements(&doc(
            "section_requirements:\n  bss:\n    - {name: buf}\n",
        ));
        assert_eq!(flat.bss.len(), 1);
        assert_eq!(flat.bss[0].size, BssValue::default());
        assert_eq!(flat.bss[0].align, BssValue::default());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_symbolic_alignment_is_kept() {
        let sink = CollectedDiagnostics::new();
        let reqs = Normalizer::new(&sink).section_requirements(&doc(
            "section_requirements:\n  bss:\n    - {name: buf, size: PAGE, align: PAGE_SIZE}\n    - {name: odd, align: [4, 8]}\n",
        ));

        assert_eq!(reqs.bss[0].size, BssValue::Expr("PAGE".into()));
        assert_eq!(reqs.bss[0].align, BssValue::Expr("PAGE_SIZE".into()));
        assert_eq!(reqs.bss[0].align.to_string(), "PAGE_SIZE");

        assert_eq!(reqs.bss[1].align, BssValue::default());
        let items = sink.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, DiagnosticKind::Skipped);
        assert_eq!(items[0].path, "section_requirements.bss.odd.align");
    }

    #[test]
    fn test_string_list_coercion() {
        let sink = CollectedDiagnostics::new();
        let style = Normalizer::new(&sink).code_style(&doc(
            "code_style:\n  naming: [one, 2, true]\n  comments: single\n  indentation: ~\n",
        ));

        assert_eq!(style.naming, vec!["one", "2", "true"]);
        assert_eq!(style.comments, vec!["single"]);
        assert!(style.indentation.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_text_categories_keep_order() {
        let sink = CollectedDiagnostics::new();
        let reqs = Normalizer::new(&sink).section_requirements(&doc(
            "section_requirements:\n  text: {zeta: [a], alpha: b, mid: []}\n",
        ));

        let keys: Vec<_> = reqs.text.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(reqs.text["alpha"], vec!["b"]);
        assert!(reqs.text["mid"].is_empty());
    }

    #[test]
    fn test_non_scalar_list_items_are_reported() {
        let sink = CollectedDiagnostics::new();
        let algorithms = Normalizer::new(&sink).algorithms(&doc(
            "algorithms:\n  copy:\n    edge_cases: [{empty: input}, overlap]\n    steps:\n      load: [{op: mov}, read]\n    complexity:\n      time: {best: O(1)}\n      space: O(1)\n",
        ));

        let copy = &algorithms["copy"];
        assert_eq!(copy.edge_cases, vec!["overlap"]);
        assert_eq!(copy.steps["load"], vec!["read"]);
        let metrics: Vec<_> = copy.complexity.keys().cloned().collect();
        assert_eq!(metrics, vec!["space"]);

        let items = sink.items();
        let paths: Vec<_> = items.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "algorithms.copy.steps.load",
                "algorithms.copy.complexity.time",
                "algorithms.copy.edge_cases",
            ]
        );
        assert!(items.iter().all(|d| d.kind == DiagnosticKind::Skipped));
    }

    #[test]
    fn test_wrong_section_shape_falls_back_to_default() {
        let sink = CollectedDiagnostics::new();
        let src = format!("{}header_format: [not, a, mapping]\ncode_style: plain\n", META);
        let spec = Normalizer::new(&sink).normalize(&doc(&src)).unwrap();

        assert_eq!(spec.header_format, HeaderFormat::default());
        assert_eq!(spec.code_style, CodeStyle::default());
        let paths: Vec<_> = sink.items().into_iter().map(|d| d.path).collect();
        assert_eq!(paths, vec!["header_format", "code_style"]);
    }

    #[test]
    fn test_register_usage_shapes() {
        let sink = CollectedDiagnostics::new();
        let normalizer = Normalizer::new(&sink);

        let usage = normalizer.register_usage(&doc(
            "register_usage:\n  general_purpose:\n    - {name: rax, purpose: accumulator, byte_regs: [al, ah]}\n    - {name: rsi}\n",
        ));
        assert_eq!(usage.general_purpose.len(), 2);
        assert_eq!(usage.general_purpose[0].byte_regs, vec!["al", "ah"]);
        assert_eq!(usage.general_purpose[1].purpose, "");

        let bare = normalizer.register_usage(&doc("register_usage: [{name: rdi, purpose: src}]"));
        assert_eq!(bare.general_purpose[0].name, "rdi");
    }
}
