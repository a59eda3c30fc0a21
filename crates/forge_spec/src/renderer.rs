//! Plain-text report rendering.
//!
//! Walks the typed model once in fixed section order. Section headers are
//! always written; list-valued sub-labels only when the list has entries.

use crate::models::*;
use crate::raw::{Record, RecordValue};

/// Default number of spaces per nesting level.
pub const DEFAULT_INDENT: usize = 2;

/// Renders a [`Specification`] as a plain-text report.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    indent_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            indent_width: DEFAULT_INDENT,
        }
    }

    /// Use `width` spaces per nesting level instead of the default two.
    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Render the whole report.
    pub fn render(&self, spec: &Specification) -> String {
        let mut out = Report::new(self.indent_width);

        self.metadata(&mut out, &spec.metadata);
        self.header_format(&mut out, &spec.header_format);
        self.register_usage(&mut out, &spec.register_usage);
        self.structures(&mut out, spec);
        self.algorithms(&mut out, spec);
        self.error_handling(&mut out, &spec.error_handling);
        self.section_requirements(&mut out, &spec.section_requirements);
        self.performance(&mut out, &spec.performance);
        self.testing(&mut out, &spec.testing);
        self.code_style(&mut out, &spec.code_style);

        out.finish()
    }

    fn metadata(&self, out: &mut Report, meta: &Metadata) {
        out.line(0, "=== SPECIFICATION ===");
        out.line(0, format!("Name: {}", meta.name));
        out.line(0, format!("Version: {}", meta.version));
        out.line(0, format!("Description: {}", meta.description));
        for (key, value) in &meta.extra {
            out.value(0, key, value);
        }
        out.blank();
    }

    fn header_format(&self, out: &mut Report, header: &HeaderFormat) {
        out.line(0, "=== HEADER FORMAT ===");
        out.line(0, format!("Border Line: {}", header.border_line));
        out.line(0, format!("File Name Line: {}", header.file_name_line));
        out.line(0, format!("Description Line: {}", header.description_line));
        out.line(0, format!("Blank Comment: {}", header.blank_comment));
        out.line(0, "Assembly Lines:");
        for line in &header.assembly_lines {
            out.line(1, line);
        }
        out.line(0, "Directives:");
        for directive in &header.directives {
            out.line(1, directive);
        }
        out.blank();
    }

    fn register_usage(&self, out: &mut Report, usage: &RegisterUsage) {
        out.line(0, "=== REGISTER USAGE ===");
        for reg in &usage.general_purpose {
            out.line(0, format!("Register: {}", reg.name));
            out.line(0, format!("Purpose: {}", reg.purpose));
            if !reg.byte_regs.is_empty() {
                out.line(0, format!("Byte Registers: {}", reg.byte_regs.join(", ")));
            }
            out.optional_bullets(0, "Constraints", &reg.constraints);
            out.blank();
        }
    }

    fn structures(&self, out: &mut Report, spec: &Specification) {
        out.line(0, "=== DATA STRUCTURES ===");
        for (name, structure) in &spec.structures {
            out.line(0, format!("Structure: {}", name));
            out.line(0, format!("Documentation: {}", structure.documentation));
            out.line(0, "Fields:");
            for field in &structure.fields {
                out.line(1, format!("{} ({}): {}", field.name, field.ty, field.description));
                out.bullets(2, &field.constraints);
            }
            out.optional_bullets(0, "Constraints", &structure.constraints);
            out.optional_bullets(0, "Examples", &structure.examples);
            complexity(out, 0, &structure.complexity);
            out.blank();
        }
    }

    fn algorithms(&self, out: &mut Report, spec: &Specification) {
        out.line(0, "=== ALGORITHMS ===");
        for (name, algo) in &spec.algorithms {
            out.line(0, format!("Algorithm: {}", name));
            out.line(0, format!("Description: {}", algo.description));

            let req = &algo.implementation_requirements;
            out.line(0, "Implementation Requirements:");
            out.labeled_bullets(1, "Memory Operations", &req.memory_operations);
            out.labeled_bullets(1, "Encoding Requirements", &req.encoding_requirements);
            out.labeled_bullets(1, "Leftover Handling", &req.leftover_handling);
            out.line(1, "Padding Rules:");
            out.labeled_bullets(2, "One Byte", &req.padding_rules.one_byte);
            out.labeled_bullets(2, "Two Bytes", &req.padding_rules.two_bytes);

            out.line(0, "Steps:");
            for (step, actions) in &algo.steps {
                out.labeled_bullets(1, step, actions);
            }

            out.optional_bullets(0, "Edge Cases", &algo.edge_cases);
            out.optional_bullets(0, "Preconditions", &algo.preconditions);
            out.optional_bullets(0, "Postconditions", &algo.postconditions);
            out.optional_bullets(0, "Invariants", &algo.invariants);
            complexity(out, 0, &algo.complexity);
            if !algo.examples.is_empty() {
                out.line(0, "Examples:");
                for (index, example) in algo.examples.iter().enumerate() {
                    out.line(1, format!("Example {}:", index + 1));
                    out.record(2, example);
                }
            }
            out.blank();
        }
    }

    fn error_handling(&self, out: &mut Report, eh: &ErrorHandling) {
        out.line(0, "=== ERROR HANDLING ===");
        out.line(0, "Strategies:");
        for (strategy, steps) in &eh.strategies {
            out.labeled_bullets(1, strategy, steps);
        }

        out.line(0, "Error Types:");
        for error in &eh.error_types {
            out.line(1, format!("{}:", error.name));
            out.line(2, format!("Description: {}", error.description));
            out.labeled_bullets(2, "Handling", &error.handling);
        }

        out.labeled_bullets(0, "Syscall Requirements", &eh.syscall_requirements);
        out.blank();
    }

    fn section_requirements(&self, out: &mut Report, reqs: &SectionRequirements) {
        out.line(0, "=== SECTION REQUIREMENTS ===");
        out.labeled_bullets(0, "Data Section", &reqs.data);

        out.line(0, "BSS Section:");
        for var in &reqs.bss {
            out.line(1, format!("{}:", var.name));
            out.line(2, format!("Size: {}", var.size));
            out.line(2, format!("Align: {}", var.align));
            out.line(2, format!("Purpose: {}", var.purpose));
        }

        out.line(0, "Text Section:");
        for (category, items) in &reqs.text {
            out.labeled_bullets(1, category, items);
        }
        out.blank();
    }

    fn performance(&self, out: &mut Report, perf: &Performance) {
        out.line(0, "=== PERFORMANCE ===");
        out.line(0, format!("Time Complexity: {}", perf.time_complexity));
        out.line(0, format!("Space Complexity: {}", perf.space_complexity));
        out.labeled_bullets(0, "Constraints", &perf.constraints);
        out.labeled_bullets(0, "Register Usage", &perf.register_usage);
        out.labeled_bullets(0, "Memory Access", &perf.memory_access);

        out.line(0, "Benchmarks:");
        for bench in &perf.benchmarks {
            out.line(1, format!("{}:", bench.name));
            out.line(2, format!("Input Size: {}", bench.input_size));
            if !bench.expected_time.is_empty() {
                out.line(2, format!("Expected Time: {}", bench.expected_time));
            }
            out.optional_bullets(2, "Requirements", &bench.requirements);
        }
        out.blank();
    }

    fn testing(&self, out: &mut Report, testing: &Testing) {
        out.line(0, "=== TESTING ===");
        out.line(0, "Unit Tests:");
        for test in &testing.unit_tests {
            out.line(1, format!("{}:", test.name));
            out.value(2, "Input", &test.input);
            out.value(2, "Expected Output", &test.expected_output);
            out.optional_bullets(2, "Validation", &test.validation);
        }

        out.line(0, "Integration Tests:");
        for test in &testing.integration_tests {
            out.line(1, format!("{}:", inline_field(test, "name")));
            for (key, value) in test.iter().filter(|(k, _)| k.as_str() != "name") {
                out.value(2, key, value);
            }
        }

        out.line(0, "Conformance Tests:");
        for test in &testing.conformance_tests {
            out.line(1, format!("Standard: {}", inline_field(test, "standard")));
            if let Some(vectors) = test.get("test_vectors") {
                out.line(1, "Test Vectors:");
                test_vectors(out, 2, vectors);
            }
            for (key, value) in test
                .iter()
                .filter(|(k, _)| !matches!(k.as_str(), "standard" | "test_vectors"))
            {
                out.value(1, key, value);
            }
        }
        out.blank();
    }

    fn code_style(&self, out: &mut Report, style: &CodeStyle) {
        out.line(0, "=== CODE STYLE ===");
        out.labeled_bullets(0, "Indentation", &style.indentation);
        out.labeled_bullets(0, "Comments", &style.comments);
        out.labeled_bullets(0, "Naming", &style.naming);
        out.labeled_bullets(0, "Organization", &style.organization);
    }
}

fn complexity(out: &mut Report, depth: usize, metrics: &indexmap::IndexMap<String, String>) {
    if metrics.is_empty() {
        return;
    }
    out.line(depth, "Complexity:");
    for (metric, value) in metrics {
        out.line(depth + 1, format!("{}: {}", metric, value));
    }
}

fn test_vectors(out: &mut Report, depth: usize, vectors: &RecordValue) {
    let RecordValue::List(items) = vectors else {
        out.value(depth, "Vectors", vectors);
        return;
    };
    for vector in items {
        match vector {
            RecordValue::Map(fields) => {
                out.value(depth, "Input", fields.get("input").unwrap_or(&RecordValue::default()));
                out.value(depth, "Output", fields.get("output").unwrap_or(&RecordValue::default()));
                for (key, value) in fields
                    .iter()
                    .filter(|(k, _)| !matches!(k.as_str(), "input" | "output"))
                {
                    out.value(depth, key, value);
                }
            }
            other => out.item(depth, other),
        }
    }
}

/// Scalar text of a record field, empty when absent or not a scalar.
fn inline_field(record: &Record, key: &str) -> String {
    record.get(key).and_then(RecordValue::inline).unwrap_or_default()
}

/// Line accumulator with fixed-width indentation.
struct Report {
    lines: Vec<String>,
    unit: String,
}

impl Report {
    fn new(indent_width: usize) -> Self {
        Self {
            lines: Vec::new(),
            unit: " ".repeat(indent_width),
        }
    }

    fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", self.unit.repeat(depth), text.as_ref()));
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn bullets(&mut self, depth: usize, items: &[String]) {
        for item in items {
            self.line(depth, format!("- {}", item));
        }
    }

    /// Label followed by its bullets, written even when there are none.
    fn labeled_bullets(&mut self, depth: usize, label: &str, items: &[String]) {
        self.line(depth, format!("{}:", label));
        self.bullets(depth + 1, items);
    }

    /// Label and bullets, written only when there is at least one item.
    fn optional_bullets(&mut self, depth: usize, label: &str, items: &[String]) {
        if !items.is_empty() {
            self.labeled_bullets(depth, label, items);
        }
    }

    /// `label: scalar`, or the label followed by the nested value.
    fn value(&mut self, depth: usize, label: &str, value: &RecordValue) {
        match value {
            RecordValue::List(items) => {
                self.line(depth, format!("{}:", label));
                for item in items {
                    self.item(depth + 1, item);
                }
            }
            RecordValue::Map(fields) => {
                self.line(depth, format!("{}:", label));
                self.record(depth + 1, fields);
            }
            scalar => {
                let text = scalar.inline().unwrap_or_default();
                self.line(depth, format!("{}: {}", label, text));
            }
        }
    }

    fn item(&mut self, depth: usize, item: &RecordValue) {
        match item.inline() {
            Some(text) => self.line(depth, format!("- {}", text)),
            None => {
                self.line(depth, "-");
                match item {
                    RecordValue::Map(fields) => self.record(depth + 1, fields),
                    RecordValue::List(items) => {
                        for nested in items {
                            self.item(depth + 1, nested);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn record(&mut self, depth: usize, record: &Record) {
        for (key, value) in record {
            self.value(depth, key, value);
        }
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}
