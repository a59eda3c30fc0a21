//! Typed specification model.
//!
//! Every field has an empty-but-present default except the three identity
//! fields of [`Metadata`]. The normalizer builds these once; nothing mutates
//! them afterwards.

use indexmap::IndexMap;
use serde::Serialize;

use crate::raw::{Record, RecordValue};

/// Placeholder used for unit test input/output that has not been written yet.
pub const PLACEHOLDER: &str = "TBD";

/// Handling steps given to an error type that does not list its own.
pub const DEFAULT_ERROR_HANDLING: [&str; 3] = ["Detect", "Log", "Handle"];

/// Name of the single strategy (or step) a flat list is folded into.
pub const GENERAL_GROUP: &str = "general";

/// Complete specification: the root aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Specification {
    pub metadata: Metadata,
    pub header_format: HeaderFormat,
    pub register_usage: RegisterUsage,
    pub structures: IndexMap<String, DataStructure>,
    pub algorithms: IndexMap<String, Algorithm>,
    pub error_handling: ErrorHandling,
    pub section_requirements: SectionRequirements,
    pub performance: Performance,
    pub testing: Testing,
    pub code_style: CodeStyle,
}

impl Specification {
    /// A specification with the given identity and every section defaulted.
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            header_format: HeaderFormat::default(),
            register_usage: RegisterUsage::default(),
            structures: IndexMap::new(),
            algorithms: IndexMap::new(),
            error_handling: ErrorHandling::default(),
            section_requirements: SectionRequirements::default(),
            performance: Performance::default(),
            testing: Testing::default(),
            code_style: CodeStyle::default(),
        }
    }
}

/// Identity of the specified component. No defaults for the three named fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Any further keys, in document order.
    pub extra: Record,
}

impl Metadata {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
            extra: Record::new(),
        }
    }
}

/// File-header conventions.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HeaderFormat {
    pub border_line: String,
    pub file_name_line: String,
    pub description_line: String,
    pub blank_comment: String,
    pub assembly_lines: Vec<String>,
    pub directives: Vec<String>,
}

/// A register and what it is used for.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RegisterInfo {
    pub name: String,
    pub purpose: String,
    /// Sub-registers; empty when the register has none.
    pub byte_regs: Vec<String>,
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RegisterUsage {
    pub general_purpose: Vec<RegisterInfo>,
}

/// A field in a data structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub description: String,
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DataStructure {
    pub name: String,
    pub fields: Vec<Field>,
    pub documentation: String,
    pub constraints: Vec<String>,
    pub examples: Vec<String>,
    pub complexity: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PaddingRules {
    pub one_byte: Vec<String>,
    pub two_bytes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ImplementationRequirements {
    pub memory_operations: Vec<String>,
    pub encoding_requirements: Vec<String>,
    pub leftover_handling: Vec<String>,
    pub padding_rules: PaddingRules,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Algorithm {
    pub name: String,
    pub description: String,
    pub implementation_requirements: ImplementationRequirements,
    /// Step name to ordered actions. Both levels keep document order.
    pub steps: IndexMap<String, Vec<String>>,
    pub complexity: IndexMap<String, String>,
    pub edge_cases: Vec<String>,
    pub preconditions: Vec<String>,
    pub postconditions: Vec<String>,
    pub invariants: Vec<String>,
    pub examples: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ErrorType {
    pub name: String,
    pub description: String,
    pub handling: Vec<String>,
}

impl ErrorType {
    /// Expand a bare error name into its canonical form.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: default_error_description(&name),
            handling: default_error_handling(),
            name,
        }
    }
}

pub fn default_error_description(name: &str) -> String {
    format!("Handle {}", name)
}

pub fn default_error_handling() -> Vec<String> {
    DEFAULT_ERROR_HANDLING.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ErrorHandling {
    pub strategies: IndexMap<String, Vec<String>>,
    pub error_types: Vec<ErrorType>,
    pub syscall_requirements: Vec<String>,
}

/// Size or alignment of a BSS variable, kept in the form it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BssValue {
    Bytes(u64),
    Expr(String),
}

impl Default for BssValue {
    fn default() -> Self {
        Self::Expr(String::new())
    }
}

impl std::fmt::Display for BssValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes(n) => write!(f, "{}", n),
            Self::Expr(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BssVariable {
    pub name: String,
    pub size: BssValue,
    /// Empty when the document gives no alignment.
    pub align: BssValue,
    pub purpose: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SectionRequirements {
    pub data: Vec<String>,
    pub bss: Vec<BssVariable>,
    pub text: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Benchmark {
    pub name: String,
    pub input_size: String,
    /// Empty when no expectation is stated.
    pub expected_time: String,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Performance {
    pub time_complexity: String,
    pub space_complexity: String,
    pub constraints: Vec<String>,
    pub register_usage: Vec<String>,
    pub memory_access: Vec<String>,
    pub benchmarks: Vec<Benchmark>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCase {
    pub name: String,
    pub input: RecordValue,
    pub expected_output: RecordValue,
    pub validation: Vec<String>,
}

impl TestCase {
    /// A named test whose input and expected output are still to be written.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input: RecordValue::from(PLACEHOLDER),
            expected_output: RecordValue::from(PLACEHOLDER),
            validation: Vec::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        let tbd = RecordValue::from(PLACEHOLDER);
        self.input == tbd || self.expected_output == tbd
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Testing {
    pub unit_tests: Vec<TestCase>,
    pub integration_tests: Vec<Record>,
    pub conformance_tests: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CodeStyle {
    pub indentation: Vec<String>,
    pub comments: Vec<String>,
    pub naming: Vec<String>,
    pub organization: Vec<String>,
}
