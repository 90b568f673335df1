//! Declarative expectations against parsed artifacts.
//!
//! Verification failures are data, not control flow: [`evaluate`] always
//! returns an [`AssertionResult`], and the runner aggregates every failing
//! message for a scenario instead of stopping at the first.

use crate::artifact::{ConfigValue, PathLookup, ResponseFile};

/// A typed value an expectation compares against.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedValue {
    /// Expect a boolean leaf
    Bool(bool),
    /// Expect a numeric leaf
    Number(f64),
    /// Expect a string leaf
    String(String),
}

impl ExpectedValue {
    fn type_name(&self) -> &'static str {
        match self {
            ExpectedValue::Bool(_) => "boolean",
            ExpectedValue::Number(_) => "number",
            ExpectedValue::String(_) => "string",
        }
    }
}

impl std::fmt::Display for ExpectedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedValue::Bool(b) => write!(f, "{}", b),
            ExpectedValue::Number(n) => write!(f, "{}", n),
            ExpectedValue::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// A declarative expectation against one artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    /// A configuration-document path must hold an exact typed value.
    ///
    /// Path entries are literal key segments; keys containing dots are a
    /// single segment.
    ConfigKey { path: Vec<String>, expected: ExpectedValue },
    /// A response file must contain this exact directive line.
    ResponseLine { line: String },
    /// A response file must contain this substring in some directive.
    ResponseSubstring { needle: String },
}

impl Expectation {
    /// Expect a boolean at a configuration-document path.
    pub fn config_bool<S: Into<String>>(
        path: impl IntoIterator<Item = S>,
        expected: bool,
    ) -> Self {
        Expectation::ConfigKey {
            path: path.into_iter().map(Into::into).collect(),
            expected: ExpectedValue::Bool(expected),
        }
    }

    /// Expect an exact response-file directive line.
    pub fn response_line(line: impl Into<String>) -> Self {
        Expectation::ResponseLine { line: line.into() }
    }

    /// One-line description for matrix listings and telemetry.
    pub fn describe(&self) -> String {
        match self {
            Expectation::ConfigKey { path, expected } => {
                format!("config[{}] == {}", path.join(" / "), expected)
            }
            Expectation::ResponseLine { line } => format!("response contains line '{}'", line),
            Expectation::ResponseSubstring { needle } => {
                format!("response contains '{}'", needle)
            }
        }
    }
}

/// An artifact an expectation can be evaluated against.
#[derive(Debug)]
pub enum Artifact {
    /// Parsed runtime configuration document
    ConfigDocument(ConfigValue),
    /// Parsed native response file
    ResponseFile(ResponseFile),
}

/// Outcome of evaluating one expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the expectation held
    pub passed: bool,
    /// Human-readable diagnostic, also set on pass
    pub message: String,
}

impl AssertionResult {
    fn pass(message: String) -> Self {
        Self { passed: true, message }
    }

    fn fail(message: String) -> Self {
        Self { passed: false, message }
    }
}

/// Evaluate one expectation against one artifact.
///
/// Distinct failure reasons are reported for a missing path segment, a
/// present-but-wrong-type value, and an equal-type value mismatch. Response
/// file failures list the full ordered directive sequence.
pub fn evaluate(artifact: &Artifact, expectation: &Expectation) -> AssertionResult {
    match (artifact, expectation) {
        (Artifact::ConfigDocument(doc), Expectation::ConfigKey { path, expected }) => {
            evaluate_config_key(doc, path, expected)
        }
        (Artifact::ResponseFile(rsp), Expectation::ResponseLine { line }) => {
            if rsp.contains_line(line) {
                AssertionResult::pass(format!("line '{}' present", line))
            } else {
                AssertionResult::fail(format!(
                    "expected line '{}' not found; actual directives: [{}]",
                    line,
                    rsp.lines().join(", ")
                ))
            }
        }
        (Artifact::ResponseFile(rsp), Expectation::ResponseSubstring { needle }) => {
            if rsp.contains_substring(needle) {
                AssertionResult::pass(format!("substring '{}' present", needle))
            } else {
                AssertionResult::fail(format!(
                    "expected substring '{}' not found; actual directives: [{}]",
                    needle,
                    rsp.lines().join(", ")
                ))
            }
        }
        (Artifact::ConfigDocument(_), _) => AssertionResult::fail(format!(
            "artifact kind mismatch: {} evaluated against a configuration document",
            expectation.describe()
        )),
        (Artifact::ResponseFile(_), Expectation::ConfigKey { .. }) => AssertionResult::fail(
            format!(
                "artifact kind mismatch: {} evaluated against a response file",
                expectation.describe()
            ),
        ),
    }
}

fn evaluate_config_key(
    doc: &ConfigValue,
    path: &[String],
    expected: &ExpectedValue,
) -> AssertionResult {
    let value = match doc.lookup(path) {
        PathLookup::Found(value) => value,
        PathLookup::Missing { segment } => {
            return AssertionResult::fail(format!(
                "missing key: segment '{}' absent in path {}",
                segment,
                path.join(" / ")
            ));
        }
        PathLookup::NotAnObject { segment } => {
            return AssertionResult::fail(format!(
                "missing key: segment '{}' unreachable, parent is not an object in path {}",
                segment,
                path.join(" / ")
            ));
        }
    };

    let matches = match (expected, value) {
        (ExpectedValue::Bool(e), ConfigValue::Bool(a)) => Some(e == a),
        (ExpectedValue::Number(e), ConfigValue::Number(a)) => Some(e == a),
        (ExpectedValue::String(e), ConfigValue::String(a)) => Some(e == a),
        _ => None,
    };

    match matches {
        Some(true) => {
            AssertionResult::pass(format!("{} == {}", path.join(" / "), expected))
        }
        Some(false) => AssertionResult::fail(format!(
            "value mismatch at {}: expected {}, found {}",
            path.join(" / "),
            expected,
            value
        )),
        None => AssertionResult::fail(format!(
            "type mismatch at {}: expected {}, found {} ({})",
            path.join(" / "),
            expected.type_name(),
            value.type_name(),
            value
        )),
    }
}
