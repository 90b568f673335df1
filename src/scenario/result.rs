//! Scenario result types.
//!
//! Contains types for representing the outcome of verification runs.

use std::time::Duration;

/// Terminal status of a single scenario.
///
/// Every scenario ends exactly Passed or Failed; there is no partial
/// outcome. A failure carries every reason at once, whether from a
/// terminal step error or from aggregated expectation mismatches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioStatus {
    /// Every expectation held
    Passed,
    /// The scenario failed; all failure messages, in evaluation order
    Failed(Vec<String>),
}

impl ScenarioStatus {
    /// Check if the status indicates success.
    pub fn is_passed(&self) -> bool {
        matches!(self, ScenarioStatus::Passed)
    }

    /// Check if the status indicates failure.
    pub fn is_failed(&self) -> bool {
        matches!(self, ScenarioStatus::Failed(_))
    }

    /// Failure messages, empty on pass.
    pub fn reasons(&self) -> &[String] {
        match self {
            ScenarioStatus::Passed => &[],
            ScenarioStatus::Failed(reasons) => reasons,
        }
    }
}

impl std::fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioStatus::Passed => write!(f, "passed"),
            ScenarioStatus::Failed(reasons) => {
                write!(f, "failed: {}", reasons.join("; "))
            }
        }
    }
}

/// Result of running a single scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario identifier that was run
    pub scenario_id: String,
    /// Terminal status
    pub status: ScenarioStatus,
    /// Wall-clock duration of the scenario
    pub duration: Duration,
}

impl ScenarioResult {
    /// Create a passed result.
    pub fn passed(scenario_id: String, duration: Duration) -> Self {
        Self { scenario_id, status: ScenarioStatus::Passed, duration }
    }

    /// Create a failed result carrying every failure reason.
    pub fn failed(scenario_id: String, reasons: Vec<String>, duration: Duration) -> Self {
        Self { scenario_id, status: ScenarioStatus::Failed(reasons), duration }
    }

    /// Check if this result passed.
    pub fn is_passed(&self) -> bool {
        self.status.is_passed()
    }
}

/// Result of a complete matrix run.
#[derive(Debug, Default)]
pub struct MatrixResult {
    /// Results for each scenario, in matrix order
    pub scenarios: Vec<ScenarioResult>,
    /// Total run duration
    pub total_duration: Duration,
}

impl MatrixResult {
    /// Create a new empty matrix result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scenario result.
    pub fn add_result(&mut self, result: ScenarioResult) {
        self.scenarios.push(result);
    }

    /// Get the number of passed scenarios.
    pub fn passed_count(&self) -> usize {
        self.scenarios.iter().filter(|r| r.is_passed()).count()
    }

    /// Get the number of failed scenarios.
    pub fn failed_count(&self) -> usize {
        self.scenarios.iter().filter(|r| !r.is_passed()).count()
    }

    /// Check if the overall run succeeded (no failures).
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Get failed scenario results.
    pub fn failures(&self) -> Vec<&ScenarioResult> {
        self.scenarios.iter().filter(|r| !r.is_passed()).collect()
    }

    /// Format a summary of the matrix result.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let passed = self.passed_count();
        let failed = self.failed_count();
        let total = self.scenarios.len();

        if failed > 0 {
            lines.push(format!(
                "Verification failed: {} passed, {} failed ({} total)",
                passed, failed, total
            ));
            for scenario in self.failures() {
                lines.push(format!("  - {}:", scenario.scenario_id));
                for reason in scenario.status.reasons() {
                    lines.push(format!("      {}", reason));
                }
            }
        } else {
            lines.push(format!(
                "Verification succeeded: {} scenarios passed in {:?}",
                total, self.total_duration
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(ScenarioStatus::Passed.to_string(), "passed");
        assert_eq!(
            ScenarioStatus::Failed(vec!["a".to_string(), "b".to_string()]).to_string(),
            "failed: a; b"
        );
    }

    #[test]
    fn test_status_reasons() {
        assert!(ScenarioStatus::Passed.reasons().is_empty());
        let failed = ScenarioStatus::Failed(vec!["x".to_string()]);
        assert_eq!(failed.reasons(), &["x".to_string()]);
    }

    #[test]
    fn test_scenario_result_passed() {
        let result = ScenarioResult::passed(
            "HelloWorld-net8.0-trimmed".to_string(),
            Duration::from_millis(100),
        );
        assert!(result.is_passed());
    }

    #[test]
    fn test_scenario_result_failed_keeps_all_reasons() {
        let result = ScenarioResult::failed(
            "HelloWorld-net8.0-aot".to_string(),
            vec!["first mismatch".to_string(), "second mismatch".to_string()],
            Duration::ZERO,
        );
        assert!(!result.is_passed());
        assert_eq!(result.status.reasons().len(), 2);
    }

    #[test]
    fn test_matrix_result_counts() {
        let mut result = MatrixResult::new();
        result.add_result(ScenarioResult::passed("a".to_string(), Duration::ZERO));
        result.add_result(ScenarioResult::failed(
            "b".to_string(),
            vec!["boom".to_string()],
            Duration::ZERO,
        ));

        assert_eq!(result.passed_count(), 1);
        assert_eq!(result.failed_count(), 1);
        assert!(!result.is_success());
    }

    #[test]
    fn test_matrix_result_success() {
        let mut result = MatrixResult::new();
        result.add_result(ScenarioResult::passed("a".to_string(), Duration::ZERO));
        assert!(result.is_success());
    }

    #[test]
    fn test_matrix_summary_lists_every_reason() {
        let mut result = MatrixResult::new();
        result.add_result(ScenarioResult::passed("a".to_string(), Duration::ZERO));
        result.add_result(ScenarioResult::failed(
            "b".to_string(),
            vec!["value mismatch at x".to_string(), "missing key y".to_string()],
            Duration::ZERO,
        ));

        let summary = result.summary();
        assert!(summary.contains("1 passed, 1 failed"));
        assert!(summary.contains("value mismatch at x"));
        assert!(summary.contains("missing key y"));
    }

    #[test]
    fn test_matrix_summary_success() {
        let mut result = MatrixResult::new();
        result.add_result(ScenarioResult::passed("a".to_string(), Duration::ZERO));
        result.total_duration = Duration::from_millis(5);

        assert!(result.summary().contains("Verification succeeded"));
    }
}
