//! Validation report accumulator and its renderings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A failed check or a warning, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub check: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Ordered outcome of a validation run.
///
/// Entries keep the order in which checks reported them. Warnings never
/// change the overall status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub passed: Vec<String>,
    pub failed: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pass(&mut self, check: impl Into<String>) {
        self.passed.push(check.into());
    }

    pub fn add_fail(&mut self, check: impl Into<String>, reason: impl Into<String>) {
        self.failed.push(Finding {
            check: check.into(),
            reason: reason.into(),
        });
    }

    pub fn add_warning(&mut self, check: impl Into<String>, reason: impl Into<String>) {
        self.warnings.push(Finding {
            check: check.into(),
            reason: reason.into(),
        });
    }

    /// Whether no check failed.
    pub fn is_pass(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn status(&self) -> Status {
        if self.is_pass() {
            Status::Pass
        } else {
            Status::Fail
        }
    }

    /// Number of passed plus failed entries.
    pub fn total_checks(&self) -> usize {
        self.passed.len() + self.failed.len()
    }

    /// The summary line closing the text report.
    pub fn summary(&self) -> String {
        format!(
            "Overall: {} ({}/{} checks passed, {} warnings)",
            self.status(),
            self.passed.len(),
            self.total_checks(),
            self.warnings.len()
        )
    }

    /// JSON form: `status`, `passed`, `failed`, `warnings`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "status": self.status(),
            "passed": self.passed,
            "failed": self.failed,
            "warnings": self.warnings,
        })
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for check in &self.passed {
            writeln!(f, "✅ {check}: PASS")?;
        }
        for finding in &self.failed {
            writeln!(f, "❌ {}: FAIL", finding.check)?;
            if !finding.reason.is_empty() {
                writeln!(f, "  - {}", finding.reason)?;
            }
        }
        for finding in &self.warnings {
            writeln!(f, "⚠️  {}: WARNING", finding.check)?;
            if !finding.reason.is_empty() {
                writeln!(f, "  - {}", finding.reason)?;
            }
        }
        writeln!(f)?;
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ValidationReport {
        let mut report = ValidationReport::new();
        report.add_pass("YAML frontmatter");
        report.add_fail("Expected outcomes", "Expected outcomes missing");
        report.add_warning("Key concepts", "Too many concepts: 12 (expected: 3-10)");
        report
    }

    #[test]
    fn warnings_do_not_affect_status() {
        let mut report = ValidationReport::new();
        report.add_pass("A");
        report.add_warning("B", "careful");
        assert!(report.is_pass());
        assert_eq!(report.status(), Status::Pass);
        assert_eq!(report.summary(), "Overall: PASS (1/1 checks passed, 1 warnings)");
    }

    #[test]
    fn any_failure_fails_the_report() {
        let report = sample();
        assert!(!report.is_pass());
        assert_eq!(report.summary(), "Overall: FAIL (1/2 checks passed, 1 warnings)");
    }

    #[test]
    fn text_rendering_groups_by_verdict() {
        let text = sample().to_string();
        let expected = "✅ YAML frontmatter: PASS\n\
                        ❌ Expected outcomes: FAIL\n  - Expected outcomes missing\n\
                        ⚠️  Key concepts: WARNING\n  - Too many concepts: 12 (expected: 3-10)\n\
                        \n\
                        Overall: FAIL (1/2 checks passed, 1 warnings)";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_reason_is_not_rendered() {
        let mut report = ValidationReport::new();
        report.add_fail("Thing", "");
        assert_eq!(report.to_string(), "❌ Thing: FAIL\n\nOverall: FAIL (0/1 checks passed, 0 warnings)");
    }

    #[test]
    fn json_form_carries_status() {
        let json = sample().to_json();
        assert_eq!(json["status"], "FAIL");
        assert_eq!(json["passed"][0], "YAML frontmatter");
        assert_eq!(json["failed"][0]["check"], "Expected outcomes");
        assert_eq!(json["failed"][0]["reason"], "Expected outcomes missing");
        assert_eq!(json["warnings"].as_array().map(Vec::len), Some(1));
    }
}
