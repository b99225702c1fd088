//! Check result types.

/// Result of a single environment check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Present and working.
    Pass,
    /// Missing or degraded; generation continues.
    Warn,
    /// Missing and needed by the configured pipeline at run time.
    Fail,
}

impl CheckResult {
    pub fn pass(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            details: None,
        }
    }

    pub fn pass_with(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            details: Some(details.to_string()),
        }
    }

    pub fn warn(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warn,
            details: Some(details.to_string()),
        }
    }

    pub fn fail(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            details: Some(details.to_string()),
        }
    }
}

/// A titled group of checks.
#[derive(Debug, Clone)]
pub struct CheckSection {
    pub title: String,
    pub checks: Vec<CheckResult>,
}

/// Results of one environment check run.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub sections: Vec<CheckSection>,
}

impl CheckReport {
    pub fn push(&mut self, title: &str, checks: Vec<CheckResult>) {
        if !checks.is_empty() {
            self.sections.push(CheckSection {
                title: title.to_string(),
                checks,
            });
        }
    }

    pub fn checks(&self) -> impl Iterator<Item = &CheckResult> {
        self.sections.iter().flat_map(|s| s.checks.iter())
    }

    /// Returns true if no check failed.
    pub fn all_passed(&self) -> bool {
        !self.checks().any(|c| c.status == CheckStatus::Fail)
    }

    pub fn count(&self, status: CheckStatus) -> usize {
        self.checks().filter(|c| c.status == status).count()
    }

    /// Details of every non-passing check, for a closing recommendation list.
    pub fn recommendations(&self) -> Vec<String> {
        self.checks()
            .filter(|c| c.status != CheckStatus::Pass)
            .filter_map(|c| c.details.clone())
            .collect()
    }
}
