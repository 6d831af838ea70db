//! Cohort step records and sequence validation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One stage in the cohort funnel.
///
/// Only `count` is required; in data files it may also be spelled `n` or `N`
/// (the original epidemiology convention). Everything else has a rendering
/// default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortStep {
    /// Remaining participant count at this stage.
    #[serde(alias = "n", alias = "N")]
    pub count: u64,
    /// Title shown inside the box. Defaults to `Step <index+1>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    /// Body text below the `(n = ...)` line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Label for the side exclusion box. Defaults to `Excluded`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusion_description: Option<String>,
    /// Fill override for this step's main box (hex or named).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Fill override for this step's exclusion box (hex or named).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusion_color: Option<String>,
}

impl CohortStep {
    pub fn new(count: u64) -> Self {
        Self {
            count,
            heading: None,
            description: None,
            exclusion_description: None,
            color: None,
            exclusion_color: None,
        }
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_exclusion_description(mut self, label: impl Into<String>) -> Self {
        self.exclusion_description = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_exclusion_color(mut self, color: impl Into<String>) -> Self {
        self.exclusion_color = Some(color.into());
        self
    }

    /// Effective box title: trimmed heading, or `Step <index+1>`.
    pub fn effective_heading(&self, index: usize) -> String {
        match self.heading.as_deref().map(str::trim) {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => format!("Step {}", index + 1),
        }
    }

    /// Effective exclusion label: trimmed, or `Excluded`.
    pub fn effective_exclusion_label(&self) -> String {
        match self.exclusion_description.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => "Excluded".to_string(),
        }
    }
}

/// Validates the whole sequence before any layout or drawing happens.
///
/// The sequence must be non-empty and counts must never increase between
/// consecutive steps. Violations are data errors, not silently corrected.
pub fn validate_steps(steps: &[CohortStep]) -> Result<()> {
    if steps.is_empty() {
        return Err(Error::EmptyInput);
    }
    for (index, pair) in steps.windows(2).enumerate() {
        let (previous, current) = (pair[0].count, pair[1].count);
        if current > previous {
            return Err(Error::InvalidSequence {
                index: index + 1,
                count: current,
                previous,
            });
        }
    }
    Ok(())
}
