use crate::condition::{Condition, ConditionOutcome};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionAndOutcome {
    pub condition: String,
    pub outcome: ConditionOutcome,
}

/// Why each auto-configuration and bean did or did not apply.
///
/// Sources are configuration names (`RabbitAutoConfiguration`) or bean
/// sources (`RabbitAutoConfiguration#rabbitTemplate`), in evaluation order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConditionEvaluationReport {
    outcomes: IndexMap<String, Vec<ConditionAndOutcome>>,
    exclusions: Vec<String>,
    unconditional: Vec<String>,
}

impl ConditionEvaluationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, source: &str, condition: &Condition, outcome: ConditionOutcome) {
        self.outcomes
            .entry(source.to_string())
            .or_default()
            .push(ConditionAndOutcome {
                condition: condition.to_string(),
                outcome,
            });
    }

    pub fn record_exclusion(&mut self, source: &str) {
        self.exclusions.push(source.to_string());
    }

    /// Sources that applied without any condition.
    pub fn record_unconditional(&mut self, source: &str) {
        self.unconditional.push(source.to_string());
    }

    pub fn outcomes(&self) -> &IndexMap<String, Vec<ConditionAndOutcome>> {
        &self.outcomes
    }

    pub fn outcomes_for(&self, source: &str) -> Option<&[ConditionAndOutcome]> {
        self.outcomes.get(source).map(Vec::as_slice)
    }

    /// `None` when nothing was recorded for `source`.
    pub fn is_full_match(&self, source: &str) -> Option<bool> {
        self.outcomes
            .get(source)
            .map(|outcomes| outcomes.iter().all(|o| o.outcome.matched))
    }

    pub fn positive_matches(&self) -> Vec<&str> {
        self.filter_sources(true)
    }

    pub fn negative_matches(&self) -> Vec<&str> {
        self.filter_sources(false)
    }

    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    pub fn unconditional(&self) -> &[String] {
        &self.unconditional
    }

    fn filter_sources(&self, matched: bool) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcomes)| outcomes.iter().all(|o| o.outcome.matched) == matched)
            .map(|(source, _)| source.as_str())
            .collect()
    }
}
