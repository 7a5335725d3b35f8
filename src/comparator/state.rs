use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Lifecycle of a [`GradingEngine`](super::GradingEngine).
///
/// ```text
/// NoReference --load--> ReferenceLoaded --compare--> ComparisonInProgress --done--> ComparisonComplete
/// (any) --reset--> NoReference
/// (any) --load--> ReferenceLoaded
/// ```
///
/// `ComparisonComplete` is idle: a further comparison moves back to
/// `ComparisonInProgress`. Reset is valid from every state.
pub enum ComparatorState {
    NoReference,
    ReferenceLoaded,
    ComparisonInProgress,
    ComparisonComplete,
}

impl ComparatorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoReference => "no_reference",
            Self::ReferenceLoaded => "reference_loaded",
            Self::ComparisonInProgress => "comparison_in_progress",
            Self::ComparisonComplete => "comparison_complete",
        }
    }

    /// `true` in every state except [`ComparatorState::NoReference`].
    pub fn has_reference(&self) -> bool {
        !matches!(self, Self::NoReference)
    }
}

impl std::fmt::Display for ComparatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
