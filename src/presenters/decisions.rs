use super::classify::{classify_decision, format_percent, percentage, Color, DecisionType};
use super::{AnalysisKind, Placeholder};
use crate::api::Transport;
use crate::error::ApiError;
use crate::models::{AdvancedSummary, MeetingAiAnalysis};
use crate::services::AiAnalysisClient;
use std::fmt;

/// Decisions view over the advanced summary's implied decisions
pub struct DecisionsKind;

const PLACEHOLDER: Placeholder = Placeholder {
    title: "决策识别",
    prompt: "还没有识别出会议决策",
    action: "识别决策",
};

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionGroup {
    pub kind: DecisionType,
    pub label: &'static str,
    pub color: Color,
    pub decisions: Vec<String>,
    pub share: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecisionsView {
    Placeholder(Placeholder),
    /// The summary exists but carries no decisions
    NoDecisions,
    Loaded { total: usize, groups: Vec<DecisionGroup> },
}

/// Groups decisions by type in a fixed type order, keeping the original
/// order within a group. Empty groups are left out.
pub fn group_decisions(decisions: &[String]) -> Vec<DecisionGroup> {
    let classified: Vec<(DecisionType, &String)> =
        decisions.iter().map(|d| (classify_decision(d), d)).collect();

    DecisionType::ALL
        .iter()
        .filter_map(|kind| {
            let members: Vec<String> = classified
                .iter()
                .filter(|(k, _)| k == kind)
                .map(|(_, d)| (*d).clone())
                .collect();
            if members.is_empty() {
                return None;
            }
            Some(DecisionGroup {
                kind: *kind,
                label: kind.label(),
                color: kind.color(),
                share: format_percent(percentage(members.len() as u64, decisions.len())),
                decisions: members,
            })
        })
        .collect()
}

pub fn render_decisions(summary: Option<&AdvancedSummary>) -> DecisionsView {
    match summary {
        None => DecisionsView::Placeholder(PLACEHOLDER),
        Some(s) if s.implied_decisions.is_empty() => DecisionsView::NoDecisions,
        Some(s) => DecisionsView::Loaded {
            total: s.implied_decisions.len(),
            groups: group_decisions(&s.implied_decisions),
        },
    }
}

impl AnalysisKind for DecisionsKind {
    type Output = AdvancedSummary;
    type View = DecisionsView;

    const NAME: &'static str = "决策识别";

    async fn generate<T: Transport>(
        client: &AiAnalysisClient<T>,
        meeting_id: &str,
    ) -> Result<AdvancedSummary, ApiError> {
        client.generate_advanced_summary(meeting_id).await
    }

    fn seed(analysis: &MeetingAiAnalysis) -> Option<AdvancedSummary> {
        analysis.advanced_summary.clone()
    }

    fn render(result: Option<&AdvancedSummary>) -> DecisionsView {
        render_decisions(result)
    }
}

impl fmt::Display for DecisionsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionsView::Placeholder(p) => fmt::Display::fmt(p, f),
            DecisionsView::NoDecisions => {
                writeln!(f, "== 决策识别 ==")?;
                write!(f, "本次会议未识别出明确决策")
            }
            DecisionsView::Loaded { total, groups } => {
                write!(f, "== 决策识别 == (共 {} 项)", total)?;
                for group in groups {
                    write!(f, "\n{} ({}, {})", group.label, group.decisions.len(), group.share)?;
                    for d in &group.decisions {
                        write!(f, "\n  - {}", d)?;
                    }
                }
                Ok(())
            }
        }
    }
}
