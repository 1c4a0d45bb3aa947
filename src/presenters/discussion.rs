use super::{AnalysisKind, Placeholder, ScoreBar};
use crate::api::Transport;
use crate::error::ApiError;
use crate::models::{DiscussionAnalysis, MeetingAiAnalysis, TopicTransition};
use crate::services::AiAnalysisClient;
use std::fmt;

pub struct DiscussionKind;

const PLACEHOLDER: Placeholder = Placeholder {
    title: "讨论分析",
    prompt: "还没有分析会议讨论",
    action: "分析讨论",
};

#[derive(Debug, Clone, PartialEq)]
pub struct DiscussionBreakdown {
    pub patterns: Vec<String>,
    pub key_points: Vec<String>,
    /// Sorted by engagement, highest first
    pub engagement: Vec<ScoreBar>,
    pub transitions: Vec<TopicTransition>,
    pub consensus: Vec<String>,
    pub disagreements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiscussionView {
    Placeholder(Placeholder),
    Loaded(DiscussionBreakdown),
}

pub fn render_discussion(analysis: Option<&DiscussionAnalysis>) -> DiscussionView {
    let Some(analysis) = analysis else {
        return DiscussionView::Placeholder(PLACEHOLDER);
    };

    let mut engagement: Vec<ScoreBar> = analysis
        .participant_engagement
        .iter()
        .map(|(who, score)| ScoreBar::new(who, score))
        .collect();
    // stable: ties keep backend order
    engagement.sort_by(|a, b| b.score.total_cmp(&a.score));

    DiscussionView::Loaded(DiscussionBreakdown {
        patterns: analysis.discussion_patterns.clone(),
        key_points: analysis.key_points.clone(),
        engagement,
        transitions: analysis.topic_transitions.clone(),
        consensus: analysis.consensus_points.clone(),
        disagreements: analysis.disagreement_points.clone(),
    })
}

impl AnalysisKind for DiscussionKind {
    type Output = DiscussionAnalysis;
    type View = DiscussionView;

    const NAME: &'static str = "讨论分析";

    async fn generate<T: Transport>(
        client: &AiAnalysisClient<T>,
        meeting_id: &str,
    ) -> Result<DiscussionAnalysis, ApiError> {
        client.analyze_discussion(meeting_id).await
    }

    fn seed(analysis: &MeetingAiAnalysis) -> Option<DiscussionAnalysis> {
        analysis.discussion_analysis.clone()
    }

    fn render(result: Option<&DiscussionAnalysis>) -> DiscussionView {
        render_discussion(result)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, title: &str, entries: &[String]) -> fmt::Result {
    if entries.is_empty() {
        return Ok(());
    }
    write!(f, "\n{}:", title)?;
    for e in entries {
        write!(f, "\n  - {}", e)?;
    }
    Ok(())
}

impl fmt::Display for DiscussionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let breakdown = match self {
            DiscussionView::Placeholder(p) => return fmt::Display::fmt(p, f),
            DiscussionView::Loaded(b) => b,
        };

        write!(f, "== 讨论分析 ==")?;
        write_list(f, "讨论模式", &breakdown.patterns)?;
        write_list(f, "要点", &breakdown.key_points)?;
        if !breakdown.engagement.is_empty() {
            write!(f, "\n参与度:")?;
            for bar in &breakdown.engagement {
                write!(f, "\n  {}", bar)?;
            }
        }
        if !breakdown.transitions.is_empty() {
            write!(f, "\n话题转换:")?;
            for t in &breakdown.transitions {
                write!(f, "\n  {} -> {}", t.from_topic, t.to_topic)?;
                if !t.triggered_by.is_empty() {
                    write!(f, " (由 {} 引发)", t.triggered_by)?;
                }
            }
        }
        write_list(f, "共识", &breakdown.consensus)?;
        write_list(f, "分歧", &breakdown.disagreements)
    }
}
