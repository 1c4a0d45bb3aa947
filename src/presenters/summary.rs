use super::classify::{classify_decision, Color, DecisionType};
use super::{AnalysisKind, Placeholder, ScoreBar};
use crate::api::Transport;
use crate::error::ApiError;
use crate::models::{AdvancedSummary, MeetingAiAnalysis};
use crate::services::AiAnalysisClient;
use std::fmt;

pub struct AdvancedSummaryKind;

const PLACEHOLDER: Placeholder = Placeholder {
    title: "高级摘要",
    prompt: "还没有生成高级摘要",
    action: "生成摘要",
};

/// A decision chip: the sentence plus its classified type
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTag {
    pub text: String,
    pub kind: DecisionType,
    pub label: &'static str,
    pub color: Color,
}

impl DecisionTag {
    pub fn new(text: &str) -> Self {
        let kind = classify_decision(text);
        Self {
            text: text.to_string(),
            kind,
            label: kind.label(),
            color: kind.color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryBreakdown {
    pub theme: String,
    pub insights: String,
    pub decisions: Vec<DecisionTag>,
    pub recommendations: Vec<String>,
    pub sentiment: Vec<ScoreBar>,
    pub key_topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryView {
    Placeholder(Placeholder),
    Loaded(SummaryBreakdown),
}

pub fn render_summary(summary: Option<&AdvancedSummary>) -> SummaryView {
    let Some(summary) = summary else {
        return SummaryView::Placeholder(PLACEHOLDER);
    };

    SummaryView::Loaded(SummaryBreakdown {
        theme: summary.theme_analysis.clone(),
        insights: summary.insights.clone(),
        decisions: summary
            .implied_decisions
            .iter()
            .map(|d| DecisionTag::new(d))
            .collect(),
        recommendations: summary.recommendations.clone(),
        sentiment: summary
            .sentiment_analysis
            .as_ref()
            .map(|scores| scores.iter().map(|(k, v)| ScoreBar::new(k, v)).collect())
            .unwrap_or_default(),
        key_topics: summary.key_topics.clone(),
    })
}

impl AnalysisKind for AdvancedSummaryKind {
    type Output = AdvancedSummary;
    type View = SummaryView;

    const NAME: &'static str = "高级摘要";

    async fn generate<T: Transport>(
        client: &AiAnalysisClient<T>,
        meeting_id: &str,
    ) -> Result<AdvancedSummary, ApiError> {
        client.generate_advanced_summary(meeting_id).await
    }

    fn seed(analysis: &MeetingAiAnalysis) -> Option<AdvancedSummary> {
        analysis.advanced_summary.clone()
    }

    fn render(result: Option<&AdvancedSummary>) -> SummaryView {
        render_summary(result)
    }
}

impl fmt::Display for SummaryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let breakdown = match self {
            SummaryView::Placeholder(p) => return fmt::Display::fmt(p, f),
            SummaryView::Loaded(b) => b,
        };

        writeln!(f, "== 高级摘要 ==")?;
        writeln!(f, "主题分析: {}", breakdown.theme)?;
        writeln!(f, "洞察: {}", breakdown.insights)?;
        if !breakdown.decisions.is_empty() {
            writeln!(f, "隐含决策:")?;
            for tag in &breakdown.decisions {
                writeln!(f, "  [{}] {}", tag.label, tag.text)?;
            }
        }
        if !breakdown.recommendations.is_empty() {
            writeln!(f, "建议:")?;
            for (i, r) in breakdown.recommendations.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, r)?;
            }
        }
        if !breakdown.sentiment.is_empty() {
            writeln!(f, "情绪分析:")?;
            for bar in &breakdown.sentiment {
                writeln!(f, "  {}", bar)?;
            }
        }
        write!(f, "关键话题: {}", breakdown.key_topics.join(" · "))
    }
}
