use super::classify::{
    distribution_drift, format_percent, percentage, priority_distribution, Color, Priority,
};
use super::{AnalysisKind, Placeholder};
use crate::api::Transport;
use crate::error::ApiError;
use crate::models::{MeetingAiAnalysis, SmartActionItem, SmartActionItems};
use crate::services::AiAnalysisClient;
use std::fmt;

pub struct ActionItemsKind;

const PLACEHOLDER: Placeholder = Placeholder {
    title: "智能行动项",
    prompt: "还没有提取行动项",
    action: "提取行动项",
};

#[derive(Debug, Clone, PartialEq)]
pub struct PriorityBucket {
    pub priority: Priority,
    pub label: &'static str,
    pub color: Color,
    pub count: u64,
    pub percent: f64,
    pub percent_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionItemRow {
    pub content: String,
    pub assignee: String,
    pub priority_label: &'static str,
    pub color: Color,
    pub due: Option<String>,
    pub context: String,
    pub confidence: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionItemsBreakdown {
    pub summary: String,
    pub total: usize,
    pub distribution: Vec<PriorityBucket>,
    pub items: Vec<ActionItemRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionItemsView {
    Placeholder(Placeholder),
    Loaded(ActionItemsBreakdown),
}

fn row(item: &SmartActionItem) -> ActionItemRow {
    let priority = Priority::parse(&item.priority);
    ActionItemRow {
        content: item.content.clone(),
        assignee: item.assignee.clone(),
        priority_label: priority.label(),
        color: priority.color(),
        due: item.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
        context: item.context.clone(),
        confidence: format_percent(item.confidence.clamp(0.0, 1.0) * 100.0),
    }
}

pub fn render_action_items(result: Option<&SmartActionItems>) -> ActionItemsView {
    let Some(result) = result else {
        return ActionItemsView::Placeholder(PLACEHOLDER);
    };

    let total = result.items.len();
    let computed = priority_distribution(&result.items);
    let drift = distribution_drift(&result.priority_distribution, &computed);
    if !drift.is_empty() {
        log::warn!(
            "Reported priority distribution disagrees with {} items for: {:?}",
            total,
            drift
        );
    }

    let distribution = computed
        .into_iter()
        .map(|(priority, count)| {
            let percent = percentage(count, total);
            PriorityBucket {
                priority,
                label: priority.label(),
                color: priority.color(),
                count,
                percent,
                percent_text: format_percent(percent),
            }
        })
        .collect();

    ActionItemsView::Loaded(ActionItemsBreakdown {
        summary: result.summary.clone(),
        total,
        distribution,
        items: result.items.iter().map(row).collect(),
    })
}

impl AnalysisKind for ActionItemsKind {
    type Output = SmartActionItems;
    type View = ActionItemsView;

    const NAME: &'static str = "行动项";

    async fn generate<T: Transport>(
        client: &AiAnalysisClient<T>,
        meeting_id: &str,
    ) -> Result<SmartActionItems, ApiError> {
        client.extract_smart_action_items(meeting_id).await
    }

    fn seed(analysis: &MeetingAiAnalysis) -> Option<SmartActionItems> {
        analysis.smart_action_items.clone()
    }

    fn render(result: Option<&SmartActionItems>) -> ActionItemsView {
        render_action_items(result)
    }
}

impl fmt::Display for ActionItemsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let breakdown = match self {
            ActionItemsView::Placeholder(p) => return fmt::Display::fmt(p, f),
            ActionItemsView::Loaded(b) => b,
        };

        writeln!(f, "== 智能行动项 == (共 {} 项)", breakdown.total)?;
        if !breakdown.summary.is_empty() {
            writeln!(f, "{}", breakdown.summary)?;
        }
        let buckets: Vec<String> = breakdown
            .distribution
            .iter()
            .map(|b| format!("{} {} ({})", b.label, b.count, b.percent_text))
            .collect();
        write!(f, "优先级分布: {}", buckets.join(" | "))?;
        for item in &breakdown.items {
            write!(
                f,
                "\n  [{}] {} - {}",
                item.priority_label, item.content, item.assignee
            )?;
            if let Some(due) = &item.due {
                write!(f, " (截止 {})", due)?;
            }
            write!(f, " 置信度 {}", item.confidence)?;
        }
        Ok(())
    }
}
