//! Pure display helpers: decision types, priorities, colors, percentages.

use crate::models::{CountList, SmartActionItem};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionType {
    Approval,
    Rejection,
    Postponement,
    Delegation,
    General,
}

/// Checked in order; the first rule with a matching keyword wins.
const DECISION_RULES: &[(&[&str], DecisionType)] = &[
    (&["approve", "同意", "批准"], DecisionType::Approval),
    (&["reject", "拒绝"], DecisionType::Rejection),
    (&["postpone", "延期"], DecisionType::Postponement),
    (&["delegate", "委派"], DecisionType::Delegation),
];

impl DecisionType {
    pub const ALL: [DecisionType; 5] = [
        DecisionType::Approval,
        DecisionType::Rejection,
        DecisionType::Postponement,
        DecisionType::Delegation,
        DecisionType::General,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DecisionType::Approval => "批准",
            DecisionType::Rejection => "拒绝",
            DecisionType::Postponement => "延期",
            DecisionType::Delegation => "委派",
            DecisionType::General => "决策",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            DecisionType::Approval => Color::Green,
            DecisionType::Rejection => Color::Red,
            DecisionType::Postponement => Color::Orange,
            DecisionType::Delegation => Color::Blue,
            DecisionType::General => Color::Gray,
        }
    }
}

/// Case-insensitive substring classification of a decision sentence
pub fn classify_decision(text: &str) -> DecisionType {
    let lower = text.to_lowercase();
    DECISION_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, kind)| *kind)
        .unwrap_or(DecisionType::General)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
    Other,
}

impl Priority {
    pub const RECOGNISED: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Case-insensitive exact match; anything unrecognised is `Other`.
    pub fn parse(label: &str) -> Self {
        if label.eq_ignore_ascii_case("high") {
            Priority::High
        } else if label.eq_ignore_ascii_case("medium") {
            Priority::Medium
        } else if label.eq_ignore_ascii_case("low") {
            Priority::Low
        } else {
            Priority::Other
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "高",
            Priority::Medium => "中",
            Priority::Low => "低",
            Priority::Other => "未定",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Priority::High => Color::Red,
            Priority::Medium => Color::Orange,
            Priority::Low => Color::Green,
            Priority::Other => Color::Gray,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Orange,
    Green,
    Blue,
    Gray,
}

impl Color {
    pub fn hex(&self) -> &'static str {
        match self {
            Color::Red => "#ff4d4f",
            Color::Orange => "#fa8c16",
            Color::Green => "#52c41a",
            Color::Blue => "#1890ff",
            Color::Gray => "#8c8c8c",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

pub fn priority_color(label: &str) -> Color {
    Priority::parse(label).color()
}

/// `count / total` as a percentage; 0 when `total` is 0
pub fn percentage(count: u64, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

pub fn format_percent(percent: f64) -> String {
    // half-up, `{:.0}` alone rounds 12.5 to 12
    format!("{:.0}%", percent.round())
}

/// A score in [0, 1] shown as a percentage
pub fn format_score(score: f64) -> String {
    format_percent(score * 100.0)
}

/// Counts per priority, computed from the items themselves.
///
/// Always contains the three recognised priorities; `Other` only when some
/// item carries an unrecognised label.
pub fn priority_distribution(items: &[SmartActionItem]) -> Vec<(Priority, u64)> {
    let mut counts: Vec<(Priority, u64)> = Priority::RECOGNISED.iter().map(|p| (*p, 0)).collect();
    let mut other = 0u64;
    for item in items {
        match Priority::parse(&item.priority) {
            Priority::Other => other += 1,
            priority => {
                if let Some(slot) = counts.iter_mut().find(|(p, _)| *p == priority) {
                    slot.1 += 1;
                }
            }
        }
    }
    if other > 0 {
        counts.push((Priority::Other, other));
    }
    counts
}

/// Priorities whose backend-reported count differs from the computed one
pub fn distribution_drift(reported: &CountList, computed: &[(Priority, u64)]) -> Vec<Priority> {
    if reported.is_empty() {
        return Vec::new();
    }
    computed
        .iter()
        .filter(|(p, count)| reported.get(p.key()).unwrap_or(0) != *count)
        .map(|(p, _)| *p)
        .collect()
}
