use super::scores::{CountList, ScoreList};
use super::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Result of an advanced summary run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdvancedSummary {
    #[serde(default)]
    pub theme_analysis: String,
    #[serde(default)]
    pub insights: String,
    /// Decisions the backend inferred from the discussion, in order
    #[serde(default)]
    pub implied_decisions: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Sentiment dimension -> score in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_analysis: Option<ScoreList>,
    #[serde(default)]
    pub key_topics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmartActionItem {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub content: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub assignee: String,
    /// Free text; "high", "medium" and "low" are recognised case-insensitively
    #[serde(default, deserialize_with = "text_or_empty")]
    pub priority: String,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub context: String,
    /// 0.0 to 1.0
    #[serde(default, deserialize_with = "confidence")]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SmartActionItems {
    /// Malformed entries are dropped one by one
    #[serde(default, deserialize_with = "action_items")]
    pub items: Vec<SmartActionItem>,
    #[serde(default)]
    pub summary: String,
    /// Priority label -> count, as reported by the backend
    #[serde(default)]
    pub priority_distribution: CountList,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicTransition {
    pub from_topic: String,
    pub to_topic: String,
    #[serde(default)]
    pub triggered_by: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiscussionAnalysis {
    #[serde(default)]
    pub discussion_patterns: Vec<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Participant -> engagement score in [0, 1]
    #[serde(default)]
    pub participant_engagement: ScoreList,
    #[serde(default)]
    pub topic_transitions: Vec<TopicTransition>,
    #[serde(default)]
    pub consensus_points: Vec<String>,
    #[serde(default)]
    pub disagreement_points: Vec<String>,
}

/// Every analysis artifact already generated for one meeting
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeetingAiAnalysis {
    #[serde(default)]
    pub meeting_id: String,
    #[serde(default)]
    pub advanced_summary: Option<AdvancedSummary>,
    #[serde(default)]
    pub smart_action_items: Option<SmartActionItems>,
    #[serde(default)]
    pub discussion_analysis: Option<DiscussionAnalysis>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MeetingAiAnalysis {
    pub fn is_empty(&self) -> bool {
        self.advanced_summary.is_none()
            && self.smart_action_items.is_none()
            && self.discussion_analysis.is_none()
    }
}

fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            log::warn!("Expected text, got {}", other);
            String::new()
        }
    })
}

fn confidence<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    match raw.as_f64().filter(|v| v.is_finite()) {
        Some(v) => Ok(v.clamp(0.0, 1.0)),
        None => {
            if !raw.is_null() {
                log::warn!("Invalid confidence {}, using 0", raw);
            }
            Ok(0.0)
        }
    }
}

fn action_items<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<SmartActionItem>, D::Error> {
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<SmartActionItem>(entry.clone()) {
            Ok(item) if !item.content.trim().is_empty() => Some(item),
            Ok(_) => {
                log::warn!("Dropping action item without content: {}", entry);
                None
            }
            Err(e) => {
                log::warn!("Dropping malformed action item {}: {}", entry, e);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_without_sentiment() {
        let summary: AdvancedSummary = serde_json::from_value(json!({
            "theme_analysis": "A",
            "insights": "B",
            "implied_decisions": ["批准预算"],
            "recommendations": [],
            "key_topics": ["预算"]
        }))
        .unwrap();

        assert_eq!(summary.theme_analysis, "A");
        assert_eq!(summary.implied_decisions, vec!["批准预算".to_string()]);
        assert!(summary.sentiment_analysis.is_none());
    }

    #[test]
    fn test_action_items_payload() {
        let items: SmartActionItems = serde_json::from_value(json!({
            "items": [{
                "content": "Send the deck",
                "assignee": "alice",
                "priority": "HIGH",
                "due_date": "2024-03-08T00:00:00Z",
                "context": "budget review",
                "confidence": 0.8
            }, {
                "content": "Book room",
                "assignee": "bob",
                "priority": "low",
                "due_date": null,
                "context": "",
                "confidence": 0.5
            }],
            "summary": "Two follow-ups",
            "priority_distribution": {"high": 1, "low": 1}
        }))
        .unwrap();

        assert_eq!(items.items.len(), 2);
        assert!(items.items[0].due_date.is_some());
        assert!(items.items[1].due_date.is_none());
        assert_eq!(items.priority_distribution.total(), 2);
    }

    #[test]
    fn test_malformed_action_items_are_dropped_individually() {
        let items: SmartActionItems = serde_json::from_value(json!({
            "items": [
                {"content": "Send the deck", "priority": "high", "confidence": null},
                {"content": "Call vendor", "assignee": null, "confidence": 1.7},
                {"content": null, "confidence": 0.4},
                "not an item",
                {"content": "Review", "confidence": "sure", "due_date": "someday"}
            ],
            "summary": "mixed"
        }))
        .unwrap();

        let contents: Vec<&str> = items.items.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(contents, vec!["Send the deck", "Call vendor", "Review"]);
        assert_eq!(items.items[0].confidence, 0.0);
        assert_eq!(items.items[1].confidence, 1.0);
        assert!(items.items[1].assignee.is_empty());
        assert_eq!(items.items[2].confidence, 0.0);
        assert!(items.items[2].due_date.is_none());
    }

    #[test]
    fn test_null_items_list_is_empty() {
        let items: SmartActionItems =
            serde_json::from_value(json!({"items": null, "summary": "none"})).unwrap();
        assert!(items.items.is_empty());
    }

    #[test]
    fn test_partial_snapshot() {
        let analysis: MeetingAiAnalysis = serde_json::from_value(json!({
            "meeting_id": "m1",
            "discussion_analysis": {
                "discussion_patterns": ["round-robin"],
                "participant_engagement": {"alice": 0.9, "bob": 0.4},
                "topic_transitions": [
                    {"from_topic": "budget", "to_topic": "hiring", "triggered_by": "alice"}
                ]
            },
            "created_at": "2024-03-01T12:00:00"
        }))
        .unwrap();

        assert!(analysis.advanced_summary.is_none());
        assert!(!analysis.is_empty());
        let discussion = analysis.discussion_analysis.unwrap();
        assert_eq!(discussion.participant_engagement.len(), 2);
        assert_eq!(discussion.topic_transitions[0].to_topic, "hiring");
        assert!(discussion.consensus_points.is_empty());
    }

    #[test]
    fn test_empty_snapshot() {
        let analysis: MeetingAiAnalysis = serde_json::from_value(json!({})).unwrap();
        assert!(analysis.is_empty());
    }
}
