use super::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Meeting metadata as served by the meeting backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "MeetingRecord")]
pub struct Meeting {
    /// Unique identifier for this meeting, read from `id` or `meeting_id`
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Duration in minutes, when the backend provides one
    pub duration: Option<i64>,
    /// Free-form status string, e.g. "scheduled", "completed"
    pub status: String,
    /// Participant identifiers
    pub participants: Vec<String>,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
    pub summary: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Wire shape of a meeting; the backend may send `id`, `meeting_id` or both.
#[derive(Deserialize)]
struct MeetingRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    meeting_id: Option<String>,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    start_time: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    end_time: DateTime<Utc>,
    #[serde(default)]
    duration: Option<i64>,
    #[serde(default)]
    status: String,
    #[serde(default)]
    participants: Vec<String>,
    #[serde(default)]
    meeting_link: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<MeetingRecord> for Meeting {
    type Error = String;

    fn try_from(record: MeetingRecord) -> Result<Self, Self::Error> {
        let id = record.id.filter(|id| !id.trim().is_empty());
        let meeting_id = record.meeting_id.filter(|id| !id.trim().is_empty());
        let id = match (id, meeting_id) {
            (Some(id), Some(other)) => {
                if id != other {
                    log::warn!("Meeting carries both id '{}' and meeting_id '{}', using id", id, other);
                }
                id
            }
            (Some(id), None) | (None, Some(id)) => id,
            (None, None) => return Err("meeting has neither id nor meeting_id".to_string()),
        };

        Ok(Meeting {
            id,
            title: record.title,
            description: record.description,
            start_time: record.start_time,
            end_time: record.end_time,
            duration: record.duration,
            status: record.status,
            participants: record.participants,
            meeting_link: record.meeting_link,
            notes: record.notes,
            summary: record.summary,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl Meeting {
    /// Duration in minutes, falling back to the span between start and end.
    pub fn duration_minutes(&self) -> i64 {
        self.duration
            .unwrap_or_else(|| (self.end_time - self.start_time).num_minutes().max(0))
    }
}
