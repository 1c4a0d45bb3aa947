use super::fetch::must_fetch;
use crate::api::{Method, Transport};
use crate::error::ApiError;
use crate::models::Meeting;
use std::sync::Arc;

/// Reads meeting metadata from the meeting backend
pub struct MeetingClient<T: Transport> {
    transport: Arc<T>,
}

impl<T: Transport> Clone for MeetingClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}

impl<T: Transport> MeetingClient<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub async fn get_meeting(&self, meeting_id: &str) -> Result<Meeting, ApiError> {
        let meeting_id = meeting_id.trim();
        if meeting_id.is_empty() {
            return Err(ApiError::InvalidMeetingId);
        }
        let path = format!("/meetings/{}", urlencoding::encode(meeting_id));
        let meeting: Meeting = must_fetch(&*self.transport, Method::Get, &path).await?;
        log::info!("Loaded meeting: {} (ID: {})", meeting.title, meeting.id);
        Ok(meeting)
    }

    pub async fn list_meetings(&self) -> Result<Vec<Meeting>, ApiError> {
        let meetings: Vec<Meeting> = must_fetch(&*self.transport, Method::Get, "/meetings").await?;
        log::info!("Fetched {} meetings", meetings.len());
        Ok(meetings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeTransport;
    use serde_json::json;

    fn meeting_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": "Weekly sync",
            "start_time": "2024-03-01T10:00:00Z",
            "end_time": "2024-03-01T11:00:00Z",
            "status": "completed",
            "participants": ["alice", "bob"]
        })
    }

    #[tokio::test]
    async fn test_get_meeting() {
        let transport = Arc::new(FakeTransport::new().reply(Method::Get, "/meetings/m1", meeting_json("m1")));
        let client = MeetingClient::new(transport);
        let meeting = client.get_meeting("m1").await.unwrap();
        assert_eq!(meeting.title, "Weekly sync");
        assert_eq!(meeting.participants.len(), 2);
    }

    #[tokio::test]
    async fn test_get_meeting_not_found() {
        let client = MeetingClient::new(Arc::new(FakeTransport::new()));
        assert!(matches!(
            client.get_meeting("missing").await,
            Err(ApiError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_list_meetings() {
        let transport = Arc::new(FakeTransport::new().reply(
            Method::Get,
            "/meetings",
            json!([meeting_json("m1"), meeting_json("m2")]),
        ));
        let client = MeetingClient::new(transport);
        let meetings = client.list_meetings().await.unwrap();
        assert_eq!(meetings.len(), 2);
        assert_eq!(meetings[1].id, "m2");
    }
}
