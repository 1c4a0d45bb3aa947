use super::fetch::{must_fetch, try_fetch};
use crate::api::{Method, Transport};
use crate::error::ApiError;
use crate::models::{AdvancedSummary, DiscussionAnalysis, MeetingAiAnalysis, SmartActionItems};
use std::sync::Arc;

const ADVANCED_SUMMARY: &str = "advanced-summary";
const SMART_ACTION_ITEMS: &str = "smart-action-items";
const DISCUSSION_ANALYSIS: &str = "discussion-analysis";
const AI_ANALYSIS: &str = "ai-analysis";

/// Meeting-scoped resource path under the assistant API
pub fn analysis_path(meeting_id: &str, resource: &str) -> Result<String, ApiError> {
    let meeting_id = meeting_id.trim();
    if meeting_id.is_empty() {
        return Err(ApiError::InvalidMeetingId);
    }
    Ok(format!(
        "/assistant/meeting/{}/{}",
        urlencoding::encode(meeting_id),
        resource
    ))
}

/// Triggers and reads AI analyses for meetings.
///
/// Generation calls surface their errors to the caller; the snapshot read
/// never fails and yields `None` instead. Nothing is cached or retried.
pub struct AiAnalysisClient<T: Transport> {
    transport: Arc<T>,
}

impl<T: Transport> Clone for AiAnalysisClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}

impl<T: Transport> AiAnalysisClient<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub async fn generate_advanced_summary(
        &self,
        meeting_id: &str,
    ) -> Result<AdvancedSummary, ApiError> {
        let path = analysis_path(meeting_id, ADVANCED_SUMMARY)?;
        log::info!("Generating advanced summary for meeting {}", meeting_id);
        let summary: AdvancedSummary = must_fetch(&*self.transport, Method::Post, &path).await?;
        log::info!(
            "Advanced summary ready: {} decisions, {} recommendations, {} topics",
            summary.implied_decisions.len(),
            summary.recommendations.len(),
            summary.key_topics.len()
        );
        Ok(summary)
    }

    pub async fn extract_smart_action_items(
        &self,
        meeting_id: &str,
    ) -> Result<SmartActionItems, ApiError> {
        let path = analysis_path(meeting_id, SMART_ACTION_ITEMS)?;
        log::info!("Extracting action items for meeting {}", meeting_id);
        let items: SmartActionItems = must_fetch(&*self.transport, Method::Post, &path).await?;
        log::info!("Extracted {} action items", items.items.len());
        Ok(items)
    }

    pub async fn analyze_discussion(
        &self,
        meeting_id: &str,
    ) -> Result<DiscussionAnalysis, ApiError> {
        let path = analysis_path(meeting_id, DISCUSSION_ANALYSIS)?;
        log::info!("Analyzing discussion for meeting {}", meeting_id);
        let analysis: DiscussionAnalysis =
            must_fetch(&*self.transport, Method::Post, &path).await?;
        log::info!(
            "Discussion analysis ready: {} patterns, {} transitions",
            analysis.discussion_patterns.len(),
            analysis.topic_transitions.len()
        );
        Ok(analysis)
    }

    /// Whatever analyses already exist for the meeting, if any could be read.
    pub async fn get_ai_analysis(&self, meeting_id: &str) -> Option<MeetingAiAnalysis> {
        let path = match analysis_path(meeting_id, AI_ANALYSIS) {
            Ok(path) => path,
            Err(e) => {
                log::warn!("Skipping analysis snapshot: {}", e);
                return None;
            }
        };
        let analysis: Option<MeetingAiAnalysis> = try_fetch(&*self.transport, &path).await;
        if let Some(analysis) = &analysis {
            log::debug!(
                "Analysis snapshot for {}: summary={}, action_items={}, discussion={}",
                meeting_id,
                analysis.advanced_summary.is_some(),
                analysis.smart_action_items.is_some(),
                analysis.discussion_analysis.is_some()
            );
        }
        analysis
    }
}
