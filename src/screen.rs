use crate::api::Transport;
use crate::error::ScreenError;
use crate::models::{Meeting, MeetingAiAnalysis};
use crate::notify::{Notification, Notifier};
use crate::presenters::{
    ActionItemsKind, ActionItemsPresenter, AdvancedSummaryKind, AdvancedSummaryPresenter,
    AnalysisKind, DecisionsKind, DecisionsPresenter, DiscussionKind, DiscussionPresenter,
    Presenter,
};
use crate::services::{AiAnalysisClient, MeetingClient};
use std::fmt;
use std::sync::Arc;

pub const MISSING_ID_MESSAGE: &str = "缺少会议ID";
pub const MEETING_LOAD_FAILED_MESSAGE: &str = "加载会议失败";

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState {
    Initializing,
    MissingId,
    MeetingLoadFailed(String),
    /// `analysis` is `None` when no snapshot could be read
    Ready {
        meeting: Meeting,
        analysis: Option<MeetingAiAnalysis>,
    },
}

/// The four presenters of a ready screen, seeded from the snapshot
pub struct ScreenPresenters<T: Transport> {
    pub summary: AdvancedSummaryPresenter<T>,
    pub decisions: DecisionsPresenter<T>,
    pub action_items: ActionItemsPresenter<T>,
    pub discussion: DiscussionPresenter<T>,
}

/// Loads a meeting and its existing analysis for display.
///
/// The meeting itself is required; the analysis snapshot is best-effort.
pub struct AnalysisScreen<T: Transport> {
    meetings: MeetingClient<T>,
    analysis: AiAnalysisClient<T>,
    notifier: Arc<dyn Notifier>,
    state: ScreenState,
}

impl<T: Transport> AnalysisScreen<T> {
    pub fn new(transport: Arc<T>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_clients(
            MeetingClient::new(transport.clone()),
            AiAnalysisClient::new(transport),
            notifier,
        )
    }

    pub fn with_clients(
        meetings: MeetingClient<T>,
        analysis: AiAnalysisClient<T>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            meetings,
            analysis,
            notifier,
            state: ScreenState::Initializing,
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn meeting(&self) -> Option<&Meeting> {
        match &self.state {
            ScreenState::Ready { meeting, .. } => Some(meeting),
            _ => None,
        }
    }

    /// Enter the screen for `meeting_id`.
    pub async fn open(&mut self, meeting_id: Option<&str>) -> Result<(), ScreenError> {
        let Some(meeting_id) = meeting_id.map(str::trim).filter(|id| !id.is_empty()) else {
            log::error!("Analysis screen opened without a meeting id");
            self.state = ScreenState::MissingId;
            self.notifier
                .notify(Notification::Error(MISSING_ID_MESSAGE.to_string()));
            return Err(ScreenError::MissingMeetingId);
        };

        self.state = ScreenState::Initializing;

        let meeting = match self.meetings.get_meeting(meeting_id).await {
            Ok(meeting) => meeting,
            Err(e) => {
                log::error!("Failed to load meeting {}: {}", meeting_id, e);
                self.state = ScreenState::MeetingLoadFailed(e.to_string());
                self.notifier
                    .notify(Notification::Error(MEETING_LOAD_FAILED_MESSAGE.to_string()));
                return Err(ScreenError::MeetingLoad(e));
            }
        };

        let analysis = self.analysis.get_ai_analysis(meeting_id).await;
        if analysis.is_none() {
            log::info!("No existing analysis for meeting {}", meeting_id);
        }

        self.state = ScreenState::Ready { meeting, analysis };
        Ok(())
    }

    /// Presenters for a ready screen; `None` before a successful `open`.
    pub fn presenters(&self) -> Option<ScreenPresenters<T>> {
        let ScreenState::Ready { meeting, analysis } = &self.state else {
            return None;
        };
        let analysis = analysis.as_ref();
        Some(ScreenPresenters {
            summary: self.presenter::<AdvancedSummaryKind>(&meeting.id, analysis),
            decisions: self.presenter::<DecisionsKind>(&meeting.id, analysis),
            action_items: self.presenter::<ActionItemsKind>(&meeting.id, analysis),
            discussion: self.presenter::<DiscussionKind>(&meeting.id, analysis),
        })
    }

    fn presenter<K: AnalysisKind>(
        &self,
        meeting_id: &str,
        analysis: Option<&MeetingAiAnalysis>,
    ) -> Presenter<K, T> {
        Presenter::new(
            meeting_id,
            self.analysis.clone(),
            self.notifier.clone(),
            analysis.and_then(K::seed),
        )
    }
}

/// Header block shown above the presenters
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingHeader {
    pub title: String,
    pub time_range: String,
    pub duration_minutes: i64,
    pub status: String,
    pub participants: String,
}

impl MeetingHeader {
    pub fn new(meeting: &Meeting) -> Self {
        Self {
            title: meeting.title.clone(),
            time_range: format!(
                "{} - {}",
                meeting.start_time.format("%Y-%m-%d %H:%M"),
                meeting.end_time.format("%H:%M")
            ),
            duration_minutes: meeting.duration_minutes(),
            status: meeting.status.clone(),
            participants: meeting.participants.join(", "),
        }
    }
}

impl fmt::Display for MeetingHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.title)?;
        writeln!(f, "{} ({} 分钟) [{}]", self.time_range, self.duration_minutes, self.status)?;
        write!(f, "参与者: {}", self.participants)
    }
}
