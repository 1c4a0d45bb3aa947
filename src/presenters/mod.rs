//! Per-analysis presenters.
//!
//! Each presenter owns the result of one analysis kind for one meeting and
//! the request state around it: `Empty -> Loading -> Loaded`, falling back to
//! the pre-call state when generation fails. Rendering is a pure function of
//! the current result.

pub mod action_items;
pub mod classify;
pub mod decisions;
pub mod discussion;
pub mod summary;

use crate::api::Transport;
use crate::error::ApiError;
use crate::models::MeetingAiAnalysis;
use crate::notify::{Notification, Notifier};
use crate::services::AiAnalysisClient;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

pub use action_items::{ActionItemsKind, ActionItemsView};
pub use decisions::{DecisionsKind, DecisionsView};
pub use discussion::{DiscussionKind, DiscussionView};
pub use summary::{AdvancedSummaryKind, SummaryView};

pub type AdvancedSummaryPresenter<T> = Presenter<AdvancedSummaryKind, T>;
pub type DecisionsPresenter<T> = Presenter<DecisionsKind, T>;
pub type ActionItemsPresenter<T> = Presenter<ActionItemsKind, T>;
pub type DiscussionPresenter<T> = Presenter<DiscussionKind, T>;

/// One analysis kind: how to generate it, where it lives in the snapshot,
/// and how it is displayed.
pub trait AnalysisKind: Send + Sync + 'static {
    type Output: Clone + fmt::Debug + Send + Sync;
    type View: fmt::Display;

    /// Display name used in notifications
    const NAME: &'static str;

    fn generate<T: Transport>(
        client: &AiAnalysisClient<T>,
        meeting_id: &str,
    ) -> impl Future<Output = Result<Self::Output, ApiError>> + Send;

    fn seed(analysis: &MeetingAiAnalysis) -> Option<Self::Output>;

    fn render(result: Option<&Self::Output>) -> Self::View;
}

/// Prompt shown before anything has been generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub title: &'static str,
    pub prompt: &'static str,
    pub action: &'static str,
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        writeln!(f, "{}", self.prompt)?;
        write!(f, "[{}]", self.action)
    }
}

/// A labelled score bar
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBar {
    pub label: String,
    pub score: f64,
    pub percent: String,
}

impl ScoreBar {
    pub fn new(label: &str, score: f64) -> Self {
        Self {
            label: label.to_string(),
            score,
            percent: classify::format_score(score),
        }
    }
}

impl fmt::Display for ScoreBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled = (self.score.clamp(0.0, 1.0) * 20.0).round() as usize;
        write!(
            f,
            "{:<12} {}{} {}",
            self.label,
            "#".repeat(filled),
            ".".repeat(20 - filled),
            self.percent
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresenterState<R> {
    Empty,
    /// Generation in flight; `previous` is restored if it fails
    Loading { previous: Option<R> },
    Loaded(R),
}

impl<R> PresenterState<R> {
    /// The result currently on display
    pub fn result(&self) -> Option<&R> {
        match self {
            PresenterState::Empty => None,
            PresenterState::Loading { previous } => previous.as_ref(),
            PresenterState::Loaded(result) => Some(result),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PresenterState::Loading { .. })
    }

    fn into_result(self) -> Option<R> {
        match self {
            PresenterState::Empty => None,
            PresenterState::Loading { previous } => previous,
            PresenterState::Loaded(result) => Some(result),
        }
    }

    fn from_result(result: Option<R>) -> Self {
        match result {
            Some(result) => PresenterState::Loaded(result),
            None => PresenterState::Empty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The new result replaced the old one
    Updated,
    /// Generation failed; the previous result is back on display
    Failed,
    /// A generation was already in flight; nothing was sent
    Busy,
}

pub struct Presenter<K: AnalysisKind, T: Transport> {
    meeting_id: String,
    client: AiAnalysisClient<T>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<PresenterState<K::Output>>,
}

impl<K: AnalysisKind, T: Transport> Presenter<K, T> {
    pub fn new(
        meeting_id: impl Into<String>,
        client: AiAnalysisClient<T>,
        notifier: Arc<dyn Notifier>,
        seed: Option<K::Output>,
    ) -> Self {
        Self {
            meeting_id: meeting_id.into(),
            client,
            notifier,
            state: Mutex::new(PresenterState::from_result(seed)),
        }
    }

    pub fn meeting_id(&self) -> &str {
        &self.meeting_id
    }

    pub fn state(&self) -> PresenterState<K::Output> {
        self.lock_state().clone()
    }

    pub fn result(&self) -> Option<K::Output> {
        self.lock_state().result().cloned()
    }

    /// Whether the generate action is currently enabled
    pub fn can_trigger(&self) -> bool {
        !self.lock_state().is_loading()
    }

    pub fn view(&self) -> K::View {
        K::render(self.lock_state().result())
    }

    /// Request a fresh result from the backend.
    ///
    /// At most one request per presenter is in flight; a call made while
    /// loading returns `Busy` without touching the network. Dropping the
    /// returned future mid-request puts the previous result back.
    pub async fn trigger(&self) -> TriggerOutcome {
        let guard = {
            let mut state = self.lock_state();
            if state.is_loading() {
                log::debug!("{} already generating for {}", K::NAME, self.meeting_id);
                return TriggerOutcome::Busy;
            }
            let previous = std::mem::replace(&mut *state, PresenterState::Empty).into_result();
            *state = PresenterState::Loading { previous };
            LoadingGuard { state: &self.state }
        };

        match K::generate(&self.client, &self.meeting_id).await {
            Ok(result) => {
                guard.finish(result);
                self.notifier
                    .notify(Notification::Success(format!("{}生成成功", K::NAME)));
                TriggerOutcome::Updated
            }
            Err(e) => {
                drop(guard);
                log::warn!("{} generation failed for {}: {}", K::NAME, self.meeting_id, e);
                self.notifier
                    .notify(Notification::Error(format!("{}生成失败，请重试", K::NAME)));
                TriggerOutcome::Failed
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, PresenterState<K::Output>> {
        lock(&self.state)
    }
}

fn lock<R>(state: &Mutex<PresenterState<R>>) -> MutexGuard<'_, PresenterState<R>> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Held while a generation is in flight. Unless `finish` is called, dropping
/// it rolls `Loading { previous }` back to `previous`.
struct LoadingGuard<'a, R> {
    state: &'a Mutex<PresenterState<R>>,
}

impl<R> LoadingGuard<'_, R> {
    fn finish(self, result: R) {
        *lock(self.state) = PresenterState::Loaded(result);
        std::mem::forget(self);
    }
}

impl<R> Drop for LoadingGuard<'_, R> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        if state.is_loading() {
            let previous = std::mem::replace(&mut *state, PresenterState::Empty).into_result();
            *state = PresenterState::from_result(previous);
        }
    }
}

impl<K: AnalysisKind, T: Transport> fmt::Debug for Presenter<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presenter")
            .field("kind", &K::NAME)
            .field("meeting_id", &self.meeting_id)
            .field("state", &*self.lock_state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeTransport;
    use crate::api::Method;
    use crate::models::AdvancedSummary;
    use crate::notify::CollectingNotifier;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::Notify;

    const SUMMARY_PATH: &str = "/assistant/meeting/m1/advanced-summary";

    fn seeded_summary() -> AdvancedSummary {
        AdvancedSummary {
            theme_analysis: "old theme".to_string(),
            ..AdvancedSummary::default()
        }
    }

    fn presenter(
        transport: FakeTransport,
        seed: Option<AdvancedSummary>,
    ) -> (
        AdvancedSummaryPresenter<FakeTransport>,
        Arc<FakeTransport>,
        Arc<CollectingNotifier>,
    ) {
        let transport = Arc::new(transport);
        let notifier = Arc::new(CollectingNotifier::new());
        let presenter = Presenter::new(
            "m1",
            AiAnalysisClient::new(transport.clone()),
            notifier.clone(),
            seed,
        );
        (presenter, transport, notifier)
    }

    #[tokio::test]
    async fn test_success_replaces_result() {
        let (presenter, _, notifier) = presenter(
            FakeTransport::new().reply(
                Method::Post,
                SUMMARY_PATH,
                json!({"theme_analysis": "new theme", "key_topics": ["x"]}),
            ),
            Some(seeded_summary()),
        );

        assert_eq!(presenter.trigger().await, TriggerOutcome::Updated);
        let result = presenter.result().unwrap();
        assert_eq!(result.theme_analysis, "new theme");
        // Fields absent from the new payload are not carried over
        assert!(result.insights.is_empty());
        assert!(!notifier.notifications()[0].is_error());
    }

    #[tokio::test]
    async fn test_failure_restores_previous() {
        let (presenter, _, notifier) = presenter(
            FakeTransport::new().fail(Method::Post, SUMMARY_PATH, "offline"),
            Some(seeded_summary()),
        );

        assert_eq!(presenter.trigger().await, TriggerOutcome::Failed);
        assert_eq!(presenter.state(), PresenterState::Loaded(seeded_summary()));
        assert_eq!(notifier.errors().len(), 1);
        assert!(presenter.can_trigger());
    }

    #[tokio::test]
    async fn test_failure_from_empty_stays_empty() {
        let (presenter, _, _) = presenter(
            FakeTransport::new().fail(Method::Post, SUMMARY_PATH, "offline"),
            None,
        );
        presenter.trigger().await;
        assert_eq!(presenter.state(), PresenterState::Empty);
    }

    #[tokio::test]
    async fn test_second_trigger_while_loading_is_busy() {
        let gate = Arc::new(Notify::new());
        let transport = FakeTransport::gated(gate.clone()).reply(
            Method::Post,
            SUMMARY_PATH,
            json!({"theme_analysis": "fresh"}),
        );
        let (presenter, transport, _) = presenter(transport, None);

        let first = presenter.trigger();
        let second = async {
            tokio::task::yield_now().await;
            assert!(!presenter.can_trigger());
            assert!(presenter.state().is_loading());
            let outcome = presenter.trigger().await;
            gate.notify_one();
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, TriggerOutcome::Updated);
        assert_eq!(second, TriggerOutcome::Busy);
        assert_eq!(transport.calls().len(), 1);
        assert!(presenter.can_trigger());
    }

    #[tokio::test]
    async fn test_previous_result_visible_while_loading() {
        let gate = Arc::new(Notify::new());
        let transport = FakeTransport::gated(gate.clone()).fail(Method::Post, SUMMARY_PATH, "x");
        let (presenter, _, _) = presenter(transport, Some(seeded_summary()));

        let run = presenter.trigger();
        let check = async {
            tokio::task::yield_now().await;
            let shown = presenter.result();
            gate.notify_one();
            shown
        };
        let (outcome, shown) = tokio::join!(run, check);

        assert_eq!(outcome, TriggerOutcome::Failed);
        assert_eq!(shown, Some(seeded_summary()));
    }

    #[tokio::test]
    async fn test_abandoned_trigger_rolls_back() {
        let gate = Arc::new(Notify::new());
        let transport = FakeTransport::gated(gate).reply(
            Method::Post,
            SUMMARY_PATH,
            json!({"theme_analysis": "never seen"}),
        );
        let (presenter, transport, notifier) = presenter(transport, Some(seeded_summary()));

        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), presenter.trigger()).await;

        assert!(timed_out.is_err());
        assert_eq!(transport.calls().len(), 1);
        assert!(presenter.can_trigger());
        assert_eq!(presenter.state(), PresenterState::Loaded(seeded_summary()));
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_score_bar() {
        let bar = ScoreBar::new("positive", 0.5);
        assert_eq!(bar.percent, "50%");
        assert!(bar.to_string().contains("##########.........."));
    }
}
