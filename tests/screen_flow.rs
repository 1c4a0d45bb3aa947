use meeting_insights_lib::api::{Method, Transport};
use meeting_insights_lib::notify::CollectingNotifier;
use meeting_insights_lib::presenters::action_items::ActionItemsView;
use meeting_insights_lib::presenters::classify::DecisionType;
use meeting_insights_lib::presenters::summary::SummaryView;
use meeting_insights_lib::presenters::{PresenterState, TriggerOutcome};
use meeting_insights_lib::{AnalysisScreen, ApiError, ScreenError, ScreenState};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Backend stand-in: canned replies per (method, path), every call recorded.
#[derive(Default)]
struct Backend {
    replies: Mutex<HashMap<(Method, String), Result<Value, String>>>,
    calls: Mutex<Vec<(Method, String)>>,
}

impl Backend {
    fn reply(self, method: Method, path: &str, body: Value) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Ok(body));
        self
    }

    fn fail(self, method: Method, path: &str, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Err(message.to_string()));
        self
    }

    fn calls(&self) -> Vec<(Method, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, method: Method, path: &str) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push((method, path.to_string()));
        match self.replies.lock().unwrap().get(&(method, path.to_string())) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(message)) => Err(ApiError::Connection(message.clone())),
            None => Err(ApiError::Status {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

impl Transport for Backend {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.respond(Method::Get, path)
    }

    async fn post(&self, path: &str, _body: Option<Value>) -> Result<Value, ApiError> {
        self.respond(Method::Post, path)
    }
}

fn meeting_m1() -> Value {
    json!({
        "id": "m1",
        "title": "季度预算会",
        "start_time": "2024-03-01T02:00:00Z",
        "end_time": "2024-03-01T03:00:00Z",
        "status": "completed",
        "participants": ["alice", "bob"]
    })
}

fn open_screen(backend: Backend) -> (AnalysisScreen<Backend>, Arc<Backend>, Arc<CollectingNotifier>) {
    let backend = Arc::new(backend);
    let notifier = Arc::new(CollectingNotifier::new());
    let screen = AnalysisScreen::new(backend.clone(), notifier.clone());
    (screen, backend, notifier)
}

#[tokio::test]
async fn test_snapshot_failure_still_shows_meeting() {
    let (mut screen, _, notifier) = open_screen(
        Backend::default()
            .reply(Method::Get, "/meetings/m1", meeting_m1())
            .fail(Method::Get, "/assistant/meeting/m1/ai-analysis", "timeout"),
    );

    screen.open(Some("m1")).await.unwrap();

    let ScreenState::Ready { meeting, analysis } = screen.state() else {
        panic!("screen should be ready");
    };
    assert_eq!(meeting.title, "季度预算会");
    assert!(analysis.is_none());
    assert!(notifier.notifications().is_empty());

    let presenters = screen.presenters().unwrap();
    assert!(matches!(presenters.summary.view(), SummaryView::Placeholder(_)));
}

#[tokio::test]
async fn test_missing_meeting_id_is_reported_without_calls() {
    let (mut screen, backend, notifier) = open_screen(Backend::default());

    let result = screen.open(None).await;

    assert!(matches!(result, Err(ScreenError::MissingMeetingId)));
    assert_eq!(notifier.errors(), vec!["缺少会议ID"]);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_generated_summary_is_rendered() {
    let (mut screen, _, notifier) = open_screen(
        Backend::default()
            .reply(Method::Get, "/meetings/m1", meeting_m1())
            .reply(
                Method::Post,
                "/assistant/meeting/m1/advanced-summary",
                json!({
                    "theme_analysis": "A",
                    "insights": "B",
                    "implied_decisions": ["批准预算"],
                    "recommendations": [],
                    "key_topics": ["预算"]
                }),
            ),
    );
    screen.open(Some("m1")).await.unwrap();
    let presenters = screen.presenters().unwrap();

    assert_eq!(presenters.summary.trigger().await, TriggerOutcome::Updated);

    let SummaryView::Loaded(view) = presenters.summary.view() else {
        panic!("summary should be loaded");
    };
    assert_eq!(view.theme, "A");
    assert_eq!(view.insights, "B");
    assert_eq!(view.decisions.len(), 1);
    assert_eq!(view.decisions[0].label, "批准");
    assert_eq!(view.decisions[0].kind, DecisionType::Approval);
    assert_eq!(view.key_topics, vec!["预算"]);
    assert!(!notifier.notifications()[0].is_error());
}

#[tokio::test]
async fn test_failed_action_item_extraction_rolls_back() {
    let (mut screen, _, notifier) = open_screen(
        Backend::default()
            .reply(Method::Get, "/meetings/m1", meeting_m1())
            .fail(
                Method::Post,
                "/assistant/meeting/m1/smart-action-items",
                "network unreachable",
            ),
    );
    screen.open(Some("m1")).await.unwrap();
    let presenters = screen.presenters().unwrap();

    assert_eq!(presenters.action_items.trigger().await, TriggerOutcome::Failed);

    assert_eq!(presenters.action_items.state(), PresenterState::Empty);
    assert!(matches!(
        presenters.action_items.view(),
        ActionItemsView::Placeholder(_)
    ));
    assert_eq!(notifier.errors().len(), 1);
    assert!(presenters.action_items.can_trigger());
}

#[tokio::test]
async fn test_presenters_keep_their_own_results() {
    let (mut screen, backend, _) = open_screen(
        Backend::default()
            .reply(Method::Get, "/meetings/m1", meeting_m1())
            .reply(
                Method::Get,
                "/assistant/meeting/m1/ai-analysis",
                json!({"meeting_id": "m1", "advanced_summary": {"theme_analysis": "old"}}),
            )
            .reply(
                Method::Post,
                "/assistant/meeting/m1/advanced-summary",
                json!({"theme_analysis": "new", "implied_decisions": ["postpone launch"]}),
            ),
    );
    screen.open(Some("m1")).await.unwrap();
    let presenters = screen.presenters().unwrap();

    presenters.decisions.trigger().await;

    assert_eq!(presenters.decisions.result().unwrap().theme_analysis, "new");
    assert_eq!(presenters.summary.result().unwrap().theme_analysis, "old");
    assert_eq!(
        backend
            .calls()
            .iter()
            .filter(|(m, _)| *m == Method::Post)
            .count(),
        1
    );
}

#[tokio::test]
async fn test_meeting_with_both_id_keys_opens() {
    let mut meeting = meeting_m1();
    meeting["meeting_id"] = json!("m1");
    let (mut screen, _, notifier) =
        open_screen(Backend::default().reply(Method::Get, "/meetings/m1", meeting));

    screen.open(Some("m1")).await.unwrap();

    assert_eq!(screen.meeting().unwrap().id, "m1");
    assert!(notifier.errors().is_empty());
}
