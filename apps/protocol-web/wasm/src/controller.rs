//! One upload cycle: busy, post, show the answer, idle

use std::cell::Cell;

use crate::state::UiState;
use crate::transport::{TransportError, UploadTransport};
use crate::view::UploadView;

/// How a submission ended
#[derive(Debug)]
pub enum CycleOutcome {
    /// Another cycle was still running; the page was left alone
    Ignored,
    /// Server answered with `success: true`
    Completed,
    /// Server answered with `success: false`
    Rejected,
    /// No usable answer from the server
    ConnectionFailed(TransportError),
}

pub struct UploadFormController<V, T> {
    view: V,
    transport: T,
    in_flight: Cell<bool>,
}

impl<V, T> UploadFormController<V, T>
where
    V: UploadView,
    T: UploadTransport<File = V::File>,
{
    pub fn new(view: V, transport: T) -> Self {
        Self {
            view,
            transport,
            in_flight: Cell::new(false),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    /// Run one upload cycle for the currently selected file.
    ///
    /// The page always ends idle with exactly one of results or error shown.
    /// Failures end up on the page and are never returned as `Err`.
    pub async fn submit(&self) -> CycleOutcome {
        if self.in_flight.replace(true) {
            return CycleOutcome::Ignored;
        }

        let file = self.view.selected_file();
        self.view.render(&UiState::busy());

        let (state, outcome) = match self.transport.upload(file).await {
            Ok(response) => {
                let outcome = if response.success {
                    CycleOutcome::Completed
                } else {
                    CycleOutcome::Rejected
                };
                (UiState::from_response(response), outcome)
            }
            Err(e) => (UiState::connection_failed(), CycleOutcome::ConnectionFailed(e)),
        };

        self.view.render(&state);
        self.in_flight.set(false);
        outcome
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::state::{Panel, CONNECTION_ERROR, FALLBACK_ERROR};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use shared_types::UploadResponse;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingView {
        file: Option<&'static str>,
        renders: RefCell<Vec<UiState>>,
    }

    impl RecordingView {
        fn with_file(name: &'static str) -> Self {
            Self {
                file: Some(name),
                ..Self::default()
            }
        }

        fn last(&self) -> UiState {
            self.renders.borrow().last().cloned().unwrap()
        }
    }

    impl UploadView for RecordingView {
        type File = &'static str;

        fn selected_file(&self) -> Option<&'static str> {
            self.file
        }

        fn render(&self, state: &UiState) {
            self.renders.borrow_mut().push(state.clone());
        }
    }

    /// Replies with a fixed JSON body, or fails when given none
    struct ScriptedTransport {
        body: Option<&'static str>,
        sent: RefCell<Vec<Option<&'static str>>>,
    }

    impl ScriptedTransport {
        fn replying(body: &'static str) -> Self {
            Self {
                body: Some(body),
                sent: RefCell::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                body: None,
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl UploadTransport for ScriptedTransport {
        type File = &'static str;

        async fn upload(
            &self,
            file: Option<&'static str>,
        ) -> Result<UploadResponse, TransportError> {
            self.sent.borrow_mut().push(file);
            // let other submissions run while this one is pending
            tokio::task::yield_now().await;

            let body = self
                .body
                .ok_or_else(|| TransportError::Request("connection refused".to_string()))?;
            serde_json::from_str(body).map_err(|e| TransportError::Parse(e.to_string()))
        }
    }

    type TestController = UploadFormController<RecordingView, ScriptedTransport>;

    fn run(view: RecordingView, transport: ScriptedTransport) -> (TestController, CycleOutcome) {
        let controller = UploadFormController::new(view, transport);
        let outcome = tokio_test::block_on(controller.submit());
        (controller, outcome)
    }

    fn assert_idle(state: &UiState) {
        assert!(!state.busy);
        assert!(state.results_visible() ^ state.error_visible());
    }

    #[test]
    fn test_success_shows_results() {
        let (controller, outcome) = run(
            RecordingView::with_file("contract.docx"),
            ScriptedTransport::replying(
                r#"{"success":true,"analysis":"A","protocol":"P","download_url":"/d/1"}"#,
            ),
        );

        assert!(matches!(outcome, CycleOutcome::Completed));
        let renders = controller.view().renders.borrow();
        assert_eq!(renders.len(), 2);
        assert_eq!(renders[0], UiState::busy());
        assert_eq!(
            renders[1].panel,
            Panel::Results {
                analysis: "A".to_string(),
                protocol: "P".to_string(),
                download_url: "/d/1".to_string(),
            }
        );
        assert_idle(&renders[1]);
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_selected_file_is_sent() {
        let (controller, _) = run(
            RecordingView::with_file("contract.docx"),
            ScriptedTransport::replying(r#"{"success":false}"#),
        );
        assert_eq!(*controller.transport.sent.borrow(), vec![Some("contract.docx")]);
    }

    #[test]
    fn test_missing_file_still_posts() {
        let (controller, outcome) = run(
            RecordingView::default(),
            ScriptedTransport::replying(
                r#"{"success":false,"error":"No file selected","code":"NO_FILENAME"}"#,
            ),
        );
        assert!(matches!(outcome, CycleOutcome::Rejected));
        assert_eq!(*controller.transport.sent.borrow(), vec![None]);
        assert_eq!(
            controller.view().last().panel,
            Panel::Error("No file selected".to_string())
        );
    }

    #[test]
    fn test_server_error_message_is_shown() {
        let (controller, outcome) = run(
            RecordingView::with_file("contract.pdf"),
            ScriptedTransport::replying(r#"{"success":false,"error":"Bad file"}"#),
        );

        assert!(matches!(outcome, CycleOutcome::Rejected));
        let last = controller.view().last();
        assert_eq!(last.panel, Panel::Error("Bad file".to_string()));
        assert_idle(&last);
    }

    #[test]
    fn test_server_error_without_message() {
        let (controller, _) = run(
            RecordingView::with_file("contract.docx"),
            ScriptedTransport::replying(r#"{"success":false}"#),
        );
        assert_eq!(
            controller.view().last().panel,
            Panel::Error(FALLBACK_ERROR.to_string())
        );
    }

    #[test]
    fn test_unreachable_server() {
        let (controller, outcome) = run(
            RecordingView::with_file("contract.docx"),
            ScriptedTransport::unreachable(),
        );

        assert!(matches!(outcome, CycleOutcome::ConnectionFailed(_)));
        let last = controller.view().last();
        assert_eq!(last.panel, Panel::Error(CONNECTION_ERROR.to_string()));
        assert_idle(&last);
    }

    #[test]
    fn test_unparseable_body() {
        let (controller, outcome) = run(
            RecordingView::with_file("contract.docx"),
            ScriptedTransport::replying("<html>502 Bad Gateway</html>"),
        );

        assert!(matches!(
            outcome,
            CycleOutcome::ConnectionFailed(TransportError::Parse(_))
        ));
        assert_eq!(
            controller.view().last().panel,
            Panel::Error(CONNECTION_ERROR.to_string())
        );
    }

    #[test]
    fn test_second_cycle_replaces_first() {
        let controller = UploadFormController::new(
            RecordingView::with_file("contract.docx"),
            ScriptedTransport::replying(r#"{"success":false,"error":"Bad file"}"#),
        );
        tokio_test::block_on(controller.submit());
        tokio_test::block_on(controller.submit());

        let renders = controller.view().renders.borrow();
        assert_eq!(renders.len(), 4);
        // the busy render hides the previous error
        assert!(!renders[2].error_visible());
        assert_idle(&renders[3]);
    }

    #[test]
    fn test_submission_during_cycle_is_ignored() {
        let controller = UploadFormController::new(
            RecordingView::with_file("contract.docx"),
            ScriptedTransport::replying(
                r#"{"success":true,"analysis":"A","protocol":"P","download_url":"/d/1"}"#,
            ),
        );

        let (first, second) =
            tokio_test::block_on(async { tokio::join!(controller.submit(), controller.submit()) });

        assert!(matches!(first, CycleOutcome::Completed));
        assert!(matches!(second, CycleOutcome::Ignored));
        assert_eq!(controller.transport.sent.borrow().len(), 1);
        assert_eq!(controller.view().renders.borrow().len(), 2);
        assert!(!controller.is_busy());
    }
}
