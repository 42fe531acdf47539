//! What the upload page shows at each point of an upload cycle

use shared_types::UploadResponse;

/// Shown when the server reports a failure without a message
pub const FALLBACK_ERROR: &str = "An error occurred during processing";

/// Shown when the request or its JSON body fails
pub const CONNECTION_ERROR: &str = "Connection error with server";

/// Lower half of the page: nothing, the results, or an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    Hidden,
    Results {
        analysis: String,
        protocol: String,
        download_url: String,
    },
    Error(String),
}

/// Complete visual state of the upload page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    /// Spinner shown and submit disabled while true
    pub busy: bool,
    pub panel: Panel,
}

impl UiState {
    /// Request in flight; earlier results and errors are cleared
    pub fn busy() -> Self {
        Self {
            busy: true,
            panel: Panel::Hidden,
        }
    }

    /// Idle again, showing what the server answered
    pub fn from_response(response: UploadResponse) -> Self {
        let panel = if response.success {
            Panel::Results {
                analysis: response.analysis.unwrap_or_default(),
                protocol: response.protocol.unwrap_or_default(),
                download_url: response.download_url.unwrap_or_default(),
            }
        } else {
            let message = response
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| FALLBACK_ERROR.to_string());
            Panel::Error(message)
        };

        Self { busy: false, panel }
    }

    /// Idle again after the request itself failed
    pub fn connection_failed() -> Self {
        Self {
            busy: false,
            panel: Panel::Error(CONNECTION_ERROR.to_string()),
        }
    }

    pub fn results_visible(&self) -> bool {
        matches!(self.panel, Panel::Results { .. })
    }

    pub fn error_visible(&self) -> bool {
        matches!(self.panel, Panel::Error(_))
    }
}
