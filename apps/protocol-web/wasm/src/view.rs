//! Rendering `UiState` onto the upload page

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, File, HtmlAnchorElement, HtmlButtonElement, HtmlElement, HtmlInputElement,
};

use crate::state::{Panel, UiState};

/// Class that hides an element
pub const HIDDEN_CLASS: &str = "d-none";

/// The page as seen by the controller
pub trait UploadView {
    type File;

    /// First file chosen in the file input, if any
    fn selected_file(&self) -> Option<Self::File>;

    fn render(&self, state: &UiState);
}

/// Element ids on the upload page
pub mod ids {
    pub const FORM: &str = "uploadForm";
    pub const FILE_INPUT: &str = "contractFile";
    pub const SUBMIT: &str = "analyzeBtn";
    pub const SUBMIT_LABEL: &str = "btnText";
    pub const SPINNER: &str = "btnSpinner";
    pub const RESULTS: &str = "results";
    pub const ANALYSIS: &str = "analysisText";
    pub const PROTOCOL: &str = "protocolText";
    pub const DOWNLOAD: &str = "downloadLink";
    pub const ERROR: &str = "error";
}

/// Handles to the page elements touched during an upload
pub struct DomView {
    pub file_input: HtmlInputElement,
    pub submit: HtmlButtonElement,
    pub submit_label: HtmlElement,
    pub spinner: HtmlElement,
    pub results: HtmlElement,
    pub analysis: HtmlElement,
    pub protocol: HtmlElement,
    pub download: HtmlAnchorElement,
    pub error: HtmlElement,
}

fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Element #{} not found", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Element #{} has an unexpected type", id)))
}

fn set_visible(el: &HtmlElement, visible: bool) {
    let classes = el.class_list();
    let _ = if visible {
        classes.remove_1(HIDDEN_CLASS)
    } else {
        classes.add_1(HIDDEN_CLASS)
    };
}

impl DomView {
    pub fn from_document(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            file_input: element(document, ids::FILE_INPUT)?,
            submit: element(document, ids::SUBMIT)?,
            submit_label: element(document, ids::SUBMIT_LABEL)?,
            spinner: element(document, ids::SPINNER)?,
            results: element(document, ids::RESULTS)?,
            analysis: element(document, ids::ANALYSIS)?,
            protocol: element(document, ids::PROTOCOL)?,
            download: element(document, ids::DOWNLOAD)?,
            error: element(document, ids::ERROR)?,
        })
    }
}

impl UploadView for DomView {
    type File = File;

    fn selected_file(&self) -> Option<File> {
        self.file_input.files().and_then(|files| files.get(0))
    }

    fn render(&self, state: &UiState) {
        set_visible(&self.submit_label, !state.busy);
        set_visible(&self.spinner, state.busy);
        self.submit.set_disabled(state.busy);

        match &state.panel {
            Panel::Hidden => {
                set_visible(&self.results, false);
                set_visible(&self.error, false);
            }
            Panel::Results {
                analysis,
                protocol,
                download_url,
            } => {
                self.analysis.set_text_content(Some(analysis.as_str()));
                self.protocol.set_text_content(Some(protocol.as_str()));
                self.download.set_href(download_url);
                set_visible(&self.error, false);
                set_visible(&self.results, true);
            }
            Panel::Error(message) => {
                self.error.set_text_content(Some(message.as_str()));
                set_visible(&self.results, false);
                set_visible(&self.error, true);
            }
        }
    }
}
