//! Browser client for the contract protocol server
//!
//! Takes over the `uploadForm` submit: the chosen `.docx` is posted to
//! `/upload` and the answer is rendered in place, without a page reload.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init from '/pkg/protocol_web_wasm.js';
//!
//! await init();
//! ```

pub mod controller;
pub mod state;
pub mod transport;
pub mod view;

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::HtmlFormElement;

pub use controller::{CycleOutcome, UploadFormController};
pub use state::{Panel, UiState};
pub use transport::{FetchTransport, TransportError, UploadTransport};
pub use view::{DomView, UploadView};

/// Initialize the WASM module and bind the upload form
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    if let Err(e) = bind_upload_form() {
        web_sys::console::error_2(&"Upload form not bound:".into(), &e);
    }
}

fn bind_upload_form() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document"))?;

    let form: HtmlFormElement = document
        .get_element_by_id(view::ids::FORM)
        .ok_or_else(|| JsValue::from_str("Upload form not found"))?
        .dyn_into()?;

    let controller = Rc::new(UploadFormController::new(
        DomView::from_document(&document)?,
        FetchTransport::new(),
    ));

    let on_submit = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        event.prevent_default();

        let controller = Rc::clone(&controller);
        wasm_bindgen_futures::spawn_local(async move {
            if let CycleOutcome::ConnectionFailed(e) = controller.submit().await {
                web_sys::console::error_1(&e.to_string().into());
            }
        });
    });

    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    // the listener lives as long as the page
    on_submit.forget();

    Ok(())
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
