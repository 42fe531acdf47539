//! Posting the contract to the server

use async_trait::async_trait;
use shared_types::UploadResponse;
use thiserror::Error;

/// Multipart part the server reads the contract from
pub const CONTRACT_FIELD: &str = "contract";

/// Fixed upload endpoint
pub const UPLOAD_ENDPOINT: &str = "/upload";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid response body: {0}")]
    Parse(String),
}

/// Sends one upload and returns the decoded JSON body.
///
/// Non-2xx statuses are not errors here; the server explains failures in the
/// body and the body is what gets decoded.
#[async_trait(?Send)]
pub trait UploadTransport {
    type File;

    async fn upload(&self, file: Option<Self::File>) -> Result<UploadResponse, TransportError>;
}

pub use fetch::FetchTransport;

mod fetch {
    use super::*;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{File, FormData, Request, RequestInit, Response};

    fn request_error(value: JsValue) -> TransportError {
        TransportError::Request(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }

    /// `fetch` based transport
    pub struct FetchTransport {
        endpoint: String,
    }

    impl FetchTransport {
        pub fn new() -> Self {
            Self {
                endpoint: UPLOAD_ENDPOINT.to_string(),
            }
        }
    }

    impl Default for FetchTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait(?Send)]
    impl UploadTransport for FetchTransport {
        type File = File;

        async fn upload(&self, file: Option<File>) -> Result<UploadResponse, TransportError> {
            let window = web_sys::window()
                .ok_or_else(|| TransportError::Request("no window".to_string()))?;

            let form = FormData::new().map_err(request_error)?;
            match &file {
                Some(file) => form
                    .append_with_blob_and_filename(CONTRACT_FIELD, file, &file.name())
                    .map_err(request_error)?,
                // the server answers with its own "no file" error
                None => form
                    .append_with_str(CONTRACT_FIELD, "")
                    .map_err(request_error)?,
            }

            let opts = RequestInit::new();
            opts.set_method("POST");
            opts.set_body(&form);

            let request =
                Request::new_with_str_and_init(&self.endpoint, &opts).map_err(request_error)?;

            let response = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(request_error)?;
            let response: Response = response.dyn_into().map_err(request_error)?;

            let json = JsFuture::from(response.json().map_err(request_error)?)
                .await
                .map_err(|e| TransportError::Parse(format!("{:?}", e)))?;

            serde_wasm_bindgen::from_value(json).map_err(|e| TransportError::Parse(e.to_string()))
        }
    }
}
