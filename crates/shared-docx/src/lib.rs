//! Shared Word document handling
//!
//! Reads the text of uploaded `.docx` contracts and writes the protocol of
//! disagreements back out as a `.docx` package.

pub mod error;
pub mod extract;
pub mod protocol;

pub use error::DocxError;
pub use extract::extract_text;
pub use protocol::ProtocolWriter;

/// MIME type of a WordprocessingML package
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
