use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("Not a Word package: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Word package has no {0} part")]
    MissingPart(&'static str),

    #[error("Malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
