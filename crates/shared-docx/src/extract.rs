use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::DocxError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract paragraph text from a `.docx` package.
///
/// Paragraphs are trimmed, empty ones dropped, and the rest joined with `\n`.
/// Tabs and explicit line breaks inside a paragraph are kept as `\t` and `\n`.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocxError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let mut xml = String::new();
    match archive.by_name(DOCUMENT_PART) {
        Ok(mut part) => {
            part.read_to_string(&mut xml)?;
        }
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(DocxError::MissingPart(DOCUMENT_PART))
        }
        Err(e) => return Err(e.into()),
    }

    paragraphs_from_xml(&xml).map(|paragraphs| paragraphs.join("\n"))
}

fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    let text = current.trim();
                    if !text.is_empty() {
                        paragraphs.push(text.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_text => current.push_str(&e.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
