//! Supplier-side review of supply contracts
//!
//! Scans contract text for clauses that shift risk onto the supplier, builds
//! advisor prompts for them, parses the advisor's answers and renders the
//! resulting protocol of disagreements as text.

pub mod advice;
pub mod patterns;
pub mod report;
pub mod scanner;

pub use advice::{build_clause_prompt, parse_advice};
pub use report::render_text_report;
pub use scanner::scan_clauses;

/// Documents with less extracted text than this are rejected before scanning
pub const MIN_DOCUMENT_CHARS: usize = 50;

/// At most this many clauses end up in one protocol
pub const MAX_ANALYZED_CLAUSES: usize = 10;

/// True when the extracted text is long enough to be worth scanning.
pub fn is_substantial(text: &str) -> bool {
    text.chars().count() >= MIN_DOCUMENT_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_document_is_not_substantial() {
        assert!(!is_substantial("Договор поставки"));
        assert!(is_substantial(&"д".repeat(MIN_DOCUMENT_CHARS)));
    }

    #[test]
    fn test_scan_feeds_prompt() {
        let text = "Поставщик несет полную ответственность, а штраф составляет 50% от цены договора.";
        let candidates = scan_clauses(text);
        assert_eq!(candidates.len(), 1);

        let prompt = build_clause_prompt(1, &candidates[0].text);
        assert!(prompt.contains(text));
    }
}
