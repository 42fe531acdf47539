//! Contract analysis pipeline: scan, advise, assemble

use contract_engine::{build_clause_prompt, parse_advice, scan_clauses, MAX_ANALYZED_CLAUSES};
use shared_types::AnalyzedClause;
use tracing::{info, warn};

use crate::advisor::ClauseAdvisor;

/// Ask the advisor about each risky clause, in document order.
///
/// Clauses the advisor fails on are skipped. Stops once
/// [`MAX_ANALYZED_CLAUSES`] clauses have an answer.
pub async fn analyze_contract(text: &str, advisor: &dyn ClauseAdvisor) -> Vec<AnalyzedClause> {
    let mut analyzed = Vec::new();

    for candidate in scan_clauses(text) {
        let number = analyzed.len() + 1;
        info!(
            "Analyzing clause {} (line {}, risk: {})",
            number,
            candidate.line,
            candidate.risk.label()
        );

        let prompt = build_clause_prompt(number, &candidate.text);
        match advisor.advise(&prompt).await {
            Ok(answer) => analyzed.push(AnalyzedClause {
                number,
                line: candidate.line,
                original: candidate.text,
                advice: parse_advice(&answer),
                risk: candidate.risk,
            }),
            Err(e) => warn!("Skipping clause at line {}: {}", candidate.line, e),
        }

        if analyzed.len() >= MAX_ANALYZED_CLAUSES {
            break;
        }
    }

    analyzed
}
