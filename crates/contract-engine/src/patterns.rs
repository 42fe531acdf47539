//! Wording that shifts risk onto the supplier in a supply contract

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::RiskLevel;

/// Penalties, unilateral rights and unlimited liability
pub const HIGH_RISK_PATTERNS: &[&str] = &[
    r"штраф",
    r"пеня",
    r"неустойка",
    r"односторонн",
    r"без согласования",
    r"немедленно",
    r"не возмещается",
    r"за счет.*поставщик",
    r"полная ответственность",
];

/// Vague deadlines, prepayment and discretionary wording
pub const MEDIUM_RISK_PATTERNS: &[&str] = &[
    r"разумный срок",
    r"своевременно",
    r"в кратчайшие",
    r"предоплата",
    r"без уведомления",
    r"по своему усмотрению",
];

lazy_static! {
    static ref HIGH_RISK: Vec<Regex> = compile(HIGH_RISK_PATTERNS);
    static ref MEDIUM_RISK: Vec<Regex> = compile(MEDIUM_RISK_PATTERNS);
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
}

/// Classify a single contract line.
///
/// High-risk wording wins over medium-risk wording. Returns the level together
/// with the pattern that matched, or `None` when the line looks harmless.
pub fn classify_line(line: &str) -> Option<(RiskLevel, &'static str)> {
    let lower = line.to_lowercase();

    let levels: [(RiskLevel, &[Regex], &[&'static str]); 2] = [
        (RiskLevel::High, &HIGH_RISK, HIGH_RISK_PATTERNS),
        (RiskLevel::Medium, &MEDIUM_RISK, MEDIUM_RISK_PATTERNS),
    ];

    for (level, regexes, sources) in levels {
        if let Some(idx) = regexes.iter().position(|re| re.is_match(&lower)) {
            return Some((level, sources[idx]));
        }
    }

    None
}
