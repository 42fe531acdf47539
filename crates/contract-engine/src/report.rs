//! Plain-text protocol shown in the browser next to the Word download

use std::fmt::Write;

use shared_types::ProtocolReport;

const HEAVY_RULE: &str = "================================================================================";
const LIGHT_RULE: &str = "────────────────────────────────────────────────────────────────────────────────";

/// Civil Code articles the proposed wording relies on
pub const LEGAL_BASIS: &[&str] = &[
    "ГК РФ статьи 330-333 (неустойка)",
    "ГК РФ статьи 421-422 (свобода договора)",
    "ГК РФ статьи 450-453 (изменение договора)",
];

/// Market-standard figures quoted to the buyer
pub const STANDARD_PARAMETERS: &[&str] = &[
    "Неустойка: 0,05-0,1% в день, макс 5-10%",
    "Сроки уведомлений: 3-5 рабочих дней",
    "Сроки устранения: 5-10 рабочих дней",
    "Лимит ответственности: 30% от договора",
];

pub fn render_text_report(report: &ProtocolReport) -> String {
    let mut out = String::new();

    // writeln! into a String cannot fail
    let _ = writeln!(out, "{HEAVY_RULE}");
    let _ = writeln!(out, "ПРОТОКОЛ РАЗНОГЛАСИЙ К ДОГОВОРУ ПОСТАВКИ");
    let _ = writeln!(out, "{HEAVY_RULE}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Дата: {}",
        report.generated_at.format("%d.%m.%Y %H:%M")
    );
    let _ = writeln!(out, "Проанализировано пунктов: {}", report.clauses.len());

    for clause in &report.clauses {
        let _ = writeln!(out);
        let _ = writeln!(out, "{LIGHT_RULE}");
        let _ = writeln!(out, "ПУНКТ {} (строка {})", clause.number, clause.line);
        let _ = writeln!(out, "{LIGHT_RULE}");
        let _ = writeln!(out);
        let _ = writeln!(out, "РЕДАКЦИЯ ПОКУПАТЕЛЯ:\n{}\n", clause.original);
        let _ = writeln!(out, "РЕДАКЦИЯ ПОСТАВЩИКА:\n{}\n", clause.advice.revision);
        let _ = writeln!(out, "КОММЕНТАРИИ:\n{}", clause.advice.comments);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{HEAVY_RULE}");
    let _ = writeln!(out, "ПРАВОВОЕ ОБОСНОВАНИЕ");
    let _ = writeln!(out, "{HEAVY_RULE}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Предложенные изменения соответствуют:");
    for article in LEGAL_BASIS {
        let _ = writeln!(out, "• {article}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "СТАНДАРТНЫЕ ПАРАМЕТРЫ:");
    for parameter in STANDARD_PARAMETERS {
        let _ = writeln!(out, "• {parameter}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Анализ выполнен GigaChat (Сбербанк)");
    let _ = writeln!(out, "{HEAVY_RULE}");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared_types::{AnalyzedClause, ClauseAdvice, RiskLevel};

    fn sample_report() -> ProtocolReport {
        ProtocolReport {
            generated_at: NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(14, 7, 0)
                .unwrap(),
            clauses: vec![AnalyzedClause {
                number: 1,
                line: 4,
                original: "Поставщик уплачивает штраф 50%.".into(),
                advice: ClauseAdvice {
                    revision: "Неустойка 0,1% в день, не более 10%.".into(),
                    comments: "Штраф несоразмерен.".into(),
                },
                risk: RiskLevel::High,
            }],
        }
    }

    #[test]
    fn test_report_header() {
        let text = render_text_report(&sample_report());
        assert!(text.starts_with(HEAVY_RULE));
        assert!(text.contains("Дата: 05.03.2024 14:07"));
        assert!(text.contains("Проанализировано пунктов: 1"));
    }

    #[test]
    fn test_report_clause_sections_in_order() {
        let text = render_text_report(&sample_report());
        let heading = text.find("ПУНКТ 1 (строка 4)").unwrap();
        let original = text.find("Поставщик уплачивает штраф 50%.").unwrap();
        let revision = text.find("Неустойка 0,1% в день").unwrap();
        let comments = text.find("Штраф несоразмерен.").unwrap();
        assert!(heading < original && original < revision && revision < comments);
    }

    #[test]
    fn test_report_trailer() {
        let text = render_text_report(&sample_report());
        for article in LEGAL_BASIS {
            assert!(text.contains(article));
        }
        assert!(text.trim_end().ends_with(HEAVY_RULE));
    }
}
