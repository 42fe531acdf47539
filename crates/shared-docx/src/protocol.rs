//! Word rendering of the protocol of disagreements
//!
//! Emits a minimal WordprocessingML package: content types, the package
//! relationship and a single `word/document.xml` part. Formatting is inline
//! (no styles part), which every Word-compatible reader accepts.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use shared_types::{AnalyzedClause, ProtocolReport};
use zip::write::SimpleFileOptions;

use crate::error::DocxError;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const HEADER_FILL: &str = "4472C4";
const WHITE: &str = "FFFFFF";
const GREEN: &str = "008000";
const GREY: &str = "808080";

/// Table column widths in twips (2.2", 2.5", 2.5")
const COLUMN_WIDTHS: [u32; 3] = [3168, 3600, 3600];

const COLUMN_HEADERS: [&str; 3] = ["РЕДАКЦИЯ ПОКУПАТЕЛЯ", "РЕДАКЦИЯ ПОСТАВЩИКА", "КОММЕНТАРИИ"];

const CIVIL_CODE_ARTICLES: &[&str] = &[
    "• Статья 330-333 ГК РФ - о неустойке и её соразмерности",
    "• Статья 421 ГК РФ - о свободе договора",
    "• Статья 422 ГК РФ - о соответствии договора закону",
    "• Статья 450-453 ГК РФ - об изменении и расторжении договора",
];

const STANDARD_TERMS: &[&str] = &[
    "Неустойка за просрочку: 0,05-0,1% в день, но не более 5-10% от суммы обязательства",
    "Сроки уведомлений: 3-5 рабочих дней",
    "Сроки устранения недостатков: 5-10 рабочих дней",
    "Общее ограничение ответственности: не более 30% от суммы договора",
    "Основание: практика арбитражных судов РФ и статья 333 ГК РФ о снижении неустойки",
];

#[derive(Debug, Clone, Copy, Default)]
struct RunStyle {
    bold: bool,
    italic: bool,
    /// Font size in points
    size: Option<u32>,
    color: Option<&'static str>,
}

impl RunStyle {
    fn sized(size: u32) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn color(mut self, color: &'static str) -> Self {
        self.color = Some(color);
        self
    }

    fn to_xml(self) -> String {
        let mut props = String::new();
        if self.bold {
            props.push_str("<w:b/>");
        }
        if self.italic {
            props.push_str("<w:i/>");
        }
        if let Some(color) = self.color {
            props.push_str(&format!(r#"<w:color w:val="{color}"/>"#));
        }
        if let Some(size) = self.size {
            // half-points
            props.push_str(&format!(r#"<w:sz w:val="{}"/>"#, size * 2));
        }
        if props.is_empty() {
            String::new()
        } else {
            format!("<w:rPr>{props}</w:rPr>")
        }
    }
}

fn run(text: &str, style: RunStyle) -> String {
    let mut content = String::new();
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            content.push_str("<w:br/>");
        }
        content.push_str(&format!(
            r#"<w:t xml:space="preserve">{}</w:t>"#,
            escape(line)
        ));
    }
    format!("<w:r>{}{content}</w:r>", style.to_xml())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Align {
    Left,
    Center,
}

fn paragraph(runs: &[String], align: Align, spacing: bool) -> String {
    let mut props = String::new();
    if spacing {
        // 4pt before and after, in twentieths of a point
        props.push_str(r#"<w:spacing w:before="80" w:after="80"/>"#);
    }
    if align == Align::Center {
        props.push_str(r#"<w:jc w:val="center"/>"#);
    }
    let props = if props.is_empty() {
        String::new()
    } else {
        format!("<w:pPr>{props}</w:pPr>")
    };
    format!("<w:p>{props}{}</w:p>", runs.concat())
}

fn empty_paragraph() -> String {
    "<w:p/>".to_string()
}

fn cell(width: u32, shading: Option<&str>, borders: bool, content: String) -> String {
    let mut props = format!(r#"<w:tcW w:w="{width}" w:type="dxa"/>"#);
    if borders {
        props.push_str("<w:tcBorders>");
        for edge in ["top", "left", "bottom", "right"] {
            props.push_str(&format!(
                r#"<w:{edge} w:val="single" w:sz="12" w:space="0" w:color="000000"/>"#
            ));
        }
        props.push_str("</w:tcBorders>");
    }
    if let Some(fill) = shading {
        props.push_str(&format!(
            r#"<w:shd w:val="clear" w:color="auto" w:fill="{fill}"/>"#
        ));
    }
    format!("<w:tc><w:tcPr>{props}</w:tcPr>{content}</w:tc>")
}

fn table(widths: &[u32], rows: &[String]) -> String {
    let grid: String = widths
        .iter()
        .map(|w| format!(r#"<w:gridCol w:w="{w}"/>"#))
        .collect();
    format!(
        r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/><w:tblLayout w:type="fixed"/></w:tblPr><w:tblGrid>{grid}</w:tblGrid>{}</w:tbl>"#,
        rows.concat()
    )
}

/// Renders a [`ProtocolReport`] as a `.docx` package
pub struct ProtocolWriter;

impl ProtocolWriter {
    pub fn write(report: &ProtocolReport) -> Result<Vec<u8>, DocxError> {
        let document = Self::document_xml(report);

        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES.as_bytes())?;
        zip.start_file("_rels/.rels", options)?;
        zip.write_all(PACKAGE_RELS.as_bytes())?;
        zip.start_file("word/document.xml", options)?;
        zip.write_all(document.as_bytes())?;

        Ok(zip.finish()?.into_inner())
    }

    fn document_xml(report: &ProtocolReport) -> String {
        let date = report.generated_at.format("%d.%m.%Y").to_string();
        let mut body = Vec::new();

        body.push(paragraph(
            &[run("ПРОТОКОЛ РАЗНОГЛАСИЙ", RunStyle::sized(16).bold())],
            Align::Center,
            false,
        ));
        body.push(paragraph(
            &[run("к Договору поставки", RunStyle::sized(12))],
            Align::Center,
            false,
        ));
        body.push(paragraph(
            &[run(&format!("Дата составления: {date}"), RunStyle::sized(11))],
            Align::Center,
            false,
        ));
        body.push(empty_paragraph());
        body.push(paragraph(
            &[run(
                "Поставщик предлагает следующие изменения в условия Договора \
                 в целях соблюдения баланса интересов сторон и норм действующего законодательства РФ:",
                RunStyle::sized(11),
            )],
            Align::Left,
            false,
        ));
        body.push(empty_paragraph());

        let mut rows = vec![Self::header_row()];
        rows.extend(report.clauses.iter().map(Self::clause_row));
        body.push(table(&COLUMN_WIDTHS, &rows));

        body.push(empty_paragraph());
        body.push(Self::heading("Правовое обоснование"));
        body.push(paragraph(
            &[run(
                "Предложенные изменения соответствуют нормам Гражданского кодекса РФ:",
                RunStyle::sized(10),
            )],
            Align::Left,
            false,
        ));
        for article in CIVIL_CODE_ARTICLES {
            body.push(paragraph(&[run(article, RunStyle::sized(10))], Align::Left, false));
        }

        body.push(empty_paragraph());
        body.push(Self::heading("Стандартные параметры по законодательству РФ"));
        body.push(paragraph(
            &[run(&STANDARD_TERMS.join("\n"), RunStyle::sized(10))],
            Align::Left,
            false,
        ));

        body.push(empty_paragraph());
        body.push(empty_paragraph());
        body.push(Self::signature_table());
        body.push(empty_paragraph());

        body.push(paragraph(
            &[run(
                &format!(
                    "Протокол разногласий составлен {date} с использованием GigaChat (Сбербанк)"
                ),
                RunStyle::sized(9).italic().color(GREY),
            )],
            Align::Center,
            false,
        ));

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1152" w:right="864" w:bottom="1152" w:left="864" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
            body.concat()
        )
    }

    fn heading(text: &str) -> String {
        paragraph(&[run(text, RunStyle::sized(13).bold())], Align::Left, false)
    }

    fn header_row() -> String {
        let cells: String = COLUMN_HEADERS
            .iter()
            .zip(COLUMN_WIDTHS)
            .map(|(title, width)| {
                cell(
                    width,
                    Some(HEADER_FILL),
                    true,
                    paragraph(
                        &[run(title, RunStyle::sized(11).bold().color(WHITE))],
                        Align::Center,
                        false,
                    ),
                )
            })
            .collect();
        format!("<w:tr>{cells}</w:tr>")
    }

    fn clause_row(clause: &AnalyzedClause) -> String {
        let buyer = paragraph(
            &[
                run(&format!("Пункт {}\n", clause.number), RunStyle::sized(10).bold()),
                run(&clause.original, RunStyle::sized(10)),
            ],
            Align::Left,
            true,
        );

        let revision_style = if clause.advice.accepts_buyer_wording() {
            RunStyle::sized(10).bold().color(GREEN)
        } else {
            RunStyle::sized(10)
        };
        let supplier = paragraph(
            &[run(&clause.advice.revision, revision_style)],
            Align::Left,
            true,
        );

        let comments = paragraph(
            &[run(&clause.advice.comments, RunStyle::sized(9).italic())],
            Align::Left,
            true,
        );

        format!(
            "<w:tr>{}{}{}</w:tr>",
            cell(COLUMN_WIDTHS[0], None, true, buyer),
            cell(COLUMN_WIDTHS[1], None, true, supplier),
            cell(COLUMN_WIDTHS[2], None, true, comments),
        )
    }

    fn signature_table() -> String {
        let line = "_".repeat(30);
        let rows: Vec<String> = [
            ("ПОСТАВЩИК", "ПОКУПАТЕЛЬ", RunStyle::sized(11).bold()),
            (line.as_str(), line.as_str(), RunStyle::default()),
            ("(подпись, печать)", "(подпись, печать)", RunStyle::sized(9).italic()),
        ]
        .iter()
        .map(|(left, right, style)| {
            format!(
                "<w:tr>{}{}</w:tr>",
                cell(4500, None, false, paragraph(&[run(left, *style)], Align::Left, false)),
                cell(4500, None, false, paragraph(&[run(right, *style)], Align::Left, false)),
            )
        })
        .collect();
        table(&[4500, 4500], &rows)
    }
}
