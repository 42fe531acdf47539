use chrono::NaiveDateTime;

/// JSON body returned by `POST /upload`.
///
/// A missing `success` field reads as `false`, so plain error bodies such as
/// `{"error": "..."}` are treated as application-level failures.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risks_found: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl UploadResponse {
    pub fn completed(
        analysis: String,
        protocol: String,
        download_url: String,
        risks_found: usize,
    ) -> Self {
        Self {
            success: true,
            analysis: Some(analysis),
            protocol: Some(protocol),
            download_url: Some(download_url),
            risks_found: Some(risks_found),
            ..Self::default()
        }
    }

    pub fn failed(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            code: Some(code.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::High => "высокий",
            RiskLevel::Medium => "средний",
            RiskLevel::Low => "низкий",
        }
    }
}

/// A contract line flagged for review
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClauseCandidate {
    pub line: usize, // 1-based among non-empty lines
    pub text: String,
    pub risk: RiskLevel,
}

/// Advisor answer split into the proposed wording and the commentary
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClauseAdvice {
    pub revision: String,
    pub comments: String,
}

impl ClauseAdvice {
    /// True when the advisor left the buyer's wording as is.
    pub fn accepts_buyer_wording(&self) -> bool {
        let revision = self.revision.to_lowercase();
        revision.contains("приемлема") || revision.contains("принимается")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnalyzedClause {
    pub number: usize,
    pub line: usize,
    pub original: String,
    pub advice: ClauseAdvice,
    pub risk: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProtocolReport {
    pub generated_at: NaiveDateTime,
    pub clauses: Vec<AnalyzedClause>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_body_without_success_reads_as_failure() {
        let body: UploadResponse = serde_json::from_str(r#"{"error": "bad file"}"#).unwrap();
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("bad file"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let body: UploadResponse =
            serde_json::from_str(r#"{"success": true, "analysis": "A", "extra": 1}"#).unwrap();
        assert!(body.success);
        assert_eq!(body.analysis.as_deref(), Some("A"));
    }

    #[test]
    fn test_completed_serializes_without_error_fields() {
        let body = UploadResponse::completed("A".into(), "P".into(), "/d/1".into(), 2);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "analysis": "A",
                "protocol": "P",
                "download_url": "/d/1",
                "risks_found": 2
            })
        );
    }

    #[test]
    fn test_accepts_buyer_wording() {
        let accepted = ClauseAdvice {
            revision: "Редакция Покупателя ПРИЕМЛЕМА".into(),
            comments: String::new(),
        };
        let rewritten = ClauseAdvice {
            revision: "Неустойка составляет 0,1% в день".into(),
            comments: String::new(),
        };
        assert!(accepted.accepts_buyer_wording());
        assert!(!rewritten.accepts_buyer_wording());
    }
}
