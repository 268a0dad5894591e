use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Processing state of a document.
///
/// Persisted and serialized by name (stable PascalCase text), never by
/// ordinal. Transitions only move forward along
/// `Uploaded -> Processing -> {Succeeded, Failed}`.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema,
)]
#[sqlx(type_name = "text", rename_all = "PascalCase")]
pub enum DocumentStatus {
    Uploaded,
    Processing,
    Succeeded,
    Failed,
}

impl DocumentStatus {
    /// Terminal states admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Succeeded | DocumentStatus::Failed)
    }

    /// Forward-only transition table.
    pub fn can_transition_to(&self, next: DocumentStatus) -> bool {
        matches!(
            (self, next),
            (DocumentStatus::Uploaded, DocumentStatus::Processing)
                | (DocumentStatus::Processing, DocumentStatus::Succeeded)
                | (DocumentStatus::Processing, DocumentStatus::Failed)
        )
    }
}

impl Display for DocumentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DocumentStatus::Uploaded => write!(f, "Uploaded"),
            DocumentStatus::Processing => write!(f, "Processing"),
            DocumentStatus::Succeeded => write!(f, "Succeeded"),
            DocumentStatus::Failed => write!(f, "Failed"),
        }
    }
}

impl FromStr for DocumentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Uploaded" => Ok(DocumentStatus::Uploaded),
            "Processing" => Ok(DocumentStatus::Processing),
            "Succeeded" => Ok(DocumentStatus::Succeeded),
            "Failed" => Ok(DocumentStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid document status: {}", s)),
        }
    }
}

/// One row per uploaded file. The repository is the single source of truth
/// for `status`; only the worker mutates fields past creation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: Uuid,
    pub original_file_name: String,
    pub content_type: String,
    pub file_size: i64,
    pub storage_path: String,
    pub result_path: Option<String>,
    pub form_type: Option<String>,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl Document {
    /// Build a freshly uploaded document row.
    pub fn new_uploaded(
        id: Uuid,
        original_file_name: String,
        content_type: String,
        file_size: i64,
        storage_path: String,
        form_type: Option<String>,
    ) -> Self {
        Document {
            id,
            original_file_name,
            content_type,
            file_size,
            storage_path,
            result_path: None,
            form_type,
            status: DocumentStatus::Uploaded,
            created_at: Utc::now(),
            processed_at: None,
            error_message: None,
        }
    }
}

/// Upload acknowledgment returned by `POST /documents`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadAccepted {
    pub id: Uuid,
    pub status: DocumentStatus,
}

/// Status view returned by `GET /documents/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStatusResponse {
    pub id: Uuid,
    pub status: DocumentStatus,
    pub form_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl From<Document> for DocumentStatusResponse {
    fn from(doc: Document) -> Self {
        DocumentStatusResponse {
            id: doc.id,
            status: doc.status,
            form_type: doc.form_type,
            created_at: doc.created_at,
            processed_at: doc.processed_at,
            error_message: doc.error_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_encoding_is_stable() {
        for (status, text) in [
            (DocumentStatus::Uploaded, "Uploaded"),
            (DocumentStatus::Processing, "Processing"),
            (DocumentStatus::Succeeded, "Succeeded"),
            (DocumentStatus::Failed, "Failed"),
        ] {
            assert_eq!(status.to_string(), text);
            assert_eq!(text.parse::<DocumentStatus>().unwrap(), status);
            assert_eq!(
                serde_json::to_string(&status).unwrap(),
                format!("\"{}\"", text)
            );
        }
    }

    #[test]
    fn unknown_status_text_is_rejected() {
        assert!("uploaded".parse::<DocumentStatus>().is_err());
        assert!("Done".parse::<DocumentStatus>().is_err());
    }

    #[test]
    fn transitions_only_move_forward() {
        use DocumentStatus::*;
        assert!(Uploaded.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Succeeded));
        assert!(Processing.can_transition_to(Failed));

        assert!(!Uploaded.can_transition_to(Succeeded));
        assert!(!Processing.can_transition_to(Uploaded));
        assert!(!Succeeded.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Processing));
        assert!(Succeeded.is_terminal());
        assert!(Failed.is_terminal());
        assert!(!Processing.is_terminal());
    }

    #[test]
    fn status_response_serializes_camel_case() {
        let doc = Document::new_uploaded(
            Uuid::new_v4(),
            "invoice.pdf".to_string(),
            "application/pdf".to_string(),
            123,
            "raw/abc.pdf".to_string(),
            Some("invoice".to_string()),
        );
        let json = serde_json::to_value(DocumentStatusResponse::from(doc)).unwrap();
        assert_eq!(json["status"], "Uploaded");
        assert_eq!(json["formType"], "invoice");
        assert!(json.get("createdAt").is_some());
        assert!(json["processedAt"].is_null());
        assert!(json["errorMessage"].is_null());
    }
}
