//! Extraction engine contract
//!
//! The worker treats extraction as an injected capability with a single
//! method. `StubExtractor` is the shipped placeholder; real parsing/OCR
//! implementations slot in behind the same trait.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Sentinel form type used when the caller supplied no hint.
pub const UNKNOWN_FORM: &str = "UnknownForm";

/// Structured output of a successful extraction.
///
/// `data` is an open-ended payload whose schema is implementation-defined
/// per form type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub form_type: String,
    pub data: serde_json::Value,
}

impl ExtractionResult {
    /// Render the result artifact: camelCase keys, nulls omitted.
    pub fn to_json(&self) -> Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.retain(|_, v| !v.is_null());
        }
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

/// Capability interface for turning raw document bytes into structured data.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn process(
        &self,
        raw: &[u8],
        form_type: Option<&str>,
    ) -> Result<ExtractionResult>;
}

/// Placeholder extraction engine.
///
/// Does not inspect the bytes at all; echoes the form-type hint and stamps
/// the processing time. Swap in a real parser/OCR implementation behind
/// [`Extractor`] later.
pub struct StubExtractor;

#[async_trait]
impl Extractor for StubExtractor {
    async fn process(
        &self,
        _raw: &[u8],
        form_type: Option<&str>,
    ) -> Result<ExtractionResult> {
        let form_type = match form_type {
            Some(hint) if !hint.trim().is_empty() => hint.to_string(),
            _ => UNKNOWN_FORM.to_string(),
        };

        Ok(ExtractionResult {
            form_type,
            data: json!({
                "processedAt": Utc::now(),
                "note": "Stub extraction. Replace with real PDF parsing and OCR fallback.",
            }),
        })
    }
}
