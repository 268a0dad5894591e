use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::traits::DocumentStore;
use docpipe_core::models::Document;

/// Postgres-backed document repository. Cloneable handle over a shared pool.
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    #[tracing::instrument(skip(self, doc), fields(document_id = %doc.id))]
    async fn create(&self, doc: &Document) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (
                id, original_file_name, content_type, file_size, storage_path,
                result_path, form_type, status, created_at, processed_at, error_message
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(doc.id)
        .bind(&doc.original_file_name)
        .bind(&doc.content_type)
        .bind(doc.file_size)
        .bind(&doc.storage_path)
        .bind(&doc.result_path)
        .bind(&doc.form_type)
        .bind(doc.status)
        .bind(doc.created_at)
        .bind(doc.processed_at)
        .bind(&doc.error_message)
        .execute(&self.pool)
        .await
        .context("Failed to insert document")?;

        tracing::info!(
            document_id = %doc.id,
            file_name = %doc.original_file_name,
            size_bytes = doc.file_size,
            "Document created"
        );

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Document>> {
        let doc: Option<Document> = sqlx::query_as::<Postgres, Document>(
            r#"
            SELECT
                id,
                original_file_name,
                content_type,
                file_size,
                storage_path,
                result_path,
                form_type,
                status,
                created_at,
                processed_at,
                error_message
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch document")?;

        Ok(doc)
    }

    /// Whole-row write of every mutable field. Immutable creation-time fields
    /// (id, file name, content type, size, storage path, created_at) are not
    /// touched.
    #[tracing::instrument(skip(self, doc), fields(document_id = %doc.id, status = %doc.status))]
    async fn update(&self, doc: &Document) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET status = $2,
                result_path = $3,
                form_type = $4,
                processed_at = $5,
                error_message = $6
            WHERE id = $1
            "#,
        )
        .bind(doc.id)
        .bind(doc.status)
        .bind(&doc.result_path)
        .bind(&doc.form_type)
        .bind(doc.processed_at)
        .bind(&doc.error_message)
        .execute(&self.pool)
        .await
        .context("Failed to update document")?;

        if result.rows_affected() == 0 {
            return Err(anyhow::anyhow!("Document {} does not exist", doc.id));
        }

        Ok(())
    }
}
