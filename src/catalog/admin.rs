//! Service-key calls used by the one-shot maintenance commands: writing
//! embeddings back to the table and moving assets into storage buckets.

use reqwest::Method;
use serde_json::json;

use super::remote::{expect_success, SupabaseClient};
use super::types::SlideId;
use crate::error::CatalogError;

/// PostgREST filter selecting one row by id.
fn row_filter(id: &SlideId) -> String {
    format!("/rest/v1/slides?id=eq.{}", urlencoding::encode(&id.to_string()))
}

fn object_path(bucket: &str, path: &str) -> String {
    format!("{}/{}", urlencoding::encode(bucket), urlencoding::encode(path))
}

impl SupabaseClient {
    /// Overwrite the `embedding` column of one slide.
    pub async fn update_embedding(&self, id: &SlideId, embedding: &[f32]) -> Result<(), CatalogError> {
        let resp = self
            .request(Method::PATCH, &row_filter(id))
            .header("Prefer", "return=minimal")
            .json(&json!({ "embedding": embedding }))
            .send()
            .await?;

        expect_success(resp).await
    }

    /// Point a slide row at its uploaded asset and thumbnail.
    pub async fn update_slide_urls(
        &self,
        id: &SlideId,
        file_url: &str,
        thumb_url: &str,
    ) -> Result<(), CatalogError> {
        let resp = self
            .request(Method::PATCH, &row_filter(id))
            .header("Prefer", "return=minimal")
            .json(&json!({ "file_url": file_url, "thumb_url": thumb_url }))
            .send()
            .await?;

        expect_success(resp).await
    }

    /// Upload (or replace) an object and return its public URL.
    pub async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, CatalogError> {
        tracing::info!(bucket, path, size = bytes.len(), "uploading object");
        let resp = self
            .request(Method::POST, &format!("/storage/v1/object/{}", object_path(bucket, path)))
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        expect_success(resp).await?;
        Ok(self.public_object_url(bucket, path))
    }

    pub fn public_object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}",
            self.base_url(),
            object_path(bucket, path)
        )
    }
}
