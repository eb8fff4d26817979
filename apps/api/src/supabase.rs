use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

const REST_PATH: &str = "rest/v1";
const STORAGE_PATH: &str = "storage/v1/object";

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Thin client over the hosted Postgres REST and object-storage APIs.
///
/// Every call authenticates with the service key via both the `apikey`
/// header and a bearer token. No retries, no timeouts: a call is one
/// request, and failures surface to the caller.
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Inserts a single row. The row is sent as a one-element array, which
    /// the REST API accepts for both single and bulk inserts, and no
    /// representation is asked back.
    pub async fn insert_row(&self, table: &str, row: &Value) -> Result<(), SupabaseError> {
        let url = format!("{}/{}/{}", self.base_url, REST_PATH, table);
        debug!("inserting row into {table}");
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(&json!([row]))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Selects one column from every row matching `filter_column = filter_value`.
    /// Returns the raw row objects, e.g. `[{"score": 6.0}, {"score": 8.0}]`.
    pub async fn select_column(
        &self,
        table: &str,
        column: &str,
        filter_column: &str,
        filter_value: &str,
    ) -> Result<Vec<Value>, SupabaseError> {
        let url = format!("{}/{}/{}", self.base_url, REST_PATH, table);
        let response = self
            .http
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[
                ("select", column.to_string()),
                (filter_column, format!("eq.{filter_value}")),
            ])
            .send()
            .await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    /// Uploads a file into a storage bucket and returns its public URL.
    /// The URL is constructed client-side; whether it actually serves
    /// depends on the bucket being public.
    pub async fn upload_file(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, SupabaseError> {
        let url = format!("{}/{}/{}/{}", self.base_url, STORAGE_PATH, bucket, path);
        debug!("uploading {} bytes to {bucket}/{path}", bytes.len());
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        check(response).await?;
        Ok(self.public_url(bucket, path))
    }

    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{}/public/{}/{}", self.base_url, STORAGE_PATH, bucket, path)
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, SupabaseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(SupabaseError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_shape() {
        let client = SupabaseClient::new(
            "https://project.supabase.co".to_string(),
            "service-key".to_string(),
        );
        assert_eq!(
            client.public_url("avatars", "avatars/u1/photo.png"),
            "https://project.supabase.co/storage/v1/object/public/avatars/avatars/u1/photo.png"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = SupabaseClient::new(
            "https://project.supabase.co/".to_string(),
            "service-key".to_string(),
        );
        assert_eq!(
            client.public_url("avatars", "a/b.png"),
            "https://project.supabase.co/storage/v1/object/public/avatars/a/b.png"
        );
    }
}
