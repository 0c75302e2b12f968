//! Google Cloud Storage client over the JSON API.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use super::{ObjectStore, StorageError};
use crate::config::StorageConfig;
use crate::models::ObjectUri;

/// Object store talking to GCS (or an emulator at a custom endpoint).
pub struct GcsStore {
    client: reqwest::Client,
    endpoint: String,
    project_id: Option<String>,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectResource {
    size: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectList {
    #[serde(default)]
    items: Vec<ListedObject>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListedObject {
    name: String,
}

impl GcsStore {
    pub fn new(config: &StorageConfig, project_id: Option<String>, access_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id,
            access_token,
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn object_url(&self, uri: &ObjectUri) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.endpoint,
            uri.bucket,
            urlencoding::encode(&uri.name)
        )
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<reqwest::Response, StorageError> {
        let response = builder
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("{}: {}", what, e)))?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(StorageError::NotFound(what.to_string())),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(StorageError::Request(format!(
                    "{} returned HTTP {}: {}",
                    what, status, body
                )))
            }
        }
    }
}

#[async_trait]
impl ObjectStore for GcsStore {
    async fn size(&self, uri: &ObjectUri) -> Result<u64, StorageError> {
        let what = uri.to_string();
        let response = self
            .send(self.request(Method::GET, &self.object_url(uri)), &what)
            .await?;
        let resource: ObjectResource = response
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))?;
        resource
            .size
            .parse()
            .map_err(|_| StorageError::InvalidResponse(format!("bad size '{}'", resource.size)))
    }

    async fn download(&self, uri: &ObjectUri) -> Result<Vec<u8>, StorageError> {
        let what = uri.to_string();
        let builder = self
            .request(Method::GET, &self.object_url(uri))
            .query(&[("alt", "media")]);
        let response = self.send(builder, &what).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;
        debug!("Downloaded {} ({} bytes)", what, bytes.len());
        Ok(bytes.to_vec())
    }

    async fn upload(
        &self,
        uri: &ObjectUri,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let url = format!("{}/upload/storage/v1/b/{}/o", self.endpoint, uri.bucket);
        let builder = self
            .request(Method::POST, &url)
            .query(&[("uploadType", "media"), ("name", uri.name.as_str())])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(content);
        self.send(builder, &uri.to_string()).await?;
        Ok(())
    }

    async fn ensure_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        let url = format!("{}/storage/v1/b/{}", self.endpoint, bucket);
        match self.send(self.request(Method::GET, &url), bucket).await {
            Ok(_) => return Ok(()),
            Err(StorageError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let project = self.project_id.as_deref().ok_or_else(|| {
            StorageError::Request(format!(
                "bucket {} does not exist and no project is configured to create it",
                bucket
            ))
        })?;

        info!("Creating bucket {}", bucket);
        let response = self
            .request(Method::POST, &format!("{}/storage/v1/b", self.endpoint))
            .query(&[("project", project)])
            .json(&serde_json::json!({ "name": bucket }))
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        // 409 means someone else created it first.
        if response.status().is_success() || response.status() == StatusCode::CONFLICT {
            Ok(())
        } else {
            Err(StorageError::Request(format!(
                "creating bucket {} returned HTTP {}",
                bucket,
                response.status()
            )))
        }
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        let url = format!("{}/storage/v1/b/{}/o", self.endpoint, bucket);
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut builder = self
                .request(Method::GET, &url)
                .query(&[("prefix", prefix)]);
            if let Some(ref token) = page_token {
                builder = builder.query(&[("pageToken", token.as_str())]);
            }

            let page: ObjectList = self
                .send(builder, bucket)
                .await?
                .json()
                .await
                .map_err(|e| StorageError::InvalidResponse(e.to_string()))?;

            names.extend(page.items.into_iter().map(|o| o.name));
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(names)
    }
}
