//! REST client for `/management/projections`.

use crate::config::ManagementConfig;
use crate::error::{ManagementError, ManagementResult};
use async_trait::async_trait;
use projections_migrate::{BoxError, ProjectionManagement};
use reqwest::{Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Serialize)]
struct SchemaBody<'a> {
    schema: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveBody<'a> {
    projection_names: &'a [String],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionNames {
    #[serde(default)]
    projection_names: Vec<String>,
}

/// HTTP implementation of [`ProjectionManagement`].
pub struct HttpManagementClient {
    config: ManagementConfig,
    http: reqwest::Client,
    url: String,
}

impl HttpManagementClient {
    /// Creates a client. No request is made until the first call.
    pub fn new(config: ManagementConfig) -> ManagementResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ManagementError::Client)?;
        let url = config.projections_url();
        Ok(Self { config, http, url })
    }

    #[must_use]
    pub fn config(&self) -> &ManagementConfig {
        &self.config
    }

    /// Lists every registered projection name.
    ///
    /// Retried with exponential backoff when no answer was received.
    pub async fn fetch_names(&self) -> ManagementResult<Vec<String>> {
        let mut attempt = 0;
        loop {
            match self.list().await {
                Ok(names) => return Ok(names),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.retry_delay(attempt);
                    warn!(error = %err, attempt, ?delay, "listing projections failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub async fn create_projections(&self, schema: &str) -> ManagementResult<()> {
        let request = self.request(Method::POST).json(&SchemaBody { schema });
        self.execute(request).await.map(drop)
    }

    pub async fn update_projections(&self, schema: &str) -> ManagementResult<()> {
        let request = self.request(Method::PUT).json(&SchemaBody { schema });
        self.execute(request).await.map(drop)
    }

    pub async fn remove_projections(&self, names: &[String]) -> ManagementResult<()> {
        let request = self.request(Method::DELETE).json(&RemoveBody {
            projection_names: names,
        });
        self.execute(request).await.map(drop)
    }

    async fn list(&self) -> ManagementResult<Vec<String>> {
        let response = self.execute(self.request(Method::GET)).await?;
        let names: ProjectionNames = response.json().await.map_err(|source| {
            let url = self.url.clone();
            if source.is_decode() {
                ManagementError::Decode { url, source }
            } else {
                ManagementError::Transport { url, source }
            }
        })?;
        Ok(names.projection_names)
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let request = self.http.request(method, &self.url);
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a request, turning any non-2xx answer into [`ManagementError::Status`].
    async fn execute(&self, request: RequestBuilder) -> ManagementResult<Response> {
        let request = request.build().map_err(|source| ManagementError::Request {
            url: self.url.clone(),
            source,
        })?;
        let method = request.method().clone();
        debug!(%method, url = %self.url, "sending management request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|source| ManagementError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(ManagementError::Status {
            method,
            url: self.url.clone(),
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl ProjectionManagement for HttpManagementClient {
    async fn get_all(&self) -> Result<Vec<String>, BoxError> {
        Ok(self.fetch_names().await?)
    }

    async fn create(&self, schema: &str) -> Result<(), BoxError> {
        Ok(self.create_projections(schema).await?)
    }

    async fn update(&self, schema: &str) -> Result<(), BoxError> {
        Ok(self.update_projections(schema).await?)
    }

    async fn remove(&self, names: &[String]) -> Result<(), BoxError> {
        Ok(self.remove_projections(names).await?)
    }
}
