use log::debug;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::Instrument;

use super::CompanyIntelApi;
use crate::error::ApiError;
use crate::types::request::bool_str;
use crate::types::{
    CreateJobRequest, Job, JobListQuery, JobListResponse, Record, RecordUpdate, RerunRequest,
};

/// Path prefix of every job API endpoint.
pub const API_PATH: &str = "/api/companyintel-letter-builder";

/// HTTP client for the job API.
///
/// No request timeout is configured: the crawl timeouts in a job form are
/// instructions for the backend, not for this client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the given base URL, e.g. `http://localhost:8000`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder().build().map_err(ApiError::ClientBuild)?;
        Self::with_client(client, base_url)
    }

    /// Creates a client around an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{}{}", self.base_url, API_PATH, path);
        Url::parse(&raw).map_err(|e| ApiError::InvalidBaseUrl {
            url: raw,
            reason: e.to_string(),
        })
    }

    async fn request<T, B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url_text = url.to_string();
        debug!("{} {}", method, url_text);

        let mut builder = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-store");
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| ApiError::Transport {
            url: url_text.clone(),
            source: e,
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::Transport {
            url: url_text.clone(),
            source: e,
        })?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            url: url_text,
            source: e,
        })
    }
}

#[async_trait::async_trait]
impl CompanyIntelApi for ApiClient {
    async fn list_jobs(&self, query: &JobListQuery) -> Result<JobListResponse, ApiError> {
        let mut url = self.endpoint("")?;
        let pairs = query.to_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        self.request::<_, ()>(Method::GET, url, None)
            .instrument(tracing::info_span!("api.list_jobs"))
            .await
    }

    async fn create_job(&self, request: &CreateJobRequest) -> Result<Job, ApiError> {
        let url = self.endpoint("")?;
        self.request(Method::POST, url, Some(request))
            .instrument(tracing::info_span!("api.create_job", name = %request.name))
            .await
    }

    async fn get_job(&self, job_id: &str, include_records: bool) -> Result<Job, ApiError> {
        let url = self.endpoint(&format!(
            "/{}?include_records={}",
            job_id,
            bool_str(include_records)
        ))?;
        self.request::<_, ()>(Method::GET, url, None)
            .instrument(tracing::info_span!("api.get_job", job_id))
            .await
    }

    async fn rerun_failed(&self, job_id: &str) -> Result<Job, ApiError> {
        let url = self.endpoint(&format!("/{}", job_id))?;
        self.request(Method::PATCH, url, Some(&RerunRequest::failed_only()))
            .instrument(tracing::info_span!("api.rerun_failed", job_id))
            .await
    }

    async fn update_record(
        &self,
        job_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<Record, ApiError> {
        let url = self.endpoint(&format!("/{}/records/{}", job_id, record_id))?;
        self.request(Method::PATCH, url, Some(update))
            .instrument(tracing::info_span!("api.update_record", job_id, record_id))
            .await
    }
}
