pub mod error;
pub mod sse;

pub use error::{ApiError, classify_failure};

use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::{
    Change, ChangeDetail, Idea, IdeaUpdate, NewIdea, ServerConfig, Source, SourceConfig, Spec,
    SpecDetail,
};

#[derive(serde::Deserialize)]
struct SourcesEnvelope {
    sources: Vec<Source>,
}

#[derive(serde::Deserialize)]
struct ChangesEnvelope {
    changes: Vec<Change>,
}

#[derive(serde::Deserialize)]
struct SpecsEnvelope {
    specs: Vec<Spec>,
}

#[derive(serde::Deserialize)]
struct IdeasEnvelope {
    ideas: Vec<Idea>,
}

#[derive(Serialize)]
struct SourcesUpdate<'a> {
    sources: &'a [SourceConfig],
}

/// Typed client for the dashboard REST API. Calls return the server's
/// payload or an [`ApiError`]; nothing is cached here.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:3000/api`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("openspec-board/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(ApiClient { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Build an endpoint URL. Each segment is percent-encoded on its own, so
    /// ids like `proj-a/add-auth` travel as `proj-a%2Fadd-auth`.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        url
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.execute_raw(request).await?;
        serde_json::from_str(&body).map_err(ApiError::Decode)
    }

    async fn execute_raw(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "request failed");
            return Err(classify_failure(status.as_u16(), &body));
        }
        Ok(body)
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        tracing::trace!(method = method.as_str(), url = url.as_str(), "api request");
        self.http.request(method, url)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn list_sources(&self) -> Result<Vec<Source>, ApiError> {
        let envelope: SourcesEnvelope = self.execute(self.request(Method::GET, &["sources"])).await?;
        Ok(envelope.sources)
    }

    pub async fn list_changes(&self) -> Result<Vec<Change>, ApiError> {
        let envelope: ChangesEnvelope = self.execute(self.request(Method::GET, &["changes"])).await?;
        Ok(envelope.changes)
    }

    pub async fn change(&self, id: &str) -> Result<ChangeDetail, ApiError> {
        self.execute(self.request(Method::GET, &["changes", id])).await
    }

    pub async fn list_specs(&self) -> Result<Vec<Spec>, ApiError> {
        let envelope: SpecsEnvelope = self.execute(self.request(Method::GET, &["specs"])).await?;
        Ok(envelope.specs)
    }

    pub async fn spec(&self, id: &str) -> Result<SpecDetail, ApiError> {
        self.execute(self.request(Method::GET, &["specs", id])).await
    }

    pub async fn list_ideas(&self) -> Result<Vec<Idea>, ApiError> {
        let envelope: IdeasEnvelope = self.execute(self.request(Method::GET, &["ideas"])).await?;
        Ok(envelope.ideas)
    }

    pub async fn config(&self) -> Result<ServerConfig, ApiError> {
        self.execute(self.request(Method::GET, &["config"])).await
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub async fn create_idea(&self, idea: &NewIdea) -> Result<Idea, ApiError> {
        self.execute(self.request(Method::POST, &["ideas"]).json(idea)).await
    }

    pub async fn update_idea(&self, id: &str, update: &IdeaUpdate) -> Result<Idea, ApiError> {
        self.execute(self.request(Method::PUT, &["ideas", id]).json(update)).await
    }

    /// Delete an idea. The response body (if any) is ignored.
    pub async fn delete_idea(&self, id: &str) -> Result<(), ApiError> {
        self.execute_raw(self.request(Method::DELETE, &["ideas", id]))
            .await
            .map(|_| ())
    }

    pub async fn update_sources(&self, sources: &[SourceConfig]) -> Result<ServerConfig, ApiError> {
        self.execute(
            self.request(Method::PUT, &["config", "sources"])
                .json(&SourcesUpdate { sources }),
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Live updates
    // -----------------------------------------------------------------------

    /// Open the server-push stream. The returned response streams SSE frames.
    pub async fn open_events(&self) -> Result<reqwest::Response, ApiError> {
        let response = self
            .request(Method::GET, &["events"])
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &body));
        }
        Ok(response)
    }
}
