use super::{ImageOrigin, ImageRef, ImageSource};
use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_ENDPOINT: &str = "https://google.serper.dev/images";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);
/// The API caps a single page at this many results.
const MAX_RESULTS: usize = 100;

pub const ENV_SERPER_API_KEY: &str = "SERPER_API_KEY";

#[derive(Deserialize, Debug)]
struct SerperImagesResponse {
    #[serde(default)]
    images: Vec<SerperImage>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SerperImage {
    #[serde(default)]
    title: Option<String>,
    image_url: String,
    #[serde(default)]
    thumbnail_url: Option<String>,
}

/// Image search over the Serper images API.
#[derive(Debug, Clone)]
pub struct SerperImageSearch {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl SerperImageSearch {
    pub fn new(api_key: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            bail!("image search API key is empty");
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    /// Reads `SERPER_API_KEY`, loading `.env` first.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let key = std::env::var(ENV_SERPER_API_KEY)
            .with_context(|| format!("{} is not set", ENV_SERPER_API_KEY))?;
        Self::new(key)
    }
}

#[async_trait]
impl ImageSource for SerperImageSearch {
    #[instrument(skip(self))]
    async fn fetch(&self, query: &str, count: usize) -> anyhow::Result<Vec<ImageRef>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&serde_json::json!({
                "q": query,
                "num": count.min(MAX_RESULTS),
            }))
            .send()
            .await
            .context("Image search request failed")?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => bail!("Invalid image search API key"),
            StatusCode::TOO_MANY_REQUESTS => bail!("Image search quota exceeded"),
            status => bail!("Image search returned HTTP {}", status),
        }

        let body: SerperImagesResponse = response
            .json()
            .await
            .context("Failed to parse image search response")?;

        let images: Vec<ImageRef> = body
            .images
            .into_iter()
            .filter(|image| image.image_url.starts_with("http"))
            .take(count)
            .map(|image| ImageRef {
                url: image.image_url,
                thumbnail_url: image.thumbnail_url,
                title: image.title,
                origin: ImageOrigin::Search,
            })
            .collect();

        debug!(requested = count, returned = images.len(), "Image search complete");
        Ok(images)
    }

    fn name(&self) -> &'static str {
        "serper"
    }
}
