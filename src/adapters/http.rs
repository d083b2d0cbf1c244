use crate::domain::model::{AssetResponse, ResponseKind};
use crate::domain::ports::AssetFetcher;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use url::{Origin, Url};

/// [`AssetFetcher`] over `reqwest`. Responses whose final URL shares the
/// asset origin are `Basic`; everything else is `Cors`.
pub struct HttpFetcher {
    client: Client,
    origin: Origin,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            origin: Url::parse(base_url)?.origin(),
        })
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<AssetResponse> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let kind = if response.url().origin() == self.origin {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        };
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let final_url = response.url().to_string();
        let body = response.bytes().await?.to_vec();
        Ok(AssetResponse {
            url: final_url,
            status,
            kind,
            content_type,
            body,
        })
    }
}
