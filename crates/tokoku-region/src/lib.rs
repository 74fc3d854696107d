use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{StatusCode, Url};
use tokoku_types::domain::region::{City, Province};
use tokoku_types::ports::region_directory::{RegionDirectory, RegionError};

pub const DEFAULT_BASE_URL: &str = "https://www.emsifa.com/api-wilayah-indonesia/api";

#[derive(Clone)]
pub struct RegionClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

/// Thin client over the public Indonesian province/regency JSON API.
#[derive(Clone)]
pub struct RegionClient {
    base: Url,
    client: reqwest::Client,
}

impl RegionClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<RegionClientBuilder> {
        // Url::join drops the last segment unless the base ends with '/'.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalized).context("invalid region api url")?;
        Ok(RegionClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> Result<Url, RegionError> {
        self.base
            .join(path)
            .map_err(|e| RegionError::Unavailable(format!("bad region url: {e}")))
    }

    pub async fn list_provinces(&self) -> Result<Vec<Province>, RegionError> {
        let url = self.url("provinces.json")?;
        let res = self.client.get(url).send().await.map_err(unavailable)?;
        let res = res.error_for_status().map_err(unavailable)?;
        res.json().await.map_err(unavailable)
    }

    pub async fn list_cities(&self, province_id: &str) -> Result<Vec<City>, RegionError> {
        // Ids are numeric codes; anything else cannot name a province.
        if province_id.is_empty() || !province_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Ok(Vec::new());
        }
        let url = self.url(&format!("regencies/{province_id}.json"))?;
        let res = self.client.get(url).send().await.map_err(unavailable)?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let res = res.error_for_status().map_err(unavailable)?;
        res.json().await.map_err(unavailable)
    }
}

fn unavailable(e: reqwest::Error) -> RegionError {
    tracing::warn!(error = %e, "region api call failed");
    RegionError::Unavailable(e.to_string())
}

impl RegionClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<RegionClient> {
        if let Some(client) = self.client {
            return Ok(RegionClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(RegionClient {
            base: self.base,
            client,
        })
    }
}

#[async_trait]
impl RegionDirectory for RegionClient {
    async fn provinces(&self) -> Result<Vec<Province>, RegionError> {
        self.list_provinces().await
    }

    async fn cities(&self, province_id: &str) -> Result<Vec<City>, RegionError> {
        self.list_cities(province_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn fetches_provinces_and_cities() {
        let server = MockServer::start();

        let provinces_mock = server.mock(|when, then| {
            when.method(GET).path("/api/provinces.json");
            then.status(200).json_body(json!([
                { "id": "11", "name": "ACEH" },
                { "id": "31", "name": "DKI JAKARTA" }
            ]));
        });
        let cities_mock = server.mock(|when, then| {
            when.method(GET).path("/api/regencies/11.json");
            then.status(200).json_body(json!([
                { "id": "1101", "province_id": "11", "name": "KABUPATEN SIMEULUE" }
            ]));
        });

        let client = RegionClient::new(&server.url("/api")).unwrap();
        let provinces = client.provinces().await.unwrap();
        assert_eq!(provinces.len(), 2);
        assert_eq!(provinces[1].name, "DKI JAKARTA");

        let cities = client.cities("11").await.unwrap();
        assert_eq!(
            cities,
            vec![City {
                id: "1101".into(),
                province_id: "11".into(),
                name: "KABUPATEN SIMEULUE".into(),
            }]
        );

        provinces_mock.assert();
        cities_mock.assert();
    }

    #[tokio::test]
    async fn unknown_province_has_no_cities() {
        let server = MockServer::start();
        let missing = server.mock(|when, then| {
            when.method(GET).path("/regencies/99.json");
            then.status(404);
        });

        let client = RegionClient::new(&server.base_url()).unwrap();
        assert!(client.cities("99").await.unwrap().is_empty());
        assert!(client.cities("../provinces").await.unwrap().is_empty());
        missing.assert_hits(1);
    }

    #[tokio::test]
    async fn upstream_errors_are_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/provinces.json");
            then.status(500);
        });
        server.mock(|when, then| {
            when.method(GET).path("/regencies/11.json");
            then.status(200).body("not json");
        });

        let client = RegionClient::builder(&server.base_url())
            .unwrap()
            .with_timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        assert!(matches!(
            client.provinces().await,
            Err(RegionError::Unavailable(_))
        ));
        assert!(matches!(
            client.cities("11").await,
            Err(RegionError::Unavailable(_))
        ));
    }
}
