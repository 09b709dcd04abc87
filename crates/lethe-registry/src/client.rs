//! HTTP client for the registry control API.
//!
//! Production implementation of [`RegistryApi`] against the registry's JSON
//! control endpoints. Listing calls drain `nextToken` pagination before
//! returning; each bulk delete is one POST.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use url::Url;

use lethe_core::{ImageRecord, RepositoryContext};

use crate::api::{
    BatchDeleteRequest, BatchDeleteResult, ImagePage, RegionList, RegistryApi, RepositoryPage,
};
use crate::config::{RegistryAuth, RegistryConfig};
use crate::error::RegistryError;

/// Client for the registry control API.
#[derive(Debug)]
pub struct HttpRegistryClient {
    config: RegistryConfig,
    http: reqwest::Client,
}

impl HttpRegistryClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL is invalid or the HTTP client
    /// cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use lethe_registry::{HttpRegistryClient, RegistryConfig};
    ///
    /// let config = RegistryConfig::new("https://registry.example.com");
    /// let client = HttpRegistryClient::new(config)?;
    /// # Ok::<(), lethe_registry::RegistryError>(())
    /// ```
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        Url::parse(&config.url).map_err(|_| RegistryError::InvalidUrl {
            url: config.url.clone(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| RegistryError::ConnectionFailed {
                url: config.url.clone(),
                source: e,
            })?;

        Ok(Self { config, http })
    }

    /// Returns the registry configuration.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Creates authentication headers based on configuration.
    fn auth_headers(&self) -> Result<HeaderMap, RegistryError> {
        let mut headers = HeaderMap::new();

        match &self.config.auth {
            RegistryAuth::None => {}
            RegistryAuth::Basic { username, password } => {
                let credentials = base64::Engine::encode(
                    &base64::engine::general_purpose::STANDARD,
                    format!("{username}:{password}"),
                );
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Basic {credentials}")).map_err(|_| {
                        RegistryError::AuthenticationFailed {
                            message: "Invalid credentials".to_string(),
                        }
                    })?,
                );
            }
            RegistryAuth::Bearer { token } => {
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                        RegistryError::AuthenticationFailed {
                            message: "Invalid token".to_string(),
                        }
                    })?,
                );
            }
        }

        Ok(headers)
    }

    /// Issues a GET and decodes the JSON body, mapping HTTP failures.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, RegistryError> {
        let response = self
            .http
            .get(url)
            .headers(self.auth_headers()?)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RegistryError::HttpError {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        response.json().await.map_err(Into::into)
    }
}

#[async_trait]
impl RegistryApi for HttpRegistryClient {
    async fn list_regions(&self) -> Result<Vec<String>, RegistryError> {
        let url = format!("{}/v1/regions", self.config.url);
        let list: RegionList =
            self.get_json(&url)
                .await
                .map_err(|e| RegistryError::RegionListingFailed {
                    message: e.to_string(),
                })?;
        Ok(list.regions)
    }

    async fn list_repositories(
        &self,
        region: &str,
    ) -> Result<Vec<RepositoryContext>, RegistryError> {
        let base = format!("{}/v1/{region}/repositories", self.config.url);
        let mut repositories = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let url = match &next_token {
                Some(token) => format!("{base}?nextToken={token}"),
                None => base.clone(),
            };
            let page: RepositoryPage =
                self.get_json(&url)
                    .await
                    .map_err(|e| RegistryError::RepositoryListingFailed {
                        region: region.to_string(),
                        message: e.to_string(),
                    })?;

            repositories.extend(page.repositories);
            next_token = page.next_token;
            if next_token.is_none() {
                break;
            }
        }

        Ok(repositories)
    }

    async fn list_images(
        &self,
        region: &str,
        repo: &RepositoryContext,
    ) -> Result<Vec<ImageRecord>, RegistryError> {
        let base = format!(
            "{}/v1/{region}/repositories/{}/images",
            self.config.url, repo.repository_name
        );
        let mut images = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let url = match &next_token {
                Some(token) => format!("{base}?nextToken={token}"),
                None => base.clone(),
            };
            let page: ImagePage =
                self.get_json(&url)
                    .await
                    .map_err(|e| RegistryError::ImageListingFailed {
                        repository: repo.repository_name.clone(),
                        message: e.to_string(),
                    })?;

            images.extend(page.image_details);
            next_token = page.next_token;
            if next_token.is_none() {
                break;
            }
        }

        Ok(images)
    }

    async fn batch_delete(
        &self,
        region: &str,
        repo: &RepositoryContext,
        digests: &[String],
    ) -> Result<BatchDeleteResult, RegistryError> {
        let url = format!(
            "{}/v1/{region}/repositories/{}/images/delete",
            self.config.url, repo.repository_name
        );
        let body = BatchDeleteRequest {
            registry_id: &repo.registry_id,
            image_digests: digests,
        };

        let response = self
            .http
            .post(&url)
            .headers(self.auth_headers()?)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RegistryError::DeleteFailed {
                repository: repo.repository_name.clone(),
                message: format!(
                    "{}: {}",
                    response.status(),
                    response.text().await.unwrap_or_default()
                ),
            });
        }

        response.json().await.map_err(Into::into)
    }
}
