//! HTTP implementation of the countries repository

use crate::config::ApiConfig;
use crate::error::{CountriesError, CountriesResult};
use crate::models::{Country, DetailsIntermediate};
use crate::repository::CountriesWebRepository;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Repository backed by the REST countries API
pub struct RealCountriesWebRepository {
    client: Client,
    base_url: String,
}

impl RealCountriesWebRepository {
    /// Create a repository for the endpoint described by `config`
    pub fn new(config: &ApiConfig) -> CountriesResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| CountriesError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn countries_url(&self) -> String {
        format!("{}/all", self.base_url)
    }

    fn details_url(&self, alpha3_code: &str) -> String {
        format!("{}/alpha/{}", self.base_url, alpha3_code.to_lowercase())
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> CountriesResult<T> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CountriesError::http(status.as_u16(), url));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CountriesWebRepository for RealCountriesWebRepository {
    async fn load_countries(&self) -> CountriesResult<Vec<Country>> {
        let url = self.countries_url();
        self.get(&url).await
    }

    async fn load_country_details(&self, alpha3_code: &str) -> CountriesResult<DetailsIntermediate> {
        let url = self.details_url(alpha3_code);
        self.get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let config = ApiConfig {
            base_url: "https://restcountries.com/v2/".to_string(),
            request_timeout_secs: 5,
        };
        let repository = RealCountriesWebRepository::new(&config).unwrap();

        assert_eq!(repository.countries_url(), "https://restcountries.com/v2/all");
        assert_eq!(
            repository.details_url("FRA"),
            "https://restcountries.com/v2/alpha/fra"
        );
    }
}
