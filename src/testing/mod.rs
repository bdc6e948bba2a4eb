//! Test doubles and helpers for exercising interactors

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};

use crate::error::{CountriesError, CountriesResult};
use crate::models::{Country, CountryDetails, Currency, DetailsIntermediate};
use crate::repository::CountriesWebRepository;

/// A call received by the mocked repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockedAction {
    LoadCountries,
    LoadCountryDetails(String),
}

/// Repository returning scripted responses and recording every call
pub struct MockedCountriesWebRepository {
    countries_response: CountriesResult<Vec<Country>>,
    details_response: CountriesResult<DetailsIntermediate>,
    latency: Option<Duration>,
    expected_actions: Vec<MockedAction>,
    actions: RwLock<Vec<MockedAction>>,
}

impl Default for MockedCountriesWebRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockedCountriesWebRepository {
    /// Create a repository that fails every call until responses are set
    pub fn new() -> Self {
        Self {
            countries_response: Err(CountriesError::internal("No countries response configured")),
            details_response: Err(CountriesError::internal("No details response configured")),
            latency: None,
            expected_actions: Vec::new(),
            actions: RwLock::new(Vec::new()),
        }
    }

    pub fn with_countries_response(mut self, response: CountriesResult<Vec<Country>>) -> Self {
        self.countries_response = response;
        self
    }

    pub fn with_details_response(mut self, response: CountriesResult<DetailsIntermediate>) -> Self {
        self.details_response = response;
        self
    }

    /// Delay every response, to leave room for cancellation
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Calls `verify` expects to have been made, in order
    pub fn with_expected_actions(mut self, actions: Vec<MockedAction>) -> Self {
        self.expected_actions = actions;
        self
    }

    /// Calls made so far
    pub async fn actions(&self) -> Vec<MockedAction> {
        self.actions.read().await.clone()
    }

    /// Assert that exactly the expected calls were made
    pub async fn verify(&self) {
        let actions = self.actions.read().await;
        assert_eq!(
            *actions, self.expected_actions,
            "repository calls did not match expectations"
        );
    }

    async fn record(&self, action: MockedAction) {
        self.actions.write().await.push(action);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl CountriesWebRepository for MockedCountriesWebRepository {
    async fn load_countries(&self) -> CountriesResult<Vec<Country>> {
        self.record(MockedAction::LoadCountries).await;
        self.countries_response.clone()
    }

    async fn load_country_details(&self, alpha3_code: &str) -> CountriesResult<DetailsIntermediate> {
        self.record(MockedAction::LoadCountryDetails(alpha3_code.to_string()))
            .await;
        self.details_response.clone()
    }
}

/// Receive up to `count` values, giving up after `within`
pub async fn record_updates<T>(
    receiver: &mut mpsc::UnboundedReceiver<T>,
    count: usize,
    within: Duration,
) -> Vec<T> {
    let mut updates = Vec::with_capacity(count);
    let collect = async {
        while updates.len() < count {
            match receiver.recv().await {
                Some(update) => updates.push(update),
                None => break,
            }
        }
    };
    if tokio::time::timeout(within, collect).await.is_err() {
        tracing::debug!("Stopped recording updates after {:?}", within);
    }
    updates
}

/// A small fixed country list
pub fn mocked_countries() -> Vec<Country> {
    vec![
        Country::new("United Kingdom", "GB").with_region("Europe"),
        Country::new("France", "FR").with_region("Europe"),
        Country::new("Canada", "CA").with_region("Americas"),
    ]
}

/// Details with capital London bordering `neighbors`, both as the API
/// returns them and as they look once resolved
pub fn mocked_details(neighbors: &[Country]) -> (DetailsIntermediate, CountryDetails) {
    let intermediate = DetailsIntermediate {
        capital: "London".to_string(),
        currencies: vec![Currency {
            code: "12".to_string(),
            symbol: "$".to_string(),
            name: "US dollar".to_string(),
        }],
        borders: neighbors.iter().map(|c| c.alpha3_code.clone()).collect(),
    };
    let details = CountryDetails {
        capital: intermediate.capital.clone(),
        currencies: intermediate.currencies.clone(),
        neighbors: neighbors.to_vec(),
    };
    (intermediate, details)
}
