//! Web repository boundary
//!
//! The interactors only see the `CountriesWebRepository` trait. The HTTP
//! implementation lives in `web`, test doubles in `crate::testing`.

pub mod web;

use crate::error::CountriesResult;
use crate::models::{Country, DetailsIntermediate};
use async_trait::async_trait;

pub use web::RealCountriesWebRepository;

/// Source of country data
#[async_trait]
pub trait CountriesWebRepository: Send + Sync {
    /// Fetch every country
    async fn load_countries(&self) -> CountriesResult<Vec<Country>>;

    /// Fetch the details of one country, neighbors still unresolved
    async fn load_country_details(&self, alpha3_code: &str) -> CountriesResult<DetailsIntermediate>;
}
