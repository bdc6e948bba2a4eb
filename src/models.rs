//! Country data as served by the countries API

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

/// A country from the list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub name: String,
    /// Three letter ISO code, unique per country
    pub alpha3_code: String,
    #[serde(default)]
    pub flag: Option<Url>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub region: String,
    /// Resolved details, when they travel with the country
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<CountryDetails>,
}

/// Resolved details of a country
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountryDetails {
    pub capital: String,
    pub currencies: Vec<Currency>,
    pub neighbors: Vec<Country>,
}

/// Details as returned by the API, with neighbors still given as codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsIntermediate {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub capital: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub currencies: Vec<Currency>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub borders: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub symbol: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
}

impl Country {
    pub fn new(name: impl Into<String>, alpha3_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alpha3_code: alpha3_code.into(),
            flag: None,
            region: String::new(),
            details: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }
}

impl DetailsIntermediate {
    /// Resolve `borders` against `countries`.
    ///
    /// Neighbors keep the order of `borders`. Codes with no match in
    /// `countries` are dropped.
    pub fn substitute_neighbors(self, countries: &[Country]) -> CountryDetails {
        let neighbors = self
            .borders
            .iter()
            .filter_map(|code| {
                countries
                    .iter()
                    .find(|country| country.alpha3_code == *code)
                    .cloned()
            })
            .collect();

        CountryDetails {
            capital: self.capital,
            currencies: self.currencies,
            neighbors,
        }
    }
}

// The API sends `null` for several fields on territories.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
