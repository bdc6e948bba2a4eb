//! Process-wide application state

use std::collections::BTreeMap;

use crate::loadable::Loadable;
use crate::models::{Country, CountryDetails};
use crate::store::{Binding, Store};

/// Shared handle to the application state
pub type AppStore = Store<AppState>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub user_data: UserData,
}

/// Data loaded on behalf of the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserData {
    pub countries: Loadable<Vec<Country>>,
    /// Detail slots keyed by `alpha3_code`
    pub country_details: BTreeMap<String, Loadable<CountryDetails>>,
}

impl AppState {
    /// Fresh state with every slot `NotRequested`
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserData {
    /// Detail slot of one country; `NotRequested` until first written
    pub fn details(&self, alpha3_code: &str) -> Loadable<CountryDetails> {
        self.country_details
            .get(alpha3_code)
            .cloned()
            .unwrap_or_default()
    }

    /// Binding to the detail slot of `alpha3_code` inside `store`
    pub fn details_binding(store: &AppStore, alpha3_code: &str) -> Binding<Loadable<CountryDetails>> {
        let read_code = alpha3_code.to_string();
        let write_code = alpha3_code.to_string();
        store.binding(
            move |state: &AppState| state.user_data.details(&read_code),
            move |state, value| {
                state
                    .user_data
                    .country_details
                    .insert(write_code.clone(), value);
            },
        )
    }
}
