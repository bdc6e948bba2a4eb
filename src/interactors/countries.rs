//! Loading of the country list and of per-country details

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app_state::AppStore;
use crate::cancel_bag::CancelBag;
use crate::error::CountriesResult;
use crate::loadable::Loadable;
use crate::models::{Country, CountryDetails};
use crate::repository::CountriesWebRepository;
use crate::store::Binding;

/// Operations the presentation layer can trigger.
///
/// Both operations return immediately. Results are written into the
/// application state or into the slot handed in by the caller.
pub trait CountriesInteractor: Send + Sync {
    /// Load the country list into `user_data.countries`
    fn load_countries(&self);

    /// Load details of `country` into the caller-owned `details` slot
    fn load_country_details(&self, details: Binding<Loadable<CountryDetails>>, country: &Country);
}

/// Interactor backed by a web repository.
///
/// Each load spawns a Tokio task, so the operations must be called from
/// within a runtime. A new load does not cancel one already in flight on the
/// same slot; call `Loadable::cancel_loading` first, otherwise a late
/// response from the older request can overwrite the newer one.
pub struct RealCountriesInteractor {
    web_repository: Arc<dyn CountriesWebRepository>,
    app_state: AppStore,
}

impl RealCountriesInteractor {
    pub fn new(web_repository: Arc<dyn CountriesWebRepository>, app_state: AppStore) -> Self {
        Self {
            web_repository,
            app_state,
        }
    }
}

impl CountriesInteractor for RealCountriesInteractor {
    fn load_countries(&self) {
        let cancel_bag = CancelBag::new();
        let token = cancel_bag.token();

        let superseded = self
            .app_state
            .update(|state| state.user_data.countries.set_is_loading(cancel_bag));
        if superseded.is_some() {
            warn!("Loading countries while a previous load is still in flight");
        }
        info!("Loading countries");

        let web_repository = Arc::clone(&self.web_repository);
        let app_state = self.app_state.clone();
        tokio::spawn(async move {
            let Some(result) = run_cancellable(&token, web_repository.load_countries()).await else {
                debug!("Countries load cancelled, result discarded");
                return;
            };

            match &result {
                Ok(countries) => info!("Loaded {} countries", countries.len()),
                Err(e) => warn!("Failed to load countries: {}", e),
            }
            app_state.update(|state| state.user_data.countries = Loadable::from(result));
        });
    }

    fn load_country_details(&self, details: Binding<Loadable<CountryDetails>>, country: &Country) {
        let cancel_bag = CancelBag::new();
        let token = cancel_bag.token();

        let mut slot = details.get();
        if slot.set_is_loading(cancel_bag).is_some() {
            warn!(
                "Loading details for {} while a previous load is still in flight",
                country.alpha3_code
            );
        }
        details.set(slot);
        info!("Loading details for {}", country.alpha3_code);

        let alpha3_code = country.alpha3_code.clone();
        let web_repository = Arc::clone(&self.web_repository);
        let app_state = self.app_state.clone();
        tokio::spawn(async move {
            let fetch = web_repository.load_country_details(&alpha3_code);
            let Some(result) = run_cancellable(&token, fetch).await else {
                debug!("Details load for {} cancelled, result discarded", alpha3_code);
                return;
            };

            let result = result.map(|intermediate| {
                let countries = app_state.read(|state| match &state.user_data.countries {
                    Loadable::Loaded(countries) => countries.clone(),
                    _ => Vec::new(),
                });
                intermediate.substitute_neighbors(&countries)
            });

            match &result {
                Ok(loaded) => debug!(
                    "Loaded details for {} with {} neighbor(s)",
                    alpha3_code,
                    loaded.neighbors.len()
                ),
                Err(e) => warn!("Failed to load details for {}: {}", alpha3_code, e),
            }
            details.set(Loadable::from(result));
        });
    }
}

/// Await `fetch` unless `token` is cancelled first.
///
/// `None` means the caller must not write anything. A result that arrives
/// after cancellation is dropped as well.
async fn run_cancellable<T>(
    token: &CancellationToken,
    fetch: impl std::future::Future<Output = CountriesResult<T>>,
) -> Option<CountriesResult<T>> {
    let result = tokio::select! {
        _ = token.cancelled() => return None,
        result = fetch => result,
    };
    if token.is_cancelled() {
        return None;
    }
    Some(result)
}

/// Interactor that does nothing, for previews and for testing other layers
#[derive(Debug, Clone, Copy, Default)]
pub struct StubCountriesInteractor;

impl CountriesInteractor for StubCountriesInteractor {
    fn load_countries(&self) {}

    fn load_country_details(&self, _details: Binding<Loadable<CountryDetails>>, _country: &Country) {}
}
