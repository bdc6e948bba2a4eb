//! Interactors: the operations the presentation layer calls into

pub mod countries;

use std::sync::Arc;

use crate::app_state::AppStore;
use crate::repository::CountriesWebRepository;

pub use countries::{CountriesInteractor, RealCountriesInteractor, StubCountriesInteractor};

/// The interactor set handed to the presentation layer.
///
/// Which variant backs it is decided once, at construction.
#[derive(Clone)]
pub struct Interactors {
    pub countries: Arc<dyn CountriesInteractor>,
}

impl Interactors {
    pub fn new(countries: Arc<dyn CountriesInteractor>) -> Self {
        Self { countries }
    }

    /// Interactors that load through `web_repository` into `app_state`
    pub fn live(web_repository: Arc<dyn CountriesWebRepository>, app_state: AppStore) -> Self {
        Self::new(Arc::new(RealCountriesInteractor::new(web_repository, app_state)))
    }

    /// Interactors that never load anything
    pub fn stub() -> Self {
        Self::new(Arc::new(StubCountriesInteractor))
    }
}
