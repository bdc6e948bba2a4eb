pub mod app_state;
pub mod cancel_bag;
pub mod cli;
pub mod config;
pub mod error;
pub mod interactors;
pub mod loadable;
pub mod models;
pub mod repository;
pub mod store;
pub mod testing;

pub use app_state::{AppState, AppStore, UserData};
pub use cancel_bag::CancelBag;
pub use error::{CountriesError, CountriesResult};
pub use loadable::Loadable;
pub use store::{Binding, Store};
