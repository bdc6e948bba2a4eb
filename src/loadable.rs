//! Load lifecycle of an asynchronous value

use crate::cancel_bag::CancelBag;
use crate::error::{CountriesError, CountriesResult};

/// A value wrapped with its load state.
///
/// `IsLoading` keeps the last known value around so a refresh can keep
/// showing stale data, and carries the `CancelBag` of the request in flight.
#[derive(Debug, Clone)]
pub enum Loadable<T> {
    /// No load attempted yet
    NotRequested,
    /// Request in flight
    IsLoading {
        last: Option<T>,
        cancel_bag: CancelBag,
    },
    /// Request succeeded
    Loaded(T),
    /// Request failed
    Failed(CountriesError),
}

impl<T> Loadable<T> {
    /// The loaded value, or the stale value while a refresh is running
    pub fn value(&self) -> Option<&T> {
        match self {
            Loadable::IsLoading { last, .. } => last.as_ref(),
            Loadable::Loaded(value) => Some(value),
            Loadable::NotRequested | Loadable::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&CountriesError> {
        match self {
            Loadable::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::IsLoading { .. })
    }

    /// The bag of the request in flight, if any
    pub fn cancel_bag(&self) -> Option<&CancelBag> {
        match self {
            Loadable::IsLoading { cancel_bag, .. } => Some(cancel_bag),
            _ => None,
        }
    }

    /// Transform the payload of `IsLoading` and `Loaded`, leaving the other
    /// variants untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Loadable::NotRequested => Loadable::NotRequested,
            Loadable::IsLoading { last, cancel_bag } => Loadable::IsLoading {
                last: last.map(f),
                cancel_bag,
            },
            Loadable::Loaded(value) => Loadable::Loaded(f(value)),
            Loadable::Failed(error) => Loadable::Failed(error),
        }
    }
}

impl<T: Clone> Loadable<T> {
    /// The `IsLoading` state that follows this one: `last` is the current
    /// value and `cancel_bag` belongs to the new request.
    pub fn to_loading(&self, cancel_bag: CancelBag) -> Loadable<T> {
        Loadable::IsLoading {
            last: self.value().cloned(),
            cancel_bag,
        }
    }

    /// Move this slot into `IsLoading`.
    ///
    /// Returns the bag of a request that was already in flight. It is not
    /// cancelled here; that is up to the caller.
    pub fn set_is_loading(&mut self, cancel_bag: CancelBag) -> Option<CancelBag> {
        let next = self.to_loading(cancel_bag);
        match std::mem::replace(self, next) {
            Loadable::IsLoading { cancel_bag, .. } => Some(cancel_bag),
            _ => None,
        }
    }

    /// Cancel the request in flight and fall back to the stale value, or to
    /// `NotRequested` when there is none. No-op unless loading.
    pub fn cancel_loading(&mut self) {
        if let Loadable::IsLoading { last, cancel_bag } = self {
            cancel_bag.cancel();
            *self = match last.take() {
                Some(last) => Loadable::Loaded(last),
                None => Loadable::NotRequested,
            };
        }
    }
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Loadable::NotRequested
    }
}

impl<T> From<CountriesResult<T>> for Loadable<T> {
    fn from(result: CountriesResult<T>) -> Self {
        match result {
            Ok(value) => Loadable::Loaded(value),
            Err(error) => Loadable::Failed(error),
        }
    }
}

// The cancel bag is an opaque handle and takes no part in equality.
impl<T: PartialEq> PartialEq for Loadable<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Loadable::NotRequested, Loadable::NotRequested) => true,
            (Loadable::IsLoading { last: lhs, .. }, Loadable::IsLoading { last: rhs, .. }) => {
                lhs == rhs
            }
            (Loadable::Loaded(lhs), Loadable::Loaded(rhs)) => lhs == rhs,
            (Loadable::Failed(lhs), Loadable::Failed(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl<T: Eq> Eq for Loadable<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn loading<T>(last: Option<T>) -> Loadable<T> {
        Loadable::IsLoading {
            last,
            cancel_bag: CancelBag::new(),
        }
    }

    #[test]
    fn test_equality_ignores_cancel_bag() {
        assert_eq!(loading::<i32>(None), loading(None));
        assert_eq!(loading(Some(5)), loading(Some(5)));
        assert_ne!(loading(Some(5)), loading(Some(6)));
        assert_ne!(loading(Some(5)), loading(None));
    }

    #[test]
    fn test_equality_across_variants() {
        let error = CountriesError::network("offline");
        assert_eq!(Loadable::<i32>::NotRequested, Loadable::NotRequested);
        assert_eq!(Loadable::<i32>::Loaded(1), Loadable::Loaded(1));
        assert_ne!(Loadable::<i32>::Loaded(1), Loadable::Loaded(2));
        assert_eq!(
            Loadable::<i32>::Failed(error.clone()),
            Loadable::Failed(error.clone())
        );
        assert_ne!(Loadable::<i32>::Failed(error), Loadable::NotRequested);
        assert_ne!(Loadable::Loaded(1), loading(Some(1)));
    }

    #[test]
    fn test_value_accessor() {
        assert_eq!(Loadable::<i32>::NotRequested.value(), None);
        assert_eq!(loading(Some(3)).value(), Some(&3));
        assert_eq!(loading::<i32>(None).value(), None);
        assert_eq!(Loadable::Loaded(7).value(), Some(&7));
        assert_eq!(
            Loadable::<i32>::Failed(CountriesError::internal("x")).value(),
            None
        );
    }

    #[test]
    fn test_error_accessor() {
        let error = CountriesError::decoding("bad json");
        assert_eq!(Loadable::<i32>::Failed(error.clone()).error(), Some(&error));
        assert_eq!(Loadable::Loaded(1).error(), None);
    }

    #[test]
    fn test_map_preserves_shape() {
        assert_eq!(Loadable::Loaded(2).map(|v| v * 10), Loadable::Loaded(20));
        assert_eq!(loading(Some(2)).map(|v| v * 10), loading(Some(20)));
        assert_eq!(loading::<i32>(None).map(|v| v * 10), loading(None));
        assert_eq!(
            Loadable::<i32>::NotRequested.map(|v| v * 10),
            Loadable::NotRequested
        );
        let error = CountriesError::internal("boom");
        assert_eq!(
            Loadable::<i32>::Failed(error.clone()).map(|v| v * 10),
            Loadable::Failed(error)
        );
    }

    #[test]
    fn test_map_keeps_cancel_bag() {
        let bag = CancelBag::new();
        let token = bag.token();
        let mapped = Loadable::IsLoading {
            last: Some(1),
            cancel_bag: bag,
        }
        .map(|v| v.to_string());

        mapped.cancel_bag().unwrap().cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_set_is_loading_keeps_last_value() {
        let mut slot = Loadable::Loaded(vec![1, 2]);
        let previous = slot.set_is_loading(CancelBag::new());
        assert!(previous.is_none());
        assert_eq!(slot, loading(Some(vec![1, 2])));

        let mut failed = Loadable::<i32>::Failed(CountriesError::internal("x"));
        failed.set_is_loading(CancelBag::new());
        assert_eq!(failed, loading(None));
    }

    #[test]
    fn test_set_is_loading_returns_previous_bag_uncancelled() {
        let first = CancelBag::new();
        let token = first.token();
        let mut slot = Loadable::Loaded(1);
        slot.set_is_loading(first);

        let previous = slot.set_is_loading(CancelBag::new()).unwrap();

        assert!(!token.is_cancelled());
        assert_eq!(previous.len(), 1);
        assert_eq!(slot, loading(Some(1)));
    }

    #[test]
    fn test_cancel_loading_reverts() {
        let bag = CancelBag::new();
        let token = bag.token();
        let mut slot = Loadable::IsLoading {
            last: Some("stale"),
            cancel_bag: bag,
        };
        slot.cancel_loading();
        assert!(token.is_cancelled());
        assert_eq!(slot, Loadable::Loaded("stale"));

        let mut empty = loading::<i32>(None);
        empty.cancel_loading();
        assert_eq!(empty, Loadable::NotRequested);

        let mut loaded = Loadable::Loaded(4);
        loaded.cancel_loading();
        assert_eq!(loaded, Loadable::Loaded(4));
    }

    #[test]
    fn test_from_result() {
        let ok: CountriesResult<i32> = Ok(1);
        assert_eq!(Loadable::from(ok), Loadable::Loaded(1));
        let err: CountriesResult<i32> = Err(CountriesError::network("down"));
        assert_eq!(
            Loadable::from(err),
            Loadable::Failed(CountriesError::network("down"))
        );
    }
}
