//! # Conditional Render Resolver
//!
//! Every view that shows a fetched resource picks exactly one of four branches
//! from its [`FetchState`]. The precedence is fixed:
//!
//! 1. **Loading** while a request for a live key has not produced data.
//! 2. **Error** when a request was attempted, failed, and left no data.
//! 3. **Empty** when there is nothing usable to show.
//! 4. **Success** otherwise.
//!
//! Stale data survives a failed revalidation, so `error` together with `data`
//! renders as success.

use crate::framework::{FetchError, FetchState};

/// The view a fetch state resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    Loading,
    Error,
    Empty,
    Success,
}

/// Pure selection over the four inputs. Total for every combination.
pub fn resolve(is_loading: bool, has_error: bool, has_data: bool, should_fetch: bool) -> Branch {
    if is_loading && should_fetch {
        Branch::Loading
    } else if has_error && !has_data && should_fetch {
        Branch::Error
    } else if !has_data {
        Branch::Empty
    } else {
        Branch::Success
    }
}

/// A branch together with the value it renders.
#[derive(Debug, PartialEq)]
pub enum Resolved<'a, T> {
    Loading,
    Error(&'a FetchError),
    Empty,
    Success(&'a T),
}

impl<T> Resolved<'_, T> {
    pub fn branch(&self) -> Branch {
        match self {
            Resolved::Loading => Branch::Loading,
            Resolved::Error(_) => Branch::Error,
            Resolved::Empty => Branch::Empty,
            Resolved::Success(_) => Branch::Success,
        }
    }
}

/// Resolves `state` and borrows the payload of the chosen branch.
pub fn select<T>(state: &FetchState<T>, should_fetch: bool) -> Resolved<'_, T> {
    let branch = resolve(
        state.is_loading,
        state.error.is_some(),
        state.data.is_some(),
        should_fetch,
    );
    match (branch, &state.error, &state.data) {
        (Branch::Loading, _, _) => Resolved::Loading,
        (Branch::Error, Some(error), _) => Resolved::Error(error),
        (Branch::Success, _, Some(data)) => Resolved::Success(data),
        _ => Resolved::Empty,
    }
}
