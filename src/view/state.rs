//! Per-fetch view state

use serde::Serialize;

/// Where a fetch lifecycle currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

/// `{data, loading, error}` triple driving rendering.
///
/// While `loading` is true `error` is `None`; once settled exactly one of
/// fresh data or an error message describes the outcome. A failure keeps
/// whatever data was there before.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState<T> {
    data: T,
    loading: bool,
    error: Option<String>,
}

impl<T> ViewState<T> {
    /// Loading state holding `initial` until the fetch settles
    pub fn new(initial: T) -> Self {
        Self {
            data: initial,
            loading: true,
            error: None,
        }
    }

    /// Settle the state from a fetch outcome.
    ///
    /// On failure `message` is stored instead of the underlying error so the
    /// view never shows transport details.
    pub fn resolve<E>(&mut self, result: Result<T, E>, message: &str) {
        match result {
            Ok(data) => {
                self.data = data;
                self.error = None;
            }
            Err(_) => {
                self.error = Some(message.to_string());
            }
        }
        self.loading = false;
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> Phase {
        match (self.loading, &self.error) {
            (true, _) => Phase::Loading,
            (false, None) => Phase::Ready,
            (false, Some(_)) => Phase::Failed,
        }
    }
}

impl<T: Default> Default for ViewState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
