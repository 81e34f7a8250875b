//! Fetch-on-mount container

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::watch;
use tokio::task::AbortHandle;

use super::state::ViewState;

/// Identifies a fetch by resource and parameters, for logs and diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub resource: &'static str,
    pub params: Vec<(String, String)>,
}

impl FetchKey {
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            params: Vec::new(),
        }
    }

    /// Builder: add a parameter
    pub fn param(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource)?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, k, v)?;
        }
        Ok(())
    }
}

/// Holds the [`ViewState`] of one data need and runs its single fetch.
///
/// Observers either poll [`snapshot`](Self::snapshot) or follow changes
/// through [`subscribe`](Self::subscribe). Dropping the container tears it
/// down.
pub struct ViewContainer<T> {
    key: FetchKey,
    error_message: String,
    state: Arc<watch::Sender<ViewState<T>>>,
    mounted: AtomicBool,
    torn_down: Arc<AtomicBool>,
    task: OnceLock<AbortHandle>,
}

impl<T> ViewContainer<T>
where
    T: Send + Sync + 'static,
{
    /// Container in the loading state with `initial` as its data.
    ///
    /// `error_message` is what the view shows if the fetch fails.
    pub fn new(key: FetchKey, initial: T, error_message: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ViewState::new(initial));

        Self {
            key,
            error_message: error_message.into(),
            state: Arc::new(state),
            mounted: AtomicBool::new(false),
            torn_down: Arc::new(AtomicBool::new(false)),
            task: OnceLock::new(),
        }
    }

    pub fn key(&self) -> &FetchKey {
        &self.key
    }

    /// Start `fetch` on a new task.
    ///
    /// Only the first call per container starts anything; it returns `false`
    /// afterwards, including after teardown.
    pub fn mount<Fut, E>(&self, fetch: Fut) -> bool
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        if self.mounted.swap(true, Ordering::SeqCst) {
            tracing::debug!(fetch = %self.key, "Already mounted, not refetching");
            return false;
        }

        let state = Arc::clone(&self.state);
        let torn_down = Arc::clone(&self.torn_down);
        let key = self.key.clone();
        let message = self.error_message.clone();

        let fetch = tokio::spawn(fetch);
        let abort = fetch.abort_handle();

        tokio::spawn(async move {
            let result = match fetch.await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(e) if e.is_panic() => Err("fetch task panicked".to_string()),
                // Aborted by teardown
                Err(_) => return,
            };

            if torn_down.load(Ordering::SeqCst) {
                tracing::debug!(fetch = %key, "View torn down, discarding result");
                return;
            }

            match &result {
                Ok(_) => tracing::debug!(fetch = %key, "Fetch succeeded"),
                Err(e) => tracing::warn!(fetch = %key, error = %e, "Fetch failed"),
            }

            state.send_modify(|view| view.resolve(result, &message));
        });

        let _ = self.task.set(abort);
        true
    }

    /// Abort an in-flight fetch; its result will not reach the state
    pub fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.mounted.store(true, Ordering::SeqCst);

        if let Some(task) = self.task.get() {
            if !task.is_finished() {
                tracing::debug!(fetch = %self.key, "Aborting in-flight fetch");
            }
            task.abort();
        }

        // Wake anyone waiting in `settled`
        self.state.send_modify(|_| {});
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Receiver that observes every state change
    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.state.subscribe()
    }
}

impl<T> ViewContainer<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Current state
    pub fn snapshot(&self) -> ViewState<T> {
        self.state.borrow().clone()
    }

    /// Wait until the fetch has settled and return the final state.
    ///
    /// A container torn down mid-flight returns its still-loading state.
    pub async fn settled(&self) -> ViewState<T> {
        let mut rx = self.state.subscribe();
        let torn_down = Arc::clone(&self.torn_down);

        let view = match rx
            .wait_for(|view| !view.is_loading() || torn_down.load(Ordering::SeqCst))
            .await
        {
            Ok(view) => view.clone(),
            Err(_) => self.snapshot(),
        };
        view
    }
}

impl<T> Drop for ViewContainer<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.get() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Phase;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::oneshot;

    fn orders_container() -> ViewContainer<Vec<String>> {
        ViewContainer::new(
            FetchKey::new("recent orders"),
            Vec::new(),
            "Failed to load recent orders",
        )
    }

    #[test]
    fn test_fetch_key_display() {
        let key = FetchKey::new("dashboard summary")
            .param("month", 3)
            .param("year", 2024);
        assert_eq!(key.to_string(), "dashboard summary?month=3&year=2024");
        assert_eq!(FetchKey::new("orders").to_string(), "orders");
    }

    #[tokio::test]
    async fn test_success_populates_data() {
        let container = orders_container();
        assert!(container.snapshot().is_loading());

        container.mount(async { Ok::<_, String>(vec!["A-1".to_string()]) });
        let state = container.settled().await;

        assert_eq!(state.phase(), Phase::Ready);
        assert!(state.error().is_none());
        assert_eq!(state.data(), &vec!["A-1".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_keeps_default() {
        let container = orders_container();

        container.mount(async { Err::<Vec<String>, _>("HTTP 500") });
        let state = container.settled().await;

        assert!(!state.is_loading());
        assert_eq!(state.error(), Some("Failed to load recent orders"));
        assert!(state.data().is_empty());
    }

    #[tokio::test]
    async fn test_mount_fetches_once() {
        let container = orders_container();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            container.mount(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(vec!["x".to_string()])
            });
        }
        container.settled().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_subscribe_sees_transition() {
        let container = orders_container();
        let mut rx = container.subscribe();
        let (tx, gate) = oneshot::channel::<()>();

        container.mount(async move {
            let _ = gate.await;
            Ok::<_, String>(vec!["late".to_string()])
        });
        assert!(rx.borrow().is_loading());

        tx.send(()).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().phase(), Phase::Ready);
    }

    #[tokio::test]
    async fn test_teardown_discards_late_result() {
        let container = orders_container();
        let (tx, gate) = oneshot::channel::<()>();

        container.mount(async move {
            let _ = gate.await;
            Ok::<_, String>(vec!["late".to_string()])
        });
        container.teardown();
        let _ = tx.send(());

        let state = container.settled().await;
        assert!(container.is_torn_down());
        assert!(state.is_loading());
        assert!(state.data().is_empty());

        // A torn-down view cannot be remounted
        assert!(!container.mount(async { Ok::<_, String>(vec![]) }));
    }

    #[tokio::test]
    async fn test_panicking_fetch_fails_view() {
        let container = orders_container();

        container.mount(async {
            if true {
                panic!("decoder blew up");
            }
            Ok::<Vec<String>, String>(vec![])
        });

        let state = tokio::time::timeout(std::time::Duration::from_secs(5), container.settled())
            .await
            .expect("view never settled");

        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(state.error(), Some("Failed to load recent orders"));
        assert!(state.data().is_empty());
    }

    #[tokio::test]
    async fn test_settled_after_success_is_stable() {
        let container = orders_container();
        container.mount(async { Ok::<_, String>(vec!["b".to_string()]) });

        let first = container.settled().await;
        let second = container.settled().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_containers_are_independent() {
        let ok = orders_container();
        let failing = orders_container();

        ok.mount(async { Ok::<_, String>(vec!["a".to_string()]) });
        failing.mount(async { Err::<Vec<String>, _>("boom") });

        let (ok, failing) = tokio::join!(ok.settled(), failing.settled());
        assert_eq!(ok.phase(), Phase::Ready);
        assert_eq!(failing.phase(), Phase::Failed);
    }
}
