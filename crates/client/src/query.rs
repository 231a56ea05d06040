//! Keyed query cache.
//!
//! - A cached value is served without touching the network.
//! - Concurrent reads of one key share a single in-flight request.
//! - A failed read is retried once when the failure looks transient
//!   (transport error or 5xx). Mutations are never retried.
//! - Invalidation drops every entry under a key prefix; a request that was
//!   in flight when its key was invalidated still answers its callers but is
//!   not stored.
//!
//! There is no expiry and nothing is persisted. Everything runs on one
//! thread, so state lives behind `Rc<RefCell<_>>`.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::{Rc, Weak};

use futures_util::future::{FutureExt, LocalBoxFuture, Shared};
use lms_admin_shared::{ApiError, ErrorKind, NormalizedError};

/// One element of a query key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Str(String),
    Int(i64),
    /// An absent component, e.g. no signed-in user.
    Null,
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        KeyPart::Str(value.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        KeyPart::Str(value)
    }
}

impl From<&String> for KeyPart {
    fn from(value: &String) -> Self {
        KeyPart::Str(value.clone())
    }
}

impl From<i64> for KeyPart {
    fn from(value: i64) -> Self {
        KeyPart::Int(value)
    }
}

impl<T: Into<KeyPart>> From<Option<T>> for KeyPart {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(KeyPart::Null)
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Str(s) => write!(f, "{s:?}"),
            KeyPart::Int(n) => write!(f, "{n}"),
            KeyPart::Null => f.write_str("null"),
        }
    }
}

/// Ordered tuple identifying a cached result, e.g. `["decks", "TEACHER", 5]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    pub fn new(parts: Vec<KeyPart>) -> Self {
        Self(parts)
    }

    /// A one-element key naming a namespace.
    pub fn root(name: &str) -> Self {
        Self(vec![KeyPart::from(name)])
    }

    pub fn with(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{part}")?;
        }
        f.write_str("]")
    }
}

/// What a page renders for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error(NormalizedError),
}

type Value = Rc<dyn Any>;
type SharedFetch = Shared<LocalBoxFuture<'static, Result<Value, ApiError>>>;

enum Entry {
    Loading { fetch: SharedFetch, generation: u64 },
    Ready(Value),
    Failed(ApiError),
}

#[derive(Default)]
struct Inner {
    entries: HashMap<QueryKey, Entry>,
    next_generation: u64,
    revision: u64,
}

impl Inner {
    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Shared handle to the cache. Clones see the same entries.
#[derive(Clone, Default)]
pub struct QueryClient {
    inner: Rc<RefCell<Inner>>,
}

/// Non-owning handle, for callbacks that must not keep the cache alive.
#[derive(Clone)]
pub struct WeakQueryClient {
    inner: Weak<RefCell<Inner>>,
}

impl WeakQueryClient {
    pub fn upgrade(&self) -> Option<QueryClient> {
        self.inner.upgrade().map(|inner| QueryClient { inner })
    }
}

fn is_transient(err: &ApiError) -> bool {
    matches!(err.kind(), ErrorKind::Network | ErrorKind::Server)
}

fn downcast<T: Clone + 'static>(key: &QueryKey, value: &Value) -> Result<T, ApiError> {
    value.downcast_ref::<T>().cloned().ok_or_else(|| {
        ApiError::Deserialize(format!("cached value under {key} has a different type"))
    })
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn downgrade(&self) -> WeakQueryClient {
        WeakQueryClient {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Read `key`, calling `fetcher` only on a miss.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, ApiError>
    where
        T: Clone + 'static,
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, ApiError>> + 'static,
    {
        let (fetch, generation) = {
            let mut inner = self.inner.borrow_mut();
            let in_flight = match inner.entries.get(&key) {
                Some(Entry::Ready(value)) => return downcast(&key, value),
                Some(Entry::Loading { fetch, generation }) => Some((fetch.clone(), *generation)),
                Some(Entry::Failed(_)) | None => None,
            };
            match in_flight {
                Some(joined) => {
                    crate::log_debug!("query {key} already in flight, joining it");
                    joined
                }
                None => {
                    let generation = inner.next_generation;
                    inner.next_generation += 1;
                    let fetch = Self::start(key.clone(), fetcher);
                    inner.entries.insert(
                        key.clone(),
                        Entry::Loading {
                            fetch: fetch.clone(),
                            generation,
                        },
                    );
                    inner.touch();
                    (fetch, generation)
                }
            }
        };

        let result = fetch.await;

        {
            let mut inner = self.inner.borrow_mut();
            let current = matches!(
                inner.entries.get(&key),
                Some(Entry::Loading { generation: g, .. }) if *g == generation
            );
            if current {
                let entry = match &result {
                    Ok(value) => Entry::Ready(value.clone()),
                    Err(e) => Entry::Failed(e.clone()),
                };
                inner.entries.insert(key.clone(), entry);
                inner.touch();
            }
        }

        result.and_then(|value| downcast(&key, &value))
    }

    fn start<T, F, Fut>(key: QueryKey, fetcher: F) -> SharedFetch
    where
        T: 'static,
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, ApiError>> + 'static,
    {
        async move {
            crate::log_debug!("query {key} fetching");
            let first = fetcher().await;
            let result = match first {
                Err(e) if is_transient(&e) => {
                    crate::log_warn!("query {key} failed ({e}), retrying once");
                    fetcher().await
                }
                other => other,
            };
            result.map(|v| Rc::new(v) as Value)
        }
        .boxed_local()
        .shared()
    }

    /// Cached value for `key`, if one is stored.
    pub fn get<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        match self.inner.borrow().entries.get(key) {
            Some(Entry::Ready(value)) => value.downcast_ref::<T>().cloned(),
            _ => None,
        }
    }

    /// Store a value directly, replacing whatever was there.
    pub fn set<T: 'static>(&self, key: QueryKey, value: T) {
        let mut inner = self.inner.borrow_mut();
        inner.entries.insert(key, Entry::Ready(Rc::new(value)));
        inner.touch();
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        match self.inner.borrow().entries.get(key) {
            None => QueryStatus::Idle,
            Some(Entry::Loading { .. }) => QueryStatus::Loading,
            Some(Entry::Ready(_)) => QueryStatus::Success,
            Some(Entry::Failed(e)) => QueryStatus::Error(e.normalize()),
        }
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.status(key) == QueryStatus::Loading
    }

    /// Drop every entry whose key starts with `prefix`.
    pub fn invalidate(&self, prefix: &QueryKey) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.entries.len();
        inner.entries.retain(|key, _| !key.starts_with(prefix));
        let dropped = before - inner.entries.len();
        if dropped > 0 {
            crate::log_debug!("invalidated {dropped} queries under {prefix}");
            inner.touch();
        }
    }

    /// Run a mutation once; on success invalidate each prefix.
    pub async fn mutate<T, Fut>(&self, mutation: Fut, invalidate: &[QueryKey]) -> Result<T, ApiError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let result = mutation.await;
        match &result {
            Ok(_) => {
                for prefix in invalidate {
                    self.invalidate(prefix);
                }
            }
            Err(e) => crate::log_warn!("mutation failed: {}", e.user_message()),
        }
        result
    }

    /// Forget everything (the session ended).
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.entries.clear();
        inner.touch();
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bumped on every cache change; UI layers watch it to re-render.
    pub fn revision(&self) -> u64 {
        self.inner.borrow().revision
    }
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future;
    use std::cell::Cell;
    use std::task::Poll;

    fn counting(calls: &Rc<Cell<u32>>, value: u32) -> impl Fn() -> LocalBoxFuture<'static, Result<u32, ApiError>> {
        let calls = calls.clone();
        move || {
            calls.set(calls.get() + 1);
            future::ready(Ok(value)).boxed_local()
        }
    }

    fn block_on<F: Future>(fut: F) -> F::Output {
        futures_util::pin_mut!(fut);
        let waker = futures_util::task::noop_waker();
        let mut cx = std::task::Context::from_waker(&waker);
        loop {
            if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
                return out;
            }
        }
    }

    #[test]
    fn prefixes_match_leading_parts() {
        let key = QueryKey::root("decks").with("TEACHER").with(5);
        assert!(key.starts_with(&QueryKey::root("decks")));
        assert!(key.starts_with(&QueryKey::root("decks").with("TEACHER")));
        assert!(!key.starts_with(&QueryKey::root("deck")));
        assert!(!QueryKey::root("decks").starts_with(&key));
        assert_eq!(key.to_string(), r#"["decks", "TEACHER", 5]"#);
        assert_eq!(
            QueryKey::root("decks").with(None::<i64>).to_string(),
            r#"["decks", null]"#
        );
    }

    #[test]
    fn hits_skip_the_fetcher() {
        let queries = QueryClient::new();
        let calls = Rc::new(Cell::new(0));
        let key = QueryKey::root("courses");

        assert_eq!(block_on(queries.fetch(key.clone(), counting(&calls, 1))).unwrap(), 1);
        assert_eq!(block_on(queries.fetch(key.clone(), counting(&calls, 2))).unwrap(), 1);
        assert_eq!(calls.get(), 1);
        assert_eq!(queries.status(&key), QueryStatus::Success);
    }

    #[test]
    fn invalidation_forces_a_refetch() {
        let queries = QueryClient::new();
        let calls = Rc::new(Cell::new(0));
        let deck = QueryKey::root("deck").with("d1");
        let cards = QueryKey::root("flashcards").with("d1");
        let other = QueryKey::root("flashcards").with("d2");

        block_on(queries.fetch(deck.clone(), counting(&calls, 1))).unwrap();
        block_on(queries.fetch(cards.clone(), counting(&calls, 1))).unwrap();
        block_on(queries.fetch(other.clone(), counting(&calls, 1))).unwrap();

        queries.invalidate(&cards);
        queries.invalidate(&deck);
        assert_eq!(queries.status(&deck), QueryStatus::Idle);
        assert_eq!(queries.status(&other), QueryStatus::Success);

        assert_eq!(block_on(queries.fetch(cards, counting(&calls, 9))).unwrap(), 9);
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn transient_failures_are_retried_once() {
        let queries = QueryClient::new();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let fetcher = move || {
            c.set(c.get() + 1);
            let attempt = c.get();
            future::ready(if attempt == 1 {
                Err(ApiError::Network("reset".into()))
            } else {
                Ok(attempt)
            })
            .boxed_local()
        };

        let got = block_on(queries.fetch(QueryKey::root("users"), fetcher)).unwrap();
        assert_eq!(got, 2);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn client_errors_are_not_retried_and_are_reported() {
        let queries = QueryClient::new();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let fetcher = move || {
            c.set(c.get() + 1);
            future::ready(Err::<u32, _>(ApiError::Http {
                status: 404,
                body: r#"{"detail":"Deck not found"}"#.into(),
            }))
            .boxed_local()
        };
        let key = QueryKey::root("deck").with("missing");

        let err = block_on(queries.fetch(key.clone(), fetcher)).unwrap_err();
        assert_eq!(err.user_message(), "Deck not found");
        assert_eq!(calls.get(), 1);
        match queries.status(&key) {
            QueryStatus::Error(normalized) => {
                assert_eq!(normalized.messages, vec!["Deck not found".to_string()])
            }
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[test]
    fn concurrent_reads_share_one_request() {
        let queries = QueryClient::new();
        let calls = Rc::new(Cell::new(0));
        let gate = Rc::new(Cell::new(false));
        let key = QueryKey::root("decks").with("ADMIN").with(1);

        let make = || {
            let calls = calls.clone();
            let gate = gate.clone();
            move || {
                calls.set(calls.get() + 1);
                let gate = gate.clone();
                future::poll_fn(move |_| {
                    if gate.get() {
                        Poll::Ready(Ok::<_, ApiError>(vec![1u32, 2]))
                    } else {
                        Poll::Pending
                    }
                })
                .boxed_local()
            }
        };

        let a = queries.fetch(key.clone(), make()).boxed_local();
        let b = queries.fetch(key.clone(), make()).boxed_local();
        let both = future::join(a, b);
        futures_util::pin_mut!(both);

        let waker = futures_util::task::noop_waker();
        let mut cx = std::task::Context::from_waker(&waker);
        assert!(both.as_mut().poll(&mut cx).is_pending());
        assert!(queries.is_fetching(&key));

        gate.set(true);
        let (ra, rb) = match both.as_mut().poll(&mut cx) {
            Poll::Ready(out) => out,
            Poll::Pending => panic!("shared fetch did not complete"),
        };
        assert_eq!(ra.unwrap(), vec![1, 2]);
        assert_eq!(rb.unwrap(), vec![1, 2]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn results_invalidated_mid_flight_are_not_stored() {
        let queries = QueryClient::new();
        let gate = Rc::new(Cell::new(false));
        let key = QueryKey::root("courses");

        let g = gate.clone();
        let slow = queries.fetch(key.clone(), move || {
            let g = g.clone();
            future::poll_fn(move |_| {
                if g.get() {
                    Poll::Ready(Ok::<_, ApiError>("old"))
                } else {
                    Poll::Pending
                }
            })
            .boxed_local()
        });
        futures_util::pin_mut!(slow);
        let waker = futures_util::task::noop_waker();
        let mut cx = std::task::Context::from_waker(&waker);
        assert!(slow.as_mut().poll(&mut cx).is_pending());

        queries.invalidate(&QueryKey::root("courses"));
        gate.set(true);
        assert!(matches!(slow.as_mut().poll(&mut cx), Poll::Ready(Ok("old"))));
        assert_eq!(queries.status(&key), QueryStatus::Idle);

        let fresh = block_on(queries.fetch(key, || future::ready(Ok::<_, ApiError>("new"))));
        assert_eq!(fresh.unwrap(), "new");
    }

    #[test]
    fn mutations_invalidate_only_on_success() {
        let queries = QueryClient::new();
        let key = QueryKey::root("decks").with("TEACHER").with(3);
        queries.set(key.clone(), 1u32);

        let failed = block_on(queries.mutate(
            future::ready(Err::<(), _>(ApiError::Network("down".into()))),
            &[QueryKey::root("decks")],
        ));
        assert!(failed.is_err());
        assert_eq!(queries.get::<u32>(&key), Some(1));

        let ok = block_on(queries.mutate(future::ready(Ok::<_, ApiError>(())), &[QueryKey::root("decks")]));
        assert!(ok.is_ok());
        assert_eq!(queries.get::<u32>(&key), None);
    }

    #[test]
    fn clear_forgets_everything() {
        let queries = QueryClient::new();
        queries.set(QueryKey::root("a"), 1u8);
        queries.set(QueryKey::root("b"), 2u8);
        let before = queries.revision();
        queries.clear();
        assert!(queries.is_empty());
        assert!(queries.revision() > before);
    }
}
