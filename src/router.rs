//! Client-side routing.
//!
//! Paths are matched, in order, against:
//! - `/dna/:dna` - detail view for one installed DNA
//! - `/publish-zome` - zome publishing workflow
//! - `*` - home
//!
//! A [`Router`] owns the current [`Navigation`] and notifies subscribers
//! synchronously, exactly once each, on every `navigate`/`resolve` call.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::cell::CellId;

const DNA_PREFIX: &str = "/dna/";
const PUBLISH_ZOME_PATH: &str = "/publish-zome";

/// A recognized route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    /// Detail view; `dna` is the serialized DNA hash exactly as it appeared
    /// in the path.
    Dna { dna: String },
    PublishZome,
}

impl Route {
    /// Match a path (optionally with query string or fragment).
    pub fn recognize(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };

        if let Some(dna) = path.strip_prefix(DNA_PREFIX)
            && !dna.is_empty()
            && !dna.contains('/')
        {
            return Route::Dna {
                dna: dna.to_string(),
            };
        }
        if path == PUBLISH_ZOME_PATH {
            return Route::PublishZome;
        }
        Route::Home
    }

    /// Detail route for a cell's DNA.
    pub fn dna(cell_id: &CellId) -> Route {
        Route::Dna {
            dna: cell_id.dna_hash().to_string(),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Dna { dna } => format!("{DNA_PREFIX}{dna}"),
            Route::PublishZome => PUBLISH_ZOME_PATH.to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// One evaluation of the routing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Increases by one on every navigation; later navigations supersede
    /// earlier ones.
    pub seq: u64,
    pub path: String,
    pub route: Route,
}

/// Where navigations are recorded (browser history, or memory).
pub trait Location {
    fn push(&self, path: &str);
}

/// A [`Location`] that keeps pushed paths in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    entries: Rc<RefCell<Vec<String>>>,
}

impl MemoryLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }
}

impl Location for MemoryLocation {
    fn push(&self, path: &str) {
        self.entries.borrow_mut().push(path.to_string());
    }
}

type Listener = Rc<dyn Fn(&Navigation)>;

struct Inner {
    location: Box<dyn Location>,
    current: RefCell<Navigation>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
}

/// The application router. Clones share state.
#[derive(Clone)]
pub struct Router {
    inner: Rc<Inner>,
}

impl Router {
    /// A router positioned at `/` that records navigations in `location`.
    pub fn new(location: impl Location + 'static) -> Self {
        Self {
            inner: Rc::new(Inner {
                location: Box::new(location),
                current: RefCell::new(Navigation {
                    seq: 0,
                    path: "/".to_string(),
                    route: Route::Home,
                }),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    /// Record `path` in the location, then evaluate it.
    pub fn navigate(&self, path: &str) -> Navigation {
        self.inner.location.push(path);
        self.resolve(path)
    }

    /// Evaluate `path` without recording it (initial load, back/forward).
    pub fn resolve(&self, path: &str) -> Navigation {
        let navigation = {
            let mut current = self.inner.current.borrow_mut();
            *current = Navigation {
                seq: current.seq + 1,
                path: path.to_string(),
                route: Route::recognize(path),
            };
            current.clone()
        };
        debug!(seq = navigation.seq, route = %navigation.route, "navigated");

        // Snapshot so listeners may navigate or (un)subscribe re-entrantly.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&navigation);
        }
        navigation
    }

    /// Call `listener` on every future navigation until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(&self, listener: impl Fn(&Navigation) + 'static) -> Subscription {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        Subscription {
            router: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl PartialEq for Router {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("current", &*self.inner.current.borrow())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Keeps a router listener registered; unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    router: Weak<Inner>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.router.upgrade() {
            inner.listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dna(s: &str) -> Route {
        Route::Dna { dna: s.to_string() }
    }

    #[test]
    fn test_recognize_routes() {
        assert_eq!(Route::recognize("/"), Route::Home);
        assert_eq!(Route::recognize(""), Route::Home);
        assert_eq!(Route::recognize("/dna/uhC0kabc"), dna("uhC0kabc"));
        assert_eq!(Route::recognize("/publish-zome"), Route::PublishZome);
        assert_eq!(Route::recognize("/anything/else"), Route::Home);
    }

    #[test]
    fn test_recognize_edge_cases() {
        assert_eq!(Route::recognize("/dna/"), Route::Home);
        assert_eq!(Route::recognize("/dna"), Route::Home);
        assert_eq!(Route::recognize("/dna/a/b"), Route::Home);
        assert_eq!(Route::recognize("/dna/abc/"), dna("abc"));
        assert_eq!(Route::recognize("/dna/abc?x=1#top"), dna("abc"));
        assert_eq!(Route::recognize("/publish-zome/"), Route::PublishZome);
        assert_eq!(Route::recognize("/publish-zome/extra"), Route::Home);
    }

    #[test]
    fn test_path_round_trips_through_recognize() {
        for route in [Route::Home, dna("uhC0kxyz"), Route::PublishZome] {
            assert_eq!(Route::recognize(&route.path()), route);
        }
    }

    #[test]
    fn test_navigate_pushes_and_notifies_once() {
        let location = MemoryLocation::new();
        let router = Router::new(location.clone());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = seen.clone();
            router.subscribe(move |nav| seen.borrow_mut().push(nav.route.clone()))
        };

        router.navigate("/publish-zome");
        router.navigate("/dna/abc");

        assert_eq!(location.entries(), vec!["/publish-zome", "/dna/abc"]);
        assert_eq!(*seen.borrow(), vec![Route::PublishZome, dna("abc")]);
    }

    #[test]
    fn test_resolve_does_not_push() {
        let location = MemoryLocation::new();
        let router = Router::new(location.clone());
        let nav = router.resolve("/publish-zome");
        assert!(location.entries().is_empty());
        assert_eq!(nav.route, Route::PublishZome);
    }

    #[test]
    fn test_same_path_is_reevaluated() {
        let router = Router::new(MemoryLocation::new());
        let count = Rc::new(Cell::new(0));
        let _sub = {
            let count = count.clone();
            router.subscribe(move |_| count.set(count.get() + 1))
        };
        let first = router.navigate("/");
        let second = router.navigate("/");
        assert_eq!(count.get(), 2);
        assert_eq!(second.seq, first.seq + 1);
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let router = Router::new(MemoryLocation::new());
        let count = Rc::new(Cell::new(0));
        let sub = {
            let count = count.clone();
            router.subscribe(move |_| count.set(count.get() + 1))
        };
        router.navigate("/");
        drop(sub);
        router.navigate("/");
        assert_eq!(count.get(), 1);
        assert_eq!(router.subscriber_count(), 0);
    }

    #[test]
    fn test_listener_may_navigate_reentrantly() {
        let location = MemoryLocation::new();
        let router = Router::new(location.clone());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let redirect_router = router.clone();
        let _redirect = router.subscribe(move |nav| {
            if nav.route == Route::PublishZome {
                redirect_router.navigate("/");
            }
        });
        let _record = {
            let seen = seen.clone();
            router.subscribe(move |nav| seen.borrow_mut().push(nav.seq))
        };

        router.navigate("/publish-zome");

        // The redirect runs inside the first notification, so the recorder
        // sees the redirect (seq 2) before the first one (seq 1).
        assert_eq!(*seen.borrow(), vec![2, 1]);
        assert_eq!(location.entries(), vec!["/publish-zome", "/"]);
    }

    #[test]
    fn test_subscription_outliving_router_is_harmless() {
        let router = Router::new(MemoryLocation::new());
        let sub = router.subscribe(|_| {});
        drop(router);
        drop(sub);
    }
}
