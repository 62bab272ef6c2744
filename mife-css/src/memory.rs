//! In-memory document.
//!
//! A headless [`Document`] that records links, head membership, attributes
//! and listeners. Events never fire on their own: callers decide when a
//! stylesheet loads or fails with [`MemoryDocument::fire_load`] and
//! [`MemoryDocument::fire_error`]. Used by the simulator and the tests.

use crate::document::{
    Document, HeadObservation, LinkEvent, LinkEventKind, LinkListener, LinkRef, ListenerId,
    NodeAddedCallback, StylesheetLink,
};
use crate::lock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A link node living in a [`MemoryDocument`].
pub struct MemoryLink {
    id: u64,
    href: String,
    rel: String,
    state: Mutex<LinkState>,
}

#[derive(Default)]
struct LinkState {
    attributes: BTreeMap<String, String>,
    disabled: bool,
    listeners: Vec<(ListenerId, LinkEventKind, LinkListener)>,
    next_listener: u64,
}

impl MemoryLink {
    fn new(id: u64, href: &str, rel: &str) -> Self {
        Self {
            id,
            href: href.to_string(),
            rel: rel.to_string(),
            state: Mutex::default(),
        }
    }

    /// Creation order within the owning document, starting at 1.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of listeners currently registered.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        lock(&self.state).listeners.len()
    }

    /// Dispatches `event` to the listeners registered for its kind. Returns
    /// how many were invoked.
    pub fn fire(&self, event: &LinkEvent) -> usize {
        let kind = event.kind();
        let candidates: Vec<(ListenerId, LinkListener)> = lock(&self.state)
            .listeners
            .iter()
            .filter(|(_, listener_kind, _)| *listener_kind == kind)
            .map(|(id, _, listener)| (*id, Arc::clone(listener)))
            .collect();

        let mut invoked = 0;
        for (id, listener) in candidates {
            // An earlier listener may have deregistered this one.
            let registered = lock(&self.state)
                .listeners
                .iter()
                .any(|(known, _, _)| *known == id);
            if registered {
                listener(event);
                invoked += 1;
            }
        }
        invoked
    }
}

impl StylesheetLink for MemoryLink {
    fn href(&self) -> String {
        self.href.clone()
    }

    fn rel(&self) -> String {
        self.rel.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        lock(&self.state).attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        lock(&self.state)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn is_disabled(&self) -> bool {
        lock(&self.state).disabled
    }

    fn set_disabled(&self, disabled: bool) {
        lock(&self.state).disabled = disabled;
    }

    fn add_listener(&self, kind: LinkEventKind, listener: LinkListener) -> ListenerId {
        let mut state = lock(&self.state);
        state.next_listener += 1;
        let id = ListenerId(state.next_listener);
        state.listeners.push((id, kind, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        lock(&self.state).listeners.retain(|(known, _, _)| *known != id);
    }
}

/// One row of [`MemoryDocument::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadEntry {
    pub id: u64,
    pub href: String,
    pub disabled: bool,
    pub owned: bool,
}

type ObserverRegistry = Arc<Mutex<Vec<(u64, NodeAddedCallback)>>>;

/// Headless document with a single `<head>`.
#[derive(Default)]
pub struct MemoryDocument {
    state: Mutex<DocumentState>,
    observers: ObserverRegistry,
    next_id: AtomicU64,
    next_observer: AtomicU64,
}

#[derive(Default)]
struct DocumentState {
    created: Vec<Arc<MemoryLink>>,
    head: Vec<Arc<MemoryLink>>,
}

impl MemoryDocument {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates a link with an arbitrary `rel`, detached.
    pub fn create_link_with_rel(&self, href: &str, rel: &str) -> Arc<MemoryLink> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let link = Arc::new(MemoryLink::new(id, href, rel));
        lock(&self.state).created.push(Arc::clone(&link));
        link
    }

    /// Appends a stylesheet the engine did not create, as the bundler's code
    /// splitting would.
    pub fn inject_stylesheet(&self, href: &str) -> Arc<MemoryLink> {
        let link = self.create_link_with_rel(href, "stylesheet");
        let link_ref: LinkRef = link.clone();
        self.append_to_head(&link_ref);
        link
    }

    /// Links currently in the head, in document order.
    pub fn head(&self) -> Vec<Arc<MemoryLink>> {
        lock(&self.state).head.clone()
    }

    /// Every link ever created, in creation order.
    pub fn created(&self) -> Vec<Arc<MemoryLink>> {
        lock(&self.state).created.clone()
    }

    /// Links whose href contains `fragment`, in creation order.
    pub fn find(&self, fragment: &str) -> Vec<Arc<MemoryLink>> {
        lock(&self.state)
            .created
            .iter()
            .filter(|link| link.href.contains(fragment))
            .cloned()
            .collect()
    }

    /// Fires `load` on the most recently created link whose href contains
    /// `fragment`. Returns false if there is no such link.
    pub fn fire_load(&self, fragment: &str) -> bool {
        self.fire_latest(fragment, &LinkEvent::Load)
    }

    /// Fires `error` on the most recently created link whose href contains
    /// `fragment`. Returns false if there is no such link.
    pub fn fire_error(&self, fragment: &str, message: &str) -> bool {
        let event = LinkEvent::Error {
            message: message.to_string(),
        };
        self.fire_latest(fragment, &event)
    }

    fn fire_latest(&self, fragment: &str, event: &LinkEvent) -> bool {
        match self.find(fragment).pop() {
            Some(link) => {
                link.fire(event);
                true
            }
            None => false,
        }
    }

    /// Number of live head observations.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        lock(&self.observers).len()
    }

    pub fn snapshot(&self) -> Vec<HeadEntry> {
        self.head()
            .iter()
            .map(|link| HeadEntry {
                id: link.id,
                href: link.href.clone(),
                disabled: link.is_disabled(),
                owned: link.attribute(crate::link::OWNERSHIP_ATTRIBUTE).is_some(),
            })
            .collect()
    }

    fn resolve(&self, link: &LinkRef) -> Option<Arc<MemoryLink>> {
        lock(&self.state)
            .created
            .iter()
            .find(|known| std::ptr::addr_eq(Arc::as_ptr(*known), Arc::as_ptr(link)))
            .cloned()
    }
}

impl Document for MemoryDocument {
    fn create_link(&self, href: &str) -> LinkRef {
        self.create_link_with_rel(href, "stylesheet")
    }

    fn append_to_head(&self, link: &LinkRef) {
        let Some(node) = self.resolve(link) else {
            return;
        };
        {
            let mut state = lock(&self.state);
            state.head.retain(|known| !Arc::ptr_eq(known, &node));
            state.head.push(node);
        }
        let observers: Vec<NodeAddedCallback> = lock(&self.observers)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in observers {
            callback(link);
        }
    }

    fn remove_from_head(&self, link: &LinkRef) {
        if let Some(node) = self.resolve(link) {
            lock(&self.state)
                .head
                .retain(|known| !Arc::ptr_eq(known, &node));
        }
    }

    fn observe_head(&self, on_added: NodeAddedCallback) -> Box<dyn HeadObservation> {
        let id = self.next_observer.fetch_add(1, Ordering::Relaxed);
        lock(&self.observers).push((id, on_added));
        Box::new(MemoryObservation {
            id,
            observers: Arc::clone(&self.observers),
        })
    }
}

struct MemoryObservation {
    id: u64,
    observers: ObserverRegistry,
}

impl HeadObservation for MemoryObservation {
    fn disconnect(&mut self) {
        lock(&self.observers).retain(|(id, _)| *id != self.id);
    }
}
