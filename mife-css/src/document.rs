//! Host document capability.
//!
//! The engine never touches a concrete DOM. Hosts implement [`Document`] and
//! [`StylesheetLink`] over whatever they render into; tests and the simulator
//! use [`crate::memory::MemoryDocument`].

use std::sync::Arc;

/// Shared handle to a stylesheet link node.
pub type LinkRef = Arc<dyn StylesheetLink>;

/// Callback for link events. Registered per event kind.
pub type LinkListener = Arc<dyn Fn(&LinkEvent) + Send + Sync>;

/// Callback invoked for every link appended to the document head.
pub type NodeAddedCallback = Arc<dyn Fn(&LinkRef) + Send + Sync>;

/// Events a stylesheet link can fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Load,
    Error { message: String },
}

impl LinkEvent {
    #[must_use]
    pub fn kind(&self) -> LinkEventKind {
        match self {
            Self::Load => LinkEventKind::Load,
            Self::Error { .. } => LinkEventKind::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkEventKind {
    Load,
    Error,
}

/// Handle returned by [`StylesheetLink::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A `<link>` node in the host document.
pub trait StylesheetLink: Send + Sync {
    fn href(&self) -> String;

    fn rel(&self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;

    fn set_attribute(&self, name: &str, value: &str);

    fn is_disabled(&self) -> bool;

    /// Disabled stylesheets stay in the document but stop applying.
    fn set_disabled(&self, disabled: bool);

    fn add_listener(&self, kind: LinkEventKind, listener: LinkListener) -> ListenerId;

    /// Removing an unknown listener is a no-op.
    fn remove_listener(&self, id: ListenerId);
}

/// An active head observation. Dropping it without calling
/// [`HeadObservation::disconnect`] leaves it to the host to clean up.
pub trait HeadObservation: Send {
    fn disconnect(&mut self);
}

/// The page document shared by every micro-frontend.
pub trait Document: Send + Sync {
    /// Creates a detached `rel="stylesheet"` link pointing at `href`.
    fn create_link(&self, href: &str) -> LinkRef;

    /// Appends the link to the head. Appending an attached link moves it.
    fn append_to_head(&self, link: &LinkRef);

    /// Removes the link from the head. Detached links are ignored.
    fn remove_from_head(&self, link: &LinkRef);

    /// Starts reporting links appended to the head.
    fn observe_head(&self, on_added: NodeAddedCallback) -> Box<dyn HeadObservation>;
}

/// Node identity: true if both handles point at the same link.
#[must_use]
pub fn same_link(a: &LinkRef, b: &LinkRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
