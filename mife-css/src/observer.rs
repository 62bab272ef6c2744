//! Foreign stylesheet observer.
//!
//! The bundler's own code splitting may append stylesheets for this project
//! that the engine did not create. They are recognised by the project's URL
//! marker plus the absence of the ownership attribute, and are then enabled
//! and disabled in bulk alongside the engine's own links.

use crate::document::{same_link, Document, HeadObservation, LinkRef};
use crate::link::OWNERSHIP_ATTRIBUTE;
use crate::lock;
use mife_css_types::ProjectId;
use std::sync::{Arc, Mutex};

/// Returns true if `link` is a stylesheet of this project that the engine
/// does not own.
#[must_use]
pub fn is_foreign(link: &LinkRef, project_id: &ProjectId) -> bool {
    link.rel().eq_ignore_ascii_case("stylesheet")
        && project_id.tags(&link.href())
        && link.attribute(OWNERSHIP_ATTRIBUTE).is_none()
}

/// Foreign links detected so far, plus the bulk enable gate.
#[derive(Default)]
pub struct ForeignLinks {
    links: Vec<LinkRef>,
    mounted: bool,
}

impl ForeignLinks {
    /// Adds a link unless it is already known. Returns true if added.
    pub fn insert(&mut self, link: LinkRef) -> bool {
        if self.links.iter().any(|known| same_link(known, &link)) {
            return false;
        }
        self.links.push(link);
        true
    }

    pub fn links(&self) -> &[LinkRef] {
        &self.links
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Whether the gate is open (links enabled in bulk).
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Enables every link and opens the gate.
    pub fn enable_all(&mut self) {
        for link in &self.links {
            link.set_disabled(false);
        }
        self.mounted = true;
    }

    /// Disables every link and closes the gate.
    pub fn disable_all(&mut self) {
        for link in &self.links {
            link.set_disabled(true);
        }
        self.mounted = false;
    }

    /// Removes every link from the document and forgets them.
    pub fn detach_all(&mut self, document: &dyn Document) {
        for link in self.links.drain(..) {
            document.remove_from_head(&link);
        }
        self.mounted = false;
    }
}

/// Watches the document head for foreign stylesheets of one project.
pub struct ForeignStylesheetObserver {
    document: Arc<dyn Document>,
    project_id: ProjectId,
    foreign: Arc<Mutex<ForeignLinks>>,
    observation: Option<Box<dyn HeadObservation>>,
}

impl ForeignStylesheetObserver {
    pub fn new(document: Arc<dyn Document>, project_id: ProjectId) -> Self {
        Self {
            document,
            project_id,
            foreign: Arc::default(),
            observation: None,
        }
    }

    /// Disconnects any running observation and starts a new one. The set of
    /// known foreign links is kept; see [`Self::detach_all`] to drop it.
    pub fn restart(&mut self) {
        self.stop();
        let foreign = Arc::clone(&self.foreign);
        let project_id = self.project_id.clone();
        let observation = self.document.observe_head(Arc::new(move |link: &LinkRef| {
            if is_foreign(link, &project_id) {
                lock(&foreign).insert(Arc::clone(link));
            }
        }));
        self.observation = Some(observation);
    }

    pub fn stop(&mut self) {
        if let Some(mut observation) = self.observation.take() {
            observation.disconnect();
        }
    }

    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observation.is_some()
    }

    /// Shared handle to the detected links.
    pub fn foreign(&self) -> &Arc<Mutex<ForeignLinks>> {
        &self.foreign
    }

    /// Removes every known foreign link from the head and forgets them.
    pub fn detach_all(&self) {
        lock(&self.foreign).detach_all(self.document.as_ref());
    }
}

impl Drop for ForeignStylesheetObserver {
    fn drop(&mut self) {
        self.stop();
    }
}
