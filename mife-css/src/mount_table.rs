//! Reference-counted mount table.
//!
//! One [`MountRecord`] per logical CSS file counts how many mounted consumers
//! need it. The first mount creates and loads the link, the last unmount
//! disables it, and every later mount re-enables the same link.

use crate::document::LinkRef;
use crate::link::{ready_ok, LinkController, PendingLoad};
use crate::logger::Logger;
use mife_css_types::CssFileName;
use std::collections::HashMap;

/// Bookkeeping for one logical CSS file.
#[derive(Default)]
pub struct MountRecord {
    count: u32,
    link: Option<LinkRef>,
}

impl MountRecord {
    /// Number of mounts not yet matched by an unmount.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// The link, present once the file has been mounted at least once.
    #[must_use]
    pub fn link(&self) -> Option<&LinkRef> {
        self.link.as_ref()
    }
}

/// Mount records keyed by file. Records are never removed.
#[derive(Default)]
pub struct MountTable {
    records: HashMap<CssFileName, MountRecord>,
}

impl MountTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more consumer of `file`.
    ///
    /// The first mount ever creates the link, appends it to the head and
    /// returns its pending load. Any other mount enables the existing link and
    /// returns a ready `Ok`: re-enabling a stylesheet fires no new `load`.
    pub fn request_mount(&mut self, file: &CssFileName, controller: &LinkController) -> PendingLoad {
        let record = self.records.entry(file.clone()).or_default();
        record.count += 1;
        if let Some(link) = &record.link {
            controller.enable(link);
            return ready_ok();
        }
        let link = controller.create(file);
        controller.insert(&link);
        let pending = controller.wire(&link, file);
        record.link = Some(link);
        pending
    }

    /// Releases one consumer of `file`, disabling its link at zero.
    ///
    /// Unknown files and counts already at zero are caller bugs; they are
    /// logged and otherwise ignored.
    pub fn request_unmount(&mut self, file: &CssFileName, logger: &Logger) {
        let Some(record) = self.records.get_mut(file) else {
            logger.warn(format_args!(
                "A request to unmount CSS file {file} was made, but said file has no file map."
            ));
            return;
        };
        if record.count == 0 {
            logger.warn(format_args!(
                "A request to unmount CSS file {file} was made, but its count is already 0."
            ));
            return;
        }
        record.count -= 1;
        if record.count == 0 {
            if let Some(link) = &record.link {
                link.set_disabled(true);
            }
        }
    }

    #[must_use]
    pub fn record(&self, file: &str) -> Option<&MountRecord> {
        self.records.get(file)
    }

    /// Current count for `file`; unknown files count zero.
    #[must_use]
    pub fn count(&self, file: &str) -> u32 {
        self.records.get(file).map_or(0, MountRecord::count)
    }

    /// True while any file has a positive count.
    #[must_use]
    pub fn any_mounted(&self) -> bool {
        self.records.values().any(|record| record.count > 0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
