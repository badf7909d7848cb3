//! Ordered playback queue for the main view.
//!
//! Only the selected entry's media ever leaves the main view, as a source
//! update to the miniplayer.

mod error;

use std::path::PathBuf;

pub use error::QueueError;
use tracing::debug;

use crate::services::sync::MediaSource;

/// One video in the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoQueueEntry {
    /// Display name
    pub name: String,
    /// Media reference handed to the media element
    pub source: MediaSource,
    /// File the media was loaded from, if any; used for subtitle extraction
    pub origin_file: Option<PathBuf>,
}

impl VideoQueueEntry {
    /// Entry for media with no backing file.
    pub fn new(name: impl Into<String>, source: MediaSource) -> Self {
        Self {
            name: name.into(),
            source,
            origin_file: None,
        }
    }

    /// Entry for a local file, named after the file.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let source = MediaSource::new(format!("file://{}", path.display()));

        Self {
            name,
            source,
            origin_file: Some(path),
        }
    }
}

/// Videos in playback order, with at most one selected.
///
/// The selection follows its entry through removals and reorders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoQueue {
    entries: Vec<VideoQueueEntry>,
    selected: Option<usize>,
}

impl VideoQueue {
    /// Empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in playback order
    pub fn entries(&self) -> &[VideoQueueEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the selected entry
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The selected entry
    pub fn selected(&self) -> Option<&VideoQueueEntry> {
        self.selected.and_then(|index| self.entries.get(index))
    }

    /// Append an entry, returning its index.
    pub fn add(&mut self, entry: VideoQueueEntry) -> usize {
        debug!(name = %entry.name, "Queued video");
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Remove the entry at `index`.
    ///
    /// Removing the selected entry clears the selection.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::IndexOutOfRange` if there is no such entry.
    pub fn remove(&mut self, index: usize) -> Result<VideoQueueEntry, QueueError> {
        self.check(index)?;
        let entry = self.entries.remove(index);

        self.selected = match self.selected {
            Some(selected) if selected == index => None,
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
        Ok(entry)
    }

    /// Move the entry at `from` so it ends up at `to`.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::IndexOutOfRange` if either index is past the end.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), QueueError> {
        self.check(from)?;
        self.check(to)?;

        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);

        self.selected = self.selected.map(|selected| {
            if selected == from {
                to
            } else if from < selected && selected <= to {
                selected - 1
            } else if to <= selected && selected < from {
                selected + 1
            } else {
                selected
            }
        });
        Ok(())
    }

    /// Select the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::IndexOutOfRange` if there is no such entry.
    pub fn select(&mut self, index: usize) -> Result<&VideoQueueEntry, QueueError> {
        self.check(index)?;
        self.selected = Some(index);
        Ok(&self.entries[index])
    }

    /// Select the entry after the current one. Stops at the end.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Empty` for an empty queue.
    pub fn next(&mut self) -> Result<Option<&VideoQueueEntry>, QueueError> {
        if self.entries.is_empty() {
            return Err(QueueError::Empty);
        }
        let next = self.selected.map_or(0, |selected| selected + 1);
        if next >= self.entries.len() {
            return Ok(None);
        }
        self.selected = Some(next);
        Ok(self.entries.get(next))
    }

    /// Select the entry before the current one. Stops at the start.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Empty` for an empty queue.
    pub fn previous(&mut self) -> Result<Option<&VideoQueueEntry>, QueueError> {
        if self.entries.is_empty() {
            return Err(QueueError::Empty);
        }
        match self.selected {
            Some(selected) if selected > 0 => {
                self.selected = Some(selected - 1);
                Ok(self.entries.get(selected - 1))
            }
            _ => Ok(None),
        }
    }

    /// Remove every entry playing `source`, e.g. after it turned out to be
    /// unsupported. Returns how many were removed.
    pub fn evict(&mut self, source: &MediaSource) -> usize {
        let mut removed = 0;
        let mut index = 0;
        while index < self.entries.len() {
            if &self.entries[index].source == source {
                let _ = self.remove(index);
                removed += 1;
            } else {
                index += 1;
            }
        }
        if removed > 0 {
            debug!(%source, removed, "Evicted unsupported media from queue");
        }
        removed
    }

    fn check(&self, index: usize) -> Result<(), QueueError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(QueueError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }
}
