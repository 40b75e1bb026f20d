//! Hand-off of the latest detection result between the perception thread
//! and the render loop.
//!
//! Frames are published whole behind an `Arc`, so a reader only ever sees a
//! complete frame from some recent detection cycle, never one being filled in.

use crate::landmarks::LandmarkFrame;
use std::sync::{Arc, Mutex, PoisonError};

/// Shared slot holding the most recent detection result
#[derive(Debug, Clone, Default)]
pub struct LatestFrameSlot {
    inner: Arc<Mutex<Option<Arc<LandmarkFrame>>>>,
}

impl LatestFrameSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored result; `None` records a cycle with no face
    pub fn publish(&self, frame: Option<LandmarkFrame>) {
        let frame = frame.map(Arc::new);
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = frame;
    }

    /// Most recent result, if a face was found in it
    #[must_use]
    pub fn latest(&self) -> Option<Arc<LandmarkFrame>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Drop the stored result
    pub fn clear(&self) {
        self.publish(None);
    }
}
