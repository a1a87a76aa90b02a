use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::concept::IdHasher;
use crate::error::{Result, SubsumeError};
use crate::frame::Frame;
use crate::result::Identity;

/// Lookup of the authoritative stored version of an instance.
///
/// The store is normally built after the matching pipeline, which is why
/// customisers only receive it when the pipeline is initialised.
pub trait Store {
    fn resolve(&self, identity: &Identity) -> Result<Arc<Frame>>;
}

// ------------- FrameKeeper -------------
/// In-memory store owning one frame per identity.
#[derive(Debug, Default)]
pub struct FrameKeeper {
    kept: RwLock<HashMap<u64, Arc<Frame>, IdHasher>>,
}

impl FrameKeeper {
    pub fn new() -> Self {
        Self::default()
    }
    /// Keeps the frame under the identity, replacing any earlier version.
    pub fn keep(&self, identity: Identity, frame: Frame) -> Result<Arc<Frame>> {
        let keepsake = Arc::new(frame);
        self.kept
            .write()
            .map_err(|e| SubsumeError::Lock(e.to_string()))?
            .insert(identity.id(), Arc::clone(&keepsake));
        Ok(keepsake)
    }
    pub fn release(&self, identity: &Identity) -> Result<bool> {
        Ok(self
            .kept
            .write()
            .map_err(|e| SubsumeError::Lock(e.to_string()))?
            .remove(&identity.id())
            .is_some())
    }
    pub fn len(&self) -> Result<usize> {
        Ok(self
            .kept
            .read()
            .map_err(|e| SubsumeError::Lock(e.to_string()))?
            .len())
    }
}

impl Store for FrameKeeper {
    fn resolve(&self, identity: &Identity) -> Result<Arc<Frame>> {
        let kept = self
            .kept
            .read()
            .map_err(|e| SubsumeError::Lock(e.to_string()))?;
        match kept.get(&identity.id()) {
            Some(frame) => Ok(Arc::clone(frame)),
            None => Err(SubsumeError::UnknownIdentity(identity.to_string())),
        }
    }
}
