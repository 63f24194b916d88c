//! Shared, hot-swappable tuning snapshot.

use bevy::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::data::GameContent;

#[derive(Debug)]
struct SettingsInner {
    content: RwLock<Arc<GameContent>>,
    generation: AtomicU64,
}

/// Cloneable handle to the current tuning content.
///
/// Replacing the content bumps a generation counter; each consumer keeps a
/// [`SettingsWatch`] to notice the change on its next update.
#[derive(Resource, Debug, Clone)]
pub struct SettingsHandle {
    inner: Arc<SettingsInner>,
}

impl SettingsHandle {
    pub fn new(content: GameContent) -> Self {
        Self {
            inner: Arc::new(SettingsInner {
                content: RwLock::new(Arc::new(content)),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn current(&self) -> Arc<GameContent> {
        match self.inner.content.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    pub fn replace(&self, content: GameContent) {
        let next = Arc::new(content);
        match self.inner.content.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
    }

    pub fn watch(&self) -> SettingsWatch {
        SettingsWatch {
            handle: self.clone(),
            seen: self.generation(),
        }
    }
}

impl Default for SettingsHandle {
    fn default() -> Self {
        Self::new(GameContent::with_defaults())
    }
}

/// Per-consumer change tracker for a [`SettingsHandle`].
#[derive(Debug, Clone)]
pub struct SettingsWatch {
    handle: SettingsHandle,
    seen: u64,
}

impl SettingsWatch {
    pub fn current(&self) -> Arc<GameContent> {
        self.handle.current()
    }

    /// Returns the new content once per replacement.
    pub fn changed(&mut self) -> Option<Arc<GameContent>> {
        let generation = self.handle.generation();
        if generation == self.seen {
            return None;
        }
        self.seen = generation;
        Some(self.handle.current())
    }
}
