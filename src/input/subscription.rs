//! Scoped input subscriptions
//!
//! Enabling keyboard or MIDI input acquires an [`InputSubscription`]. The
//! guard marks its source live in a [`ListenerTracker`] and clears the mark
//! when dropped, so a listener can never outlive the mode or the editor that
//! owns it. Hosts read the tracker to attach and detach their real listeners.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum InputSource {
    Keyboard,
    Midi,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Keyboard => write!(f, "keyboard"),
            InputSource::Midi => write!(f, "MIDI"),
        }
    }
}

/// Shared view of which sources hold a live subscription
#[derive(Clone, Debug, Default)]
pub struct ListenerTracker {
    keyboard: Arc<AtomicBool>,
    midi: Arc<AtomicBool>,
}

impl ListenerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self, source: InputSource) -> &Arc<AtomicBool> {
        match source {
            InputSource::Keyboard => &self.keyboard,
            InputSource::Midi => &self.midi,
        }
    }

    pub fn is_live(&self, source: InputSource) -> bool {
        self.flag(source).load(Ordering::SeqCst)
    }

    /// Acquire a subscription for `source`
    pub fn subscribe(&self, source: InputSource) -> InputSubscription {
        let flag = Arc::clone(self.flag(source));
        flag.store(true, Ordering::SeqCst);
        log::debug!("{} listener attached", source);
        InputSubscription { source, flag }
    }
}

/// Live subscription; releasing it (drop) detaches the listener
#[derive(Debug)]
pub struct InputSubscription {
    source: InputSource,
    flag: Arc<AtomicBool>,
}

impl InputSubscription {
    pub fn source(&self) -> InputSource {
        self.source
    }
}

impl Drop for InputSubscription {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
        log::debug!("{} listener released", self.source);
    }
}
