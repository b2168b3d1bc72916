//! Input router: raw keyboard and MIDI events to placement commands
//!
//! The router owns the keyboard and MIDI subscriptions and the platform MIDI
//! access state. Every event is first checked against the suppression rules,
//! then classified. Qualifying events produce exactly one [`InputCommand`];
//! suppressed or unmapped events produce none.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::drawing::ActiveTool;
use crate::error::{Result, ScoreError};
use crate::models::{Notation, NotationCatalog};

use super::midi::{decode_note_on, symbol_for_note};
use super::subscription::{InputSource, InputSubscription, ListenerTracker};

pub const KEY_DELETE_LAST: &str = "Backspace";
pub const KEY_ADVANCE_LINE: &str = "Enter";

/// Normalized placement command
#[derive(Clone, Debug, PartialEq)]
pub enum InputCommand {
    Place(Arc<Notation>),
    DeleteLast,
    AdvanceLine,
}

/// A key press as reported by the host
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyInput {
    /// Browser key name (`"a"`, `"Enter"`, `"Backspace"`, ...)
    pub key: String,
    /// Focus is inside an input, textarea or contenteditable element
    #[serde(default)]
    pub target_editable: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            target_editable: false,
        }
    }

    pub fn in_editable(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            target_editable: true,
        }
    }
}

/// UI state the suppression rules look at
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct InputContext {
    pub modal_open: bool,
    pub active_tool: ActiveTool,
    pub text_mode: bool,
}

/// Why an event was dropped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Suppression {
    ModalOpen,
    DrawingTool,
    TextMode,
    ModeDisabled,
    EditableFocus,
}

/// Platform MIDI access lifecycle
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(tag = "state", content = "reason", rename_all = "camelCase")]
pub enum MidiAccess {
    #[default]
    Unrequested,
    Pending,
    Ready,
    Unsupported,
    Failed(String),
}

impl MidiAccess {
    pub fn is_ready(&self) -> bool {
        matches!(self, MidiAccess::Ready)
    }
}

#[derive(Debug)]
pub struct InputRouter {
    catalog: NotationCatalog,
    context: InputContext,
    tracker: ListenerTracker,
    keyboard: Option<InputSubscription>,
    midi: Option<InputSubscription>,
    midi_access: MidiAccess,
}

impl InputRouter {
    pub fn new(catalog: NotationCatalog) -> Self {
        Self {
            catalog,
            context: InputContext::default(),
            tracker: ListenerTracker::new(),
            keyboard: None,
            midi: None,
            midi_access: MidiAccess::default(),
        }
    }

    pub fn catalog(&self) -> &NotationCatalog {
        &self.catalog
    }

    pub fn set_catalog(&mut self, catalog: NotationCatalog) {
        self.catalog = catalog;
    }

    pub fn context(&self) -> InputContext {
        self.context
    }

    pub fn set_context(&mut self, context: InputContext) {
        self.context = context;
    }

    pub fn set_active_tool(&mut self, tool: ActiveTool) {
        self.context.active_tool = tool;
    }

    pub fn tracker(&self) -> &ListenerTracker {
        &self.tracker
    }

    pub fn is_enabled(&self, source: InputSource) -> bool {
        match source {
            InputSource::Keyboard => self.keyboard.is_some(),
            InputSource::Midi => self.midi.is_some(),
        }
    }

    pub fn enable_keyboard(&mut self) {
        if self.keyboard.is_none() {
            self.keyboard = Some(self.tracker.subscribe(InputSource::Keyboard));
        }
    }

    pub fn disable_keyboard(&mut self) {
        self.keyboard = None;
    }

    /// Turn MIDI input on. Refused until platform access is ready.
    pub fn enable_midi(&mut self) -> Result<()> {
        match &self.midi_access {
            MidiAccess::Ready => {
                if self.midi.is_none() {
                    self.midi = Some(self.tracker.subscribe(InputSource::Midi));
                }
                Ok(())
            }
            MidiAccess::Unsupported => Err(ScoreError::MidiUnavailable(
                "Web MIDI is not supported on this platform".to_string(),
            )),
            MidiAccess::Failed(reason) => Err(ScoreError::MidiUnavailable(reason.clone())),
            MidiAccess::Unrequested | MidiAccess::Pending => Err(ScoreError::MidiUnavailable(
                "MIDI access has not been granted yet".to_string(),
            )),
        }
    }

    pub fn disable_midi(&mut self) {
        self.midi = None;
    }

    pub fn midi_access(&self) -> &MidiAccess {
        &self.midi_access
    }

    pub fn midi_access_requested(&mut self) {
        if !matches!(self.midi_access, MidiAccess::Ready) {
            self.midi_access = MidiAccess::Pending;
        }
    }

    /// Platform granted MIDI access; MIDI input starts delivering
    pub fn midi_access_granted(&mut self) {
        log::info!("MIDI access granted");
        self.midi_access = MidiAccess::Ready;
        if self.midi.is_none() {
            self.midi = Some(self.tracker.subscribe(InputSource::Midi));
        }
    }

    /// Permission or device failure. MIDI mode stays off; no retry.
    pub fn midi_access_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("MIDI access failed: {}", reason);
        self.midi_access = MidiAccess::Failed(reason);
        self.midi = None;
    }

    pub fn midi_unsupported(&mut self) {
        log::warn!("Web MIDI API not supported; MIDI input disabled");
        self.midi_access = MidiAccess::Unsupported;
        self.midi = None;
    }

    /// First suppression rule that applies to `source`, if any
    pub fn suppression(&self, source: InputSource) -> Option<Suppression> {
        if self.context.modal_open {
            Some(Suppression::ModalOpen)
        } else if self.context.active_tool.is_drawing() {
            Some(Suppression::DrawingTool)
        } else if self.context.text_mode {
            Some(Suppression::TextMode)
        } else if !self.is_enabled(source) || !self.tracker.is_live(source) {
            Some(Suppression::ModeDisabled)
        } else {
            None
        }
    }

    /// Classify a key press
    pub fn route_key(&self, input: &KeyInput) -> Option<InputCommand> {
        if input.target_editable {
            return None;
        }
        if let Some(reason) = self.suppression(InputSource::Keyboard) {
            log::debug!("key {:?} suppressed: {:?}", input.key, reason);
            return None;
        }

        match input.key.as_str() {
            KEY_DELETE_LAST => Some(InputCommand::DeleteLast),
            KEY_ADVANCE_LINE => Some(InputCommand::AdvanceLine),
            key => self.catalog.by_key_name(key).map(InputCommand::Place),
        }
    }

    /// Classify a raw MIDI message
    pub fn route_midi(&self, bytes: &[u8]) -> Option<InputCommand> {
        if let Some(reason) = self.suppression(InputSource::Midi) {
            log::debug!("MIDI message suppressed: {:?}", reason);
            return None;
        }

        let note_on = decode_note_on(bytes)?;
        let symbol = symbol_for_note(note_on.key)?;
        self.catalog.by_key(symbol).map(InputCommand::Place)
    }
}
