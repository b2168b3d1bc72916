//! Keyboard and MIDI input
//!
//! - `midi`: note-on decoding and the note-to-symbol table
//! - `router`: suppression rules and classification into commands
//! - `subscription`: scoped listener subscriptions

pub mod midi;
pub mod router;
pub mod subscription;

pub use midi::{decode_note_on, note_for_symbol, symbol_for_note, NoteOn};
pub use router::{InputCommand, InputContext, InputRouter, KeyInput, MidiAccess, Suppression};
pub use subscription::{InputSource, InputSubscription, ListenerTracker};
