//! MIDI note-on decoding
//!
//! Raw messages are parsed with `midly`'s live-event parser. Only note-on
//! messages with a non-zero velocity and a mapped key produce a symbol.

use midly::live::LiveEvent;
use midly::MidiMessage;

/// Lowest MIDI note with a symbol (middle C)
pub const FIRST_MAPPED_NOTE: u8 = 60;
/// Highest MIDI note with a symbol
pub const LAST_MAPPED_NOTE: u8 = 104;

/// Symbol for a MIDI note number: 60-85 map to `a`-`z`, 86-104 to `A`-`S`
pub fn symbol_for_note(note: u8) -> Option<char> {
    match note {
        60..=85 => Some(char::from(b'a' + (note - 60))),
        86..=104 => Some(char::from(b'A' + (note - 86))),
        _ => None,
    }
}

/// Inverse of [`symbol_for_note`]
pub fn note_for_symbol(symbol: char) -> Option<u8> {
    match symbol {
        'a'..='z' => Some(60 + (symbol as u8 - b'a')),
        'A'..='S' => Some(86 + (symbol as u8 - b'A')),
        _ => None,
    }
}

/// A note-on event that survived decoding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteOn {
    pub channel: u8,
    pub key: u8,
    pub velocity: u8,
}

/// Decode a raw message into a note-on. Note-on with velocity 0 is a
/// note-off by convention and yields `None`, as do all other messages and
/// malformed bytes.
pub fn decode_note_on(bytes: &[u8]) -> Option<NoteOn> {
    match LiveEvent::parse(bytes) {
        Ok(LiveEvent::Midi {
            channel,
            message: MidiMessage::NoteOn { key, vel },
        }) if vel.as_int() > 0 => Some(NoteOn {
            channel: channel.as_int(),
            key: key.as_int(),
            velocity: vel.as_int(),
        }),
        Ok(_) => None,
        Err(e) => {
            log::debug!("ignoring malformed MIDI message {:02X?}: {}", bytes, e);
            None
        }
    }
}
