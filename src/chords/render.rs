//! Chord renderers: a pitch set plus a duration becomes timed note events.
//!
//! Two built-in strategies, resolvable by name through [`RendererRegistry`]:
//! `simultaneous` (block chord) and `arpeggio`.

use crate::error::TonalError;
use crate::midi::{MidiEvent, DEFAULT_VELOCITY};
use std::collections::HashMap;

/// Strategy for turning a chord's pitches into note-on/note-off events
/// appended to `track`.
pub trait ChordRenderer: Send + Sync {
    fn render(&self, pitches: &[u8], track: &mut Vec<MidiEvent>, duration: u32);
}

/// All pitches attack at once and release together after `duration` ticks:
/// the first note-off carries the full duration, the rest land on the same
/// tick with zero delta.
#[derive(Debug, Clone, Copy)]
pub struct Simultaneous {
    pub velocity: u8,
}

impl Default for Simultaneous {
    fn default() -> Self {
        Self {
            velocity: DEFAULT_VELOCITY,
        }
    }
}

impl ChordRenderer for Simultaneous {
    fn render(&self, pitches: &[u8], track: &mut Vec<MidiEvent>, duration: u32) {
        for &pitch in pitches {
            track.push(MidiEvent::note_on(pitch, self.velocity, 0));
        }
        let mut pitches = pitches.iter();
        if let Some(&first) = pitches.next() {
            track.push(MidiEvent::note_off(first, self.velocity, duration));
            for &pitch in pitches {
                track.push(MidiEvent::note_off(pitch, self.velocity, 0));
            }
        }
    }
}

/// Pitches sound one after another in even slices of the duration.
///
/// The slice is `duration / pitches.len()` with integer division; the
/// remainder is dropped, so the figure can come up short by as much as
/// `pitches.len() - 1` ticks. Known limitation.
#[derive(Debug, Clone, Copy)]
pub struct Arpeggio {
    pub velocity: u8,
}

impl Default for Arpeggio {
    fn default() -> Self {
        Self {
            velocity: DEFAULT_VELOCITY,
        }
    }
}

impl ChordRenderer for Arpeggio {
    fn render(&self, pitches: &[u8], track: &mut Vec<MidiEvent>, duration: u32) {
        if pitches.is_empty() {
            return;
        }
        let slice = duration / pitches.len() as u32;
        for &pitch in pitches {
            track.push(MidiEvent::note_on(pitch, self.velocity, 0));
            track.push(MidiEvent::note_off(pitch, self.velocity, slice));
        }
    }
}

/// Explicit name-to-strategy map, populated at construction. No implicit
/// registration; callers add custom strategies with [`register`].
///
/// [`register`]: RendererRegistry::register
pub struct RendererRegistry {
    renderers: HashMap<&'static str, Box<dyn ChordRenderer>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        let mut renderers: HashMap<&'static str, Box<dyn ChordRenderer>> = HashMap::new();
        renderers.insert("simultaneous", Box::new(Simultaneous::default()));
        renderers.insert("arpeggio", Box::new(Arpeggio::default()));
        Self { renderers }
    }

    pub fn register(&mut self, name: &'static str, renderer: Box<dyn ChordRenderer>) {
        self.renderers.insert(name, renderer);
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.renderers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Look up a renderer by name. The error lists the registered names.
    pub fn resolve(&self, name: &str) -> Result<&dyn ChordRenderer, TonalError> {
        self.renderers
            .get(name)
            .map(|r| r.as_ref())
            .ok_or_else(|| TonalError::RendererNotFound {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::new()
    }
}
