//! MIDI event model and Standard MIDI File serialization.
//!
//! The core produces flat, immutable event sequences (`Vec<MidiEvent>`) that
//! boundary layers can serialize without re-entering the core. Serialization
//! to Standard MIDI Files goes through the `midly` crate: single-track
//! format 0 for chord renderings, format 1 with one track per voice for
//! translated melodic lines.

use crate::error::TonalError;
use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use serde::Serialize;
use std::path::Path;

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

/// Default note velocity.
pub const DEFAULT_VELOCITY: u8 = 64;

/// Default instrument program (acoustic grand piano).
pub const DEFAULT_PROGRAM: u8 = 0;

/// Tempo of written files, in microseconds per quarter note (120 BPM).
const TEMPO_MICROSECONDS: u32 = 500_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NoteOn,
    NoteOff,
    ProgramChange,
}

/// One timed MIDI event. `delta` is the tick offset from the previous event
/// in the same sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MidiEvent {
    pub kind: EventKind,
    /// Note number for note events, program number for program changes.
    pub key: u8,
    pub velocity: u8,
    pub delta: u32,
}

impl MidiEvent {
    pub fn note_on(key: u8, velocity: u8, delta: u32) -> Self {
        Self {
            kind: EventKind::NoteOn,
            key,
            velocity,
            delta,
        }
    }

    pub fn note_off(key: u8, velocity: u8, delta: u32) -> Self {
        Self {
            kind: EventKind::NoteOff,
            key,
            velocity,
            delta,
        }
    }

    pub fn program_change(program: u8, delta: u32) -> Self {
        Self {
            kind: EventKind::ProgramChange,
            key: program,
            velocity: 0,
            delta,
        }
    }
}

fn to_midly(event: &MidiEvent, channel: u4) -> TrackEvent<'static> {
    let message = match event.kind {
        EventKind::NoteOn => MidiMessage::NoteOn {
            key: u7::new(event.key),
            vel: u7::new(event.velocity),
        },
        EventKind::NoteOff => MidiMessage::NoteOff {
            key: u7::new(event.key),
            vel: u7::new(event.velocity),
        },
        EventKind::ProgramChange => MidiMessage::ProgramChange {
            program: u7::new(event.key),
        },
    };
    TrackEvent {
        delta: u28::new(event.delta),
        kind: TrackEventKind::Midi { channel, message },
    }
}

/// Convert an event sequence to a single-track SMF on channel 0.
pub fn events_to_smf(events: &[MidiEvent]) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let mut track: Track<'static> = Vec::new();
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::Tempo(u24::new(TEMPO_MICROSECONDS))),
    });
    for event in events {
        track.push(to_midly(event, u4::new(0)));
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });

    smf.tracks.push(track);
    smf
}

/// Write an event sequence to a MIDI file.
pub fn write_midi_file(events: &[MidiEvent], path: &Path) -> Result<(), TonalError> {
    let smf = events_to_smf(events);
    let mut buf = Vec::new();
    smf.write(&mut buf)
        .map_err(|e| TonalError::MidiWrite(e.to_string()))?;
    std::fs::write(path, &buf)?;
    Ok(())
}

/// Convert melodic voices to a multi-track SMF (format 1).
///
/// Track 0 carries the tempo; each voice gets its own track and channel,
/// every note lasting `note_duration` ticks.
pub fn tracks_to_smf(voices: &[Vec<u8>], note_duration: u32) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let mut tempo_track: Track<'static> = Vec::new();
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::Tempo(u24::new(TEMPO_MICROSECONDS))),
    });
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });
    smf.tracks.push(tempo_track);

    for (vi, voice) in voices.iter().enumerate() {
        let channel = u4::new((vi % 16) as u8);
        let mut track: Track<'static> = Vec::new();

        track.push(to_midly(
            &MidiEvent::program_change(DEFAULT_PROGRAM, 0),
            channel,
        ));
        for &key in voice {
            track.push(to_midly(&MidiEvent::note_on(key, DEFAULT_VELOCITY, 0), channel));
            track.push(to_midly(
                &MidiEvent::note_off(key, DEFAULT_VELOCITY, note_duration),
                channel,
            ));
        }
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
        });

        smf.tracks.push(track);
    }

    smf
}

/// Write melodic voices to a multi-track MIDI file.
pub fn write_tracks_midi_file(
    voices: &[Vec<u8>],
    note_duration: u32,
    path: &Path,
) -> Result<(), TonalError> {
    let smf = tracks_to_smf(voices, note_duration);
    let mut buf = Vec::new();
    smf.write(&mut buf)
        .map_err(|e| TonalError::MidiWrite(e.to_string()))?;
    std::fs::write(path, &buf)?;
    Ok(())
}
