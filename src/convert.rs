//! File format detection and conversion.
//!
//! The dispatcher sniffs a format from the file extension (or, for byte
//! buffers, from magic numbers) and routes the (source, destination) pair to
//! one of three conversions: MusicXML -> MIDI (internal reader), MIDI -> WAV
//! (external synthesizer subprocess), and image -> MusicXML (external OMR
//! subprocess). Everything else is rejected. Bytes-in/bytes-out conversions
//! stage through temporary files around the file-based converters.
//!
//! No timeout policy lives here; callers that need one own it.

use crate::config::Config;
use crate::error::TonalError;
use crate::midi::{write_midi_file, MidiEvent, DEFAULT_PROGRAM, DEFAULT_VELOCITY, TICKS_PER_QUARTER};
use crate::pitch::NoteName;
use log::{debug, warn};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Logical file formats the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Midi,
    MusicXml,
    Wav,
    Image,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Midi => "midi",
            Format::MusicXml => "musicxml",
            Format::Wav => "wav",
            Format::Image => "image",
        }
    }

    /// Canonical file extension, dot included.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Midi => ".mid",
            Format::MusicXml => ".musicxml",
            Format::Wav => ".wav",
            Format::Image => ".png",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Format> {
        match extension.to_ascii_lowercase().as_str() {
            "mid" | "midi" => Some(Format::Midi),
            "xml" | "musicxml" => Some(Format::MusicXml),
            "wav" => Some(Format::Wav),
            "png" | "jpg" | "jpeg" => Some(Format::Image),
            _ => None,
        }
    }
}

/// Determine a file's format from its extension.
pub fn format_of_path(path: &Path) -> Option<Format> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(Format::from_extension)
}

/// Determine an in-memory buffer's format from its leading bytes.
pub fn sniff_format(bytes: &[u8]) -> Option<Format> {
    if bytes.starts_with(b"MThd") {
        Some(Format::Midi)
    } else if bytes.starts_with(b"RIFF") {
        Some(Format::Wav)
    } else if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) || bytes.starts_with(&[0xFF, 0xD8, 0xFF])
    {
        Some(Format::Image)
    } else if looks_like_musicxml(bytes) {
        Some(Format::MusicXml)
    } else {
        None
    }
}

fn looks_like_musicxml(bytes: &[u8]) -> bool {
    let head = match std::str::from_utf8(&bytes[..bytes.len().min(256)]) {
        Ok(s) => s.trim_start(),
        Err(_) => return false,
    };
    head.starts_with("<?xml") || head.starts_with("<score-partwise")
}

/// Convert `src` to `dest`, routing on the formats implied by the two paths.
///
/// Returns the destination path on success; unsupported pairs fail with
/// [`TonalError::UnsupportedConversion`].
pub fn convert(src: &Path, dest: &Path, config: &Config) -> Result<PathBuf, TonalError> {
    let unsupported = |path: &Path| TonalError::UnsupportedConversion {
        from: path.to_string_lossy().into_owned(),
        to: dest.to_string_lossy().into_owned(),
    };
    let src_format = format_of_path(src).ok_or_else(|| unsupported(src))?;
    let dest_format = format_of_path(dest).ok_or_else(|| unsupported(src))?;

    match (src_format, dest_format) {
        (Format::MusicXml, Format::Midi) => musicxml_to_midi(src, dest),
        (Format::Midi, Format::Wav) => midi_to_wav(src, dest, config),
        (Format::Image, Format::MusicXml) => image_to_musicxml(src, dest, config),
        (from, to) => Err(TonalError::UnsupportedConversion {
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
        }),
    }
}

/// Convert an in-memory buffer, sniffing its format and staging both sides
/// through temporary files.
pub fn convert_bytes(
    bytes: &[u8],
    dest_format: Format,
    config: &Config,
) -> Result<Vec<u8>, TonalError> {
    let src_format = sniff_format(bytes).ok_or_else(|| TonalError::UnsupportedConversion {
        from: "unrecognized bytes".to_string(),
        to: dest_format.as_str().to_string(),
    })?;

    let staging = tempfile::tempdir()?;
    let src = staging.path().join(format!("input{}", src_format.extension()));
    let dest = staging.path().join(format!("output{}", dest_format.extension()));
    std::fs::write(&src, bytes)?;
    debug!("staging byte conversion through {}", staging.path().display());

    let written = convert(&src, &dest, config)?;
    Ok(std::fs::read(written)?)
}

/// Synthesize a MIDI file to WAV with the configured external engine.
pub fn midi_to_wav(midi: &Path, wav: &Path, config: &Config) -> Result<PathBuf, TonalError> {
    let synth = which::which(&config.synth_command).map_err(|_| {
        TonalError::ExternalTool(format!("{} not found on PATH", config.synth_command))
    })?;
    if !config.soundfont.exists() {
        warn!("soundfont not found at {}", config.soundfont.display());
    }

    debug!("synthesizing {} -> {}", midi.display(), wav.display());
    let status = Command::new(synth)
        .arg("-ni")
        .arg(&config.soundfont)
        .arg(midi)
        .arg("-F")
        .arg(wav)
        .arg("-r")
        .arg("44100")
        .status()?;
    if !status.success() {
        return Err(TonalError::ExternalTool(format!(
            "{} exited with {}",
            config.synth_command, status
        )));
    }
    Ok(wav.to_path_buf())
}

/// Transcribe a score image to MusicXML with the configured external OMR
/// engine.
pub fn image_to_musicxml(image: &Path, dest: &Path, config: &Config) -> Result<PathBuf, TonalError> {
    let omr = which::which(&config.omr_command).map_err(|_| {
        TonalError::ExternalTool(format!("{} not found on PATH", config.omr_command))
    })?;

    debug!("transcribing {} -> {}", image.display(), dest.display());
    let status = Command::new(omr).arg(image).arg(dest).status()?;
    if !status.success() {
        return Err(TonalError::ExternalTool(format!(
            "{} exited with {}",
            config.omr_command, status
        )));
    }
    if !dest.exists() {
        return Err(TonalError::ExternalTool(format!(
            "{} produced no output at {}",
            config.omr_command,
            dest.display()
        )));
    }
    Ok(dest.to_path_buf())
}

/// Read a MusicXML file and write it as a single-track MIDI file.
pub fn musicxml_to_midi(src: &Path, dest: &Path) -> Result<PathBuf, TonalError> {
    let xml = std::fs::read_to_string(src)?;
    let events = musicxml_to_events(&xml)?;
    write_midi_file(&events, dest)?;
    Ok(dest.to_path_buf())
}

/// A pitched note with an absolute onset, used while flattening parts.
struct TimedNote {
    onset: u64,
    duration: u64,
    key: u8,
}

/// Read the score-partwise subset (parts, measures, pitched notes with
/// step/alter/octave, rests, `<chord/>` simultaneities, divisions) into a
/// flat event stream. Parts are merged onto one track.
pub fn musicxml_to_events(xml: &str) -> Result<Vec<MidiEvent>, TonalError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let malformed = |what: &str| TonalError::MalformedScore(what.to_string());

    let mut divisions: u64 = 1;
    let mut notes: Vec<TimedNote> = Vec::new();
    let mut cursor: u64 = 0;
    let mut previous_onset: u64 = 0;

    // state of the <note> being read
    let mut in_note = false;
    let mut step: Option<NoteName> = None;
    let mut alter: i16 = 0;
    let mut octave: i8 = 4;
    let mut duration: u64 = 0;
    let mut is_rest = false;
    let mut is_chord = false;
    let mut text_target: Vec<u8> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"part" => {
                    // parts are parallel voices; each restarts the clock
                    cursor = 0;
                    previous_onset = 0;
                }
                b"note" => {
                    in_note = true;
                    step = None;
                    alter = 0;
                    octave = 4;
                    duration = 0;
                    is_rest = false;
                    is_chord = false;
                }
                b"rest" if in_note => is_rest = true,
                b"chord" if in_note => is_chord = true,
                name => {
                    text_target = name.to_vec();
                }
            },
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|e| malformed(&e.to_string()))?;
                let text = text.trim();
                match text_target.as_slice() {
                    b"divisions" => {
                        divisions = text.parse().map_err(|_| malformed("bad divisions"))?;
                        if divisions == 0 {
                            return Err(malformed("zero divisions"));
                        }
                    }
                    b"step" if in_note => {
                        let c = text.chars().next().ok_or_else(|| malformed("empty step"))?;
                        step = Some(NoteName::from_char(c).ok_or_else(|| malformed("bad step"))?);
                    }
                    b"alter" if in_note => {
                        alter = text.parse().map_err(|_| malformed("bad alter"))?;
                    }
                    b"octave" if in_note => {
                        octave = text.parse().map_err(|_| malformed("bad octave"))?;
                    }
                    b"duration" if in_note => {
                        duration = text.parse().map_err(|_| malformed("bad duration"))?;
                    }
                    _ => {}
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"note" => {
                in_note = false;
                let ticks = duration * TICKS_PER_QUARTER as u64 / divisions;
                if is_rest {
                    cursor += ticks;
                } else {
                    let name = step.ok_or_else(|| malformed("note without step"))?;
                    let midi = 12 * (octave as i16 + 1) + name.semitone() + alter;
                    if !(0..=127).contains(&midi) {
                        return Err(malformed("pitch out of MIDI range"));
                    }
                    let onset = if is_chord { previous_onset } else { cursor };
                    notes.push(TimedNote {
                        onset,
                        duration: ticks,
                        key: midi as u8,
                    });
                    if !is_chord {
                        previous_onset = cursor;
                        cursor += ticks;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(malformed(&e.to_string())),
            _ => {}
        }
    }

    Ok(flatten_notes(notes))
}

/// Turn absolute-timed notes into a delta-timed event stream, note-offs
/// sorting before note-ons on the same tick.
fn flatten_notes(notes: Vec<TimedNote>) -> Vec<MidiEvent> {
    let mut boundaries: Vec<(u64, bool, u8)> = Vec::with_capacity(notes.len() * 2);
    for note in &notes {
        boundaries.push((note.onset, true, note.key));
        boundaries.push((note.onset + note.duration, false, note.key));
    }
    boundaries.sort_by_key(|&(tick, is_on, _)| (tick, is_on));

    let mut events = vec![MidiEvent::program_change(DEFAULT_PROGRAM, 0)];
    let mut last_tick = 0;
    for (tick, is_on, key) in boundaries {
        let delta = (tick - last_tick) as u32;
        last_tick = tick;
        if is_on {
            events.push(MidiEvent::note_on(key, DEFAULT_VELOCITY, delta));
        } else {
            events.push(MidiEvent::note_off(key, DEFAULT_VELOCITY, delta));
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::EventKind;

    #[test]
    fn test_format_of_path() {
        assert_eq!(format_of_path(Path::new("song.mid")), Some(Format::Midi));
        assert_eq!(format_of_path(Path::new("song.MIDI")), Some(Format::Midi));
        assert_eq!(
            format_of_path(Path::new("score.musicxml")),
            Some(Format::MusicXml)
        );
        assert_eq!(format_of_path(Path::new("take.wav")), Some(Format::Wav));
        assert_eq!(format_of_path(Path::new("scan.jpeg")), Some(Format::Image));
        assert_eq!(format_of_path(Path::new("notes.txt")), None);
        assert_eq!(format_of_path(Path::new("noext")), None);
    }

    #[test]
    fn test_sniff_format() {
        assert_eq!(sniff_format(b"MThd\x00\x00\x00\x06"), Some(Format::Midi));
        assert_eq!(sniff_format(b"RIFF\x24\x08\x00\x00WAVE"), Some(Format::Wav));
        assert_eq!(sniff_format(&[0x89, 0x50, 0x4E, 0x47, 0x0D]), Some(Format::Image));
        assert_eq!(sniff_format(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(Format::Image));
        assert_eq!(
            sniff_format(b"<?xml version=\"1.0\"?><score-partwise/>"),
            Some(Format::MusicXml)
        );
        assert_eq!(
            sniff_format(b"  \n<score-partwise version=\"4.0\">"),
            Some(Format::MusicXml)
        );
        assert_eq!(sniff_format(b"just some text"), None);
    }

    #[test]
    fn test_unsupported_pairs_are_rejected() {
        let config = Config::default();
        let err = convert(Path::new("a.mid"), Path::new("b.musicxml"), &config).unwrap_err();
        match err {
            TonalError::UnsupportedConversion { from, to } => {
                assert_eq!(from, "midi");
                assert_eq!(to, "musicxml");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(convert(Path::new("a.wav"), Path::new("b.mid"), &config).is_err());
        assert!(convert(Path::new("a.txt"), Path::new("b.mid"), &config).is_err());
    }

    const SCORE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<score-partwise version="4.0">
  <part id="P1">
    <measure number="1">
      <attributes><divisions>4</divisions></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>4</duration></note>
      <note><chord/><pitch><step>E</step><octave>4</octave></pitch><duration>4</duration></note>
      <note><rest/><duration>4</duration></note>
      <note><pitch><step>F</step><alter>1</alter><octave>4</octave></pitch><duration>8</duration></note>
    </measure>
  </part>
</score-partwise>
"#;

    #[test]
    fn test_musicxml_to_events() {
        let events = musicxml_to_events(SCORE).unwrap();
        assert_eq!(events[0].kind, EventKind::ProgramChange);

        // C4 and E4 sound together, then after a quarter rest F#4 for a half
        let expected = [
            MidiEvent::note_on(60, DEFAULT_VELOCITY, 0),
            MidiEvent::note_on(64, DEFAULT_VELOCITY, 0),
            MidiEvent::note_off(60, DEFAULT_VELOCITY, 480),
            MidiEvent::note_off(64, DEFAULT_VELOCITY, 0),
            MidiEvent::note_on(66, DEFAULT_VELOCITY, 480),
            MidiEvent::note_off(66, DEFAULT_VELOCITY, 960),
        ];
        assert_eq!(&events[1..], &expected);
    }

    #[test]
    fn test_musicxml_flat_alter() {
        let xml = r#"<score-partwise><part><measure>
            <attributes><divisions>1</divisions></attributes>
            <note><pitch><step>B</step><alter>-1</alter><octave>3</octave></pitch><duration>1</duration></note>
        </measure></part></score-partwise>"#;
        let events = musicxml_to_events(xml).unwrap();
        assert_eq!(events[1], MidiEvent::note_on(58, DEFAULT_VELOCITY, 0));
    }

    #[test]
    fn test_musicxml_rejects_bad_values() {
        assert!(matches!(
            musicxml_to_events(
                "<score-partwise><part><measure><note><duration>x</duration></note></measure></part></score-partwise>"
            ),
            Err(TonalError::MalformedScore(_))
        ));
        assert!(matches!(
            musicxml_to_events(
                "<score-partwise><part><measure><note><pitch><step>H</step><octave>4</octave></pitch><duration>1</duration></note></measure></part></score-partwise>"
            ),
            Err(TonalError::MalformedScore(_))
        ));
    }
}
