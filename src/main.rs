use std::env;
use std::path::Path;
use std::process;

use tonal::chords::{self, parse_progression, RendererRegistry};
use tonal::config::Config;
use tonal::midi::{write_tracks_midi_file, TICKS_PER_QUARTER};
use tonal::scale::{family_for_name, translate, Motif, Steps};
use tonal::TonalError;

fn usage() -> ! {
    eprintln!("Usage: tonal chords <PROGRESSION...> [-o out.mid|out.wav] [--render NAME]");
    eprintln!("       tonal translate <NOTES> <STEPS> <TONIC> [--scale FAMILY] [-o out.mid]");
    eprintln!("       tonal convert <src> <dest>");
    eprintln!();
    eprintln!("Progression entries are SYMBOL or SYMBOL:TICKS (e.g. Bdim:120 G7 Cmaj7).");
    eprintln!("Notes are space-separated within a track, tracks separated by '/'.");
    eprintln!("Steps are a single integer or a comma-separated list (e.g. 0,1,2).");
    process::exit(1);
}

fn fail(e: TonalError) -> ! {
    eprintln!("Error: {}", e);
    process::exit(1);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        usage();
    }

    match args[0].as_str() {
        "chords" => run_chords(&args[1..]),
        "translate" => run_translate(&args[1..]),
        "convert" => run_convert(&args[1..]),
        _ => usage(),
    }
}

/// Pull `flag value` out of an argument list, returning the remainder.
fn take_option(args: &mut Vec<String>, flag: &str) -> Option<String> {
    let index = args.iter().position(|a| a == flag)?;
    if index + 1 >= args.len() {
        usage();
    }
    let value = args.remove(index + 1);
    args.remove(index);
    Some(value)
}

fn run_chords(args: &[String]) {
    let mut args = args.to_vec();
    let output = take_option(&mut args, "-o").unwrap_or_else(|| "chords.mid".to_string());
    let render_name = take_option(&mut args, "--render").unwrap_or_else(|| "simultaneous".to_string());
    if args.is_empty() {
        usage();
    }

    let entries = match parse_progression(&args.join(" ")) {
        Ok(entries) => entries,
        Err(e) => fail(e),
    };
    let registry = RendererRegistry::new();
    let renderer = match registry.resolve(&render_name) {
        Ok(renderer) => renderer,
        Err(e) => fail(e),
    };

    let path = Path::new(&output);
    let result = if output.ends_with(".wav") {
        let config = Config::load().unwrap_or_else(|e| fail(e));
        chords::chords_to_wav(&entries, renderer, path, &config).map(|_| ())
    } else {
        chords::chords_to_midi(&entries, renderer, path)
    };
    match result {
        Ok(()) => eprintln!("Wrote {}", output),
        Err(e) => fail(e),
    }
}

fn run_translate(args: &[String]) {
    let mut args = args.to_vec();
    let output = take_option(&mut args, "-o");
    let family_name = take_option(&mut args, "--scale").unwrap_or_else(|| "major".to_string());
    if args.len() != 3 {
        usage();
    }

    let tracks: Vec<Vec<&str>> = args[0]
        .split('/')
        .map(|track| track.split_whitespace().collect())
        .collect();
    let steps: Vec<i32> = match args[1].split(',').map(str::parse).collect() {
        Ok(steps) => steps,
        Err(_) => usage(),
    };
    let steps = if steps.len() == 1 {
        Steps::Single(steps[0])
    } else {
        Steps::Sequence(steps)
    };
    let tonic = &args[2];

    let family = family_for_name(&family_name).unwrap_or_else(|e| fail(e));
    let motif = match parse_motif(&tracks) {
        Ok(motif) => motif,
        Err(e) => fail(e),
    };

    let translated = match translate(&motif, &steps, tonic, family.as_ref()) {
        Ok(translated) => translated,
        Err(e) => fail(e),
    };

    match &translated {
        Motif::Note(note) => println!("{}", note),
        Motif::Track(track) => println!("{}", join_notes(track)),
        Motif::Tracks(tracks) => {
            for track in tracks {
                println!("{}", join_notes(track));
            }
        }
    }

    if let Some(output) = output {
        let voices = translated.voices();
        match write_tracks_midi_file(&voices, TICKS_PER_QUARTER as u32, Path::new(&output)) {
            Ok(()) => eprintln!("Wrote {}", output),
            Err(e) => fail(e),
        }
    }
}

fn parse_motif(tracks: &[Vec<&str>]) -> Result<Motif, TonalError> {
    let parsed: Vec<Vec<tonal::PitchName>> = tracks
        .iter()
        .map(|track| track.iter().map(|s| s.parse()).collect())
        .collect::<Result<_, _>>()?;
    Ok(match parsed.len() {
        1 => Motif::Track(parsed.into_iter().next().unwrap()),
        _ => Motif::Tracks(parsed),
    })
}

fn join_notes(notes: &[tonal::PitchName]) -> String {
    notes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn run_convert(args: &[String]) {
    if args.len() != 2 {
        usage();
    }
    let config = Config::load().unwrap_or_else(|e| fail(e));
    match tonal::convert(Path::new(&args[0]), Path::new(&args[1]), &config) {
        Ok(dest) => eprintln!("Wrote {}", dest.display()),
        Err(e) => fail(e),
    }
}
