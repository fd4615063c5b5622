use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;
use std::{env, thread};

use tracing::warn;
use tracing_subscriber::EnvFilter;

use shufflebox::gain::{REPORT_DECIMALS, format_gain};
use shufflebox::{PlayerEngine, RodioOutput, Settings};

/// How often stream completions are pumped while stdin is idle.
const PUMP_INTERVAL: Duration = Duration::from_millis(200);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shufflebox=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            warn!("failed to load configuration, using defaults: {err}");
            Settings::default()
        }
    };
    settings.validate().map_err(|msg| format!("invalid configuration: {msg}"))?;

    let output = RodioOutput::new(settings.audio.clone())?;
    let mut engine = PlayerEngine::new(output, settings.clone());

    if let Some(dir) = env::args().nth(1) {
        if let Err(err) = engine.open_folder(Path::new(&dir)) {
            eprintln!("{err}");
        }
    }

    // Stdin runs on its own thread so the main loop can keep pumping
    // playback events while nobody is typing.
    let (lines_tx, lines_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if lines_tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("shufflebox ready, type `help` for commands");
    loop {
        match lines_rx.recv_timeout(PUMP_INTERVAL) {
            Ok(line) => {
                if !dispatch(&mut engine, &settings, line.trim()) {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        engine.pump();
    }

    Ok(())
}

/// Run one command line. Returns `false` when the user asked to quit.
fn dispatch(engine: &mut PlayerEngine<RodioOutput>, settings: &Settings, line: &str) -> bool {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let result = match command {
        "" => Ok(()),
        "open" if !rest.is_empty() => engine.open_folder(Path::new(rest)),
        "list" | "ls" => {
            print_playlist(engine);
            Ok(())
        }
        "play" => match rest.parse::<usize>() {
            Ok(index) => engine.play_at(index),
            Err(_) => {
                eprintln!("usage: play <index>");
                Ok(())
            }
        },
        "pause" | "p" => engine.toggle_pause(),
        "next" | "n" => engine.next(),
        "prev" => engine.previous(),
        "+" => engine.adjust_gain(settings.playback.gain_step),
        "-" => engine.adjust_gain(-settings.playback.gain_step),
        "save" => engine.save_report(&target_path(rest, engine.suggested_report_name(), "playlist.txt")),
        "export" => {
            engine.export_state(&target_path(rest, engine.suggested_document_name(), "playlist.json"))
        }
        "import" if !rest.is_empty() => engine.import_state(Path::new(rest)),
        "help" | "h" => {
            print_help();
            Ok(())
        }
        "quit" | "q" | "exit" => return false,
        _ => {
            eprintln!("unknown command `{line}`, type `help`");
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("{err}");
    }
    true
}

/// Explicit path if given, otherwise the folder-derived file name in the
/// current directory, otherwise `fallback`.
fn target_path(arg: &str, suggested: Option<String>, fallback: &str) -> PathBuf {
    if !arg.is_empty() {
        PathBuf::from(arg)
    } else {
        PathBuf::from(suggested.unwrap_or_else(|| fallback.to_string()))
    }
}

fn print_playlist(engine: &PlayerEngine<RodioOutput>) {
    if engine.playlist().is_empty() {
        println!("(playlist is empty, use `open <folder>`)");
        return;
    }
    let cursor = engine.cursor();
    for (i, entry) in engine.playlist().entries().iter().enumerate() {
        let marker = if i == cursor.index && cursor.playing {
            '>'
        } else {
            ' '
        };
        println!(
            "{marker} {i:3}  {}  [{} dB]",
            entry.name,
            format_gain(entry.gain, REPORT_DECIMALS)
        );
    }
}

fn print_help() {
    println!("commands:");
    println!("  open <folder>    scan a folder and shuffle it into a playlist");
    println!("  list             show the playlist, current track marked with >");
    println!("  play <index>     play the entry at <index>");
    println!("  pause            toggle pause / resume");
    println!("  next / prev      step through the playlist");
    println!("  + / -            nudge the current track's gain");
    println!("  save [path]      write the sorted gain report");
    println!("  export [path]    write the JSON state document");
    println!("  import <path>    restore folder and gains from a document");
    println!("  quit             exit");
}
