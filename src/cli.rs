// ============================================================================
// tilepaint CLI — headless replay of gesture scripts
// ============================================================================
//
// Usage examples:
//   tilepaint --script stroke.tps
//   tilepaint -s "scripts/*.tps" --output-dir renders/ --snapshot
//   tilepaint -s demo.tps --config editor.cfg --log replay.log -v
//
// Each script runs in a fresh editor session. Every tile of the resulting
// grid is written as tile_<x>_<y>.png; --snapshot also writes viewport.png.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::render::{tile_image, viewport_image};
use crate::script::{load_script, replay};
use crate::session::EditorSession;
use crate::settings::EditorSettings;

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// tilepaint headless replayer.
#[derive(Parser, Debug)]
#[command(
    name = "tilepaint",
    about = "Replay tilepaint gesture scripts and export the tiles as PNG",
    long_about = "Replay line-based gesture scripts (tool, color, size, down/move/up,\n\
                  add, pan, wheel, zoom, viewport, material) against a fresh editor\n\
                  session and write every tile as a PNG.\n\n\
                  Example:\n  \
                  tilepaint --script stroke.tps --output-dir out/ --snapshot"
)]
pub struct CliArgs {
    /// Script file(s). Glob patterns accepted (e.g. "scripts/*.tps").
    #[arg(short, long, required = true, num_args = 1..)]
    pub script: Vec<String>,

    /// Destination directory. With several scripts each gets a sub-directory
    /// named after the script.
    #[arg(short, long, value_name = "DIR", default_value = "tilepaint-out")]
    pub output_dir: PathBuf,

    /// Editor settings file (key=value). Defaults to the per-user settings.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also render the final viewport to viewport.png.
    #[arg(long)]
    pub snapshot: bool,

    /// Write the session log to FILE (with --verbose alone it goes to the
    /// per-user data directory).
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Print per-script statistics and timing.
    #[arg(short, long)]
    pub verbose: bool,
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run every script and return an OS exit code.
/// `0` = all scripts succeeded, `1` = one or more failed.
pub fn run(args: CliArgs) -> ExitCode {
    match &args.log {
        Some(path) => crate::logger::init_at(path),
        None if args.verbose => crate::logger::init(),
        None => {}
    }

    let scripts = resolve_inputs(&args.script);
    if scripts.is_empty() {
        eprintln!("error: no script files matched the given pattern(s).");
        return ExitCode::FAILURE;
    }

    let settings = match &args.config {
        Some(path) => match EditorSettings::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => EditorSettings::load(),
    };

    let total = scripts.len();
    let multi = total > 1;
    let mut any_failure = false;

    for (idx, script_path) in scripts.iter().enumerate() {
        if multi || args.verbose {
            println!("[{}/{}] {}", idx + 1, total, script_path.display());
        }
        let started = Instant::now();

        let out_dir = if multi {
            let stem = script_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("script{}", idx + 1));
            args.output_dir.join(stem)
        } else {
            args.output_dir.clone()
        };

        match run_one(script_path, &out_dir, &settings, args.snapshot) {
            Ok(summary) => {
                if args.verbose || multi {
                    println!(
                        "  → {} ({} commands, {} painting, {} tiles, {:.0}ms)",
                        out_dir.display(),
                        summary.commands,
                        summary.painting,
                        summary.tiles,
                        started.elapsed().as_secs_f64() * 1000.0
                    );
                }
            }
            Err(e) => {
                crate::log_err!("{}: {}", script_path.display(), e);
                eprintln!("  error: {}", e);
                any_failure = true;
            }
        }
    }

    if any_failure { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

// ============================================================================
// Per-script pipeline
// ============================================================================

/// What one replay produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub commands: usize,
    pub painting: usize,
    pub tiles: usize,
}

/// Replay `script` in a fresh session and write its tiles into `out_dir`.
pub fn run_one(
    script: &Path,
    out_dir: &Path,
    settings: &EditorSettings,
    snapshot: bool,
) -> Result<RunSummary, String> {
    // -- Step 1: Parse ---------------------------------------------------
    let commands = load_script(script).map_err(|e| e.to_string())?;

    // -- Step 2: Replay --------------------------------------------------
    let mut session = EditorSession::new(settings.clone());
    let stats = replay(&mut session, &commands);

    // -- Step 3: Export --------------------------------------------------
    std::fs::create_dir_all(out_dir)
        .map_err(|e| format!("could not create output directory '{}': {}", out_dir.display(), e))?;

    let mut tiles = 0;
    for tile in session.grid().iter() {
        let coord = tile.coord();
        let path = out_dir.join(tile_file_name(coord.x, coord.y));
        tile_image(tile)
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|e| format!("save failed for '{}': {}", path.display(), e))?;
        tiles += 1;
    }

    if snapshot {
        let path = out_dir.join("viewport.png");
        viewport_image(session.grid(), session.view())
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|e| format!("save failed for '{}': {}", path.display(), e))?;
    }

    crate::log_info!(
        "Replayed {} ({} commands, {} painting) into {}",
        script.display(),
        stats.commands,
        stats.painting,
        out_dir.display()
    );

    Ok(RunSummary {
        commands: stats.commands,
        painting: stats.painting,
        tiles,
    })
}

// ============================================================================
// Helpers
// ============================================================================

/// `tile_<x>_<y>.png`
pub fn tile_file_name(x: i32, y: i32) -> String {
    format!("tile_{}_{}.png", x, y)
}

/// Script paths named by `patterns`: an existing path is taken as-is,
/// anything else is expanded as a glob (matches sorted, directories skipped).
/// First occurrence wins when patterns overlap.
fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut scripts: Vec<PathBuf> = Vec::new();
    let mut push = |path: PathBuf| {
        if !scripts.contains(&path) {
            scripts.push(path);
        }
    };

    for pattern in patterns {
        let literal = PathBuf::from(pattern);
        if literal.is_file() {
            push(literal);
            continue;
        }
        let mut matches: Vec<PathBuf> = match glob::glob(pattern) {
            Ok(paths) => paths.flatten().filter(|p| p.is_file()).collect(),
            Err(e) => {
                eprintln!("warning: bad script pattern '{}': {}", pattern, e);
                continue;
            }
        };
        if matches.is_empty() {
            eprintln!("warning: no script matches '{}'", pattern);
            continue;
        }
        matches.sort();
        matches.into_iter().for_each(&mut push);
    }

    scripts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_with_defaults() {
        let args = CliArgs::try_parse_from(["tilepaint", "-s", "a.tps", "b.tps"]).unwrap();
        assert_eq!(args.script, vec!["a.tps".to_string(), "b.tps".to_string()]);
        assert_eq!(args.output_dir, PathBuf::from("tilepaint-out"));
        assert!(!args.snapshot);
        assert!(CliArgs::try_parse_from(["tilepaint"]).is_err());
    }

    #[test]
    fn tile_files_are_named_by_coordinate() {
        assert_eq!(tile_file_name(0, 0), "tile_0_0.png");
        assert_eq!(tile_file_name(-1, 2), "tile_-1_2.png");
    }

    #[test]
    fn inputs_mix_literal_paths_and_sorted_globs() {
        let dir = std::env::temp_dir().join(format!("tilepaint-inputs-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(dir.join("nested.tps")).unwrap();
        for name in ["b.tps", "a.tps", "notes.txt"] {
            std::fs::write(dir.join(name), "").unwrap();
        }
        let literal = dir.join("b.tps").to_string_lossy().into_owned();
        let pattern = dir.join("*.tps").to_string_lossy().into_owned();

        let found = resolve_inputs(&[literal, pattern]);
        assert_eq!(found, vec![dir.join("b.tps"), dir.join("a.tps")]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unmatched_patterns_resolve_to_nothing() {
        let missing = std::env::temp_dir()
            .join(format!("tilepaint-{}", uuid::Uuid::new_v4()))
            .join("*.tps");
        assert!(resolve_inputs(&[missing.to_string_lossy().into_owned()]).is_empty());
    }
}
