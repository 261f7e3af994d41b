//! Line-based gesture scripts for headless replay.
//!
//! ```text
//! # draw a red bar, then flood the background
//! tool pencil
//! color #FF0000
//! size 6
//! down 650 370
//! move 650 380
//! up 650 380
//! tool fill
//! down 641 361 @0|0
//! up 641 361
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::color::Color;
use crate::components::tools::Tool;
use crate::grid::{Direction, TileCoord};
use crate::session::{EditorSession, PointerEvent, PointerKind};

#[derive(Clone, Debug, PartialEq)]
pub enum ScriptCommand {
    Tool(Tool),
    Color(Color),
    Size(u32),
    Pointer(PointerEvent),
    AddNeighbor { from: TileCoord, direction: Direction },
    Pan { dx: f32, dy: f32 },
    Wheel { sx: f32, sy: f32, delta_y: f32 },
    Zoom { sx: f32, sy: f32, factor: f32 },
    Viewport { width: f32, height: f32 },
    Material { name: String, argb: String },
}

impl ScriptCommand {
    /// Apply to a session. Returns whether any tile's pixels changed.
    pub fn apply(&self, session: &mut EditorSession) -> bool {
        match self {
            ScriptCommand::Tool(tool) => session.set_tool(*tool),
            ScriptCommand::Color(color) => session.set_color(*color),
            ScriptCommand::Size(size) => session.set_brush_size(*size),
            ScriptCommand::Pointer(event) => {
                return session
                    .handle_pointer(*event)
                    .iter()
                    .any(|(_, outcome)| outcome.modified_pixels());
            }
            ScriptCommand::AddNeighbor { from, direction } => {
                session.add_neighbor(*from, *direction);
            }
            ScriptCommand::Pan { dx, dy } => session.pan_by(*dx, *dy),
            ScriptCommand::Wheel { sx, sy, delta_y } => {
                session.wheel(*sx, *sy, *delta_y);
            }
            ScriptCommand::Zoom { sx, sy, factor } => {
                session.zoom_at(*sx, *sy, *factor);
            }
            ScriptCommand::Viewport { width, height } => session.resize_viewport(*width, *height),
            ScriptCommand::Material { name, argb } => {
                session.load_materials([(name.as_str(), argb.as_str())]);
            }
        }
        false
    }
}

/// Script read or parse failure.
#[derive(Debug)]
pub enum ScriptError {
    Io { path: PathBuf, source: std::io::Error },
    /// 1-based line number.
    Parse { line: usize, message: String },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Io { path, source } => write!(f, "cannot read {}: {}", path.display(), source),
            ScriptError::Parse { line, message } => write!(f, "line {}: {}", line, message),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScriptError::Io { source, .. } => Some(source),
            ScriptError::Parse { .. } => None,
        }
    }
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptCommand>, ScriptError> {
    let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&text)
}

/// Parse a whole script; stops at the first bad line.
pub fn parse_script(text: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    let mut commands = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        let command = parse_line(line).map_err(|message| ScriptError::Parse { line: i + 1, message })?;
        commands.push(command);
    }
    Ok(commands)
}

/// A `#` opens a comment at the start of a line or when followed by
/// whitespace; `#FF0000` is a color.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    for (i, _) in line.match_indices('#') {
        if line[i + 1..].chars().next().is_none_or(char::is_whitespace) {
            return &line[..i];
        }
    }
    line
}

fn parse_line(line: &str) -> Result<ScriptCommand, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("empty command".to_string());
    };
    let args: Vec<&str> = words.collect();
    let command = match verb.to_ascii_lowercase().as_str() {
        "tool" => ScriptCommand::Tool(one(&args)?.parse()?),
        "color" => ScriptCommand::Color(Color::from_hex(one(&args)?).map_err(|e| e.to_string())?),
        "size" => ScriptCommand::Size(number(one(&args)?)?),
        "down" => ScriptCommand::Pointer(pointer(PointerKind::Down, &args)?),
        "move" => ScriptCommand::Pointer(pointer(PointerKind::Move, &args)?),
        "up" => ScriptCommand::Pointer(pointer(PointerKind::Up, &args)?),
        "add" => {
            let [x, y, dir] = exact::<3>(&args)?;
            ScriptCommand::AddNeighbor {
                from: TileCoord::new(number(x)?, number(y)?),
                direction: dir.parse()?,
            }
        }
        "pan" => {
            let [dx, dy] = exact::<2>(&args)?;
            ScriptCommand::Pan { dx: number(dx)?, dy: number(dy)? }
        }
        "wheel" => {
            let [sx, sy, dy] = exact::<3>(&args)?;
            ScriptCommand::Wheel { sx: number(sx)?, sy: number(sy)?, delta_y: number(dy)? }
        }
        "zoom" => {
            let [sx, sy, f] = exact::<3>(&args)?;
            ScriptCommand::Zoom { sx: number(sx)?, sy: number(sy)?, factor: number(f)? }
        }
        "viewport" => {
            let [w, h] = exact::<2>(&args)?;
            ScriptCommand::Viewport { width: number(w)?, height: number(h)? }
        }
        "material" => {
            let [name, argb] = exact::<2>(&args)?;
            ScriptCommand::Material { name: name.to_string(), argb: argb.to_string() }
        }
        other => return Err(format!("unknown command '{}'", other)),
    };
    Ok(command)
}

fn exact<'a, const N: usize>(args: &[&'a str]) -> Result<[&'a str; N], String> {
    <[&str; N]>::try_from(args).map_err(|_| format!("expected {} arguments, got {}", N, args.len()))
}

fn one<'a>(args: &[&'a str]) -> Result<&'a str, String> {
    let [arg] = exact::<1>(args)?;
    Ok(arg)
}

fn number<T: std::str::FromStr>(s: &str) -> Result<T, String> {
    s.parse().map_err(|_| format!("'{}' is not a number", s))
}

/// `sx sy [@x|y]`
fn pointer(kind: PointerKind, args: &[&str]) -> Result<PointerEvent, String> {
    let (coords, target) = match args {
        [sx, sy] => ((*sx, *sy), None),
        [sx, sy, target] => {
            let id = target
                .strip_prefix('@')
                .ok_or_else(|| format!("expected @x|y tile target, got '{}'", target))?;
            let coord = TileCoord::parse_id(id).ok_or_else(|| format!("bad tile id '{}'", id))?;
            ((*sx, *sy), Some(coord))
        }
        _ => return Err(format!("expected 'sx sy [@x|y]', got {} arguments", args.len())),
    };
    let sx: f32 = number(coords.0)?;
    let sy: f32 = number(coords.1)?;
    if !sx.is_finite() || !sy.is_finite() {
        return Err("pointer coordinates must be finite".to_string());
    }
    Ok(PointerEvent { kind, sx, sy, target })
}

/// Summary of one replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub commands: usize,
    /// Commands that changed pixels.
    pub painting: usize,
}

pub fn replay(session: &mut EditorSession, commands: &[ScriptCommand]) -> ReplayStats {
    let mut stats = ReplayStats::default();
    for command in commands {
        stats.commands += 1;
        if command.apply(session) {
            stats.painting += 1;
        }
    }
    stats
}
