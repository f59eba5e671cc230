//! External F0 override files.
//!
//! A caller may supply a precomputed pitch contour as plain text, one line
//! per frame, comma-separated floats. Two layouts are accepted:
//!
//! - one value per line: F0 in Hz, one frame per line on the 100 frames/sec
//!   analysis grid
//! - two or more values per line: `time_seconds, hz` rows, interpolated
//!   onto the frame grid
//!
//! Malformed content is a recoverable [`PitchError::F0File`]; the caller is
//! expected to fall back to the algorithmic estimate.

use std::fs;
use std::path::Path;

use revoice_dsp::interp;

use crate::PitchError;

/// A parsed override contour, not yet aligned to a frame grid.
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideTrack {
    /// One Hz value per analysis frame.
    PerFrame(Vec<f32>),
    /// `(time_seconds, hz)` rows at arbitrary spacing.
    Timed(Vec<(f32, f32)>),
}

impl OverrideTrack {
    /// Renders the contour onto a grid of `frames_per_sec` analysis frames.
    ///
    /// Timed rows are linearly interpolated over
    /// `round((t_max - t_min) * frames_per_sec) + 1` frames starting at
    /// time zero; per-frame rows pass through unchanged.
    pub fn to_frame_grid(&self, frames_per_sec: f32) -> Vec<f32> {
        match self {
            OverrideTrack::PerFrame(hz) => hz.clone(),
            OverrideTrack::Timed(rows) => {
                if rows.is_empty() {
                    return Vec::new();
                }
                let t_min = rows.iter().map(|r| r.0).fold(f32::INFINITY, f32::min);
                let t_max = rows.iter().map(|r| r.0).fold(f32::NEG_INFINITY, f32::max);
                let frames = (((t_max - t_min) * frames_per_sec).round() as usize) + 1;
                let xp: Vec<f32> = rows.iter().map(|r| r.0 * frames_per_sec).collect();
                let fp: Vec<f32> = rows.iter().map(|r| r.1).collect();
                let grid: Vec<f32> = (0..frames).map(|i| i as f32).collect();
                interp(&grid, &xp, &fp)
            }
        }
    }
}

/// Parses override text.
///
/// Empty input and rows with inconsistent column counts, non-numeric
/// fields, or non-increasing timestamps are all reported as
/// [`PitchError::F0File`].
pub fn parse_f0_text(text: &str) -> Result<OverrideTrack, PitchError> {
    let mut per_frame: Vec<f32> = Vec::new();
    let mut timed: Vec<(f32, f32)> = Vec::new();
    let mut columns: Option<usize> = None;

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Result<Vec<f32>, _> = line.split(',').map(|f| f.trim().parse::<f32>()).collect();
        let fields = fields
            .map_err(|e| PitchError::F0File(format!("line {}: {e}", lineno + 1)))?;

        match columns {
            None => columns = Some(fields.len()),
            Some(c) if c != fields.len() => {
                return Err(PitchError::F0File(format!(
                    "line {}: expected {} fields, got {}",
                    lineno + 1,
                    c,
                    fields.len()
                )));
            }
            Some(_) => {}
        }

        match fields.len() {
            1 => per_frame.push(fields[0]),
            _ => {
                let (t, hz) = (fields[0], fields[fields.len() - 1]);
                if let Some(&(prev, _)) = timed.last() {
                    if t <= prev {
                        return Err(PitchError::F0File(format!(
                            "line {}: timestamps must increase ({prev} -> {t})",
                            lineno + 1
                        )));
                    }
                }
                timed.push((t, hz));
            }
        }
    }

    match columns {
        None => Err(PitchError::F0File("empty file".into())),
        Some(1) => Ok(OverrideTrack::PerFrame(per_frame)),
        Some(_) => Ok(OverrideTrack::Timed(timed)),
    }
}

/// Reads and parses an override file from disk.
pub fn parse_f0_file(path: &Path) -> Result<OverrideTrack, PitchError> {
    let text = fs::read_to_string(path)
        .map_err(|e| PitchError::F0File(format!("{}: {e}", path.display())))?;
    parse_f0_text(&text)
}
