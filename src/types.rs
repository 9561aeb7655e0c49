use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

use crate::error::SoundError;

/// The three entries of the interactive menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Synthesize,
    Download,
    Instructions,
}

impl FromStr for MenuChoice {
    type Err = SoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::Synthesize),
            "2" => Ok(MenuChoice::Download),
            "3" => Ok(MenuChoice::Instructions),
            other => Err(SoundError::InvalidChoice(other.to_string())),
        }
    }
}

/// External programs able to render the sound, in detection priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SynthTool {
    Sox,
    Ffmpeg,
}

impl SynthTool {
    pub const PRIORITY: [SynthTool; 2] = [SynthTool::Sox, SynthTool::Ffmpeg];

    pub fn binary(self) -> &'static str {
        match self {
            SynthTool::Sox => "sox",
            SynthTool::Ffmpeg => "ffmpeg",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SynthTool::Sox => "SoX",
            SynthTool::Ffmpeg => "FFmpeg",
        }
    }
}

impl fmt::Display for SynthTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single sine beep with a linear fade envelope.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToneSpec {
    pub frequency_hz: f64,
    pub duration_secs: f64,
    pub fade_in_secs: f64,
    pub fade_out_secs: f64,
}

impl ToneSpec {
    pub const fn beep(frequency_hz: f64) -> Self {
        Self {
            frequency_hz,
            duration_secs: 0.15,
            fade_in_secs: 0.02,
            fade_out_secs: 0.05,
        }
    }
}

/// Layout of the rendered sound: tone, silence, tone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundDesign {
    pub sample_rate: u32,
    pub first_tone: ToneSpec,
    pub gap_secs: f64,
    pub second_tone: ToneSpec,
    pub bitrate_kbps: u32,
}

impl Default for SoundDesign {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            first_tone: ToneSpec::beep(800.0),
            gap_secs: 0.1,
            second_tone: ToneSpec::beep(960.0),
            bitrate_kbps: 128,
        }
    }
}

impl SoundDesign {
    pub fn total_secs(&self) -> f64 {
        self.first_tone.duration_secs + self.gap_secs + self.second_tone.duration_secs
    }
}

/// What was produced on disk.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub duration_secs: Option<f64>,
}

impl Report {
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

/// Result of one completed menu path.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Synthesized { tool: SynthTool, report: Report },
    Downloaded { url: String, report: Report },
    DownloadsExhausted { attempted: usize },
    InstructionsShown,
}

/// Formats seconds and hertz the way sox and ffmpeg expect: shortest exact
/// decimal, no exponent.
pub(crate) fn fmt_num(value: f64) -> String {
    format!("{value}")
}
