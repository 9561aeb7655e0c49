//! # notification-sound
//!
//! Produces the short notification sound used by a PWA: rendered with SoX
//! or FFmpeg, downloaded from a list of fallback URLs, or left to the user
//! with printed instructions.

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

pub use crate::{
    config::{OptionOverrides, SoundOptions},
    core::{
        download::{download_first, DownloadOutcome},
        inspect::inspect,
        menu::{exit_code, read_choice, write_menu, App},
        synth::{SynthPlan, SynthStep, Synthesizer},
        tools::{DetectedTool, ToolLocator},
    },
    error::{Result, SoundError},
    io::{
        process::{CommandRunner, CommandStatus, SystemRunner, ToolCommand},
        progress::set_download_progress_callback,
    },
    types::{MenuChoice, Outcome, Report, SoundDesign, SynthTool, ToneSpec},
};
