use std::{fs, fs::File, path::Path};

use anyhow::{Context, Result};
use symphonia::core::{
    codecs::DecoderOptions, formats::FormatOptions, io::MediaSourceStream,
    meta::MetadataOptions, probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};

use crate::types::Report;

/// Size of `path` plus its duration when symphonia can read it.
pub fn inspect<P: AsRef<Path>>(path: P) -> Result<Report> {
    let path: &Path = path.as_ref();

    let size_bytes = fs::metadata(path)
        .with_context(|| format!("Output file missing: {:?}", path))?
        .len();

    let duration_secs = match read_duration(path) {
        Ok(d) => Some(d),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read audio duration");
            None
        }
    };

    Ok(Report {
        path: path.to_path_buf(),
        size_bytes,
        duration_secs,
    })
}

pub fn read_duration(path: &Path) -> Result<f64> {
    let file: File =
        File::open(path).with_context(|| format!("Failed to open audio file: {:?}", path))?;

    let mss: MediaSourceStream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint: Hint = Hint::new();

    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let detected = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut format = detected.format;
    let track = format.default_track().context("No default track found")?;
    let track_id = track.id;
    let params = track.codec_params.clone();

    if let (Some(frames), Some(rate)) = (params.n_frames, params.sample_rate) {
        if rate > 0 {
            return Ok(frames as f64 / rate as f64);
        }
    }

    // No frame count in the header: decode and count.
    let mut decoder = get_codecs().make(&params, &DecoderOptions::default())?;
    let mut frames: u64 = 0;
    let mut sample_rate: u32 = params.sample_rate.unwrap_or(0);

    while let Ok(packet) = format.next_packet() {
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = decoder.decode(&packet)?;
        sample_rate = decoded.spec().rate;
        frames += decoded.frames() as u64;
    }

    anyhow::ensure!(sample_rate > 0, "Unknown sample rate for {:?}", path);

    Ok(frames as f64 / sample_rate as f64)
}
