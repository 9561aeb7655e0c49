use crate::{
    error::{Result, SoundError},
    types::{SoundDesign, ToneSpec},
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf};

pub const ENV_OUTPUT: &str = "NOTIFICATION_SOUND_OUTPUT";
pub const ENV_URLS: &str = "NOTIFICATION_SOUND_URLS";
pub const ENV_TMP_DIR: &str = "NOTIFICATION_SOUND_TMP_DIR";

pub const DEFAULT_OUTPUT: &str = "notification-sound.mp3";

pub const DEFAULT_URLS: [&str; 2] = [
    "https://notificationsounds.com/soundfiles/notification.mp3",
    "https://assets.mixkit.co/sfx/preview/mixkit-bell-notification-933.mp3",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundOptions {
    pub output_path: PathBuf,
    pub download_urls: Vec<String>,
    /// Parent for the per-run scratch directory. System temp dir when unset.
    pub tmp_dir: Option<PathBuf>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub design: SoundDesign,
}

impl Default for SoundOptions {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT.into(),
            download_urls: DEFAULT_URLS.iter().map(|u| u.to_string()).collect(),
            tmp_dir: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 60,
            design: SoundDesign::default(),
        }
    }
}

/// Values given on the command line; they win over every other source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionOverrides {
    pub output_path: Option<PathBuf>,
    pub download_urls: Vec<String>,
    pub tmp_dir: Option<PathBuf>,
}

impl SoundOptions {
    /// Defaults, then the JSON file, then the environment, then `overrides`.
    /// The result is validated.
    pub fn resolve(
        config: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
        overrides: OptionOverrides,
    ) -> Result<Self> {
        let base = match config {
            Some(path) => Self::load_file(path)?,
            None => Self::default(),
        };
        let opts = base.apply_env_from(lookup).apply_overrides(overrides);
        opts.validate()?;
        Ok(opts)
    }

    /// Reads a JSON file; missing keys keep their defaults.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let opts: SoundOptions = serde_json::from_str(&raw)?;
        Ok(opts)
    }

    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| env::var(key).ok())
    }

    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(out) = lookup(ENV_OUTPUT).filter(|v| !v.trim().is_empty()) {
            self.output_path = PathBuf::from(out.trim());
        }
        if let Some(urls) = lookup(ENV_URLS) {
            let urls: Vec<String> = urls
                .split(',')
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(String::from)
                .collect();
            if !urls.is_empty() {
                self.download_urls = urls;
            }
        }
        if let Some(tmp) = lookup(ENV_TMP_DIR).filter(|v| !v.trim().is_empty()) {
            self.tmp_dir = Some(PathBuf::from(tmp.trim()));
        }
        self
    }

    pub fn apply_overrides(mut self, overrides: OptionOverrides) -> Self {
        if let Some(output) = overrides.output_path {
            self.output_path = output;
        }
        if !overrides.download_urls.is_empty() {
            self.download_urls = overrides.download_urls;
        }
        if let Some(tmp) = overrides.tmp_dir {
            self.tmp_dir = Some(tmp);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_path.as_os_str().is_empty() {
            return Err(SoundError::Config("output path is empty".into()));
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(SoundError::Config("timeouts must be > 0".into()));
        }
        let d = &self.design;
        if d.sample_rate == 0 {
            return Err(SoundError::Config("sample_rate must be > 0".into()));
        }
        if d.bitrate_kbps == 0 {
            return Err(SoundError::Config("bitrate_kbps must be > 0".into()));
        }
        if !(d.gap_secs.is_finite() && d.gap_secs >= 0.0) {
            return Err(SoundError::Config(format!("bad gap_secs {}", d.gap_secs)));
        }
        check_tone("first_tone", &d.first_tone)?;
        check_tone("second_tone", &d.second_tone)?;
        Ok(())
    }
}

fn check_tone(name: &str, t: &ToneSpec) -> Result<()> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    let non_negative = |v: f64| v.is_finite() && v >= 0.0;

    if !positive(t.frequency_hz) || !positive(t.duration_secs) {
        return Err(SoundError::Config(format!(
            "{name}: frequency and duration must be positive"
        )));
    }
    if !non_negative(t.fade_in_secs) || !non_negative(t.fade_out_secs) {
        return Err(SoundError::Config(format!("{name}: negative fade")));
    }
    if t.fade_in_secs > t.duration_secs || t.fade_out_secs > t.duration_secs {
        return Err(SoundError::Config(format!(
            "{name}: fade longer than the tone ({}s)",
            t.duration_secs
        )));
    }
    Ok(())
}
