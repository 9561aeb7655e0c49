use crate::{
    core::{inspect::inspect, tools::DetectedTool},
    error::{Result, SoundError},
    io::process::{CommandRunner, ToolCommand},
    types::{fmt_num, Report, SoundDesign, SynthTool, ToneSpec},
};
use anyhow::Context;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::{Builder, TempDir};

/// One external invocation of the synthesis sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct SynthStep {
    pub label: &'static str,
    pub command: ToolCommand,
}

/// Everything a synthesis run does inside its scratch directory.
#[derive(Clone, Debug, PartialEq)]
pub struct SynthPlan {
    /// Files written before the first step runs.
    pub files: Vec<(PathBuf, String)>,
    pub steps: Vec<SynthStep>,
    /// Final transcoded file, copied onto the output path.
    pub product: PathBuf,
}

impl SynthPlan {
    pub fn build(
        tool: SynthTool,
        program: &Path,
        design: &SoundDesign,
        workdir: &Path,
        ext: &str,
    ) -> Self {
        let tone1 = workdir.join("tone1.wav");
        let gap = workdir.join("gap.wav");
        let tone2 = workdir.join("tone2.wav");
        let product = workdir.join(format!("notification.{ext}"));

        match tool {
            SynthTool::Sox => {
                let joined = workdir.join("joined.wav");
                let steps = vec![
                    SynthStep {
                        label: "first tone",
                        command: sox_tone(program, design, &design.first_tone, &tone1),
                    },
                    SynthStep {
                        label: "gap",
                        command: sox_blank(program, design)
                            .arg(gap.as_os_str())
                            .args(["trim", "0"])
                            .arg(fmt_num(design.gap_secs))
                            .with_output(&gap),
                    },
                    SynthStep {
                        label: "second tone",
                        command: sox_tone(program, design, &design.second_tone, &tone2),
                    },
                    SynthStep {
                        label: "concatenate",
                        command: ToolCommand::new(program, &joined)
                            .arg(tone1.as_os_str())
                            .arg(gap.as_os_str())
                            .arg(tone2.as_os_str())
                            .arg(joined.as_os_str()),
                    },
                    SynthStep {
                        label: "transcode",
                        command: ToolCommand::new(program, &product)
                            .arg(joined.as_os_str())
                            .arg("-C")
                            .arg(design.bitrate_kbps.to_string())
                            .arg(product.as_os_str()),
                    },
                ];
                SynthPlan {
                    files: Vec::new(),
                    steps,
                    product,
                }
            }
            SynthTool::Ffmpeg => {
                let list = workdir.join("concat.txt");
                let listing = concat_listing(&[tone1.as_path(), gap.as_path(), tone2.as_path()]);

                let mut transcode = ffmpeg(program, &product)
                    .args(["-f", "concat", "-safe", "0", "-i"])
                    .arg(list.as_os_str());
                if let Some(codec) = ffmpeg_codec(ext) {
                    transcode = transcode.args(["-c:a", codec]);
                }
                let transcode = transcode
                    .arg("-b:a")
                    .arg(format!("{}k", design.bitrate_kbps))
                    .arg(product.as_os_str());

                let steps = vec![
                    SynthStep {
                        label: "first tone",
                        command: ffmpeg_tone(program, design, &design.first_tone, &tone1),
                    },
                    SynthStep {
                        label: "gap",
                        command: ffmpeg(program, &gap)
                            .args(["-f", "lavfi", "-i"])
                            .arg(format!("anullsrc=r={}:cl=mono", design.sample_rate))
                            .arg("-t")
                            .arg(fmt_num(design.gap_secs))
                            .arg(gap.as_os_str()),
                    },
                    SynthStep {
                        label: "second tone",
                        command: ffmpeg_tone(program, design, &design.second_tone, &tone2),
                    },
                    SynthStep {
                        label: "concatenate and transcode",
                        command: transcode,
                    },
                ];
                SynthPlan {
                    files: vec![(list, listing)],
                    steps,
                    product,
                }
            }
        }
    }
}

// sox -n -r <sr> -c 1 <out> ...
fn sox_blank(program: &Path, design: &SoundDesign) -> ToolCommand {
    ToolCommand::new(program, PathBuf::new())
        .args(["-n", "-r"])
        .arg(design.sample_rate.to_string())
        .args(["-c", "1"])
}

fn sox_tone(program: &Path, design: &SoundDesign, tone: &ToneSpec, out: &Path) -> ToolCommand {
    let dur = fmt_num(tone.duration_secs);
    sox_blank(program, design)
        .arg(out.as_os_str())
        .arg("synth")
        .arg(&dur)
        .arg("sine")
        .arg(fmt_num(tone.frequency_hz))
        .arg("fade")
        .arg(fmt_num(tone.fade_in_secs))
        .arg(&dur)
        .arg(fmt_num(tone.fade_out_secs))
        .with_output(out)
}

fn ffmpeg(program: &Path, output: &Path) -> ToolCommand {
    ToolCommand::new(program, output).args(["-hide_banner", "-loglevel", "error", "-y"])
}

fn ffmpeg_tone(program: &Path, design: &SoundDesign, tone: &ToneSpec, out: &Path) -> ToolCommand {
    // Snap to whole nanoseconds so 0.15 - 0.05 prints as 0.1.
    let fade_out_start = ((tone.duration_secs - tone.fade_out_secs).max(0.0) * 1e9).round() / 1e9;
    ffmpeg(program, out)
        .args(["-f", "lavfi", "-i"])
        .arg(format!(
            "sine=frequency={}:sample_rate={}:duration={}",
            fmt_num(tone.frequency_hz),
            design.sample_rate,
            fmt_num(tone.duration_secs)
        ))
        .arg("-af")
        .arg(format!(
            "afade=t=in:st=0:d={},afade=t=out:st={}:d={}",
            fmt_num(tone.fade_in_secs),
            fmt_num(fade_out_start),
            fmt_num(tone.fade_out_secs)
        ))
        .args(["-ac", "1"])
        .arg(out.as_os_str())
}

fn ffmpeg_codec(ext: &str) -> Option<&'static str> {
    match ext {
        "mp3" => Some("libmp3lame"),
        "ogg" => Some("libvorbis"),
        "opus" => Some("libopus"),
        _ => None,
    }
}

/// Body of an ffmpeg concat demuxer list.
pub fn concat_listing(parts: &[&Path]) -> String {
    parts
        .iter()
        .map(|p| {
            let quoted = p.to_string_lossy().replace('\'', r"'\''");
            format!("file '{quoted}'\n")
        })
        .collect()
}

fn output_extension(output: &Path) -> String {
    output
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "mp3".into())
}

/// Runs a [`SynthPlan`] for the detected tool and places the result on disk.
pub struct Synthesizer<'a> {
    detected: DetectedTool,
    design: &'a SoundDesign,
    runner: &'a dyn CommandRunner,
    tmp_root: Option<PathBuf>,
}

impl<'a> Synthesizer<'a> {
    pub fn new(
        detected: DetectedTool,
        design: &'a SoundDesign,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            detected,
            design,
            runner,
            tmp_root: None,
        }
    }

    pub fn with_tmp_root(mut self, tmp_root: Option<PathBuf>) -> Self {
        self.tmp_root = tmp_root;
        self
    }

    /// Renders the sound into `output`. Stops at the first failing step;
    /// `output` is only written once every step succeeded.
    pub fn synthesize(&self, output: &Path) -> Result<Report> {
        let work = self.scratch_dir()?;
        let plan = SynthPlan::build(
            self.detected.tool,
            &self.detected.program,
            self.design,
            work.path(),
            &output_extension(output),
        );

        for (path, contents) in &plan.files {
            fs::write(path, contents)
                .with_context(|| format!("Failed to write {:?}", path))?;
        }

        for step in &plan.steps {
            self.run_step(step)?;
        }

        fs::copy(&plan.product, output)
            .with_context(|| format!("Failed to copy result to {:?}", output))?;

        tracing::info!(
            tool = %self.detected.tool,
            output = %output.display(),
            "sound synthesized"
        );

        let report = inspect(output)?;
        Ok(report)
    }

    fn scratch_dir(&self) -> Result<TempDir> {
        let mut builder = Builder::new();
        builder.prefix("notification-sound-");
        let dir = match &self.tmp_root {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        Ok(dir)
    }

    fn run_step(&self, step: &SynthStep) -> Result<()> {
        let tool = self.detected.tool.display_name();
        tracing::debug!(step = step.label, command = %step.command, "synthesis step");

        let status = self
            .runner
            .run(&step.command)
            .map_err(|e| SoundError::StepFailed {
                tool,
                step: step.label,
                detail: format!("could not start {}: {e}", step.command.program.display()),
            })?;

        if !status.success {
            return Err(SoundError::StepFailed {
                tool,
                step: step.label,
                detail: status.describe(),
            });
        }

        if !step.command.output.is_file() {
            return Err(SoundError::StepFailed {
                tool,
                step: step.label,
                detail: format!("{} was not produced", step.command.output.display()),
            });
        }

        Ok(())
    }
}
