use crate::{
    config::SoundOptions,
    core::{
        download::{download_first, DownloadOutcome},
        instructions::{write_install_guidance, write_instructions},
        synth::Synthesizer,
        tools::ToolLocator,
    },
    error::{Result, SoundError},
    io::{
        net::http_client,
        process::{CommandRunner, SystemRunner},
    },
    types::{MenuChoice, Outcome, Report},
};
use std::io::{BufRead, Write};

const BANNER: &str = "
    ╔══════════════════════════════════════════╗
    ║     PWA Notification Sound Generator     ║
    ╚══════════════════════════════════════════╝
";

/// Ties the menu to the three ways of getting a sound file.
pub struct App {
    options: SoundOptions,
    locator: ToolLocator,
    runner: Box<dyn CommandRunner>,
}

impl App {
    pub fn new(options: SoundOptions) -> Self {
        Self {
            options,
            locator: ToolLocator::from_env(),
            runner: Box::new(SystemRunner),
        }
    }

    pub fn with_locator(mut self, locator: ToolLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn options(&self) -> &SoundOptions {
        &self.options
    }

    /// Banner, menu, one line of input, one path.
    pub fn run<R: BufRead + ?Sized, W: Write + ?Sized>(
        &self,
        input: &mut R,
        out: &mut W,
    ) -> Result<Outcome> {
        write_menu(out)?;
        write!(out, "\nYour choice (1-3): ")?;
        out.flush()?;

        self.dispatch(read_choice(input), out)
    }

    /// Runs a raw menu selection such as `"2"`. An unknown selection is
    /// reported on `out` and returned as `InvalidChoice`.
    pub fn run_selection<W: Write + ?Sized>(&self, raw: &str, out: &mut W) -> Result<Outcome> {
        self.dispatch(raw.parse(), out)
    }

    fn dispatch<W: Write + ?Sized>(&self, parsed: Result<MenuChoice>, out: &mut W) -> Result<Outcome> {
        match parsed {
            Ok(choice) => self.run_choice(choice, out),
            Err(e @ SoundError::InvalidChoice(_)) => {
                writeln!(out, "❌ Invalid option")?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub fn run_choice<W: Write + ?Sized>(&self, choice: MenuChoice, out: &mut W) -> Result<Outcome> {
        self.options.validate()?;
        tracing::debug!(?choice, "dispatching");

        let outcome = match choice {
            MenuChoice::Synthesize => self.synthesize(out)?,
            MenuChoice::Download => self.download(out)?,
            MenuChoice::Instructions => {
                write_instructions(out)?;
                Outcome::InstructionsShown
            }
        };

        writeln!(out, "\n✅ Done!")?;
        writeln!(
            out,
            "📍 Put {} in the root folder of your site",
            self.options.output_path.display()
        )?;
        Ok(outcome)
    }

    fn synthesize<W: Write + ?Sized>(&self, out: &mut W) -> Result<Outcome> {
        writeln!(out, "🔊 Generating the notification sound...")?;

        let Some(detected) = self.locator.detect_synth_tool() else {
            write_install_guidance(out)?;
            return Err(SoundError::NoSynthesisTool);
        };
        let tool = detected.tool;
        writeln!(out, "✅ Using {tool}")?;

        let report = Synthesizer::new(detected, &self.options.design, self.runner.as_ref())
            .with_tmp_root(self.options.tmp_dir.clone())
            .synthesize(&self.options.output_path)?;

        writeln!(out, "✅ File created: {}", report.path.display())?;
        write_report(out, &report)?;
        Ok(Outcome::Synthesized { tool, report })
    }

    fn download<W: Write + ?Sized>(&self, out: &mut W) -> Result<Outcome> {
        let client = http_client(
            self.options.connect_timeout_secs,
            self.options.request_timeout_secs,
        )?;

        let outcome = download_first(
            &client,
            &self.options.download_urls,
            &self.options.output_path,
            out,
        )?;

        Ok(match outcome {
            DownloadOutcome::Fetched { url, report } => {
                write_report(out, &report)?;
                Outcome::Downloaded { url, report }
            }
            DownloadOutcome::Exhausted { attempted } => Outcome::DownloadsExhausted { attempted },
        })
    }
}

pub fn write_menu<W: Write + ?Sized>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{BANNER}")?;
    writeln!(out, "Choose an option:")?;
    writeln!(out, "1. Generate a sound with SoX/FFmpeg (recommended)")?;
    writeln!(out, "2. Download a free sound")?;
    writeln!(out, "3. Instructions for a manual upload")
}

/// Reads one line; end of input counts as an empty (invalid) selection.
pub fn read_choice<R: BufRead + ?Sized>(input: &mut R) -> Result<MenuChoice> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    line.trim().parse()
}

fn write_report<W: Write + ?Sized>(out: &mut W, report: &Report) -> std::io::Result<()> {
    writeln!(out, "📊 Size: {:.2} KB", report.size_kb())?;
    if let Some(d) = report.duration_secs {
        writeln!(out, "⏱️  Duration: {d:.2} s")?;
    }
    Ok(())
}

/// Process exit status for a finished run.
pub fn exit_code(result: &Result<Outcome>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
