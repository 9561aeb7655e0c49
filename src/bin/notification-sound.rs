use clap::Parser;
use notification_sound::{
    exit_code, set_download_progress_callback, App, OptionOverrides, SoundOptions,
};
use std::{env, io, path::PathBuf, process};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "notification-sound")]
#[command(about = "Generate or fetch the notification sound of a PWA", long_about = None)]
#[command(version)]
struct Cli {
    /// Menu entry to run (1, 2 or 3) instead of prompting
    #[arg(short, long)]
    choice: Option<String>,

    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Download source, tried in the given order; repeatable
    #[arg(long = "url")]
    urls: Vec<String>,

    #[arg(long)]
    tmp_dir: Option<PathBuf>,

    /// JSON file with options
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let overrides = OptionOverrides {
        output_path: cli.output.clone(),
        download_urls: cli.urls.clone(),
        tmp_dir: cli.tmp_dir.clone(),
    };
    let options = match SoundOptions::resolve(cli.config.as_deref(), |k| env::var(k).ok(), overrides) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    setup_progress_callback();

    let app = App::new(options);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match cli.choice.as_deref() {
        Some(raw) => app.run_selection(raw, &mut out),
        None => {
            let stdin = io::stdin();
            app.run(&mut stdin.lock(), &mut out)
        }
    };

    match &result {
        Err(e) if !e.is_reported() => eprintln!("Error: {}", e),
        _ => {}
    }
    process::exit(exit_code(&result));
}
