mod common;

use common::{dir_entries, RecordingRunner};
use httpmock::prelude::*;
use notification_sound::{
    exit_code, read_choice, App, MenuChoice, Outcome, SoundError, SoundOptions, ToolLocator,
};
use std::{fs, io::Cursor, path::Path};
use tempfile::{tempdir, TempDir};

fn options_in(dir: &Path) -> SoundOptions {
    SoundOptions {
        output_path: dir.join("notification-sound.mp3"),
        tmp_dir: Some(dir.join("scratch")),
        download_urls: vec![],
        connect_timeout_secs: 2,
        request_timeout_secs: 5,
        ..SoundOptions::default()
    }
}

/// App with an empty search path, so no synthesis tool is ever found.
fn bare_app(dir: &TempDir) -> App {
    let empty_bin = dir.path().join("bin");
    fs::create_dir_all(&empty_bin).unwrap();
    App::new(options_in(dir.path()))
        .with_locator(ToolLocator::with_search_path(&empty_bin))
        .with_runner(RecordingRunner::default())
}

fn run_with_input(app: &App, input: &str) -> (Result<Outcome, SoundError>, String) {
    let mut out: Vec<u8> = Vec::new();
    let res = app.run(&mut Cursor::new(input.as_bytes()), &mut out);
    (res, String::from_utf8(out).unwrap())
}

#[test]
fn selector_parsing_trims_whitespace() {
    assert_eq!(" 2 \n".parse::<MenuChoice>().unwrap(), MenuChoice::Download);
    assert_eq!(
        read_choice(&mut Cursor::new("1\r\n")).unwrap(),
        MenuChoice::Synthesize
    );
    assert_eq!(
        read_choice(&mut Cursor::new("3")).unwrap(),
        MenuChoice::Instructions
    );
    assert!(matches!(
        read_choice(&mut Cursor::new("")),
        Err(SoundError::InvalidChoice(s)) if s.is_empty()
    ));
}

#[test]
fn instructions_print_text_and_touch_nothing() {
    let dir = tempdir().unwrap();
    let app = bare_app(&dir);

    let (res, text) = run_with_input(&app, "3\n");

    assert_eq!(exit_code(&res), 0);
    assert_eq!(res.unwrap(), Outcome::InstructionsShown);
    assert!(text.contains("Choose an option:"));
    assert!(text.contains("Instructions for a custom sound"));
    assert!(text.contains("Rename the file to: notification-sound.mp3"));
    assert!(text.contains("✅ Done!"));
    assert_eq!(dir_entries(dir.path()), ["bin"]);
}

#[test]
fn unknown_selector_fails_without_side_effects() {
    let dir = tempdir().unwrap();
    let app = bare_app(&dir);

    for input in ["9\n", "\n", "", "12\n", "one\n"] {
        let (res, text) = run_with_input(&app, input);
        assert_eq!(exit_code(&res), 1, "input {input:?}");
        assert!(matches!(res, Err(SoundError::InvalidChoice(_))));
        assert!(text.contains("❌ Invalid option"));
        assert!(!text.contains("✅ Done!"));
    }
    assert_eq!(dir_entries(dir.path()), ["bin"]);
}

#[test]
fn missing_tools_print_guidance_and_exit_non_zero() {
    let dir = tempdir().unwrap();
    let app = bare_app(&dir);

    let (res, text) = run_with_input(&app, "1\n");

    assert_eq!(exit_code(&res), 1);
    assert!(matches!(res, Err(SoundError::NoSynthesisTool)));
    assert!(text.contains("sox or ffmpeg is required"));
    assert!(text.contains("sudo apt-get install sox libsox-fmt-mp3"));
    assert!(text.contains("brew install sox"));
    assert!(!app.options().output_path.exists());
    assert_eq!(dir_entries(dir.path()), ["bin"]);
}

#[cfg(unix)]
#[test]
fn synthesize_uses_detected_tool() {
    let dir = tempdir().unwrap();
    let bin = dir.path().join("bin");
    fs::create_dir_all(&bin).unwrap();
    common::make_executable(&bin, "ffmpeg");

    let runner = RecordingRunner::default();
    let app = App::new(options_in(dir.path()))
        .with_locator(ToolLocator::with_search_path(&bin))
        .with_runner(runner.clone());

    let (res, text) = run_with_input(&app, "1\n");

    assert_eq!(exit_code(&res), 0);
    match res.unwrap() {
        Outcome::Synthesized { tool, report } => {
            assert_eq!(tool, notification_sound::SynthTool::Ffmpeg);
            assert_eq!(report.path, app.options().output_path);
        }
        other => panic!("expected Synthesized, got {other:?}"),
    }
    assert!(text.contains("✅ Using FFmpeg"));
    assert!(text.contains("📊 Size: "));

    let calls = runner.calls();
    assert_eq!(calls.len(), 4);
    assert!(calls.iter().all(|c| c.program == bin.join("ffmpeg")));
    assert!(app.options().output_path.exists());
    assert!(dir_entries(&dir.path().join("scratch")).is_empty());
}

#[test]
fn download_fallback_through_menu() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/missing.mp3");
        then.status(404);
    });
    server.mock(|when, then| {
        when.method(GET).path("/bell.mp3");
        then.status(200).body("ding-ding");
    });

    let mut options = options_in(dir.path());
    options.download_urls = vec![server.url("/missing.mp3"), server.url("/bell.mp3")];
    let app = App::new(options).with_runner(RecordingRunner::default());

    let mut out: Vec<u8> = Vec::new();
    let res = app.run_choice(MenuChoice::Download, &mut out);

    assert_eq!(exit_code(&res), 0);
    assert!(matches!(res, Ok(Outcome::Downloaded { ref url, .. }) if url == &server.url("/bell.mp3")));
    assert_eq!(
        fs::read_to_string(&app.options().output_path).unwrap(),
        "ding-ding"
    );
}

#[test]
fn exhausted_downloads_still_exit_zero() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/a.mp3");
        then.status(500);
    });

    let mut options = options_in(dir.path());
    options.download_urls = vec![server.url("/a.mp3"), server.url("/b.mp3")];
    let app = App::new(options);

    let (res, text) = run_with_input(&app, "2\n");

    assert_eq!(exit_code(&res), 0);
    assert_eq!(res.unwrap(), Outcome::DownloadsExhausted { attempted: 2 });
    assert!(text.contains("❌ Could not download a sound"));
    assert!(!app.options().output_path.exists());
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn invalid_options_are_rejected_before_running() {
    let dir = tempdir().unwrap();
    let mut options = options_in(dir.path());
    options.design.sample_rate = 0;
    let app = App::new(options);

    let res = app.run_choice(MenuChoice::Instructions, &mut Vec::<u8>::new());
    assert!(matches!(res, Err(SoundError::Config(_))));
    assert_eq!(exit_code(&res), 1);
}

#[test]
fn invalid_selection_is_reported_once() {
    let dir = tempdir().unwrap();
    let app = bare_app(&dir);

    let mut out: Vec<u8> = Vec::new();
    let err = app.run_selection("7", &mut out).unwrap_err();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(text.matches("❌ Invalid option").count(), 1);
    assert!(err.is_reported());

    let (res, text) = run_with_input(&app, "x\n");
    assert_eq!(text.matches("❌ Invalid option").count(), 1);
    assert!(res.unwrap_err().is_reported());
}

#[test]
fn only_menu_failures_count_as_reported() {
    assert!(SoundError::NoSynthesisTool.is_reported());
    assert!(SoundError::InvalidChoice("4".into()).is_reported());
    assert!(!SoundError::Config("x".into()).is_reported());
    assert!(!SoundError::StepFailed {
        tool: "sox",
        step: "gap",
        detail: "exit 1".into(),
    }
    .is_reported());
}
