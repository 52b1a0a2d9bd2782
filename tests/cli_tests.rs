//! CLI integration tests

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn voice_bridge_bin(config_home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_voice-bridge"));
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG")
        .env_remove("VOICE_BRIDGE_BASE_DIR");
    cmd
}

fn run(config_home: &Path, args: &[&str]) -> Output {
    voice_bridge_bin(config_home)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn write_tone(path: &Path, millis: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..(8 * millis) {
        let sample = if i % 16 < 8 { 4000 } else { -4000 };
        writer.write_sample(sample as i16).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("play"));
    assert!(stdout.contains("record"));
    assert!(stdout.contains("duration"));
    assert!(stdout.contains("exec"));
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("--base-dir"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voice-bridge"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["config", "path"]);

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("voice-bridge"));
    assert!(stdout.ends_with("config.toml"));
}

#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();

    let output = run(home.path(), &["config", "set", "record_duration", "45s"]);
    assert!(output.status.success());
    let output = run(home.path(), &["config", "set", "audio.output", "Earpiece"]);
    assert!(output.status.success());

    let output = run(home.path(), &["config", "get", "record_duration"]);
    assert_eq!(stdout_of(&output), "45s");
    let output = run(home.path(), &["config", "get", "audio.output"]);
    assert_eq!(stdout_of(&output), "earpiece");
}

#[test]
fn config_init_then_list() {
    let home = TempDir::new().unwrap();

    let output = run(home.path(), &["config", "init"]);
    assert!(output.status.success());
    assert!(home.path().join("voice-bridge").join("config.toml").exists());

    let output = run(home.path(), &["config", "list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("record_duration"));
    assert!(stdout.contains("audio.sample_rate"));
}

#[test]
fn exec_position_of_unknown_session() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["exec", "getCurrentPosition", "a"]);

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "-1.0");
}

#[test]
fn exec_power_of_unknown_session() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["exec", "getPower", "a"]);

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "-1.0");
}

#[test]
fn exec_release_unknown_session() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["exec", "release", "a"]);

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "false");
}

#[test]
fn exec_bad_volume_is_ignored() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["exec", "setVolume", "a", "abc"]);

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "\"\"");
}

#[test]
fn exec_output_device_defaults_to_speaker() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["exec", "getOutputDevice"]);

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "2");
}

#[test]
fn exec_output_device_follows_flag() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["--output", "earpiece", "exec", "getOutputDevice"]);

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "1");
}

#[test]
fn duration_of_wav_file() {
    let home = TempDir::new().unwrap();
    let clip = home.path().join("clip.wav");
    write_tone(&clip, 1500);

    let output = run(home.path(), &["duration", clip.to_str().unwrap()]);

    assert!(output.status.success());
    let secs: f64 = stdout_of(&output).parse().unwrap();
    assert!((secs - 1.5).abs() < 0.01, "got {}", secs);
}

#[test]
fn duration_resolves_against_base_dir() {
    let home = TempDir::new().unwrap();
    write_tone(&home.path().join("clip.wav"), 500);

    let output = run(
        home.path(),
        &["--base-dir", home.path().to_str().unwrap(), "duration", "clip.wav"],
    );

    assert!(output.status.success());
    let secs: f64 = stdout_of(&output).parse().unwrap();
    assert!((secs - 0.5).abs() < 0.01, "got {}", secs);
}

#[test]
fn duration_accepts_file_uri() {
    let home = TempDir::new().unwrap();
    let clip = home.path().join("clip.wav");
    write_tone(&clip, 250);
    let uri = format!("file://{}", clip.display());

    let output = run(home.path(), &["duration", &uri]);

    assert!(output.status.success());
    let secs: f64 = stdout_of(&output).parse().unwrap();
    assert!((secs - 0.25).abs() < 0.01, "got {}", secs);
}
