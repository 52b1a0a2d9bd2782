//! Error scenario integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn voice_bridge_bin(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("voice-bridge").expect("binary is built");
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG")
        .env_remove("VOICE_BRIDGE_BASE_DIR");
    cmd
}

#[test]
fn exec_unknown_action() {
    let home = TempDir::new().unwrap();
    voice_bridge_bin(&home)
        .args(["exec", "fastForward", "a"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unrecognized action"))
        .stderr(predicate::str::contains("startPlaying"));
}

#[test]
fn exec_missing_argument() {
    let home = TempDir::new().unwrap();
    voice_bridge_bin(&home)
        .args(["exec", "seekTo", "a"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

#[test]
fn exec_wrong_argument_type() {
    let home = TempDir::new().unwrap();
    voice_bridge_bin(&home)
        .args(["exec", "seekTo", "a", "soon"])
        .assert()
        .code(2);
}

#[test]
fn exec_play_missing_file() {
    let home = TempDir::new().unwrap();
    voice_bridge_bin(&home)
        .args(["exec", "startPlaying", "a", "/no/such/clip.wav"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("(code 1)"));
}

#[test]
fn exec_play_network_source_not_supported() {
    let home = TempDir::new().unwrap();
    voice_bridge_bin(&home)
        .args(["exec", "startPlaying", "a", "https://example.com/clip.mp3"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("(code 4)"));
}

#[test]
fn play_missing_file() {
    let home = TempDir::new().unwrap();
    voice_bridge_bin(&home)
        .args(["play", "/no/such/clip.wav"])
        .assert()
        .code(1);
}

#[test]
fn play_garbage_file_is_decode_error() {
    let home = TempDir::new().unwrap();
    let junk = home.path().join("junk.wav");
    std::fs::write(&junk, b"definitely not audio").unwrap();

    voice_bridge_bin(&home)
        .args(["play", junk.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("(code 3)"));
}

#[test]
fn duration_of_missing_file() {
    let home = TempDir::new().unwrap();
    voice_bridge_bin(&home)
        .args(["duration", "/no/such/clip.wav"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown"));
}

#[test]
fn record_invalid_duration() {
    let home = TempDir::new().unwrap();
    voice_bridge_bin(&home)
        .args(["record", "out.wav", "-d", "soon"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn invalid_output_flag() {
    let home = TempDir::new().unwrap();
    voice_bridge_bin(&home)
        .args(["--output", "headphones", "exec", "getOutputDevice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("headphones"));
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    voice_bridge_bin(&home)
        .args(["config", "get", "api_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_invalid_values() {
    let home = TempDir::new().unwrap();
    for (key, value) in [
        ("record_duration", "invalid"),
        ("audio.output", "headphones"),
        ("audio.sample_rate", "100"),
        ("log_level", "loud"),
    ] {
        voice_bridge_bin(&home)
            .args(["config", "set", key, value])
            .assert()
            .failure()
            .stderr(predicate::str::contains(key));
    }
}

#[test]
fn config_list_with_no_file() {
    let home = TempDir::new().unwrap();
    voice_bridge_bin(&home)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not set"));
}

#[test]
fn broken_config_file_is_ignored() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("voice-bridge");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "record_duration = [").unwrap();

    voice_bridge_bin(&home)
        .args(["exec", "release", "a"])
        .assert()
        .success()
        .stdout("false\n")
        .stderr(predicate::str::contains("Ignoring config file"));
}

#[test]
fn missing_earpiece_device_fails_at_startup() {
    let home = TempDir::new().unwrap();
    for (key, value) in [
        ("audio.output", "earpiece"),
        ("audio.earpiece_device", "no-such-device-xyz"),
    ] {
        voice_bridge_bin(&home)
            .args(["config", "set", key, value])
            .assert()
            .success();
    }

    voice_bridge_bin(&home)
        .args(["exec", "getOutputDevice"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no-such-device-xyz"));
}
