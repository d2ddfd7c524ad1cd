#![cfg(all(unix, feature = "cli"))]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use phrost::client::{connect, EndedBy, TickResponse};
use phrost::pack::{ChannelEncoder, Channel};
use phrost::{args, CommandEncoder, EventKind};
use serde_json::Value as Json;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/phrost-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn phrost(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_phrost"));
    cmd.args(["--log-level", "error", "--format", "json"]).args(args);
    cmd
}

fn json_lines(output: &Output) -> Vec<Json> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line should be JSON"))
        .collect()
}

fn spawn_engine(path: &Path, extra: &[&str]) -> Child {
    let child = phrost(&["engine", path.to_str().expect("utf-8 path")])
        .args(extra)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("engine should start");

    let start = Instant::now();
    while !path.exists() {
        if start.elapsed() >= Duration::from_secs(5) {
            panic!("engine did not bind {}", path.display());
        }
        thread::sleep(Duration::from_millis(20));
    }
    child
}

#[test]
fn catalog_lists_every_kind() {
    let output = phrost(&["catalog"]).output().expect("catalog should run");
    assert!(output.status.success());

    let entries = json_lines(&output).remove(0);
    let entries = entries.as_array().expect("catalog should be an array");
    assert_eq!(entries.len(), EventKind::ALL.len());

    let remove = entries
        .iter()
        .find(|e| e["name"] == "SPRITE_REMOVE")
        .expect("SPRITE_REMOVE should be listed");
    assert_eq!(remove["code"], 1);
    assert_eq!(remove["layout"], "fixed");
    assert_eq!(remove["size"], 16);

    let text = entries
        .iter()
        .find(|e| e["name"] == "TEXT_ADD")
        .expect("TEXT_ADD should be listed");
    assert_eq!(text["layout"], "variable");
    assert_eq!(text["header_size"], 64);
}

#[test]
fn decode_prints_command_blob() {
    let dir = unique_temp_dir("decode");
    let file = dir.join("commands.bin");

    let mut encoder = CommandEncoder::new();
    encoder
        .add(EventKind::SpriteRemove, args![42i64, 7i64])
        .expect("valid command");
    encoder
        .add(EventKind::AudioLoad, args![7u32, "hit.wav"])
        .expect("valid command");
    std::fs::write(&file, encoder.finalize()).expect("blob should be writable");

    let output = phrost(&["decode", file.to_str().expect("utf-8 path")])
        .output()
        .expect("decode should run");
    assert!(output.status.success());

    let batch = json_lines(&output).remove(0);
    assert_eq!(batch["declared"], 2);
    assert_eq!(batch["events"][0]["name"], "SPRITE_REMOVE");
    assert_eq!(batch["events"][0]["id1"], 42);
    assert_eq!(batch["events"][1]["path"], "hit.wav");
    assert!(batch.get("halted").is_none());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn decode_truncated_blob_prints_prefix_and_returns_60() {
    let dir = unique_temp_dir("truncated");
    let file = dir.join("commands.bin");

    let mut encoder = CommandEncoder::new();
    encoder
        .add(EventKind::CameraSetZoom, args![2.0])
        .expect("valid command");
    encoder
        .add(EventKind::CameraMove, args![1.0, 1.0])
        .expect("valid command");
    let blob = encoder.finalize();
    std::fs::write(&file, &blob[..blob.len() - 4]).expect("blob should be writable");

    let output = phrost(&["decode", file.to_str().expect("utf-8 path")])
        .output()
        .expect("decode should run");
    assert_eq!(output.status.code(), Some(60));

    let batch = json_lines(&output).remove(0);
    assert_eq!(batch["events"].as_array().map(Vec::len), Some(1));
    assert!(batch["halted"]
        .as_str()
        .is_some_and(|msg| msg.contains("truncated")));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn decode_channel_blob_prints_one_batch_per_channel() {
    let dir = unique_temp_dir("channels");
    let file = dir.join("channels.bin");

    let mut mux = ChannelEncoder::new();
    mux.add(Channel::Window, EventKind::WindowResize, args![800i32, 600i32])
        .expect("valid command");
    mux.add(Channel::Renderer, EventKind::SpriteRemove, args![1i64, 2i64])
        .expect("valid command");
    std::fs::write(&file, mux.finalize()).expect("blob should be writable");

    let output = phrost(&["decode", "--channels", file.to_str().expect("utf-8 path")])
        .output()
        .expect("decode should run");
    assert!(output.status.success());

    let batches = json_lines(&output);
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0]["channel"], 0);
    assert_eq!(batches[0]["channel_name"], "RENDERER");
    assert_eq!(batches[1]["channel"], 5);
    assert_eq!(batches[1]["events"][0]["w"], 800);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn probe_answers_mock_engine() {
    let dir = unique_temp_dir("probe");
    let sock = dir.join("engine.sock");
    let events = dir.join("events.bin");

    let mut encoder = CommandEncoder::new();
    encoder
        .add(EventKind::InputKeydown, args![4i32, 97u32, 0u16, 0u8])
        .expect("valid event");
    std::fs::write(&events, encoder.finalize()).expect("blob should be writable");

    let engine = spawn_engine(
        &sock,
        &["--frames", "1", "--dt", "0.25", "--events", events.to_str().expect("utf-8 path")],
    );

    let probe = phrost(&["probe", "--endpoint", sock.to_str().expect("utf-8 path")])
        .output()
        .expect("probe should run");
    assert!(
        probe.status.success(),
        "probe failed: {}",
        String::from_utf8_lossy(&probe.stderr)
    );
    let tick = json_lines(&probe).remove(0);
    assert_eq!(tick["frame"], 0);
    assert_eq!(tick["dt"], 0.25);
    assert_eq!(tick["events"][0]["name"], "INPUT_KEYDOWN");
    assert_eq!(tick["events"][0]["keycode"], 97);

    let engine = engine.wait_with_output().expect("engine should exit");
    assert!(engine.status.success());
    let answer = json_lines(&engine).remove(0);
    assert_eq!(answer["payload_size"], 0);
    assert_eq!(answer["declared"], 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn engine_prints_commands_from_client() {
    let dir = unique_temp_dir("engine");
    let sock = dir.join("engine.sock");
    let engine = spawn_engine(&sock, &["--frames", "2", "--dt", "0.5"]);

    let mut client = connect(&sock).expect("client should connect");
    let summary = client
        .run(|tick| {
            let mut encoder = CommandEncoder::new();
            encoder
                .add(EventKind::CameraSetZoom, args![tick.dt * (tick.elapsed + 1) as f64])
                .expect("valid command");
            TickResponse::Commands(encoder.finalize())
        })
        .expect("run should finish");
    assert_eq!(summary.ticks, 2);
    assert_eq!(summary.ended_by, EndedBy::PeerClosed);

    let engine = engine.wait_with_output().expect("engine should exit");
    assert!(engine.status.success());
    let frames = json_lines(&engine);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[1]["frame"], 1);
    assert_eq!(frames[1]["events"][0]["name"], "CAMERA_SET_ZOOM");
    assert_eq!(frames[1]["events"][0]["zoom"], 1.0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn probe_without_engine_returns_3() {
    let dir = unique_temp_dir("missing");
    let sock = dir.join("nobody.sock");

    let output = phrost(&["probe", "--endpoint", sock.to_str().expect("utf-8 path")])
        .output()
        .expect("probe should run");
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("is the engine running"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_reports_package_version() {
    let output = phrost(&["version"]).output().expect("version should run");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("phrost {}", env!("CARGO_PKG_VERSION"))
    );
}
