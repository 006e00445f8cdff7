//! End-to-end batch tests
//!
//! Tests for:
//! - Gain scenario and re-measured output level
//! - Idempotent outputs across runs
//! - Tag carry-over
//! - Partial-failure isolation and missing FFmpeg
//! - Fatal output directory errors, cancellation and parallel runs

use dbnorm_batch::{
    process_files, BatchNormalizer, CancellationToken, FileStatus, NormalizerConfig,
};
use dbnorm_codec::FfmpegCodec;
use dbnorm_core::FatalError;
use dbnorm_loudness::measure_dbfs;
use dbnorm_metadata::read_tags;
use lofty::{Accessor, Tag, TagExt, TagType};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Mono 16-bit square wave; its RMS equals `amplitude`
fn create_square_wav(path: &Path, amplitude: f32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let value = (amplitude * 32768.0).round() as i16;
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
    for i in 0..44100 {
        let sample = if (i / 20) % 2 == 0 { value } else { -value };
        writer.write_sample(sample).expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}

fn level_of(path: &Path) -> f64 {
    let mut reader = hound::WavReader::open(path).expect("open output");
    let samples: Vec<f32> = reader
        .samples::<i16>()
        .map(|s| f32::from(s.expect("sample")) / 32768.0)
        .collect();
    measure_dbfs(&samples)
}

fn config_for(dir: &TempDir) -> NormalizerConfig {
    NormalizerConfig {
        output_dir: dir.path().join("NORMALIZED"),
        ..Default::default()
    }
}

fn without_ffmpeg(dir: &TempDir) -> NormalizerConfig {
    NormalizerConfig {
        ffmpeg_path: PathBuf::from("/nonexistent/ffmpeg"),
        ffprobe_path: PathBuf::from("/nonexistent/ffprobe"),
        ..config_for(dir)
    }
}

#[test]
fn wav_is_brought_to_target() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.wav");
    create_square_wav(&source, 0.1);
    let output_dir = dir.path().join("NORMALIZED");

    let result = process_files(&[&source], -13.5, &output_dir).unwrap();

    assert_eq!(result.processed, 1);
    match &result.outcomes[0].status {
        FileStatus::Normalized { output, gain_db } => {
            assert_eq!(output, &output_dir.join("a.wav"));
            assert!((gain_db - 6.5).abs() < 0.01, "gain {gain_db}");
        }
        other => panic!("unexpected {other:?}"),
    }
    let level = level_of(&output_dir.join("a.wav"));
    assert!((level + 13.5).abs() < 0.05, "level {level}");
}

#[test]
fn unrelated_files_are_untouched() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.wav");
    create_square_wav(&source, 0.1);
    let notes = dir.path().join("c.txt");
    std::fs::write(&notes, "liner notes").unwrap();

    let output_dir = dir.path().join("NORMALIZED");
    std::fs::create_dir(&output_dir).unwrap();
    let existing = output_dir.join("keep.me");
    std::fs::write(&existing, "untouched").unwrap();

    let result = process_files(&[&source, &notes], -13.5, &output_dir).unwrap();

    assert_eq!(result.processed, 1);
    assert_eq!(result.skipped, 1);
    assert_eq!(std::fs::read_to_string(&notes).unwrap(), "liner notes");
    assert_eq!(std::fs::read_to_string(&existing).unwrap(), "untouched");
    assert!(!output_dir.join("c.txt").exists());
}

#[test]
fn repeated_runs_are_byte_identical() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.wav");
    create_square_wav(&source, 0.3);
    let output = dir.path().join("NORMALIZED/a.wav");

    process_files(&[&source], -13.5, dir.path().join("NORMALIZED")).unwrap();
    let first = std::fs::read(&output).unwrap();
    process_files(&[&source], -13.5, dir.path().join("NORMALIZED")).unwrap();
    let second = std::fs::read(&output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn tags_are_carried_over() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("tagged.wav");
    create_square_wav(&source, 0.1);

    let mut tag = Tag::new(TagType::Id3v2);
    tag.set_title("Morning Run".to_string());
    tag.set_artist("Fixture Band".to_string());
    tag.save_to_path(&source).unwrap();

    let normalizer = BatchNormalizer::from_config(config_for(&dir));
    let result = normalizer.run(&[&source]).unwrap();
    assert_eq!(result.processed, 1);

    let tags = read_tags(dir.path().join("NORMALIZED/tagged.wav"))
        .unwrap()
        .expect("output carries tags");
    assert_eq!(tags.title().as_deref(), Some("Morning Run"));
    assert_eq!(tags.artist().as_deref(), Some("Fixture Band"));
}

#[test]
fn corrupt_file_does_not_stop_the_batch() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("broken.wav");
    std::fs::write(&broken, b"RIFF\x00\x00\x00\x00garbage").unwrap();
    let good = dir.path().join("good.wav");
    create_square_wav(&good, 0.1);
    let missing = dir.path().join("missing.wav");

    let normalizer = BatchNormalizer::from_config(config_for(&dir));
    let result = normalizer.run(&[&broken, &missing, &good]).unwrap();

    assert_eq!(result.total, 3);
    assert_eq!(result.processed, 1);
    assert_eq!(result.skipped, 2);
    assert!(matches!(result.outcomes[2].status, FileStatus::Normalized { .. }));
    assert!(!dir.path().join("NORMALIZED/broken.wav").exists());
}

#[test]
fn missing_ffmpeg_skips_only_non_wav() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let wav = dir.path().join("a.wav");
    create_square_wav(&wav, 0.1);
    // Tag reading goes by content, so these read cleanly and fail at decode
    let mp3 = dir.path().join("b.mp3");
    create_square_wav(&mp3, 0.4);
    let ogg = dir.path().join("c.ogg");
    create_square_wav(&ogg, 0.4);

    let normalizer = BatchNormalizer::from_config(without_ffmpeg(&dir));
    let result = normalizer.run(&[&wav, &mp3, &ogg]).unwrap();

    assert_eq!(result.processed, 1);
    assert_eq!(result.skipped, 2);
    for outcome in result.skipped_files() {
        assert!(matches!(
            outcome.status,
            FileStatus::Skipped {
                codec_unavailable: true,
                ..
            }
        ));
    }
    assert!(dir.path().join("NORMALIZED/a.wav").exists());
    assert!(!dir.path().join("NORMALIZED/b.mp3").exists());
}

#[test]
fn output_dir_blocked_by_file_is_fatal() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.wav");
    create_square_wav(&source, 0.1);
    let blocker = dir.path().join("NORMALIZED");
    std::fs::write(&blocker, "in the way").unwrap();

    let err = process_files(&[&source], -13.5, &blocker).unwrap_err();
    assert!(matches!(err, FatalError::OutputDirUnavailable { .. }));
    assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "in the way");
}

#[test]
fn cancelled_token_processes_nothing() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.wav");
    create_square_wav(&source, 0.1);

    let token = CancellationToken::new();
    token.cancel();
    let normalizer = BatchNormalizer::from_config(config_for(&dir)).with_cancellation(token);
    let result = normalizer.run(&[&source]).unwrap();

    assert_eq!(result.cancelled, 1);
    assert!(!dir.path().join("NORMALIZED/a.wav").exists());
}

#[test]
fn parallel_run_matches_sequential() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let sources: Vec<PathBuf> = (1..=6)
        .map(|i| {
            let path = dir.path().join(format!("track{i}.wav"));
            create_square_wav(&path, 0.05 * i as f32);
            path
        })
        .collect();

    let sequential = BatchNormalizer::from_config(NormalizerConfig {
        output_dir: dir.path().join("seq"),
        ..Default::default()
    })
    .run(&sources)
    .unwrap();
    let parallel = BatchNormalizer::from_config(NormalizerConfig {
        output_dir: dir.path().join("par"),
        workers: 3,
        ..Default::default()
    })
    .run(&sources)
    .unwrap();

    assert_eq!(sequential.processed, 6);
    assert_eq!(parallel.processed, 6);
    for source in &sources {
        let name = source.file_name().unwrap();
        assert_eq!(
            std::fs::read(dir.path().join("seq").join(name)).unwrap(),
            std::fs::read(dir.path().join("par").join(name)).unwrap()
        );
    }
}

#[test]
fn gain_scenario_with_ffmpeg() {
    init_logging();
    if !FfmpegCodec::default().is_available() {
        eprintln!("ffmpeg/ffprobe not found, skipping");
        return;
    }
    let dir = TempDir::new().unwrap();
    let wav = dir.path().join("a.wav");
    create_square_wav(&wav, 0.1);

    // b.mp3 at roughly -8 dBFS
    let loud = dir.path().join("loud.wav");
    create_square_wav(&loud, 0.398);
    let mp3 = dir.path().join("b.mp3");
    let status = std::process::Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-i"])
        .arg(&loud)
        .args(["-b:a", "320k"])
        .arg(&mp3)
        .status()
        .unwrap();
    assert!(status.success());

    let result = process_files(&[&wav, &mp3], -13.5, dir.path().join("NORMALIZED")).unwrap();

    assert_eq!(result.processed, 2);
    let gains: Vec<f64> = result
        .outcomes
        .iter()
        .map(|o| match o.status {
            FileStatus::Normalized { gain_db, .. } => gain_db,
            ref other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert!((gains[0] - 6.5).abs() < 0.01);
    assert!((gains[1] + 5.5).abs() < 0.5, "mp3 gain {}", gains[1]);
    assert!(dir.path().join("NORMALIZED/b.mp3").exists());
}
