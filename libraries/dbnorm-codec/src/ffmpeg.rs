/// FFmpeg-backed codec for compressed and lossless non-WAV formats
use dbnorm_core::{
    AudioFormat, CodecAdapter, DecodeError, DecodedSignal, EncodeError, EncodeParams, SampleKind,
    SampleSpec,
};
use dbnorm_loudness::{apply_gain, measure_dbfs};
use serde::Deserialize;
use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Stream parameters reported by ffprobe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count
    pub channels: u16,
}

#[derive(Debug, Deserialize)]
struct FfprobeReport {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    sample_rate: Option<String>,
    channels: Option<u16>,
}

/// Codec that shells out to `ffmpeg` and `ffprobe`
///
/// PCM crosses the process boundary as raw little-endian f32, so the signal
/// in memory is always 32-bit float regardless of the source codec.
#[derive(Debug, Clone)]
pub struct FfmpegCodec {
    ffmpeg_path: PathBuf,
    ffprobe_path: PathBuf,
}

impl FfmpegCodec {
    /// Create a codec using explicit tool paths
    pub fn new(ffmpeg_path: impl Into<PathBuf>, ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Path of the ffmpeg executable
    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }

    /// Path of the ffprobe executable
    pub fn ffprobe_path(&self) -> &Path {
        &self.ffprobe_path
    }

    /// Check that both tools can be launched
    pub fn is_available(&self) -> bool {
        [&self.ffmpeg_path, &self.ffprobe_path].iter().all(|tool| {
            Command::new(tool)
                .arg("-version")
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|s| s.success())
                .unwrap_or(false)
        })
    }

    /// Sample rate and channel count of the first audio stream
    pub fn stream_info(&self, path: &Path, format: AudioFormat) -> Result<StreamInfo, DecodeError> {
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-select_streams", "a:0"])
            .args(["-show_entries", "stream=sample_rate,channels"])
            .args(["-of", "json"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| spawn_decode_error(&self.ffprobe_path, format, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DecodeError::corrupt(format!(
                "FFprobe failed: {}",
                stderr.trim()
            )));
        }

        parse_stream_info(&output.stdout)
    }

    /// Decode a file to interleaved f32 samples
    pub fn decode_file(
        &self,
        path: &Path,
        format: AudioFormat,
    ) -> Result<DecodedSignal, DecodeError> {
        let info = self.stream_info(path, format)?;

        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(decode_args(path, info))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        debug!("Running {:?}", cmd);

        let output = cmd
            .output()
            .map_err(|e| spawn_decode_error(&self.ffmpeg_path, format, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DecodeError::corrupt(format!(
                "FFmpeg failed: {}",
                stderr.trim()
            )));
        }

        let samples = pcm_f32le_to_samples(&output.stdout)?;
        let measured_dbfs = measure_dbfs(&samples);
        debug!(
            "Decoded {:?}: {} Hz, {} ch, {:.2} dBFS",
            path, info.sample_rate, info.channels, measured_dbfs
        );

        Ok(DecodedSignal {
            samples,
            spec: SampleSpec {
                sample_rate: info.sample_rate,
                channels: info.channels,
                bits_per_sample: 32,
                kind: SampleKind::Float,
            },
            format,
            measured_dbfs,
        })
    }

    /// Apply gain and encode through ffmpeg
    pub fn encode_file(
        &self,
        mut signal: DecodedSignal,
        gain_db: f64,
        format: AudioFormat,
        dest: &Path,
    ) -> Result<(), EncodeError> {
        let report = apply_gain(&mut signal.samples, gain_db)?;
        if report.clipped() {
            warn!(
                "{} samples clipped applying {:+.2} dB to {:?}",
                report.clipped_samples, gain_db, dest
            );
        }

        let params = format.capabilities().encode;
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(encode_args(&signal.spec, params, dest))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        debug!("Running {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                EncodeError::UnsupportedCodec {
                    format,
                    reason: format!("{} not found", self.ffmpeg_path.display()),
                }
            } else {
                EncodeError::Io(e)
            }
        })?;

        let pcm = samples_to_pcm_f32le(&signal.samples);
        drop(signal);

        let stdin = child.stdin.take();
        let write_result = std::thread::scope(|scope| {
            let writer = scope.spawn(move || -> std::io::Result<()> {
                if let Some(mut stdin) = stdin {
                    stdin.write_all(&pcm)?;
                }
                Ok(())
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("PCM writer panicked")));
            (output, written)
        });

        let (output, written) = write_result;
        let output = output?;

        if !output.status.success() {
            let _ = std::fs::remove_file(dest);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EncodeError::failed(format!(
                "FFmpeg failed: {}",
                stderr.trim()
            )));
        }

        // A broken pipe only matters if ffmpeg also failed
        if let Err(e) = written {
            if e.kind() != ErrorKind::BrokenPipe {
                let _ = std::fs::remove_file(dest);
                return Err(EncodeError::Io(e));
            }
        }

        Ok(())
    }
}

impl Default for FfmpegCodec {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

impl CodecAdapter for FfmpegCodec {
    fn decode(&self, path: &Path, format: AudioFormat) -> Result<DecodedSignal, DecodeError> {
        self.decode_file(path, format)
    }

    fn encode(
        &self,
        signal: DecodedSignal,
        gain_db: f64,
        format: AudioFormat,
        dest: &Path,
    ) -> Result<(), EncodeError> {
        self.encode_file(signal, gain_db, format, dest)
    }
}

fn spawn_decode_error(tool: &Path, format: AudioFormat, err: std::io::Error) -> DecodeError {
    if err.kind() == ErrorKind::NotFound {
        DecodeError::UnsupportedCodec {
            format,
            reason: format!("{} not found", tool.display()),
        }
    } else {
        DecodeError::Io(err)
    }
}

fn parse_stream_info(stdout: &[u8]) -> Result<StreamInfo, DecodeError> {
    let report: FfprobeReport = serde_json::from_slice(stdout)
        .map_err(|e| DecodeError::corrupt(format!("Failed to parse FFprobe output: {}", e)))?;

    let stream = report
        .streams
        .first()
        .ok_or_else(|| DecodeError::corrupt("No audio stream found"))?;

    let sample_rate = stream
        .sample_rate
        .as_deref()
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|&r| r > 0)
        .ok_or_else(|| DecodeError::corrupt("Audio stream has no sample rate"))?;

    let channels = stream
        .channels
        .filter(|&c| c > 0)
        .ok_or_else(|| DecodeError::corrupt("Audio stream has no channels"))?;

    Ok(StreamInfo {
        sample_rate,
        channels,
    })
}

/// Arguments that decode the first audio stream to raw f32 on stdout
pub(crate) fn decode_args(path: &Path, info: StreamInfo) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "error", "-nostdin", "-i"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(path.as_os_str().to_owned());
    for arg in ["-map", "0:a:0", "-vn", "-f", "f32le", "-acodec", "pcm_f32le"] {
        args.push(arg.into());
    }
    args.push("-ac".into());
    args.push(info.channels.to_string().into());
    args.push("-ar".into());
    args.push(info.sample_rate.to_string().into());
    args.push("pipe:1".into());
    args
}

/// Arguments that encode raw f32 from stdin into `dest`
///
/// The container comes from the destination extension. Only formats whose
/// params carry a bitrate get `-b:a`; everything else keeps encoder defaults.
pub(crate) fn encode_args(spec: &SampleSpec, params: EncodeParams, dest: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    for arg in ["-v", "error", "-nostdin", "-y", "-f", "f32le"] {
        args.push(arg.into());
    }
    args.push("-ar".into());
    args.push(spec.sample_rate.to_string().into());
    args.push("-ac".into());
    args.push(spec.channels.to_string().into());
    args.push("-i".into());
    args.push("pipe:0".into());

    // Deterministic output: no encoder tags, no timestamps
    for arg in ["-map_metadata", "-1", "-fflags", "+bitexact", "-flags:a", "+bitexact"] {
        args.push(arg.into());
    }

    if let Some(kbps) = params.bitrate_kbps {
        args.push("-b:a".into());
        args.push(format!("{}k", kbps).into());
    }

    args.push(dest.as_os_str().to_owned());
    args
}

fn pcm_f32le_to_samples(bytes: &[u8]) -> Result<Vec<f32>, DecodeError> {
    if bytes.len() % 4 != 0 {
        return Err(DecodeError::corrupt(format!(
            "PCM stream length {} is not a whole number of f32 samples",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]).clamp(-1.0, 1.0))
        .collect())
}

fn samples_to_pcm_f32le(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 4);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}
