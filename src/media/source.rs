//! # Video Frame Sources
//!
//! The seam between video analysis and frame decoding. Production use
//! drives `ffprobe`/`ffmpeg` subprocesses; tests substitute synthetic
//! sources.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use super::errors::{MediaError, MediaResult};

/// Side length of the downscaled grayscale frames used for temporal
/// diffing
pub const GRAY_DIM: usize = 64;

/// Basic stream facts needed before sampling frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    /// Total number of video frames
    pub frame_count: usize,

    /// Average frames per second
    pub fps: f64,
}

/// One downscaled grayscale frame
#[derive(Debug, Clone)]
pub struct GrayFrame {
    pub width: usize,
    pub height: usize,
    /// Row-major luma bytes, `width * height` of them
    pub pixels: Vec<u8>,
}

impl GrayFrame {
    /// Mean absolute pixel difference against another frame of the
    /// same dimensions
    pub fn mean_abs_diff(&self, other: &GrayFrame) -> f64 {
        let len = self.pixels.len().min(other.pixels.len());
        if len == 0 {
            return 0.0;
        }
        let total: u64 = self.pixels[..len]
            .iter()
            .zip(&other.pixels[..len])
            .map(|(a, b)| a.abs_diff(*b) as u64)
            .sum();
        total as f64 / len as f64
    }
}

/// Provider of decoded frames for one video file
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Frame count and frame rate
    async fn probe(&self) -> MediaResult<VideoInfo>;

    /// The frame at `index`, encoded as JPEG
    async fn jpeg_frame(&self, index: usize) -> MediaResult<Vec<u8>>;

    /// The first `limit` frames, downscaled to [`GRAY_DIM`] squares of
    /// grayscale pixels
    async fn gray_frames(&self, limit: usize) -> MediaResult<Vec<GrayFrame>>;
}

/// Frame source backed by ffmpeg/ffprobe subprocesses
#[derive(Debug, Clone)]
pub struct FfmpegVideo {
    path: PathBuf,
}

impl FfmpegVideo {
    /// Wrap a video file on disk
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl VideoSource for FfmpegVideo {
    async fn probe(&self) -> MediaResult<VideoInfo> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-count_frames",
                "-show_entries",
                "stream=nb_read_frames,avg_frame_rate",
                "-of",
                "default=noprint_wrappers=1",
            ])
            .arg(&self.path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| MediaError::FrameExtraction(format!("ffprobe failed to start: {}", e)))?;

        if !output.status.success() {
            return Err(MediaError::FrameExtraction(format!(
                "ffprobe exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }

    async fn jpeg_frame(&self, index: usize) -> MediaResult<Vec<u8>> {
        let scratch = tempfile::tempdir()?;
        let frame_path = scratch.path().join("frame.jpg");

        let output = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(&self.path)
            .args([
                "-vf",
                &format!("select=eq(n\\,{})", index),
                "-vsync",
                "0",
                "-frames:v",
                "1",
            ])
            .arg(&frame_path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| MediaError::FrameExtraction(format!("ffmpeg failed to start: {}", e)))?;

        if !output.status.success() {
            return Err(MediaError::FrameExtraction(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(tokio::fs::read(&frame_path).await?)
    }

    async fn gray_frames(&self, limit: usize) -> MediaResult<Vec<GrayFrame>> {
        let output = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(&self.path)
            .args([
                "-frames:v",
                &limit.to_string(),
                "-vf",
                &format!("scale={}:{},format=gray", GRAY_DIM, GRAY_DIM),
                "-f",
                "rawvideo",
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| MediaError::FrameExtraction(format!("ffmpeg failed to start: {}", e)))?;

        if !output.status.success() {
            return Err(MediaError::FrameExtraction(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let frame_len = GRAY_DIM * GRAY_DIM;
        let frames = output
            .stdout
            .chunks_exact(frame_len)
            .map(|pixels| GrayFrame {
                width: GRAY_DIM,
                height: GRAY_DIM,
                pixels: pixels.to_vec(),
            })
            .collect();
        Ok(frames)
    }
}

/// Parse `key=value` lines from ffprobe
fn parse_probe_output(stdout: &str) -> MediaResult<VideoInfo> {
    let mut frame_count = None;
    let mut fps = None;

    for line in stdout.lines() {
        if let Some(value) = line.strip_prefix("nb_read_frames=") {
            frame_count = value.trim().parse::<usize>().ok();
        } else if let Some(value) = line.strip_prefix("avg_frame_rate=") {
            fps = parse_frame_rate(value.trim());
        }
    }

    match frame_count {
        Some(frame_count) => Ok(VideoInfo {
            frame_count,
            fps: fps.unwrap_or(0.0),
        }),
        None => Err(MediaError::FrameExtraction(
            "ffprobe reported no frame count".to_string(),
        )),
    }
}

/// Frame rates come as rationals, e.g. "30000/1001"
fn parse_frame_rate(raw: &str) -> Option<f64> {
    match raw.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.parse().ok()?;
            let denominator: f64 = denominator.parse().ok()?;
            if denominator == 0.0 {
                None
            } else {
                Some(numerator / denominator)
            }
        }
        None => raw.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        let info =
            parse_probe_output("avg_frame_rate=30000/1001\nnb_read_frames=450\n").unwrap();
        assert_eq!(info.frame_count, 450);
        assert!((info.fps - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_parse_probe_output_missing_count_is_error() {
        assert!(parse_probe_output("avg_frame_rate=25/1\n").is_err());
    }

    #[test]
    fn test_parse_frame_rate_forms() {
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        assert_eq!(parse_frame_rate("30"), Some(30.0));
        assert_eq!(parse_frame_rate("0/0"), None);
    }

    #[test]
    fn test_mean_abs_diff() {
        let a = GrayFrame {
            width: 2,
            height: 1,
            pixels: vec![10, 20],
        };
        let b = GrayFrame {
            width: 2,
            height: 1,
            pixels: vec![20, 40],
        };
        assert_eq!(a.mean_abs_diff(&b), 15.0);
        assert_eq!(a.mean_abs_diff(&a), 0.0);
    }
}
