// Author: Dustin Pilgrim
// License: MIT
//
// Video frames through an ffmpeg subprocess.
//
// One ffmpeg process streams raw RGB24 frames on stdout and stepping
// forward reads the next frame off the pipe. Going backward, or a stream
// that died, restarts ffmpeg with an input-side seek to the wanted frame.
// A clean exit before a full frame arrives is the end of the video.

use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use eventline::{debug, info};

use clipper_core::{ClipError, PixelBuf};

use super::{Frame, FrameSource, SourceKind};

/// Decoded frame size and nominal rate of the first video stream.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Geometry {
    width: u32,
    height: u32,
    fps: Option<f64>,
}

impl Geometry {
    fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

pub struct VideoSource {
    path: PathBuf,
    geometry: Geometry,
    decoder: Option<Decoder>,
    current: Frame,
}

impl VideoSource {
    /// Opens `path` at the 1-based frame `start`.
    pub fn open(path: &Path, start: u64) -> Result<Self, String> {
        let geometry = probe_geometry(path).map_err(|e| format!("{}: {e}", path.display()))?;
        debug!("{}: {geometry:?}", path.display());

        match count_frames(path) {
            Some(n) => info!("{}: {n} frames", path.display()),
            None => debug!("{}: frame count unavailable", path.display()),
        }

        let start = start.max(1);
        let mut decoder = Decoder::spawn(path, geometry, start)
            .map_err(|e| format!("{}: {e}", path.display()))?;
        let image = decoder.read_frame().map_err(|e| match e {
            ClipError::SourceUnavailable => format!("{}: no frame {start}", path.display()),
            other => format!("{}: {other}", path.display()),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            geometry,
            decoder: Some(decoder),
            current: Frame {
                image,
                number: start,
                path: path.to_path_buf(),
            },
        })
    }

    fn step_to(&mut self, number: u64) -> Result<&Frame, ClipError> {
        let image = self.read_at(number)?;
        self.current = Frame {
            image,
            number,
            path: self.path.clone(),
        };
        Ok(&self.current)
    }

    /// Reads frame `number`, reusing the running stream when it is already
    /// positioned there.
    fn read_at(&mut self, number: u64) -> Result<PixelBuf, ClipError> {
        let reusable = self.decoder.as_ref().is_some_and(|d| d.next == number);
        if !reusable {
            self.decoder = None;
            self.decoder = Some(Decoder::spawn(&self.path, self.geometry, number)?);
        }

        let Some(decoder) = self.decoder.as_mut() else {
            return Err(ClipError::SourceUnavailable);
        };
        let result = decoder.read_frame();
        if result.is_err() {
            // a short read leaves the pipe mid-frame
            self.decoder = None;
        }
        result
    }
}

impl FrameSource for VideoSource {
    fn current(&self) -> &Frame {
        &self.current
    }

    fn forward(&mut self) -> Result<&Frame, ClipError> {
        self.step_to(self.current.number + 1)
    }

    fn backward(&mut self) -> Result<&Frame, ClipError> {
        if self.current.number <= 1 {
            return Err(ClipError::SourceUnavailable);
        }
        self.step_to(self.current.number - 1)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Video
    }
}

/// Running ffmpeg whose next frame on stdout is `next`.
struct Decoder {
    child: Child,
    stdout: ChildStdout,
    geometry: Geometry,
    next: u64,
}

impl Decoder {
    fn spawn(path: &Path, geometry: Geometry, from: u64) -> Result<Self, ClipError> {
        debug!("ffmpeg: streaming {} from frame {from}", path.display());

        let mut child = Command::new("ffmpeg")
            .args(["-nostdin", "-v", "error", "-noautorotate"])
            .args(seek_args(from, geometry.fps))
            .arg("-i")
            .arg(path)
            .args(["-map", "0:v:0", "-an", "-sn", "-vsync", "0"])
            .args(select_args(from, geometry.fps))
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| missing_tool("ffmpeg", e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClipError::Decode("ffmpeg stdout not captured".into()))?;

        Ok(Self {
            child,
            stdout,
            geometry,
            next: from,
        })
    }

    fn read_frame(&mut self) -> Result<PixelBuf, ClipError> {
        let mut data = vec![0u8; self.geometry.frame_len()];
        match self.stdout.read_exact(&mut data) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Err(self.finish()),
            Err(e) => return Err(ClipError::Decode(format!("read ffmpeg output: {e}"))),
        }
        self.next += 1;
        PixelBuf::from_raw(self.geometry.width, self.geometry.height, 3, data)
    }

    /// Reaps an ffmpeg that closed its output. A clean exit is the end of
    /// the video; anything else carries ffmpeg's stderr.
    fn finish(&mut self) -> ClipError {
        let mut msg = String::new();
        if let Some(mut stderr) = self.child.stderr.take() {
            let _ = stderr.read_to_string(&mut msg);
        }
        match self.child.wait() {
            Ok(status) if status.success() => ClipError::SourceUnavailable,
            Ok(status) if msg.trim().is_empty() => {
                ClipError::Decode(format!("ffmpeg exited with {status}"))
            }
            Ok(_) => ClipError::Decode(format!("ffmpeg: {}", msg.trim())),
            Err(e) => ClipError::Decode(format!("wait for ffmpeg: {e}")),
        }
    }
}

impl Drop for Decoder {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Input-side seek to the 1-based frame `from`. The seek point sits half a
/// frame early so rounding never drops the wanted frame.
fn seek_args(from: u64, fps: Option<f64>) -> Vec<String> {
    match fps {
        Some(fps) if from > 1 => {
            let t = (from as f64 - 1.5) / fps;
            vec!["-ss".into(), format!("{t:.6}")]
        }
        _ => Vec::new(),
    }
}

/// Without a frame rate the stream cannot be seeked by time, so frames
/// before `from` are decoded and dropped once.
fn select_args(from: u64, fps: Option<f64>) -> Vec<String> {
    if fps.is_some() || from <= 1 {
        return Vec::new();
    }
    vec!["-vf".into(), format!("select=gte(n\\,{})", from - 1)]
}

fn missing_tool(tool: &str, e: std::io::Error) -> ClipError {
    match e.kind() {
        ErrorKind::NotFound => ClipError::Decode(format!("{tool} is not installed or not in PATH")),
        _ => ClipError::Decode(format!("spawn {tool}: {e}")),
    }
}

fn probe_geometry(path: &Path) -> Result<Geometry, ClipError> {
    let out = Command::new("ffprobe")
        .args(["-v", "error", "-select_streams", "v:0"])
        .args(["-show_entries", "stream=width,height,r_frame_rate"])
        .args(["-of", "default=noprint_wrappers=1"])
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| missing_tool("ffprobe", e))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        return Err(ClipError::Decode(format!("ffprobe: {}", msg.trim())));
    }
    parse_geometry(&String::from_utf8_lossy(&out.stdout))
}

fn parse_geometry(text: &str) -> Result<Geometry, ClipError> {
    let mut width = None;
    let mut height = None;
    let mut fps = None;

    for line in text.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        match key {
            "width" => width = value.parse::<u32>().ok(),
            "height" => height = value.parse::<u32>().ok(),
            "r_frame_rate" => fps = parse_rate(value),
            _ => {}
        }
    }

    match (width, height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => Ok(Geometry { width, height, fps }),
        _ => Err(ClipError::Decode("no video stream".into())),
    }
}

/// `num/den` as frames per second; `0/0` and friends are unknown.
fn parse_rate(value: &str) -> Option<f64> {
    let (num, den) = value.split_once('/').unwrap_or((value, "1"));
    let rate = num.trim().parse::<f64>().ok()? / den.trim().parse::<f64>().ok()?;
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

fn count_frames(path: &Path) -> Option<u64> {
    let out = Command::new("ffprobe")
        .args(["-v", "error", "-select_streams", "v:0", "-count_packets"])
        .args(["-show_entries", "stream=nb_read_packets", "-of", "csv=p=0"])
        .arg(path)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()?;

    if !out.status.success() {
        return None;
    }
    String::from_utf8_lossy(&out.stdout).trim().parse().ok()
}
