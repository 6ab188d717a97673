//! Shared test harness: scripted provider backends and video sources.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;

use deepcheck::backend::{
    BackendError, BackendId, BackendResult, GenerationBackend, ImagePayload,
};
use deepcheck::media::{GrayFrame, MediaResult, VideoInfo, VideoSource};

/// Handler invoked for every generate call: prompt plus the image, if
/// the call was a vision call.
pub type ReplyFn =
    Box<dyn Fn(&str, Option<&ImagePayload>) -> BackendResult<String> + Send + Sync>;

/// A provider backend driven entirely by a reply function
pub struct StubBackend {
    id: BackendId,
    handler: ReplyFn,
    prompts: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn new(
        id: BackendId,
        handler: impl Fn(&str, Option<&ImagePayload>) -> BackendResult<String>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            id,
            handler: Box::new(handler),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always replies with the same text
    pub fn fixed(id: BackendId, reply: &str) -> Self {
        let reply = reply.to_string();
        Self::new(id, move |_, _| Ok(reply.clone()))
    }

    /// Always fails with a transport error
    pub fn failing(id: BackendId, message: &str) -> Self {
        let message = message.to_string();
        Self::new(id, move |_, _| Err(BackendError::Transport(message.clone())))
    }

    /// How many calls this backend has served
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Prompts seen so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for StubBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    async fn generate(&self, prompt: &str) -> BackendResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.handler)(prompt, None)
    }

    async fn generate_vision(&self, prompt: &str, image: &ImagePayload) -> BackendResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.handler)(prompt, Some(image))
    }
}

/// A video source with a fixed frame count; sampled frames carry their
/// index in the JPEG bytes so tests can key replies off them.
pub struct ScriptedVideoSource {
    pub frame_count: usize,
    pub fps: f64,
    pub gray: Vec<GrayFrame>,
    requested: Mutex<Vec<usize>>,
}

impl ScriptedVideoSource {
    pub fn new(frame_count: usize, fps: f64) -> Self {
        Self {
            frame_count,
            fps,
            gray: Vec::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with_gray(mut self, gray: Vec<GrayFrame>) -> Self {
        self.gray = gray;
        self
    }

    /// Which frame indices were sampled, in order
    pub fn requested(&self) -> Vec<usize> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoSource for ScriptedVideoSource {
    async fn probe(&self) -> MediaResult<VideoInfo> {
        Ok(VideoInfo {
            frame_count: self.frame_count,
            fps: self.fps,
        })
    }

    async fn jpeg_frame(&self, index: usize) -> MediaResult<Vec<u8>> {
        self.requested.lock().unwrap().push(index);
        Ok(format!("frame-{}", index).into_bytes())
    }

    async fn gray_frames(&self, limit: usize) -> MediaResult<Vec<GrayFrame>> {
        Ok(self.gray.iter().take(limit).cloned().collect())
    }
}

/// Frame index encoded by [`ScriptedVideoSource::jpeg_frame`]
pub fn frame_index_of(image: &ImagePayload) -> usize {
    String::from_utf8_lossy(&image.data)
        .strip_prefix("frame-")
        .and_then(|rest| rest.parse().ok())
        .expect("image bytes did not come from ScriptedVideoSource")
}

/// A flat grayscale frame of the given brightness
pub fn flat_gray(value: u8) -> GrayFrame {
    GrayFrame {
        width: 4,
        height: 4,
        pixels: vec![value; 16],
    }
}
