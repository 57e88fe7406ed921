/*
 * @file listen.rs
 * @brief Speech input collaborator built on local Whisper transcription
 * @date 2026
 *
 * MIT License
 *
 * Copyright (c) 2026 Sentra Project
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Speech input collaborator.
//!
//! Records a short capture, gates on signal energy, and transcribes the
//! result with a local Whisper model. Both failure modes degrade to the
//! typed-input fallback in the control loop; neither ever aborts it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::Context;
use thiserror::Error;

use crate::audio;

/// Minimum RMS amplitude considered speech.
///
/// Values much above ~300 miss normal speaking levels on some microphones, so
/// the threshold is biased low and Whisper filters background noise.
pub const SILENCE_RMS_THRESHOLD: f32 = 150.0;

/// How long each capture lasts.
const DEFAULT_RECORD_DURATION: Duration = Duration::from_secs(5);

/// Download source for the GGML model, fetched on first use.
const MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.en.bin";

/// Why a listen attempt produced no text.
#[derive(Debug, Error)]
pub enum ListenError {
    /// The capture contained no recognizable speech.
    #[error("speech was not recognized")]
    Unrecognized,
    /// The speech backend (microphone, model, or engine) is unreachable.
    #[error("speech service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Speech-to-text interface; `listen` blocks until an utterance resolves.
pub trait SpeechInput {
    /// Captures one utterance and returns its transcript.
    fn listen(&mut self) -> Result<String, ListenError>;
}

/// Default speech input: microphone capture plus local Whisper inference.
pub struct WhisperListener {
    model_path: String,
    record_duration: Duration,
    ctx: Option<whisper_rs::WhisperContext>,
}

impl WhisperListener {
    /// Creates a listener for the given GGML model path.
    ///
    /// # Details
    /// The model is loaded lazily on the first `listen` call and downloaded
    /// first if the file does not exist.
    pub fn new(model_path: impl Into<String>) -> Self {
        Self {
            model_path: model_path.into(),
            record_duration: DEFAULT_RECORD_DURATION,
            ctx: None,
        }
    }

    /// Overrides the per-utterance capture duration.
    pub fn with_record_duration(mut self, duration: Duration) -> Self {
        self.record_duration = duration;
        self
    }

    /// Initializes the Whisper context on first use.
    fn ensure_context(&mut self) -> Result<&whisper_rs::WhisperContext, ListenError> {
        if self.ctx.is_none() {
            if !Path::new(&self.model_path).exists() {
                download_model(&self.model_path)
                    .map_err(|err| ListenError::ServiceUnavailable(err.to_string()))?;
            }
            let mut params = whisper_rs::WhisperContextParameters::default();
            params.use_gpu(false);
            let ctx = whisper_rs::WhisperContext::new_with_params(&self.model_path, params)
                .map_err(|err| ListenError::ServiceUnavailable(err.to_string()))?;
            self.ctx = Some(ctx);
        }
        Ok(self
            .ctx
            .as_ref()
            .expect("whisper context missing after initialization"))
    }
}

impl SpeechInput for WhisperListener {
    fn listen(&mut self) -> Result<String, ListenError> {
        println!("Listening...");
        let samples = audio::record_audio(self.record_duration)
            .map_err(|err| ListenError::ServiceUnavailable(err.to_string()))?;
        if audio::rms(&samples) < SILENCE_RMS_THRESHOLD {
            return Err(ListenError::Unrecognized);
        }

        let path = temp_wav_path();
        let path_str = path.to_string_lossy().to_string();
        audio::save_wav(&path_str, &samples)
            .map_err(|err| ListenError::ServiceUnavailable(err.to_string()))?;
        let _guard = TempWavGuard::new(path);
        let audio_data = audio::load_normalized(&path_str)
            .map_err(|err| ListenError::ServiceUnavailable(err.to_string()))?;

        let ctx = self.ensure_context()?;
        let text = transcribe(ctx, &audio_data)?;
        let text = finalize_transcript(text)?;
        println!("You said: {}", text);
        Ok(text)
    }
}

/// Runs Whisper inference and concatenates the segment texts.
fn transcribe(
    ctx: &whisper_rs::WhisperContext,
    audio_data: &[f32],
) -> Result<String, ListenError> {
    let mut params =
        whisper_rs::FullParams::new(whisper_rs::SamplingStrategy::Greedy { best_of: 1 });
    params.set_language(Some("en"));
    params.set_print_progress(false);
    params.set_print_special(false);
    params.set_print_realtime(false);

    let mut state = ctx
        .create_state()
        .map_err(|err| ListenError::ServiceUnavailable(err.to_string()))?;
    state
        .full(params, audio_data)
        .map_err(|_| ListenError::Unrecognized)?;

    let num_segments = state.full_n_segments().unwrap_or(0);
    let mut text = String::new();
    for i in 0..num_segments {
        if let Ok(segment) = state.full_get_segment_text(i) {
            text.push_str(&segment);
            text.push(' ');
        }
    }
    Ok(text)
}

/// Trims a raw transcript; an empty result counts as unrecognized speech.
fn finalize_transcript(text: String) -> Result<String, ListenError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ListenError::Unrecognized);
    }
    Ok(trimmed.to_string())
}

/// Fetches the GGML model with curl, creating the parent directory first.
fn download_model(model_path: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(model_path).parent() {
        fs::create_dir_all(parent)?;
    }
    eprintln!("Downloading Whisper model (this may take a few minutes)...");
    let output = Command::new("curl")
        .args(["-L", "-o", model_path, MODEL_URL])
        .output()
        .with_context(|| "Failed to execute curl")?;
    if !output.status.success() {
        anyhow::bail!("Failed to download Whisper model");
    }
    eprintln!("Whisper model downloaded successfully");
    Ok(())
}

/// Scratch WAV path handed to Whisper for one capture.
fn temp_wav_path() -> PathBuf {
    std::env::temp_dir().join("sentra_capture.wav")
}

/// RAII guard that removes the scratch WAV at scope exit, even on early
/// returns.
struct TempWavGuard {
    path: PathBuf,
}

impl TempWavGuard {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Drop for TempWavGuard {
    fn drop(&mut self) {
        fs::remove_file(&self.path).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn guard_drops_scratch_file() {
        let path = std::env::temp_dir().join("sentra_guard_test.wav");
        File::create(&path).expect("create scratch file");
        assert!(path.exists());
        {
            let _guard = TempWavGuard::new(path.clone());
        }
        assert!(!path.exists());
    }

    #[test]
    fn empty_transcript_counts_as_unrecognized() {
        assert!(matches!(
            finalize_transcript("   ".to_string()),
            Err(ListenError::Unrecognized)
        ));
        assert_eq!(
            finalize_transcript(" scan network \n".to_string()).unwrap(),
            "scan network"
        );
    }

    #[test]
    fn error_messages_name_the_failure() {
        assert_eq!(
            ListenError::Unrecognized.to_string(),
            "speech was not recognized"
        );
        let err = ListenError::ServiceUnavailable("no microphone".to_string());
        assert!(err.to_string().contains("no microphone"));
    }
}
