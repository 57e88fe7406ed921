/*
 * @file audio.rs
 * @brief Microphone capture and WAV helpers for Sentra
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

//! Microphone capture and WAV file helpers for the speech-input path.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig, StreamError};
use hound::{WavSpec, WavWriter};

/// Capture sample rate in Hertz; matches Whisper's preferred input rate.
pub const SAMPLE_RATE: u32 = 16000;

/// Mono capture keeps bandwidth low and avoids a downmix step.
const CHANNELS: u16 = 1;

/// WAV encoding width.
const BITS_PER_SAMPLE: u16 = 16;

/// Records from the default input device for the given duration.
///
/// # Parameters
/// * `duration` - How long to capture before the stream is dropped.
///
/// # Returns
/// The captured 16-bit PCM samples (16 kHz mono).
///
/// # Errors
/// Returns an error when no input device exists or the stream cannot be
/// built or started.
pub fn record_audio(duration: Duration) -> Result<Vec<i16>> {
    let device = default_input_device()?;
    let config = input_config();
    let samples = shared_samples();
    let stream = build_input_stream(&device, &config, samples.clone())?;
    stream.play()?;
    std::thread::sleep(duration);
    drop(stream);
    let captured = samples.lock().unwrap().clone();
    Ok(captured)
}

/// Saves PCM samples as a 16 kHz mono WAV file.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn save_wav(path: &str, samples: &[i16]) -> Result<()> {
    let spec = WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Loads a WAV file and normalizes its samples to f32 in [-1.0, 1.0].
///
/// # Details
/// The capture path always writes 16 kHz mono, so no resampling or downmix is
/// needed before handing the data to Whisper.
pub fn load_normalized(path: &str) -> Result<Vec<f32>> {
    let reader = hound::WavReader::open(path)
        .map_err(|err| anyhow::anyhow!("Failed to open WAV file {}: {}", path, err))?;
    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| anyhow::anyhow!("Failed to read WAV samples: {}", err))?;
    Ok(samples.iter().map(|&s| s as f32 / 32768.0).collect())
}

/// Root mean square energy of a sample buffer; zero for an empty buffer.
pub fn rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let energy = samples
        .iter()
        .map(|sample| (*sample as f32).powi(2))
        .sum::<f32>()
        / samples.len() as f32;
    energy.sqrt()
}

/// Locates the system default input device.
fn default_input_device() -> Result<Device> {
    cpal::default_host()
        .default_input_device()
        .ok_or_else(|| anyhow::anyhow!("No input device"))
}

/// Stream configuration: mono, 16 kHz, default buffering.
fn input_config() -> StreamConfig {
    StreamConfig {
        channels: CHANNELS,
        sample_rate: cpal::SampleRate(SAMPLE_RATE),
        buffer_size: cpal::BufferSize::Default,
    }
}

/// Creates the shared buffer the capture callback appends into.
fn shared_samples() -> Arc<Mutex<Vec<i16>>> {
    Arc::new(Mutex::new(Vec::new()))
}

/// Builds the input stream that converts f32 frames to 16-bit PCM.
fn build_input_stream(
    device: &Device,
    config: &StreamConfig,
    samples: Arc<Mutex<Vec<i16>>>,
) -> Result<Stream> {
    let shared = samples.clone();
    device
        .build_input_stream(
            config,
            move |data: &[f32], _: &_| push_samples(&shared, data),
            log_stream_error,
            None,
        )
        .map_err(|err| anyhow::anyhow!(err))
}

/// Converts floating-point frames into 16-bit PCM and appends them.
fn push_samples(buffer: &Arc<Mutex<Vec<i16>>>, data: &[f32]) {
    let mut guard = buffer.lock().unwrap();
    for &sample in data {
        guard.push((sample * i16::MAX as f32) as i16);
    }
}

/// Logs recoverable stream errors emitted by the audio backend.
fn log_stream_error(error: StreamError) {
    eprintln!("Audio stream error: {}", error);
}
