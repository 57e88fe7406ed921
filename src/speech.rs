//! Speech output collaborator.

use std::process::Command;
use std::sync::Mutex;

use anyhow::Result;

/// Text-to-speech interface; `speak` blocks until the utterance completes.
pub trait SpeechOutput {
    /// Synthesizes the given text.
    ///
    /// # Errors
    /// Returns an error when the text is empty or the backend fails; callers
    /// treat failures as recoverable and only log them.
    fn speak(&self, text: &str) -> Result<()>;
}

/// Default speech output: the system `say` command.
#[derive(Debug, Default)]
pub struct SayVoice;

impl SayVoice {
    pub fn new() -> Self {
        Self
    }
}

impl SpeechOutput for SayVoice {
    fn speak(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            anyhow::bail!("Cannot speak empty text");
        }
        run_say(text)?;
        Ok(())
    }
}

fn run_say(text: &str) -> Result<()> {
    if cfg!(test) {
        if *FORCE_ERROR.lock().unwrap() {
            anyhow::bail!("Forced failure for testing");
        }
        return Ok(());
    }

    Command::new("say").arg(text).output()?;
    Ok(())
}

#[cfg_attr(not(test), allow(dead_code))]
static FORCE_ERROR: Mutex<bool> = Mutex::new(false);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speak_succeeds_with_text() {
        assert!(SayVoice::new().speak("Hello test").is_ok());
    }

    #[test]
    fn speak_fails_when_forced() {
        *super::FORCE_ERROR.lock().unwrap() = true;
        let result = SayVoice::new().speak("failure case");
        *super::FORCE_ERROR.lock().unwrap() = false;
        assert!(result.is_err());
    }

    #[test]
    fn speak_rejects_empty_text() {
        assert!(SayVoice::new().speak("   ").is_err());
    }
}
