//! Binary entry point that wires configuration, collaborators, and the
//! interactive assistant loop.

use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use sentra::assistant::{self, Assistant, Collaborators};
use sentra::classifier::NeuralClassifier;
use sentra::dialogue::OllamaDialogue;
use sentra::listen::{SpeechInput, WhisperListener};
use sentra::policy::Personality;
use sentra::scanner::NmapScanner;
use sentra::speech::SayVoice;

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = assistant::load_app_config();
    let model = assistant::ollama_model(&config);
    let target = assistant::scan_target(&config);

    // Personality is fixed for the whole session; resolved here so the
    // dialogue persona matches the one the assistant announces.
    let personality = forced_personality().unwrap_or_else(|| {
        let mut rng = ChaCha20Rng::from_entropy();
        Personality::random(&mut rng)
    });

    let dialogue = OllamaDialogue::new(
        config.ollama_endpoint.clone(),
        model,
        assistant::persona_prompt(&config.assistant_name, personality),
    );
    if let Err(err) = dialogue.ensure_ready() {
        eprintln!("Dialogue unavailable: {} (the 'talk' command will fail)", err);
    }

    let listener: Option<Box<dyn SpeechInput>> = if config.voice_input {
        Some(Box::new(WhisperListener::new(
            config.whisper_model_path.clone(),
        )))
    } else {
        None
    };

    let mut assistant = Assistant::new(
        config.assistant_name.clone(),
        Some(personality),
        target,
        Collaborators {
            classifier: Box::new(NeuralClassifier::new()),
            scanner: Box::new(NmapScanner::new()),
            voice: Box::new(SayVoice::new()),
            listener,
            dialogue: Box::new(dialogue),
        },
    );
    assistant.run()
}

/// Reads SENTRA_PERSONALITY; an unset or unknown value falls through to the
/// seeded random draw in the assistant constructor.
fn forced_personality() -> Option<Personality> {
    let raw = std::env::var("SENTRA_PERSONALITY").ok()?;
    match serde_json::from_value(serde_json::Value::String(raw.to_lowercase())) {
        Ok(personality) => Some(personality),
        Err(_) => {
            eprintln!("Unknown SENTRA_PERSONALITY value; drawing one at random.");
            None
        }
    }
}
