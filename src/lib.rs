//! Sentra - a personality-driven cybersecurity assistant.
//!
//! The assistant routes typed (or spoken) commands to a set of narrow
//! collaborators: a neural decision classifier, an nmap-based network
//! scanner, text-to-speech and speech-to-text adapters, and a one-shot
//! Ollama dialogue. Each session draws an immutable personality that
//! conditions decisions and canned responses.
//!
//! # Example
//! ```no_run
//! use anyhow::Result;
//! use sentra::assistant::{self, Assistant, Collaborators};
//! use sentra::classifier::NeuralClassifier;
//! use sentra::dialogue::OllamaDialogue;
//! use sentra::policy::Personality;
//! use sentra::scanner::NmapScanner;
//! use sentra::speech::SayVoice;
//!
//! fn main() -> Result<()> {
//!     let config = assistant::load_app_config();
//!     let prompt = assistant::persona_prompt(&config.assistant_name, Personality::Friendly);
//!     let mut assistant = Assistant::new(
//!         config.assistant_name.clone(),
//!         None,
//!         assistant::scan_target(&config),
//!         Collaborators {
//!             classifier: Box::new(NeuralClassifier::new()),
//!             scanner: Box::new(NmapScanner::new()),
//!             voice: Box::new(SayVoice::new()),
//!             listener: None,
//!             dialogue: Box::new(OllamaDialogue::new(
//!                 config.ollama_endpoint.clone(),
//!                 assistant::ollama_model(&config),
//!                 prompt,
//!             )),
//!         },
//!     );
//!     assistant.run()
//! }
//! ```

pub mod assistant;
pub mod audio;
pub mod classifier;
pub mod dialogue;
pub mod listen;
pub mod memory;
pub mod policy;
pub mod router;
pub mod scanner;
pub mod speech;
