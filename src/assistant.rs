/*
 * @file assistant.rs
 * @brief Sentra's assistant runtime and interactive control loop
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

//! Assistant runtime: configuration, collaborator wiring, and the
//! read-eval-print control loop.

use std::env;
use std::fs;
use std::io::{self, Write};

use anyhow::Result;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Deserialize;

use crate::classifier::{Classifier, FEATURE_DIM};
use crate::dialogue::Dialogue;
use crate::listen::SpeechInput;
use crate::memory::MemoryStore;
use crate::policy::{self, Personality};
use crate::router::{self, Action, FALLBACK_UTTERANCE};
use crate::scanner::{self, Scanner};
use crate::speech::SpeechOutput;

/// Path to the JSON configuration file that holds runtime defaults.
const CONFIG_PATH: &str = "config.json";

/// Rows of synthetic demonstration data generated for the "learn" action.
const TRAINING_EXAMPLES: usize = 100;

/// Strongly typed representation of `config.json`.
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "fallback_assistant_name")]
    pub assistant_name: String,
    #[serde(default = "fallback_ollama_endpoint")]
    pub ollama_endpoint: String,
    #[serde(default = "fallback_ollama_model")]
    pub default_ollama_model: String,
    #[serde(default = "fallback_scan_target")]
    pub default_scan_target: String,
    #[serde(default = "fallback_whisper_model_path")]
    pub whisper_model_path: String,
    /// When true, each loop iteration tries spoken input before the typed
    /// prompt.
    #[serde(default)]
    pub voice_input: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assistant_name: fallback_assistant_name(),
            ollama_endpoint: fallback_ollama_endpoint(),
            default_ollama_model: fallback_ollama_model(),
            default_scan_target: fallback_scan_target(),
            whisper_model_path: fallback_whisper_model_path(),
            voice_input: false,
        }
    }
}

/// Loads configuration from `config.json`, falling back to baked defaults
/// when missing or invalid.
pub fn load_app_config() -> AppConfig {
    match fs::read_to_string(CONFIG_PATH) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("Config parse error ({}): {}", CONFIG_PATH, err);
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    }
}

/// Resolves the Ollama model, honoring the OLLAMA_MODEL override.
pub fn ollama_model(config: &AppConfig) -> String {
    env::var("OLLAMA_MODEL").unwrap_or_else(|_| config.default_ollama_model.clone())
}

/// Resolves the scan target range, honoring the SENTRA_SCAN_TARGET override.
pub fn scan_target(config: &AppConfig) -> String {
    env::var("SENTRA_SCAN_TARGET").unwrap_or_else(|_| config.default_scan_target.clone())
}

/// Builds the dialogue persona preamble for this session.
pub fn persona_prompt(name: &str, personality: Personality) -> String {
    format!(
        "You are {}, a {} cybersecurity assistant. Keep replies short and \
         conversational, stay grounded in practical network-security thinking, \
         and never invent scan results you did not run.",
        name, personality
    )
}

fn fallback_assistant_name() -> String {
    "Sentra".to_string()
}

fn fallback_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn fallback_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn fallback_scan_target() -> String {
    "192.168.1.0/24".to_string()
}

fn fallback_whisper_model_path() -> String {
    "models/ggml-base.en.bin".to_string()
}

/// Collaborator handles the assistant runs on, constructed by the caller so
/// tests can substitute fakes.
pub struct Collaborators {
    pub classifier: Box<dyn Classifier>,
    pub scanner: Box<dyn Scanner>,
    pub voice: Box<dyn SpeechOutput>,
    pub listener: Option<Box<dyn SpeechInput>>,
    pub dialogue: Box<dyn Dialogue>,
}

/// The assistant: personality, memory, and injected collaborators.
///
/// # Details
/// Processing is strictly sequential; one command fully resolves before the
/// next is read. Collaborator failures are absorbed locally and surfaced as
/// printed or spoken messages, never propagated out of the loop.
pub struct Assistant {
    name: String,
    personality: Personality,
    scan_target: String,
    classifier: Box<dyn Classifier>,
    scanner: Box<dyn Scanner>,
    voice: Box<dyn SpeechOutput>,
    listener: Option<Box<dyn SpeechInput>>,
    dialogue: Box<dyn Dialogue>,
    memory: MemoryStore,
    rng: ChaCha20Rng,
}

impl Assistant {
    /// Creates an assistant.
    ///
    /// # Arguments
    /// * `name` - Persona name used in greetings and logs.
    /// * `personality` - Session personality; `None` draws one uniformly at
    ///   random.
    /// * `scan_target` - CIDR range handed to the scanner collaborator.
    /// * `collaborators` - Injected service handles.
    pub fn new(
        name: impl Into<String>,
        personality: Option<Personality>,
        scan_target: impl Into<String>,
        collaborators: Collaborators,
    ) -> Self {
        let mut rng = ChaCha20Rng::from_entropy();
        let personality = personality.unwrap_or_else(|| Personality::random(&mut rng));
        let name = name.into();
        tracing::info!("Initialized {} with {} personality", name, personality);
        Self {
            name,
            personality,
            scan_target: scan_target.into(),
            classifier: collaborators.classifier,
            scanner: collaborators.scanner,
            voice: collaborators.voice,
            listener: collaborators.listener,
            dialogue: collaborators.dialogue,
            memory: MemoryStore::new(),
            rng,
        }
    }

    /// The session personality (immutable after construction).
    pub fn personality(&self) -> Personality {
        self.personality
    }

    /// Prints and speaks the startup greeting.
    pub fn greet(&mut self) {
        let greeting = format!(
            "Hello, I am {}, your {} cybersecurity assistant!",
            self.name, self.personality
        );
        println!("{}", greeting);
        self.say(&greeting);
    }

    /// Runs the interactive loop until an exit phrase or end of input.
    ///
    /// # Errors
    /// Only I/O failures on the prompt itself bubble up; every collaborator
    /// failure is absorbed inside the loop.
    pub fn run(&mut self) -> Result<()> {
        self.greet();
        loop {
            let Some(raw) = self.read_command()? else {
                break;
            };
            if raw.trim().is_empty() {
                continue;
            }
            if !self.handle_command(&raw)? {
                break;
            }
        }
        Ok(())
    }

    /// Executes one command.
    ///
    /// # Returns
    /// * `Ok(true)` to keep looping, `Ok(false)` after an exit phrase.
    pub fn handle_command(&mut self, raw: &str) -> Result<bool> {
        let command = router::normalize(raw);
        match router::route(&command) {
            Action::ScanNetwork => self.do_scan(),
            Action::Train => self.do_train(),
            Action::Decide => self.do_decide(),
            Action::Respond => self.do_respond(),
            Action::Converse => self.do_converse()?,
            Action::Remember => self.do_remember()?,
            Action::Recall => self.do_recall()?,
            Action::Pwn => self.do_pwn(),
            Action::Unknown => self.say(FALLBACK_UTTERANCE),
            Action::Exit => {
                self.say("Goodbye!");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Reads the next command: spoken input when enabled, typed otherwise.
    ///
    /// # Returns
    /// * `Ok(None)` on end of input, which ends the loop without a farewell.
    fn read_command(&mut self) -> Result<Option<String>> {
        if let Some(listener) = self.listener.as_mut() {
            match listener.listen() {
                Ok(text) => return Ok(Some(text)),
                Err(err) => {
                    eprintln!("{}; falling back to typed input.", err);
                }
            }
        }
        println!("\nPlease enter a command (e.g., 'scan network', 'make decision', 'how are you'):");
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn do_scan(&mut self) {
        tracing::info!(
            "{} is scanning the network in {} mode...",
            self.name,
            self.personality
        );
        match self.scanner.scan(&self.scan_target) {
            Ok(result) => {
                let report = scanner::render_report(&result);
                tracing::info!("{}", report);
                println!("{}", report);
            }
            Err(err) => eprintln!("Scan error: {}", err),
        }
    }

    fn do_train(&mut self) {
        let (features, labels) = synthetic_training_set(&mut self.rng, TRAINING_EXAMPLES);
        match self.classifier.train(&features, &labels) {
            Ok(report) => {
                tracing::info!(
                    "{} has finished learning and feels {}!",
                    self.name,
                    self.personality
                );
                self.say(&format!(
                    "I have finished learning and feel {}.",
                    self.personality
                ));
                let feedback = format!(
                    "Learning completed with an accuracy of {:.2}",
                    report.accuracy
                );
                tracing::info!("{}", feedback);
                self.say(&feedback);
            }
            Err(err) => eprintln!("Training error: {}", err),
        }
    }

    fn do_decide(&mut self) {
        let features = random_features(&mut self.rng);
        match self.classifier.predict(&features) {
            Ok(score) => {
                let decision = policy::decide(score, self.personality);
                tracing::info!(
                    "{} ({} mode) decided: {}",
                    self.name,
                    self.personality,
                    decision
                );
                self.say(&format!("I have decided to {}", decision));
            }
            Err(err) => eprintln!("Decision error: {}", err),
        }
    }

    fn do_respond(&mut self) {
        let phrase = policy::respond(self.personality, &mut self.rng);
        println!("{} ({}): {}", self.name, self.personality, phrase);
        self.say(phrase);
    }

    fn do_converse(&mut self) -> Result<()> {
        let user_input = prompt_line("User: ")?;
        match self.dialogue.converse(&user_input) {
            Ok(reply) => {
                tracing::info!("User: {}", user_input);
                tracing::info!("{}: {}", self.name, reply);
                println!("{}: {}", self.name, reply);
                self.say(&reply);
            }
            Err(err) => eprintln!("Dialogue error: {}", err),
        }
        Ok(())
    }

    fn do_remember(&mut self) -> Result<()> {
        let user_id = prompt_line("Enter user ID: ")?;
        let value = prompt_line("Enter data to remember: ")?;
        tracing::info!("Remembered data for user {}: {}", user_id, value);
        self.memory.remember(user_id, value);
        Ok(())
    }

    fn do_recall(&mut self) -> Result<()> {
        let user_id = prompt_line("Enter user ID: ")?;
        println!("{}", self.memory.recall(&user_id));
        Ok(())
    }

    fn do_pwn(&mut self) {
        // Placeholder action: nothing is wired up behind it.
        let notice = format!(
            "{} is attempting to pwn the network in {} mode...",
            self.name, self.personality
        );
        tracing::info!("{}", notice);
        println!("{}", notice);
    }

    /// Speaks through the voice collaborator, logging TTS failures.
    fn say(&self, text: &str) {
        if let Err(err) = self.voice.speak(text) {
            eprintln!("TTS error: {}", err);
        }
    }
}

/// Reads one line from stdin after printing a prompt.
fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Draws one random decision-input vector for the demonstration flow.
fn random_features(rng: &mut impl Rng) -> Vec<f32> {
    (0..FEATURE_DIM).map(|_| rng.gen::<f32>()).collect()
}

/// Synthesizes random feature rows with random binary labels.
fn synthetic_training_set(rng: &mut impl Rng, rows: usize) -> (Vec<Vec<f32>>, Vec<u8>) {
    let features = (0..rows).map(|_| random_features(rng)).collect();
    let labels = (0..rows).map(|_| rng.gen_range(0..2) as u8).collect();
    (features, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::TrainReport;
    use crate::policy::{response_phrases, DecisionLabel};
    use crate::scanner::{HostRecord, ScanResult};
    use std::sync::{Arc, Mutex};

    struct StubClassifier {
        score: f32,
    }

    impl Classifier for StubClassifier {
        fn train(&mut self, _features: &[Vec<f32>], labels: &[u8]) -> Result<TrainReport> {
            Ok(TrainReport {
                examples: labels.len(),
                epochs: 1,
                accuracy: 0.9,
                loss: 0.1,
            })
        }

        fn predict(&self, _features: &[f32]) -> Result<f32> {
            Ok(self.score)
        }
    }

    struct StubScanner {
        seen_targets: Arc<Mutex<Vec<String>>>,
    }

    impl Scanner for StubScanner {
        fn scan(&self, target: &str) -> Result<ScanResult> {
            self.seen_targets.lock().unwrap().push(target.to_string());
            Ok(ScanResult {
                target: target.to_string(),
                hosts: vec![HostRecord {
                    addr: "10.0.0.9".to_string(),
                    ..HostRecord::default()
                }],
            })
        }
    }

    struct VoiceLog {
        spoken: Arc<Mutex<Vec<String>>>,
    }

    impl SpeechOutput for VoiceLog {
        fn speak(&self, text: &str) -> Result<()> {
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct StubDialogue;

    impl Dialogue for StubDialogue {
        fn converse(&self, user_text: &str) -> Result<String> {
            Ok(format!("echo: {}", user_text))
        }
    }

    struct TestHarness {
        assistant: Assistant,
        spoken: Arc<Mutex<Vec<String>>>,
        seen_targets: Arc<Mutex<Vec<String>>>,
    }

    fn harness(personality: Personality, score: f32) -> TestHarness {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let seen_targets = Arc::new(Mutex::new(Vec::new()));
        let assistant = Assistant::new(
            "Sentra",
            Some(personality),
            "10.10.0.0/24",
            Collaborators {
                classifier: Box::new(StubClassifier { score }),
                scanner: Box::new(StubScanner {
                    seen_targets: seen_targets.clone(),
                }),
                voice: Box::new(VoiceLog {
                    spoken: spoken.clone(),
                }),
                listener: None,
                dialogue: Box::new(StubDialogue),
            },
        );
        TestHarness {
            assistant,
            spoken,
            seen_targets,
        }
    }

    #[test]
    fn decision_follows_the_policy_table_for_curious() {
        let mut h = harness(Personality::Curious, 0.6);
        assert!(h.assistant.handle_command("make decision").unwrap());
        let spoken = h.spoken.lock().unwrap();
        assert_eq!(
            spoken.last().unwrap(),
            &format!("I have decided to {}", DecisionLabel::Analyze)
        );
    }

    #[test]
    fn decision_follows_the_policy_table_for_neutral() {
        let mut h = harness(Personality::Neutral, 0.6);
        assert!(h.assistant.handle_command("decision").unwrap());
        let spoken = h.spoken.lock().unwrap();
        assert_eq!(spoken.last().unwrap(), "I have decided to Monitor");
    }

    #[test]
    fn unknown_commands_use_the_fixed_fallback() {
        let mut h = harness(Personality::Friendly, 0.5);
        assert!(h.assistant.handle_command("do a barrel roll").unwrap());
        let spoken = h.spoken.lock().unwrap();
        assert_eq!(spoken.as_slice(), [FALLBACK_UTTERANCE]);
    }

    #[test]
    fn exit_phrases_speak_exactly_one_farewell() {
        for phrase in ["exit", " QUIT ", "stop"] {
            let mut h = harness(Personality::Aggressive, 0.5);
            assert!(!h.assistant.handle_command(phrase).unwrap());
            let spoken = h.spoken.lock().unwrap();
            assert_eq!(spoken.as_slice(), ["Goodbye!"]);
        }
    }

    #[test]
    fn greeting_commands_stay_inside_the_personality_list() {
        let mut h = harness(Personality::Friendly, 0.5);
        assert!(h.assistant.handle_command("hello").unwrap());
        let spoken = h.spoken.lock().unwrap();
        let friendly = response_phrases(Personality::Friendly);
        assert!(friendly.contains(&spoken.last().unwrap().as_str()));
    }

    #[test]
    fn scan_passes_the_configured_target() {
        let mut h = harness(Personality::Neutral, 0.5);
        assert!(h.assistant.handle_command("scan network").unwrap());
        assert_eq!(h.seen_targets.lock().unwrap().as_slice(), ["10.10.0.0/24"]);
    }

    #[test]
    fn training_reports_the_measured_accuracy() {
        let mut h = harness(Personality::Curious, 0.5);
        assert!(h.assistant.handle_command("learn").unwrap());
        let spoken = h.spoken.lock().unwrap();
        assert!(spoken
            .iter()
            .any(|line| line == "I have finished learning and feel curious."));
        assert!(spoken
            .iter()
            .any(|line| line == "Learning completed with an accuracy of 0.90"));
    }

    #[test]
    fn default_personality_is_a_known_variant() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let assistant = Assistant::new(
            "Sentra",
            None,
            "192.168.1.0/24",
            Collaborators {
                classifier: Box::new(StubClassifier { score: 0.0 }),
                scanner: Box::new(StubScanner {
                    seen_targets: Arc::new(Mutex::new(Vec::new())),
                }),
                voice: Box::new(VoiceLog {
                    spoken: spoken.clone(),
                }),
                listener: None,
                dialogue: Box::new(StubDialogue),
            },
        );
        assert!(Personality::ALL.contains(&assistant.personality()));
    }

    #[test]
    fn synthetic_training_set_has_matching_shapes() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let (features, labels) = synthetic_training_set(&mut rng, 100);
        assert_eq!(features.len(), 100);
        assert_eq!(labels.len(), 100);
        assert!(features.iter().all(|row| row.len() == FEATURE_DIM));
        assert!(labels.iter().all(|&l| l <= 1));
    }
}
