/*
 * @file router.rs
 * @brief Command normalization and routing for the Sentra assistant
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

//! Maps free-text commands onto the assistant's fixed action set.

/// Spoken when no action matches the input. A policy decision, not an error.
pub const FALLBACK_UTTERANCE: &str = "I'm not sure how to respond to that.";

/// Everything the router can dispatch to.
///
/// # Details
/// Each variant corresponds to one assistant capability; `Unknown` covers
/// every unrecognized input and `Exit` ends the control loop after a single
/// farewell utterance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ScanNetwork,
    Train,
    Decide,
    Respond,
    Converse,
    Remember,
    Recall,
    Pwn,
    Exit,
    Unknown,
}

/// Normalizes raw input into the router's canonical command form.
///
/// # Arguments
/// * `input` - Raw text from stdin or the speech transcriber.
///
/// # Returns
/// The input trimmed and lower-cased.
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Resolves a normalized command string to an action.
///
/// # Details
/// Matching is exact against a fixed phrase table; each action accepts the
/// synonyms the persona always understood. Anything else maps to
/// [`Action::Unknown`] so the loop can answer with [`FALLBACK_UTTERANCE`]
/// instead of raising an error.
pub fn route(command: &str) -> Action {
    match command {
        "scan network" | "scan" => Action::ScanNetwork,
        "learn" | "train" => Action::Train,
        "make decision" | "decision" => Action::Decide,
        "how are you" | "hello" => Action::Respond,
        "pwn" | "attack" => Action::Pwn,
        "converse" | "talk" => Action::Converse,
        "remember" | "remember user" => Action::Remember,
        "recall" | "recall user" => Action::Recall,
        "exit" | "quit" | "stop" => Action::Exit,
        _ => Action::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_map_to_the_same_action() {
        assert_eq!(route("scan network"), Action::ScanNetwork);
        assert_eq!(route("scan"), Action::ScanNetwork);
        assert_eq!(route("learn"), Action::Train);
        assert_eq!(route("train"), Action::Train);
        assert_eq!(route("make decision"), Action::Decide);
        assert_eq!(route("decision"), Action::Decide);
        assert_eq!(route("how are you"), Action::Respond);
        assert_eq!(route("hello"), Action::Respond);
        assert_eq!(route("pwn"), Action::Pwn);
        assert_eq!(route("attack"), Action::Pwn);
        assert_eq!(route("converse"), Action::Converse);
        assert_eq!(route("talk"), Action::Converse);
        assert_eq!(route("remember"), Action::Remember);
        assert_eq!(route("remember user"), Action::Remember);
        assert_eq!(route("recall"), Action::Recall);
        assert_eq!(route("recall user"), Action::Recall);
    }

    #[test]
    fn exit_phrases_all_terminate() {
        for phrase in ["exit", "quit", "stop"] {
            assert_eq!(route(phrase), Action::Exit);
        }
    }

    #[test]
    fn unrecognized_input_is_unknown() {
        assert_eq!(route("open the pod bay doors"), Action::Unknown);
        assert_eq!(route(""), Action::Unknown);
        assert_eq!(route("scans"), Action::Unknown);
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Scan Network \n"), "scan network");
        assert_eq!(route(&normalize("  QUIT ")), Action::Exit);
    }
}
