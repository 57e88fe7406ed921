//! Personality state and the personality-conditioned decision policy.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Session-wide personality of the assistant.
///
/// # Details
/// Chosen once at construction and read-only thereafter. Several actions
/// (decision making, canned responses, log flavor) read it to vary behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Friendly,
    Aggressive,
    Neutral,
    Curious,
}

impl Personality {
    /// Every personality the assistant can be assigned.
    pub const ALL: [Personality; 4] = [
        Personality::Friendly,
        Personality::Aggressive,
        Personality::Neutral,
        Personality::Curious,
    ];

    /// Draws a personality uniformly at random.
    ///
    /// # Parameters
    /// * `rng` - Source of randomness; pass a seeded RNG for reproducible runs.
    pub fn random(rng: &mut impl Rng) -> Self {
        *Self::ALL.choose(rng).expect("personality list is non-empty")
    }

    /// Lowercase name used in greetings, prompts, and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Friendly => "friendly",
            Personality::Aggressive => "aggressive",
            Personality::Neutral => "neutral",
            Personality::Curious => "curious",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical outcome of the decision policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionLabel {
    Attack,
    Monitor,
    Analyze,
    Observe,
    Ignore,
}

impl DecisionLabel {
    /// Label text spoken and logged when a decision is announced.
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionLabel::Attack => "Attack",
            DecisionLabel::Monitor => "Monitor",
            DecisionLabel::Analyze => "Analyze",
            DecisionLabel::Observe => "Observe",
            DecisionLabel::Ignore => "Ignore",
        }
    }
}

impl fmt::Display for DecisionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a prediction score to a decision label for the given personality.
///
/// # Details
/// Deterministic given its inputs. Thresholds and label pairs are
/// personality-specific; comparisons are strict, so a score exactly at the
/// threshold falls to the lower branch. Friendly and neutral share the
/// default pair.
///
/// # Arguments
/// * `score` - Prediction score in [0, 1] from the classifier.
/// * `personality` - The assistant's session personality.
///
/// # Returns
/// The decision label for this (score, personality) pair.
pub fn decide(score: f32, personality: Personality) -> DecisionLabel {
    match personality {
        Personality::Aggressive => {
            if score > 0.4 {
                DecisionLabel::Attack
            } else {
                DecisionLabel::Monitor
            }
        }
        Personality::Curious => {
            if score > 0.3 {
                DecisionLabel::Analyze
            } else {
                DecisionLabel::Observe
            }
        }
        Personality::Friendly | Personality::Neutral => {
            if score > 0.5 {
                DecisionLabel::Monitor
            } else {
                DecisionLabel::Ignore
            }
        }
    }
}

/// Canned greeting responses, three per personality.
const FRIENDLY_RESPONSES: [&str; 3] =
    ["I'm here to help!", "At your service!", "Let me assist you."];
const AGGRESSIVE_RESPONSES: [&str; 3] = [
    "Let's get things done!",
    "Time to take control!",
    "I'm ready to attack.",
];
const NEUTRAL_RESPONSES: [&str; 3] = [
    "What would you like me to do?",
    "I'm here.",
    "Awaiting instructions.",
];
const CURIOUS_RESPONSES: [&str; 3] = [
    "Tell me more!",
    "Interesting, let's dig deeper.",
    "Let's learn together!",
];

/// Returns the fixed response list for a personality.
pub fn response_phrases(personality: Personality) -> &'static [&'static str] {
    match personality {
        Personality::Friendly => &FRIENDLY_RESPONSES,
        Personality::Aggressive => &AGGRESSIVE_RESPONSES,
        Personality::Neutral => &NEUTRAL_RESPONSES,
        Personality::Curious => &CURIOUS_RESPONSES,
    }
}

/// Picks a canned response uniformly at random from the personality's list.
///
/// # Details
/// Non-deterministic by design; callers asserting on the result should check
/// membership in [`response_phrases`] rather than exact equality.
pub fn respond(personality: Personality, rng: &mut impl Rng) -> &'static str {
    response_phrases(personality)
        .choose(rng)
        .expect("response list is non-empty")
}
