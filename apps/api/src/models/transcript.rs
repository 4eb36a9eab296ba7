use serde::{Deserialize, Serialize};

/// One speaker-labelled utterance from an interview session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptEntry {
    pub role: String,
    pub content: String,
}

/// Renders the transcript as role-prefixed lines for the evaluation prompt.
pub fn format_transcript(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("- {}: {}\n", entry.role, entry.content))
        .collect()
}
