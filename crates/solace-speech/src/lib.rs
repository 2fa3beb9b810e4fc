//! Solace Speech crate - speech-to-text passthrough.
//!
//! Provides a trait-based abstraction over a hosted recognition API, the
//! small outcome taxonomy callers map to HTTP responses, a Google Speech
//! client, and a mock implementation for tests.

pub mod google_service;

use std::sync::Mutex;

use async_trait::async_trait;

pub use google_service::GoogleSpeechClient;

// =============================================================================
// Types
// =============================================================================

/// An uploaded audio resource.
///
/// The bytes are forwarded untouched; the provider is expected to decode
/// them (WAV or FLAC with a header).
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

impl AudioUpload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: None,
            content_type: None,
        }
    }
}

/// Reasons a transcription did not produce text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("Audio file is empty")]
    EmptyAudio,
    /// The audio was accepted but nothing could be recognized confidently.
    #[error("Could not understand the audio")]
    Unintelligible,
    /// Network, timeout, or service failure.
    #[error("Service error: {0}")]
    Provider(String),
}

// =============================================================================
// Trait
// =============================================================================

/// Service for transcribing an uploaded audio file to text.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Transcribe `audio`, returning the recognized text.
    async fn transcribe(&self, audio: &AudioUpload) -> Result<String, SpeechError>;
}

// =============================================================================
// Mock implementation
// =============================================================================

/// Mock transcription service with a fixed outcome.
///
/// Used for testing without a network connection. Counts calls so tests
/// can assert the provider was (or was not) reached.
#[derive(Debug)]
pub struct MockTranscriptionService {
    outcome: Result<String, SpeechError>,
    calls: Mutex<usize>,
}

impl Default for MockTranscriptionService {
    fn default() -> Self {
        Self::returning("[mock transcription]")
    }
}

impl MockTranscriptionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
            calls: Mutex::new(0),
        }
    }

    pub fn failing(err: SpeechError) -> Self {
        Self {
            outcome: Err(err),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().map(|c| *c).unwrap_or(0)
    }
}

#[async_trait]
impl TranscriptionService for MockTranscriptionService {
    async fn transcribe(&self, audio: &AudioUpload) -> Result<String, SpeechError> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
        if audio.bytes.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        tracing::debug!(bytes = audio.bytes.len(), "Mock transcription generated");
        self.outcome.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
