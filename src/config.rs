use std::ops::RangeInclusive;

use thiserror::Error;

use crate::document::SplitterConfig;

pub const THRESHOLD_RANGE: RangeInclusive<u8> = 50..=90;
pub const QUESTIONS_PER_CHUNK_RANGE: RangeInclusive<u8> = 1..=5;

pub const DEFAULT_THRESHOLD: u8 = 70;
pub const DEFAULT_QUESTIONS_PER_CHUNK: u8 = 2;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("similarity threshold must be between 50 and 90, got {0}")]
    Threshold(u32),

    #[error("questions per section must be between 1 and 5, got {0}")]
    QuestionsPerChunk(u32),
}

/// Session settings the user may change while the program runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    similarity_threshold: u8,
    questions_per_chunk: u8,

    /// not user adjustable
    pub splitter: SplitterConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_THRESHOLD,
            questions_per_chunk: DEFAULT_QUESTIONS_PER_CHUNK,
            splitter: SplitterConfig::default(),
        }
    }
}

impl Settings {
    pub fn new(similarity_threshold: u8, questions_per_chunk: u8) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        settings.set_similarity_threshold(u32::from(similarity_threshold))?;
        settings.set_questions_per_chunk(u32::from(questions_per_chunk))?;
        Ok(settings)
    }

    pub fn similarity_threshold(&self) -> u8 {
        self.similarity_threshold
    }

    pub fn questions_per_chunk(&self) -> usize {
        usize::from(self.questions_per_chunk)
    }

    pub fn set_similarity_threshold(&mut self, value: u32) -> Result<(), ConfigError> {
        match u8::try_from(value) {
            Ok(threshold) if THRESHOLD_RANGE.contains(&threshold) => {
                self.similarity_threshold = threshold;
                Ok(())
            }
            _ => Err(ConfigError::Threshold(value)),
        }
    }

    pub fn set_questions_per_chunk(&mut self, value: u32) -> Result<(), ConfigError> {
        match u8::try_from(value) {
            Ok(count) if QUESTIONS_PER_CHUNK_RANGE.contains(&count) => {
                self.questions_per_chunk = count;
                Ok(())
            }
            _ => Err(ConfigError::QuestionsPerChunk(value)),
        }
    }
}
