// Reference Stream
//
// Parses the comma-delimited access sequence that drives a simulation.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::common::types::{Reference, StepIndex};
use crate::engine::error::ConfigError;

const DELIMITER: char = ',';

/// Ordered, replayable list of references parsed from user input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceStream {
    references: Vec<Reference>,
    rejected: Vec<String>,
}

impl ReferenceStream {
    /// Parse a delimited reference string.
    ///
    /// Tokens are trimmed; blank tokens are skipped and tokens that are not
    /// non-negative integers are kept aside in `rejected`. Order and
    /// duplicates are preserved.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut references = Vec::new();
        let mut rejected = Vec::new();

        for token in raw.split(DELIMITER).map(str::trim).filter(|t| !t.is_empty()) {
            match token.parse::<Reference>() {
                Ok(value) => references.push(value),
                Err(_) => {
                    warn!("Dropping invalid reference token '{}'", token);
                    rejected.push(token.to_string());
                }
            }
        }

        if references.is_empty() {
            return Err(ConfigError::EmptyReferenceStream);
        }

        Ok(Self { references, rejected })
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn get(&self, step: StepIndex) -> Option<Reference> {
        self.references.get(step).copied()
    }

    pub fn as_slice(&self) -> &[Reference] {
        &self.references
    }

    /// Replay the stream from the start
    pub fn iter(&self) -> impl Iterator<Item = Reference> + '_ {
        self.references.iter().copied()
    }

    /// Tokens that were dropped because they were not valid references
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }
}

impl fmt::Display for ReferenceStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.references.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", joined.join(","))
    }
}
