use git_conventional::{Commit as ConventionalCommit, Type};
use serde::Serialize;
use std::fmt;

use crate::{PushReleaseError, Result};

/// Semantic-version bump category implied by a commit.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Increment {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl Increment {
    /// Whether this increment calls for a release.
    pub fn is_release(&self) -> bool {
        !matches!(self, Increment::None)
    }
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Increment::None => "none",
            Increment::Patch => "patch",
            Increment::Minor => "minor",
            Increment::Major => "major",
        };
        write!(f, "{name}")
    }
}

/// Result of classifying a commit message.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub increment: Increment,
    pub is_breaking: bool,
}

/// Maps a raw commit message to the version bump it implies.
pub trait CommitClassifier: Send + Sync {
    fn classify(&self, message: &str) -> Result<Classification>;
}

/// Classifier for the conventional commit grammar.
///
/// Breaking commits bump major, `feat` bumps minor, `fix` bumps patch and any
/// other type implies no release. Messages that do not follow the grammar are
/// rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConventionalClassifier;

impl CommitClassifier for ConventionalClassifier {
    fn classify(&self, message: &str) -> Result<Classification> {
        let parsed = ConventionalCommit::parse(message.trim_end()).map_err(
            |err| {
                let header = message.lines().next().unwrap_or_default();
                PushReleaseError::Classification(format!("{header}: {err}"))
            },
        )?;

        let is_breaking = parsed.breaking();

        let increment = if is_breaking {
            Increment::Major
        } else if parsed.type_() == Type::FEAT {
            Increment::Minor
        } else if parsed.type_() == Type::FIX {
            Increment::Patch
        } else {
            Increment::None
        };

        Ok(Classification {
            increment,
            is_breaking,
        })
    }
}
