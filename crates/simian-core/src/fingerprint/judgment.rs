use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::constants::judgment::{DUPLICATE, SIMILAR, TONALLY_SIMILAR, VARIATION};

/// Human-readable verdict for a fingerprint difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgment {
    Duplicate,
    Variation,
    Similar,
    TonallySimilar,
    Different,
}

impl Judgment {
    pub fn from_difference(difference: f64) -> Self {
        if difference < DUPLICATE {
            Judgment::Duplicate
        } else if difference < VARIATION {
            Judgment::Variation
        } else if difference < SIMILAR {
            Judgment::Similar
        } else if difference < TONALLY_SIMILAR {
            Judgment::TonallySimilar
        } else {
            Judgment::Different
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Judgment::Duplicate => "duplicate",
            Judgment::Variation => "variation",
            Judgment::Similar => "similar",
            Judgment::TonallySimilar => "tonally/texturally similar",
            Judgment::Different => "different",
        }
    }
}

impl fmt::Display for Judgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
