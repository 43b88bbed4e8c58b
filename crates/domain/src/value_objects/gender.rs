use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Grammatical gender of a living, driving pronoun selection in the
/// soul renderer. Serialized in the single-letter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
    #[serde(rename = "n")]
    Neuter,
}

impl Gender {
    /// he / she / it
    pub fn subjective(&self) -> &'static str {
        match self {
            Gender::Male => "he",
            Gender::Female => "she",
            Gender::Neuter => "it",
        }
    }

    /// his / her / its
    pub fn possessive(&self) -> &'static str {
        match self {
            Gender::Male => "his",
            Gender::Female => "her",
            Gender::Neuter => "its",
        }
    }

    /// him / her / it
    pub fn objective(&self) -> &'static str {
        match self {
            Gender::Male => "him",
            Gender::Female => "her",
            Gender::Neuter => "it",
        }
    }

    /// male / female / neuter
    pub fn long_name(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Neuter => "neuter",
        }
    }

    /// The single-letter form used in storage: m / f / n.
    pub fn letter(&self) -> &'static str {
        match self {
            Gender::Male => "m",
            Gender::Female => "f",
            Gender::Neuter => "n",
        }
    }

    /// Parse a gender answer; accepts the single letter or the full
    /// word. Used as a dialog validator.
    pub fn parse(value: &str) -> Result<Gender, WorldError> {
        match value.trim().to_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            "n" | "neuter" => Ok(Gender::Neuter),
            _ => Err(WorldError::parse("That is not a valid gender.")),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl std::str::FromStr for Gender {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pronoun_tables() {
        assert_eq!(Gender::Male.subjective(), "he");
        assert_eq!(Gender::Female.possessive(), "her");
        assert_eq!(Gender::Neuter.objective(), "it");
    }

    #[test]
    fn parse_accepts_letter_and_word() {
        assert_eq!(Gender::parse("f").unwrap(), Gender::Female);
        assert_eq!(Gender::parse("Male").unwrap(), Gender::Male);
        assert!(Gender::parse("x").is_err());
    }
}
