//! Registry related type definitions

use serde::{Deserialize, Serialize};

use pekked_provider::Address;

/// Name and record the user is typing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub record: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>, record: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record: record.into(),
        }
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.record.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.record.is_empty()
    }
}

/// A registered name as read back from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRecord {
    /// Position in the registry's name list
    pub id: usize,
    pub name: String,
    pub record: String,
    pub owner: Address,
}

impl MintRecord {
    /// Owner comparison is case-insensitive.
    pub fn is_owned_by(&self, address: &Address) -> bool {
        self.owner.matches(address)
    }

    /// `name.tld`
    pub fn full_name(&self, tld: &str) -> String {
        format!("{}.{}", self.name, tld.trim_start_matches('.'))
    }

    /// Marketplace page of the token minted for this name.
    pub fn marketplace_url(&self, contract: &Address) -> String {
        format!(
            "https://testnets.opensea.io/assets/mumbai/{contract}/{}",
            self.id
        )
    }
}

/// Whether the form edits an existing record instead of minting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "name", rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    Inactive,
    Editing(String),
}

impl EditMode {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Editing(name) => Some(name),
            Self::Inactive => None,
        }
    }
}
