//! Fact board data types.
//!
//! Wire names mirror the `facts` table columns (`votesInteresting`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog;
use crate::error::CatalogError;

/// Storage-assigned fact identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactId(i64);

impl FactId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FactId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A submitted fact with its three vote tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    pub id: FactId,
    pub text: String,
    pub source: String,
    pub category: String,
    #[serde(default)]
    pub votes_interesting: u32,
    #[serde(default)]
    pub votes_mindblowing: u32,
    #[serde(default)]
    pub votes_false: u32,
    #[serde(
        rename = "created_at",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Fact {
    /// Current tally for one vote kind.
    pub fn votes(&self, kind: VoteKind) -> u32 {
        match kind {
            VoteKind::Interesting => self.votes_interesting,
            VoteKind::Mindblowing => self.votes_mindblowing,
            VoteKind::False => self.votes_false,
        }
    }

    pub(crate) fn set_votes(&mut self, kind: VoteKind, value: u32) {
        match kind {
            VoteKind::Interesting => self.votes_interesting = value,
            VoteKind::Mindblowing => self.votes_mindblowing = value,
            VoteKind::False => self.votes_false = value,
        }
    }

    /// Disputed when false votes outweigh interesting and mind-blowing
    /// votes combined. Always derived, never stored.
    pub fn is_disputed(&self) -> bool {
        u64::from(self.votes_interesting) + u64::from(self.votes_mindblowing)
            < u64::from(self.votes_false)
    }
}

/// Insert payload: storage assigns the id and zeroes the tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFact {
    pub text: String,
    pub source: String,
    pub category: String,
}

/// The three ways to vote on a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Interesting,
    Mindblowing,
    False,
}

impl VoteKind {
    /// Column holding this tally.
    pub fn column(&self) -> &'static str {
        match self {
            VoteKind::Interesting => "votesInteresting",
            VoteKind::Mindblowing => "votesMindblowing",
            VoteKind::False => "votesFalse",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            VoteKind::Interesting => "\u{1F44D}", // 👍
            VoteKind::Mindblowing => "\u{1F92F}", // 🤯
            VoteKind::False => "\u{26D4}",        // ⛔
        }
    }

    pub fn variants() -> &'static [VoteKind] {
        &[VoteKind::Interesting, VoteKind::Mindblowing, VoteKind::False]
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteKind::Interesting => write!(f, "interesting"),
            VoteKind::Mindblowing => write!(f, "mindblowing"),
            VoteKind::False => write!(f, "false"),
        }
    }
}

impl FromStr for VoteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interesting" => Ok(VoteKind::Interesting),
            "mindblowing" => Ok(VoteKind::Mindblowing),
            "false" => Ok(VoteKind::False),
            _ => Err(format!("Invalid vote kind: {}", s)),
        }
    }
}

/// Which facts the board shows: everything, or a single category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(&'static str),
}

impl CategoryFilter {
    /// Category to pass to the data service, `None` for all facts.
    pub fn category(&self) -> Option<&'static str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Category(name) => Some(*name),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Category(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(CategoryFilter::All);
        }
        catalog::find(s)
            .map(|c| CategoryFilter::Category(c.name))
            .ok_or_else(|| CatalogError::NotFound(s.to_string()))
    }
}
