//! Atlas model - named sprite frames collected from a packer manifest
//!
//! An [`Atlas`] maps sprite names to [`SpriteEntry`] records. Keys keep the
//! position of their first appearance, so output is stable between runs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Top-left offset of a sprite within the atlas image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

/// Sprite center point (for positioning/rotation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
}

impl Origin {
    /// Center of a `width` x `height` box. Odd sizes land on a half pixel.
    pub fn center_of(width: i64, height: i64) -> Self {
        Self { x: width as f64 / 2.0, y: height as f64 / 2.0 }
    }
}

/// A sprite's position and size within an atlas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteEntry {
    pub name: String,
    #[serde(rename = "pos")]
    pub position: Position,
    pub width: i64,
    pub height: i64,
    /// Always derived from `width` and `height`
    pub origin: Origin,
}

impl SpriteEntry {
    pub fn new(name: impl Into<String>, x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            name: name.into(),
            position: Position { x, y },
            width,
            height,
            origin: Origin::center_of(width, height),
        }
    }
}

/// What to do when a sprite name appears more than once in one manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Later entry replaces the earlier one
    #[default]
    Overwrite,
    /// Reject the manifest
    Error,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Overwrite => write!(f, "overwrite"),
            DuplicatePolicy::Error => write!(f, "error"),
        }
    }
}

/// Returned by [`Atlas::insert`] under [`DuplicatePolicy::Error`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate sprite name '{0}'")]
pub struct DuplicateName(pub String);

/// Sprite entries keyed by name
#[derive(Debug, Clone, Default)]
pub struct Atlas {
    entries: IndexMap<String, SpriteEntry>,
    policy: DuplicatePolicy,
    overwrites: usize,
}

impl Atlas {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self { entries: IndexMap::new(), policy, overwrites: 0 }
    }

    /// Add an entry under its name.
    ///
    /// Returns the entry it replaced, if any. A replaced key keeps its
    /// original position in the map.
    pub fn insert(&mut self, entry: SpriteEntry) -> Result<Option<SpriteEntry>, DuplicateName> {
        if self.policy == DuplicatePolicy::Error && self.entries.contains_key(&entry.name) {
            return Err(DuplicateName(entry.name));
        }

        let previous = self.entries.insert(entry.name.clone(), entry);
        if previous.is_some() {
            self.overwrites += 1;
        }
        Ok(previous)
    }

    pub fn get(&self, name: &str) -> Option<&SpriteEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sprite names in output order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries that replaced an earlier entry with the same name
    pub fn overwrites(&self) -> usize {
        self.overwrites
    }
}

impl Serialize for Atlas {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter())
    }
}
