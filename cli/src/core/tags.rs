//! # Hey Image Tag Arithmetic
//!
//! File: cli/src/core/tags.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Image tags pushed by `hey` look like `v1.4.2`. The registry is asked for the
//! tags of the most recent image, which may carry several (for example
//! `v1.4.2;prod`). This module picks the highest version among them and works
//! out the next one by bumping the last component: `v1.4.2` → `v1.4.3`.
//!
//! Fields that are not plain numbers are dropped while parsing, so `v1.4-rc.2`
//! reads as `[1, 2]`. Tags with no numeric field at all (`prod`, `latest`) are
//! ignored when choosing the latest version. If nothing usable remains the
//! image has never been versioned and the caller gets `HeyError::NoTags`; no
//! `v0`-style tag is ever made up.
//!
use crate::core::error::{HeyError, Result};
use std::fmt;

/// Marker prefixed to every version tag.
pub const VERSION_MARKER: char = 'v';

/// A parsed version tag. Ordering is lexicographic over the components.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionTag(Vec<u64>);

impl VersionTag {
    /// Parses one raw tag. The result may have no components.
    ///
    /// A numeric field too large for `u64` makes the whole tag unusable, so
    /// it is never mistaken for a shorter version.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().trim_matches(|c| c == '\'' || c == '"');
        let body = raw.strip_prefix(VERSION_MARKER).unwrap_or(raw);
        let components: Option<Vec<u64>> = body
            .split('.')
            .filter(|field| !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit()))
            .map(|field| field.parse().ok())
            .collect();
        match components {
            Some(components) => Self(components),
            None => {
                tracing::warn!("Ignoring tag '{}': version number out of range", raw);
                Self(Vec::new())
            }
        }
    }

    #[cfg(test)]
    pub fn components(&self) -> &[u64] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The following version: last component plus one, the rest unchanged.
    pub fn next(&self) -> Option<Self> {
        let (last, rest) = self.0.split_last()?;
        let mut components = rest.to_vec();
        components.push(last.checked_add(1)?);
        Some(Self(components))
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(u64::to_string).collect();
        write!(f, "{}{}", VERSION_MARKER, joined.join("."))
    }
}

/// Picks the highest version from `;`-separated registry output.
pub fn latest(image: &str, registry_output: &str) -> Result<VersionTag> {
    registry_output
        .split(';')
        .map(VersionTag::parse)
        .filter(|tag| !tag.is_empty())
        .max()
        .ok_or_else(|| {
            HeyError::NoTags {
                image: image.to_string(),
            }
            .into()
        })
}

/// Computes `image:vX.Y.Z` for the version after the latest one.
pub fn next_image_tag(image: &str, registry_output: &str) -> Result<String> {
    let current = latest(image, registry_output)?;
    let next = current.next().ok_or_else(|| HeyError::NoTags {
        image: image.to_string(),
    })?;
    tracing::debug!("Latest tag for {} is {}, next is {}", image, current, next);
    Ok(format!("{}:{}", image, next))
}
