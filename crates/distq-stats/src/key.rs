// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use distq_core::SuiteId;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// A stats-file key: a suite's path and name.
///
/// Serialized as the single string `"<path>::<name>"` rather than as a JSON
/// tuple key, because `serde_json` can only use `HashMap`/`BTreeMap` as a
/// JSON object when the key serializes to a string. Paths on disk won't
/// themselves contain `::` in practice; this is a documented assumption, not
/// a generically safe encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiteKey {
    pub path: PathBuf,
    pub name: String,
}

const SEPARATOR: &str = "::";

impl SuiteKey {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    fn to_wire_string(&self) -> String {
        format!("{}{SEPARATOR}{}", self.path.display(), self.name)
    }

    fn from_wire_string(s: &str) -> Option<Self> {
        let (path, name) = s.rsplit_once(SEPARATOR)?;
        Some(Self {
            path: PathBuf::from(path),
            name: name.to_string(),
        })
    }
}

impl From<&SuiteId> for SuiteKey {
    fn from(id: &SuiteId) -> Self {
        Self::new(id.name.clone(), id.path.clone())
    }
}

impl From<SuiteId> for SuiteKey {
    fn from(id: SuiteId) -> Self {
        Self::new(id.name, id.path)
    }
}

impl fmt::Display for SuiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire_string())
    }
}

impl Serialize for SuiteKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.to_wire_string())
    }
}

impl<'de> Deserialize<'de> for SuiteKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = SuiteKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string of the form \"<path>::<name>\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<SuiteKey, E> {
                SuiteKey::from_wire_string(v)
                    .ok_or_else(|| de::Error::custom(format!("malformed suite key: {v:?}")))
            }
        }

        deserializer.deserialize_str(KeyVisitor)
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
