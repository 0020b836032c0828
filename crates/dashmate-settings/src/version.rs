//! Schema version parsing and ordering.
//!
//! Versions are dotted `major.minor.patch` strings. Parsing is tolerant:
//! a missing or non-numeric component reads as 0, so `"1.2"` is `1.2.0`
//! and `""` is `0.0.0`. Comparison is lexicographic over the triple.

use std::cmp::Ordering;
use std::fmt;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// A parsed schema version.
///
/// Field order matters: the derived `Ord` compares `major`, then `minor`,
/// then `patch`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a dotted version string. Never fails: each dot-separated
    /// segment is read as an integer, defaulting to 0 when absent or
    /// non-numeric.
    pub fn parse(s: &str) -> Self {
        let mut segments = s.split('.').map(|seg| seg.trim().parse().unwrap_or(0));
        Self {
            major: segments.next().unwrap_or(0),
            minor: segments.next().unwrap_or(0),
            patch: segments.next().unwrap_or(0),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

// Settings documents carry versions as plain strings ("1.4.0"), so serde
// round-trips through the display form rather than a struct.
impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Version::parse(&s))
    }
}

/// Compare two version strings by their parsed triples.
///
/// The single ordering primitive the migration engine depends on: total,
/// reflexive, antisymmetric, transitive.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    Version::parse(a).cmp(&Version::parse(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_triple() {
        assert_eq!(Version::parse("1.2.3"), Version::new(1, 2, 3));
    }

    #[test]
    fn parse_missing_components_default_to_zero() {
        assert_eq!(Version::parse("1.2"), Version::new(1, 2, 0));
        assert_eq!(Version::parse("7"), Version::new(7, 0, 0));
        assert_eq!(Version::parse(""), Version::new(0, 0, 0));
    }

    #[test]
    fn parse_non_numeric_components_default_to_zero() {
        assert_eq!(Version::parse("a.b.c"), Version::new(0, 0, 0));
        assert_eq!(Version::parse("1.x.3"), Version::new(1, 0, 3));
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(Version::new(1, 2, 3) < Version::new(1, 3, 0));
        assert!(Version::new(1, 3, 0) < Version::new(2, 0, 0));
        assert!(Version::new(1, 2, 3) < Version::new(1, 2, 4));
        assert!(Version::new(2, 0, 0) > Version::new(1, 99, 99));
    }

    #[test]
    fn comparison_is_total_and_antisymmetric() {
        let samples = ["", "1.2", "1.2.0", "1.2.3", "1.3.0", "2.0.0", "99.0.0"];
        for a in samples {
            assert_eq!(compare_versions(a, a), Ordering::Equal);
            for b in samples {
                assert_eq!(compare_versions(a, b), compare_versions(b, a).reverse());
            }
        }
    }

    #[test]
    fn distinct_strings_with_equal_triples_compare_equal() {
        assert_eq!(compare_versions("1.2", "1.2.0"), Ordering::Equal);
    }

    #[test]
    fn display_round_trips() {
        let v = Version::new(1, 4, 0);
        assert_eq!(v.to_string(), "1.4.0");
        assert_eq!(Version::parse(&v.to_string()), v);
    }

    #[test]
    fn serde_uses_string_form() {
        let v = Version::new(1, 4, 0);
        assert_eq!(serde_json::to_value(v).unwrap(), serde_json::json!("1.4.0"));
        let parsed: Version = serde_json::from_value(serde_json::json!("2.1")).unwrap();
        assert_eq!(parsed, Version::new(2, 1, 0));
    }
}
