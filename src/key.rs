//! Key shapes, canonicalization, and output-key reconstruction.
//!
//! Mappers may emit keys in a small closed set of shapes:
//!
//! - a primitive scalar (string, integer, float),
//! - a fixed ordered tuple of primitives,
//! - a variable-length sequence (list) of primitives.
//!
//! Before grouping, every emitted [`Key`] is normalized into a [`CanonKey`],
//! the only form the shuffle stage ever hashes or compares:
//!
//! - scalars and tuples are trusted as-is,
//! - lists are frozen into tuples (two lists with equal elements in equal
//!   order canonicalize identically),
//! - floats are rejected outright -- they have no total equality, so a key
//!   containing one cannot be used for grouping.
//!
//! After reducing, [`CanonKey::reconstruct`] maps the canonical key back to an
//! output [`Key`]. The inverse is approximate; see the method docs for the
//! single-character-fragment heuristic and its known ambiguity.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/* ===================== Scalar ===================== */

/// A primitive component of a key or payload.
///
/// Serializes untagged, so persisted JSON shows the bare value
/// (`"the"`, `15`, `2.5`) rather than an enum wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// UTF-8 string.
    Str(String),
    /// Signed integer.
    Int(i64),
    /// Floating point. Valid in payloads and emitted keys, but any key
    /// containing one fails canonicalization (no total equality).
    Float(f64),
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => write!(f, "{s}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(v) => write!(f, "{v}"),
        }
    }
}

/* ===================== Key ===================== */

/// A key emitted by a mapper, in one of the three supported shapes.
///
/// `Tuple` and `List` both serialize as JSON arrays, mirroring how the
/// shapes look once persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// A single primitive.
    Scalar(Scalar),
    /// A fixed-size ordered tuple of primitives.
    Tuple(Vec<Scalar>),
    /// A variable-length ordered sequence of primitives.
    List(Vec<Scalar>),
}

impl Key {
    /// Build a tuple key from any iterable of scalar-convertible elements.
    pub fn tuple<I, S>(elems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        Key::Tuple(elems.into_iter().map(Into::into).collect())
    }

    /// Build a list key from any iterable of scalar-convertible elements.
    pub fn list<I, S>(elems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        Key::List(elems.into_iter().map(Into::into).collect())
    }

    /// Normalize this key into its canonical, groupable form.
    ///
    /// The policy is two-tier: scalars and tuples pass through unchanged,
    /// lists are frozen into tuples. Normalization is deterministic, and
    /// keys of genuinely different logical value never collide -- scalar and
    /// compound canonical forms are distinct variants, so `"ab"` and
    /// `("ab",)` stay apart.
    ///
    /// # Errors
    /// Returns [`Error::UnhashableKey`] if the key contains a float anywhere,
    /// identifying the offending key. Grouping never proceeds with a key the
    /// policy cannot canonicalize.
    pub fn normalize(&self) -> Result<CanonKey, Error> {
        match self {
            Key::Scalar(s) => Ok(CanonKey::Scalar(freeze(s, self)?)),
            Key::Tuple(elems) | Key::List(elems) => {
                let frozen = elems
                    .iter()
                    .map(|s| freeze(s, self))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CanonKey::Tuple(frozen))
            }
        }
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Key::Scalar(Scalar::Str(v.to_string()))
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Key::Scalar(Scalar::Str(v))
    }
}

impl From<i64> for Key {
    fn from(v: i64) -> Self {
        Key::Scalar(Scalar::Int(v))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Scalar(s) => write!(f, "{s}"),
            Key::Tuple(elems) => write_compound(f, elems, ('(', ')')),
            Key::List(elems) => write_compound(f, elems, ('[', ']')),
        }
    }
}

/* ===================== CanonKey ===================== */

/// A primitive that survived canonicalization: string or integer only.
///
/// Unlike [`Scalar`], this type is `Eq + Hash`, so the type system itself
/// guarantees that anything reaching the grouping map is usable as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonScalar {
    Str(String),
    Int(i64),
}

impl From<CanonScalar> for Scalar {
    fn from(v: CanonScalar) -> Self {
        match v {
            CanonScalar::Str(s) => Scalar::Str(s),
            CanonScalar::Int(i) => Scalar::Int(i),
        }
    }
}

impl fmt::Display for CanonScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonScalar::Str(s) => write!(f, "{s}"),
            CanonScalar::Int(i) => write!(f, "{i}"),
        }
    }
}

/// The canonical, groupable form of an emitted [`Key`].
///
/// This is the equality used by the shuffle stage: two emissions land in the
/// same group exactly when their canonical keys compare equal.
///
/// The `Display` impl is cosmetic -- it exists so canonical keys can serve as
/// JSON object keys in persisted intermediates -- and is never consulted for
/// grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonKey {
    Scalar(CanonScalar),
    Tuple(Vec<CanonScalar>),
}

impl CanonKey {
    /// Map this canonical key back to the shape of an output [`Key`].
    ///
    /// The reconstruction is an approximate inverse of [`Key::normalize`]:
    ///
    /// - a tuple whose elements are all single-character string fragments is
    ///   reassembled into one string, undoing the artifact of a string key
    ///   iterated element-by-element upstream (the empty tuple vacuously
    ///   qualifies and comes back as `""`);
    /// - any other tuple becomes a [`Key::List`], mirroring how list-shaped
    ///   keys look once serialized;
    /// - scalars pass through unchanged.
    ///
    /// The fragment heuristic is lossy by construction: a list key
    /// `["a", "b"]` canonicalizes to the tuple `("a", "b")` and therefore
    /// comes back as the string `"ab"`. That collision is documented,
    /// intentional behavior -- the string case wins.
    pub fn reconstruct(self) -> Key {
        match self {
            CanonKey::Scalar(s) => Key::Scalar(s.into()),
            CanonKey::Tuple(elems) => {
                let all_fragments = elems
                    .iter()
                    .all(|e| matches!(e, CanonScalar::Str(s) if s.chars().count() == 1));
                if all_fragments {
                    let joined: String = elems
                        .into_iter()
                        .map(|e| match e {
                            CanonScalar::Str(s) => s,
                            CanonScalar::Int(_) => unreachable!("fragment check admits only strings"),
                        })
                        .collect();
                    Key::Scalar(Scalar::Str(joined))
                } else {
                    Key::List(elems.into_iter().map(Scalar::from).collect())
                }
            }
        }
    }
}

impl fmt::Display for CanonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonKey::Scalar(s) => write!(f, "{s}"),
            CanonKey::Tuple(elems) => {
                write!(f, "(")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match e {
                        CanonScalar::Str(s) => write!(f, "{s:?}")?,
                        CanonScalar::Int(v) => write!(f, "{v}")?,
                    }
                }
                write!(f, ")")
            }
        }
    }
}

/* ===================== helpers ===================== */

fn freeze(s: &Scalar, whole: &Key) -> Result<CanonScalar, Error> {
    match s {
        Scalar::Str(v) => Ok(CanonScalar::Str(v.clone())),
        Scalar::Int(v) => Ok(CanonScalar::Int(*v)),
        Scalar::Float(_) => Err(Error::UnhashableKey {
            key: whole.to_string(),
        }),
    }
}

fn write_compound(f: &mut fmt::Formatter<'_>, elems: &[Scalar], brackets: (char, char)) -> fmt::Result {
    write!(f, "{}", brackets.0)?;
    for (i, e) in elems.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        match e {
            Scalar::Str(s) => write!(f, "{s:?}")?,
            other => write!(f, "{other}")?,
        }
    }
    write!(f, "{}", brackets.1)
}
