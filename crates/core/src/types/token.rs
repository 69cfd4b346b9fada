//! Human-shareable join codes.
//!
//! Families and invites both hand out short upper-case codes such as
//! `FAM-K7QX2M-9HDW` or `INV-3RTP8C-WX4N`. A single [`TokenGenerator`]
//! produces both; the prefix only tells a person which kind they are holding.
//! Lookups never trust the prefix: the join resolver checks the invite and
//! family namespaces independently.

use core::fmt;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Characters used in generated codes. Look-alikes (`0 O 1 I L`) are left out
/// so codes survive being read aloud or typed from a phone screen.
const ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Length of the first random group.
const HEAD_LEN: usize = 6;

/// Length of the second random group.
const TAIL_LEN: usize = 4;

/// Which namespace a code was generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Reusable code identifying a family.
    Family,
    /// Single-use code attached to an invite.
    Invite,
}

impl TokenKind {
    /// Prefix rendered in front of the random groups.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Family => "FAM",
            Self::Invite => "INV",
        }
    }
}

/// A generated join code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinCode(String);

impl JoinCode {
    /// Wrap an already formatted code.
    #[must_use]
    pub const fn from_raw(code: String) -> Self {
        Self(code)
    }

    /// Normalise user input before it is compared with stored codes.
    ///
    /// ```
    /// use shopping_planner_core::JoinCode;
    ///
    /// assert_eq!(JoinCode::normalize("  fam-abc234-wxyz "), "FAM-ABC234-WXYZ");
    /// ```
    #[must_use]
    pub fn normalize(input: &str) -> String {
        input.trim().to_uppercase()
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh join codes.
///
/// Uniqueness is not the generator's job: the store rejects duplicates and
/// callers retry with a new code.
pub trait TokenGenerator: Send + Sync {
    /// Produce a new code in the given namespace.
    fn generate(&self, kind: TokenKind) -> JoinCode;
}

/// Generator backed by the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokens;

impl TokenGenerator for RandomTokens {
    fn generate(&self, kind: TokenKind) -> JoinCode {
        let mut rng = rand::rng();
        let head = random_group(&mut rng, HEAD_LEN);
        let tail = random_group(&mut rng, TAIL_LEN);
        JoinCode(format!("{}-{head}-{tail}", kind.prefix()))
    }
}

fn random_group<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET.choose(rng).copied().map_or('X', char::from))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_family_code_format() {
        let code = RandomTokens.generate(TokenKind::Family);
        let parts: Vec<&str> = code.as_str().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "FAM");
        assert_eq!(parts[1].len(), HEAD_LEN);
        assert_eq!(parts[2].len(), TAIL_LEN);
        assert!(
            parts[1..]
                .iter()
                .flat_map(|p| p.bytes())
                .all(|b| ALPHABET.contains(&b))
        );
    }

    #[test]
    fn test_invite_code_prefix() {
        let code = RandomTokens.generate(TokenKind::Invite);
        assert!(code.as_str().starts_with("INV-"));
    }

    #[test]
    fn test_codes_do_not_repeat() {
        let codes: HashSet<_> = (0..500)
            .map(|_| RandomTokens.generate(TokenKind::Family))
            .collect();
        assert_eq!(codes.len(), 500);
    }

    #[test]
    fn test_generated_codes_are_already_normalized() {
        let code = RandomTokens.generate(TokenKind::Invite);
        assert_eq!(JoinCode::normalize(code.as_str()), code.as_str());
    }
}
