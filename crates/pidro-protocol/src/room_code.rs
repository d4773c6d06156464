//! Room codes: the four-character identifiers players type in to join.

use std::fmt;

use rand::Rng;

use crate::ProtocolError;

const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Exactly four characters from `[A-Z0-9]`, case-insensitive on input
/// (uppercased at the boundary). Generated uniformly from the 36-symbol
/// alphabet; uniqueness among live rooms is the Room Manager's job, not
/// this type's — a `RoomCode` on its own doesn't know what else exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode([u8; 4]);

impl RoomCode {
    /// Parses and uppercases a user-supplied code. Rejects anything that
    /// isn't exactly four `[A-Za-z0-9]` characters.
    pub fn parse(input: &str) -> Result<Self, ProtocolError> {
        let upper = input.to_ascii_uppercase();
        let bytes = upper.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(ProtocolError::InvalidRoomCode(input.to_owned()));
        }
        Ok(Self([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Draws four symbols uniformly from the 36-symbol alphabet. Callers
    /// (the Room Manager) are responsible for regenerating on collision.
    pub fn generate(rng: &mut impl Rng) -> Self {
        let mut bytes = [0u8; 4];
        for b in &mut bytes {
            *b = ALPHABET[rng.random_range(0..ALPHABET.len())];
        }
        Self(bytes)
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).expect("RoomCode is always ASCII")
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RoomCode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomCode> for String {
    fn from(value: RoomCode) -> Self {
        value.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn parse_uppercases_and_accepts_mixed_case() {
        let code = RoomCode::parse("aB3d").unwrap();
        assert_eq!(code.as_str(), "AB3D");
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(RoomCode::parse("ABC").is_err());
        assert!(RoomCode::parse("ABCDE").is_err());
    }

    #[test]
    fn parse_rejects_non_alphanumeric() {
        assert!(RoomCode::parse("AB-D").is_err());
        assert!(RoomCode::parse("AB D").is_err());
    }

    #[test]
    fn generate_produces_parseable_code() {
        let mut rng = StdRng::seed_from_u64(42);
        let code = RoomCode::generate(&mut rng);
        assert_eq!(RoomCode::parse(code.as_str()).unwrap(), code);
    }

    #[test]
    fn generate_varies_across_draws() {
        let mut rng = StdRng::seed_from_u64(7);
        let codes: std::collections::HashSet<_> =
            (0..50).map(|_| RoomCode::generate(&mut rng)).collect();
        assert!(codes.len() > 1, "50 draws from a 36^4 space should not collapse to one code");
    }
}
