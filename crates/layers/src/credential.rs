use std::env;
use std::sync::OnceLock;

/// Environment variable holding the map provider's public access token.
pub const TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

const MIN_TOKEN_LEN: usize = 20;

/// Public map access token. `Debug` output never shows the secret part.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    Missing,
    Malformed(&'static str),
}

impl std::fmt::Display for CredentialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialError::Missing => write!(f, "map access token is not set ({TOKEN_ENV})"),
            CredentialError::Malformed(why) => write!(f, "map access token is malformed: {why}"),
        }
    }
}

impl std::error::Error for CredentialError {}

impl AccessToken {
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(CredentialError::Missing);
        }
        if token.chars().any(char::is_whitespace) {
            return Err(CredentialError::Malformed("contains whitespace"));
        }
        if !token.starts_with("pk.") {
            return Err(CredentialError::Malformed("expected a public token (pk.…)"));
        }
        if token.len() < MIN_TOKEN_LEN {
            return Err(CredentialError::Malformed("too short"));
        }
        Ok(Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken(pk.***)")
    }
}

/// Token from the runtime environment, else the one baked in at build time.
///
/// Read once per process; later changes to the environment are not seen.
pub fn token_from_env() -> Result<AccessToken, CredentialError> {
    static TOKEN: OnceLock<Result<AccessToken, CredentialError>> = OnceLock::new();
    TOKEN
        .get_or_init(|| {
            let raw = env::var(TOKEN_ENV)
                .ok()
                .or_else(|| option_env!("MAPBOX_ACCESS_TOKEN").map(str::to_string));
            match raw {
                Some(raw) => AccessToken::parse(&raw),
                None => Err(CredentialError::Missing),
            }
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::{AccessToken, CredentialError};

    #[test]
    fn accepts_public_tokens() {
        let t = AccessToken::parse("  pk.eyJ1IjoiZHdsIiwiYSI6ImNsMDAifQ.abc  ").expect("token");
        assert!(t.as_str().starts_with("pk.eyJ1"));
        assert_eq!(format!("{t:?}"), "AccessToken(pk.***)");
    }

    #[test]
    fn rejects_missing_and_malformed_tokens() {
        assert_eq!(AccessToken::parse(""), Err(CredentialError::Missing));
        assert_eq!(AccessToken::parse("   "), Err(CredentialError::Missing));
        assert!(matches!(
            AccessToken::parse("sk.eyJ1IjoiZHdsIiwiYSI6ImNsMDAifQ"),
            Err(CredentialError::Malformed(_))
        ));
        assert!(matches!(
            AccessToken::parse("pk.short"),
            Err(CredentialError::Malformed(_))
        ));
        assert!(matches!(
            AccessToken::parse("pk.eyJ1Ijoi ZHdsIiwiYSI6"),
            Err(CredentialError::Malformed(_))
        ));
    }
}
