use game_types::GameError;
use sha2::{Digest, Sha256};

/// Request metadata that identifies an anonymous browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    pub remote_addr: Option<String>,
    pub forwarded_for: Option<String>,
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
}

impl RequestMeta {
    /// First hop of `X-Forwarded-For` when present, otherwise the peer address.
    pub fn client_address(&self) -> &str {
        match &self.forwarded_for {
            Some(chain) => chain.split(',').next().unwrap_or_default().trim(),
            None => self.remote_addr.as_deref().unwrap_or_default(),
        }
    }
}

/// Hex encoded SHA-256 of address + user agent + accept language.
///
/// Two browsers behind the same address with the same user agent and locale
/// resolve to the same fingerprint. That collision is accepted: there is no
/// secret involved, so this is an identity hint rather than authentication.
pub fn resolve_fingerprint(meta: &RequestMeta) -> String {
    let raw = format!(
        "{}{}{}",
        meta.client_address(),
        meta.user_agent.as_deref().unwrap_or_default(),
        meta.accept_language.as_deref().unwrap_or_default(),
    );
    format!("{:x}", Sha256::digest(raw.as_bytes()))
}

/// Display names are trimmed and must not be empty.
pub fn normalize_player_name(name: &str) -> Result<String, GameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GameError::InvalidInput {
            reason: "Name is required".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(remote: &str, forwarded: Option<&str>, ua: &str, lang: &str) -> RequestMeta {
        RequestMeta {
            remote_addr: Some(remote.to_string()),
            forwarded_for: forwarded.map(str::to_string),
            user_agent: Some(ua.to_string()),
            accept_language: Some(lang.to_string()),
        }
    }

    #[test]
    fn test_fingerprint_is_sha256_hex_of_concatenation() {
        // sha256("abc")
        assert_eq!(
            resolve_fingerprint(&meta("a", None, "b", "c")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );

        // sha256("")
        assert_eq!(
            resolve_fingerprint(&RequestMeta::default()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_forwarded_chain_uses_first_hop() {
        let proxied = meta("10.0.0.1", Some("203.0.113.7, 10.0.0.2, 10.0.0.1"), "ua", "en");
        assert_eq!(proxied.client_address(), "203.0.113.7");

        let direct = meta("203.0.113.7", None, "ua", "en");
        assert_eq!(resolve_fingerprint(&proxied), resolve_fingerprint(&direct));
    }

    #[test]
    fn test_fingerprint_is_deterministic_and_sensitive() {
        let base = meta("198.51.100.4", None, "Mozilla/5.0", "en-US");
        assert_eq!(resolve_fingerprint(&base), resolve_fingerprint(&base.clone()));
        assert_eq!(resolve_fingerprint(&base).len(), 64);

        let other_language = meta("198.51.100.4", None, "Mozilla/5.0", "de-DE");
        let other_agent = meta("198.51.100.4", None, "curl/8.0", "en-US");
        let other_addr = meta("198.51.100.5", None, "Mozilla/5.0", "en-US");
        assert_ne!(resolve_fingerprint(&base), resolve_fingerprint(&other_language));
        assert_ne!(resolve_fingerprint(&base), resolve_fingerprint(&other_agent));
        assert_ne!(resolve_fingerprint(&base), resolve_fingerprint(&other_addr));
    }

    #[test]
    fn test_player_name_normalization() {
        assert_eq!(normalize_player_name("  Ada ").unwrap(), "Ada");
        assert!(matches!(
            normalize_player_name("   \t"),
            Err(GameError::InvalidInput { .. })
        ));
        assert!(normalize_player_name("").is_err());
    }
}
