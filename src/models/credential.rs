use std::fmt;

/// Bearer token presented on every API call.
///
/// No expiry is tracked: the credential is considered valid until a call
/// comes back with an authorization error.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Never leak the token into logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} chars>)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::new("BQD-secret-token");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("secret"));
        assert_eq!(credential.bearer_header(), "Bearer BQD-secret-token");
    }
}
