use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use tracing::warn;
use url::Url;
use crate::error::SaferError;

/// An HTTP client that only talks to approved evidence-source domains.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with the default allowlist and a 15 s request timeout.
    pub fn new() -> Result<Self, SaferError> {
        Self::with_timeout(Duration::from_secs(15))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, SaferError> {
        let domains = [
            "api.platform.opentargets.org", // Open Targets Platform GraphQL
            "www.ebi.ac.uk",                // ChEMBL
            "localhost",
            "127.0.0.1",
        ];
        let allowlist = domains.iter().map(|d| d.to_string()).collect();

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("safer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Whether a URL's host is allowlisted (exact match or subdomain).
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }

    /// POST builder for an allowlisted URL.
    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, SaferError> {
        if !self.is_allowed(url) {
            warn!(url, "Blocked request to non-allowlisted domain");
            return Err(SaferError::Security(format!(
                "domain not in allowlist for URL {}",
                url
            )));
        }
        Ok(self.client.post(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowlist() {
        let mut client = SandboxClient::new().unwrap();
        assert!(client.is_allowed("https://api.platform.opentargets.org/api/v4/graphql"));
        assert!(client.is_allowed("http://localhost:8080/graphql"));
        assert!(!client.is_allowed("https://example.org/graphql"));
        assert!(!client.is_allowed("not a url"));

        client.allow_domain("example.org");
        assert!(client.is_allowed("https://mirror.example.org/graphql"));
    }

    #[test]
    fn test_post_rejects_unlisted_domain() {
        let client = SandboxClient::new().unwrap();
        let err = client.post("https://evil.test/graphql").unwrap_err();
        assert!(matches!(err, SaferError::Security(_)));
    }
}
