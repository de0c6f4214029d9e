//! Block explorer URL formatting.
//!
//! Purely cosmetic: turns identifiers and addresses into links a human can
//! click after a script finishes. No part of correctness depends on this.

use crate::address::Address;
use crate::config::DEFAULT_EXPLORER_URL;
use crate::unit::UnitId;

/// A block explorer instance, identified by its base URL.
#[derive(Debug, Clone)]
pub struct Explorer {
    base_url: String,
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new(DEFAULT_EXPLORER_URL)
    }
}

impl Explorer {
    /// An explorer at `base_url`; a trailing slash is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Link to a submitted unit's page.
    pub fn unit_url(&self, id: &UnitId) -> String {
        format!("{}/unit/{}", self.base_url, id)
    }

    /// Link to an address's page.
    pub fn address_url(&self, address: &Address) -> String {
        format!("{}/address/{}", self.base_url, address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::VelaKeypair;

    #[test]
    fn address_url_contains_base58_form() {
        let explorer = Explorer::new("https://example.org");
        let address = Address::new_unique();
        assert_eq!(
            explorer.address_url(&address),
            format!("https://example.org/address/{address}")
        );
    }

    #[test]
    fn unit_url_contains_identifier() {
        let explorer = Explorer::default();
        let sig = VelaKeypair::generate().sign(b"unit");
        let id = UnitId::from_signature(&sig).unwrap();
        let url = explorer.unit_url(&id);
        assert!(url.starts_with(DEFAULT_EXPLORER_URL));
        assert!(url.ends_with(&id.to_string()));
    }

    #[test]
    fn trailing_slashes_are_normalized() {
        let explorer = Explorer::new("https://example.org///");
        let address = Address::new_unique();
        assert!(!explorer.address_url(&address).contains("///address"));
    }
}
