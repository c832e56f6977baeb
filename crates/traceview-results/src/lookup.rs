use url::Url;

pub const WHOIS_LOOKUP_BASE: &str = "https://who.is/whois-ip/ip-address/";

/// Builds the reference for an external lookup of a hop address. Opening
/// the reference is left to the caller.
pub trait LookupLinker {
    fn lookup_ref(&self, address: &str) -> Option<String>;
}

#[derive(Debug, thiserror::Error)]
pub enum LookupBaseError {
    #[error("invalid lookup base {base:?}: {source}")]
    Invalid {
        base: String,
        #[source]
        source: url::ParseError,
    },
    #[error("lookup base {base:?} cannot carry a path")]
    CannotBeABase { base: String },
}

/// Appends the address as the final path segment of a base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct WhoisLinker {
    base: Url,
}

impl WhoisLinker {
    pub fn new(base: &str) -> Result<Self, LookupBaseError> {
        let url = Url::parse(base).map_err(|source| LookupBaseError::Invalid {
            base: base.to_string(),
            source,
        })?;
        if url.cannot_be_a_base() {
            return Err(LookupBaseError::CannotBeABase {
                base: base.to_string(),
            });
        }
        Ok(Self { base: url })
    }
}

impl LookupLinker for WhoisLinker {
    fn lookup_ref(&self, address: &str) -> Option<String> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        let mut url = self.base.clone();
        url.path_segments_mut().ok()?.pop_if_empty().push(address);
        Some(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whois() -> WhoisLinker {
        WhoisLinker::new(WHOIS_LOOKUP_BASE).unwrap()
    }

    #[test]
    fn appends_address_to_base() {
        assert_eq!(
            whois().lookup_ref("10.0.0.1").as_deref(),
            Some("https://who.is/whois-ip/ip-address/10.0.0.1")
        );
    }

    #[test]
    fn base_without_trailing_slash_gets_one_segment() {
        let linker = WhoisLinker::new("https://lookup.example/ip").unwrap();
        assert_eq!(
            linker.lookup_ref("1.1.1.1").as_deref(),
            Some("https://lookup.example/ip/1.1.1.1")
        );
    }

    #[test]
    fn escapes_path_characters() {
        let reference = whois().lookup_ref("a/b?c").unwrap();
        assert_eq!(reference, "https://who.is/whois-ip/ip-address/a%2Fb%3Fc");
    }

    #[test]
    fn empty_address_has_no_reference() {
        assert_eq!(whois().lookup_ref(""), None);
        assert_eq!(whois().lookup_ref("   "), None);
    }

    #[test]
    fn rejects_unusable_bases() {
        assert!(matches!(
            WhoisLinker::new("not a url"),
            Err(LookupBaseError::Invalid { .. })
        ));
        assert!(matches!(
            WhoisLinker::new("mailto:ops@example.com"),
            Err(LookupBaseError::CannotBeABase { .. })
        ));
    }
}
