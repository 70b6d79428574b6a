//! Parsing of resolver configuration (`resolv.conf` format).
//!
//! Pure functions only. Lines are `keyword value...`; `#` and `;` start a
//! comment. As with the system resolver, `domain` and `search` override each
//! other and the last one in the file wins.

use std::net::Ipv4Addr;

/// Domain used when the resolver configuration names none.
pub const DEFAULT_DOMAIN: &str = "local";

/// The parts of a resolver configuration the provisioner cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Local domain, from the last `domain` or the first entry of the last
    /// `search` line.
    pub domain: Option<String>,
    /// IPv4 name server addresses, in file order.
    pub nameservers: Vec<String>,
    /// `nameserver` values that are not IPv4 addresses, IPv6 included.
    pub rejected: Vec<String>,
}

impl ResolverConfig {
    /// The configured domain, or [`DEFAULT_DOMAIN`].
    #[must_use]
    pub fn domain_or_default(&self) -> &str {
        self.domain.as_deref().unwrap_or(DEFAULT_DOMAIN)
    }
}

/// Parse resolver configuration text.
#[must_use]
pub fn parse(content: &str) -> ResolverConfig {
    let mut config = ResolverConfig::default();
    for line in content.lines() {
        let line = line.split(['#', ';']).next().unwrap_or_default();
        let mut words = line.split_whitespace();
        let Some(keyword) = words.next() else {
            continue;
        };
        match keyword {
            "domain" | "search" => {
                config.domain = words
                    .next()
                    .map(|d| d.trim_end_matches('.'))
                    .filter(|d| !d.is_empty())
                    .map(str::to_string);
            }
            "nameserver" => {
                if let Some(addr) = words.next() {
                    if is_ipv4_address(addr) {
                        config.nameservers.push(addr.to_string());
                    } else {
                        config.rejected.push(addr.to_string());
                    }
                }
            }
            _ => {}
        }
    }
    config
}

/// DHCPv4 can only hand out IPv4 name servers.
fn is_ipv4_address(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}
