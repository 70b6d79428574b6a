//! Resolution of the live host facts generated content depends on.

use tracing::debug;

use crate::application::ports::FactProvider;
use crate::domain::{FactError, HostFacts};

/// Ask the fact provider for everything the DHCP configuration needs.
///
/// # Errors
///
/// Returns an error if the resolver configuration cannot be read.
pub fn gather(provider: &impl FactProvider) -> Result<HostFacts, FactError> {
    let facts = HostFacts {
        domain_name: provider.domain_name()?,
        name_servers: provider.name_servers()?,
    };
    debug!(domain = %facts.domain_name, name_servers = ?facts.name_servers, "host facts");
    Ok(facts)
}
