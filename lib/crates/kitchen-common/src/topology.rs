use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems found when checking a topology for internal consistency.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("prefix length /{0} is out of range (expected 1..=30)")]
    PrefixOutOfRange(u8),

    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },

    #[error("{field} {addr} is outside the subnet {subnet}")]
    OutsideSubnet {
        field: &'static str,
        addr: Ipv4Addr,
        subnet: String,
    },

    #[error("DHCP range start {start} is after range end {end}")]
    InvertedRange { start: Ipv4Addr, end: Ipv4Addr },

    #[error("gateway {0} falls inside the DHCP range")]
    GatewayInRange(Ipv4Addr),

    #[error("{field} {addr} is the network or broadcast address")]
    ReservedAddress { field: &'static str, addr: Ipv4Addr },
}

/// The private NAT network that feeds the template zone.
///
/// Defaults: etherstub `stub0`, VNIC `vnic0` routed out through `net0`,
/// gateway `192.168.0.1/24` and a DHCP pool of `192.168.0.100`–`192.168.0.120`.
/// Netmask, network and broadcast addresses are derived from the gateway and
/// prefix length rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkTopology {
    /// Virtual switch with no physical backing.
    pub etherstub: String,
    /// VNIC created over the etherstub; carries the gateway address.
    pub vnic: String,
    /// Physical link the NAT rule maps traffic out of.
    pub external_link: String,
    /// Gateway address assigned to the VNIC.
    pub gateway: Ipv4Addr,
    /// Prefix length of the private subnet.
    pub prefix_len: u8,
    /// First address handed out by the DHCP server.
    pub dhcp_range_start: Ipv4Addr,
    /// Last address handed out by the DHCP server.
    pub dhcp_range_end: Ipv4Addr,
}

impl Default for NetworkTopology {
    fn default() -> Self {
        Self {
            etherstub: "stub0".to_string(),
            vnic: "vnic0".to_string(),
            external_link: "net0".to_string(),
            gateway: Ipv4Addr::new(192, 168, 0, 1),
            prefix_len: 24,
            dhcp_range_start: Ipv4Addr::new(192, 168, 0, 100),
            dhcp_range_end: Ipv4Addr::new(192, 168, 0, 120),
        }
    }
}

impl NetworkTopology {
    fn mask_bits(&self) -> u32 {
        u32::MAX
            .checked_shl(32u32.saturating_sub(u32::from(self.prefix_len)))
            .unwrap_or(0)
    }

    /// Dotted-quad netmask, e.g. `255.255.255.0`.
    #[must_use]
    pub fn netmask(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.mask_bits())
    }

    /// Network address of the subnet, e.g. `192.168.0.0`.
    #[must_use]
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.gateway) & self.mask_bits())
    }

    /// Broadcast address of the subnet, e.g. `192.168.0.255`.
    #[must_use]
    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.network()) | !self.mask_bits())
    }

    /// Gateway in CIDR notation, as passed to `ipadm create-addr`.
    #[must_use]
    pub fn gateway_cidr(&self) -> String {
        format!("{}/{}", self.gateway, self.prefix_len)
    }

    /// Subnet in CIDR notation, as used by the NAT rule.
    #[must_use]
    pub fn subnet_cidr(&self) -> String {
        format!("{}/{}", self.network(), self.prefix_len)
    }

    /// `ipadm` address object name for the gateway address.
    #[must_use]
    pub fn address_object(&self) -> String {
        format!("{}/v4", self.vnic)
    }

    /// Whether `addr` lies inside the subnet (network and broadcast included).
    #[must_use]
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & self.mask_bits() == u32::from(self.network())
    }

    /// Check the topology for internal consistency.
    pub fn validate(&self) -> Result<(), TopologyError> {
        if !(1..=30).contains(&self.prefix_len) {
            return Err(TopologyError::PrefixOutOfRange(self.prefix_len));
        }
        for (field, name) in [
            ("etherstub", &self.etherstub),
            ("vnic", &self.vnic),
            ("external_link", &self.external_link),
        ] {
            if name.trim().is_empty() {
                return Err(TopologyError::EmptyName { field });
            }
        }
        for (field, addr) in [
            ("dhcp_range_start", self.dhcp_range_start),
            ("dhcp_range_end", self.dhcp_range_end),
        ] {
            if !self.contains(addr) {
                return Err(TopologyError::OutsideSubnet {
                    field,
                    addr,
                    subnet: self.subnet_cidr(),
                });
            }
        }
        for (field, addr) in [
            ("gateway", self.gateway),
            ("dhcp_range_start", self.dhcp_range_start),
            ("dhcp_range_end", self.dhcp_range_end),
        ] {
            if addr == self.network() || addr == self.broadcast() {
                return Err(TopologyError::ReservedAddress { field, addr });
            }
        }
        if u32::from(self.dhcp_range_start) > u32::from(self.dhcp_range_end) {
            return Err(TopologyError::InvertedRange {
                start: self.dhcp_range_start,
                end: self.dhcp_range_end,
            });
        }
        let gw = u32::from(self.gateway);
        if (u32::from(self.dhcp_range_start)..=u32::from(self.dhcp_range_end)).contains(&gw) {
            return Err(TopologyError::GatewayInRange(self.gateway));
        }
        Ok(())
    }
}
