//! Content of the files the provisioner materializes.
//!
//! Every renderer is a pure function of configuration (and, for the DHCP
//! daemon, resolved host facts), so identical inputs produce byte-identical
//! output and the file materializer can skip unchanged files.

use kitchen_common::{NetworkTopology, ZoneTemplate};

/// Live host facts the DHCP configuration is generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFacts {
    pub domain_name: String,
    pub name_servers: Vec<String>,
}

/// `/etc/ipf/ipnat.conf`: map the private subnet out through the external link.
#[must_use]
pub fn ipnat_conf(net: &NetworkTopology) -> String {
    format!(
        "map {} {} -> 0/32 portmap tcp/udp auto\n",
        net.external_link,
        net.subnet_cidr()
    )
}

/// `/etc/inet/dhcpd4.conf` for ISC dhcpd.
///
/// The `domain-name-servers` option is left out entirely when the host has
/// no name servers, since dhcpd rejects an empty list.
#[must_use]
pub fn dhcpd_conf(net: &NetworkTopology, facts: &HostFacts) -> String {
    let name_servers = if facts.name_servers.is_empty() {
        String::new()
    } else {
        format!(
            "option domain-name-servers {};\n",
            facts.name_servers.join(" ")
        )
    };
    format!(
        "option domain-name \"{domain}\";\n\
         {name_servers}\
         \n\
         default-lease-time 86400;\n\
         max-lease-time -1;\n\
         \n\
         log-facility local7;\n\
         \n\
         subnet {network} netmask {netmask} {{\n\
         \x20 range {start} {end};\n\
         \x20 option routers {gateway};\n\
         \x20 option broadcast-address {broadcast};\n\
         }}\n",
        domain = dhcpd_escape(&facts.domain_name),
        network = net.network(),
        netmask = net.netmask(),
        start = net.dhcp_range_start,
        end = net.dhcp_range_end,
        gateway = net.gateway,
        broadcast = net.broadcast(),
    )
}

/// Escape a value for a double-quoted dhcpd string.
fn dhcpd_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// zonecfg command file for the template zone: exclusive-IP, one anet on the
/// etherstub with an automatic MAC and MAC anti-spoofing.
#[must_use]
pub fn zone_profile(zone: &ZoneTemplate, net: &NetworkTopology) -> String {
    format!(
        "create -b\n\
         set brand={brand}\n\
         set zonepath={zonepath}\n\
         set autoboot=false\n\
         set ip-type=exclusive\n\
         add anet\n\
         set linkname={linkname}\n\
         set lower-link={stub}\n\
         set mac-address=auto\n\
         set link-protection=mac-nospoof\n\
         end\n\
         commit\n",
        brand = zone.brand,
        zonepath = zone.zonepath.display(),
        linkname = zone.anet_linkname,
        stub = net.etherstub,
    )
}

/// System configuration profile passed to `zoneadm install -c`.
#[must_use]
pub fn sysconfig_manifest(zone: &ZoneTemplate) -> String {
    format!(
        r#"<?xml version="1.0" encoding="US-ASCII"?>
<!DOCTYPE service_bundle SYSTEM "/usr/share/lib/xml/dtd/service_bundle.dtd.1">
<service_bundle type="profile" name="sysconfig">
  <service version="1" type="service" name="system/identity">
    <instance enabled="true" name="node">
      <property_group type="application" name="config">
        <propval type="astring" name="nodename" value="{hostname}"/>
      </property_group>
    </instance>
  </service>
  <service version="1" type="service" name="network/physical">
    <instance enabled="true" name="default">
      <property_group type="application" name="netcfg">
        <propval type="astring" name="active_ncp" value="Automatic"/>
      </property_group>
    </instance>
  </service>
  <service version="1" type="service" name="system/name-service/switch">
    <property_group type="application" name="config">
      <propval type="astring" name="default" value="files"/>
    </property_group>
    <instance enabled="true" name="default"/>
  </service>
  <service version="1" type="service" name="system/name-service/cache">
    <instance enabled="true" name="default"/>
  </service>
  <service version="1" type="service" name="network/dns/client">
    <instance enabled="false" name="default"/>
  </service>
  <service version="1" type="service" name="system/timezone">
    <instance enabled="true" name="default">
      <property_group type="application" name="timezone">
        <propval type="astring" name="localtime" value="{timezone}"/>
      </property_group>
    </instance>
  </service>
  <service version="1" type="service" name="system/environment">
    <instance enabled="true" name="init">
      <property_group type="application" name="environment">
        <propval type="astring" name="LANG" value="{locale}"/>
      </property_group>
    </instance>
  </service>
  <service version="1" type="service" name="system/config-user">
    <instance enabled="true" name="default">
      <property_group type="application" name="root_account">
        <propval type="astring" name="login" value="root"/>
        <propval type="astring" name="password" value=""/>
        <propval type="astring" name="type" value="role"/>
      </property_group>
    </instance>
  </service>
</service_bundle>
"#,
        hostname = xml_escape(&zone.hostname),
        timezone = xml_escape(&zone.timezone),
        locale = xml_escape(&zone.locale),
    )
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
