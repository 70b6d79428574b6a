//! The fixed provisioning pipeline, expressed as data.
//!
//! Each function returns the steps of one stage for the given configuration.
//! Steps are built fresh on every run so a run is a function of the current
//! host state plus configuration.

use crate::domain::config::KitchenConfig;
use crate::domain::step::{
    Action, CommandSpec, FileSpec, PropertySpec, ServiceSpec, Stage, Step, shell_quote,
};
use crate::domain::templates::{self, HostFacts};

pub const IPFILTER_FMRI: &str = "svc:/network/ipfilter:default";
pub const DHCP_SERVER_FMRI: &str = "svc:/network/dhcp/server:ipv4";
pub const DHCP_LISTEN_PROPERTY: &str = "config/listen_ifnames";

/// Stage 1: etherstub, VNIC over it, static gateway address on the VNIC.
#[must_use]
pub fn network_steps(config: &KitchenConfig) -> Vec<Step> {
    let net = &config.network;
    let stub = shell_quote(&net.etherstub);
    let vnic = shell_quote(&net.vnic);
    vec![
        Step::new(
            format!("create etherstub {}", net.etherstub),
            Action::Command(
                CommandSpec::new(format!("dladm create-etherstub {stub}"))
                    .unless(format!("dladm show-etherstub {stub}")),
            ),
        ),
        Step::new(
            format!("create vnic {}", net.vnic),
            Action::Command(
                CommandSpec::new(format!("dladm create-vnic -l {stub} {vnic}"))
                    .unless(format!("dladm show-link {vnic}")),
            ),
        ),
        Step::new(
            format!("assign {} to {}", net.gateway_cidr(), net.vnic),
            Action::Command(
                CommandSpec::new(format!(
                    "ipadm create-ip {vnic} && ipadm create-addr -T static -a {} {}",
                    net.gateway_cidr(),
                    shell_quote(&net.address_object())
                ))
                .unless(format!("ipadm show-addr {vnic}")),
            ),
        ),
    ]
}

/// Stage 2: NAT rule, IPv4 forwarding, IP filter service.
///
/// The forwarding toggle has no guard and is re-issued on every run;
/// `ipadm set-prop` with an unchanged value is harmless.
#[must_use]
pub fn nat_steps(config: &KitchenConfig) -> Vec<Step> {
    vec![
        Step::new(
            format!("write {}", config.paths.ipnat_conf.display()),
            Action::File(FileSpec::new(
                &config.paths.ipnat_conf,
                templates::ipnat_conf(&config.network),
            )),
        ),
        Step::new(
            "enable ipv4 forwarding",
            Action::Command(CommandSpec::new("ipadm set-prop -p forwarding=on ipv4")),
        ),
        Step::new(
            "enable ipfilter",
            Action::EnableService(ServiceSpec::new(IPFILTER_FMRI)),
        ),
    ]
}

/// Stage 3: DHCP daemon configuration, listen interface, DHCP service.
#[must_use]
pub fn dhcpd_steps(config: &KitchenConfig, facts: &HostFacts) -> Vec<Step> {
    vec![
        Step::new(
            format!("write {}", config.paths.dhcpd_conf.display()),
            Action::File(FileSpec::new(
                &config.paths.dhcpd_conf,
                templates::dhcpd_conf(&config.network, facts),
            )),
        ),
        Step::new(
            format!("listen on {}", config.network.vnic),
            Action::SetProperty(PropertySpec::new(
                DHCP_SERVER_FMRI,
                DHCP_LISTEN_PROPERTY,
                &config.network.vnic,
            )),
        ),
        Step::new(
            "enable dhcp server",
            Action::EnableService(ServiceSpec::new(DHCP_SERVER_FMRI)),
        ),
    ]
}

/// Stage 4: zonecfg profile, sysconfig manifest, configure-and-install.
///
/// The install is guarded by the zone path rather than a command, and its
/// output is streamed because it runs for minutes.
#[must_use]
pub fn zone_steps(config: &KitchenConfig) -> Vec<Step> {
    let zone = &config.zone;
    let name = shell_quote(&zone.name);
    let profile = zone.profile_path.display().to_string();
    let manifest = zone.manifest_path.display().to_string();
    vec![
        Step::new(
            format!("write {profile}"),
            Action::File(FileSpec::new(
                &zone.profile_path,
                templates::zone_profile(zone, &config.network),
            )),
        ),
        Step::new(
            format!("write {manifest}"),
            Action::File(
                FileSpec::new(&zone.manifest_path, templates::sysconfig_manifest(zone))
                    .with_mode(0o600),
            ),
        ),
        Step::new(
            format!("install zone {}", zone.name),
            Action::Command(
                CommandSpec::new(format!(
                    "zonecfg -z {name} -f {} && zoneadm -z {name} install -c {}",
                    shell_quote(&profile),
                    shell_quote(&manifest)
                ))
                .unless_exists(&zone.zonepath)
                .streamed(),
            ),
        ),
    ]
}

/// Whether building `stage` needs live host facts.
#[must_use]
pub fn needs_facts(stage: Stage) -> bool {
    stage == Stage::ConfigureDhcpd
}
