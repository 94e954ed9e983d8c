// ── WAN topology transform ──
//
// Rewrites a fetched `deviceSettings` document so the edge's interfaces
// line up with the cloud template: LAN network 0 becomes a /30 link to the
// hosting network, the LAN-facing interface stops participating in the
// overlay, and two WAN-facing interfaces are put in front of it.

use std::net::Ipv4Addr;

use tracing::{debug, warn};

use crate::config::{FirstWanRole, InterfaceLayout};
use crate::device_settings::{DeviceSettingsData, LanNetwork, RoutedInterface, WanOverlay};
use crate::error::CoreError;

/// Prefix length of the point-to-point LAN link.
pub const LAN_LINK_PREFIX: u8 = 30;
/// Netmask matching [`LAN_LINK_PREFIX`].
pub const LAN_LINK_NETMASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 252);

/// Settings bundle applied to a routed interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceRole {
    /// Private LAN side: advertised, no NAT, no overlay.
    Lan,
    /// Internet-facing uplink that discovers overlay peers automatically.
    PublicWan,
    /// Uplink with NAT and no overlay.
    Underlay,
}

impl InterfaceRole {
    pub fn apply(self, iface: &mut RoutedInterface) {
        let (advertise, nat_direct, overlay) = match self {
            Self::Lan => (true, false, WanOverlay::Disabled),
            Self::PublicWan => (false, true, WanOverlay::AutoDiscovered),
            Self::Underlay => (false, true, WanOverlay::Disabled),
        };
        iface.set("override", true);
        iface.set("advertise", advertise);
        iface.set("natDirect", nat_direct);
        iface.set_wan_overlay(overlay);
    }
}

impl LanNetwork {
    /// Turn this network into the /30 point-to-point link.
    fn make_point_to_point(&mut self, address: Ipv4Addr) {
        self.set("cidrIp", address.to_string());
        self.set("cidrPrefix", LAN_LINK_PREFIX);
        self.set("netmask", LAN_LINK_NETMASK.to_string());
        self.set("advertise", false);
        self.disable_dhcp();
    }
}

/// Apply the cloud WAN topology to a device settings document.
///
/// The input is only read; the rewritten document is returned as a new
/// value. Structural problems are reported before anything is edited.
///
/// After a successful call:
/// - `lan.networks[0]` is a /30 with DHCP off and advertisement off;
/// - every interface named `layout.lan_interface` has the LAN role;
/// - `routedInterfaces` starts with the two `layout.wan_interfaces`,
///   copied from the LAN interface, the second one set to discover the
///   overlay automatically, followed by the existing entries in order.
pub fn apply_wan_topology(
    doc: &DeviceSettingsData,
    layout: &InterfaceLayout,
) -> Result<DeviceSettingsData, CoreError> {
    layout.validate()?;

    if doc.lan.networks.is_empty() {
        return Err(CoreError::malformed("lan.networks is empty"));
    }
    if !doc
        .routed_interfaces
        .iter()
        .any(|i| i.name() == layout.lan_interface)
    {
        return Err(CoreError::malformed(format!(
            "routedInterfaces has no {} entry (found: {})",
            layout.lan_interface,
            doc.interface_names().join(", ")
        )));
    }

    let mut out = doc.clone();

    if let Some(network) = out.lan.networks.first_mut() {
        network.make_point_to_point(layout.lan_address);
    }

    let mut existing = std::mem::take(&mut out.routed_interfaces);
    let mut lan_entry = None;
    for iface in existing
        .iter_mut()
        .filter(|i| i.name() == layout.lan_interface)
    {
        InterfaceRole::Lan.apply(iface);
        lan_entry.get_or_insert_with(|| iface.clone());
    }
    let lan_entry =
        lan_entry.ok_or_else(|| CoreError::malformed("LAN-facing interface disappeared"))?;

    let [first_name, second_name] = &layout.wan_interfaces;

    let mut first = lan_entry.clone();
    first.set_name(first_name);
    match layout.first_wan_role {
        FirstWanRole::MirrorLan => warn!(
            interface = %first_name,
            "first WAN interface keeps the LAN-facing settings"
        ),
        FirstWanRole::Underlay => InterfaceRole::Underlay.apply(&mut first),
    }

    let mut second = lan_entry;
    second.set_name(second_name);
    InterfaceRole::PublicWan.apply(&mut second);

    out.routed_interfaces = [first, second].into_iter().chain(existing).collect();

    debug!(
        interfaces = ?out.interface_names(),
        "applied WAN topology"
    );
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;

    fn doc(value: Value) -> DeviceSettingsData {
        serde_json::from_value(value).unwrap()
    }

    fn single_lan_doc() -> DeviceSettingsData {
        doc(json!({
            "lan": {
                "networks": [{
                    "name": "Corporate",
                    "cidrIp": "10.0.1.1",
                    "cidrPrefix": 24,
                    "netmask": "255.255.255.0",
                    "advertise": true,
                    "dhcp": { "enabled": true, "leaseTimeSeconds": 86400 }
                }]
            },
            "routedInterfaces": [{
                "name": "GE3",
                "wanOverlay": null,
                "addressing": { "type": "DHCP", "cidrIp": null }
            }],
            "ha": { "enabled": false }
        }))
    }

    #[test]
    fn single_interface_scenario() {
        let out = apply_wan_topology(&single_lan_doc(), &InterfaceLayout::default()).unwrap();

        assert_eq!(out.interface_names(), vec!["GE1", "GE2", "GE3"]);
        assert_eq!(
            out.routed_interfaces[1].wan_overlay(),
            Some(WanOverlay::AutoDiscovered)
        );
        assert_eq!(out.routed_interfaces[2].wan_overlay(), Some(WanOverlay::Disabled));
    }

    #[test]
    fn lan_network_becomes_point_to_point() {
        let out = apply_wan_topology(&single_lan_doc(), &InterfaceLayout::default()).unwrap();
        let net = &out.lan.networks[0];

        assert_eq!(net.cidr_ip(), Some("127.0.0.10"));
        assert_eq!(net.cidr_prefix(), Some(30));
        assert_eq!(net.netmask(), Some("255.255.255.252"));
        assert_eq!(net.advertise(), Some(false));
        assert_eq!(
            net.get("dhcp"),
            Some(&json!({ "enabled": false, "leaseTimeSeconds": 86400 }))
        );
        assert_eq!(net.get("name"), Some(&json!("Corporate")));
    }

    #[test]
    fn missing_dhcp_block_is_created_disabled() {
        let input = doc(json!({
            "lan": { "networks": [{ "cidrIp": "10.0.1.1" }] },
            "routedInterfaces": [{ "name": "GE3" }]
        }));
        let out = apply_wan_topology(&input, &InterfaceLayout::default()).unwrap();
        assert_eq!(out.lan.networks[0].dhcp_enabled(), Some(false));
    }

    #[test]
    fn interface_roles() {
        let out = apply_wan_topology(&single_lan_doc(), &InterfaceLayout::default()).unwrap();
        let [ge1, ge2, ge3] = &out.routed_interfaces[..] else {
            panic!("expected three interfaces");
        };

        assert_eq!(ge3.override_enabled(), Some(true));
        assert_eq!(ge3.advertise(), Some(true));
        assert_eq!(ge3.nat_direct(), Some(false));

        assert_eq!(ge2.override_enabled(), Some(true));
        assert_eq!(ge2.advertise(), Some(false));
        assert_eq!(ge2.nat_direct(), Some(true));

        // GE1 mirrors the LAN interface under the default layout.
        assert_eq!(ge1.advertise(), ge3.advertise());
        assert_eq!(ge1.nat_direct(), ge3.nat_direct());
        assert_eq!(ge1.wan_overlay(), Some(WanOverlay::Disabled));
    }

    #[test]
    fn new_interfaces_inherit_nested_records() {
        let out = apply_wan_topology(&single_lan_doc(), &InterfaceLayout::default()).unwrap();
        for iface in &out.routed_interfaces {
            assert_eq!(
                iface.get("addressing"),
                Some(&json!({ "type": "DHCP", "cidrIp": null }))
            );
        }
    }

    #[test]
    fn underlay_role_corrects_first_wan() {
        let layout = InterfaceLayout {
            first_wan_role: FirstWanRole::Underlay,
            ..InterfaceLayout::default()
        };
        let out = apply_wan_topology(&single_lan_doc(), &layout).unwrap();
        let ge1 = &out.routed_interfaces[0];

        assert_eq!(ge1.name(), "GE1");
        assert_eq!(ge1.advertise(), Some(false));
        assert_eq!(ge1.nat_direct(), Some(true));
        assert_eq!(ge1.wan_overlay(), Some(WanOverlay::Disabled));
    }

    #[test]
    fn existing_interfaces_keep_order_after_prefix() {
        let input = doc(json!({
            "lan": { "networks": [{}, { "cidrIp": "10.9.0.1" }] },
            "routedInterfaces": [
                { "name": "GE4", "disabled": true },
                { "name": "GE3" },
                { "name": "GE5", "wanOverlay": "USER_DEFINED" }
            ]
        }));
        let before = input.routed_interfaces.len();

        let out = apply_wan_topology(&input, &InterfaceLayout::default()).unwrap();

        assert_eq!(out.routed_interfaces.len(), before + 2);
        assert_eq!(out.interface_names(), vec!["GE1", "GE2", "GE4", "GE3", "GE5"]);
        assert_eq!(out.routed_interfaces[2], input.routed_interfaces[0]);
        assert_eq!(out.routed_interfaces[4], input.routed_interfaces[2]);
        assert_eq!(out.lan.networks[1], input.lan.networks[1]);
        // Copies come from the LAN interface, not from the first entry.
        assert_eq!(out.routed_interfaces[0].get("disabled"), None);
    }

    #[test]
    fn fields_outside_the_edit_are_untouched() {
        let input = single_lan_doc();
        let out = apply_wan_topology(&input, &InterfaceLayout::default()).unwrap();
        assert_eq!(out.extra, input.extra);
        assert_eq!(out.lan.extra, input.lan.extra);
    }

    #[test]
    fn untouched_entries_are_written_back_verbatim() {
        let untouched_network = json!({
            "cidrIp": null,
            "cidrPrefix": "24",
            "netmask": null,
            "advertise": null,
            "dhcp": null
        });
        let untouched_iface = json!({
            "name": "GE4",
            "advertise": null,
            "natDirect": null,
            "disabled": null,
            "addressing": null,
            "wanOverlay": null
        });
        let input = doc(json!({
            "lan": { "networks": [
                { "cidrIp": "10.0.1.1", "cidrPrefix": "24", "vlanId": null, "dhcp": null },
                untouched_network
            ]},
            "routedInterfaces": [
                { "name": "GE3", "disabled": null, "l2": { "mtu": null }, "addressing": null },
                untouched_iface
            ]
        }));

        let value = apply_wan_topology(&input, &InterfaceLayout::default())
            .unwrap()
            .to_value()
            .unwrap();

        assert_eq!(value["lan"]["networks"][1], untouched_network);
        assert_eq!(value["routedInterfaces"][3], untouched_iface);

        let net0 = &value["lan"]["networks"][0];
        assert_eq!(net0["vlanId"], Value::Null);
        assert_eq!(net0["cidrPrefix"], json!(30));
        assert_eq!(net0["dhcp"], json!({ "enabled": false }));

        for iface in value["routedInterfaces"].as_array().unwrap().iter().take(3) {
            let iface = iface.as_object().unwrap();
            assert_eq!(iface.get("disabled"), Some(&Value::Null));
            assert_eq!(iface.get("addressing"), Some(&Value::Null));
            assert_eq!(iface.get("l2"), Some(&json!({ "mtu": null })));
        }
    }

    #[test]
    fn missing_lan_interface_fails_without_mutation() {
        let input = doc(json!({
            "lan": { "networks": [{ "cidrIp": "10.0.1.1", "cidrPrefix": 24 }] },
            "routedInterfaces": [{ "name": "GE4" }]
        }));
        let snapshot = input.clone();

        let err = apply_wan_topology(&input, &InterfaceLayout::default()).unwrap_err();

        assert!(matches!(
            err,
            CoreError::MalformedConfigurationDocument { .. }
        ));
        assert!(err.to_string().contains("GE3"));
        assert_eq!(input, snapshot);
    }

    #[test]
    fn empty_lan_networks_fails() {
        let input = doc(json!({
            "lan": { "networks": [] },
            "routedInterfaces": [{ "name": "GE3" }]
        }));
        let err = apply_wan_topology(&input, &InterfaceLayout::default()).unwrap_err();
        assert!(err.to_string().contains("lan.networks is empty"));
    }

    #[test]
    fn custom_layout_names() {
        let layout = InterfaceLayout {
            lan_interface: "GE4".into(),
            wan_interfaces: ["GE1".into(), "GE3".into()],
            lan_address: Ipv4Addr::new(172, 16, 0, 2),
            first_wan_role: FirstWanRole::MirrorLan,
        };
        let input = doc(json!({
            "lan": { "networks": [{}] },
            "routedInterfaces": [{ "name": "GE4" }]
        }));

        let out = apply_wan_topology(&input, &layout).unwrap();

        assert_eq!(out.interface_names(), vec!["GE1", "GE3", "GE4"]);
        assert_eq!(out.lan.networks[0].cidr_ip(), Some("172.16.0.2"));
    }

    #[test]
    fn output_serializes_prefix_as_number() {
        let out = apply_wan_topology(&single_lan_doc(), &InterfaceLayout::default()).unwrap();
        let value = out.to_value().unwrap();
        assert_eq!(value["lan"]["networks"][0]["cidrPrefix"], json!(30));
        assert_eq!(value["routedInterfaces"][1]["wanOverlay"], "AUTO_DISCOVERED");
        assert_eq!(value["routedInterfaces"][0]["override"], true);
    }
}
