pub mod args;
pub mod hosts;
mod profiles;

use std::fmt;

use clap::ValueEnum;

use crate::models::{
    entity_name, nic_type, Cluster, IscsiServer, Network, NetworkAttachment, NfsServer, OvfVm,
    Topology, VcType, VirtualCenter, SPEC_VERSION,
};

use self::args::Options;
use self::hosts::{generate_hosts, HostTemplate};

pub use self::profiles::BUILTIN_CONTROLLER_OVF_URL;

/// Testbed scenario selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TopologyKind {
    /// Shared iSCSI datastore, appliance from the built-in image
    Iscsi,
    /// Shared iSCSI datastore, appliance image from `avi_controller_ovf_url`
    IscsiOvf,
    /// Shared NFS datastore
    Nfs,
    /// vSAN cluster, appliance image from `avi_controller_ovf_url`
    Vsan,
    /// Local datastores only
    Local,
}

impl TopologyKind {
    #[cfg(test)]
    pub const ALL: &'static [TopologyKind] = &[
        TopologyKind::Iscsi,
        TopologyKind::IscsiOvf,
        TopologyKind::Nfs,
        TopologyKind::Vsan,
        TopologyKind::Local,
    ];

    /// Whether the `avi_controller_ovf_url` argument means anything for this kind
    pub fn accepts_ovf_url(self) -> bool {
        matches!(self, TopologyKind::IscsiOvf | TopologyKind::Vsan)
    }

    pub fn profile(self) -> StorageProfile {
        match self {
            TopologyKind::Iscsi => StorageProfile::Iscsi {
                appliance: ApplianceSource::Builtin,
            },
            TopologyKind::IscsiOvf => StorageProfile::Iscsi {
                appliance: ApplianceSource::External,
            },
            TopologyKind::Nfs => StorageProfile::Nfs,
            TopologyKind::Vsan => StorageProfile::Vsan,
            TopologyKind::Local => StorageProfile::Local,
        }
    }
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{:?}", self),
        }
    }
}

/// Where the appliance OVA comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplianceSource {
    /// The controller image baked into the iSCSI scenario
    Builtin,
    /// Supplied per run via `avi_controller_ovf_url`, deployed over `net.0`
    External,
}

/// Storage layout of a scenario, carrying the kind-specific pieces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProfile {
    Iscsi { appliance: ApplianceSource },
    Nfs,
    Vsan,
    Local,
}

impl StorageProfile {
    fn name(self) -> &'static str {
        match self {
            StorageProfile::Iscsi { .. } => "tkg-iscsi-datastore",
            StorageProfile::Nfs => "tkg-nfs-datastore",
            StorageProfile::Vsan => "tkg-vsan-datastore",
            StorageProfile::Local => "tkg-local-datastore",
        }
    }

    fn appliance(self) -> Option<ApplianceSource> {
        match self {
            StorageProfile::Iscsi { appliance } => Some(appliance),
            StorageProfile::Vsan => Some(ApplianceSource::External),
            StorageProfile::Nfs | StorageProfile::Local => None,
        }
    }

    fn host_template(self) -> HostTemplate {
        match self {
            StorageProfile::Iscsi { .. } => profiles::iscsi_host(),
            StorageProfile::Nfs => profiles::nfs_host(),
            StorageProfile::Vsan => profiles::vsan_host(),
            StorageProfile::Local => profiles::local_host(),
        }
    }

    fn iscsi(self) -> Option<Vec<IscsiServer>> {
        matches!(self, StorageProfile::Iscsi { .. }).then(|| vec![profiles::iscsi_server()])
    }

    fn nfs(self) -> Option<Vec<NfsServer>> {
        matches!(self, StorageProfile::Nfs).then(|| vec![profiles::nfs_server()])
    }
}

/// TestbedBuilder assembles one base topology descriptor
#[derive(Debug, Clone)]
pub struct TestbedBuilder {
    profile: StorageProfile,
    num_hosts: usize,
    ovf_url: String,
}

impl TestbedBuilder {
    pub fn new(kind: TopologyKind) -> Self {
        Self {
            profile: kind.profile(),
            num_hosts: crate::config::DEFAULT_NUM_HOSTS,
            ovf_url: String::new(),
        }
    }

    pub fn hosts(mut self, num_hosts: usize) -> Self {
        self.num_hosts = num_hosts;
        self
    }

    pub fn options(mut self, opts: &Options) -> Self {
        self.ovf_url = opts.ovf_url().to_string();
        self
    }

    pub fn build(self) -> Topology {
        let template = self.profile.host_template();
        let appliance = self.profile.appliance();

        let network = (appliance == Some(ApplianceSource::External)).then(|| {
            vec![Network {
                name: entity_name::MANAGED_NETWORK.to_string(),
                enable_dhcp: true,
            }]
        });

        let ovf_vm = appliance.map(|source| vec![self.appliance_vm(source)]);

        Topology {
            name: self.profile.name().to_string(),
            version: SPEC_VERSION,
            network,
            esx: generate_hosts(self.num_hosts, &template),
            iscsi: self.profile.iscsi(),
            nfs: self.profile.nfs(),
            ovf_vm,
            vcs: vec![virtual_center(&template, self.profile == StorageProfile::Vsan)],
            worker: None,
        }
    }

    fn appliance_vm(&self, source: ApplianceSource) -> OvfVm {
        let (ovf_url, network) = match source {
            ApplianceSource::Builtin => (
                BUILTIN_CONTROLLER_OVF_URL.to_string(),
                vec![
                    NetworkAttachment::ForcePublic,
                    NetworkAttachment::Public,
                    NetworkAttachment::ForcePublic,
                    NetworkAttachment::ForcePublic,
                    NetworkAttachment::ForcePublic,
                ],
            ),
            ApplianceSource::External => {
                if self.ovf_url.is_empty() {
                    tracing::warn!(
                        "{} not set, {} will be deployed without an image URL",
                        args::AVI_CONTROLLER_OVF_URL,
                        entity_name::APPLIANCE
                    );
                }
                (
                    self.ovf_url.clone(),
                    vec![
                        NetworkAttachment::ForcePublic,
                        NetworkAttachment::Nsx(entity_name::MANAGED_NETWORK.to_string()),
                    ],
                )
            }
        };

        OvfVm {
            name: entity_name::APPLIANCE.to_string(),
            ovf_url,
            nics: 2,
            cpus: 4,
            memory: 8096,
            nic_type: vec![nic_type::VMXNET3.to_string(); network.len()],
            network,
        }
    }
}

/// The single vCenter with its single cluster, named after the host template
fn virtual_center(template: &HostTemplate, vsan: bool) -> VirtualCenter {
    let cluster = Cluster {
        name: template.cluster_name.clone(),
        dc: template.dc.clone(),
        enable_drs: true,
        enable_ha: (!vsan).then_some(true),
        vsan: vsan.then_some(true),
    };
    VirtualCenter {
        name: entity_name::VCENTER.to_string(),
        vc_type: VcType::Vcva,
        dc_name: vec![template.dc.clone()],
        clusters: vec![cluster],
    }
}

/// Build the complete testbed for one run: parse the raw arguments, assemble
/// the base topology and merge in the static IP worker when requested.
pub fn testbed<S: AsRef<str>>(kind: TopologyKind, num_hosts: usize, raw_args: &[S]) -> Topology {
    let opts = args::parse(raw_args, kind.accepts_ovf_url());
    tracing::debug!("Building {} testbed with {} hosts: {:?}", kind, num_hosts, opts);
    TestbedBuilder::new(kind)
        .hosts(num_hosts)
        .options(&opts)
        .build()
        .with_worker(opts.static_ip_enabled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GB;
    use serde_json::json;

    const NO_ARGS: &[&str] = &[];

    #[test]
    fn test_iscsi_default_scenario() {
        let topology = testbed(TopologyKind::Iscsi, 4, NO_ARGS);
        assert_eq!(topology.name, "tkg-iscsi-datastore");
        assert_eq!(topology.version, 3);
        assert_eq!(topology.esx.len(), 4);
        for host in &topology.esx {
            assert_eq!(host.disks, vec![24 * 1024 * 1024, 24 * 1024 * 1024]);
        }
        assert_eq!(topology.iscsi.as_ref().map(Vec::len), Some(1));
        assert!(topology.nfs.is_none());
        assert!(topology.network.is_none());
        assert!(topology.worker.is_none());

        let vm = &topology.ovf_vm.as_ref().unwrap()[0];
        assert_eq!(vm.ovf_url, BUILTIN_CONTROLLER_OVF_URL);
        assert_eq!(vm.nic_type.len(), 5);
        assert_eq!(vm.network.len(), 5);
    }

    #[test]
    fn test_iscsi_ignores_ovf_url_argument() {
        let topology = testbed(TopologyKind::Iscsi, 1, &["avi_controller_ovf_url:http://x/y.ova"]);
        assert_eq!(topology.ovf_vm.unwrap()[0].ovf_url, BUILTIN_CONTROLLER_OVF_URL);
    }

    #[test]
    fn test_iscsi_ovf_scenario() {
        let topology = testbed(TopologyKind::IscsiOvf, 2, &["avi_controller_ovf_url:http://x/y.ova"]);
        assert_eq!(topology.name, "tkg-iscsi-datastore");
        assert_eq!(topology.iscsi.as_ref().map(Vec::len), Some(1));
        let network = topology.network.unwrap();
        assert_eq!(network[0].name, "net.0");
        assert!(network[0].enable_dhcp);
        let vm = &topology.ovf_vm.unwrap()[0];
        assert_eq!(vm.ovf_url, "http://x/y.ova");
        assert_eq!(
            vm.network,
            vec![
                NetworkAttachment::ForcePublic,
                NetworkAttachment::Nsx("net.0".to_string())
            ]
        );
    }

    #[test]
    fn test_vsan_scenario() {
        let topology = testbed(
            TopologyKind::Vsan,
            4,
            &["static_ip_enabled:true", "avi_controller_ovf_url:http://x/y.ova"],
        );
        let value = serde_json::to_value(&topology).unwrap();
        assert_eq!(value["worker"], json!([{"name": "worker.0", "enableStaticIpService": true}]));
        assert_eq!(value["ovfVm"][0]["ovfUrl"], "http://x/y.ova");
        assert_eq!(value["network"], json!([{"name": "net.0", "enableDhcp": true}]));
        assert_eq!(
            value["vcs"][0]["clusters"][0],
            json!({"name": "cluster", "dc": "Datacenter", "enableDrs": true, "vsan": true})
        );
        assert_eq!(value["esx"][3]["ssd"], json!([100 * GB]));
        assert_eq!(value["esx"][3]["freeLocalLuns"], 1);
        assert!(value.get("iscsi").is_none());
    }

    #[test]
    fn test_vsan_without_url_keeps_empty_image() {
        let topology = testbed(TopologyKind::Vsan, 1, NO_ARGS);
        assert_eq!(topology.ovf_vm.unwrap()[0].ovf_url, "");
        assert!(topology.worker.is_none());
    }

    #[test]
    fn test_local_scenario() {
        let topology = testbed(TopologyKind::Local, 2, NO_ARGS);
        assert_eq!(topology.name, "tkg-local-datastore");
        assert_eq!(topology.esx.len(), 2);
        for host in &topology.esx {
            assert_eq!(host.disks, vec![1024 * 1024 * 1024, 1024 * 1024 * 1024]);
        }
        assert!(topology.iscsi.is_none());
        assert!(topology.nfs.is_none());
        assert!(topology.network.is_none());
        assert!(topology.ovf_vm.is_none());
    }

    #[test]
    fn test_nfs_scenario() {
        let topology = testbed(TopologyKind::Nfs, 1, &["static_ip_enabled:true"]);
        let value = serde_json::to_value(&topology).unwrap();
        assert_eq!(value["name"], "tkg-nfs-datastore");
        assert_eq!(
            value["esx"][0],
            json!({
                "name": "esx.0",
                "vc": "vc.0",
                "dc": "dc0",
                "clusterName": "cluster0",
                "style": "fullInstall",
                "cpus": 16,
                "memory": 65536,
                "disk": [24 * GB, 24 * GB],
                "mountNfs": ["nfs-server:/exports/NFS-Share"],
                "mountNfsWithPath": true,
                "localDatastoreNamePrefix": "local-datastore-",
                "sharedDatastoreNamePrefix": "shared-nfs-",
            })
        );
        assert_eq!(
            value["nfs"],
            json!([{
                "name": "nfs-server",
                "disk": [1024 * GB],
                "mountPoint": "NFS-Share",
                "cpuReservation": 2000,
                "memoryReservation": 1024,
            }])
        );
        assert_eq!(value["worker"][0]["name"], "worker.0");
        assert!(value.get("ovfVm").is_none());
    }

    #[test]
    fn test_iscsi_backend_shape() {
        let value = serde_json::to_value(testbed(TopologyKind::Iscsi, 0, NO_ARGS)).unwrap();
        assert_eq!(value["esx"], json!([]));
        assert_eq!(
            value["iscsi"],
            json!([{
                "name": "iscsi.0",
                "luns": [1024, 1024],
                "iqnRandom": "nimbus1",
                "ramBacked": 2,
                "cpus": 2,
                "memory": 4096,
                "memoryReservation": 4096,
                "nicType": ["vmxnet3"],
            }])
        );
        assert_eq!(
            value["vcs"],
            json!([{
                "name": "vc.0",
                "type": "vcva",
                "dcName": ["dc0"],
                "clusters": [{"name": "cluster0", "dc": "dc0", "enableDrs": true, "enableHA": true}],
            }])
        );
    }

    #[test]
    fn test_top_level_key_order() {
        let text = serde_json::to_string(&testbed(
            TopologyKind::IscsiOvf,
            1,
            &["static_ip_enabled:true"],
        ))
        .unwrap();
        let keys = [
            "\"name\":\"tkg", "\"version\"", "\"network\"", "\"esx\"", "\"iscsi\"", "\"ovfVm\"",
            "\"vcs\"", "\"worker\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| text.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", text);
    }

    #[test]
    fn test_output_is_deterministic() {
        for &kind in TopologyKind::ALL {
            let args = ["static_ip_enabled:true", "avi_controller_ovf_url:http://x/y.ova"];
            let a = serde_json::to_string(&testbed(kind, 3, &args)).unwrap();
            let b = serde_json::to_string(&testbed(kind, 3, &args)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_every_kind_has_one_vcenter_and_cluster() {
        for &kind in TopologyKind::ALL {
            let topology = testbed(kind, 2, NO_ARGS);
            assert_eq!(topology.vcs.len(), 1);
            assert_eq!(topology.vcs[0].clusters.len(), 1);
            let cluster = &topology.vcs[0].clusters[0];
            assert_eq!(topology.esx[0].cluster_name, cluster.name);
            assert_eq!(topology.esx[0].dc, cluster.dc);
            assert_ne!(cluster.enable_ha.is_some(), cluster.vsan.is_some());
        }
    }

    #[test]
    fn test_kind_display_matches_cli_name() {
        assert_eq!(TopologyKind::IscsiOvf.to_string(), "iscsi-ovf");
        assert_eq!(TopologyKind::Local.to_string(), "local");
    }
}
