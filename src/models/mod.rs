mod topology;

pub use topology::{Topology, SPEC_VERSION};

use std::fmt;

use serde::{Serialize, Serializer};

/// Canonical NIC model names understood by the deployment driver
pub mod nic_type {
    pub const VMXNET3: &str = "vmxnet3";
}

/// Canonical fixed entity names
pub mod entity_name {
    pub const VCENTER: &str = "vc.0";
    pub const MANAGED_NETWORK: &str = "net.0";
    pub const APPLIANCE: &str = "avi-controller";
    pub const WORKER: &str = "worker.0";
}

/// How an ESX host is installed by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InstallStyle {
    FullInstall,
}

/// Flavour of the vCenter deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VcType {
    Vcva,
}

/// EsxHost is one nested hypervisor. The storage attachment fields are only
/// present for the topology kinds that use them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EsxHost {
    pub name: String,
    pub vc: String,
    pub dc: String,
    pub cluster_name: String,
    pub style: InstallStyle,
    pub cpus: u32,
    #[serde(rename = "memory")]
    pub memory_mb: u32,
    #[serde(rename = "disk")]
    pub disks: Vec<u64>,
    #[serde(rename = "iScsi", skip_serializing_if = "Option::is_none")]
    pub iscsi_targets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_nfs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_nfs_with_path: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_datastore_name_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_datastore_name_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_local_luns: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssd: Option<Vec<u64>>,
}

/// IscsiServer is the software iSCSI target VM backing the shared datastore
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IscsiServer {
    pub name: String,
    pub luns: Vec<u64>,
    /// Identifier generation mode; the driver derives the actual IQN from it.
    pub iqn_random: String,
    pub ram_backed: u32,
    pub cpus: u32,
    pub memory: u32,
    pub memory_reservation: u32,
    pub nic_type: Vec<String>,
}

/// NfsServer exports the shared datastore mounted by every host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NfsServer {
    pub name: String,
    pub disk: Vec<u64>,
    pub mount_point: String,
    pub cpu_reservation: u32,
    pub memory_reservation: u32,
}

/// Network is a driver-managed network the appliance can attach to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub name: String,
    pub enable_dhcp: bool,
}

/// Where one appliance NIC is plugged in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkAttachment {
    ForcePublic,
    Public,
    /// A driver-managed network, by name
    Nsx(String),
}

impl fmt::Display for NetworkAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkAttachment::ForcePublic => f.write_str("force_public"),
            NetworkAttachment::Public => f.write_str("public"),
            NetworkAttachment::Nsx(network) => write!(f, "nsx::{}", network),
        }
    }
}

impl Serialize for NetworkAttachment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// OvfVm is the appliance deployed from an OVA image. `nic_type` and
/// `network` are parallel lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OvfVm {
    pub name: String,
    pub ovf_url: String,
    pub nics: u32,
    pub cpus: u32,
    pub memory: u32,
    pub nic_type: Vec<String>,
    pub network: Vec<NetworkAttachment>,
}

/// Cluster inside the vCenter. Exactly one of `enable_ha` / `vsan` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub name: String,
    pub dc: String,
    pub enable_drs: bool,
    #[serde(rename = "enableHA", skip_serializing_if = "Option::is_none")]
    pub enable_ha: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vsan: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualCenter {
    pub name: String,
    #[serde(rename = "type")]
    pub vc_type: VcType,
    pub dc_name: Vec<String>,
    pub clusters: Vec<Cluster>,
}

/// Worker runs driver-side services for the testbed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub name: String,
    pub enable_static_ip_service: bool,
}

impl Worker {
    /// The worker that turns on the static IP server
    pub fn static_ip() -> Self {
        Self {
            name: entity_name::WORKER.to_string(),
            enable_static_ip_service: true,
        }
    }
}
