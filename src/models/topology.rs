use serde::Serialize;

use super::{EsxHost, IscsiServer, Network, NfsServer, OvfVm, VirtualCenter, Worker};

/// Version of the testbed spec format consumed by the deployment driver
pub const SPEC_VERSION: u32 = 3;

/// Topology is the full testbed descriptor handed to the deployment driver.
/// Field order matches the key order the driver's specs have always used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Topology {
    pub name: String,
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Vec<Network>>,
    pub esx: Vec<EsxHost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi: Option<Vec<IscsiServer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nfs: Option<Vec<NfsServer>>,
    #[serde(rename = "ovfVm", skip_serializing_if = "Option::is_none")]
    pub ovf_vm: Option<Vec<OvfVm>>,
    pub vcs: Vec<VirtualCenter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker: Option<Vec<Worker>>,
}

impl Topology {
    /// Late merge of the worker collection. Applied once to a base descriptor;
    /// applying it twice duplicates the worker.
    pub fn with_worker(mut self, static_ip_enabled: bool) -> Self {
        if static_ip_enabled {
            self.worker
                .get_or_insert_with(Vec::new)
                .push(Worker::static_ip());
        }
        self
    }
}
