// Literal per-scenario data. Values are what the deployment driver has
// always been fed for these testbeds; keep them as-is.

use crate::config::GB;
use crate::models::{nic_type, IscsiServer, NfsServer};

use super::hosts::{HostAttachment, HostTemplate};

/// Controller image deployed by the plain iSCSI scenario
pub const BUILTIN_CONTROLLER_OVF_URL: &str =
    "http://sc-dbc1105.eng.vmware.com/fangyuanl/images/controller-20.1.2-9171.ova";

const HOST_CPUS: u32 = 16;
const HOST_MEMORY_MB: u32 = 64 * 1024;

const ISCSI_SERVER: &str = "iscsi.0";
const NFS_SERVER: &str = "nfs-server";
const NFS_SHARE: &str = "NFS-Share";

fn host(dc: &str, cluster_name: &str, disks: Vec<u64>, attachment: HostAttachment) -> HostTemplate {
    HostTemplate {
        dc: dc.to_string(),
        cluster_name: cluster_name.to_string(),
        cpus: HOST_CPUS,
        memory_mb: HOST_MEMORY_MB,
        disks,
        attachment,
    }
}

pub(super) fn iscsi_host() -> HostTemplate {
    host(
        "dc0",
        "cluster0",
        vec![24 * GB, 24 * GB],
        HostAttachment::Iscsi {
            targets: vec![ISCSI_SERVER.to_string()],
        },
    )
}

pub(super) fn nfs_host() -> HostTemplate {
    host(
        "dc0",
        "cluster0",
        vec![24 * GB, 24 * GB],
        HostAttachment::Nfs {
            mounts: vec![format!("{}:/exports/{}", NFS_SERVER, NFS_SHARE)],
            mount_with_path: true,
            local_datastore_name_prefix: "local-datastore-".to_string(),
            shared_datastore_name_prefix: "shared-nfs-".to_string(),
        },
    )
}

pub(super) fn vsan_host() -> HostTemplate {
    host(
        "Datacenter",
        "cluster",
        vec![512 * GB, 512 * GB],
        HostAttachment::Vsan {
            free_local_luns: 1,
            ssd: vec![100 * GB],
        },
    )
}

pub(super) fn local_host() -> HostTemplate {
    host("dc0", "cluster0", vec![1024 * GB, 1024 * GB], HostAttachment::None)
}

pub(super) fn iscsi_server() -> IscsiServer {
    IscsiServer {
        name: ISCSI_SERVER.to_string(),
        luns: vec![1024, 1024],
        iqn_random: "nimbus1".to_string(),
        ram_backed: 2,
        cpus: 2,
        memory: 4096,
        memory_reservation: 4096,
        nic_type: vec![nic_type::VMXNET3.to_string()],
    }
}

pub(super) fn nfs_server() -> NfsServer {
    NfsServer {
        name: NFS_SERVER.to_string(),
        disk: vec![1024 * GB],
        mount_point: NFS_SHARE.to_string(),
        cpu_reservation: 2000,
        memory_reservation: 1024,
    }
}
