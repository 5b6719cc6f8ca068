use crate::models::{entity_name, EsxHost, InstallStyle};

/// Storage attachments a host carries besides its local disks
#[derive(Debug, Clone, PartialEq)]
pub enum HostAttachment {
    None,
    Iscsi {
        targets: Vec<String>,
    },
    Nfs {
        mounts: Vec<String>,
        mount_with_path: bool,
        local_datastore_name_prefix: String,
        shared_datastore_name_prefix: String,
    },
    Vsan {
        free_local_luns: u32,
        ssd: Vec<u64>,
    },
}

/// HostTemplate is everything every generated host has in common
#[derive(Debug, Clone, PartialEq)]
pub struct HostTemplate {
    pub dc: String,
    pub cluster_name: String,
    pub cpus: u32,
    pub memory_mb: u32,
    pub disks: Vec<u64>,
    pub attachment: HostAttachment,
}

impl HostTemplate {
    /// Stamp out the host with the given index
    pub fn host(&self, index: usize) -> EsxHost {
        let mut host = EsxHost {
            name: format!("esx.{}", index),
            vc: entity_name::VCENTER.to_string(),
            dc: self.dc.clone(),
            cluster_name: self.cluster_name.clone(),
            style: InstallStyle::FullInstall,
            cpus: self.cpus,
            memory_mb: self.memory_mb,
            disks: self.disks.clone(),
            iscsi_targets: None,
            mount_nfs: None,
            mount_nfs_with_path: None,
            local_datastore_name_prefix: None,
            shared_datastore_name_prefix: None,
            free_local_luns: None,
            ssd: None,
        };
        match &self.attachment {
            HostAttachment::None => {}
            HostAttachment::Iscsi { targets } => {
                host.iscsi_targets = Some(targets.clone());
            }
            HostAttachment::Nfs {
                mounts,
                mount_with_path,
                local_datastore_name_prefix,
                shared_datastore_name_prefix,
            } => {
                // Passed through verbatim; the driver owns their meaning.
                host.mount_nfs = Some(mounts.clone());
                host.mount_nfs_with_path = Some(*mount_with_path);
                host.local_datastore_name_prefix = Some(local_datastore_name_prefix.clone());
                host.shared_datastore_name_prefix = Some(shared_datastore_name_prefix.clone());
            }
            HostAttachment::Vsan {
                free_local_luns,
                ssd,
            } => {
                host.free_local_luns = Some(*free_local_luns);
                host.ssd = Some(ssd.clone());
            }
        }
        host
    }
}

/// Generate `count` hosts named `esx.0` through `esx.{count-1}`
pub fn generate_hosts(count: usize, template: &HostTemplate) -> Vec<EsxHost> {
    (0..count).map(|index| template.host(index)).collect()
}
