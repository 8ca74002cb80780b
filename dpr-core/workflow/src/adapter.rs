//! 平面适配层
//!
//! 把具体的 HTTP 客户端接到编排器的平面 trait 上，并把登录失败
//! 归类为连接/认证/致命三种，供会话管理器选择正确的重试提示。

use async_trait::async_trait;

use dpr_broker::{BrokerClient, BrokerConfig, BrokerError};
use dpr_compute::{
    ComputeClient, ComputeConfig, ComputeError, CreateVmRequest,
    PowerState as ComputePowerState, DISK_MODE_INDEPENDENT_NONPERSISTENT,
};

use crate::error::{Result, WorkflowError};
use crate::plane::{
    BrokerMachine, BrokerPlane, Candidate, ComputePlane, DeployRequest, Placement, PowerState,
};
use crate::session::{ConnectError, Connector, Credential, SessionHandle};

fn map_compute_err(e: ComputeError) -> WorkflowError {
    match e {
        ComputeError::HttpError(detail) => WorkflowError::Connectivity(detail),
        ComputeError::AuthError(detail) => WorkflowError::Auth(detail),
        ComputeError::NotFound(detail) => WorkflowError::NotFound(detail),
        other => WorkflowError::Operation(other.to_string()),
    }
}

fn map_broker_err(e: BrokerError) -> WorkflowError {
    match e {
        BrokerError::HttpError(detail) => WorkflowError::Connectivity(detail),
        BrokerError::AuthError(detail) => WorkflowError::Auth(detail),
        BrokerError::NotFound(detail) => WorkflowError::NotFound(detail),
        other => WorkflowError::Operation(other.to_string()),
    }
}

fn candidate(item: dpr_compute::InventoryItem) -> Candidate {
    Candidate {
        id: item.id,
        name: item.name,
    }
}

/// 计算平台会话建立器
pub struct ComputeConnector {
    config: ComputeConfig,
}

impl ComputeConnector {
    pub fn new(config: ComputeConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for ComputeConnector {
    type Session = ComputeClient;

    async fn connect(
        &self,
        endpoint: &str,
        credential: &Credential,
    ) -> std::result::Result<ComputeClient, ConnectError> {
        let mut client = ComputeClient::new(endpoint, self.config.clone())
            .map_err(|e| ConnectError::Fatal(e.to_string()))?;
        match client.login(&credential.username, &credential.password).await {
            Ok(()) => Ok(client),
            Err(ComputeError::AuthError(detail)) => Err(ConnectError::Auth(detail)),
            Err(ComputeError::HttpError(detail)) => Err(ConnectError::Connectivity(detail)),
            Err(other) => Err(ConnectError::Fatal(other.to_string())),
        }
    }
}

#[async_trait]
impl SessionHandle for ComputeClient {
    async fn is_alive(&self) -> bool {
        ComputeClient::is_alive(self).await
    }

    async fn close(&mut self) {
        let _ = self.logout().await;
    }
}

#[async_trait]
impl ComputePlane for ComputeClient {
    async fn list_templates(&self) -> Result<Vec<Candidate>> {
        let items = self
            .inventory()
            .list_templates()
            .await
            .map_err(map_compute_err)?;
        Ok(items.into_iter().map(candidate).collect())
    }

    async fn list_clusters(&self) -> Result<Vec<Candidate>> {
        let items = self
            .inventory()
            .list_clusters()
            .await
            .map_err(map_compute_err)?;
        Ok(items.into_iter().map(candidate).collect())
    }

    async fn list_datastores(&self) -> Result<Vec<Candidate>> {
        let items = self
            .inventory()
            .list_datastores()
            .await
            .map_err(map_compute_err)?;
        Ok(items.into_iter().map(candidate).collect())
    }

    async fn list_folders(&self) -> Result<Vec<Candidate>> {
        let items = self
            .inventory()
            .list_folders()
            .await
            .map_err(map_compute_err)?;
        Ok(items.into_iter().map(candidate).collect())
    }

    async fn list_guest_specs(&self) -> Result<Vec<Candidate>> {
        let items = self
            .inventory()
            .list_guest_specs()
            .await
            .map_err(map_compute_err)?;
        Ok(items.into_iter().map(candidate).collect())
    }

    async fn vm_placement(&self, name: &str) -> Result<Placement> {
        let placement = self.vm().placement(name).await.map_err(map_compute_err)?;
        Ok(Placement {
            folder: candidate(placement.folder),
            datastore: candidate(placement.datastore),
        })
    }

    async fn deploy_from_template(&self, req: &DeployRequest) -> Result<()> {
        let request = CreateVmRequest {
            name: req.name.clone(),
            template_id: req.template_id.clone(),
            folder_id: req.folder_id.clone(),
            cluster_id: req.cluster_id.clone(),
            datastore_id: req.datastore_id.clone(),
            spec_id: req.spec_id.clone(),
        };
        self.vm().deploy(request).await.map_err(map_compute_err)
    }

    async fn power_on(&self, name: &str) -> Result<()> {
        self.vm().power_on(name).await.map_err(map_compute_err)
    }

    async fn shutdown_guest(&self, name: &str) -> Result<()> {
        self.vm()
            .shutdown_guest(name)
            .await
            .map_err(map_compute_err)
    }

    async fn power_state(&self, name: &str) -> Result<PowerState> {
        let summary = self.vm().get(name).await.map_err(map_compute_err)?;
        Ok(match summary.power_state() {
            ComputePowerState::PoweredOn => PowerState::PoweredOn,
            ComputePowerState::PoweredOff => PowerState::PoweredOff,
            ComputePowerState::Suspended => PowerState::Suspended,
            ComputePowerState::Unknown => PowerState::Unknown,
        })
    }

    async fn guest_hostname(&self, name: &str) -> Result<Option<String>> {
        let summary = self.vm().get(name).await.map_err(map_compute_err)?;
        Ok(summary.guest_hostname)
    }

    async fn list_vm_names_in_folder(&self, folder_id: &str) -> Result<Vec<String>> {
        let vms = self
            .vm()
            .list_by_folder(folder_id)
            .await
            .map_err(map_compute_err)?;
        Ok(vms.into_iter().map(|vm| vm.name).collect())
    }

    async fn set_disks_nonpersistent(&self, name: &str) -> Result<()> {
        let disks = self.vm().list_disks(name).await.map_err(map_compute_err)?;
        for disk in disks {
            self.vm()
                .set_disk_mode(name, &disk.id, DISK_MODE_INDEPENDENT_NONPERSISTENT)
                .await
                .map_err(map_compute_err)?;
        }
        Ok(())
    }
}

/// 桌面代理会话建立器
pub struct BrokerConnector {
    config: BrokerConfig,
}

impl BrokerConnector {
    pub fn new(config: BrokerConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for BrokerConnector {
    type Session = BrokerClient;

    async fn connect(
        &self,
        endpoint: &str,
        credential: &Credential,
    ) -> std::result::Result<BrokerClient, ConnectError> {
        let mut client = BrokerClient::new(endpoint, self.config.clone())
            .map_err(|e| ConnectError::Fatal(e.to_string()))?;
        match client.login(&credential.username, &credential.password).await {
            Ok(()) => Ok(client),
            Err(BrokerError::AuthError(detail)) => Err(ConnectError::Auth(detail)),
            Err(BrokerError::HttpError(detail)) => Err(ConnectError::Connectivity(detail)),
            Err(other) => Err(ConnectError::Fatal(other.to_string())),
        }
    }
}

#[async_trait]
impl SessionHandle for BrokerClient {
    async fn is_alive(&self) -> bool {
        BrokerClient::is_alive(self).await
    }

    async fn close(&mut self) {
        let _ = self.logout().await;
    }
}

#[async_trait]
impl BrokerPlane for BrokerClient {
    async fn list_pools(&self) -> Result<Vec<Candidate>> {
        let pools = self.pool().list().await.map_err(map_broker_err)?;
        Ok(pools
            .into_iter()
            .map(|p| Candidate {
                id: p.id,
                name: p.name,
            })
            .collect())
    }

    async fn disable_pool(&self, pool_id: &str) -> Result<()> {
        self.pool().disable(pool_id).await.map_err(map_broker_err)
    }

    async fn enable_pool(&self, pool_id: &str) -> Result<()> {
        self.pool().enable(pool_id).await.map_err(map_broker_err)
    }

    async fn list_pool_machines(&self, pool_id: &str) -> Result<Vec<BrokerMachine>> {
        let machines = self
            .pool()
            .list_machines(pool_id)
            .await
            .map_err(map_broker_err)?;
        Ok(machines
            .into_iter()
            .map(|m| BrokerMachine {
                name: m.name,
                basic_state: m.basic_state,
            })
            .collect())
    }

    async fn delete_machines(&self, names: &[String], from_disk: bool) -> Result<()> {
        self.machine()
            .delete(names.to_vec(), from_disk)
            .await
            .map_err(map_broker_err)
    }

    async fn add_machines_to_pool(&self, pool_id: &str, names: &[String]) -> Result<()> {
        self.machine()
            .add_to_pool(pool_id, names.to_vec())
            .await
            .map_err(map_broker_err)
    }
}
