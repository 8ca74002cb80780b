//! 池内桌面管理 API

use reqwest::Method;
use tracing::info;

use crate::client::BrokerClient;
use crate::error::Result;
use crate::models::{AddMachinesRequest, DeleteMachinesRequest};

/// 池内桌面管理 API
pub struct MachineApi<'a> {
    client: &'a BrokerClient,
}

impl<'a> MachineApi<'a> {
    /// 创建新的桌面管理 API 实例
    pub(crate) fn new(client: &'a BrokerClient) -> Self {
        Self { client }
    }

    /// 删除桌面
    ///
    /// `from_disk` 为 true 时同时从磁盘删除对应虚拟机。
    pub async fn delete(&self, names: Vec<String>, from_disk: bool) -> Result<()> {
        info!("删除桌面: {} 台 (从磁盘: {})", names.len(), from_disk);
        self.client.execute(
            Method::POST,
            "/broker/v1/machine/delete",
            Some(DeleteMachinesRequest { names, from_disk }),
        ).await
    }

    /// 将桌面添加到指定桌面池
    pub async fn add_to_pool(&self, pool_id: &str, names: Vec<String>) -> Result<()> {
        info!("添加桌面到池 {}: {} 台", pool_id, names.len());
        self.client.execute(
            Method::POST,
            &format!("/broker/v1/pool/{}/machine/add", pool_id),
            Some(AddMachinesRequest { names }),
        ).await
    }
}
