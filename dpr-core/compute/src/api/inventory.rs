//! 资源清单 API
//!
//! 枚举模板、集群、数据存储、文件夹和客户机定制规范。
//! 清单在每个选择步骤即时查询，不做缓存，远端库存在阶段之间
//! 可能发生变化。

use reqwest::Method;
use tracing::info;

use crate::client::ComputeClient;
use crate::error::Result;
use crate::models::InventoryItem;

/// 资源清单 API
pub struct InventoryApi<'a> {
    client: &'a ComputeClient,
}

impl<'a> InventoryApi<'a> {
    /// 创建新的资源清单 API 实例
    pub(crate) fn new(client: &'a ComputeClient) -> Self {
        Self { client }
    }

    /// 查询模板列表
    pub async fn list_templates(&self) -> Result<Vec<InventoryItem>> {
        info!("查询模板列表");
        self.client.request(
            Method::GET,
            "/compute/v1/template",
            None::<()>,
        ).await
    }

    /// 查询集群列表
    pub async fn list_clusters(&self) -> Result<Vec<InventoryItem>> {
        info!("查询集群列表");
        self.client.request(
            Method::GET,
            "/compute/v1/cluster",
            None::<()>,
        ).await
    }

    /// 查询数据存储列表
    pub async fn list_datastores(&self) -> Result<Vec<InventoryItem>> {
        info!("查询数据存储列表");
        self.client.request(
            Method::GET,
            "/compute/v1/datastore",
            None::<()>,
        ).await
    }

    /// 查询虚拟机文件夹列表
    pub async fn list_folders(&self) -> Result<Vec<InventoryItem>> {
        info!("查询文件夹列表");
        self.client.request(
            Method::GET,
            "/compute/v1/folder",
            None::<()>,
        ).await
    }

    /// 查询客户机定制规范列表
    pub async fn list_guest_specs(&self) -> Result<Vec<InventoryItem>> {
        info!("查询定制规范列表");
        self.client.request(
            Method::GET,
            "/compute/v1/guest-spec",
            None::<()>,
        ).await
    }
}
