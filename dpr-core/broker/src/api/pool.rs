//! 桌面池管理 API

use reqwest::Method;
use tracing::info;

use crate::client::BrokerClient;
use crate::error::Result;
use crate::models::{Pool, PoolMachine};

/// 桌面池管理 API
pub struct PoolApi<'a> {
    client: &'a BrokerClient,
}

impl<'a> PoolApi<'a> {
    /// 创建新的桌面池 API 实例
    pub(crate) fn new(client: &'a BrokerClient) -> Self {
        Self { client }
    }

    /// 查询桌面池列表
    pub async fn list(&self) -> Result<Vec<Pool>> {
        info!("查询桌面池列表");
        self.client.request(
            Method::GET,
            "/broker/v1/pool",
            None::<()>,
        ).await
    }

    /// 启用桌面池
    pub async fn enable(&self, pool_id: &str) -> Result<()> {
        info!("启用桌面池: {}", pool_id);
        self.client.execute(
            Method::POST,
            &format!("/broker/v1/pool/{}/enable", pool_id),
            None::<()>,
        ).await
    }

    /// 禁用桌面池
    pub async fn disable(&self, pool_id: &str) -> Result<()> {
        info!("禁用桌面池: {}", pool_id);
        self.client.execute(
            Method::POST,
            &format!("/broker/v1/pool/{}/disable", pool_id),
            None::<()>,
        ).await
    }

    /// 查询池内桌面列表
    pub async fn list_machines(&self, pool_id: &str) -> Result<Vec<PoolMachine>> {
        self.client.request(
            Method::GET,
            &format!("/broker/v1/pool/{}/machine", pool_id),
            None::<()>,
        ).await
    }
}
