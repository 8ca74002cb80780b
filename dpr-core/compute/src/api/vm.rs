//! 虚拟机管理 API
//!
//! 提供刷新流程涉及的虚拟机操作，包括：
//! - 从模板部署新虚拟机
//! - 电源操作：开机、客户机关机
//! - 状态查询：摘要、放置信息、按文件夹枚举
//! - 磁盘持久化模式修改

use reqwest::Method;
use tracing::info;

use crate::client::ComputeClient;
use crate::error::Result;
use crate::models::{CreateVmRequest, DiskInfo, VmPlacement, VmSummary};

/// 虚拟机管理 API
pub struct VmApi<'a> {
    client: &'a ComputeClient,
}

impl<'a> VmApi<'a> {
    /// 创建新的虚拟机 API 实例
    pub(crate) fn new(client: &'a ComputeClient) -> Self {
        Self { client }
    }

    /// 查询虚拟机摘要
    pub async fn get(&self, name: &str) -> Result<VmSummary> {
        self.client.request(
            Method::GET,
            &format!("/compute/v1/vm/{}", name),
            None::<()>,
        ).await
    }

    /// 查询虚拟机当前放置信息（文件夹与数据存储）
    pub async fn placement(&self, name: &str) -> Result<VmPlacement> {
        info!("查询虚拟机放置信息: {}", name);
        self.client.request(
            Method::GET,
            &format!("/compute/v1/vm/{}/placement", name),
            None::<()>,
        ).await
    }

    /// 从模板部署虚拟机
    pub async fn deploy(&self, req: CreateVmRequest) -> Result<()> {
        info!("从模板部署虚拟机: {} (模板: {})", req.name, req.template_id);
        self.client.execute(
            Method::POST,
            "/compute/v1/vm/deploy",
            Some(req),
        ).await
    }

    /// 虚拟机开机
    pub async fn power_on(&self, name: &str) -> Result<()> {
        info!("虚拟机开机: {}", name);
        self.client.execute(
            Method::POST,
            &format!("/compute/v1/vm/{}/power-on", name),
            None::<()>,
        ).await
    }

    /// 客户机关机（向客户机操作系统发送关机请求）
    pub async fn shutdown_guest(&self, name: &str) -> Result<()> {
        info!("客户机关机: {}", name);
        self.client.execute(
            Method::POST,
            &format!("/compute/v1/vm/{}/shutdown-guest", name),
            None::<()>,
        ).await
    }

    /// 按文件夹枚举虚拟机
    pub async fn list_by_folder(&self, folder_id: &str) -> Result<Vec<VmSummary>> {
        info!("按文件夹枚举虚拟机: {}", folder_id);
        self.client.request(
            Method::GET,
            &format!("/compute/v1/folder/{}/vm", folder_id),
            None::<()>,
        ).await
    }

    /// 查询虚拟机磁盘列表
    pub async fn list_disks(&self, name: &str) -> Result<Vec<DiskInfo>> {
        self.client.request(
            Method::GET,
            &format!("/compute/v1/vm/{}/disk", name),
            None::<()>,
        ).await
    }

    /// 设置磁盘持久化模式
    pub async fn set_disk_mode(&self, name: &str, disk_id: &str, mode: &str) -> Result<()> {
        info!("设置磁盘模式: {} 磁盘 {} -> {}", name, disk_id, mode);
        self.client.execute(
            Method::POST,
            &format!("/compute/v1/vm/{}/disk/{}/mode", name, disk_id),
            Some(serde_json::json!({ "mode": mode })),
        ).await
    }
}
