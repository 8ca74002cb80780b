//! 计算管理平台客户端
//!
//! 提供与计算管理平面 API 交互的客户端实现，覆盖桌面池刷新
//! 流程所需的虚拟机生命周期与资源清单操作。
//!
//! # 功能
//!
//! - **资源清单** (`InventoryApi`): 模板、集群、数据存储、文件夹、定制规范枚举
//! - **虚拟机管理** (`VmApi`): 从模板部署、电源操作、放置查询、磁盘模式修改
//!
//! # 示例
//!
//! ```ignore
//! use dpr_compute::{ComputeClient, ComputeConfig, CreateVmRequest};
//!
//! let mut client = ComputeClient::new("http://compute-server:8088", ComputeConfig::default())?;
//! client.login("admin", "password").await?;
//!
//! let templates = client.inventory().list_templates().await?;
//! client.vm().power_on("DPR-A1B2C3D").await?;
//! ```

pub mod client;
pub mod api;
pub mod models;
pub mod error;

pub use client::{ComputeClient, ComputeConfig};
pub use error::{ComputeError, Result};

// 导出 API 模块
pub use api::{InventoryApi, VmApi};

// 导出数据模型
pub use models::{
    ApiResponse, CreateVmRequest, DiskInfo, InventoryItem,
    PowerState, VmPlacement, VmSummary,
    DISK_MODE_INDEPENDENT_NONPERSISTENT,
};
