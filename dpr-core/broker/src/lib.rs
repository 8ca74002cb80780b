//! 桌面代理平台客户端
//!
//! 提供与桌面代理控制平面 API 交互的客户端实现。代理平面负责
//! 桌面池成员关系、启用状态与每台桌面的签入可用状态，与负责
//! 虚拟机生命周期的计算平面相互独立。
//!
//! # 功能
//!
//! - **桌面池管理** (`PoolApi`): 枚举、启用、禁用、成员查询
//! - **桌面管理** (`MachineApi`): 删除（可选从磁盘）、添加到池

pub mod client;
pub mod api;
pub mod models;
pub mod error;

pub use client::{BrokerClient, BrokerConfig};
pub use error::{BrokerError, Result};

// 导出 API 模块
pub use api::{MachineApi, PoolApi};

// 导出数据模型
pub use models::{
    AddMachinesRequest, ApiResponse, DeleteMachinesRequest,
    Pool, PoolMachine,
};
