//! 计算平台 API 模块
//!
//! 提供刷新流程所需的计算平台 API 封装，包括：
//! - 资源清单 (InventoryApi)
//! - 虚拟机管理 (VmApi)

pub mod inventory;
pub mod vm;

pub use inventory::InventoryApi;
pub use vm::VmApi;
