//! 桌面代理平台 API 模块
//!
//! - 桌面池管理 (PoolApi)
//! - 池内桌面管理 (MachineApi)

pub mod pool;
pub mod machine;

pub use pool::PoolApi;
pub use machine::MachineApi;
