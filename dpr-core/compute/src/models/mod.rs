//! 计算平台数据模型
//!
//! 所有模型直接映射计算管理平台 REST API 的响应结构，实时查询，
//! 不做本地持久化。

use serde::{Deserialize, Serialize};

/// 通用 API 响应封装
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 状态码（0 表示成功）
    pub status: i64,

    /// 提示信息
    #[serde(default)]
    pub msg: Option<String>,

    /// 响应数据
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// 资源清单条目（模板/集群/数据存储/文件夹/定制规范）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    /// 对象 ID（后续 API 调用使用的不透明引用）
    pub id: String,

    /// 显示名称
    pub name: String,
}

/// 虚拟机电源状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerState {
    /// 已开机
    PoweredOn,

    /// 已关机
    PoweredOff,

    /// 已挂起
    Suspended,

    /// 未知状态
    Unknown,
}

impl PowerState {
    /// 从平台状态码转换
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => PowerState::PoweredOff,
            1 => PowerState::PoweredOn,
            2 => PowerState::Suspended,
            _ => PowerState::Unknown,
        }
    }

    /// 对应的平台状态码
    pub fn code(&self) -> i64 {
        match self {
            PowerState::PoweredOff => 0,
            PowerState::PoweredOn => 1,
            PowerState::Suspended => 2,
            PowerState::Unknown => -1,
        }
    }
}

/// 虚拟机摘要信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmSummary {
    /// 虚拟机名称
    pub name: String,

    /// 电源状态码
    pub status: i64,

    /// 客户机主机名（客户机工具未就绪时为空）
    #[serde(default)]
    pub guest_hostname: Option<String>,
}

impl VmSummary {
    /// 电源状态
    pub fn power_state(&self) -> PowerState {
        PowerState::from_code(self.status)
    }
}

/// 虚拟机放置信息（所在文件夹与数据存储）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmPlacement {
    /// 所在文件夹
    pub folder: InventoryItem,

    /// 所在数据存储
    pub datastore: InventoryItem,
}

/// 从模板部署虚拟机请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVmRequest {
    /// 虚拟机名称
    pub name: String,

    /// 模板 ID
    pub template_id: String,

    /// 目标文件夹 ID
    pub folder_id: String,

    /// 目标集群 ID
    pub cluster_id: String,

    /// 目标数据存储 ID
    pub datastore_id: String,

    /// 客户机定制规范 ID
    pub spec_id: String,
}

/// 虚拟磁盘信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskInfo {
    /// 磁盘 ID
    pub id: String,

    /// 磁盘标签
    pub label: String,

    /// 持久化模式
    pub mode: String,
}

/// 独立非持久模式标识
pub const DISK_MODE_INDEPENDENT_NONPERSISTENT: &str = "independent-nonpersistent";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_state_codes() {
        assert_eq!(PowerState::from_code(0), PowerState::PoweredOff);
        assert_eq!(PowerState::from_code(1), PowerState::PoweredOn);
        assert_eq!(PowerState::from_code(2), PowerState::Suspended);
        assert_eq!(PowerState::from_code(99), PowerState::Unknown);
        assert_eq!(PowerState::PoweredOn.code(), 1);
    }

    #[test]
    fn test_vm_summary_deserialization() {
        let json = r#"{"name": "DPR-A1B2C3D", "status": 1, "guest_hostname": "DPR-A1B2C3D"}"#;
        let vm: VmSummary = serde_json::from_str(json).unwrap();
        assert_eq!(vm.power_state(), PowerState::PoweredOn);
        assert_eq!(vm.guest_hostname.as_deref(), Some("DPR-A1B2C3D"));
    }

    #[test]
    fn test_vm_summary_missing_hostname() {
        let json = r#"{"name": "DPR-A1B2C3D", "status": 0}"#;
        let vm: VmSummary = serde_json::from_str(json).unwrap();
        assert!(vm.guest_hostname.is_none());
    }
}
