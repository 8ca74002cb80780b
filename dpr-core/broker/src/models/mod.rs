//! 桌面代理平台数据模型

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

/// 桌面池信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    /// 桌面池 ID
    pub id: String,

    /// 桌面池名称
    pub name: String,

    /// 是否已启用
    pub enabled: bool,

    /// 桌面数量
    #[serde(default)]
    pub machine_count: u32,
}

/// 池内桌面信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolMachine {
    /// 桌面 ID
    pub id: String,

    /// 桌面名称（与计算平台虚拟机名称一致）
    pub name: String,

    /// 基础可用状态（AVAILABLE / PROVISIONING / AGENT_UNREACHABLE 等）
    pub basic_state: String,
}

impl PoolMachine {
    /// 桌面是否已完成签入并可用
    pub fn is_available(&self) -> bool {
        self.basic_state.eq_ignore_ascii_case("available")
    }
}

/// 删除桌面请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteMachinesRequest {
    /// 要删除的桌面名称列表
    pub names: Vec<String>,

    /// 是否同时从磁盘删除虚拟机
    pub from_disk: bool,
}

/// 添加桌面到池请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMachinesRequest {
    /// 要添加的桌面名称列表
    pub names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_availability() {
        let m = PoolMachine {
            id: "m-1".to_string(),
            name: "DPR-0000001".to_string(),
            basic_state: "AVAILABLE".to_string(),
        };
        assert!(m.is_available());

        let m = PoolMachine {
            basic_state: "PROVISIONING".to_string(),
            ..m
        };
        assert!(!m.is_available());
    }

    #[test]
    fn test_pool_deserialization() {
        let json = r#"{"id": "pool-7", "name": "财务部桌面池", "enabled": true}"#;
        let pool: Pool = serde_json::from_str(json).unwrap();
        assert_eq!(pool.name, "财务部桌面池");
        assert_eq!(pool.machine_count, 0);
    }
}
