//! 远端平面抽象
//!
//! 刷新流程通过这两个 trait 驱动计算平面与代理平面，具体客户端
//! 由适配层提供，测试使用假实现。各阶段的依赖由此保持可见。

use async_trait::async_trait;

use crate::error::Result;

/// 具名的远端候选对象（池/模板/集群/数据存储/文件夹/定制规范）
///
/// 获取后不可变；每个选择步骤即时重新查询，不跨阶段缓存。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// 对象标识（后续远端调用使用的不透明引用）
    pub id: String,

    /// 显示名称
    pub name: String,
}

/// 虚拟机放置信息（文件夹 + 数据存储）
#[derive(Debug, Clone)]
pub struct Placement {
    /// 所在文件夹
    pub folder: Candidate,

    /// 所在数据存储
    pub datastore: Candidate,
}

/// 虚拟机电源状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    PoweredOn,
    PoweredOff,
    Suspended,
    Unknown,
}

/// 从模板部署桌面请求
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub name: String,
    pub template_id: String,
    pub folder_id: String,
    pub cluster_id: String,
    pub datastore_id: String,
    pub spec_id: String,
}

/// 代理平面视角的池内桌面
#[derive(Debug, Clone)]
pub struct BrokerMachine {
    /// 桌面名称
    pub name: String,

    /// 基础可用状态
    pub basic_state: String,
}

impl BrokerMachine {
    /// 桌面是否已签入并可用
    pub fn is_available(&self) -> bool {
        self.basic_state.eq_ignore_ascii_case("available")
    }
}

/// 计算管理平面（虚拟机生命周期与资源清单）
#[async_trait]
pub trait ComputePlane: Send + Sync {
    async fn list_templates(&self) -> Result<Vec<Candidate>>;

    async fn list_clusters(&self) -> Result<Vec<Candidate>>;

    async fn list_datastores(&self) -> Result<Vec<Candidate>>;

    async fn list_folders(&self) -> Result<Vec<Candidate>>;

    async fn list_guest_specs(&self) -> Result<Vec<Candidate>>;

    /// 查询虚拟机当前所在的文件夹与数据存储
    async fn vm_placement(&self, name: &str) -> Result<Placement>;

    /// 从模板部署一台新桌面
    async fn deploy_from_template(&self, req: &DeployRequest) -> Result<()>;

    async fn power_on(&self, name: &str) -> Result<()>;

    /// 向客户机操作系统发送关机请求
    async fn shutdown_guest(&self, name: &str) -> Result<()>;

    async fn power_state(&self, name: &str) -> Result<PowerState>;

    /// 客户机主机名（客户机工具未就绪时为 None）
    async fn guest_hostname(&self, name: &str) -> Result<Option<String>>;

    /// 按文件夹枚举虚拟机名称
    async fn list_vm_names_in_folder(&self, folder_id: &str) -> Result<Vec<String>>;

    /// 将虚拟机的全部磁盘设置为独立非持久模式
    async fn set_disks_nonpersistent(&self, name: &str) -> Result<()>;
}

/// 桌面代理平面（池成员与签入状态）
#[async_trait]
pub trait BrokerPlane: Send + Sync {
    async fn list_pools(&self) -> Result<Vec<Candidate>>;

    async fn disable_pool(&self, pool_id: &str) -> Result<()>;

    async fn enable_pool(&self, pool_id: &str) -> Result<()>;

    async fn list_pool_machines(&self, pool_id: &str) -> Result<Vec<BrokerMachine>>;

    /// 删除桌面，`from_disk` 为 true 时同时从磁盘删除虚拟机
    async fn delete_machines(&self, names: &[String], from_disk: bool) -> Result<()>;

    async fn add_machines_to_pool(&self, pool_id: &str, names: &[String]) -> Result<()>;
}
