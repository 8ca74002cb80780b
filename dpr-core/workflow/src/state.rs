//! 流程状态
//!
//! 跨阶段携带的数据线：已选定的池与放置参数、删除前捕获的原
//! 放置位置、请求数量和新建桌面名单。仅由编排器变更，流程结束
//! 后随报告一起废弃。

use crate::plane::{Candidate, Placement};

/// 流程状态
#[derive(Debug, Clone, Default)]
pub struct WorkflowState {
    /// 选定的桌面池
    pub pool: Option<Candidate>,

    /// 选定的源模板
    pub template: Option<Candidate>,

    /// 选定的客户机定制规范
    pub guest_spec: Option<Candidate>,

    /// 选定的目标文件夹
    pub folder: Option<Candidate>,

    /// 选定的目标集群
    pub cluster: Option<Candidate>,

    /// 选定的目标数据存储
    pub datastore: Option<Candidate>,

    /// 删除前从代表桌面捕获的原放置位置
    ///
    /// 捕获后在本次运行内保持有效，除非操作员在参数收集阶段
    /// 显式改选。
    pub captured_placement: Option<Placement>,

    /// 请求创建的桌面数量
    pub requested_count: u32,

    /// 按创建顺序排列的新桌面名称
    pub created_names: Vec<String>,
}
