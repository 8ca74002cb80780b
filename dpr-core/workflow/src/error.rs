//! 刷新流程错误定义
//!
//! 错误分为五类：连接类和认证类在会话管理器的重试循环内消化，
//! 不会向上传播；NotFound（候选为空）一律致命；操作类按所在
//! 阶段分为致命或累积继续；其余未归类错误一律致命。

use thiserror::Error;

/// 刷新流程错误类型
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// 连接错误（端点不可达，重试时重新询问地址）
    #[error("连接失败: {0}")]
    Connectivity(String),

    /// 认证错误（重试时重新询问凭据）
    #[error("认证失败: {0}")]
    Auth(String),

    /// 候选对象为空（无法继续，致命）
    #[error("未找到{0}")]
    NotFound(String),

    /// 某个远端操作失败
    #[error("操作失败: {0}")]
    Operation(String),

    /// 轮询超出配置的最大尝试次数
    #[error("轮询超出最大尝试次数 ({0})")]
    PollTimeout(u64),

    /// 操作员交互 IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 未归类错误（一律致命）
    #[error("未知错误: {0}")]
    Unknown(String),
}

/// 刷新流程结果类型
pub type Result<T> = std::result::Result<T, WorkflowError>;
