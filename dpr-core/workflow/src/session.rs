//! 远端会话管理
//!
//! 负责两个远端平面的会话建立与保活。连接循环不设上限也不做
//! 退避：每次重试都需要操作员重新给出地址或凭据，重试风暴由
//! 人工节奏天然约束。连接类失败只重新询问地址，认证类失败只
//! 重新询问凭据，其余失败直接致命上抛。

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::error::{Result, WorkflowError};
use crate::operator::Operator;

/// 登录凭据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// 用户名
    pub username: String,

    /// 密码
    pub password: String,
}

/// 连接失败分类
#[derive(Error, Debug)]
pub enum ConnectError {
    /// 端点不可达（重试时重新询问地址）
    #[error("无法连接: {0}")]
    Connectivity(String),

    /// 凭据被拒绝（重试时重新询问凭据）
    #[error("认证被拒绝: {0}")]
    Auth(String),

    /// 其他失败（致命）
    #[error("{0}")]
    Fatal(String),
}

/// 已认证的远端会话句柄
#[async_trait]
pub trait SessionHandle: Send + Sync {
    /// 会话是否仍然有效
    async fn is_alive(&self) -> bool;

    /// 关闭会话（容忍失败，只执行一次）
    async fn close(&mut self);
}

/// 会话建立器：按端点与凭据创建一个新会话
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: SessionHandle + Send;

    async fn connect(
        &self,
        endpoint: &str,
        credential: &Credential,
    ) -> std::result::Result<Self::Session, ConnectError>;
}

/// 已建立的远端会话
///
/// 保留端点与凭据，长时间阻塞等待后远端可能已回收会话，
/// 任何后续远端调用前都应先经 [`SessionManager::ensure_live`]。
pub struct RemoteSession<S> {
    /// 端点地址
    pub endpoint: String,

    /// 登录凭据
    pub credential: Credential,

    /// 活动句柄
    pub handle: S,
}

/// 会话管理器
pub struct SessionManager<C: Connector> {
    connector: C,

    /// 平台名称（提示与日志用）
    label: &'static str,
}

impl<C: Connector> SessionManager<C> {
    /// 创建会话管理器
    pub fn new(connector: C, label: &'static str) -> Self {
        Self { connector, label }
    }

    /// 建立会话，按失败类别重试直到成功
    ///
    /// 连接类失败重新询问地址（凭据不变），认证类失败重新询问
    /// 凭据（地址不变），其余失败致命上抛。
    pub async fn establish(
        &self,
        operator: &dyn Operator,
        endpoint: String,
        credential: Credential,
    ) -> Result<RemoteSession<C::Session>> {
        let mut endpoint = endpoint;
        let mut credential = credential;
        loop {
            match self.connector.connect(&endpoint, &credential).await {
                Ok(handle) => {
                    info!("{} 连接成功: {}", self.label, endpoint);
                    return Ok(RemoteSession {
                        endpoint,
                        credential,
                        handle,
                    });
                }
                Err(ConnectError::Connectivity(detail)) => {
                    warn!("{} 无法连接 {}: {}", self.label, endpoint, detail);
                    operator.notify(&format!("无法连接到{}：{}", self.label, detail));
                    endpoint = operator.prompt_line(&format!("请重新输入{}地址", self.label))?;
                }
                Err(ConnectError::Auth(detail)) => {
                    warn!("{} 认证失败: {}", self.label, detail);
                    operator.notify(&format!("{}认证失败：{}", self.label, detail));
                    credential = prompt_credential(operator, self.label)?;
                }
                Err(ConnectError::Fatal(detail)) => {
                    return Err(WorkflowError::Unknown(detail));
                }
            }
        }
    }

    /// 会话保活：失效时用记录的端点与凭据静默重连
    pub async fn ensure_live(&self, session: &mut RemoteSession<C::Session>) -> Result<()> {
        if session.handle.is_alive().await {
            return Ok(());
        }

        info!("{} 会话已失效，重连: {}", self.label, session.endpoint);
        match self
            .connector
            .connect(&session.endpoint, &session.credential)
            .await
        {
            Ok(handle) => {
                session.handle = handle;
                Ok(())
            }
            Err(ConnectError::Connectivity(detail)) => Err(WorkflowError::Connectivity(detail)),
            Err(ConnectError::Auth(detail)) => Err(WorkflowError::Auth(detail)),
            Err(ConnectError::Fatal(detail)) => Err(WorkflowError::Unknown(detail)),
        }
    }
}

/// 向操作员询问一组登录凭据
pub fn prompt_credential(operator: &dyn Operator, label: &str) -> Result<Credential> {
    let username = operator.prompt_line(&format!("请输入{}用户名", label))?;
    let password = operator.prompt_secret(&format!("请输入{}密码", label))?;
    Ok(Credential { username, password })
}
