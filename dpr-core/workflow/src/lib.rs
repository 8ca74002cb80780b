//! 桌面池刷新编排引擎
//!
//! 把一个"手动"桌面池的整批桌面推倒重建：删除现有桌面、从模板
//! 克隆新批次、等待各异步阶段收敛、重新挂回池并启用。驱动两个
//! 独立的远端平面：计算管理平面（虚拟机生命周期）与桌面代理
//! 平面（池成员与签入状态）。
//!
//! # 组成
//!
//! - **会话管理** (`session`): 按失败类别重试的连接循环与保活重连
//! - **候选选择** (`choice`): 六处选择共用的菜单解析器
//! - **轮询原语** (`poll`): 固定间隔收敛等待，可选次数上限
//! - **错误累积** (`sink` / `report`): 追加式错误记录与落盘报告
//! - **编排器** (`refresh`): 15 阶段状态机，任何退出路径都执行清理
//! - **平面抽象** (`plane` / `adapter`): trait 接缝与具体客户端适配
//!
//! # 示例
//!
//! ```ignore
//! use dpr_workflow::adapter::{BrokerConnector, ComputeConnector};
//! use dpr_workflow::refresh::{RefreshOptions, RefreshWorkflow};
//! use dpr_workflow::session::SessionManager;
//!
//! let compute = SessionManager::new(ComputeConnector::new(Default::default()), "计算平台");
//! let broker = SessionManager::new(BrokerConnector::new(Default::default()), "桌面代理");
//! let workflow = RefreshWorkflow::new(compute, broker, operator, RefreshOptions::default());
//! let summary = workflow.run().await;
//! ```

pub mod adapter;
pub mod choice;
pub mod error;
pub mod naming;
pub mod operator;
pub mod plane;
pub mod poll;
pub mod refresh;
pub mod report;
pub mod session;
pub mod sink;
pub mod state;

pub use error::{Result, WorkflowError};
pub use operator::Operator;
pub use plane::{BrokerMachine, BrokerPlane, Candidate, ComputePlane, DeployRequest, Placement, PowerState};
pub use poll::{poll_until, PollConfig};
pub use refresh::{RefreshOptions, RefreshOutcome, RefreshSummary, RefreshWorkflow};
pub use session::{ConnectError, Connector, Credential, RemoteSession, SessionHandle, SessionManager};
pub use sink::{ErrorRecord, ErrorSink, Phase};
pub use state::WorkflowState;
