//! 轮询原语
//!
//! 固定间隔反复查询远端状态直到谓词满足，供三个收敛等待点复用：
//! 客户机定制完成、代理签入完成、整批电源收敛。远端系统按最终
//! 一致假设，默认不设上限；生产部署可通过 `max_attempts` 配置
//! 一个兜底边界。

use std::future::Future;
use std::time::Duration;

use crate::error::{Result, WorkflowError};

/// 轮询配置
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// 两次查询之间的间隔
    pub interval: Duration,

    /// 最大尝试次数（None 表示无限等待）
    pub max_attempts: Option<u64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            max_attempts: None,
        }
    }
}

/// 按 `interval` 反复执行 `fetch` 并用 `predicate` 检验结果，
/// 返回第一个满足谓词的值。
///
/// `fetch` 出错直接向上传播；配置了 `max_attempts` 且耗尽时
/// 返回 [`WorkflowError::PollTimeout`]。
pub async fn poll_until<T, F, Fut, P>(
    config: &PollConfig,
    mut fetch: F,
    predicate: P,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&T) -> bool,
{
    let mut attempts: u64 = 0;
    loop {
        let value = fetch().await?;
        if predicate(&value) {
            return Ok(value);
        }

        attempts += 1;
        if let Some(max) = config.max_attempts {
            if attempts >= max {
                return Err(WorkflowError::PollTimeout(max));
            }
        }

        tokio::time::sleep(config.interval).await;
    }
}
