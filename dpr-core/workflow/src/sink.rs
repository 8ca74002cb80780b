//! 错误累积器
//!
//! 非致命错误在发生处被捕获并追加到这里，流程结束时统一输出
//! 并写入报告。记录只追加不修改。

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 流程阶段标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    ConnectCompute,
    ConnectBroker,
    SelectPool,
    DisablePool,
    CaptureAndDeleteExisting,
    GatherCloneParameters,
    CloneDesktops,
    WaitForCustomization,
    AddToPool,
    WaitForCheckIn,
    ShutdownForReconfig,
    SetDiskPersistence,
    PowerOn,
    EnablePool,
    Cleanup,
}

impl Phase {
    /// 稳定的阶段标识串（用于报告）
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::ConnectCompute => "connect-compute",
            Phase::ConnectBroker => "connect-broker",
            Phase::SelectPool => "select-pool",
            Phase::DisablePool => "disable-pool",
            Phase::CaptureAndDeleteExisting => "capture-and-delete-existing",
            Phase::GatherCloneParameters => "gather-clone-parameters",
            Phase::CloneDesktops => "clone-desktops",
            Phase::WaitForCustomization => "wait-for-customization",
            Phase::AddToPool => "add-to-pool",
            Phase::WaitForCheckIn => "wait-for-check-in",
            Phase::ShutdownForReconfig => "shutdown-for-reconfig",
            Phase::SetDiskPersistence => "set-disk-persistence",
            Phase::PowerOn => "power-on",
            Phase::EnablePool => "enable-pool",
            Phase::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单条错误记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// 发生错误的阶段
    pub phase: Phase,

    /// 失败详情
    pub detail: String,

    /// 记录时间
    pub timestamp: DateTime<Utc>,
}

impl ErrorRecord {
    /// 创建新的错误记录
    pub fn new(phase: Phase, detail: impl Into<String>) -> Self {
        Self {
            phase,
            detail: detail.into(),
            timestamp: Utc::now(),
        }
    }
}

/// 错误累积器
#[derive(Debug, Default)]
pub struct ErrorSink {
    records: Vec<ErrorRecord>,
}

impl ErrorSink {
    /// 创建空的累积器
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条错误记录
    pub fn record(&mut self, phase: Phase, detail: impl Into<String>) {
        let record = ErrorRecord::new(phase, detail);
        warn!("记录错误 [{}]: {}", record.phase, record.detail);
        self.records.push(record);
    }

    /// 合并一批错误记录（逐台操作折叠产生的失败集合）
    pub fn merge(&mut self, records: Vec<ErrorRecord>) {
        for record in records {
            warn!("记录错误 [{}]: {}", record.phase, record.detail);
            self.records.push(record);
        }
    }

    /// 当前记录列表
    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    /// 是否没有任何记录
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 记录数量
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 取出全部记录，累积器清空
    pub fn take_records(&mut self) -> Vec<ErrorRecord> {
        std::mem::take(&mut self.records)
    }
}
