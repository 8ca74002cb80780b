//! 错误报告
//!
//! 流程结束时把累积的错误记录落盘：CSV 表格（每条记录一行）
//! 供运维查看，另附同名 JSON 便于程序化处理。报告仅供参考，
//! 不被其他组件消费。

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sink::ErrorRecord;

/// 错误报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// 生成时间
    pub generated_at: DateTime<Utc>,

    /// 错误记录列表
    pub records: Vec<ErrorRecord>,
}

impl ErrorReport {
    /// 从记录列表创建报告
    pub fn new(records: Vec<ErrorRecord>) -> Self {
        Self {
            generated_at: Utc::now(),
            records,
        }
    }

    /// 导出为 JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 导出为 CSV（表头 + 每条记录一行）
    pub fn to_csv(&self) -> String {
        let mut out = String::from("timestamp,phase,detail\n");
        for record in &self.records {
            out.push_str(&format!(
                "{},{},{}\n",
                csv_field(&record.timestamp.to_rfc3339()),
                csv_field(record.phase.as_str()),
                csv_field(&record.detail),
            ));
        }
        out
    }

    /// 写入报告文件：`path` 为 CSV，旁边再写一份同名 `.json`
    pub fn write(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_csv())?;

        let json_path = path.with_extension("json");
        let json = self
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(json_path, json)?;
        Ok(())
    }
}

/// CSV 字段转义（含分隔符/引号/换行时加引号包裹）
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Phase;

    #[test]
    fn test_csv_output() {
        let report = ErrorReport::new(vec![
            ErrorRecord::new(Phase::CloneDesktops, "DPR-A1B2C3D: 部署失败"),
            ErrorRecord::new(Phase::EnablePool, "含,逗号和\"引号\""),
        ]);

        let csv = report.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "timestamp,phase,detail");
        assert!(lines[1].contains("clone-desktops"));
        assert!(lines[2].contains("\"含,逗号和\"\"引号\"\"\""));
    }

    #[test]
    fn test_write_creates_csv_and_json() {
        let dir = std::env::temp_dir().join(format!("dpr-report-test-{}", std::process::id()));
        let path = dir.join("errors.csv");

        let report = ErrorReport::new(vec![ErrorRecord::new(Phase::AddToPool, "失败")]);
        report.write(&path).unwrap();

        assert!(path.exists());
        assert!(path.with_extension("json").exists());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("timestamp,phase,detail"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
