//! CLI 配置管理
//!
//! **数据存储方式**: TOML 文件 (~/.config/dpr/config.toml)
//!
//! 保存两个平台的默认地址与刷新参数，命令行未指定时作为初始值；
//! 地址仍可在连接失败时由操作员重新输入。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// CLI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// 计算平台地址
    pub compute_url: Option<String>,

    /// 桌面代理地址
    pub broker_url: Option<String>,

    /// 新桌面名称前缀
    #[serde(default = "default_machine_prefix")]
    pub machine_prefix: String,

    /// 收敛轮询间隔（秒）
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// 轮询最大尝试次数（缺省为无限等待）
    pub max_poll_attempts: Option<u64>,

    /// 错误报告输出路径
    #[serde(default = "default_report_path")]
    pub report_path: String,

    /// 是否验证 SSL 证书
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
}

fn default_machine_prefix() -> String {
    "DPR-".to_string()
}

fn default_poll_interval() -> u64 {
    30
}

fn default_report_path() -> String {
    "dpr-errors.csv".to_string()
}

fn default_verify_ssl() -> bool {
    true
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            compute_url: None,
            broker_url: None,
            machine_prefix: default_machine_prefix(),
            poll_interval_secs: default_poll_interval(),
            max_poll_attempts: None,
            report_path: default_report_path(),
            verify_ssl: default_verify_ssl(),
        }
    }
}

impl CliConfig {
    /// 获取配置文件路径
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("无法获取用户主目录")?;
        Ok(home.join(".config").join("dpr").join("config.toml"))
    }

    /// 加载配置（文件不存在时使用默认值）
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(p) => p,
            None => Self::config_path()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("读取配置文件失败: {:?}", path))?;

        toml::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {:?}", path))
    }

    /// 保存配置
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // 确保目录存在
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("创建配置目录失败: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("序列化配置失败")?;

        fs::write(&path, content)
            .with_context(|| format!("写入配置文件失败: {:?}", path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.machine_prefix, "DPR-");
        assert_eq!(config.poll_interval_secs, 30);
        assert!(config.max_poll_attempts.is_none());
        assert!(config.verify_ssl);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: CliConfig = toml::from_str(
            r#"
            compute_url = "http://192.168.1.10:8088"
            poll_interval_secs = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.compute_url.as_deref(), Some("http://192.168.1.10:8088"));
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.report_path, "dpr-errors.csv");
    }
}
