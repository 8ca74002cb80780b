//! DPR CLI 应用
//!
//! 单次运行一轮完整的手动桌面池刷新：连接计算平台与桌面代理，
//! 删除池内现有桌面，从模板克隆新批次并等待收敛，重新挂回池
//! 并启用。流程跑完或报告失败后即退出，不常驻。

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};

use dpr_broker::BrokerConfig;
use dpr_compute::ComputeConfig;
use dpr_workflow::adapter::{BrokerConnector, ComputeConnector};
use dpr_workflow::{PollConfig, RefreshOptions, RefreshOutcome, RefreshWorkflow, SessionManager};

mod config;
mod console;

use config::CliConfig;
use console::ConsoleOperator;

#[derive(Parser)]
#[command(name = "dpr")]
#[command(about = "DPR - 手动桌面池刷新工具", long_about = None)]
#[command(version)]
struct Cli {
    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// 配置文件路径（默认 ~/.config/dpr/config.toml）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 计算平台地址（覆盖配置文件）
    #[arg(long)]
    compute_url: Option<String>,

    /// 桌面代理地址（覆盖配置文件）
    #[arg(long)]
    broker_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("DPR 启动");

    let config = CliConfig::load(cli.config)?;

    let options = RefreshOptions {
        compute_endpoint: cli
            .compute_url
            .or(config.compute_url)
            .unwrap_or_default(),
        broker_endpoint: cli
            .broker_url
            .or(config.broker_url)
            .unwrap_or_default(),
        machine_prefix: config.machine_prefix,
        poll: PollConfig {
            interval: Duration::from_secs(config.poll_interval_secs),
            max_attempts: config.max_poll_attempts,
        },
        report_path: PathBuf::from(config.report_path),
    };

    let compute_config = ComputeConfig {
        verify_ssl: config.verify_ssl,
        ..Default::default()
    };
    let broker_config = BrokerConfig {
        verify_ssl: config.verify_ssl,
        ..Default::default()
    };

    let compute = SessionManager::new(ComputeConnector::new(compute_config), "计算平台");
    let broker = SessionManager::new(BrokerConnector::new(broker_config), "桌面代理");

    let workflow = RefreshWorkflow::new(compute, broker, ConsoleOperator::new(), options);
    let summary = workflow.run().await;

    match summary.outcome {
        RefreshOutcome::Completed => {
            if summary.errors.is_empty() {
                info!("桌面池刷新完成");
            } else {
                warn!("桌面池刷新完成，但有 {} 个错误，详见报告", summary.errors.len());
            }
            Ok(())
        }
        RefreshOutcome::Aborted => {
            info!("操作员中止刷新，未做修改");
            Ok(())
        }
        RefreshOutcome::Failed(e) => Err(anyhow::Error::new(e).context("桌面池刷新失败")),
    }
}
