use anyhow::{Context, Result};
use clap::Parser;
use task_console_config::{AppConfig, LogConfig, LogLevel, OutputFormat};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;

use app::{Commands, ConsoleApp};

/// 定时任务管理台命令行
#[derive(Parser, Debug)]
#[command(name = "task-console")]
#[command(version = "1.0.0")]
#[command(about = "定时任务管理台 - 任务表单规范化、验证与提交")]
#[command(
    long_about = "从文件读取任务草稿或已有任务记录，完成验证、规范化并输出提交载荷"
)]
struct CliApp {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// 日志级别，覆盖配置文件
    #[arg(short, long, global = true)]
    log_level: Option<LogLevel>,

    /// 日志格式 (json/pretty)，覆盖配置文件
    #[arg(long, global = true)]
    log_format: Option<OutputFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliApp::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).with_context(|| {
        format!(
            "加载配置失败: {}",
            cli.config.as_deref().unwrap_or("<默认路径>")
        )
    })?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    init_logging(&config.logging)?;

    info!("启动定时任务管理台");
    debug!("当前配置: {:?}", config);

    ConsoleApp::new(config).run(cli.command).await
}

/// 初始化日志系统，日志写到 stderr，stdout 只输出结果
fn init_logging(logging: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive()));

    let registry = tracing_subscriber::registry().with(env_filter);

    match logging.format {
        OutputFormat::Json => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .context("初始化JSON日志格式失败")?;
        }
        OutputFormat::Pretty => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .context("初始化Pretty日志格式失败")?;
        }
    }

    Ok(())
}
