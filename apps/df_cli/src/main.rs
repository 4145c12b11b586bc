// apps/df_cli/src/main.rs

//! DebrisFlow 命令行界面
//!
//! 把 OpenFOAM 碎屑流算例的计算结果转换为 CSV / JSON。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 5: Application**：
//! - 只负责参数解析、日志初始化与结果展示
//! - 全部提取逻辑位于 `df_extract`

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// DebrisFlow 算例结果提取工具
#[derive(Parser)]
#[command(name = "df_cli")]
#[command(author = "DebrisFlow Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract OpenFOAM debris-flow case results to CSV/JSON", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 提取单个算例
    Extract(commands::extract::ExtractArgs),
    /// 批量提取编号算例
    Batch(commands::batch::BatchArgs),
    /// 采样点时间序列
    Probe(commands::probe::ProbeArgs),
    /// 导出示踪剂浓度 JSON
    ExportJson(commands::export_json::ExportJsonArgs),
    /// 显示算例信息
    Info(commands::info::InfoArgs),
    /// 配置文件管理
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 执行命令
    match cli.command {
        Commands::Extract(args) => commands::extract::execute(args),
        Commands::Batch(args) => commands::batch::execute(args),
        Commands::Probe(args) => commands::probe::execute(args),
        Commands::ExportJson(args) => commands::export_json::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Config(cmd) => commands::config::execute(cmd),
    }
}
