//! # Radar CLI
//!
//! 超声波扫描雷达的命令行工具，在模拟硬件上运行完整的扫描循环。
//!
//! ```bash
//! # 扫描 121 步（30° → 150° → 30°），60°–80° 之间 12cm 处有障碍物
//! radar-cli run --steps 121 --obstacle 60:80:12 --no-pace
//!
//! # 导出最后一帧画面
//! radar-cli run --steps 40 --obstacle 30:50:20 --no-pace --dump radar.ppm
//!
//! # 查看生效的配置
//! radar-cli config
//! ```
//!
//! 扫描报告（`角度,距离`）写到 stdout，日志写到 stderr。

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod sim;

use commands::{ConfigCommand, RunCommand};

/// Radar CLI - 超声波扫描雷达命令行工具
#[derive(Parser, Debug)]
#[command(name = "radar-cli")]
#[command(about = "Ultrasonic sweep radar on simulated hardware", long_about = None)]
#[command(version)]
struct Cli {
    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 运行扫描循环
    Run {
        #[command(flatten)]
        args: RunCommand,
    },

    /// 配置管理
    Config {
        #[command(flatten)]
        args: ConfigCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 日志写 stderr，stdout 只留给扫描报告
    let level = if cli.verbose { "radar_cli=debug" } else { "radar_cli=info" };
    let mut filter = EnvFilter::from_default_env().add_directive(level.parse()?);
    if cli.verbose {
        for crate_name in ["radar_control", "radar_canvas", "radar_driver"] {
            filter = filter.add_directive(format!("{}=debug", crate_name).parse()?);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { args } => args.execute(),
        Commands::Config { args } => args.execute(),
    }
}
