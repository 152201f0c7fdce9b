//! # Piper Teleop
//!
//! Piper 机械臂的交互式遥操作控制台。
//!
//! ## 交互模式
//!
//! ```bash
//! $ piper-teleop shell
//! Start position (rad): [-1.593, 0.634, -0.286, 0, 0.385, -1.85]
//! ...
//! or 'g' for gripper control, 'q' to quit: +0.1 0 -0.2 0 0.3 0
//! ```
//!
//! ## One-shot 模式
//!
//! ```bash
//! piper-teleop position
//! piper-teleop home
//! piper-teleop --mock start
//! piper-teleop config init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod modes;
mod robot;

use commands::{ConfigCommand, MotionCommand, PositionCommand};
use modes::shell::run_shell;
use robot::Settings;

/// 默认日志过滤
const DEFAULT_LOG_FILTER: &str = "piper_teleop=info,piper_control=info";

/// Piper Teleop - 机械臂遥操作工具
#[derive(Parser, Debug)]
#[command(name = "piper-teleop")]
#[command(about = "Interactive teleoperation console for Piper robot arms", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 <config_dir>/piper/teleop.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CAN 接口（覆盖配置）
    #[arg(short, long, global = true)]
    interface: Option<String>,

    /// 使用内存中的模拟机械臂
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 启动交互式控制（默认）
    Shell {
        /// 不移动到起始位姿
        #[arg(long)]
        skip_start: bool,
    },

    /// 查询当前关节与夹爪状态
    Position,

    /// 所有关节回零
    Home,

    /// 移动到起始位姿
    Start,

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    // 日志输出到 stderr，stdout 只留给交互内容
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings {
        config_path: cli.config,
        interface: cli.interface,
        mock: cli.mock,
    };

    match cli.command.unwrap_or(Commands::Shell { skip_start: false }) {
        Commands::Shell { skip_start } => run_shell(&settings, skip_start),

        Commands::Position => PositionCommand.execute(&settings),

        Commands::Home => MotionCommand::Home.execute(&settings),

        Commands::Start => MotionCommand::Start.execute(&settings),

        Commands::Config(cmd) => cmd.execute(&settings),
    }
}
