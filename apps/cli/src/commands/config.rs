//! 配置管理命令

use crate::robot::Settings;
use anyhow::{Context, Result, bail};
use clap::Subcommand;
use piper_control::TeleopConfig;

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 以 TOML 输出生效的配置
    Show,

    /// 写入默认配置文件
    Init {
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },

    /// 输出配置文件路径
    Path,
}

impl ConfigCommand {
    pub fn execute(self, settings: &Settings) -> Result<()> {
        match self {
            ConfigCommand::Show => {
                let config = settings.load_config()?;
                print!("{}", config.to_toml_string()?);
                Ok(())
            },

            ConfigCommand::Init { force } => {
                let path = settings.config_path()?;
                if path.exists() && !force {
                    bail!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    );
                }
                TeleopConfig::default()
                    .save(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Wrote default config to {}", path.display());
                Ok(())
            },

            ConfigCommand::Path => {
                println!("{}", settings.config_path()?.display());
                Ok(())
            },
        }
    }
}
