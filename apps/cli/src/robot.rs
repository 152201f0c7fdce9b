//! 配置加载与机械臂连接

use anyhow::{Context, Result};
use piper_control::{ArmController, TeleopConfig};
use piper_driver::{HardwareDriver, MockDriver, PiperDriverBuilder};
use std::path::PathBuf;
use tracing::info;

/// 运行时使用的控制器
pub type Arm = ArmController<Box<dyn HardwareDriver>>;

/// 全局命令行选项
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub config_path: Option<PathBuf>,
    pub interface: Option<String>,
    pub mock: bool,
}

impl Settings {
    /// 实际使用的配置文件路径
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => TeleopConfig::default_path().context("Failed to locate config file"),
        }
    }

    /// 加载配置并应用命令行覆盖
    ///
    /// 显式指定的配置文件必须存在，默认位置的文件可以缺失。
    pub fn load_config(&self) -> Result<TeleopConfig> {
        let path = self.config_path()?;
        let mut config = if self.config_path.is_some() {
            TeleopConfig::load_from_file(&path)
        } else {
            TeleopConfig::load_or_default(&path)
        }
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

        if let Some(interface) = &self.interface {
            config.can.interface = interface.clone();
        }
        config.validate()?;
        Ok(config)
    }

    /// 按配置创建控制器
    pub fn connect(&self) -> Result<Arm> {
        let config = self.load_config()?;
        let driver: Box<dyn HardwareDriver> = if self.mock {
            info!("Using simulated arm");
            Box::new(MockDriver::new())
        } else {
            info!("Connecting to arm on {}", config.can.interface);
            let driver = PiperDriverBuilder::new()
                .interface(config.can.interface.as_str())
                .speed_percent(config.can.speed_percent)
                .gripper_effort(config.gripper.effort)
                .feedback_timeout(config.feedback_timeout())
                .build()
                .with_context(|| format!("Failed to open CAN interface {}", config.can.interface))?;
            Box::new(driver)
        };

        Ok(ArmController::new(
            driver,
            config.start_pose(),
            config.gripper_model(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_interface_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teleop.toml");
        fs::write(&path, "[can]\ninterface = \"can1\"\n").unwrap();

        let settings = Settings {
            config_path: Some(path),
            interface: Some("vcan0".to_string()),
            mock: true,
        };
        assert_eq!(settings.load_config().unwrap().can.interface, "vcan0");
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            config_path: Some(dir.path().join("missing.toml")),
            ..Default::default()
        };
        assert!(settings.load_config().is_err());
    }

    #[test]
    fn test_mock_connect_uses_config_start_pose() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teleop.toml");
        fs::write(&path, "[arm]\nstart_pose = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6]\n").unwrap();

        let settings = Settings {
            config_path: Some(path),
            interface: None,
            mock: true,
        };
        let arm = settings.connect().unwrap();
        assert_eq!(arm.start_pose()[5], 0.6);
    }
}
