//! 遥操作配置文件
//!
//! 默认位置为 `<config_dir>/piper/teleop.toml`，文件不存在时使用默认值。
//!
//! ```toml
//! [arm]
//! start_pose = [-1.593, 0.634, -0.286, 0.0, 0.385, -1.85]
//!
//! [gripper]
//! open_width = 0.07
//! closed_width = 0.0
//! effort = 1.0
//!
//! [can]
//! interface = "can0"
//! speed_percent = 50
//! feedback_timeout_ms = 100
//! ```

use crate::DEFAULT_START_POSE;
use crate::gripper::{DEFAULT_OPEN_WIDTH, GripperModel};
use piper_driver::{JOINT_COUNT, JointVector};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};
use thiserror::Error;
use tracing::debug;

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "teleop.toml";

/// 夹爪力矩上限（N·m）
pub const MAX_GRIPPER_EFFORT: f64 = 5.0;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Could not determine the user config directory")]
    NoConfigDir,
}

/// 机械臂配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmConfig {
    /// 起始位姿（弧度），相对命令的原点
    pub start_pose: [f64; JOINT_COUNT],
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            start_pose: DEFAULT_START_POSE,
        }
    }
}

/// 夹爪配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GripperConfig {
    /// 完全张开宽度（米）
    pub open_width: f64,
    /// 闭合宽度（米）
    pub closed_width: f64,
    /// 夹持力矩（N·m）
    pub effort: f64,
}

impl Default for GripperConfig {
    fn default() -> Self {
        Self {
            open_width: DEFAULT_OPEN_WIDTH,
            closed_width: 0.0,
            effort: 1.0,
        }
    }
}

/// CAN 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanConfig {
    pub interface: String,
    /// MOVE J 速度百分比（1-100）
    pub speed_percent: u8,
    /// 等待反馈帧的超时（毫秒）
    pub feedback_timeout_ms: u64,
}

impl Default for CanConfig {
    fn default() -> Self {
        Self {
            interface: "can0".to_string(),
            speed_percent: 50,
            feedback_timeout_ms: 100,
        }
    }
}

/// 遥操作配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleopConfig {
    pub arm: ArmConfig,
    pub gripper: GripperConfig,
    pub can: CanConfig,
}

impl TeleopConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        path.push("piper");
        path.push(CONFIG_FILE_NAME);
        Ok(path)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 从文件加载并校验
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// 文件存在则加载，否则返回默认值
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// 写入文件（自动创建父目录）
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, content).map_err(io_err)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.arm.start_pose.iter().all(|v| v.is_finite()) {
            return Err(ConfigError::Invalid(
                "arm.start_pose must contain finite values".to_string(),
            ));
        }

        let g = &self.gripper;
        if !g.open_width.is_finite() || !g.closed_width.is_finite() {
            return Err(ConfigError::Invalid(
                "gripper widths must be finite".to_string(),
            ));
        }
        if g.closed_width < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "gripper.closed_width must be >= 0, got {}",
                g.closed_width
            )));
        }
        if g.open_width <= g.closed_width {
            return Err(ConfigError::Invalid(format!(
                "gripper.open_width ({}) must be greater than gripper.closed_width ({})",
                g.open_width, g.closed_width
            )));
        }
        if !g.effort.is_finite() || !(0.0..=MAX_GRIPPER_EFFORT).contains(&g.effort) {
            return Err(ConfigError::Invalid(format!(
                "gripper.effort must be in 0..={} N·m, got {}",
                MAX_GRIPPER_EFFORT, g.effort
            )));
        }

        if !(1..=100).contains(&self.can.speed_percent) {
            return Err(ConfigError::Invalid(format!(
                "can.speed_percent must be in 1..=100, got {}",
                self.can.speed_percent
            )));
        }
        if self.can.feedback_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "can.feedback_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn start_pose(&self) -> JointVector {
        JointVector::new(self.arm.start_pose)
    }

    pub fn gripper_model(&self) -> GripperModel {
        GripperModel::new(self.gripper.open_width, self.gripper.closed_width)
    }

    pub fn feedback_timeout(&self) -> Duration {
        Duration::from_millis(self.can.feedback_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = TeleopConfig::default();
        config.validate().unwrap();
        assert_eq!(config.start_pose()[0], -1.593);
        assert_eq!(config.gripper_model(), GripperModel::default());
        assert_eq!(config.feedback_timeout(), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = TeleopConfig::from_toml_str(
            r#"
[can]
interface = "vcan0"
"#,
        )
        .unwrap();
        assert_eq!(config.can.interface, "vcan0");
        assert_eq!(config.can.speed_percent, 50);
        assert_eq!(config.gripper.open_width, 0.07);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = TeleopConfig::default();
        config.arm.start_pose = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5];
        let text = config.to_toml_string().unwrap();
        assert_eq!(TeleopConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_wrong_pose_length_rejected() {
        assert!(TeleopConfig::from_toml_str("[arm]\nstart_pose = [0.0, 1.0]\n").is_err());
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = TeleopConfig::default();
        config.gripper.open_width = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = TeleopConfig::default();
        config.can.speed_percent = 0;
        assert!(config.validate().is_err());

        let mut config = TeleopConfig::default();
        config.can.feedback_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = TeleopConfig::default();
        config.arm.start_pose[2] = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = TeleopConfig::default();
        config.gripper.effort = -1.0;
        assert!(config.validate().is_err());

        let mut config = TeleopConfig::default();
        config.gripper.effort = 40.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("gripper.effort"));

        config.gripper.effort = MAX_GRIPPER_EFFORT;
        config.validate().unwrap();
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        assert_eq!(
            TeleopConfig::load_or_default(&path).unwrap(),
            TeleopConfig::default()
        );

        let mut config = TeleopConfig::default();
        config.can.speed_percent = 30;
        config.save(&path).unwrap();
        assert_eq!(TeleopConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_load_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[can\n").unwrap();
        assert!(matches!(
            TeleopConfig::load_from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
