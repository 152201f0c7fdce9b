//! 夹爪开口归一化

use serde::{Deserialize, Serialize};

/// 完全张开时的开口宽度（米）
pub const DEFAULT_OPEN_WIDTH: f64 = 0.07;

/// 夹爪开口模型
///
/// 把物理开口 `[closed_width, open_width]` 线性映射到 `[0, 1]`，
/// 0 为闭合，1 为完全张开。两个方向都会截断到有效区间，从不报错。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GripperModel {
    pub open_width: f64,
    pub closed_width: f64,
}

impl GripperModel {
    pub fn new(open_width: f64, closed_width: f64) -> Self {
        Self {
            open_width,
            closed_width,
        }
    }

    fn span(&self) -> f64 {
        self.open_width - self.closed_width
    }

    /// 物理开口 → 归一化值
    pub fn normalize(&self, actual_width: f64) -> f64 {
        if self.span() <= 0.0 {
            return 0.0;
        }
        ((actual_width - self.closed_width) / self.span()).clamp(0.0, 1.0)
    }

    /// 归一化值 → 物理开口
    pub fn denormalize(&self, t: f64) -> f64 {
        self.closed_width + t.clamp(0.0, 1.0) * self.span()
    }
}

impl Default for GripperModel {
    fn default() -> Self {
        Self::new(DEFAULT_OPEN_WIDTH, 0.0)
    }
}
