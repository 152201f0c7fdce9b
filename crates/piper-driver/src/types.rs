//! 关节向量与夹爪读数
//!
//! ```rust
//! use piper_driver::JointVector;
//!
//! let start = JointVector::new([-1.593, 0.634, -0.286, 0.0, 0.385, -1.85]);
//! let target = start + JointVector::new([0.1, 0.0, -0.2, 0.0, 0.3, 0.0]);
//! assert_eq!(target.round_to(3)[0], -1.493);
//! ```

use std::fmt;
use std::ops::{Add, Index, IndexMut, Sub};

/// 关节数量
pub const JOINT_COUNT: usize = 6;

/// 按 `decimals` 位小数舍入（银行家舍入，.5 取偶）
pub fn round_decimals(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// 6 关节向量（弧度或角度，由调用方约定）
///
/// 长度固定为 6，无法构造出其他长度的向量。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointVector([f64; JOINT_COUNT]);

impl JointVector {
    pub const ZERO: Self = JointVector([0.0; JOINT_COUNT]);

    pub const fn new(values: [f64; JOINT_COUNT]) -> Self {
        JointVector(values)
    }

    /// 从切片创建，长度不为 6 时返回实际长度
    pub fn from_slice(values: &[f64]) -> Result<Self, usize> {
        <[f64; JOINT_COUNT]>::try_from(values)
            .map(JointVector)
            .map_err(|_| values.len())
    }

    pub fn as_array(&self) -> &[f64; JOINT_COUNT] {
        &self.0
    }

    pub fn into_array(self) -> [f64; JOINT_COUNT] {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }

    /// 逐元素映射
    pub fn map(self, f: impl FnMut(f64) -> f64) -> Self {
        JointVector(self.0.map(f))
    }

    /// 逐元素合并两个向量
    pub fn zip_map(self, other: Self, mut f: impl FnMut(f64, f64) -> f64) -> Self {
        let mut out = [0.0; JOINT_COUNT];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = f(self.0[i], other.0[i]);
        }
        JointVector(out)
    }

    /// 逐元素舍入到 `decimals` 位小数
    pub fn round_to(self, decimals: i32) -> Self {
        self.map(|v| round_decimals(v, decimals))
    }

    /// 所有分量均为有限值
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl From<[f64; JOINT_COUNT]> for JointVector {
    fn from(values: [f64; JOINT_COUNT]) -> Self {
        JointVector(values)
    }
}

impl Index<usize> for JointVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl IndexMut<usize> for JointVector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl Add for JointVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip_map(rhs, |a, b| a + b)
    }
}

impl Sub for JointVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.zip_map(rhs, |a, b| a - b)
    }
}

impl fmt::Display for JointVector {
    /// 输出形如 `[-1.593, 0.634, -0.286, 0, 0.385, -1.85]`，
    /// 指定精度时（`{:.1}`）每个分量按该精度输出
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match f.precision() {
                Some(precision) => write!(f, "{:.*}", precision, value)?,
                None => write!(f, "{}", value)?,
            }
        }
        write!(f, "]")
    }
}

/// 夹爪读数
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GripperReading {
    /// 开口宽度（米）
    pub position: f64,
    /// 力矩（N·m）
    pub effort: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_decimals() {
        assert_eq!(round_decimals(0.12345, 3), 0.123);
        assert_eq!(round_decimals(-1.5926, 3), -1.593);
        assert_eq!(round_decimals(45.04, 1), 45.0);
        // .5 取偶
        assert_eq!(round_decimals(0.5, 0), 0.0);
        assert_eq!(round_decimals(1.5, 0), 2.0);
    }

    #[test]
    fn test_from_slice_requires_six() {
        assert!(JointVector::from_slice(&[0.0; 6]).is_ok());
        assert_eq!(JointVector::from_slice(&[0.0; 5]), Err(5));
        assert_eq!(JointVector::from_slice(&[0.0; 7]), Err(7));
    }

    #[test]
    fn test_add_sub_elementwise() {
        let a = JointVector::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = JointVector::new([0.5; 6]);
        assert_eq!((a + b)[5], 6.5);
        assert_eq!((a - b)[0], 0.5);
    }

    #[test]
    fn test_display() {
        let v = JointVector::new([-1.593, 0.634, -0.286, 0.0, 0.385, -1.85]);
        assert_eq!(v.to_string(), "[-1.593, 0.634, -0.286, 0, 0.385, -1.85]");
        assert_eq!(
            format!("{:.1}", JointVector::new([45.0, -30.0, 15.0, 10.0, -70.0, 45.0])),
            "[45.0, -30.0, 15.0, 10.0, -70.0, 45.0]"
        );
    }

    #[test]
    fn test_is_finite() {
        assert!(JointVector::ZERO.is_finite());
        let mut v = JointVector::ZERO;
        v[2] = f64::NAN;
        assert!(!v.is_finite());
    }
}
