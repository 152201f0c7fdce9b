//! 关节坐标换算
//!
//! 纯函数，不做 I/O。相对坐标总是以起始位姿为原点。
//! 弧度输出舍入到 3 位小数，角度输出舍入到 1 位小数。

use piper_driver::JointVector;

/// 弧度输出的小数位数
pub const RADIAN_DECIMALS: i32 = 3;
/// 角度输出的小数位数
pub const DEGREE_DECIMALS: i32 = 1;

/// 绝对 → 相对（逐元素相减，舍入到 3 位小数）
pub fn to_relative(absolute: JointVector, start: JointVector) -> JointVector {
    (absolute - start).round_to(RADIAN_DECIMALS)
}

/// 相对 → 绝对（逐元素相加，不舍入）
pub fn to_absolute(relative: JointVector, start: JointVector) -> JointVector {
    start + relative
}

/// 弧度 → 角度，舍入到 1 位小数（仅用于显示）
pub fn radians_to_degrees(radians: JointVector) -> JointVector {
    radians.map(f64::to_degrees).round_to(DEGREE_DECIMALS)
}

/// 角度 → 弧度（不舍入）
pub fn degrees_to_radians(degrees: JointVector) -> JointVector {
    degrees.map(f64::to_radians)
}
