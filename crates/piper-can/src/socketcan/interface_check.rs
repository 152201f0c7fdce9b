//! CAN 接口状态检查
//!
//! 读取 `/sys/class/net/<iface>/flags` 判断接口是否存在且已启动（UP），
//! 只读操作，不需要特殊权限。

use crate::CanError;
use std::fs;
use std::path::Path;
use tracing::trace;

/// IFF_UP 标志位（`linux/if.h`）
const IFF_UP: u32 = 0x1;

/// IFNAMSIZ - 1
const MAX_IFACE_NAME_LEN: usize = 15;

/// 检查 CAN 接口是否存在且已启动
///
/// - `Ok(true)`: 接口存在且 IFF_UP 置位
/// - `Ok(false)`: 接口存在但处于 DOWN 状态
/// - `Err(CanError::Device)`: 接口不存在或接口名无效
pub fn check_interface_status(interface: &str) -> Result<bool, CanError> {
    check_interface_status_in(Path::new("/sys/class/net"), interface)
}

fn check_interface_status_in(sysfs_net: &Path, interface: &str) -> Result<bool, CanError> {
    if interface.is_empty()
        || interface.len() > MAX_IFACE_NAME_LEN
        || interface.contains(['/', '\0'])
    {
        return Err(CanError::Device(format!(
            "Invalid interface name '{}' (1-{} characters, no '/')",
            interface, MAX_IFACE_NAME_LEN
        )));
    }

    let flags_path = sysfs_net.join(interface).join("flags");
    let raw = fs::read_to_string(&flags_path).map_err(|_| {
        CanError::Device(format!(
            "CAN interface '{}' does not exist. Please create it first:\n  sudo ip link add dev {} type can",
            interface, interface
        ))
    })?;

    let flags = parse_flags(&raw).ok_or_else(|| {
        CanError::Device(format!(
            "Unexpected flags '{}' for interface '{}'",
            raw.trim(),
            interface
        ))
    })?;
    let is_up = flags & IFF_UP != 0;

    trace!(
        "Interface '{}' status: {}",
        interface,
        if is_up { "UP" } else { "DOWN" }
    );
    Ok(is_up)
}

/// 解析 sysfs 中形如 `0x40c1` 的标志位
fn parse_flags(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))?;
    u32::from_str_radix(hex, 16).ok()
}
