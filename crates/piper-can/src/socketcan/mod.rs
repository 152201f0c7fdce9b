//! SocketCAN CAN 适配器实现
//!
//! ## 限制
//!
//! - **仅限 Linux 平台**：SocketCAN 是 Linux 内核特性
//! - **接口配置**：波特率等配置由系统工具（`ip link`）完成，不在应用层设置

use crate::{CanAdapter, CanError, PiperFrame};
use socketcan::{
    BlockingCan, CanError as SocketCanError, CanErrorFrame, CanFrame, CanSocket, EmbeddedFrame,
    ExtendedId, Frame, Socket, StandardId,
};
use std::io::ErrorKind;
use std::time::Duration;
use tracing::{error, trace, warn};

mod interface_check;

use interface_check::check_interface_status;

/// 默认读超时
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(10);

/// SocketCAN 适配器
///
/// ```no_run
/// use piper_can::{CanAdapter, PiperFrame, SocketCanAdapter};
///
/// let mut adapter = SocketCanAdapter::new("can0").unwrap();
/// adapter.send(PiperFrame::new_standard(0x150, &[0x02])).unwrap();
/// let rx_frame = adapter.receive().unwrap();
/// ```
#[derive(Debug)]
pub struct SocketCanAdapter {
    socket: CanSocket,
    interface: String,
}

impl SocketCanAdapter {
    /// 打开 CAN 接口
    ///
    /// 接口必须已存在且处于 UP 状态，否则返回带修复提示的 `CanError::Device`。
    pub fn new(interface: impl Into<String>) -> Result<Self, CanError> {
        let interface = interface.into();

        if !check_interface_status(&interface)? {
            return Err(CanError::Device(format!(
                "CAN interface '{}' exists but is not UP. Please start it first:\n  sudo ip link set up {}",
                interface, interface
            )));
        }

        let socket = CanSocket::open(&interface).map_err(|e| {
            CanError::Device(format!("Failed to open CAN interface '{}': {}", interface, e))
        })?;
        socket.set_read_timeout(DEFAULT_READ_TIMEOUT).map_err(CanError::Io)?;

        trace!("SocketCAN interface '{}' opened", interface);
        Ok(Self { socket, interface })
    }

    /// 设置读超时
    pub fn set_read_timeout(&mut self, timeout: Duration) -> Result<(), CanError> {
        // SO_RCVTIMEO 为 0 表示永久阻塞，这里最少 1ms
        let timeout = timeout.max(Duration::from_millis(1));
        self.socket.set_read_timeout(timeout).map_err(CanError::Io)
    }

    fn to_socketcan_frame(frame: &PiperFrame) -> Result<CanFrame, CanError> {
        let data = frame.data_slice();
        let can_frame = if frame.is_extended {
            ExtendedId::new(frame.id).and_then(|id| CanFrame::new(id, data))
        } else {
            StandardId::new(frame.id as u16).and_then(|id| CanFrame::new(id, data))
        };
        can_frame.ok_or_else(|| {
            CanError::Device(format!("Failed to create frame with ID 0x{:X}", frame.id))
        })
    }
}

impl CanAdapter for SocketCanAdapter {
    fn send(&mut self, frame: PiperFrame) -> Result<(), CanError> {
        let can_frame = Self::to_socketcan_frame(&frame)?;

        self.socket.transmit(&can_frame).map_err(|e| {
            CanError::Io(std::io::Error::other(format!(
                "SocketCAN transmit error: {}",
                e
            )))
        })?;

        trace!("Sent CAN frame: ID=0x{:X}, len={}", frame.id, frame.len);
        Ok(())
    }

    /// 接收帧，自动跳过错误帧；Bus Off 直接上报
    fn receive(&mut self) -> Result<PiperFrame, CanError> {
        loop {
            let can_frame = match self.socket.read_frame() {
                Ok(frame) => frame,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Err(CanError::Timeout);
                },
                Err(e) => return Err(CanError::Io(e)),
            };

            if can_frame.is_error_frame() {
                match CanErrorFrame::try_from(can_frame) {
                    Ok(error_frame) => match SocketCanError::from(error_frame) {
                        SocketCanError::BusOff => {
                            error!("CAN Bus Off error detected on '{}'", self.interface);
                            return Err(CanError::BusOff);
                        },
                        other => warn!("CAN Error Frame received: {}, ignoring", other),
                    },
                    Err(_) => warn!("Received CAN error frame but failed to parse, ignoring"),
                }
                continue;
            }

            let mut data = [0u8; 8];
            let frame_data = can_frame.data();
            let len = frame_data.len().min(8);
            data[..len].copy_from_slice(&frame_data[..len]);

            let frame = PiperFrame {
                id: can_frame.raw_id(),
                data,
                len: len as u8,
                is_extended: can_frame.is_extended(),
            };
            trace!("Received CAN frame: ID=0x{:X}, len={}", frame.id, frame.len);
            return Ok(frame);
        }
    }

    fn set_receive_timeout(&mut self, timeout: Duration) {
        if let Err(e) = self.set_read_timeout(timeout) {
            warn!("Failed to set receive timeout: {}", e);
        }
    }
}
