//! 模拟硬件
//!
//! 用于测试和主机演示的确定性模拟实现，全部实现 `embedded-hal` 1.0 /
//! `embedded-graphics` 的标准 trait：
//!
//! - [`SimClock`] / [`SimDelay`]：共享的模拟时间，`DelayNs` 即推进时间
//! - [`SimSonar`]：Trig/Echo 引脚对（`OutputPin` / `InputPin`），Echo 电平由回波模型按模拟时间决定
//! - [`SimPwm`]：记录占空比的 `SetDutyCycle`
//! - [`FrameBuffer`]：内存中的 RGB565 `DrawTarget`
//!
//! 所有句柄都可以 `Clone`，克隆体共享同一份状态（`FrameBuffer` 除外，克隆即快照）。

mod clock;
mod framebuffer;
mod pwm;
mod sonar;

pub use clock::{SimClock, SimDelay};
pub use framebuffer::{DrawStats, FrameBuffer};
pub use pwm::SimPwm;
pub use sonar::{Echo, SimEcho, SimSonar, SimTrigger};

use thiserror::Error;

/// 模拟硬件的故障
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    #[error("echo line read failed")]
    ReadFailed,
    #[error("duty {duty} exceeds resolution {max}")]
    DutyOutOfRange { duty: u16, max: u16 },
}

impl embedded_hal::digital::Error for SimError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl embedded_hal::pwm::Error for SimError {
    fn kind(&self) -> embedded_hal::pwm::ErrorKind {
        embedded_hal::pwm::ErrorKind::Other
    }
}
