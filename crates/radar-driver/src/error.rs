//! 驱动层错误类型定义

use embedded_hal::{digital, pwm};
use radar_hal::Deg;
use std::fmt;
use thiserror::Error;

/// 回波等待阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoPhase {
    /// 等待 Echo 升高（从 Trig 脉冲结束开始计时）
    Rise,
    /// 等待 Echo 回落（从升高时刻开始计时）
    Fall,
}

impl fmt::Display for EchoPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EchoPhase::Rise => write!(f, "echo rise"),
            EchoPhase::Fall => write!(f, "echo fall"),
        }
    }
}

/// 测距错误
#[derive(Error, Debug)]
pub enum SensorError {
    /// 回波超时（无障碍物或线路故障），调用方视为"未检测到"
    #[error("Echo timeout waiting for {phase} ({elapsed_us}µs)")]
    EchoTimeout { phase: EchoPhase, elapsed_us: u64 },

    /// Trig/Echo 引脚读写失败
    #[error("Pin error: {0:?}")]
    Pin(digital::ErrorKind),
}

impl SensorError {
    pub(crate) fn pin<E: digital::Error>(err: E) -> Self {
        SensorError::Pin(err.kind())
    }

    /// 是否为回波超时（非致命）
    pub fn is_timeout(&self) -> bool {
        matches!(self, SensorError::EchoTimeout { .. })
    }
}

/// 舵机错误
#[derive(Error, Debug)]
pub enum ActuatorError {
    /// 角度超出舵机行程
    #[error("Angle {angle} out of range [0°, {max}°]")]
    AngleOutOfRange { angle: Deg, max: u16 },

    /// 舵机参数无效
    #[error("Invalid servo config: {0}")]
    InvalidConfig(String),

    /// PWM 通道写入失败
    #[error("PWM error: {0:?}")]
    Pwm(pwm::ErrorKind),
}

impl ActuatorError {
    pub(crate) fn pwm<E: pwm::Error>(err: E) -> Self {
        ActuatorError::Pwm(err.kind())
    }
}
