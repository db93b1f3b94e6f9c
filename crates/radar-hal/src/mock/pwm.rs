use super::SimError;
use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, AtomicU64, Ordering};

#[derive(Debug, Default)]
struct PwmState {
    duty: AtomicU16,
    writes: AtomicU64,
}

/// 模拟 PWM 通道
///
/// 克隆体共享状态，测试可以保留一个句柄观察舵机驱动写入的占空比。
/// 与真实 HAL 一样，频率在创建通道时确定，不经过 `SetDutyCycle`。
#[derive(Debug, Clone)]
pub struct SimPwm {
    max_duty: u16,
    state: Arc<PwmState>,
}

impl SimPwm {
    /// 指定分辨率（`max_duty`），例如 16 位 PWM 为 65535、10 位为 1023
    pub fn new(max_duty: u16) -> Self {
        Self {
            max_duty,
            state: Arc::new(PwmState::default()),
        }
    }

    /// 与 [`SetDutyCycle::max_duty_cycle`] 相同，观察句柄无需引入 trait
    pub fn max_duty(&self) -> u16 {
        self.max_duty
    }

    pub fn duty(&self) -> u16 {
        self.state.duty.load(Ordering::Relaxed)
    }

    /// 占空比写入次数
    pub fn writes(&self) -> u64 {
        self.state.writes.load(Ordering::Relaxed)
    }
}

impl Default for SimPwm {
    fn default() -> Self {
        Self::new(u16::MAX)
    }
}

impl ErrorType for SimPwm {
    type Error = SimError;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max_duty
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        if duty > self.max_duty {
            return Err(SimError::DutyOutOfRange {
                duty,
                max: self.max_duty,
            });
        }
        self.state.duty.store(duty, Ordering::Relaxed);
        self.state.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
