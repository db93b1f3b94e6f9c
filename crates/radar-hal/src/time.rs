//! 主机平台的时钟与延时实现
//!
//! - [`MonotonicClock`]：基于 `std::time::Instant`，单调且不会回绕
//! - [`SpinDelay`]：基于 `spin_sleep` 的 [`DelayNs`]，微秒级延时精度（相比 `thread::sleep` 的 1-2ms）

use crate::Clock;
use embedded_hal::delay::DelayNs;
use spin_sleep::SpinSleeper;
use std::time::{Duration, Instant};

/// 以创建时刻为零点的单调微秒时钟
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}

/// 高精度阻塞延时
///
/// ⚠️ `spin_sleep` 在最后一段时间内自旋，会占用更多 CPU。
#[derive(Debug, Clone, Default)]
pub struct SpinDelay {
    sleeper: SpinSleeper,
}

impl SpinDelay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.sleeper.sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        self.sleeper.sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.sleeper.sleep(Duration::from_millis(u64::from(ms)));
    }
}
