use crate::Clock;
use embedded_hal::delay::DelayNs;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 模拟单调时钟（微秒）
///
/// 时间只在调用 [`advance_us`](Self::advance_us) 或通过 [`SimDelay`] 延时时推进。
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now_us: Arc<AtomicU64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从指定时刻开始的时钟
    pub fn starting_at(us: u64) -> Self {
        Self {
            now_us: Arc::new(AtomicU64::new(us)),
        }
    }

    pub fn advance_us(&self, us: u64) {
        self.now_us.fetch_add(us, Ordering::Relaxed);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms * 1000);
    }

    /// 由此时钟驱动的延时
    pub fn delay(&self) -> SimDelay {
        SimDelay {
            clock: self.clone(),
        }
    }
}

impl Clock for SimClock {
    fn now_us(&self) -> u64 {
        self.now_us.load(Ordering::Relaxed)
    }
}

/// 模拟延时：不真正睡眠，只推进共享的 [`SimClock`]
#[derive(Debug, Clone)]
pub struct SimDelay {
    clock: SimClock,
}

impl DelayNs for SimDelay {
    /// 不足 1µs 的部分向上取整
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_us(u64::from(ns).div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.clock.advance_us(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance_ms(u64::from(ms));
    }
}
