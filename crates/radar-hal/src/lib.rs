//! # Radar HAL
//!
//! 扫描雷达的硬件边界。
//!
//! 引脚、PWM 和延时直接使用 [`embedded_hal`] 1.0 的 trait
//! （`digital::{OutputPin, InputPin}`、`pwm::SetDutyCycle`、`delay::DelayNs`），
//! 显示屏使用 `embedded-graphics` 的 `DrawTarget<Color = Rgb565>`。
//! 这样任何现成的 HAL 引脚和 ST7735/ILI9341 驱动都可以直接接入。
//!
//! 本 crate 只补充 `embedded-hal` 没有覆盖的部分：
//!
//! - [`Clock`]：单调微秒时钟（用于回波计时与标记过期）
//! - [`Orientation`]：面板方向配置
//! - [`Deg`] / [`Distance`]：强类型单位
//! - [`MonotonicClock`] / [`SpinDelay`]：主机平台实现
//!
//! 启用 `mock` feature 后可使用 [`mock`] 模块中的模拟硬件。

pub mod time;
pub mod units;

#[cfg(feature = "mock")]
pub mod mock;

pub use time::{MonotonicClock, SpinDelay};
pub use units::{Deg, Distance};

/// 屏幕方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
    PortraitFlipped,
    LandscapeFlipped,
}

impl Orientation {
    /// 是否交换面板原生宽高
    pub const fn is_portrait(self) -> bool {
        matches!(self, Orientation::Portrait | Orientation::PortraitFlipped)
    }
}

/// 单调时钟（微秒）
///
/// 时间以 `u64` 微秒表示，从任意起点开始计数，进程生命周期内不会回绕。
pub trait Clock {
    fn now_us(&self) -> u64;

    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    /// 自 `since_us` 起经过的微秒数（时钟不会倒退，饱和减法仅作兜底）
    fn elapsed_us(&self, since_us: u64) -> u64 {
        self.now_us().saturating_sub(since_us)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}
