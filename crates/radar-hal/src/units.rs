//! 强类型单位
//!
//! 使用 NewType 模式区分角度与距离，防止把舵机角度当作厘米传入画布。

use std::fmt;

/// 整数角度（度）
///
/// 舵机域为 [0, 180]，扫描域默认为 [30, 150]、步长 2。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Deg(pub u16);

impl Deg {
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// 是否为 `step` 的整数倍（`step` 为 0 时返回 false）
    #[inline]
    pub const fn is_multiple_of(self, step: u16) -> bool {
        step != 0 && self.0 % step == 0
    }
}

impl fmt::Display for Deg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl From<u16> for Deg {
    fn from(value: u16) -> Self {
        Deg(value)
    }
}

/// 距离（厘米）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Distance(pub f64);

impl Distance {
    pub const ZERO: Self = Distance(0.0);

    #[inline]
    pub const fn from_cm(cm: f64) -> Self {
        Distance(cm)
    }

    #[inline]
    pub const fn cm(self) -> f64 {
        self.0
    }

    /// 由回波往返时间换算距离
    ///
    /// `distance = echo_us × (speed_m_s / 10_000) / 2`，声速 343 m/s 时即 `echo_us × 0.0343 / 2`。
    #[inline]
    pub fn from_echo_us(echo_us: u64, speed_of_sound_m_s: f64) -> Self {
        Distance(echo_us as f64 * (speed_of_sound_m_s / 10_000.0) / 2.0)
    }

    /// 是否为可绘制的有效检测（0 < d ≤ max）
    #[inline]
    pub fn is_within(self, max: Distance) -> bool {
        self.0 > 0.0 && self.0 <= max.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} cm", self.0)
    }
}
