//! 超声波测距（HC-SR04 类 Trig/Echo 协议）
//!
//! 一次测量：
//!
//! 1. Trig 拉低 2µs → 拉高 10µs → 拉低，模块发出超声波脉冲
//! 2. 忙等 Echo 升高（超时从 Trig 结束计时）
//! 3. 忙等 Echo 回落（超时从升高时刻计时）
//! 4. 高电平持续时间即声波往返时间，`distance = t × 0.0343 / 2`（cm）
//!
//! 两个忙等循环都以时钟为界，传感器或接线故障不会让控制循环卡死。

use crate::error::{EchoPhase, SensorError};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use radar_hal::{Clock, Distance};

/// 测距参数
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SensorConfig {
    /// 回波超时（µs），默认 30ms
    pub timeout_us: u64,
    /// Trig 拉高前的稳定时间（µs）
    pub settle_us: u32,
    /// Trig 高电平宽度（µs）
    pub trigger_pulse_us: u32,
    /// 声速（m/s）
    pub speed_of_sound_m_s: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            timeout_us: 30_000,
            settle_us: 2,
            trigger_pulse_us: 10,
            speed_of_sound_m_s: 343.0,
        }
    }
}

/// 测距能力
///
/// 扫描控制器只依赖此 trait，便于替换为其它测距模块。
pub trait Rangefinder {
    fn measure(&mut self) -> Result<Distance, SensorError>;
}

/// 超声波测距模块
pub struct RangeSensor<T, E, C, D> {
    trigger: T,
    echo: E,
    clock: C,
    delay: D,
    config: SensorConfig,
}

impl<T, E, C, D> RangeSensor<T, E, C, D>
where
    T: OutputPin,
    E: InputPin,
    C: Clock,
    D: DelayNs,
{
    pub fn new(trigger: T, echo: E, clock: C, delay: D, config: SensorConfig) -> Self {
        Self {
            trigger,
            echo,
            clock,
            delay,
            config,
        }
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// 使用配置的超时测量一次
    pub fn measure(&mut self) -> Result<Distance, SensorError> {
        self.measure_with_timeout(self.config.timeout_us)
    }

    /// 使用指定超时测量一次
    pub fn measure_with_timeout(&mut self, timeout_us: u64) -> Result<Distance, SensorError> {
        self.fire()?;

        let fired_at = self.clock.now_us();
        let start = self.wait_for_level(true, fired_at, timeout_us, EchoPhase::Rise)?;
        let end = self.wait_for_level(false, start, timeout_us, EchoPhase::Fall)?;

        let echo_us = end.saturating_sub(start);
        let distance = Distance::from_echo_us(echo_us, self.config.speed_of_sound_m_s);
        tracing::debug!("echo {}µs -> {}", echo_us, distance);
        Ok(distance)
    }

    /// 取回底层资源
    pub fn release(self) -> (T, E, C, D) {
        (self.trigger, self.echo, self.clock, self.delay)
    }

    /// 发出 Trig 脉冲
    fn fire(&mut self) -> Result<(), SensorError> {
        self.trigger.set_low().map_err(SensorError::pin)?;
        self.delay.delay_us(self.config.settle_us);
        self.trigger.set_high().map_err(SensorError::pin)?;
        self.delay.delay_us(self.config.trigger_pulse_us);
        self.trigger.set_low().map_err(SensorError::pin)?;
        Ok(())
    }

    /// 忙等 Echo 达到 `level`，返回观察到该电平的时刻
    fn wait_for_level(
        &mut self,
        level: bool,
        since_us: u64,
        timeout_us: u64,
        phase: EchoPhase,
    ) -> Result<u64, SensorError> {
        loop {
            if self.echo.is_high().map_err(SensorError::pin)? == level {
                return Ok(self.clock.now_us());
            }
            let elapsed_us = self.clock.elapsed_us(since_us);
            if elapsed_us > timeout_us {
                tracing::trace!("{} timeout after {}µs", phase, elapsed_us);
                return Err(SensorError::EchoTimeout { phase, elapsed_us });
            }
        }
    }
}

impl<T, E, C, D> Rangefinder for RangeSensor<T, E, C, D>
where
    T: OutputPin,
    E: InputPin,
    C: Clock,
    D: DelayNs,
{
    fn measure(&mut self) -> Result<Distance, SensorError> {
        RangeSensor::measure(self)
    }
}
