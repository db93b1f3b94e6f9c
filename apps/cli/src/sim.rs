//! 模拟硬件装配
//!
//! 用模拟时钟、模拟超声波、模拟 PWM 和内存帧缓冲搭出一台完整的雷达。
//! 回波模型读取舵机当前的占空比反推角度，再按 `--obstacle` 给出的扇区决定回波。

use embedded_hal::delay::DelayNs;
use radar_driver::ServoConfig;
use radar_hal::SpinDelay;
use radar_hal::mock::{Echo, SimClock, SimDelay, SimPwm, SimSonar};
use std::fmt;
use std::str::FromStr;

/// Trig 结束到 Echo 升高的模拟延迟（µs）
const ECHO_DELAY_US: u64 = 150;

/// 扇形障碍物：`[from, to]` 度范围内距离 `distance_cm`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub from: u16,
    pub to: u16,
    pub distance_cm: f64,
}

impl Obstacle {
    pub fn contains(&self, angle: u16) -> bool {
        (self.from..=self.to).contains(&angle)
    }
}

impl FromStr for Obstacle {
    type Err = String;

    /// 解析 `from:to:cm`，例如 `60:80:12.5`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let [from, to, cm] = parts.as_slice() else {
            return Err(format!("expected <from>:<to>:<cm>, got '{}'", s));
        };

        let from: u16 = from.parse().map_err(|_| format!("invalid start angle '{}'", from))?;
        let to: u16 = to.parse().map_err(|_| format!("invalid end angle '{}'", to))?;
        let distance_cm: f64 = cm.parse().map_err(|_| format!("invalid distance '{}'", cm))?;

        if from > to || to > 180 {
            return Err(format!("angle range {}..{} must be ordered within [0, 180]", from, to));
        }
        if !(distance_cm > 0.0) {
            return Err(format!("distance must be > 0, got {}", distance_cm));
        }
        Ok(Self {
            from,
            to,
            distance_cm,
        })
    }
}

impl fmt::Display for Obstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°–{}° @ {} cm", self.from, self.to, self.distance_cm)
    }
}

/// 由占空比反推舵机角度（四舍五入到整数度）
pub fn angle_from_duty(duty: u16, max_duty: u16, servo: &ServoConfig) -> u16 {
    if max_duty == 0 {
        return 0;
    }
    let pulse_us = f64::from(duty) * servo.period_us() / f64::from(max_duty);
    let span = servo.max_pulse_us - servo.min_pulse_us;
    let angle = (pulse_us - servo.min_pulse_us) / span * f64::from(servo.max_angle);
    angle.round().clamp(0.0, f64::from(servo.max_angle)) as u16
}

/// 模拟雷达硬件
pub struct SimRig {
    pub clock: SimClock,
    pub sonar: SimSonar,
    pub pwm: SimPwm,
}

impl SimRig {
    /// 16 位 PWM 的模拟雷达
    pub fn new(servo: &ServoConfig, obstacles: Vec<Obstacle>) -> Self {
        Self::with_pwm(servo, obstacles, SimPwm::default())
    }

    /// 使用指定分辨率的 PWM 通道
    pub fn with_pwm(servo: &ServoConfig, obstacles: Vec<Obstacle>, pwm: SimPwm) -> Self {
        let clock = SimClock::new();
        let sonar = SimSonar::new(clock.clone());

        let observer = pwm.clone();
        let servo = servo.clone();
        sonar.set_model(move |_ping| {
            let angle = angle_from_duty(observer.duty(), observer.max_duty(), &servo);
            match obstacles.iter().find(|o| o.contains(angle)) {
                Some(o) => Echo::for_distance_cm(ECHO_DELAY_US, o.distance_cm),
                None => Echo::Silent,
            }
        });

        Self { clock, sonar, pwm }
    }

    /// 扫描节拍延时：推进模拟时钟，`paced` 时同时真实等待
    pub fn step_delay(&self, paced: bool) -> PacedDelay {
        PacedDelay {
            sim: self.clock.delay(),
            real: paced.then(SpinDelay::new),
        }
    }
}

/// 同时推进模拟时钟和（可选）真实时间的延时
pub struct PacedDelay {
    sim: SimDelay,
    real: Option<SpinDelay>,
}

impl DelayNs for PacedDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.sim.delay_ns(ns);
        if let Some(real) = &mut self.real {
            real.delay_ns(ns);
        }
    }

    fn delay_us(&mut self, us: u32) {
        self.sim.delay_us(us);
        if let Some(real) = &mut self.real {
            real.delay_us(us);
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        self.sim.delay_ms(ms);
        if let Some(real) = &mut self.real {
            real.delay_ms(ms);
        }
    }
}
