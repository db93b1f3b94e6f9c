//! 舵机驱动
//!
//! 标准航模舵机：50Hz（20ms 周期），脉宽 500µs–2500µs 线性对应 0°–180°。
//!
//! ```text
//! pulse_us = min_pulse + (max_pulse - min_pulse) × angle / max_angle
//! duty     = trunc(pulse_us × max_duty / period_us)
//! ```
//!
//! `max_duty` 取自 PWM 通道的 [`SetDutyCycle::max_duty_cycle`]（16 位 PWM 为 65535），
//! 因此同一份配置适用于不同分辨率的目标平台。
//!
//! ⚠️ `SetDutyCycle` 不包含频率设置：PWM 通道须由平台 HAL 预先配置为 `frequency_hz`。

use crate::error::ActuatorError;
use embedded_hal::pwm::SetDutyCycle;
use radar_hal::Deg;

/// 舵机参数
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ServoConfig {
    /// PWM 通道频率（Hz），用于计算周期
    pub frequency_hz: u32,
    /// 0° 对应脉宽（µs）
    pub min_pulse_us: f64,
    /// `max_angle` 对应脉宽（µs）
    pub max_pulse_us: f64,
    /// 舵机行程（度）
    pub max_angle: u16,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 50,
            min_pulse_us: 500.0,
            max_pulse_us: 2500.0,
            max_angle: 180,
        }
    }
}

impl ServoConfig {
    /// PWM 周期（µs）
    pub fn period_us(&self) -> f64 {
        1_000_000.0 / f64::from(self.frequency_hz)
    }

    /// 角度对应的脉宽（µs）
    pub fn pulse_width_us(&self, angle: Deg) -> f64 {
        self.min_pulse_us
            + (self.max_pulse_us - self.min_pulse_us) * f64::from(angle.value())
                / f64::from(self.max_angle)
    }

    /// 角度对应的占空比（按 `max_duty` 分辨率缩放）
    ///
    /// `validate()` 保证脉宽不超过周期，结果不会超过 `max_duty`。
    pub fn duty_for(&self, angle: Deg, max_duty: u16) -> u16 {
        (self.pulse_width_us(angle) * f64::from(max_duty) / self.period_us()) as u16
    }

    pub fn validate(&self) -> Result<(), ActuatorError> {
        if self.frequency_hz == 0 {
            return Err(ActuatorError::InvalidConfig(
                "frequency_hz must be > 0".to_string(),
            ));
        }
        if self.max_angle == 0 {
            return Err(ActuatorError::InvalidConfig(
                "max_angle must be > 0".to_string(),
            ));
        }
        if !(self.min_pulse_us >= 0.0 && self.min_pulse_us < self.max_pulse_us) {
            return Err(ActuatorError::InvalidConfig(format!(
                "pulse range [{}, {}]µs is empty",
                self.min_pulse_us, self.max_pulse_us
            )));
        }
        if self.max_pulse_us > self.period_us() {
            return Err(ActuatorError::InvalidConfig(format!(
                "max pulse {}µs exceeds PWM period {}µs",
                self.max_pulse_us,
                self.period_us()
            )));
        }
        Ok(())
    }
}

/// 执行器能力
pub trait Actuator {
    fn set_angle(&mut self, angle: Deg) -> Result<(), ActuatorError>;
}

/// PWM 舵机
pub struct Servo<P> {
    pwm: P,
    config: ServoConfig,
    current: Option<Deg>,
}

impl<P: SetDutyCycle> Servo<P> {
    /// 校验参数并接管 PWM 通道（不会立即转动）
    pub fn attach(pwm: P, config: ServoConfig) -> Result<Self, ActuatorError> {
        config.validate()?;
        tracing::debug!(
            "servo attached: {}Hz, {}-{}µs, resolution {}",
            config.frequency_hz,
            config.min_pulse_us,
            config.max_pulse_us,
            pwm.max_duty_cycle()
        );
        Ok(Self {
            pwm,
            config,
            current: None,
        })
    }

    pub fn config(&self) -> &ServoConfig {
        &self.config
    }

    /// 最近一次下发的角度
    pub fn angle(&self) -> Option<Deg> {
        self.current
    }

    /// 转到指定角度，返回下发的占空比
    ///
    /// 重复下发同一角度是安全的，产生相同的占空比。
    pub fn set_angle(&mut self, angle: Deg) -> Result<u16, ActuatorError> {
        if angle.value() > self.config.max_angle {
            return Err(ActuatorError::AngleOutOfRange {
                angle,
                max: self.config.max_angle,
            });
        }
        let duty = self.config.duty_for(angle, self.pwm.max_duty_cycle());
        self.pwm.set_duty_cycle(duty).map_err(ActuatorError::pwm)?;
        self.current = Some(angle);
        tracing::trace!("servo -> {} (duty {})", angle, duty);
        Ok(duty)
    }

    pub fn release(self) -> P {
        self.pwm
    }
}

impl<P: SetDutyCycle> Actuator for Servo<P> {
    fn set_angle(&mut self, angle: Deg) -> Result<(), ActuatorError> {
        Servo::set_angle(self, angle).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radar_hal::mock::SimPwm;

    #[test]
    fn test_pulse_width_endpoints() {
        let config = ServoConfig::default();
        assert_eq!(config.pulse_width_us(Deg(0)), 500.0);
        assert_eq!(config.pulse_width_us(Deg(90)), 1500.0);
        assert_eq!(config.pulse_width_us(Deg(180)), 2500.0);
        assert_eq!(config.period_us(), 20_000.0);
    }

    #[test]
    fn test_duty_16_bit() {
        let config = ServoConfig::default();
        // 1500 × 65535 / 20000 = 4915.125
        assert_eq!(config.duty_for(Deg(90), 65535), 4915);
        // 500 × 65535 / 20000 = 1638.375
        assert_eq!(config.duty_for(Deg(0), 65535), 1638);
        // 2500 × 65535 / 20000 = 8191.875
        assert_eq!(config.duty_for(Deg(180), 65535), 8191);
    }

    #[test]
    fn test_duty_scales_with_resolution() {
        let config = ServoConfig::default();
        // 10 位 PWM：1500 × 1023 / 20000 = 76.725
        assert_eq!(config.duty_for(Deg(90), 1023), 76);
    }

    #[test]
    fn test_attach_does_not_move() {
        let pwm = SimPwm::default();
        let servo = Servo::attach(pwm.clone(), ServoConfig::default()).unwrap();
        assert_eq!(pwm.writes(), 0);
        assert_eq!(servo.angle(), None);

        let bad = ServoConfig {
            max_angle: 0,
            ..Default::default()
        };
        assert!(Servo::attach(SimPwm::default(), bad).is_err());
    }

    #[test]
    fn test_uses_channel_resolution() {
        let pwm = SimPwm::new(1023);
        let mut servo = Servo::attach(pwm.clone(), ServoConfig::default()).unwrap();
        assert_eq!(servo.set_angle(Deg(90)).unwrap(), 76);
        assert_eq!(pwm.duty(), 76);
    }

    #[test]
    fn test_pwm_failure_maps_error_kind() {
        use embedded_hal::pwm::{ErrorKind, ErrorType};

        /// 写入总是失败的通道
        struct Broken;

        impl ErrorType for Broken {
            type Error = ErrorKind;
        }

        impl SetDutyCycle for Broken {
            fn max_duty_cycle(&self) -> u16 {
                1000
            }

            fn set_duty_cycle(&mut self, _duty: u16) -> Result<(), ErrorKind> {
                Err(ErrorKind::Other)
            }
        }

        let mut servo = Servo::attach(Broken, ServoConfig::default()).unwrap();
        assert!(matches!(
            servo.set_angle(Deg(90)),
            Err(ActuatorError::Pwm(ErrorKind::Other))
        ));
        assert_eq!(servo.angle(), None);
    }

    #[test]
    fn test_set_angle_is_idempotent() {
        let pwm = SimPwm::default();
        let mut servo = Servo::attach(pwm.clone(), ServoConfig::default()).unwrap();

        let first = servo.set_angle(Deg(60)).unwrap();
        let second = servo.set_angle(Deg(60)).unwrap();
        assert_eq!(first, second);
        assert_eq!(pwm.duty(), first);
        assert_eq!(pwm.writes(), 2);
        assert_eq!(servo.angle(), Some(Deg(60)));
    }

    #[test]
    fn test_rejects_out_of_range_angle() {
        let pwm = SimPwm::default();
        let mut servo = Servo::attach(pwm.clone(), ServoConfig::default()).unwrap();
        assert!(matches!(
            servo.set_angle(Deg(181)),
            Err(ActuatorError::AngleOutOfRange { max: 180, .. })
        ));
        assert_eq!(pwm.writes(), 0);
    }

    #[test]
    fn test_invalid_config() {
        let bad = [
            ServoConfig {
                frequency_hz: 0,
                ..Default::default()
            },
            ServoConfig {
                max_angle: 0,
                ..Default::default()
            },
            ServoConfig {
                min_pulse_us: 2500.0,
                max_pulse_us: 500.0,
                ..Default::default()
            },
            ServoConfig {
                frequency_hz: 1000,
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(ActuatorError::InvalidConfig(_))),
                "{:?} should be rejected",
                config
            );
        }
    }
}
