//! 驱动层模块
//!
//! 本 crate 提供扫描雷达的两个执行/感知部件：
//! - [`RangeSensor`]：超声波测距（Trig/Echo 协议，微秒级计时，有界超时）
//! - [`Servo`]：舵机角度 → 脉宽 → 占空比
//!
//! 二者分别实现 [`Rangefinder`] / [`Actuator`] trait，扫描控制器只依赖这两个 trait。
//!
//! 硬件侧直接使用 `embedded-hal` 1.0：`RangeSensor` 泛型于
//! `digital::{OutputPin, InputPin}` 与 `delay::DelayNs`，`Servo` 泛型于 `pwm::SetDutyCycle`。

mod error;
pub mod sensor;
pub mod servo;

pub use error::{ActuatorError, EchoPhase, SensorError};
pub use sensor::{RangeSensor, Rangefinder, SensorConfig};
pub use servo::{Actuator, Servo, ServoConfig};
