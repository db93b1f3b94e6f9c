//! # Radar Control
//!
//! 扫描雷达的控制循环：角度序列、单步编排（舵机 → 测距 → 重绘 → 报告）和节拍控制。
//!
//! 控制器只依赖 `radar-driver` 的 [`Rangefinder`](radar_driver::Rangefinder) /
//! [`Actuator`](radar_driver::Actuator) trait、`embedded-graphics` 的 `DrawTarget`
//! 和 `embedded-hal` 的 `DelayNs`，测试中直接接入 `radar-hal` 的模拟硬件。

mod error;
pub mod report;
pub mod runner;
pub mod sweep;

pub use error::SweepError;
pub use report::{LineSink, ReportSink, StepReport};
pub use runner::{RunSummary, SweepController};
pub use sweep::{Direction, LoopConfig, Reversal, SweepState};
