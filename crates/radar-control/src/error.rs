//! 扫描循环错误类型

use radar_canvas::CanvasError;
use radar_driver::{ActuatorError, SensorError};
use thiserror::Error;

/// 扫描循环错误
///
/// 单步错误由 [`SweepController::run`](crate::SweepController::run) 记录后吸收，
/// 只有 [`SweepController::step`](crate::SweepController::step) 会把它们返回给调用方。
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Sensor error: {0}")]
    Sensor(#[from] SensorError),

    #[error("Actuator error: {0}")]
    Actuator(#[from] ActuatorError),

    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),

    /// 报告输出失败
    #[error("Report sink error: {0}")]
    Report(#[from] std::io::Error),

    #[error("Invalid loop config: {0}")]
    Config(String),
}
