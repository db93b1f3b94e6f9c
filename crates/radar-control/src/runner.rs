//! Sweep Runner - 扫描循环
//!
//! 每一步依次执行：舵机转向 → 测距 → 分类 → 画布差分重绘 → 输出报告 → 延时。
//!
//! # 错误处理
//!
//! - 回波超时、超出量程：视为"未检测到"，不是错误
//! - 其余单步错误：[`SweepController::step`] 返回给调用方，
//!   [`SweepController::run`] 以 `warn!` 记录后继续下一步
//!
//! ```rust,ignore
//! let mut controller = SweepController::new(sensor, servo, canvas, delay, LineSink::new(stdout), config)?;
//! controller.run()?;
//! ```

use crate::report::{ReportSink, StepReport};
use crate::sweep::{LoopConfig, SweepState};
use crate::SweepError;
use radar_canvas::{CanvasState, RadarCanvas};
use radar_driver::{Actuator, Rangefinder};
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_hal::delay::DelayNs;
use radar_hal::{Clock, Deg};
use std::fmt;

/// 循环运行统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    pub detections: usize,
    pub failures: usize,
}

/// 扫描控制器
///
/// 独占传感器、舵机、画布和报告接收端；扫描状态只在 [`step`](Self::step) 中修改。
pub struct SweepController<S, A, D, C, W, R> {
    sensor: S,
    actuator: A,
    canvas: RadarCanvas<D, C>,
    delay: W,
    sink: R,
    config: LoopConfig,
    state: SweepState,
}

impl<S, A, D, C, W, R> SweepController<S, A, D, C, W, R>
where
    S: Rangefinder,
    A: Actuator,
    D: DrawTarget<Color = Rgb565>,
    D::Error: fmt::Debug,
    C: Clock,
    W: DelayNs,
    R: ReportSink,
{
    pub fn new(
        sensor: S,
        actuator: A,
        canvas: RadarCanvas<D, C>,
        delay: W,
        sink: R,
        config: LoopConfig,
    ) -> Result<Self, SweepError> {
        config.validate()?;
        Ok(Self {
            sensor,
            actuator,
            canvas,
            delay,
            sink,
            config,
            state: SweepState::new(),
        })
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn state(&self) -> &SweepState {
        &self.state
    }

    pub fn canvas(&self) -> &RadarCanvas<D, C> {
        &self.canvas
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn into_sink(self) -> R {
        self.sink
    }

    /// 给出下一个扫描角度（推进扫描状态）
    pub fn next_angle(&mut self) -> Deg {
        self.state.advance(&self.config)
    }

    /// 执行一步扫描
    ///
    /// 无论成功与否都会在结束时延时 `step_delay_ms`，错误时扫描角度同样前进。
    pub fn step(&mut self) -> Result<StepReport, SweepError> {
        let result = self.step_inner();
        if self.config.step_delay_ms > 0 {
            self.delay.delay_ms(self.config.step_delay_ms);
        }
        result
    }

    fn step_inner(&mut self) -> Result<StepReport, SweepError> {
        if self.canvas.state() == CanvasState::Empty {
            self.canvas.init_background()?;
        }

        let angle = self.next_angle();
        self.actuator.set_angle(angle)?;

        let max_range = self.canvas.geometry().max_range();
        let distance = match self.sensor.measure() {
            Ok(d) if d.is_within(max_range) => Some(d),
            Ok(d) => {
                tracing::debug!("{}: {} beyond {}", angle, d, max_range);
                None
            },
            Err(e) if e.is_timeout() => {
                tracing::debug!("{}: {}", angle, e);
                None
            },
            Err(e) => return Err(e.into()),
        };

        self.canvas.render_step(angle, distance)?;

        let report = StepReport { angle, distance };
        self.sink.emit(&report)?;
        Ok(report)
    }

    /// 运行扫描循环
    ///
    /// `max_steps` 为 `None` 时永不返回。单步错误记录后吸收；
    /// 只有背景无法绘制时才返回错误。
    pub fn run(&mut self) -> Result<RunSummary, SweepError> {
        if self.canvas.state() == CanvasState::Empty {
            self.canvas.init_background()?;
        }
        tracing::info!(
            "sweep started: [{}°, {}°] step {}° every {}ms ({:?})",
            self.config.low,
            self.config.high,
            self.config.step,
            self.config.step_delay_ms,
            self.config.reversal
        );

        let mut summary = RunSummary::default();
        loop {
            if let Some(max_steps) = self.config.max_steps
                && summary.steps >= max_steps
            {
                tracing::info!("sweep finished: {:?}", summary);
                return Ok(summary);
            }

            match self.step() {
                Ok(report) => {
                    if report.is_detection() {
                        summary.detections += 1;
                    }
                },
                Err(e) => {
                    summary.failures += 1;
                    tracing::warn!("sweep step {} failed: {}", summary.steps, e);
                },
            }
            summary.steps += 1;
        }
    }
}

