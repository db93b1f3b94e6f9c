//! run 命令
//!
//! 在模拟硬件上运行扫描循环，每步向 stdout 输出一行 `角度,距离`。

use anyhow::{Context, Result};
use clap::Args;
use radar_canvas::RadarCanvas;
use radar_control::{LineSink, SweepController};
use radar_driver::{RangeSensor, Servo};
use radar_hal::mock::FrameBuffer;
use radar_hal::{Clock, MonotonicClock};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use super::config::load_effective;
use crate::sim::{Obstacle, SimRig};

/// 扫描命令参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 配置文件路径（默认 `<config_dir>/radar/config.toml`）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 运行步数（覆盖配置；不指定则一直运行）
    #[arg(short, long)]
    pub steps: Option<usize>,

    /// 模拟障碍物 `<from>:<to>:<cm>`，可重复
    #[arg(short, long = "obstacle", value_name = "FROM:TO:CM")]
    pub obstacles: Vec<Obstacle>,

    /// 不做真实延时（只推进模拟时钟）
    #[arg(long)]
    pub no_pace: bool,

    /// 结束后把最后一帧导出为 PPM
    #[arg(long, value_name = "FILE")]
    pub dump: Option<PathBuf>,
}

impl RunCommand {
    pub fn execute(self) -> Result<()> {
        let mut config = load_effective(self.config.as_deref())?;
        if let Some(steps) = self.steps {
            config.sweep.max_steps = Some(steps);
        }
        config.validate().context("配置无效")?;

        if config.sweep.max_steps.is_none() && self.dump.is_some() {
            tracing::warn!("--dump has no effect without a step limit");
        }
        for obstacle in &self.obstacles {
            tracing::info!("simulated obstacle: {}", obstacle);
        }

        let rig = SimRig::new(&config.servo, self.obstacles);
        let sensor = RangeSensor::new(
            rig.sonar.trigger(),
            rig.sonar.echo(),
            rig.clock.clone(),
            rig.clock.delay(),
            config.sensor.clone(),
        );
        let servo = Servo::attach(rig.pwm.clone(), config.servo.clone()).context("舵机初始化失败")?;
        let panel = FrameBuffer::new(config.panel.width, config.panel.height)
            .with_orientation(config.panel.orientation);
        let canvas = RadarCanvas::new(panel, rig.clock.clone(), config.canvas.clone())
            .context("画布初始化失败")?;
        let delay = rig.step_delay(!self.no_pace);
        let sink = LineSink::new(io::stdout().lock());

        let mut controller =
            SweepController::new(sensor, servo, canvas, delay, sink, config.sweep.clone())?;

        let wall = MonotonicClock::new();
        let summary = controller.run()?;
        tracing::info!(
            "{} steps, {} detections, {} failed ({} ms simulated, {} ms wall)",
            summary.steps,
            summary.detections,
            summary.failures,
            rig.clock.now_ms(),
            wall.now_ms()
        );

        if let Some(path) = &self.dump {
            let file = File::create(path)
                .with_context(|| format!("创建文件失败: {}", path.display()))?;
            controller
                .canvas()
                .display()
                .write_ppm(BufWriter::new(file))
                .with_context(|| format!("写入画面失败: {}", path.display()))?;
            tracing::info!("frame written to {}", path.display());
        }
        Ok(())
    }
}
