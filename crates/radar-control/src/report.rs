//! 扫描报告
//!
//! 每一步输出一行 `"<角度>,<距离>"`，距离保留一位小数，未检测到时为 `0.0`。

use radar_hal::{Deg, Distance};
use std::fmt;
use std::io::{self, Write};

/// 单步扫描结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub angle: Deg,
    /// 量程内的检测距离；超时或超出量程为 `None`
    pub distance: Option<Distance>,
}

impl StepReport {
    pub fn is_detection(&self) -> bool {
        self.distance.is_some()
    }
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cm = self.distance.map_or(0.0, Distance::cm);
        write!(f, "{},{:.1}", self.angle.value(), cm)
    }
}

/// 报告接收端
pub trait ReportSink {
    fn emit(&mut self, report: &StepReport) -> io::Result<()>;
}

impl<F> ReportSink for F
where
    F: FnMut(&StepReport),
{
    fn emit(&mut self, report: &StepReport) -> io::Result<()> {
        self(report);
        Ok(())
    }
}

impl ReportSink for Vec<StepReport> {
    fn emit(&mut self, report: &StepReport) -> io::Result<()> {
        self.push(*report);
        Ok(())
    }
}

/// 按行写入 `Write` 的报告接收端（如串口、stdout）
#[derive(Debug)]
pub struct LineSink<W> {
    out: W,
}

impl<W: Write> LineSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for LineSink<W> {
    fn emit(&mut self, report: &StepReport) -> io::Result<()> {
        writeln!(self.out, "{}", report)?;
        self.out.flush()
    }
}
