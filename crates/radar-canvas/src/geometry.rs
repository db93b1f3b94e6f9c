//! 雷达画布几何参数

use crate::CanvasError;
use embedded_graphics::geometry::Point;
use embedded_graphics::primitives::{Circle, Line};
use radar_hal::{Deg, Distance};

/// 画布几何参数
///
/// 默认值对应 160×128 横屏面板：圆心位于底边中点，半圆半径 80 像素。
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CanvasGeometry {
    /// 圆心 x（像素）
    pub center_x: i32,
    /// 圆心 y（像素）
    pub center_y: i32,
    /// 最大半径（像素），对应 `max_range_cm`
    pub max_radius: u16,
    /// 同心圆弧的半径间隔（像素）
    pub arc_step: u16,
    /// 圆弧上描点的角度间隔（度）
    pub arc_dot_step_deg: u16,
    /// 刻度线的角度间隔（度）
    pub tick_spacing_deg: u16,
    /// 障碍物标记半径（像素）
    pub marker_radius: u16,
    /// 最大可绘制距离（cm）
    pub max_range_cm: f64,
    /// 标记存活时间（ms）
    pub marker_expiry_ms: u64,
}

impl Default for CanvasGeometry {
    fn default() -> Self {
        Self {
            center_x: 80,
            center_y: 127,
            max_radius: 80,
            arc_step: 20,
            arc_dot_step_deg: 2,
            tick_spacing_deg: 30,
            marker_radius: 3,
            max_range_cm: 30.0,
            marker_expiry_ms: 1000,
        }
    }
}

impl CanvasGeometry {
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    #[inline]
    pub fn max_range(&self) -> Distance {
        Distance::from_cm(self.max_range_cm)
    }

    /// 极坐标 → 屏幕坐标（y 轴向上为正角方向，结果向零截断）
    pub fn polar_point(&self, radius: f64, degrees: f64) -> Point {
        let rad = degrees.to_radians();
        let x = f64::from(self.center_x) + radius * rad.cos();
        let y = f64::from(self.center_y) - radius * rad.sin();
        Point::new(x as i32, y as i32)
    }

    /// 扫描线（或刻度线）的外端点
    pub fn rim_point(&self, angle: Deg) -> Point {
        self.polar_point(f64::from(self.max_radius), f64::from(angle.value()))
    }

    /// 圆心到外端点的射线，扫描线与刻度线共用
    ///
    /// 绘制（1 像素描边）与背景模型（`points()`）都由这条 `Line` 生成，像素覆盖范围一致。
    pub fn sweep_line(&self, angle: Deg) -> Line {
        Line::new(self.center(), self.rim_point(angle))
    }

    /// 以 `center` 为圆心的标记圆盘（直径 `2 × marker_radius + 1`）
    pub fn marker_disc(&self, center: Point) -> Circle {
        Circle::with_center(center, 2 * u32::from(self.marker_radius) + 1)
    }

    /// 是否为刻度线角度
    pub fn is_tick_angle(&self, angle: Deg) -> bool {
        angle.value() <= 180 && angle.is_multiple_of(self.tick_spacing_deg)
    }

    /// 障碍物在屏幕上的位置
    ///
    /// 半径按 `distance / max_range × max_radius` 换算后取整（向零截断）。
    pub fn marker_center(&self, angle: Deg, distance: Distance) -> Point {
        let r = (distance.cm() / self.max_range_cm * f64::from(self.max_radius)).trunc();
        self.polar_point(r, f64::from(angle.value()))
    }

    pub fn validate(&self) -> Result<(), CanvasError> {
        let invalid = |msg: &str| Err(CanvasError::InvalidGeometry(msg.to_string()));
        if self.max_radius == 0 {
            return invalid("max_radius must be > 0");
        }
        if self.arc_step == 0 {
            return invalid("arc_step must be > 0");
        }
        if self.arc_dot_step_deg == 0 {
            return invalid("arc_dot_step_deg must be > 0");
        }
        if self.tick_spacing_deg == 0 {
            return invalid("tick_spacing_deg must be > 0");
        }
        if !(self.max_range_cm > 0.0) {
            return invalid("max_range_cm must be > 0");
        }
        Ok(())
    }
}
