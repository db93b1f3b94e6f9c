//! 背景模型
//!
//! 静态背景（同心半圆弧 + 径向刻度线）的唯一几何来源。
//! `init_background` 按这里列出的图元绘制，采样/恢复背景时按这里的像素分类取色。
//! 刻度线的像素来自同一条 `Line` 的 `points()`，与 1 像素描边绘制的覆盖范围一致，
//! 恢复出的像素与初始背景逐像素一致。

use crate::geometry::CanvasGeometry;
use crate::palette::Palette;
use embedded_graphics::geometry::Point;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::{Line, PointsIter};
use radar_hal::Deg;

/// 背景像素分类
#[derive(Debug, Clone)]
pub struct BackgroundModel {
    width: u32,
    height: u32,
    features: Vec<bool>,
    arc_dots: Vec<Point>,
    ticks: Vec<Line>,
}

impl BackgroundModel {
    /// 按几何参数为 `width × height` 的面板建立背景模型
    pub fn new(geometry: &CanvasGeometry, width: u32, height: u32) -> Self {
        let mut arc_dots = Vec::new();
        for r in (0..=geometry.max_radius).step_by(usize::from(geometry.arc_step)) {
            for deg in (0..=180u16).step_by(usize::from(geometry.arc_dot_step_deg)) {
                arc_dots.push(geometry.polar_point(f64::from(r), f64::from(deg)));
            }
        }

        let ticks: Vec<Line> = (0..=180u16)
            .step_by(usize::from(geometry.tick_spacing_deg))
            .map(|deg| geometry.sweep_line(Deg(deg)))
            .collect();

        let mut model = Self {
            width,
            height,
            features: vec![false; width as usize * height as usize],
            arc_dots: Vec::new(),
            ticks: Vec::new(),
        };
        for &dot in &arc_dots {
            model.mark(dot);
        }
        for tick in &ticks {
            for point in tick.points() {
                model.mark(point);
            }
        }
        model.arc_dots = arc_dots;
        model.ticks = ticks;
        model
    }

    /// 圆弧上的描点
    pub fn arc_dots(&self) -> &[Point] {
        &self.arc_dots
    }

    /// 刻度线（圆心 → 外端点）
    pub fn ticks(&self) -> &[Line] {
        &self.ticks
    }

    /// 该像素是否属于背景特征（越界像素视为空白）
    pub fn is_feature(&self, point: Point) -> bool {
        self.index(point).is_some_and(|i| self.features[i])
    }

    /// 该像素在初始背景中的颜色
    pub fn color_at(&self, point: Point, palette: &Palette) -> Rgb565 {
        if self.is_feature(point) {
            palette.background
        } else {
            palette.base
        }
    }

    /// 背景特征像素总数（仅屏幕内）
    pub fn feature_count(&self) -> usize {
        self.features.iter().filter(|f| **f).count()
    }

    fn mark(&mut self, point: Point) {
        if let Some(i) = self.index(point) {
            self.features[i] = true;
        }
    }

    fn index(&self, point: Point) -> Option<usize> {
        if point.x < 0
            || point.y < 0
            || point.x as u32 >= self.width
            || point.y as u32 >= self.height
        {
            return None;
        }
        Some(point.y as usize * self.width as usize + point.x as usize)
    }
}
