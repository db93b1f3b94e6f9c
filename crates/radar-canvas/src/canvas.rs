//! 雷达画布
//!
//! 持有全部显示状态：背景模型、当前扫描线、存活中的障碍物标记。
//! 每一步只重绘必须变化的像素（差分重绘），从不整屏清除：
//!
//! 1. 过期标记：还原其采样的背景像素
//! 2. 擦除上一条扫描线：底色重画，再恢复它压过的背景特征与仍存活的标记
//! 3. 画新扫描线
//! 4. 若距离在量程内：先采样背景，再画实心圆标记并登记
//! 5. 记录本次角度
//!
//! 单步工作量：扫描线 O(半径)，标记维护 O(标记数 × 圆盘面积)。
//!
//! 面板初始化（SPI、方向）由显示驱动负责，画布接收已就绪的 `DrawTarget`。

use crate::background::BackgroundModel;
use crate::error::CanvasError;
use crate::geometry::CanvasGeometry;
use crate::marker::{ActiveMarker, SampledPixels};
use crate::palette::Palette;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{Dimensions, Point};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::{Line, PointsIter, Primitive, PrimitiveStyle};
use embedded_graphics::{Drawable, Pixel};
use radar_hal::{Clock, Deg, Distance};
use std::collections::HashSet;
use std::fmt;

/// 画布配置
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CanvasConfig {
    pub geometry: CanvasGeometry,
    pub palette: Palette,
}

/// 画布生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasState {
    /// 背景未绘制
    Empty,
    /// 背景已绘制，尚无扫描线
    BackgroundDrawn,
    /// 屏幕上有一条扫描线
    SweepActive,
}

/// 单步重绘统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// 本步过期并被擦除的标记数
    pub expired_markers: usize,
    /// 本步恢复的背景像素数
    pub restored_pixels: usize,
    /// 本步是否绘制了新标记
    pub marker_drawn: bool,
    /// 本步结束时存活的标记数
    pub active_markers: usize,
}

/// 雷达画布
pub struct RadarCanvas<D, C> {
    display: D,
    clock: C,
    geometry: CanvasGeometry,
    palette: Palette,
    background: BackgroundModel,
    markers: Vec<ActiveMarker>,
    last_angle: Option<Deg>,
    state: CanvasState,
}

impl<D, C> RadarCanvas<D, C>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: fmt::Debug,
    C: Clock,
{
    /// 校验配置并按面板尺寸建立背景模型
    pub fn new(display: D, clock: C, config: CanvasConfig) -> Result<Self, CanvasError> {
        config.palette.validate()?;
        config.geometry.validate()?;

        let size = display.bounding_box().size;
        let background = BackgroundModel::new(&config.geometry, size.width, size.height);

        Ok(Self {
            display,
            clock,
            geometry: config.geometry,
            palette: config.palette,
            background,
            markers: Vec::new(),
            last_angle: None,
            state: CanvasState::Empty,
        })
    }

    pub fn state(&self) -> CanvasState {
        self.state
    }

    pub fn geometry(&self) -> &CanvasGeometry {
        &self.geometry
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn background(&self) -> &BackgroundModel {
        &self.background
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// 当前屏幕上扫描线的角度
    pub fn last_angle(&self) -> Option<Deg> {
        self.last_angle
    }

    pub fn active_markers(&self) -> &[ActiveMarker] {
        &self.markers
    }

    pub fn into_parts(self) -> (D, C) {
        (self.display, self.clock)
    }

    /// 清屏并绘制静态背景，丢弃所有扫描线与标记状态
    pub fn init_background(&mut self) -> Result<(), CanvasError> {
        self.display
            .clear(self.palette.base)
            .map_err(CanvasError::display)?;
        let color = self.palette.background;
        self.display
            .draw_iter(self.background.arc_dots().iter().map(|&p| Pixel(p, color)))
            .map_err(CanvasError::display)?;
        for &tick in self.background.ticks() {
            draw_line(&mut self.display, tick, color)?;
        }

        self.markers.clear();
        self.last_angle = None;
        self.state = CanvasState::BackgroundDrawn;
        tracing::info!(
            "radar background drawn: {} arc dots, {} ticks, {} feature pixels",
            self.background.arc_dots().len(),
            self.background.ticks().len(),
            self.background.feature_count()
        );
        Ok(())
    }

    /// 渲染一个扫描步
    ///
    /// `distance` 为 `None` 或超出 (0, max_range] 时只移动扫描线，不画标记。
    pub fn render_step(
        &mut self,
        angle: Deg,
        distance: Option<Distance>,
    ) -> Result<FrameStats, CanvasError> {
        if self.state == CanvasState::Empty {
            return Err(CanvasError::BackgroundNotDrawn);
        }
        if angle.value() > 180 {
            return Err(CanvasError::AngleOutOfRange(angle));
        }

        let now_ms = self.clock.now_ms();
        let mut stats = FrameStats::default();

        self.expire_markers(now_ms, &mut stats)?;

        if let Some(previous) = self.last_angle {
            self.erase_sweep_line(previous, &mut stats)?;
        }

        draw_line(
            &mut self.display,
            self.geometry.sweep_line(angle),
            self.palette.sweep,
        )?;

        if let Some(distance) = distance.filter(|d| d.is_within(self.geometry.max_range())) {
            self.draw_marker(angle, distance, now_ms)?;
            stats.marker_drawn = true;
        }

        self.last_angle = Some(angle);
        self.state = CanvasState::SweepActive;
        stats.active_markers = self.markers.len();
        tracing::trace!("rendered {}: {:?}", angle, stats);
        Ok(stats)
    }

    fn expire_markers(&mut self, now_ms: u64, stats: &mut FrameStats) -> Result<(), CanvasError> {
        let expiry_ms = self.geometry.marker_expiry_ms;
        let (expired, active): (Vec<ActiveMarker>, Vec<ActiveMarker>) =
            std::mem::take(&mut self.markers)
                .into_iter()
                .partition(|m| m.is_expired(now_ms, expiry_ms));
        self.markers = active;

        if expired.is_empty() {
            return Ok(());
        }

        let mut restored = HashSet::new();
        for marker in &expired {
            self.display
                .draw_iter(marker.background().iter().map(|&(p, c)| Pixel(p, c)))
                .map_err(CanvasError::display)?;
            restored.extend(marker.background().iter().map(|(p, _)| *p));
            stats.restored_pixels += marker.background().len();
        }
        stats.expired_markers = expired.len();
        tracing::debug!("expired {} markers", expired.len());

        // 与过期标记重叠的存活标记需要补画
        self.repaint_markers(&restored)
    }

    fn erase_sweep_line(&mut self, angle: Deg, stats: &mut FrameStats) -> Result<(), CanvasError> {
        let line = self.geometry.sweep_line(angle);
        draw_line(&mut self.display, line, self.palette.base)?;

        let path: HashSet<Point> = line.points().collect();
        if self.geometry.is_tick_angle(angle) {
            // 刻度线与扫描线像素完全重合，整线恢复
            draw_line(&mut self.display, line, self.palette.background)?;
            stats.restored_pixels += path.len();
        } else {
            let color = self.palette.background;
            let features: Vec<Point> = line
                .points()
                .filter(|&p| self.background.is_feature(p))
                .collect();
            stats.restored_pixels += features.len();
            self.display
                .draw_iter(features.into_iter().map(|p| Pixel(p, color)))
                .map_err(CanvasError::display)?;
        }

        self.repaint_markers(&path)
    }

    /// 重画落在 `region` 内的存活标记像素
    fn repaint_markers(&mut self, region: &HashSet<Point>) -> Result<(), CanvasError> {
        let color = self.palette.marker;
        let pixels = self
            .markers
            .iter()
            .flat_map(|m| m.background().iter())
            .filter(|(p, _)| region.contains(p))
            .map(|&(p, _)| Pixel(p, color));
        self.display.draw_iter(pixels).map_err(CanvasError::display)
    }

    fn draw_marker(&mut self, angle: Deg, distance: Distance, now_ms: u64) -> Result<(), CanvasError> {
        let center = self.geometry.marker_center(angle, distance);
        let disc = self.geometry.marker_disc(center);

        // 必须在覆盖之前采样
        let sampled: SampledPixels = disc
            .points()
            .map(|p| (p, self.background.color_at(p, &self.palette)))
            .collect();
        disc.into_styled(PrimitiveStyle::with_fill(self.palette.marker))
            .draw(&mut self.display)
            .map_err(CanvasError::display)?;
        self.markers.push(ActiveMarker::new(center, sampled, now_ms));

        tracing::debug!("marker at {} / {} -> {:?}", angle, distance, center);
        Ok(())
    }
}

/// 1 像素描边画线，覆盖范围与 `line.points()` 相同
fn draw_line<D>(display: &mut D, line: Line, color: Rgb565) -> Result<(), CanvasError>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: fmt::Debug,
{
    line.into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(display)
        .map_err(CanvasError::display)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::RgbColor;
    use radar_hal::mock::{FrameBuffer, SimClock};

    fn canvas() -> (SimClock, RadarCanvas<FrameBuffer, SimClock>) {
        let clock = SimClock::new();
        let canvas =
            RadarCanvas::new(FrameBuffer::st7735(), clock.clone(), CanvasConfig::default())
                .unwrap();
        (clock, canvas)
    }

    #[test]
    fn test_initial_state() {
        let (_, canvas) = canvas();
        assert_eq!(canvas.state(), CanvasState::Empty);
        assert_eq!(canvas.last_angle(), None);
        assert!(canvas.active_markers().is_empty());
    }

    #[test]
    fn test_render_requires_background() {
        let (_, mut canvas) = canvas();
        assert!(matches!(
            canvas.render_step(Deg(90), None),
            Err(CanvasError::BackgroundNotDrawn)
        ));
    }

    #[test]
    fn test_rejects_conflicting_palette() {
        let config = CanvasConfig {
            palette: Palette {
                marker: Rgb565::YELLOW,
                ..Palette::default()
            },
            ..CanvasConfig::default()
        };
        let result = RadarCanvas::new(FrameBuffer::st7735(), SimClock::new(), config);
        assert!(matches!(result, Err(CanvasError::PaletteConflict { .. })));
    }

    #[test]
    fn test_rejects_angle_out_of_range() {
        let (_, mut canvas) = canvas();
        canvas.init_background().unwrap();
        assert!(matches!(
            canvas.render_step(Deg(181), None),
            Err(CanvasError::AngleOutOfRange(Deg(181)))
        ));
    }

    #[test]
    fn test_state_transitions() {
        let (_, mut canvas) = canvas();
        canvas.init_background().unwrap();
        assert_eq!(canvas.state(), CanvasState::BackgroundDrawn);

        canvas.render_step(Deg(30), None).unwrap();
        assert_eq!(canvas.state(), CanvasState::SweepActive);
        assert_eq!(canvas.last_angle(), Some(Deg(30)));

        // 重新绘制背景会丢弃扫描线与标记
        canvas.render_step(Deg(32), Some(Distance::from_cm(10.0))).unwrap();
        canvas.init_background().unwrap();
        assert_eq!(canvas.state(), CanvasState::BackgroundDrawn);
        assert_eq!(canvas.last_angle(), None);
        assert!(canvas.active_markers().is_empty());
    }

    #[test]
    fn test_sweep_line_drawn_in_sweep_color() {
        let (_, mut canvas) = canvas();
        canvas.init_background().unwrap();
        canvas.render_step(Deg(44), None).unwrap();

        let g = canvas.geometry().clone();
        for p in g.sweep_line(Deg(44)).points() {
            if let Some(color) = canvas.display().pixel(p) {
                assert_eq!(color, Rgb565::YELLOW, "{:?}", p);
            }
        }
    }

    #[test]
    fn test_marker_only_within_range() {
        let (_, mut canvas) = canvas();
        canvas.init_background().unwrap();

        for d in [0.0, -1.0, 30.5, 400.0] {
            let stats = canvas.render_step(Deg(90), Some(Distance::from_cm(d))).unwrap();
            assert!(!stats.marker_drawn, "{} cm should not draw", d);
        }
        let stats = canvas.render_step(Deg(90), None).unwrap();
        assert!(!stats.marker_drawn);

        let stats = canvas.render_step(Deg(90), Some(Distance::from_cm(30.0))).unwrap();
        assert!(stats.marker_drawn);
        assert_eq!(stats.active_markers, 1);
    }

    #[test]
    fn test_marker_samples_background_before_drawing() {
        let (_, mut canvas) = canvas();
        canvas.init_background().unwrap();
        canvas.render_step(Deg(90), Some(Distance::from_cm(15.0))).unwrap();

        let marker = &canvas.active_markers()[0];
        assert_eq!(marker.center(), Point::new(80, 87));
        let disc = canvas.geometry().marker_disc(marker.center());
        assert_eq!(marker.background().len(), disc.points().count());
        // 圆盘跨过 90° 刻度线，采样中应同时出现背景色与底色，不能出现标记色
        let colors: Vec<Rgb565> = marker.background().iter().map(|(_, c)| *c).collect();
        assert!(colors.contains(&Rgb565::GREEN));
        assert!(colors.contains(&Rgb565::BLACK));
        assert!(!colors.contains(&Rgb565::RED));
    }

    #[test]
    fn test_never_clears_full_screen_after_init() {
        let (clock, mut canvas) = canvas();
        canvas.init_background().unwrap();
        for (i, a) in (30..=150u16).step_by(2).enumerate() {
            clock.advance_ms(80);
            let d = if i % 3 == 0 {
                Some(Distance::from_cm(12.0))
            } else {
                None
            };
            canvas.render_step(Deg(a), d).unwrap();
        }
        assert_eq!(canvas.display().stats().clears, 1);
    }

    #[test]
    fn test_styled_footprint_matches_points() {
        // 背景模型与标记采样依赖 points()，绘制依赖描边/填充样式，两者必须一致
        let g = CanvasGeometry {
            center_x: 100,
            center_y: 100,
            ..CanvasGeometry::default()
        };
        let blank = FrameBuffer::new(200, 200);
        let on = Rgb565::WHITE;

        for a in 0..=180u16 {
            let line = g.sweep_line(Deg(a));
            let mut fb = blank.clone();
            draw_line(&mut fb, line, on).unwrap();
            let mut drawn = fb.diff(&blank);
            let mut expected: Vec<Point> = line.points().collect();
            drawn.sort_by_key(|p| (p.y, p.x));
            expected.sort_by_key(|p| (p.y, p.x));
            expected.dedup();
            assert_eq!(drawn, expected, "sweep line at {}°", a);
        }

        let disc = g.marker_disc(Point::new(60, 70));
        let mut fb = blank.clone();
        disc.into_styled(PrimitiveStyle::with_fill(on))
            .draw(&mut fb)
            .unwrap();
        let mut drawn = fb.diff(&blank);
        let mut expected: Vec<Point> = disc.points().collect();
        drawn.sort_by_key(|p| (p.y, p.x));
        expected.sort_by_key(|p| (p.y, p.x));
        assert_eq!(drawn, expected);
    }
}
