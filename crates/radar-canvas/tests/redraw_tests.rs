//! 差分重绘集成测试
//!
//! 以内存帧缓冲为面板，检查擦除扫描线、过期标记后屏幕能否逐像素回到初始背景。

use embedded_graphics::prelude::*;
use embedded_graphics::pixelcolor::Rgb565;
use radar_canvas::{CanvasConfig, CanvasState, RadarCanvas};
use radar_hal::mock::{FrameBuffer, SimClock};
use radar_hal::{Deg, Distance, Orientation};
use std::collections::HashSet;

type TestCanvas = RadarCanvas<FrameBuffer, SimClock>;

fn setup() -> (SimClock, TestCanvas, FrameBuffer) {
    let clock = SimClock::new();
    let mut canvas =
        RadarCanvas::new(FrameBuffer::st7735(), clock.clone(), CanvasConfig::default()).unwrap();
    canvas.init_background().unwrap();
    let initial = canvas.display().clone();
    (clock, canvas, initial)
}

fn sweep_pixels(canvas: &TestCanvas, angle: Deg) -> HashSet<Point> {
    canvas.geometry().sweep_line(angle).points().collect()
}

/// 除当前扫描线外，屏幕应与初始背景一致
fn assert_only_sweep_differs(canvas: &TestCanvas, initial: &FrameBuffer, angle: Deg) {
    let line = sweep_pixels(canvas, angle);
    for p in initial.diff(canvas.display()) {
        assert!(line.contains(&p), "pixel {:?} differs outside sweep line {}", p, angle);
    }
}

#[test]
fn test_background_primitives_drawn() {
    let (_, canvas, initial) = setup();
    let on_screen_features = canvas.background().feature_count();
    assert_eq!(initial.count(Rgb565::GREEN), on_screen_features);
    assert_eq!(
        initial.count(Rgb565::BLACK),
        160 * 128 - on_screen_features
    );
}

#[test]
fn test_erase_restores_background_non_tick_angles() {
    for a in (30..=148u16).step_by(2).filter(|a| a % 30 != 0) {
        let (_, mut canvas, initial) = setup();
        canvas.render_step(Deg(a), None).unwrap();
        canvas.render_step(Deg(a + 2), None).unwrap();
        assert_only_sweep_differs(&canvas, &initial, Deg(a + 2));
    }
}

#[test]
fn test_erase_restores_background_tick_angles() {
    for a in [0u16, 30, 60, 90, 120, 150, 180] {
        let (_, mut canvas, initial) = setup();
        let next = if a == 180 { 178 } else { a + 2 };
        canvas.render_step(Deg(a), None).unwrap();
        canvas.render_step(Deg(next), None).unwrap();
        assert_only_sweep_differs(&canvas, &initial, Deg(next));
    }
}

#[test]
fn test_current_sweep_line_fully_visible() {
    let (_, mut canvas, _) = setup();
    for a in [30u16, 31, 60, 97, 150] {
        canvas.render_step(Deg(a), None).unwrap();
        for p in sweep_pixels(&canvas, Deg(a)) {
            if let Some(color) = canvas.display().pixel(p) {
                assert_eq!(color, Rgb565::YELLOW, "{:?} at {}", p, a);
            }
        }
    }
}

#[test]
fn test_marker_expires_strictly_after_timeout() {
    let (clock, mut canvas, initial) = setup();

    let stats = canvas.render_step(Deg(90), Some(Distance::from_cm(15.0))).unwrap();
    assert!(stats.marker_drawn);
    assert_eq!(canvas.display().pixel(Point::new(83, 87)), Some(Rgb565::RED));

    clock.advance_ms(1000);
    let stats = canvas.render_step(Deg(92), None).unwrap();
    assert_eq!(stats.expired_markers, 0);
    assert_eq!(stats.active_markers, 1);

    clock.advance_ms(1);
    let stats = canvas.render_step(Deg(94), None).unwrap();
    assert_eq!(stats.expired_markers, 1);
    assert_eq!(stats.active_markers, 0);
    assert!(stats.restored_pixels >= 37);

    assert_only_sweep_differs(&canvas, &initial, Deg(94));
}

#[test]
fn test_sweep_line_erase_keeps_active_marker() {
    let (clock, mut canvas, _) = setup();
    canvas.render_step(Deg(90), Some(Distance::from_cm(15.0))).unwrap();
    let marker = canvas.active_markers()[0].clone();

    clock.advance_ms(80);
    canvas.render_step(Deg(100), None).unwrap();

    // 90° 的扫描线穿过标记，擦除后标记像素应被补画
    let line = sweep_pixels(&canvas, Deg(100));
    for &(p, _) in marker.background() {
        if !line.contains(&p) {
            assert_eq!(canvas.display().pixel(p), Some(Rgb565::RED), "{:?}", p);
        }
    }
}

#[test]
fn test_overlapping_markers_expire_independently() {
    let (clock, mut canvas, initial) = setup();
    canvas.render_step(Deg(90), Some(Distance::from_cm(15.0))).unwrap();
    clock.advance_ms(500);
    canvas.render_step(Deg(92), Some(Distance::from_cm(15.0))).unwrap();
    let second = canvas.active_markers()[1].clone();

    clock.advance_ms(501);
    let stats = canvas.render_step(Deg(94), None).unwrap();
    assert_eq!(stats.expired_markers, 1);
    assert_eq!(stats.active_markers, 1);

    // 第二个标记在重叠区域内仍完整可见（当前扫描线覆盖处除外）
    let line = sweep_pixels(&canvas, Deg(94));
    for &(p, _) in second.background() {
        if !line.contains(&p) {
            assert_eq!(canvas.display().pixel(p), Some(Rgb565::RED), "{:?}", p);
        }
    }

    clock.advance_ms(500);
    let stats = canvas.render_step(Deg(96), None).unwrap();
    assert_eq!(stats.expired_markers, 1);
    assert_only_sweep_differs(&canvas, &initial, Deg(96));
}

#[test]
fn test_full_sweep_returns_to_background() {
    let (clock, mut canvas, initial) = setup();
    let forward = (30..=150u16).step_by(2);
    let backward = (30..=148u16).rev().step_by(2);

    let mut last = Deg(30);
    for a in forward.chain(backward) {
        clock.advance_ms(80);
        let stats = canvas.render_step(Deg(a), Some(Distance::from_cm(12.5))).unwrap();
        assert!(stats.marker_drawn);
        last = Deg(a);
    }
    // 1000ms 内最多 12 个 80ms 步
    assert!(canvas.active_markers().len() <= 13);

    clock.advance_ms(2000);
    let stats = canvas.render_step(last, None).unwrap();
    assert_eq!(stats.active_markers, 0);
    assert_only_sweep_differs(&canvas, &initial, last);
    assert_eq!(canvas.display().stats().clears, 1);
}

#[test]
fn test_reinit_discards_markers() {
    let (_, mut canvas, initial) = setup();
    canvas.render_step(Deg(60), Some(Distance::from_cm(20.0))).unwrap();
    canvas.init_background().unwrap();

    assert_eq!(canvas.state(), CanvasState::BackgroundDrawn);
    assert!(initial.diff(canvas.display()).is_empty());
}

#[test]
fn test_background_model_follows_panel_size() {
    let panel = FrameBuffer::st7735().with_orientation(Orientation::Portrait);
    let mut canvas = RadarCanvas::new(panel, SimClock::new(), CanvasConfig::default()).unwrap();
    canvas.init_background().unwrap();

    assert_eq!(canvas.display().size(), Size::new(128, 160));
    // 竖屏下右侧圆弧被裁剪，模型只统计屏幕内的特征像素
    assert_eq!(
        canvas.display().count(Rgb565::GREEN),
        canvas.background().feature_count()
    );
}
