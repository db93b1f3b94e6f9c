//! # Radar Canvas
//!
//! 雷达风格扫描显示：静态半圆背景、移动扫描线、限时障碍物标记。
//!
//! 画布只通过 `embedded-graphics` 的 `DrawTarget<Color = Rgb565>` 写像素，从不回读屏幕。
//! 扫描线、刻度线用 1 像素描边的 `Line`，标记用实心 `Circle`。
//! 所有"被覆盖像素原来是什么颜色"的信息都来自 [`BackgroundModel`]，
//! 因此擦除扫描线或过期标记后，屏幕与初始背景逐像素一致。
//!
//! ```ignore
//! let mut canvas = RadarCanvas::new(display, clock, CanvasConfig::default())?;
//! canvas.init_background()?;
//! canvas.render_step(Deg(90), Some(Distance::from_cm(15.0)))?;
//! ```

mod background;
mod canvas;
mod error;
mod geometry;
mod marker;
mod palette;

pub use background::BackgroundModel;
pub use canvas::{CanvasConfig, CanvasState, FrameStats, RadarCanvas};
pub use error::CanvasError;
pub use geometry::CanvasGeometry;
pub use marker::ActiveMarker;
pub use palette::Palette;
