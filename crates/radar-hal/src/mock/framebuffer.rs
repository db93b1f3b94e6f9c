//! 内存帧缓冲面板

use crate::Orientation;
use embedded_graphics::Pixel;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Point, Size};
use embedded_graphics::pixelcolor::{Rgb565, Rgb888, RgbColor};
use std::convert::Infallible;
use std::io::{self, Write};

/// 绘图调用计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// 整屏清除次数
    pub clears: u64,
    /// `draw_iter` 调用次数
    pub draws: u64,
    /// 经 `draw_iter` 写入的像素数（含被裁剪的）
    pub pixels: u64,
}

/// 内存中的 RGB565 面板
///
/// `width`/`height` 为横屏（`Landscape`）下的尺寸，竖屏方向交换宽高。
/// 越界像素静默丢弃，与常见 TFT 驱动一致。
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    size: Size,
    orientation: Orientation,
    pixels: Vec<Rgb565>,
    stats: DrawStats,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            orientation: Orientation::Landscape,
            pixels: vec![Rgb565::BLACK; width as usize * height as usize],
            stats: DrawStats::default(),
        }
    }

    /// 常见的 1.8" ST7735 面板（160×128）
    pub fn st7735() -> Self {
        Self::new(160, 128)
    }

    /// 按方向旋转面板（面板初始化阶段的设置）
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        if orientation.is_portrait() != self.orientation.is_portrait() {
            self.size = Size::new(self.size.height, self.size.width);
        }
        self.orientation = orientation;
        self.pixels.fill(Rgb565::BLACK);
        tracing::debug!(
            "framebuffer oriented: {:?} {}x{}",
            orientation,
            self.size.width,
            self.size.height
        );
        self
    }

    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        self.index(point).map(|i| self.pixels[i])
    }

    /// 指定颜色的像素数
    pub fn count(&self, color: Rgb565) -> usize {
        self.pixels.iter().filter(|c| **c == color).count()
    }

    /// 与另一帧不同的像素坐标
    pub fn diff(&self, other: &FrameBuffer) -> Vec<Point> {
        let width = self.size.width as usize;
        self.pixels
            .iter()
            .zip(other.pixels.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| Point::new((i % width) as i32, (i / width) as i32))
            .collect()
    }

    /// 以二进制 PPM（P6）格式导出当前帧
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.size.width, self.size.height)?;
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            let rgb = Rgb888::from(*color);
            bytes.extend_from_slice(&[rgb.r(), rgb.g(), rgb.b()]);
        }
        out.write_all(&bytes)?;
        out.flush()
    }

    fn index(&self, point: Point) -> Option<usize> {
        if point.x < 0
            || point.y < 0
            || point.x as u32 >= self.size.width
            || point.y as u32 >= self.size.height
        {
            return None;
        }
        Some(point.y as usize * self.size.width as usize + point.x as usize)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.stats.draws += 1;
        for Pixel(point, color) in pixels {
            self.stats.pixels += 1;
            if let Some(i) = self.index(point) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        self.stats.clears += 1;
        Ok(())
    }
}
