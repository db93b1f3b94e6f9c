//! 障碍物标记

use embedded_graphics::geometry::Point;
use embedded_graphics::pixelcolor::Rgb565;
use smallvec::SmallVec;

/// 半径 3 的圆盘共 37 个像素，内联存储避免每个标记一次堆分配
pub(crate) type SampledPixels = SmallVec<[(Point, Rgb565); 64]>;

/// 屏幕上的一个障碍物标记
///
/// 保存绘制前采样到的背景像素，过期时逐像素还原。
#[derive(Debug, Clone)]
pub struct ActiveMarker {
    center: Point,
    background: SampledPixels,
    created_ms: u64,
}

impl ActiveMarker {
    pub(crate) fn new(center: Point, background: SampledPixels, created_ms: u64) -> Self {
        Self {
            center,
            background,
            created_ms,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn created_ms(&self) -> u64 {
        self.created_ms
    }

    /// 采样到的 (像素, 背景色)
    pub fn background(&self) -> &[(Point, Rgb565)] {
        &self.background
    }

    /// 存活时间严格超过 `expiry_ms` 才算过期
    pub fn is_expired(&self, now_ms: u64, expiry_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_ms) > expiry_ms
    }
}
