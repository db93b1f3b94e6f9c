//! 雷达配色
//!
//! 四种语义颜色必须两两不同，否则恢复背景时无法区分"背景特征"与"扫描线/标记"。

use crate::CanvasError;
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565, RgbColor};

/// 语义配色
///
/// 序列化时每种颜色写作 RGB565 原始值（如 `0xF800` 为红色）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Palette {
    /// 画布底色（擦除色）
    #[cfg_attr(feature = "serde", serde(with = "raw_rgb565"))]
    pub base: Rgb565,
    /// 背景特征：圆弧与刻度线
    #[cfg_attr(feature = "serde", serde(with = "raw_rgb565"))]
    pub background: Rgb565,
    /// 扫描线
    #[cfg_attr(feature = "serde", serde(with = "raw_rgb565"))]
    pub sweep: Rgb565,
    /// 障碍物标记
    #[cfg_attr(feature = "serde", serde(with = "raw_rgb565"))]
    pub marker: Rgb565,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: Rgb565::BLACK,
            background: Rgb565::GREEN,
            sweep: Rgb565::YELLOW,
            marker: Rgb565::RED,
        }
    }
}

impl Palette {
    fn named(&self) -> [(&'static str, Rgb565); 4] {
        [
            ("base", self.base),
            ("background", self.background),
            ("sweep", self.sweep),
            ("marker", self.marker),
        ]
    }

    /// 检查四种颜色两两不同
    pub fn validate(&self) -> Result<(), CanvasError> {
        let named = self.named();
        for (i, (a_name, a)) in named.iter().enumerate() {
            for (b_name, b) in &named[i + 1..] {
                if a == b {
                    return Err(CanvasError::PaletteConflict {
                        first: *a_name,
                        second: *b_name,
                        color: a.into_storage(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// `Rgb565` 与 `u16` 原始值之间的 serde 转换
#[cfg(feature = "serde")]
mod raw_rgb565 {
    use embedded_graphics::pixelcolor::raw::RawU16;
    use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Rgb565, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(color.into_storage())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgb565, D::Error> {
        u16::deserialize(deserializer).map(|raw| Rgb565::from(RawU16::new(raw)))
    }
}
