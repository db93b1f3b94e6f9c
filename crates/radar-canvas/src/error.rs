//! 画布错误类型

use radar_hal::Deg;
use std::fmt;
use thiserror::Error;

/// 画布层错误
#[derive(Error, Debug)]
pub enum CanvasError {
    /// 背景尚未绘制
    #[error("Background not drawn, call init_background() first")]
    BackgroundNotDrawn,

    #[error("Angle {0} out of range [0°, 180°]")]
    AngleOutOfRange(Deg),

    /// 两种语义颜色相同（`color` 为 RGB565 原始值）
    #[error("Palette conflict: {first} and {second} are both #{color:04X}")]
    PaletteConflict {
        first: &'static str,
        second: &'static str,
        color: u16,
    },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// `DrawTarget` 返回的错误
    #[error("Display error: {0}")]
    Display(String),
}

impl CanvasError {
    /// 显示驱动的错误类型各不相同，统一转为描述文本
    pub(crate) fn display<E: fmt::Debug>(err: E) -> Self {
        CanvasError::Display(format!("{:?}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CanvasError::AngleOutOfRange(Deg(200));
        assert_eq!(format!("{}", err), "Angle 200° out of range [0°, 180°]");

        let err = CanvasError::PaletteConflict {
            first: "sweep",
            second: "marker",
            color: 0xF800,
        };
        assert_eq!(
            format!("{}", err),
            "Palette conflict: sweep and marker are both #F800"
        );
    }

    #[test]
    fn test_display_error_from_driver() {
        #[derive(Debug)]
        #[allow(dead_code)]
        enum SpiError {
            Busy,
        }

        let err = CanvasError::display(SpiError::Busy);
        assert_eq!(format!("{}", err), "Display error: Busy");
    }
}
