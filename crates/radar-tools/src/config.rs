//! # 雷达配置
//!
//! 汇总各组件配置，读写 TOML 文件。

use radar_canvas::{CanvasConfig, CanvasError};
use radar_control::{LoopConfig, SweepError};
use radar_driver::{ActuatorError, SensorConfig, ServoConfig};
use radar_hal::Orientation;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid panel config: {0}")]
    Panel(String),

    #[error("Invalid sensor config: {0}")]
    Sensor(String),

    #[error("Invalid servo config: {0}")]
    Servo(#[from] ActuatorError),

    #[error("Invalid canvas config: {0}")]
    Canvas(#[from] CanvasError),

    #[error("Invalid sweep config: {0}")]
    Sweep(#[from] SweepError),
}

/// 显示面板
///
/// 面板由显示驱动初始化，画布按初始化后的尺寸建立背景模型。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// 横屏下的宽度（像素）
    pub width: u32,
    /// 横屏下的高度（像素）
    pub height: u32,
    pub orientation: Orientation,
}

impl Default for PanelConfig {
    fn default() -> Self {
        // 1.8" ST7735
        Self {
            width: 160,
            height: 128,
            orientation: Orientation::Landscape,
        }
    }
}

/// 雷达配置
///
/// 缺省的段和字段取各组件的默认值。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// 显示面板
    pub panel: PanelConfig,

    /// 超声波测距
    pub sensor: SensorConfig,

    /// 舵机
    pub servo: ServoConfig,

    /// 画布（几何、配色）
    pub canvas: CanvasConfig,

    /// 扫描循环
    pub sweep: LoopConfig,
}

impl RadarConfig {
    /// 解析 TOML 文本（不做校验）
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 从文件加载配置并校验
    ///
    /// 配置文件路径：
    /// - Linux: `~/.config/radar/config.toml`
    /// - macOS: `~/Library/Application Support/radar/config.toml`
    /// - Windows: `%APPDATA%\radar\config.toml`
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        tracing::debug!("loaded radar config from {}", path.display());
        Ok(config)
    }

    /// 保存配置到文件（自动创建父目录）
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// 校验各组件配置及其相互约束
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.panel.width == 0 || self.panel.height == 0 {
            return Err(ConfigError::Panel(format!(
                "panel size {}x{} is empty",
                self.panel.width, self.panel.height
            )));
        }
        if self.sensor.timeout_us == 0 {
            return Err(ConfigError::Sensor("timeout_us must be > 0".to_string()));
        }
        if !(self.sensor.speed_of_sound_m_s > 0.0) {
            return Err(ConfigError::Sensor(format!(
                "speed_of_sound_m_s must be > 0, got {}",
                self.sensor.speed_of_sound_m_s
            )));
        }

        self.servo.validate()?;
        self.canvas.palette.validate()?;
        self.canvas.geometry.validate()?;
        self.sweep.validate()?;

        // ⚠️ 扫描范围不能超出舵机行程
        if self.sweep.high > self.servo.max_angle {
            return Err(ConfigError::Sweep(SweepError::Config(format!(
                "high bound {}° exceeds servo travel {}°",
                self.sweep.high, self.servo.max_angle
            ))));
        }
        Ok(())
    }
}
