//! # Radar Tools
//!
//! 扫描雷达应用共享的配置结构。
//!
//! ```toml
//! [panel]
//! orientation = "landscape"
//!
//! [sensor]
//! timeout_us = 30000
//!
//! [sweep]
//! low = 30
//! high = 150
//! reversal = "bounce"
//! ```
//!
//! 所有字段都有默认值，配置文件只需写出要覆盖的部分。

pub mod config;

pub use config::{ConfigError, PanelConfig, RadarConfig};
