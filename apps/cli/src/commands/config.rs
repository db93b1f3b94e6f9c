//! 配置管理命令
//!
//! 配置文件查找顺序：`--config` 指定的路径 → `<config_dir>/radar/config.toml` → 内置默认值。

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use radar_tools::RadarConfig;
use std::path::{Path, PathBuf};

/// 默认配置文件路径
pub fn default_config_file() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
    path.push("radar");
    path.push("config.toml");
    Ok(path)
}

/// 加载生效的配置
pub fn load_effective(path: Option<&Path>) -> Result<RadarConfig> {
    if let Some(path) = path {
        return RadarConfig::load_from_file(path)
            .with_context(|| format!("加载配置文件失败: {}", path.display()));
    }

    let path = default_config_file()?;
    if !path.exists() {
        tracing::debug!("{} not found, using built-in defaults", path.display());
        return Ok(RadarConfig::default());
    }
    RadarConfig::load_from_file(&path)
        .with_context(|| format!("加载配置文件失败: {}", path.display()))
}

/// 配置命令参数
#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// 配置文件路径（默认 `<config_dir>/radar/config.toml`）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// 以 TOML 打印生效的配置（默认）
    Show,

    /// 打印配置文件路径
    Path,

    /// 写出默认配置文件
    Init {
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self.action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let config = load_effective(self.config.as_deref())?;
                print!("{}", config.to_toml_string()?);
            },

            ConfigAction::Path => {
                let path = self.target_path()?;
                println!("{}", path.display());
            },

            ConfigAction::Init { force } => {
                let path = self.target_path()?;
                if path.exists() && !force {
                    bail!("{} 已存在（使用 --force 覆盖）", path.display());
                }
                RadarConfig::default()
                    .save_to_file(&path)
                    .with_context(|| format!("写入配置文件失败: {}", path.display()))?;
                tracing::info!("wrote default config to {}", path.display());
            },
        }
        Ok(())
    }

    fn target_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => default_config_file(),
        }
    }
}
