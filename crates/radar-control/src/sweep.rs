//! 扫描角度序列
//!
//! 舵机在 `[low, high]` 之间以 `step` 为步长往返。两端的折返方式由 [`Reversal`] 决定：
//!
//! | 策略 | 序列（30..=150, 步长 2） |
//! |------|--------------------------|
//! | `Bounce` | 30, 32, …, 150, 148, …, 32, 30, 32, … |
//! | `RepeatHigh` | 30, 32, …, 150, 150, 148, …, 32, 30, 32, … |

use crate::SweepError;
use radar_hal::Deg;

/// 扫描方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    fn flipped(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

/// 端点折返策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Reversal {
    /// 端点只采样一次
    #[default]
    Bounce,
    /// 上端点连续采样两次，下端点一次（与早期固件的循环边界一致）
    RepeatHigh,
}

/// 扫描循环配置
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoopConfig {
    /// 下端角度（度）
    pub low: u16,
    /// 上端角度（度）
    pub high: u16,
    /// 步长（度）
    pub step: u16,
    /// 每步之后的延时（ms）
    pub step_delay_ms: u32,
    /// 折返策略
    pub reversal: Reversal,
    /// 最大步数（None 表示无限循环）
    ///
    /// 用于测试或定时运行。
    pub max_steps: Option<usize>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            low: 30,
            high: 150,
            step: 2,
            step_delay_ms: 80,
            reversal: Reversal::Bounce,
            max_steps: None,
        }
    }
}

impl LoopConfig {
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.step == 0 {
            return Err(SweepError::Config("step must be > 0".to_string()));
        }
        if self.high > 180 {
            return Err(SweepError::Config(format!(
                "high bound {}° exceeds 180°",
                self.high
            )));
        }
        if self.low >= self.high {
            return Err(SweepError::Config(format!(
                "low bound {}° must be below high bound {}°",
                self.low, self.high
            )));
        }
        if self.high - self.low < self.step {
            return Err(SweepError::Config(format!(
                "range [{}°, {}°] is narrower than one step ({}°)",
                self.low, self.high, self.step
            )));
        }
        Ok(())
    }
}

/// 扫描状态：当前角度 + 方向
///
/// 只在端点翻转方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepState {
    angle: Option<Deg>,
    direction: Direction,
}

impl SweepState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最近一次给出的角度
    pub fn angle(&self) -> Option<Deg> {
        self.angle
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// 前进一步并返回新角度
    ///
    /// 第一次调用返回 `low`。`config` 需已通过 [`LoopConfig::validate`]。
    pub fn advance(&mut self, config: &LoopConfig) -> Deg {
        let next = match self.angle {
            None => {
                self.direction = Direction::Ascending;
                config.low
            },
            Some(Deg(current)) => self.next_from(current, config),
        };
        self.angle = Some(Deg(next));
        Deg(next)
    }

    fn next_from(&mut self, current: u16, config: &LoopConfig) -> u16 {
        let (low, high, step) = (config.low, config.high, config.step);
        match (self.direction, config.reversal) {
            (Direction::Ascending, _) if current + step <= high => current + step,
            (Direction::Ascending, Reversal::Bounce) => {
                self.direction = self.direction.flipped();
                current - step
            },
            (Direction::Ascending, Reversal::RepeatHigh) => {
                self.direction = self.direction.flipped();
                high
            },
            (Direction::Descending, Reversal::Bounce) => match current.checked_sub(step) {
                Some(next) if next >= low => next,
                _ => {
                    self.direction = self.direction.flipped();
                    current + step
                },
            },
            (Direction::Descending, Reversal::RepeatHigh) => match current.checked_sub(step) {
                Some(next) if next > low => next,
                _ => {
                    self.direction = self.direction.flipped();
                    low
                },
            },
        }
    }
}
