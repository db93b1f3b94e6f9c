//! 模拟超声波模块（HC-SR04 类 Trig/Echo 协议）
//!
//! Trig 引脚的下降沿视为一次"发射"，此时调用回波模型决定本次回波形态。
//! 之后每次读取 Echo 引脚都会把模拟时钟推进 `poll_cost_us`（模拟一次轮询的开销），
//! 并按"距离发射已过去的时间"给出电平，因此忙等循环一定会在有限次轮询内结束。

use super::{SimClock, SimError};
use crate::Clock;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use parking_lot::Mutex;
use std::convert::Infallible;
use std::sync::Arc;

/// 往返声速（cm/µs）
const SOUND_CM_PER_US: f64 = 0.0343;

/// 单次发射的回波形态（时间相对 Trig 下降沿）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Echo {
    /// `delay_us` 后升高，保持 `width_us`
    Pulse { delay_us: u64, width_us: u64 },
    /// Echo 始终为低（无回波 / 线路断开）
    Silent,
    /// `delay_us` 后升高且不再回落
    Stuck { delay_us: u64 },
}

impl Echo {
    /// 对应给定距离（cm）的回波脉冲
    pub fn for_distance_cm(delay_us: u64, distance_cm: f64) -> Self {
        let width_us = (distance_cm * 2.0 / SOUND_CM_PER_US).round().max(0.0) as u64;
        Echo::Pulse { delay_us, width_us }
    }

    fn level_at(&self, since_fire_us: u64) -> bool {
        match *self {
            Echo::Pulse { delay_us, width_us } => {
                since_fire_us >= delay_us && since_fire_us < delay_us + width_us
            },
            Echo::Silent => false,
            Echo::Stuck { delay_us } => since_fire_us >= delay_us,
        }
    }
}

type EchoModel = Box<dyn FnMut(u64) -> Echo + Send>;

struct SonarState {
    trigger_high: bool,
    fired_at_us: Option<u64>,
    pings: u64,
    current: Echo,
    model: EchoModel,
    poll_cost_us: u64,
    fail_reads: bool,
}

/// 模拟超声波模块
///
/// 通过 [`trigger`](Self::trigger) / [`echo`](Self::echo) 取得两个引脚句柄。
#[derive(Clone)]
pub struct SimSonar {
    clock: SimClock,
    state: Arc<Mutex<SonarState>>,
}

impl SimSonar {
    /// 默认无回波（每次测量都会超时）
    pub fn new(clock: SimClock) -> Self {
        Self {
            clock,
            state: Arc::new(Mutex::new(SonarState {
                trigger_high: false,
                fired_at_us: None,
                pings: 0,
                current: Echo::Silent,
                model: Box::new(|_| Echo::Silent),
                poll_cost_us: 1,
                fail_reads: false,
            })),
        }
    }

    /// 每次发射都返回同一回波
    pub fn with_echo(self, echo: Echo) -> Self {
        self.set_model(move |_| echo);
        self
    }

    /// 设置回波模型，参数为发射序号（从 1 开始）
    pub fn set_model<F>(&self, model: F)
    where
        F: FnMut(u64) -> Echo + Send + 'static,
    {
        self.state.lock().model = Box::new(model);
    }

    /// 每次读取 Echo 推进的模拟时间（默认 1µs）
    pub fn set_poll_cost_us(&self, us: u64) {
        self.state.lock().poll_cost_us = us;
    }

    /// 让 Echo 读取返回错误（模拟线路故障）
    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().fail_reads = fail;
    }

    /// 已发射次数
    pub fn pings(&self) -> u64 {
        self.state.lock().pings
    }

    pub fn trigger(&self) -> SimTrigger {
        SimTrigger {
            sonar: self.clone(),
        }
    }

    pub fn echo(&self) -> SimEcho {
        SimEcho {
            sonar: self.clone(),
        }
    }
}

/// 模拟 Trig 引脚
#[derive(Clone)]
pub struct SimTrigger {
    sonar: SimSonar,
}

impl ErrorType for SimTrigger {
    type Error = Infallible;
}

impl OutputPin for SimTrigger {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.sonar.state.lock().trigger_high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        let now = self.sonar.clock.now_us();
        let mut state = self.sonar.state.lock();
        if state.trigger_high {
            state.trigger_high = false;
            state.pings += 1;
            let ping = state.pings;
            state.current = (state.model)(ping);
            state.fired_at_us = Some(now);
            tracing::trace!("sim sonar ping #{} -> {:?}", ping, state.current);
        }
        Ok(())
    }
}

/// 模拟 Echo 引脚
#[derive(Clone)]
pub struct SimEcho {
    sonar: SimSonar,
}

impl ErrorType for SimEcho {
    type Error = SimError;
}

impl InputPin for SimEcho {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let state = self.sonar.state.lock();
        if state.fail_reads {
            return Err(SimError::ReadFailed);
        }
        self.sonar.clock.advance_us(state.poll_cost_us);
        let Some(fired_at) = state.fired_at_us else {
            return Ok(false);
        };
        let since_fire = self.sonar.clock.now_us().saturating_sub(fired_at);
        Ok(state.current.level_at(since_fire))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire(trigger: &mut SimTrigger) {
        trigger.set_high().unwrap();
        trigger.set_low().unwrap();
    }

    #[test]
    fn test_echo_idle_before_first_ping() {
        let sonar = SimSonar::new(SimClock::new()).with_echo(Echo::Stuck { delay_us: 0 });
        let mut echo = sonar.echo();
        assert!(!echo.is_high().unwrap());
        assert_eq!(sonar.pings(), 0);
    }

    #[test]
    fn test_pulse_timeline() {
        let clock = SimClock::new();
        let sonar = SimSonar::new(clock.clone()).with_echo(Echo::Pulse {
            delay_us: 5,
            width_us: 3,
        });
        let mut trigger = sonar.trigger();
        let mut echo = sonar.echo();

        fire(&mut trigger);
        assert_eq!(sonar.pings(), 1);

        // 每次读取推进 1µs：t = 1..=10
        let levels: Vec<bool> = (0..10).map(|_| echo.is_high().unwrap()).collect();
        assert_eq!(
            levels,
            vec![false, false, false, false, true, true, true, false, false, false]
        );
        assert_eq!(clock.now_us(), 10);
    }

    #[test]
    fn test_low_without_high_is_not_a_ping() {
        let sonar = SimSonar::new(SimClock::new());
        let mut trigger = sonar.trigger();
        trigger.set_low().unwrap();
        assert_eq!(sonar.pings(), 0);
    }

    #[test]
    fn test_model_receives_ping_index() {
        let sonar = SimSonar::new(SimClock::new());
        sonar.set_model(|ping| {
            if ping % 2 == 0 {
                Echo::Silent
            } else {
                Echo::Stuck { delay_us: 0 }
            }
        });
        let mut trigger = sonar.trigger();
        let mut echo = sonar.echo();

        fire(&mut trigger);
        assert!(echo.is_high().unwrap());
        fire(&mut trigger);
        assert!(!echo.is_high().unwrap());
    }

    #[test]
    fn test_for_distance_cm() {
        assert_eq!(
            Echo::for_distance_cm(100, 15.0),
            Echo::Pulse {
                delay_us: 100,
                width_us: 875
            }
        );
    }

    #[test]
    fn test_fail_reads() {
        let sonar = SimSonar::new(SimClock::new());
        sonar.set_fail_reads(true);
        assert_eq!(sonar.echo().is_high(), Err(SimError::ReadFailed));
        assert_eq!(sonar.echo().is_low(), Err(SimError::ReadFailed));
    }
}
