//! Fake Speech Engine - 用于测试和演示的语音引擎
//!
//! 不发声，只记录调用；朗读完成由测试手动触发或按字符数计时

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::application::ports::{EngineError, SpeechEnginePort};
use crate::domain::playback::{SpeechRate, VoiceId};

/// 引擎收到的调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Configure { voice: String, rate: i32 },
    Speak(String),
    Cancel,
}

/// 可注入的一次性故障
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeFailure {
    Configure,
    Speak,
    Cancel,
    Status,
}

#[derive(Debug, Default)]
struct FakeState {
    calls: Vec<EngineCall>,
    speaking: bool,
    speaking_until: Option<Instant>,
    fail_next: Option<FakeFailure>,
    fail_always: Option<FakeFailure>,
}

/// Fake Speech Engine
///
/// - 手动模式（`new`）：speak 之后一直处于朗读状态，直到调用 `finish_utterance`
/// - 计时模式（`timed`）：每个字符朗读 `per_char` 时长
#[derive(Debug, Default)]
pub struct FakeSpeechEngine {
    state: Mutex<FakeState>,
    per_char: Option<Duration>,
}

impl FakeSpeechEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timed(per_char: Duration) -> Self {
        tracing::info!(per_char_ms = per_char.as_millis() as u64, "FakeSpeechEngine initialized");
        Self {
            state: Mutex::new(FakeState::default()),
            per_char: Some(per_char),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 所有已记录的调用
    pub fn calls(&self) -> Vec<EngineCall> {
        self.lock().calls.clone()
    }

    /// 只取朗读过的文本
    pub fn spoken(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::Speak(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// 让当前朗读立即结束
    pub fn finish_utterance(&self) {
        let mut state = self.lock();
        state.speaking = false;
        state.speaking_until = None;
    }

    /// 下一次对应调用返回错误
    pub fn fail_next(&self, failure: FakeFailure) {
        self.lock().fail_next = Some(failure);
    }

    /// 之后每一次对应调用都返回错误，直到 `clear_failures`
    pub fn fail_persistently(&self, failure: FakeFailure) {
        self.lock().fail_always = Some(failure);
    }

    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.fail_next = None;
        state.fail_always = None;
    }

    fn take_failure(state: &mut FakeState, failure: FakeFailure) -> bool {
        if state.fail_always == Some(failure) {
            return true;
        }
        if state.fail_next == Some(failure) {
            state.fail_next = None;
            return true;
        }
        false
    }
}

impl SpeechEnginePort for FakeSpeechEngine {
    fn configure(&self, voice: &VoiceId, rate: SpeechRate) -> Result<(), EngineError> {
        let mut state = self.lock();
        if Self::take_failure(&mut state, FakeFailure::Configure) {
            return Err(EngineError::Configuration(format!("voice {} rejected", voice)));
        }
        state.calls.push(EngineCall::Configure {
            voice: voice.as_str().to_string(),
            rate: rate.value(),
        });
        Ok(())
    }

    fn speak(&self, text: &str) -> Result<(), EngineError> {
        let mut state = self.lock();
        if Self::take_failure(&mut state, FakeFailure::Speak) {
            return Err(EngineError::Speak("injected failure".to_string()));
        }
        state.calls.push(EngineCall::Speak(text.to_string()));
        match self.per_char {
            Some(per_char) => {
                let chars = text.chars().count() as u32;
                state.speaking_until = Some(Instant::now() + per_char * chars);
            }
            None => state.speaking = true,
        }
        Ok(())
    }

    fn cancel(&self) -> Result<(), EngineError> {
        let mut state = self.lock();
        if Self::take_failure(&mut state, FakeFailure::Cancel) {
            return Err(EngineError::Cancel("injected failure".to_string()));
        }
        state.calls.push(EngineCall::Cancel);
        state.speaking = false;
        state.speaking_until = None;
        Ok(())
    }

    fn is_speaking(&self) -> Result<bool, EngineError> {
        let mut state = self.lock();
        if Self::take_failure(&mut state, FakeFailure::Status) {
            return Err(EngineError::Status("injected failure".to_string()));
        }
        let timed = state
            .speaking_until
            .map(|until| Instant::now() < until)
            .unwrap_or(false);
        Ok(state.speaking || timed)
    }

    fn name(&self) -> &str {
        "fake"
    }
}
