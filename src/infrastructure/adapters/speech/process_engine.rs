//! Process Speech Engine - 命令行合成器适配器
//!
//! 每句话启动一个合成器子进程（默认 espeak-ng）；
//! 是否读完通过 `try_wait` 轮询，cancel 直接结束子进程

use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, MutexGuard};

use crate::application::ports::{EngineError, SpeechEnginePort};
use crate::config::SpeechConfig;
use crate::domain::playback::{SpeechRate, VoiceId};

#[derive(Debug, Default)]
struct ProcessState {
    voice: Option<String>,
    words_per_minute: Option<u32>,
    child: Option<Child>,
}

/// Process Speech Engine
#[derive(Debug)]
pub struct ProcessSpeechEngine {
    config: SpeechConfig,
    state: Mutex<ProcessState>,
}

impl ProcessSpeechEngine {
    pub fn new(config: SpeechConfig) -> Self {
        tracing::info!(program = %config.program, "ProcessSpeechEngine initialized");
        Self {
            config,
            state: Mutex::new(ProcessState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProcessState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn build_command(&self, state: &ProcessState, text: &str) -> Command {
        let mut command = Command::new(&self.config.program);
        if let Some(voice) = &state.voice {
            command.arg("-v").arg(voice);
        }
        if let Some(wpm) = state.words_per_minute {
            command.arg("-s").arg(wpm.to_string());
        }
        command
            .arg("--")
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

/// 结束并回收子进程，已退出的进程不算错误
fn terminate(child: &mut Child) -> std::io::Result<()> {
    if child.try_wait()?.is_none() {
        child.kill()?;
    }
    child.wait()?;
    Ok(())
}

impl SpeechEnginePort for ProcessSpeechEngine {
    fn configure(&self, voice: &VoiceId, rate: SpeechRate) -> Result<(), EngineError> {
        let wpm = self.config.words_per_minute(rate.value());
        let mut state = self.lock();
        state.voice = Some(voice.as_str().to_string());
        state.words_per_minute = Some(wpm);

        tracing::debug!(voice = %voice, wpm, "Speech engine configured");
        Ok(())
    }

    fn speak(&self, text: &str) -> Result<(), EngineError> {
        let mut state = self.lock();

        if let Some(mut previous) = state.child.take() {
            terminate(&mut previous).map_err(|e| EngineError::Cancel(e.to_string()))?;
        }

        let child = self.build_command(&state, text).spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EngineError::Unavailable(format!("{} not found", self.config.program))
            } else {
                EngineError::Speak(e.to_string())
            }
        })?;

        tracing::trace!(pid = child.id(), chars = text.chars().count(), "Utterance spawned");
        state.child = Some(child);
        Ok(())
    }

    fn cancel(&self) -> Result<(), EngineError> {
        let mut state = self.lock();
        if let Some(mut child) = state.child.take() {
            terminate(&mut child).map_err(|e| EngineError::Cancel(e.to_string()))?;
        }
        Ok(())
    }

    fn is_speaking(&self) -> Result<bool, EngineError> {
        let mut state = self.lock();
        let Some(child) = state.child.as_mut() else {
            return Ok(false);
        };

        match child.try_wait() {
            Ok(None) => Ok(true),
            Ok(Some(status)) => {
                if !status.success() {
                    tracing::warn!(status = %status, "Synthesizer exited with failure");
                }
                state.child = None;
                Ok(false)
            }
            Err(e) => Err(EngineError::Status(e.to_string())),
        }
    }

    fn name(&self) -> &str {
        "process"
    }
}

impl Drop for ProcessSpeechEngine {
    fn drop(&mut self) {
        if let Some(mut child) = self.lock().child.take() {
            let _ = terminate(&mut child);
        }
    }
}
