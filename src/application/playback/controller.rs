//! Playback Controller - 分句播放状态机
//!
//! 不是线程安全的状态机：所有调用必须串行进入（见 PlaybackDriver）

use std::sync::Arc;

use crate::application::commands::{PlaybackCommand, StartPlayback};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    EngineError, HighlightSinkPort, PlaybackObserverPort, SpeechEnginePort, StatusLevel,
    StatusMessage,
};
use crate::domain::playback::{PlaybackSession, PlaybackState};
use crate::domain::TextSpan;

use super::types::{
    ControlAvailability, EndOfSequence, PlaybackOptions, PlaybackOutcome, PlaybackSnapshot,
    TickOutcome,
};

/// 播放控制器
///
/// 不变量:
/// - 只有 Playing / Paused 状态下存在会话
/// - 引擎调用全部成功后才提交状态变更，失败时保持原状态
/// - 切换句子或暂停前必须先 cancel
/// - 进入 Stopped 之前先清除高亮
/// - cancel 之后 speak 失败时，下一次 tick 重读当前句而不是前进
pub struct PlaybackController {
    engine: Arc<dyn SpeechEnginePort>,
    highlights: Arc<dyn HighlightSinkPort>,
    observer: Arc<dyn PlaybackObserverPort>,
    options: PlaybackOptions,
    state: PlaybackState,
    session: Option<PlaybackSession>,
    polling: bool,
    /// 当前句已被中断但没有重新读出
    replay_pending: bool,
    /// 上一次轮询引擎状态失败（只上报第一次）
    status_failing: bool,
}

impl PlaybackController {
    pub fn new(
        engine: Arc<dyn SpeechEnginePort>,
        highlights: Arc<dyn HighlightSinkPort>,
        observer: Arc<dyn PlaybackObserverPort>,
        options: PlaybackOptions,
    ) -> Self {
        Self {
            engine,
            highlights,
            observer,
            options,
            state: PlaybackState::Idle,
            session: None,
            polling: false,
            replay_pending: false,
            status_failing: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.cursor())
    }

    /// tick 是否需要处理
    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        let active = self.state.is_active();
        let (cursor, total, current, controls) = match &self.session {
            Some(session) => (
                session.cursor(),
                session.len(),
                session.current().cloned(),
                ControlAvailability {
                    can_stop: active,
                    can_previous: active && session.has_previous(),
                    can_next: active && session.has_next(),
                },
            ),
            None => (0, 0, None, ControlAvailability::default()),
        };

        PlaybackSnapshot {
            state: self.state,
            cursor,
            total,
            current,
            controls,
        }
    }

    /// 执行一条播放命令
    pub fn execute(&mut self, command: PlaybackCommand) -> Result<PlaybackOutcome, ApplicationError> {
        match command {
            PlaybackCommand::Start(request) => self.start(request),
            PlaybackCommand::Toggle(request) => self.toggle(request),
            PlaybackCommand::Pause => self.pause(),
            PlaybackCommand::Resume => self.resume(),
            PlaybackCommand::Stop => self.stop(),
            PlaybackCommand::StopIfActive => self.stop_if_active(),
            PlaybackCommand::Next => self.next(),
            PlaybackCommand::Previous => self.previous(),
            PlaybackCommand::Status => Ok(self.outcome(false)),
        }
    }

    /// 开始新的播放会话
    ///
    /// 已有活动会话时先停止旧会话，保证引擎不会同时服务两个会话
    pub fn start(&mut self, request: StartPlayback) -> Result<PlaybackOutcome, ApplicationError> {
        if request.text.trim().is_empty() {
            return Err(ApplicationError::invalid_operation("no text to play"));
        }

        let voice = match request.voice {
            Some(voice) => voice,
            None => {
                self.report(StatusLevel::Warning, "No voice selected");
                return Err(ApplicationError::configuration("no voice selected"));
            }
        };

        let session = PlaybackSession::from_text(&request.text)
            .ok_or_else(|| ApplicationError::invalid_operation("text contains no sentences"))?;

        if self.state.is_active() {
            self.stop()?;
        }

        self.engine
            .configure(&voice, request.rate)
            .map_err(|e| self.engine_failure("configure", e))?;

        let (text, span) = unit_at(&session, 0)?;
        self.engine
            .speak(&text)
            .map_err(|e| self.engine_failure("speak", e))?;

        tracing::info!(
            engine = self.engine.name(),
            voice = %voice,
            rate = request.rate.value(),
            sentences = session.len(),
            "Playback started"
        );

        self.session = Some(session);
        self.polling = true;
        self.replay_pending = false;
        self.state = PlaybackState::Playing;
        self.highlights.highlight(span, true);
        self.publish();

        Ok(self.outcome(true))
    }

    /// 单按钮播放/暂停
    pub fn toggle(&mut self, request: StartPlayback) -> Result<PlaybackOutcome, ApplicationError> {
        match self.state {
            PlaybackState::Idle | PlaybackState::Stopped => self.start(request),
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.resume(),
        }
    }

    /// 轮询引擎状态，当前句读完时前进一句
    ///
    /// 每次 tick 最多前进一句；speak 失败时游标不动，下一次 tick 重试
    pub fn tick(&mut self) -> Result<TickOutcome, ApplicationError> {
        if !self.polling || self.state != PlaybackState::Playing {
            return Ok(TickOutcome::Inactive);
        }

        if self.poll_speaking()? {
            return Ok(TickOutcome::Speaking);
        }

        let Some(session) = self.session.as_ref() else {
            return Ok(TickOutcome::Inactive);
        };

        if self.replay_pending {
            let cursor = session.cursor();
            let (text, span) = unit_at(session, cursor)?;
            self.engine
                .speak(&text)
                .map_err(|e| self.engine_failure("speak", e))?;
            self.replay_pending = false;
            self.highlights.highlight(span, true);

            tracing::debug!(cursor, "Interrupted sentence replayed");
            return Ok(TickOutcome::Replayed { cursor });
        }

        let next = session.cursor() + 1;
        let upcoming = session
            .unit(next)
            .map(|unit| (unit.text().to_string(), unit.span()));

        match upcoming {
            Some((text, span)) => {
                self.engine
                    .speak(&text)
                    .map_err(|e| self.engine_failure("speak", e))?;
                if let Some(session) = self.session.as_mut() {
                    session.move_to(next);
                }
                self.highlights.highlight(span, true);
                self.publish();

                tracing::debug!(cursor = next, "Advanced to next sentence");
                Ok(TickOutcome::Advanced { cursor: next })
            }
            None => {
                self.finish_sequence()?;
                Ok(TickOutcome::Finished)
            }
        }
    }

    /// 暂停：中断当前句，保留会话和游标
    pub fn pause(&mut self) -> Result<PlaybackOutcome, ApplicationError> {
        if self.state != PlaybackState::Playing {
            return Err(ApplicationError::invalid_operation(format!(
                "cannot pause while {}",
                self.state
            )));
        }

        self.engine
            .cancel()
            .map_err(|e| self.engine_failure("cancel", e))?;

        self.replay_pending = false;
        self.state = PlaybackState::Paused;
        self.publish();
        tracing::info!(cursor = self.cursor(), "Playback paused");

        Ok(self.outcome(true))
    }

    /// 继续：从当前句重新朗读，已读完时回到第一句
    pub fn resume(&mut self) -> Result<PlaybackOutcome, ApplicationError> {
        if self.state != PlaybackState::Paused {
            return Err(ApplicationError::invalid_operation(format!(
                "cannot resume while {}",
                self.state
            )));
        }

        let session = self
            .session
            .as_ref()
            .ok_or_else(|| ApplicationError::internal("paused without a session"))?;
        let target = if session.is_exhausted() {
            0
        } else {
            session.cursor()
        };
        let (text, span) = unit_at(session, target)?;

        self.engine
            .speak(&text)
            .map_err(|e| self.engine_failure("speak", e))?;

        if let Some(session) = self.session.as_mut() {
            session.move_to(target);
        }
        self.polling = true;
        self.replay_pending = false;
        self.state = PlaybackState::Playing;
        self.highlights.highlight(span, true);
        self.publish();
        tracing::info!(cursor = target, "Playback resumed");

        Ok(self.outcome(true))
    }

    /// 停止：中断朗读、清除高亮、销毁会话
    pub fn stop(&mut self) -> Result<PlaybackOutcome, ApplicationError> {
        if !self.state.is_active() {
            return Err(ApplicationError::invalid_operation(format!(
                "cannot stop while {}",
                self.state
            )));
        }

        self.engine
            .cancel()
            .map_err(|e| self.engine_failure("cancel", e))?;

        let full_span = self
            .session
            .take()
            .map(|s| s.full_span())
            .unwrap_or_else(|| TextSpan::new(0, 0));
        self.highlights.highlight(full_span, false);

        self.polling = false;
        self.replay_pending = false;
        self.status_failing = false;
        self.state = PlaybackState::Stopped;
        self.publish();
        tracing::info!("Playback stopped");

        Ok(self.outcome(true))
    }

    /// 有活动会话时停止，否则什么也不做
    pub fn stop_if_active(&mut self) -> Result<PlaybackOutcome, ApplicationError> {
        if self.state.is_active() {
            self.stop()
        } else {
            Ok(self.outcome(false))
        }
    }

    /// 上一句（在第一句上为空操作）
    pub fn previous(&mut self) -> Result<PlaybackOutcome, ApplicationError> {
        self.jump(Direction::Backward)
    }

    /// 下一句（在最后一句上为空操作）
    pub fn next(&mut self) -> Result<PlaybackOutcome, ApplicationError> {
        self.jump(Direction::Forward)
    }

    fn jump(&mut self, direction: Direction) -> Result<PlaybackOutcome, ApplicationError> {
        if !self.state.is_active() {
            return Err(ApplicationError::invalid_operation(format!(
                "cannot move to the {} sentence while {}",
                direction.as_str(),
                self.state
            )));
        }

        let session = self
            .session
            .as_ref()
            .ok_or_else(|| ApplicationError::internal("active state without a session"))?;
        let target = match direction {
            Direction::Forward if session.has_next() => session.cursor() + 1,
            Direction::Backward if session.has_previous() => session.cursor() - 1,
            _ => return Ok(self.outcome(false)),
        };
        let (text, span) = unit_at(session, target)?;

        // 先中断旧句，避免过期的完成状态被算到新句上
        self.engine
            .cancel()
            .map_err(|e| self.engine_failure("cancel", e))?;
        if self.state == PlaybackState::Playing {
            if let Err(e) = self.engine.speak(&text) {
                // 旧句已被中断，游标不动，交给 tick 重读
                self.replay_pending = true;
                return Err(self.engine_failure("speak", e));
            }
        }

        if let Some(session) = self.session.as_mut() {
            session.move_to(target);
        }
        self.replay_pending = false;
        self.highlights.highlight(span, true);
        self.publish();
        tracing::debug!(cursor = target, direction = direction.as_str(), "Sentence changed");

        Ok(self.outcome(true))
    }

    /// 查询引擎是否仍在朗读，连续失败只上报第一次
    fn poll_speaking(&mut self) -> Result<bool, ApplicationError> {
        match self.engine.is_speaking() {
            Ok(speaking) => {
                if self.status_failing {
                    self.status_failing = false;
                    tracing::info!(engine = self.engine.name(), "Speech engine status recovered");
                }
                Ok(speaking)
            }
            Err(e) if self.status_failing => {
                tracing::trace!(error = %e, "Speech engine status still failing");
                Err(ApplicationError::Engine(e))
            }
            Err(e) => {
                self.status_failing = true;
                Err(self.engine_failure("status", e))
            }
        }
    }

    fn finish_sequence(&mut self) -> Result<(), ApplicationError> {
        match self.options.on_exhausted {
            EndOfSequence::Stop => {
                self.stop()?;
            }
            EndOfSequence::Hold => {
                let Some(session) = self.session.as_mut() else {
                    return Ok(());
                };
                session.park_at_end();
                let full_span = session.full_span();
                self.highlights.highlight(full_span, false);
                self.polling = false;
                self.state = PlaybackState::Paused;
                self.publish();
                tracing::info!("Playback reached the end, holding");
            }
        }
        Ok(())
    }

    fn outcome(&self, changed: bool) -> PlaybackOutcome {
        PlaybackOutcome {
            changed,
            snapshot: self.snapshot(),
        }
    }

    fn publish(&self) {
        self.observer.state_changed(&self.snapshot());
    }

    fn report(&self, level: StatusLevel, text: impl Into<String>) {
        self.observer
            .status(StatusMessage::new(level, text, self.options.status_timeout));
    }

    fn engine_failure(&self, operation: &'static str, error: EngineError) -> ApplicationError {
        tracing::warn!(
            engine = self.engine.name(),
            operation,
            state = %self.state,
            error = %error,
            "Speech engine call failed"
        );
        self.report(StatusLevel::Error, format!("Speech engine error: {}", error));
        ApplicationError::Engine(error)
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "next",
            Direction::Backward => "previous",
        }
    }
}

fn unit_at(session: &PlaybackSession, index: usize) -> Result<(String, TextSpan), ApplicationError> {
    session
        .unit(index)
        .map(|unit| (unit.text().to_string(), unit.span()))
        .ok_or_else(|| ApplicationError::internal(format!("sentence {} out of range", index)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::domain::playback::{SpeechRate, VoiceId};
    use crate::infrastructure::adapters::{EngineCall, FakeFailure, FakeSpeechEngine};

    #[derive(Debug, Clone, PartialEq)]
    enum Observed {
        Highlight(usize, usize, bool),
        State(PlaybackState, usize),
        Status(StatusLevel),
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<Observed>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<Observed> {
            self.events.lock().unwrap().clone()
        }

        fn highlights(&self) -> Vec<(usize, usize, bool)> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    Observed::Highlight(s, e, a) => Some((s, e, a)),
                    _ => None,
                })
                .collect()
        }
    }

    impl HighlightSinkPort for Recorder {
        fn highlight(&self, span: TextSpan, active: bool) {
            self.events
                .lock()
                .unwrap()
                .push(Observed::Highlight(span.start, span.end, active));
        }
    }

    impl PlaybackObserverPort for Recorder {
        fn state_changed(&self, snapshot: &PlaybackSnapshot) {
            self.events
                .lock()
                .unwrap()
                .push(Observed::State(snapshot.state, snapshot.cursor));
        }

        fn status(&self, message: StatusMessage) {
            self.events.lock().unwrap().push(Observed::Status(message.level));
        }
    }

    fn setup(options: PlaybackOptions) -> (PlaybackController, Arc<FakeSpeechEngine>, Arc<Recorder>) {
        let engine = Arc::new(FakeSpeechEngine::new());
        let recorder = Arc::new(Recorder::default());
        let controller =
            PlaybackController::new(engine.clone(), recorder.clone(), recorder.clone(), options);
        (controller, engine, recorder)
    }

    fn request(text: &str) -> StartPlayback {
        StartPlayback {
            text: text.to_string(),
            voice: Some(VoiceId::new("ru-irina").unwrap()),
            rate: SpeechRate::new(2),
        }
    }

    fn speak(text: &str) -> EngineCall {
        EngineCall::Speak(text.to_string())
    }

    #[test]
    fn test_start_speaks_first_sentence() {
        let (mut controller, engine, recorder) = setup(PlaybackOptions::default());

        let outcome = controller.start(request("One. Two. Three.")).unwrap();

        assert!(outcome.changed);
        assert_eq!(outcome.snapshot.state, PlaybackState::Playing);
        assert_eq!(outcome.snapshot.total, 3);
        assert!(controller.is_polling());
        assert_eq!(
            engine.calls(),
            vec![
                EngineCall::Configure {
                    voice: "ru-irina".to_string(),
                    rate: 2
                },
                speak("One.")
            ]
        );
        assert_eq!(recorder.highlights(), vec![(0, 4, true)]);
    }

    #[test]
    fn test_start_rejects_empty_text() {
        let (mut controller, engine, _) = setup(PlaybackOptions::default());

        let err = controller.start(request("   ")).unwrap_err();
        assert!(err.is_invalid_operation());

        let err = controller.start(request(" ... ,;")).unwrap_err();
        assert!(err.is_invalid_operation());

        assert_eq!(controller.state(), PlaybackState::Idle);
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn test_start_without_voice_is_configuration_error() {
        let (mut controller, engine, recorder) = setup(PlaybackOptions::default());
        let mut req = request("One.");
        req.voice = None;

        let err = controller.start(req).unwrap_err();

        assert!(matches!(err, ApplicationError::Configuration(_)));
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert!(engine.calls().is_empty());
        assert_eq!(recorder.events(), vec![Observed::Status(StatusLevel::Warning)]);
    }

    #[test]
    fn test_tick_waits_while_speaking() {
        let (mut controller, engine, _) = setup(PlaybackOptions::default());
        controller.start(request("One. Two.")).unwrap();

        assert_eq!(controller.tick().unwrap(), TickOutcome::Speaking);
        assert_eq!(controller.tick().unwrap(), TickOutcome::Speaking);
        assert_eq!(engine.spoken(), vec!["One.".to_string()]);
    }

    #[test]
    fn test_tick_advances_one_sentence_at_a_time() {
        let options = PlaybackOptions::default();
        let (mut controller, engine, _) = setup(options);
        controller.start(request("One. Two. Three.")).unwrap();

        engine.finish_utterance();
        assert_eq!(controller.tick().unwrap(), TickOutcome::Advanced { cursor: 1 });
        // 新句正在朗读，不会连跳
        assert_eq!(controller.tick().unwrap(), TickOutcome::Speaking);
        assert_eq!(controller.cursor(), 1);
    }

    #[test]
    fn test_exhaustion_stops_and_clears_highlight() {
        let (mut controller, engine, recorder) = setup(PlaybackOptions::default());
        controller.start(request("One. Two.")).unwrap();

        engine.finish_utterance();
        controller.tick().unwrap();
        engine.finish_utterance();
        assert_eq!(controller.tick().unwrap(), TickOutcome::Finished);

        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert_eq!(controller.cursor(), 0);
        assert!(!controller.is_polling());
        assert_eq!(engine.calls().last(), Some(&EngineCall::Cancel));

        // 高亮清除发生在 Stopped 通知之前
        let events = recorder.events();
        let n = events.len();
        assert_eq!(events[n - 2], Observed::Highlight(0, 9, false));
        assert_eq!(events[n - 1], Observed::State(PlaybackState::Stopped, 0));
        assert_eq!(controller.tick().unwrap(), TickOutcome::Inactive);
    }

    #[test]
    fn test_next_at_last_index_is_noop() {
        let (mut controller, engine, _) = setup(PlaybackOptions::default());
        controller.start(request("One. Two.")).unwrap();
        controller.next().unwrap();
        engine.clear_calls();

        let outcome = controller.next().unwrap();

        assert!(!outcome.changed);
        assert_eq!(outcome.snapshot.cursor, 1);
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn test_previous_at_first_index_is_noop() {
        let (mut controller, engine, _) = setup(PlaybackOptions::default());
        controller.start(request("One. Two.")).unwrap();
        engine.clear_calls();

        let outcome = controller.previous().unwrap();

        assert!(!outcome.changed);
        assert_eq!(controller.cursor(), 0);
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn test_pause_then_resume_keeps_cursor() {
        let (mut controller, engine, _) = setup(PlaybackOptions::default());
        controller.start(request("One. Two. Three.")).unwrap();
        engine.finish_utterance();
        controller.tick().unwrap();
        engine.clear_calls();

        controller.pause().unwrap();
        assert_eq!(controller.state(), PlaybackState::Paused);
        // 暂停期间 tick 不会前进
        assert_eq!(controller.tick().unwrap(), TickOutcome::Inactive);

        controller.resume().unwrap();
        assert_eq!(controller.state(), PlaybackState::Playing);
        assert_eq!(controller.cursor(), 1);
        assert_eq!(engine.calls(), vec![EngineCall::Cancel, speak("Two.")]);
    }

    #[test]
    fn test_navigation_while_paused_does_not_speak() {
        let (mut controller, engine, recorder) = setup(PlaybackOptions::default());
        controller.start(request("One. Two. Three.")).unwrap();
        controller.pause().unwrap();
        engine.clear_calls();

        controller.next().unwrap();

        assert_eq!(controller.state(), PlaybackState::Paused);
        assert_eq!(controller.cursor(), 1);
        assert_eq!(engine.calls(), vec![EngineCall::Cancel]);
        assert_eq!(recorder.highlights().last(), Some(&(5, 9, true)));
    }

    #[test]
    fn test_resume_after_exhaustion_wraps_to_start() {
        let options = PlaybackOptions {
            on_exhausted: EndOfSequence::Hold,
            ..PlaybackOptions::default()
        };
        let (mut controller, engine, recorder) = setup(options);
        controller.start(request("One. Two.")).unwrap();
        engine.finish_utterance();
        controller.tick().unwrap();
        engine.finish_utterance();

        assert_eq!(controller.tick().unwrap(), TickOutcome::Finished);
        assert_eq!(controller.state(), PlaybackState::Paused);
        assert_eq!(controller.cursor(), 2);
        assert_eq!(recorder.highlights().last(), Some(&(0, 9, false)));

        engine.clear_calls();
        controller.resume().unwrap();
        assert_eq!(controller.cursor(), 0);
        assert_eq!(engine.calls(), vec![speak("One.")]);
    }

    #[test]
    fn test_toggle_cycles_start_pause_resume() {
        let (mut controller, _, _) = setup(PlaybackOptions::default());

        controller.toggle(request("One. Two.")).unwrap();
        assert_eq!(controller.state(), PlaybackState::Playing);
        controller.toggle(request("ignored")).unwrap();
        assert_eq!(controller.state(), PlaybackState::Paused);
        controller.toggle(request("ignored")).unwrap();
        assert_eq!(controller.state(), PlaybackState::Playing);
        assert_eq!(controller.snapshot().total, 2);
    }

    #[test]
    fn test_commands_in_wrong_state_are_invalid() {
        let (mut controller, _, _) = setup(PlaybackOptions::default());

        assert!(controller.pause().unwrap_err().is_invalid_operation());
        assert!(controller.resume().unwrap_err().is_invalid_operation());
        assert!(controller.stop().unwrap_err().is_invalid_operation());
        assert!(controller.next().unwrap_err().is_invalid_operation());
        assert!(!controller.stop_if_active().unwrap().changed);
        assert_eq!(controller.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_restart_stops_previous_session_first() {
        let (mut controller, engine, _) = setup(PlaybackOptions::default());
        controller.start(request("One. Two.")).unwrap();
        engine.clear_calls();

        controller.start(request("Three.")).unwrap();

        let calls = engine.calls();
        assert_eq!(calls[0], EngineCall::Cancel);
        assert_eq!(calls.last(), Some(&speak("Three.")));
        assert_eq!(controller.snapshot().total, 1);
    }

    #[test]
    fn test_speak_failure_on_tick_holds_cursor() {
        let (mut controller, engine, recorder) = setup(PlaybackOptions::default());
        controller.start(request("One. Two.")).unwrap();
        engine.finish_utterance();
        engine.fail_next(FakeFailure::Speak);

        let err = controller.tick().unwrap_err();
        assert!(matches!(err, ApplicationError::Engine(_)));
        assert_eq!(controller.cursor(), 0);
        assert_eq!(controller.state(), PlaybackState::Playing);
        assert_eq!(recorder.events().last(), Some(&Observed::Status(StatusLevel::Error)));

        // 下一次 tick 重试
        assert_eq!(controller.tick().unwrap(), TickOutcome::Advanced { cursor: 1 });
    }

    #[test]
    fn test_speak_failure_after_previous_replays_current_sentence() {
        let (mut controller, engine, recorder) = setup(PlaybackOptions::default());
        controller.start(request("One. Two. Three.")).unwrap();
        engine.finish_utterance();
        controller.tick().unwrap();
        assert_eq!(controller.cursor(), 1);

        engine.clear_calls();
        engine.fail_next(FakeFailure::Speak);
        assert!(controller.previous().is_err());
        assert_eq!(controller.cursor(), 1);
        assert_eq!(controller.state(), PlaybackState::Playing);

        // 引擎已静音，但 tick 不能把被中断的句子当成读完
        assert_eq!(controller.tick().unwrap(), TickOutcome::Replayed { cursor: 1 });
        assert_eq!(controller.cursor(), 1);
        assert_eq!(engine.calls(), vec![EngineCall::Cancel, speak("Two.")]);
        assert_eq!(recorder.highlights().last(), Some(&(5, 9, true)));

        engine.finish_utterance();
        assert_eq!(controller.tick().unwrap(), TickOutcome::Advanced { cursor: 2 });
        assert_eq!(engine.spoken().last(), Some(&"Three.".to_string()));
    }

    #[test]
    fn test_failed_replay_is_retried() {
        let (mut controller, engine, _) = setup(PlaybackOptions::default());
        controller.start(request("One. Two.")).unwrap();
        engine.fail_next(FakeFailure::Speak);
        assert!(controller.next().is_err());

        engine.fail_next(FakeFailure::Speak);
        assert!(controller.tick().is_err());
        assert_eq!(controller.cursor(), 0);

        assert_eq!(controller.tick().unwrap(), TickOutcome::Replayed { cursor: 0 });
        assert_eq!(engine.spoken().last(), Some(&"One.".to_string()));
    }

    #[test]
    fn test_status_failures_are_reported_once() {
        let (mut controller, engine, recorder) = setup(PlaybackOptions::default());
        controller.start(request("One. Two.")).unwrap();
        engine.fail_persistently(FakeFailure::Status);

        for _ in 0..5 {
            assert!(controller.tick().is_err());
        }
        let errors = |recorder: &Recorder| {
            recorder
                .events()
                .into_iter()
                .filter(|e| *e == Observed::Status(StatusLevel::Error))
                .count()
        };
        assert_eq!(errors(&*recorder), 1);
        assert_eq!(controller.state(), PlaybackState::Playing);

        // 恢复之后再次失败会重新上报
        engine.clear_failures();
        assert_eq!(controller.tick().unwrap(), TickOutcome::Speaking);
        engine.fail_next(FakeFailure::Status);
        assert!(controller.tick().is_err());
        assert_eq!(errors(&*recorder), 2);
    }

    #[test]
    fn test_configure_failure_keeps_idle() {
        let (mut controller, engine, _) = setup(PlaybackOptions::default());
        engine.fail_next(FakeFailure::Configure);

        assert!(controller.start(request("One.")).is_err());
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert!(engine.spoken().is_empty());
    }

    #[test]
    fn test_cancel_failure_on_stop_holds_state() {
        let (mut controller, engine, _) = setup(PlaybackOptions::default());
        controller.start(request("One. Two.")).unwrap();
        engine.fail_next(FakeFailure::Cancel);

        assert!(controller.stop().is_err());
        assert_eq!(controller.state(), PlaybackState::Playing);
        assert!(controller.stop().is_ok());
        assert_eq!(controller.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_snapshot_controls() {
        let (mut controller, _, _) = setup(PlaybackOptions::default());
        assert_eq!(controller.snapshot().controls, ControlAvailability::default());

        controller.start(request("One. Two.")).unwrap();
        let controls = controller.snapshot().controls;
        assert!(controls.can_stop);
        assert!(!controls.can_previous);
        assert!(controls.can_next);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let (mut controller, engine, recorder) = setup(PlaybackOptions::default());

        controller.start(request("One. Two. Three.")).unwrap();
        assert_eq!(engine.spoken(), vec!["One.".to_string()]);

        engine.finish_utterance();
        controller.tick().unwrap();
        assert_eq!(controller.cursor(), 1);
        assert_eq!(engine.calls().last(), Some(&speak("Two.")));

        engine.clear_calls();
        controller.previous().unwrap();
        assert_eq!(controller.cursor(), 0);
        assert_eq!(engine.calls(), vec![EngineCall::Cancel, speak("One.")]);

        controller.stop().unwrap();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, PlaybackState::Stopped);
        assert_eq!(snapshot.cursor, 0);
        assert_eq!(recorder.highlights().last(), Some(&(0, 16, false)));
    }
}
