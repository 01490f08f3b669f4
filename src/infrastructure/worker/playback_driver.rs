//! Playback Driver - 播放控制器的单线程驱动
//!
//! 控制器只在这个任务里被访问：用户命令和定时 tick 串行执行，
//! select 偏向命令，保证排队中的 stop/previous/next 先于 tick 生效

use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;

use crate::application::commands::{PlaybackCommand, StartPlayback};
use crate::application::error::ApplicationError;
use crate::application::playback::{PlaybackController, PlaybackOutcome, TickOutcome};

const COMMAND_QUEUE_SIZE: usize = 32;

/// Driver 配置
#[derive(Debug, Clone)]
pub struct PlaybackDriverConfig {
    /// 轮询引擎的间隔
    pub tick_interval: Duration,
}

impl Default for PlaybackDriverConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
        }
    }
}

type Reply = oneshot::Sender<Result<PlaybackOutcome, ApplicationError>>;

struct PlaybackRequest {
    command: PlaybackCommand,
    reply: Reply,
}

/// 播放驱动
pub struct PlaybackDriver {
    config: PlaybackDriverConfig,
    controller: PlaybackController,
    receiver: mpsc::Receiver<PlaybackRequest>,
}

impl PlaybackDriver {
    pub fn new(
        config: PlaybackDriverConfig,
        controller: PlaybackController,
    ) -> (Self, PlaybackHandle) {
        let (sender, receiver) = mpsc::channel(COMMAND_QUEUE_SIZE);
        let driver = Self {
            config,
            controller,
            receiver,
        };
        (driver, PlaybackHandle { sender })
    }

    /// 启动 Driver，所有 PlaybackHandle 被丢弃后退出
    pub async fn run(mut self) {
        tracing::info!(
            tick_interval_ms = self.config.tick_interval.as_millis() as u64,
            "PlaybackDriver started"
        );

        let mut ticker = tokio::time::interval(self.config.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                request = self.receiver.recv() => match request {
                    Some(request) => self.handle_request(request),
                    None => break,
                },
                _ = ticker.tick() => self.handle_tick(),
            }
        }

        // 退出前停止朗读
        if let Err(e) = self.controller.stop_if_active() {
            tracing::warn!(error = %e, "Failed to stop playback on shutdown");
        }

        tracing::info!("PlaybackDriver stopped");
    }

    fn handle_request(&mut self, request: PlaybackRequest) {
        let name = request.command.name();
        let result = self.controller.execute(request.command);

        match &result {
            Ok(outcome) => tracing::debug!(
                command = name,
                changed = outcome.changed,
                state = %outcome.snapshot.state,
                cursor = outcome.snapshot.cursor,
                "Playback command handled"
            ),
            Err(e) if e.is_invalid_operation() => {
                tracing::debug!(command = name, reason = %e, "Playback command ignored")
            }
            Err(e) => tracing::warn!(command = name, error = %e, "Playback command failed"),
        }

        // 调用方可能已经放弃等待
        let _ = request.reply.send(result);
    }

    fn handle_tick(&mut self) {
        match self.controller.tick() {
            Ok(TickOutcome::Finished) => tracing::debug!("Sentence sequence finished"),
            Ok(_) => {}
            // 控制器已记录并上报，下一次 tick 重试
            Err(e) => tracing::trace!(error = %e, "Tick failed"),
        }
    }
}

/// Driver 的客户端，可以随意克隆
#[derive(Clone)]
pub struct PlaybackHandle {
    sender: mpsc::Sender<PlaybackRequest>,
}

impl PlaybackHandle {
    /// 排队一条命令，返回结果接收端
    pub async fn submit(
        &self,
        command: PlaybackCommand,
    ) -> Result<oneshot::Receiver<Result<PlaybackOutcome, ApplicationError>>, ApplicationError> {
        let (reply, receiver) = oneshot::channel();
        self.sender
            .send(PlaybackRequest { command, reply })
            .await
            .map_err(|_| ApplicationError::internal("playback driver is not running"))?;
        Ok(receiver)
    }

    /// 执行命令并等待结果
    pub async fn execute(&self, command: PlaybackCommand) -> Result<PlaybackOutcome, ApplicationError> {
        self.submit(command)
            .await?
            .await
            .map_err(|_| ApplicationError::internal("playback driver dropped the request"))?
    }

    pub async fn start(&self, request: StartPlayback) -> Result<PlaybackOutcome, ApplicationError> {
        self.execute(PlaybackCommand::Start(request)).await
    }

    pub async fn toggle(&self, request: StartPlayback) -> Result<PlaybackOutcome, ApplicationError> {
        self.execute(PlaybackCommand::Toggle(request)).await
    }

    pub async fn pause(&self) -> Result<PlaybackOutcome, ApplicationError> {
        self.execute(PlaybackCommand::Pause).await
    }

    pub async fn resume(&self) -> Result<PlaybackOutcome, ApplicationError> {
        self.execute(PlaybackCommand::Resume).await
    }

    pub async fn stop(&self) -> Result<PlaybackOutcome, ApplicationError> {
        self.execute(PlaybackCommand::Stop).await
    }

    pub async fn stop_if_active(&self) -> Result<PlaybackOutcome, ApplicationError> {
        self.execute(PlaybackCommand::StopIfActive).await
    }

    pub async fn next(&self) -> Result<PlaybackOutcome, ApplicationError> {
        self.execute(PlaybackCommand::Next).await
    }

    pub async fn previous(&self) -> Result<PlaybackOutcome, ApplicationError> {
        self.execute(PlaybackCommand::Previous).await
    }

    pub async fn status(&self) -> Result<PlaybackOutcome, ApplicationError> {
        self.execute(PlaybackCommand::Status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::application::playback::PlaybackOptions;
    use crate::application::ports::SpeechEnginePort;
    use crate::domain::playback::{PlaybackState, SpeechRate, VoiceId};
    use crate::infrastructure::adapters::{EngineCall, FakeSpeechEngine};
    use crate::infrastructure::events::EventPublisher;

    fn driver_with(
        engine: Arc<FakeSpeechEngine>,
        tick_ms: u64,
    ) -> (PlaybackDriver, PlaybackHandle) {
        let events = EventPublisher::new().arc();
        let engine: Arc<dyn SpeechEnginePort> = engine;
        let controller =
            PlaybackController::new(engine, events.clone(), events, PlaybackOptions::default());
        PlaybackDriver::new(
            PlaybackDriverConfig {
                tick_interval: Duration::from_millis(tick_ms),
            },
            controller,
        )
    }

    fn request(text: &str) -> StartPlayback {
        StartPlayback {
            text: text.to_string(),
            voice: Some(VoiceId::new("en").unwrap()),
            rate: SpeechRate::default(),
        }
    }

    #[tokio::test]
    async fn test_tick_advances_after_utterance() {
        let engine = Arc::new(FakeSpeechEngine::new());
        let (driver, handle) = driver_with(engine.clone(), 10);
        tokio::spawn(driver.run());

        handle.start(request("One. Two. Three.")).await.unwrap();
        engine.finish_utterance();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(engine.spoken(), vec!["One.".to_string(), "Two.".to_string()]);
        let status = handle.status().await.unwrap();
        assert_eq!(status.snapshot.cursor, 1);
        assert_eq!(status.snapshot.state, PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_queued_stop_wins_over_pending_tick() {
        // 零时长引擎：每句话立即读完，任何一次 tick 都会前进
        let engine = Arc::new(FakeSpeechEngine::timed(Duration::ZERO));
        let (driver, handle) = driver_with(engine.clone(), 10);

        let started = handle.submit(PlaybackCommand::Start(request("One. Two."))).await.unwrap();
        let stopped = handle.submit(PlaybackCommand::Stop).await.unwrap();
        tokio::spawn(driver.run());

        started.await.unwrap().unwrap();
        stopped.await.unwrap().unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(
            engine.calls(),
            vec![
                EngineCall::Configure {
                    voice: "en".to_string(),
                    rate: 0
                },
                EngineCall::Speak("One.".to_string()),
                EngineCall::Cancel,
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_command_is_returned() {
        let engine = Arc::new(FakeSpeechEngine::new());
        let (driver, handle) = driver_with(engine, 10);
        tokio::spawn(driver.run());

        let err = handle.pause().await.unwrap_err();
        assert!(err.is_invalid_operation());
        assert!(!handle.stop_if_active().await.unwrap().changed);
    }

    #[tokio::test]
    async fn test_dropping_handles_stops_playback() {
        let engine = Arc::new(FakeSpeechEngine::new());
        let (driver, handle) = driver_with(engine.clone(), 10);
        let task = tokio::spawn(driver.run());

        handle.start(request("One. Two.")).await.unwrap();
        drop(handle);

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(engine.calls().last(), Some(&EngineCall::Cancel));
    }
}
