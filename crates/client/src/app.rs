//! Event loop tying keyboard input, the session, and telemetry together.
//!
//! The terminal has no real transitions, so an animation is a timer: once a
//! resolved move has been on screen for `CliConfig::animation`, the loop
//! calls `Session::complete_animation`, which also resolves the next queued
//! move.

use anyhow::Result;
use crossterm::event::{self as term_event, Event as TermEvent, KeyEventKind};
use tile_core::{EngineEvent, InputSource};
use tile_runtime::{RestartSource, Session, TelemetryQueue};
use tokio::time::{self, Duration, Instant};

use crate::config::CliConfig;
use crate::format::describe_events;
use crate::input::{KeyAction, handle_key};
use crate::presentation::terminal::Tui;
use crate::presentation::ui::{self, RenderContext};

/// Current wall clock in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub struct App {
    session: Session,
    telemetry: TelemetryQueue,
    config: CliConfig,
    animation_deadline: Option<Instant>,
    status: Option<String>,
    last_delta: u64,
}

impl App {
    pub fn new(session: Session, telemetry: TelemetryQueue, config: CliConfig) -> Self {
        Self {
            session,
            telemetry,
            config,
            animation_deadline: None,
            status: None,
            last_delta: 0,
        }
    }

    pub async fn run(mut self, terminal: &mut Tui) -> Result<()> {
        self.telemetry.start();
        self.render(terminal)?;

        let mut frames = time::interval(self.config.frame_interval);
        frames.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            let deadline = self.animation_deadline.unwrap_or_else(Instant::now);
            tokio::select! {
                _ = frames.tick() => {
                    if self.handle_input_tick(terminal).await? {
                        break;
                    }
                }
                _ = time::sleep_until(deadline), if self.animation_deadline.is_some() => {
                    self.finish_animation(terminal).await?;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Poll for one keyboard event. Returns true when the user quits.
    async fn handle_input_tick(&mut self, terminal: &mut Tui) -> Result<bool> {
        if !term_event::poll(Duration::from_millis(0))? {
            return Ok(false);
        }

        match term_event::read()? {
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                match handle_key(key) {
                    KeyAction::Quit => return Ok(true),
                    KeyAction::Move(direction) => {
                        self.session.enqueue_move(
                            direction,
                            InputSource::Keyboard,
                            None,
                            now_millis(),
                        )?;
                        self.after_session_change().await;
                    }
                    KeyAction::Restart => {
                        let source = if self.session.is_game_over() {
                            RestartSource::GameOverModal
                        } else {
                            RestartSource::RestartButton
                        };
                        self.session.restart(source, now_millis());
                        self.status = Some("New game".to_string());
                        self.last_delta = 0;
                        self.after_session_change().await;
                    }
                    KeyAction::None => return Ok(false),
                }
                self.render(terminal)?;
            }
            TermEvent::Resize(_, _) => self.render(terminal)?,
            _ => {}
        }
        Ok(false)
    }

    async fn finish_animation(&mut self, terminal: &mut Tui) -> Result<()> {
        self.animation_deadline = None;
        self.session.complete_animation(now_millis())?;
        self.after_session_change().await;
        self.render(terminal)
    }

    /// Refreshes derived display state, arms the animation timer, and hands
    /// new telemetry to the queue.
    async fn after_session_change(&mut self) {
        let events = self.session.events();
        if !events.is_empty() {
            self.status = describe_events(events);
            self.last_delta = merge_delta(events);
        }

        if self.session.is_animating() {
            if self.animation_deadline.is_none() {
                self.animation_deadline = Some(Instant::now() + self.config.animation);
            }
        } else {
            self.animation_deadline = None;
        }

        for record in self.session.consume_telemetry() {
            self.telemetry.enqueue(record).await;
        }
    }

    fn render(&self, terminal: &mut Tui) -> Result<()> {
        ui::render(
            terminal,
            &RenderContext {
                game: self.session.game(),
                status: self.status.as_deref(),
                last_delta: self.last_delta,
                queued_moves: self.session.queued_moves(),
            },
        )
    }

    async fn shutdown(&mut self) {
        self.session.persist_snapshot(now_millis());
        match self.telemetry.stop().await {
            Ok(delivered) => tracing::info!(delivered, "Final telemetry flush complete"),
            Err(error) => tracing::warn!(
                %error,
                undelivered = self.telemetry.size().await,
                "Final telemetry flush failed"
            ),
        }
    }
}

fn merge_delta(events: &[EngineEvent]) -> u64 {
    events
        .iter()
        .map(|event| match event {
            EngineEvent::TileMerged { score_delta, .. } => *score_delta,
            _ => 0,
        })
        .sum()
}
