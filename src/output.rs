// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes plus a job progress ticker.

use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::time::Instant;

use crate::pipeline::PipelineObserver;
use crate::poller::PollObserver;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    fn elapsed_secs(&self) -> Option<f64> {
        self.start_time.map(|t| t.elapsed().as_secs_f64())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => match self.elapsed_secs() {
                Some(elapsed) => println!("{message} ({elapsed:.1}s)"),
                None => println!("{message}"),
            },
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => self.emit_json("success", message, false),
        }
    }

    /// Print a warning. Warnings go to stderr in every mode.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => self.emit_json("warning", message, true),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => self.emit_json("error", message, true),
        }
    }

    /// Spinner for a long-running remote job. Draws nothing outside normal mode.
    pub fn ticker(&self, message: impl Into<String>) -> ProgressTicker<io::Stdout> {
        ProgressTicker::new(io::stdout(), message, self.mode == OutputMode::Normal)
    }

    fn emit_json(&self, event: &str, message: &str, to_stderr: bool) {
        let event = JsonEvent {
            event,
            message,
            duration_secs: self.elapsed_secs(),
        };
        if let Ok(json) = serde_json::to_string(&event) {
            if to_stderr {
                eprintln!("{json}");
            } else {
                println!("{json}");
            }
        }
    }
}

impl PipelineObserver for Output {
    fn step_started(&mut self, _index: usize, name: &str) {
        self.progress(&format!("  → {name}..."));
    }

    fn step_failed(&mut self, _index: usize, name: &str, error: &dyn fmt::Display) {
        if self.mode == OutputMode::Normal {
            eprintln!("  ✗ {name} failed: {error}");
            eprintln!("  Rolling back...");
        }
    }

    fn compensation_started(&mut self, _index: usize, name: &str) {
        self.progress(&format!("  ↩ undoing {name}"));
    }

    fn compensation_failed(&mut self, _index: usize, name: &str, error: &dyn fmt::Display) {
        self.warning(&format!("could not undo '{name}': {error}"));
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

const FRAMES: [char; 4] = ['|', '/', '-', '\\'];

/// Redraws a single spinner line once per poll cycle.
pub struct ProgressTicker<W: Write> {
    out: W,
    message: String,
    frame: usize,
    enabled: bool,
}

impl<W: Write> ProgressTicker<W> {
    pub fn new(out: W, message: impl Into<String>, enabled: bool) -> Self {
        Self {
            out,
            message: message.into(),
            frame: 0,
            enabled,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, suffix: &str) {
        if !self.enabled {
            return;
        }
        // Terminal errors are not worth failing a redeployment over.
        let _ = write!(self.out, "\r{} {}{}", FRAMES[self.frame], self.message, suffix);
        let _ = self.out.flush();
    }
}

impl<W: Write> PollObserver for ProgressTicker<W> {
    fn tick(&mut self) {
        self.draw("");
        self.frame = (self.frame + 1) % FRAMES.len();
    }

    fn finished(&mut self, succeeded: bool) {
        let status = if succeeded { " OK\n" } else { " FAILED\n" };
        self.draw(status);
    }
}
