#![allow(dead_code)]

use std::{error::Error, sync::Mutex};

use transfer::TransferLogger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub level: Level,
    pub message: String,
    pub tag: Option<String>,
}

/// Keeps every line it is given, in order.
#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<Line>>,
}

impl RecordingLogger {
    fn record(&self, level: Level, message: &str, tag: Option<&str>) {
        self.lines.lock().unwrap().push(Line {
            level,
            message: message.to_string(),
            tag: tag.map(str::to_string),
        });
    }

    pub fn lines(&self) -> Vec<Line> {
        self.lines.lock().unwrap().clone()
    }

    pub fn levels(&self) -> Vec<Level> {
        self.lines().into_iter().map(|line| line.level).collect()
    }

    pub fn tagged(&self, tag: &str) -> Vec<Line> {
        self.lines()
            .into_iter()
            .filter(|line| line.tag.as_deref() == Some(tag))
            .collect()
    }
}

impl TransferLogger for RecordingLogger {
    fn verbose(&self, message: &str, _: &(dyn Error + 'static), tag: Option<&str>) {
        self.record(Level::Verbose, message, tag);
    }

    fn debug(&self, message: &str, _: &(dyn Error + 'static), tag: Option<&str>) {
        self.record(Level::Debug, message, tag);
    }

    fn info(&self, message: &str, _: &(dyn Error + 'static), tag: Option<&str>) {
        self.record(Level::Info, message, tag);
    }

    fn warn(&self, message: &str, _: &(dyn Error + 'static), tag: Option<&str>) {
        self.record(Level::Warn, message, tag);
    }

    fn error(&self, message: &str, _: &(dyn Error + 'static), tag: Option<&str>) {
        self.record(Level::Error, message, tag);
    }
}
