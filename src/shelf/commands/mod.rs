use crate::config::ShelfConfig;
use crate::error::{Result, ShelfError};
use std::path::PathBuf;

pub mod attach;
pub mod config;
pub mod create;
pub mod delete;
pub mod edit;
pub mod get;
pub mod helpers;
pub mod list;
pub mod show;

#[derive(Debug, Clone)]
pub struct ShelfPaths {
    pub data: PathBuf,
}

impl ShelfPaths {
    pub fn config(&self) -> Result<ShelfConfig> {
        ShelfConfig::load(&self.data)
    }

    pub fn media_dir(&self) -> Result<PathBuf> {
        Ok(self.config()?.media_dir_in(&self.data))
    }

    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data).map_err(ShelfError::Io)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// A value returned by a command together with the messages it produced.
#[derive(Debug)]
pub struct CmdResult<T = ()> {
    pub value: T,
    pub messages: Vec<CmdMessage>,
}

impl<T: Default> Default for CmdResult<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> CmdResult<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            messages: Vec::new(),
        }
    }

    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }
}
