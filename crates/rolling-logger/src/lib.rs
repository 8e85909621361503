//! Rolling Logger
//!
//! Installs a `tracing` subscriber that writes to one log file per day and
//! keeps the most recent lines in memory. Records emitted through the `log`
//! facade are bridged into the same subscriber.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use chrono::NaiveDate;

/// Number of lines kept in the in-memory ring buffer
pub const DEFAULT_BUFFER_LINES: usize = 500;

static LOGGER: OnceLock<RollingHandle> = OnceLock::new();

/// Log file writer state shared between the subscriber and the handle
struct RollingState {
    dir: PathBuf,
    app_name: String,
    current_day: Option<NaiveDate>,
    file: Option<File>,
    recent: VecDeque<String>,
    capacity: usize,
    partial: String,
}

impl RollingState {
    fn new(dir: PathBuf, app_name: &str, capacity: usize) -> Self {
        Self {
            dir,
            app_name: app_name.to_string(),
            current_day: None,
            file: None,
            recent: VecDeque::with_capacity(capacity),
            capacity,
            partial: String::new(),
        }
    }

    fn file_path(&self, day: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}.{}.log", self.app_name, day.format("%Y-%m-%d")))
    }

    /// Open (or reopen) the file for `day` if the day changed
    fn roll_to(&mut self, day: NaiveDate) -> io::Result<()> {
        if self.current_day == Some(day) && self.file.is_some() {
            return Ok(());
        }
        let path = self.file_path(day);
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        self.file = Some(file);
        self.current_day = Some(day);
        Ok(())
    }

    fn push_line(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        while self.recent.len() >= self.capacity {
            self.recent.pop_front();
        }
        self.recent.push_back(line);
    }

    fn write_on(&mut self, day: NaiveDate, buf: &[u8]) -> io::Result<()> {
        self.roll_to(day)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }

        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            self.push_line(line.trim_end().to_string());
        }
        Ok(())
    }
}

/// Cloneable handle used as the subscriber's writer
#[derive(Clone)]
pub struct RollingHandle {
    state: Arc<Mutex<RollingState>>,
}

impl RollingHandle {
    /// Create a handle writing into `dir`; the directory is created if missing
    pub fn new(dir: impl AsRef<Path>, app_name: &str, capacity: usize) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            state: Arc::new(Mutex::new(RollingState::new(dir, app_name, capacity))),
        })
    }

    /// Most recent lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        match self.state.lock() {
            Ok(state) => state.recent.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Path of the file currently being written, if any
    pub fn current_file(&self) -> Option<PathBuf> {
        let state = self.state.lock().ok()?;
        state.current_day.map(|day| state.file_path(day))
    }

    fn write_on(&self, day: NaiveDate, buf: &[u8]) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log state poisoned"))?;
        state.write_on(day, buf)
    }
}

impl Write for RollingHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_on(chrono::Local::now().date_naive(), buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log state poisoned"))?;
        match state.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Initialize the global logger writing into `log_dir`
///
/// Fails if a global subscriber is already installed.
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), String> {
    let handle = RollingHandle::new(log_dir, app_name, DEFAULT_BUFFER_LINES)
        .map_err(|e| format!("Failed to create log dir: {}", e))?;
    let writer = handle.clone();

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(true)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .try_init()
        .map_err(|e| format!("Failed to install subscriber: {}", e))?;

    LOGGER
        .set(handle)
        .map_err(|_| "Logger already initialized".to_string())?;

    log::info!("{} logging to {}", app_name, log_dir_display(&LOGGER));
    Ok(())
}

fn log_dir_display(logger: &OnceLock<RollingHandle>) -> String {
    logger
        .get()
        .and_then(|h| h.state.lock().ok().map(|s| s.dir.display().to_string()))
        .unwrap_or_default()
}

fn ensure_initialized() -> Result<(), String> {
    if LOGGER.get().is_some() {
        Ok(())
    } else {
        Err("Logger not initialized".to_string())
    }
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::error!("{}", msg);
    Ok(())
}

/// Recent log lines from the global logger (empty before init)
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(|h| h.recent_lines()).unwrap_or_default()
}
