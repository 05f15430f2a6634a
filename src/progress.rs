//! Progress reporting for reading dumps.
//!
//! [`ProgressReader`] counts bytes as they are pulled from the underlying
//! reader; [`byte_bar`] and [`spinner`] build the indicatif bars the CLI drives
//! with those counts.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::time::Duration;

/// Callback receiving the running total of bytes read.
pub type ProgressFn = Box<dyn Fn(u64)>;

/// A reader wrapper that reports the total bytes read after every read call.
pub struct ProgressReader<R: Read> {
    reader: R,
    on_progress: ProgressFn,
    total: u64,
}

impl<R: Read> ProgressReader<R> {
    pub fn new(reader: R, on_progress: ProgressFn) -> Self {
        Self {
            reader,
            on_progress,
            total: 0,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.total
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.total += n as u64;
            (self.on_progress)(self.total);
        }
        Ok(n)
    }
}

/// Byte progress bar sized to the input file.
pub fn byte_bar(total_bytes: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%)")
    {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}

/// Ticking spinner with a message, for steps that block without progress
/// updates.
pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    pb
}
