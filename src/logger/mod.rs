//! Diagnostic log.
//!
//! Records are formatted with `ufmt` into a scratch line and trickle out to a
//! serial sink one byte per main-loop pass, so logging never waits on the
//! line. A record is queued whole or not at all; lost records are counted
//! and reported ahead of the next record that fits.

use crate::config::LOG_RECORD_LEN;
use crate::hal::unwrap_infallible;
use core::convert::Infallible;
use embedded_hal::serial;
use heapless::{Deque, String};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Debug,
}

impl Level {
    const fn prefix(self) -> &'static str {
        match self {
            Level::Info => "[INF] ",
            Level::Debug => "[DBG] ",
        }
    }
}

/// One record while it is being formatted.
pub struct Record {
    text: String<LOG_RECORD_LEN>,
    truncated: bool,
}

impl Record {
    fn new(level: Level) -> Self {
        let mut record = Self {
            text: String::new(),
            truncated: false,
        };
        record.push(level.prefix());
        record
    }

    fn push(&mut self, s: &str) {
        if self.text.push_str(s).is_err() {
            self.truncated = true;
        }
    }
}

impl ufmt::uWrite for Record {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.push(s);
        Ok(())
    }
}

pub struct Logger<const N: usize> {
    queue: Deque<u8, N>,
    /// Records lost since the last drop notice
    dropped: u16,
}

impl<const N: usize> Logger<N> {
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            dropped: 0,
        }
    }

    /// Append one prefixed, CRLF-terminated record. Use through
    /// [`log_info!`](crate::log_info) and [`log_debug!`](crate::log_debug).
    pub fn record<F>(&mut self, level: Level, body: F)
    where
        F: FnOnce(&mut Record) -> Result<(), Infallible>,
    {
        if self.dropped > 0 {
            let dropped = self.dropped;
            if self.enqueue(Level::Debug, |w| ufmt::uwrite!(w, "{} records dropped", dropped)) {
                self.dropped = 0;
            }
        }
        if !self.enqueue(level, body) {
            self.dropped = self.dropped.saturating_add(1);
        }
    }

    /// Hand the oldest queued byte to `sink` if it can take it. Returns
    /// whether a byte went out.
    pub fn flush_one<W>(&mut self, sink: &mut W) -> Result<bool, W::Error>
    where
        W: serial::Write<u8>,
    {
        let Some(&byte) = self.queue.front() else {
            return Ok(false);
        };
        match sink.write(byte) {
            Ok(()) => {
                self.queue.pop_front();
                Ok(true)
            }
            Err(nb::Error::WouldBlock) => Ok(false),
            Err(nb::Error::Other(error)) => Err(error),
        }
    }

    /// Bytes waiting to be sent
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn enqueue<F>(&mut self, level: Level, body: F) -> bool
    where
        F: FnOnce(&mut Record) -> Result<(), Infallible>,
    {
        let mut record = Record::new(level);
        unwrap_infallible(body(&mut record));
        record.push("\r\n");

        let bytes = record.text.as_bytes();
        if record.truncated || N - self.queue.len() < bytes.len() {
            return false;
        }
        for &byte in bytes {
            // Room checked above
            let _ = self.queue.push_back(byte);
        }
        true
    }
}

impl<const N: usize> Default for Logger<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::ufmt;
        $logger.record($crate::logger::Level::Info, |w| ufmt::uwrite!(w, $($arg)+))
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::ufmt;
        $logger.record($crate::logger::Level::Debug, |w| ufmt::uwrite!(w, $($arg)+))
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::sim::SimSerial;

    fn drain<const N: usize>(logger: &mut Logger<N>, serial: &mut SimSerial) {
        serial.make_ready(usize::MAX / 2);
        while logger.flush_one(serial).unwrap() {}
    }

    #[test]
    fn records_are_prefixed_and_terminated() {
        let mut logger = Logger::<64>::new();
        let mut serial = SimSerial::new();

        log_info!(logger, "button {} pressed", 2u8);
        log_debug!(logger, "state {}", 10u8);
        drain(&mut logger, &mut serial);

        assert_eq!(
            serial.sent(),
            b"[INF] button 2 pressed\r\n[DBG] state 10\r\n".as_slice()
        );
        assert!(logger.is_empty());
    }

    #[test]
    fn one_byte_per_flush() {
        let mut logger = Logger::<16>::new();
        let mut serial = SimSerial::new();
        log_info!(logger, "ab");
        let queued = logger.len();

        serial.make_ready(1);
        assert_eq!(logger.flush_one(&mut serial), Ok(true));
        assert_eq!(logger.flush_one(&mut serial), Ok(false));
        assert_eq!(logger.len(), queued - 1);
        assert_eq!(serial.sent(), b"[");
    }

    #[test]
    fn full_queue_drops_whole_records() {
        let mut logger = Logger::<24>::new();
        let mut serial = SimSerial::new();

        log_info!(logger, "0123456789");
        log_info!(logger, "0123456789");
        assert_eq!(logger.len(), 18);
        assert_eq!(logger.dropped, 1);

        drain(&mut logger, &mut serial);
        assert_eq!(serial.sent(), b"[INF] 0123456789\r\n".as_slice());
    }

    #[test]
    fn drops_are_reported_once_there_is_room() {
        let mut logger = Logger::<40>::new();
        let mut serial = SimSerial::new();

        log_info!(logger, "0123456789abcdef");
        log_info!(logger, "0123456789abcdef");
        drain(&mut logger, &mut serial);
        log_info!(logger, "ok");
        drain(&mut logger, &mut serial);

        assert_eq!(
            serial.sent(),
            b"[INF] 0123456789abcdef\r\n[DBG] 1 records dropped\r\n[INF] ok\r\n".as_slice()
        );
        assert_eq!(logger.dropped, 0);
    }

    #[test]
    fn oversized_record_is_dropped() {
        let mut logger = Logger::<128>::new();
        log_info!(logger, "{}", "this line is far too long to fit in a single record");
        assert!(logger.is_empty());
        assert_eq!(logger.dropped, 1);
    }

    #[test]
    fn empty_queue_sends_nothing() {
        let mut logger = Logger::<8>::new();
        let mut serial = SimSerial::new();
        serial.make_ready(4);
        assert_eq!(logger.flush_one(&mut serial), Ok(false));
        assert!(serial.sent().is_empty());
    }
}
