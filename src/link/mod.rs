//! The wired and wireless serial links, and the reporter that mirrors every
//! user-facing line onto both of them.

#[cfg(target_os = "espidf")]
pub mod uart;

use crate::notice::Notice;

/// Non-blocking byte input.
pub trait ByteSource {
    /// The next received byte, or `None` right away if nothing is waiting.
    fn try_read_byte(&mut self) -> Option<u8>;
}

/// Line-oriented text output. A disconnected sink silently drops the line.
pub trait LineSink {
    fn write_line(&mut self, line: &str);
}

impl ByteSource for flume::Receiver<u8> {
    fn try_read_byte(&mut self) -> Option<u8> {
        self.try_recv().ok()
    }
}

impl LineSink for flume::Sender<String> {
    fn write_line(&mut self, line: &str) {
        // A dropped receiver is a disconnected channel.
        let _ = self.send(line.to_string());
    }
}

/// A link with nobody on the other end.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl ByteSource for Detached {
    fn try_read_byte(&mut self) -> Option<u8> {
        None
    }
}

impl LineSink for Detached {
    fn write_line(&mut self, _line: &str) {}
}

/// A byte source and a line sink travelling as one link.
pub struct Duplex<I, O> {
    pub input: I,
    pub output: O,
}

impl<I, O> Duplex<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}

impl<I: ByteSource, O> ByteSource for Duplex<I, O> {
    fn try_read_byte(&mut self) -> Option<u8> {
        self.input.try_read_byte()
    }
}

impl<I, O: LineSink> LineSink for Duplex<I, O> {
    fn write_line(&mut self, line: &str) {
        self.output.write_line(line)
    }
}

/// Owns both links. All user-visible output goes through [`Channels::report`].
pub struct Channels<W, B> {
    wired: W,
    wireless: B,
}

impl<W, B> Channels<W, B>
where
    W: ByteSource + LineSink,
    B: ByteSource + LineSink,
{
    pub fn new(wired: W, wireless: B) -> Self {
        Self { wired, wireless }
    }

    /// Write the notice to the wired link, then to the wireless link.
    pub fn report(&mut self, notice: &Notice) {
        let line = notice.to_string();
        self.wired.write_line(&line);
        self.wireless.write_line(&line);
    }

    /// At most one byte per call. The wireless link is only consulted when
    /// the wired link had nothing.
    pub fn poll_byte(&mut self) -> Option<u8> {
        self.wired
            .try_read_byte()
            .or_else(|| self.wireless.try_read_byte())
    }

    /// Drop everything that is currently waiting on either link and return
    /// how many bytes were thrown away.
    pub fn discard_pending(&mut self) -> usize {
        let mut discarded = 0;
        while self.wired.try_read_byte().is_some() {
            discarded += 1;
        }
        while self.wireless.try_read_byte().is_some() {
            discarded += 1;
        }
        discarded
    }

    pub fn into_inner(self) -> (W, B) {
        (self.wired, self.wireless)
    }
}
