//! # Keyboard Listener
//!
//! Reads stdin (or any buffered reader) and turns it into [`KioskEvent`]s.
//!
//! ```text
//!   "/search milk"  ──► Command(Search("milk"))
//!   "123456"        ──► Key('1') ... Key('6'), Key(Enter)
//!   EOF             ──► InputClosed
//! ```
//!
//! Key events are stamped when their bytes arrive, not when a line is
//! complete, so the decoder sees the real gaps between key presses:
//!
//! ```text
//!   read "12"   at t0        ──► Key('1')@t0 Key('2')@t0
//!   read "3\n"  at t0+300ms  ──► Key('3')@t0+300 Key(Enter)@t0+300
//! ```
//!
//! A scanner in keyboard-wedge mode writes its digits and Enter in one
//! burst, which lands in one read. A terminal in canonical mode hands over
//! a whole line at once, so only raw input (or a pipe fed key by key)
//! shows human typing as slow. Operator commands start with `/` at the
//! beginning of a line and are parsed once the line is complete.

use std::time::Instant;

use checkout_core::{Key, KeyEvent};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::event::{Command, KioskEvent};

/// Handle to a running listener task.
#[derive(Debug)]
pub struct KeyboardHandle {
    task: JoinHandle<()>,
}

impl KeyboardHandle {
    /// Stops the listener. A pending stdin read can't be interrupted, so the
    /// task is aborted rather than signalled.
    pub async fn shutdown(self) {
        self.task.abort();
        let _ = self.task.await;
        debug!("Keyboard listener stopped");
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a listener over `reader`.
pub fn spawn<R>(reader: R, tx: mpsc::Sender<KioskEvent>) -> KeyboardHandle
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let task = tokio::spawn(listen(reader, tx));
    KeyboardHandle { task }
}

async fn listen<R>(mut reader: R, tx: mpsc::Sender<KioskEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let mut splitter = InputSplitter::default();

    loop {
        let (events, used) = match reader.fill_buf().await {
            Ok([]) => break,
            Ok(chunk) => (splitter.push(chunk, now()), chunk.len()),
            Err(e) => {
                warn!(error = %e, "Keyboard read failed");
                break;
            }
        };
        reader.consume(used);

        for event in events {
            if tx.send(event).await.is_err() {
                // Event loop is gone
                return;
            }
        }
    }

    debug!("Keyboard input closed");
    for event in splitter.finish(now()) {
        if tx.send(event).await.is_err() {
            return;
        }
    }
    let _ = tx.send(KioskEvent::InputClosed).await;
}

/// Follows tokio's clock so paused-time tests see their sleeps.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Turns raw input bytes into key events and operator commands.
#[derive(Debug)]
struct InputSplitter {
    /// Bytes of an operator line still waiting for its newline.
    command: Option<Vec<u8>>,
    /// Start of a multi-byte character split across reads.
    partial: Vec<u8>,
    line_start: bool,
}

impl Default for InputSplitter {
    fn default() -> Self {
        InputSplitter {
            command: None,
            partial: Vec::new(),
            line_start: true,
        }
    }
}

impl InputSplitter {
    /// Events for one read; every key gets the read's timestamp.
    fn push(&mut self, bytes: &[u8], at: Instant) -> Vec<KioskEvent> {
        let mut events = Vec::new();

        for &byte in bytes {
            if let Some(command) = self.command.as_mut() {
                if byte == b'\n' {
                    let line = String::from_utf8_lossy(command).into_owned();
                    self.command = None;
                    self.line_start = true;
                    events.extend(parse_command(&line));
                } else {
                    command.push(byte);
                }
                continue;
            }

            match byte {
                b'/' if self.line_start => {
                    self.command = Some(vec![byte]);
                    self.line_start = false;
                }
                b'\n' => {
                    self.partial.clear();
                    self.line_start = true;
                    events.push(key(Key::Enter, at));
                }
                b'\r' => {}
                _ => {
                    self.line_start = false;
                    if let Some(c) = self.decode(byte) {
                        events.push(key(Key::Char(c), at));
                    }
                }
            }
        }

        events
    }

    /// Flushes an unterminated last line at end of input.
    fn finish(&mut self, at: Instant) -> Vec<KioskEvent> {
        if let Some(command) = self.command.take() {
            return parse_command(&String::from_utf8_lossy(&command))
                .into_iter()
                .collect();
        }
        if self.line_start {
            return Vec::new();
        }
        self.line_start = true;
        vec![key(Key::Enter, at)]
    }

    fn decode(&mut self, byte: u8) -> Option<char> {
        if byte.is_ascii() && self.partial.is_empty() {
            return Some(byte as char);
        }

        self.partial.push(byte);
        match std::str::from_utf8(&self.partial) {
            Ok(s) => {
                let c = s.chars().next();
                self.partial.clear();
                c
            }
            Err(e) if e.error_len().is_some() => {
                // not UTF-8; drop it
                self.partial.clear();
                None
            }
            Err(_) => None,
        }
    }
}

fn key(key: Key, at: Instant) -> KioskEvent {
    KioskEvent::Key(KeyEvent::new(key, at))
}

fn parse_command(line: &str) -> Option<KioskEvent> {
    match Command::parse(line.trim_end_matches('\r')) {
        Ok(command) => Some(KioskEvent::Command(command)),
        Err(e) => {
            warn!(line, error = %e, "Ignoring operator command");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncWriteExt, BufReader};

    async fn collect<R>(reader: R) -> Vec<KioskEvent>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel(64);
        let handle = spawn(reader, tx);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            let closed = event == KioskEvent::InputClosed;
            events.push(event);
            if closed {
                break;
            }
        }
        handle.shutdown().await;
        events
    }

    fn keys(events: &[KioskEvent]) -> Vec<Key> {
        events
            .iter()
            .filter_map(|e| match e {
                KioskEvent::Key(k) => Some(k.key.clone()),
                _ => None,
            })
            .collect()
    }

    fn stamps(events: &[KioskEvent]) -> Vec<Instant> {
        events
            .iter()
            .filter_map(|e| match e {
                KioskEvent::Key(k) => Some(k.at),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_digits_and_enter() {
        let events = InputSplitter::default().push(b"12\r\n", Instant::now());
        assert_eq!(
            keys(&events),
            vec![Key::Char('1'), Key::Char('2'), Key::Enter]
        );
    }

    #[test]
    fn test_command_split_across_reads() {
        let mut splitter = InputSplitter::default();
        let at = Instant::now();

        assert!(splitter.push(b"/se", at).is_empty());
        let events = splitter.push(b"arch milk\n1", at);

        assert_eq!(
            events,
            vec![
                KioskEvent::Command(Command::Search("milk".into())),
                key(Key::Char('1'), at),
            ]
        );
    }

    #[test]
    fn test_slash_inside_line_is_a_key() {
        let events = InputSplitter::default().push(b"1/2\n", Instant::now());
        assert_eq!(
            keys(&events),
            vec![Key::Char('1'), Key::Char('/'), Key::Char('2'), Key::Enter]
        );
    }

    #[test]
    fn test_multibyte_char_split_across_reads() {
        let mut splitter = InputSplitter::default();
        let at = Instant::now();
        let bytes = "é".as_bytes();

        assert!(splitter.push(&bytes[..1], at).is_empty());
        assert_eq!(keys(&splitter.push(&bytes[1..], at)), vec![Key::Char('é')]);
    }

    #[test]
    fn test_bad_command_produces_nothing() {
        assert!(InputSplitter::default()
            .push(b"/unknown\n", Instant::now())
            .is_empty());
    }

    #[test]
    fn test_finish_closes_last_line() {
        let at = Instant::now();

        let mut splitter = InputSplitter::default();
        splitter.push(b"42", at);
        assert_eq!(keys(&splitter.finish(at)), vec![Key::Enter]);

        let mut splitter = InputSplitter::default();
        splitter.push(b"/pay", at);
        assert_eq!(
            splitter.finish(at),
            vec![KioskEvent::Command(Command::Pay)]
        );

        assert!(InputSplitter::default().finish(at).is_empty());
    }

    #[tokio::test]
    async fn test_listener_reads_until_eof() {
        // one read: every key shares a timestamp
        let events = collect(BufReader::new(&b"123\n/pay\n"[..])).await;

        assert_eq!(
            keys(&events),
            vec![Key::Char('1'), Key::Char('2'), Key::Char('3'), Key::Enter]
        );
        let at = stamps(&events);
        assert!(at.iter().all(|t| *t == at[0]));
        assert!(events.contains(&KioskEvent::Command(Command::Pay)));
        assert_eq!(events.last(), Some(&KioskEvent::InputClosed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_keys_keep_their_gaps() {
        let (reader, mut writer) = tokio::io::duplex(64);

        let typist = tokio::spawn(async move {
            writer.write_all(b"12").await.unwrap();
            tokio::time::sleep(Duration::from_millis(300)).await;
            writer.write_all(b"3\n").await.unwrap();
        });

        let events = collect(BufReader::new(reader)).await;
        typist.await.unwrap();

        let at = stamps(&events);
        assert_eq!(at.len(), 4);
        assert_eq!(at[0], at[1]);
        assert!(at[2].duration_since(at[1]) >= Duration::from_millis(300));
        assert_eq!(at[2], at[3]);
    }

    #[tokio::test]
    async fn test_listener_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let handle = spawn(BufReader::new(&b"1\n2\n"[..]), tx);
        handle.shutdown().await;
    }
}
