//! # Scanner Module
//!
//! Reconstructs barcode scans from a raw keyboard stream.
//!
//! USB barcode scanners present themselves as keyboards: a scan arrives as a
//! burst of digit keystrokes a few milliseconds apart, finished by Enter. A
//! person typing is an order of magnitude slower, so the gap between
//! keystrokes is enough to tell the two apart.
//!
//! ## Decoding Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For every KeyEvent, in order:                                          │
//! │                                                                         │
//! │  1. gap since previous key > timeout (50ms)?  ──► clear buffer          │
//! │  2. key == Enter && buffer non-empty?         ──► emit ScanEvent, clear │
//! │  3. key is a digit 0-9?                       ──► append to buffer      │
//! │  4. anything else                             ──► ignore                │
//! │  5. remember this key's timestamp (always, even when ignored)           │
//! │                                                                         │
//! │  t(ms)   0    3    6    9                  209  212  215                │
//! │  key     1    2    3   Enter                4    5   Enter              │
//! │  buffer  1    12   123  ─► "123"           4    45   ─► "45"            │
//! │                              ▲               ▲                          │
//! │                           emitted      200ms gap: stale input dropped   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is a heuristic. A slow scanner is missed and a very fast typist can
//! be mistaken for one; both are accepted.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::DEFAULT_SCANNER_TIMEOUT_MS;

// =============================================================================
// Input Types
// =============================================================================

/// Identity of a pressed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A single printable character.
    Char(char),
    /// The Enter / Return key.
    Enter,
    /// Any other named key ("Shift", "Tab", ...).
    Named(String),
}

impl Key {
    /// Maps a key name as reported by a keyboard source.
    ///
    /// `"Enter"` becomes [`Key::Enter`], a one-character name becomes
    /// [`Key::Char`], everything else is [`Key::Named`].
    pub fn from_name(name: &str) -> Key {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c == '\n' || c == '\r' => Key::Enter,
            (Some(c), None) => Key::Char(c),
            _ if name == "Enter" => Key::Enter,
            _ => Key::Named(name.to_string()),
        }
    }

    fn digit(&self) -> Option<char> {
        match self {
            Key::Char(c) if c.is_ascii_digit() => Some(*c),
            _ => None,
        }
    }
}

/// A timestamped key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub at: Instant,
}

impl KeyEvent {
    pub fn new(key: Key, at: Instant) -> Self {
        KeyEvent { key, at }
    }
}

/// One decoded barcode. Consumed exactly once by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent(String);

impl ScanEvent {
    pub fn barcode(&self) -> &str {
        &self.0
    }

    pub fn into_barcode(self) -> String {
        self.0
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Scanner timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Maximum gap between two keystrokes of the same burst.
    pub timeout: Duration,
}

impl ScannerConfig {
    pub fn with_timeout_ms(ms: u64) -> Self {
        ScannerConfig {
            timeout: Duration::from_millis(ms),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig::with_timeout_ms(DEFAULT_SCANNER_TIMEOUT_MS)
    }
}

// =============================================================================
// Decoder
// =============================================================================

/// Keystroke-timing barcode decoder.
///
/// Owned by a single session; not shared.
#[derive(Debug, Clone, Default)]
pub struct ScanDecoder {
    config: ScannerConfig,
    buffer: String,
    last_key_at: Option<Instant>,
}

impl ScanDecoder {
    pub fn new(config: ScannerConfig) -> Self {
        ScanDecoder {
            config,
            buffer: String::new(),
            last_key_at: None,
        }
    }

    /// Feeds one key press; returns a scan when a burst completes.
    pub fn feed(&mut self, event: KeyEvent) -> Option<ScanEvent> {
        if let Some(previous) = self.last_key_at {
            // saturating: an out-of-order timestamp counts as no gap
            if event.at.saturating_duration_since(previous) > self.config.timeout
                && !self.buffer.is_empty()
            {
                trace!(discarded = %self.buffer, "Scanner burst timed out");
                self.buffer.clear();
            }
        }
        self.last_key_at = Some(event.at);

        match event.key {
            Key::Enter if !self.buffer.is_empty() => {
                let barcode = std::mem::take(&mut self.buffer);
                trace!(%barcode, "Scanner burst complete");
                Some(ScanEvent(barcode))
            }
            ref key => {
                if let Some(digit) = key.digit() {
                    self.buffer.push(digit);
                }
                None
            }
        }
    }

    /// Feeds a sequence of key presses, collecting every completed scan.
    pub fn feed_all<I>(&mut self, events: I) -> Vec<ScanEvent>
    where
        I: IntoIterator<Item = KeyEvent>,
    {
        events.into_iter().filter_map(|e| self.feed(e)).collect()
    }

    /// Digits accumulated so far in the current burst.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    pub fn config(&self) -> ScannerConfig {
        self.config
    }

    /// Forgets any partial burst and the last keystroke time.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last_key_at = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
