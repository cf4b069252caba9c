//! Input decoder: turns raw terminal bytes into [`Event`]s.
//!
//! Bytes arrive in arbitrary chunks, so the decoder keeps a pending buffer and
//! only consumes a sequence once it is complete:
//!
//! ```text
//! feed(bytes) ──► pending ──► next_event() ──► Event
//!                    │
//!                    └── incomplete tail waits for the next feed
//! ```
//!
//! Recognized input:
//! - Printable ASCII, control bytes (Ctrl+letter), Enter, Tab, Backspace
//! - `ESC` alone and `ESC <printable>` (Alt chords)
//! - CSI cursor/navigation keys with xterm modifier parameters, `~` keys
//! - SS3 (`ESC O`) cursor and F1-F4 keys
//! - SGR mouse reports (`ESC [ < b ; x ; y M/m`) and focus reports
//! - UTF-8 multi-byte characters, delivered as [`Event::Text`]
//!
//! Unrecognized sequences are consumed whole and produce no event.

use crate::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent};

/// Longest escape sequence kept while waiting for its final byte.
pub const MAX_SEQUENCE: usize = 32;

const ESC: u8 = 0x1b;

/// Outcome of decoding at the front of the pending buffer.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    /// An event, and how many bytes it used.
    Event(Event, usize),
    /// Bytes that decode to nothing.
    Skip(usize),
    /// The buffer ends mid-sequence.
    Incomplete,
}

/// Incremental escape-sequence decoder.
#[derive(Debug, Default)]
pub struct InputDecoder {
    pending: Vec<u8>,
}

impl InputDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self { pending: Vec::with_capacity(MAX_SEQUENCE * 2) }
    }

    /// Append raw bytes read from the terminal.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Decode the next complete event, if the pending bytes hold one.
    pub fn next_event(&mut self) -> Option<Event> {
        while !self.pending.is_empty() {
            match decode_one(&self.pending) {
                Step::Event(event, len) => {
                    self.pending.drain(..len);
                    return Some(event);
                }
                Step::Skip(len) => {
                    tracing::trace!(bytes = ?&self.pending[..len], "skipping unrecognized input");
                    self.pending.drain(..len);
                }
                Step::Incomplete => {
                    if self.pending.len() > MAX_SEQUENCE {
                        tracing::debug!(len = self.pending.len(), "discarding overlong sequence");
                        self.pending.clear();
                    }
                    return None;
                }
            }
        }
        None
    }

    /// Whether bytes are waiting for the rest of a sequence.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drop an unfinished sequence.
    pub fn discard_pending(&mut self) {
        self.pending.clear();
    }
}

/// Decode a complete chunk of input. Trailing partial sequences are dropped.
pub fn decode(bytes: &[u8]) -> Vec<Event> {
    let mut decoder = InputDecoder::new();
    decoder.feed(bytes);
    std::iter::from_fn(|| decoder.next_event()).collect()
}

fn key(code: KeyCode, modifiers: KeyModifiers) -> Step {
    Step::Event(Event::Key(KeyEvent::new(code).with_modifiers(modifiers)), 0)
}

fn used(step: Step, len: usize) -> Step {
    match step {
        Step::Event(event, _) => Step::Event(event, len),
        other => other,
    }
}

fn decode_one(buf: &[u8]) -> Step {
    let Some(&first) = buf.first() else {
        return Step::Incomplete;
    };

    match first {
        ESC => decode_escape(buf),
        _ if first >= 0x80 => decode_utf8(buf),
        _ => Step::Event(Event::Key(decode_byte(first)), 1),
    }
}

/// Keys that fit in one byte.
fn decode_byte(byte: u8) -> KeyEvent {
    let raw = char::from(byte);
    match byte {
        b'\r' | b'\n' => KeyEvent::new(KeyCode::Enter).with_char(raw),
        b'\t' => KeyEvent::new(KeyCode::Tab).with_char(raw),
        0x7f | 0x08 => KeyEvent::new(KeyCode::Backspace).with_char(raw),
        0x00 => KeyEvent::new(KeyCode::Null).with_modifiers(KeyModifiers::CONTROL),
        0x01..=0x1a => KeyEvent::new(KeyCode::Char(char::from(b'a' + byte - 1)))
            .with_char(raw)
            .with_modifiers(KeyModifiers::CONTROL),
        0x1c..=0x1f => {
            let letter = match byte {
                0x1c => '\\',
                0x1d => ']',
                0x1e => '^',
                _ => '_',
            };
            KeyEvent::new(KeyCode::Char(letter))
                .with_char(raw)
                .with_modifiers(KeyModifiers::CONTROL)
        }
        _ => {
            let event = KeyEvent::char(raw);
            if raw.is_ascii_uppercase() {
                event.with_modifiers(KeyModifiers { shift: true, ..KeyModifiers::NONE })
            } else {
                event
            }
        }
    }
}

fn decode_escape(buf: &[u8]) -> Step {
    let Some(&next) = buf.get(1) else {
        return used(key(KeyCode::Esc, KeyModifiers::NONE), 1);
    };

    match next {
        b'[' => decode_csi(buf),
        b'O' => decode_ss3(buf),
        0x20..=0x7e => {
            let event = KeyEvent::char(char::from(next)).with_modifiers(KeyModifiers::ALT);
            Step::Event(Event::Key(event), 2)
        }
        // ESC ESC, ESC + control byte: the first ESC stands alone
        _ => used(key(KeyCode::Esc, KeyModifiers::NONE), 1),
    }
}

fn decode_ss3(buf: &[u8]) -> Step {
    let Some(&last) = buf.get(2) else {
        return Step::Incomplete;
    };
    if !(0x40..=0x7e).contains(&last) {
        return Step::Skip(2);
    }
    match cursor_key(last) {
        Some(code) => used(key(code, KeyModifiers::NONE), 3),
        None => Step::Skip(3),
    }
}

/// Final bytes shared by CSI and SS3 cursor keys.
const fn cursor_key(last: u8) -> Option<KeyCode> {
    Some(match last {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return None,
    })
}

/// Numeric parameters of a CSI sequence; empty fields are `None`.
fn parse_params(raw: &[u8]) -> Option<Vec<Option<u16>>> {
    if !raw.iter().all(|b| b.is_ascii_digit() || *b == b';') {
        return None;
    }
    raw.split(|b| *b == b';')
        .map(|field| {
            if field.is_empty() {
                return Some(None);
            }
            std::str::from_utf8(field).ok()?.parse::<u16>().ok().map(Some)
        })
        .collect()
}

/// Index of the CSI final byte, or `Err` with the length of a sequence broken
/// by an embedded `ESC` or a byte outside the parameter and intermediate range.
fn csi_final(buf: &[u8]) -> Option<Result<usize, usize>> {
    for (i, &b) in buf.iter().enumerate().skip(2) {
        match b {
            0x40..=0x7e => return Some(Ok(i)),
            0x20..=0x3f => {}
            _ => return Some(Err(i)),
        }
    }
    None
}

fn decode_csi(buf: &[u8]) -> Step {
    let Some(&third) = buf.get(2) else {
        return Step::Incomplete;
    };

    match third {
        b'<' => return decode_sgr_mouse(buf),
        b'I' => return Step::Event(Event::Focus(true), 3),
        b'O' => return Step::Event(Event::Focus(false), 3),
        _ => {}
    }

    let Some(end) = csi_final(buf) else {
        return Step::Incomplete;
    };
    let end = match end {
        Ok(end) => end,
        Err(stop) => return Step::Skip(stop),
    };
    let len = end + 1;
    let Some(params) = parse_params(&buf[2..end]) else {
        return Step::Skip(len);
    };
    let modifiers = params
        .get(1)
        .copied()
        .flatten()
        .map_or(KeyModifiers::NONE, KeyModifiers::from_xterm_param);

    let code = match buf[end] {
        b'~' => tilde_key(params.first().copied().flatten().unwrap_or(0)),
        last => cursor_key(last),
    };
    match code {
        Some(code) => used(key(code, modifiers), len),
        None => Step::Skip(len),
    }
}

/// Keys reported as `ESC [ n ~`.
#[allow(clippy::cast_possible_truncation)]
const fn tilde_key(n: u16) -> Option<KeyCode> {
    Some(match n {
        1 | 7 => KeyCode::Home,
        2 => KeyCode::Insert,
        3 => KeyCode::Delete,
        4 | 8 => KeyCode::End,
        5 => KeyCode::PageUp,
        6 => KeyCode::PageDown,
        11..=15 => KeyCode::F((n - 10) as u8),
        17..=21 => KeyCode::F((n - 11) as u8),
        23 | 24 => KeyCode::F((n - 12) as u8),
        _ => return None,
    })
}

/// `ESC [ < b ; x ; y M` (press) or `... m` (release), 1-based coordinates.
fn decode_sgr_mouse(buf: &[u8]) -> Step {
    let mut end = None;
    for (i, &b) in buf.iter().enumerate().skip(3) {
        match b {
            b'M' | b'm' => {
                end = Some(i);
                break;
            }
            b'0'..=b'9' | b';' => {}
            _ => return Step::Skip(i),
        }
    }
    let Some(end) = end else {
        return Step::Incomplete;
    };
    let len = end + 1;

    let fields: Vec<u16> = buf[3..end]
        .split(|b| *b == b';')
        .filter_map(|f| std::str::from_utf8(f).ok()?.parse().ok())
        .collect();
    let [cb, px, py] = fields[..] else {
        return Step::Skip(len);
    };

    // Motion reports are not delivered
    if cb & 32 != 0 {
        return Step::Skip(len);
    }
    let button = match (cb & 64 != 0, cb & 3) {
        (true, 0) => MouseButton::WheelUp,
        (true, 1) => MouseButton::WheelDown,
        (false, 0) => MouseButton::Left,
        (false, 1) => MouseButton::Middle,
        (false, 2) => MouseButton::Right,
        _ => return Step::Skip(len),
    };
    let modifiers = KeyModifiers { shift: cb & 4 != 0, alt: cb & 8 != 0, control: cb & 16 != 0 };

    Step::Event(
        Event::Mouse(MouseEvent {
            x: px.saturating_sub(1),
            y: py.saturating_sub(1),
            button,
            pressed: buf[end] == b'M',
            modifiers,
        }),
        len,
    )
}

/// One UTF-8 encoded character.
fn decode_utf8(buf: &[u8]) -> Step {
    let width = match buf[0] {
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return Step::Skip(1),
    };
    if buf.len() < width {
        // A non-continuation byte inside the expected range means it never completes
        if buf[1..].iter().any(|b| b & 0xc0 != 0x80) {
            return Step::Skip(1);
        }
        return Step::Incomplete;
    }
    match std::str::from_utf8(&buf[..width]) {
        Ok(text) => Step::Event(Event::Text(text.to_owned()), width),
        Err(_) => Step::Skip(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(bytes: &[u8]) -> Vec<KeyEvent> {
        decode(bytes).iter().filter_map(|e| e.as_key().copied()).collect()
    }

    fn code(bytes: &[u8]) -> KeyCode {
        let events = keys(bytes);
        assert_eq!(events.len(), 1, "expected one key from {bytes:?}, got {events:?}");
        events[0].code
    }

    #[test]
    fn test_arrow_delete_and_unknown() {
        let events = decode(b"\x1b[A\x1b[3~\x1b[Z");
        assert_eq!(events.len(), 2);
        assert!(events[0].is_key(KeyCode::Up));
        assert!(events[1].is_key(KeyCode::Delete));
    }

    #[test]
    fn test_printable_ascii() {
        let events = keys(b"aZ ~");
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], KeyEvent::char('a'));
        assert_eq!(events[1].code, KeyCode::Char('Z'));
        assert!(events[1].modifiers.shift);
        assert_eq!(events[2].printable_ascii(), Some(' '));
        assert_eq!(events[3].printable_ascii(), Some('~'));
    }

    #[test]
    fn test_control_bytes() {
        assert_eq!(code(b"\r"), KeyCode::Enter);
        assert_eq!(code(b"\n"), KeyCode::Enter);
        assert_eq!(code(b"\t"), KeyCode::Tab);
        assert_eq!(code(b"\x7f"), KeyCode::Backspace);
        assert_eq!(code(b"\x08"), KeyCode::Backspace);

        let ctrl_c = keys(b"\x03")[0];
        assert_eq!(ctrl_c.code, KeyCode::Char('c'));
        assert!(ctrl_c.modifiers.control);
        assert_eq!(ctrl_c.ch, Some('\x03'));
        assert_eq!(ctrl_c.printable_ascii(), None);

        let ctrl_backslash = keys(b"\x1c")[0];
        assert_eq!(ctrl_backslash.code, KeyCode::Char('\\'));
        assert!(ctrl_backslash.modifiers.control);

        let null = keys(b"\x00")[0];
        assert_eq!(null.code, KeyCode::Null);
        assert!(null.modifiers.control);
    }

    #[test]
    fn test_lone_escape() {
        assert_eq!(code(b"\x1b"), KeyCode::Esc);
        let events = keys(b"\x1b\x1b");
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|k| k.code == KeyCode::Esc));
    }

    #[test]
    fn test_alt_chord() {
        let alt_x = keys(b"\x1bx")[0];
        assert_eq!(alt_x.code, KeyCode::Char('x'));
        assert!(alt_x.modifiers.alt);
        assert_eq!(alt_x.printable_ascii(), None);
    }

    #[test]
    fn test_csi_keys() {
        assert_eq!(code(b"\x1b[B"), KeyCode::Down);
        assert_eq!(code(b"\x1b[C"), KeyCode::Right);
        assert_eq!(code(b"\x1b[D"), KeyCode::Left);
        assert_eq!(code(b"\x1b[H"), KeyCode::Home);
        assert_eq!(code(b"\x1b[F"), KeyCode::End);
        assert_eq!(code(b"\x1b[1~"), KeyCode::Home);
        assert_eq!(code(b"\x1b[2~"), KeyCode::Insert);
        assert_eq!(code(b"\x1b[4~"), KeyCode::End);
        assert_eq!(code(b"\x1b[5~"), KeyCode::PageUp);
        assert_eq!(code(b"\x1b[6~"), KeyCode::PageDown);
        assert_eq!(code(b"\x1b[11~"), KeyCode::F(1));
        assert_eq!(code(b"\x1b[15~"), KeyCode::F(5));
        assert_eq!(code(b"\x1b[17~"), KeyCode::F(6));
        assert_eq!(code(b"\x1b[21~"), KeyCode::F(10));
        assert_eq!(code(b"\x1b[24~"), KeyCode::F(12));
        assert!(keys(b"\x1b[99~").is_empty());
    }

    #[test]
    fn test_csi_modifier_parameter() {
        let ctrl_right = keys(b"\x1b[1;5C")[0];
        assert_eq!(ctrl_right.code, KeyCode::Right);
        assert_eq!(ctrl_right.modifiers, KeyModifiers::CONTROL);

        let shift_delete = keys(b"\x1b[3;2~")[0];
        assert_eq!(shift_delete.code, KeyCode::Delete);
        assert!(shift_delete.modifiers.shift);
    }

    #[test]
    fn test_ss3_keys() {
        assert_eq!(code(b"\x1bOA"), KeyCode::Up);
        assert_eq!(code(b"\x1bOP"), KeyCode::F(1));
        assert_eq!(code(b"\x1bOS"), KeyCode::F(4));
        assert_eq!(keys(b"\x1bOz"), Vec::new());
    }

    #[test]
    fn test_malformed_csi_skipped_whole() {
        let events = keys(b"\x1b[1$Aq");
        // '$' is outside the parameter set: the sequence up to the final byte goes
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], KeyEvent::char('q'));
    }

    #[test]
    fn test_aborted_csi_resynchronizes() {
        assert_eq!(code(b"\x1b[\x1b[A"), KeyCode::Up);
        assert_eq!(code(b"\x1b[1;\x1b[3~"), KeyCode::Delete);

        let events = keys(b"\x1b[12\x1b\x1b[B");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].code, KeyCode::Esc);
        assert_eq!(events[1].code, KeyCode::Down);
    }

    #[test]
    fn test_csi_broken_by_control_byte() {
        let events = keys(b"\x1b[1\rx");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].code, KeyCode::Enter);
        assert_eq!(events[1], KeyEvent::char('x'));
    }

    #[test]
    fn test_aborted_ss3_keeps_following_input() {
        assert_eq!(code(b"\x1bO\x1b[C"), KeyCode::Right);
        let events = keys(b"\x1bO1");
        assert_eq!(events, vec![KeyEvent::char('1')]);
    }

    #[test]
    fn test_interleaved_split_sequences() {
        let mut decoder = InputDecoder::new();
        decoder.feed(b"\x1b[");
        assert_eq!(decoder.next_event(), None);
        decoder.feed(b"\x1b[");
        assert_eq!(decoder.next_event(), None);
        decoder.feed(b"Ax");
        assert_eq!(decoder.next_event().unwrap().as_key().unwrap().code, KeyCode::Up);
        assert_eq!(decoder.next_event(), Some(Event::Key(KeyEvent::char('x'))));
        assert!(!decoder.has_pending());
    }

    #[test]
    fn test_focus_reports() {
        assert_eq!(decode(b"\x1b[I"), vec![Event::Focus(true)]);
        assert_eq!(decode(b"\x1b[O"), vec![Event::Focus(false)]);
    }

    #[test]
    fn test_sgr_mouse() {
        let events = decode(b"\x1b[<0;10;5M\x1b[<0;10;5m");
        assert_eq!(events.len(), 2);
        let Event::Mouse(press) = events[0] else {
            panic!("expected mouse event, got {:?}", events[0]);
        };
        assert_eq!((press.x, press.y), (9, 4));
        assert_eq!(press.button, MouseButton::Left);
        assert!(press.pressed);
        let Event::Mouse(release) = events[1] else {
            panic!("expected mouse event");
        };
        assert!(!release.pressed);
    }

    #[test]
    fn test_sgr_mouse_wheel_and_motion() {
        let events = decode(b"\x1b[<64;1;1M\x1b[<65;1;1M\x1b[<32;4;4M\x1b[<18;2;3M");
        let buttons: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::Mouse(m) => Some((m.button, m.modifiers.control)),
                _ => None,
            })
            .collect();
        assert_eq!(
            buttons,
            vec![
                (MouseButton::WheelUp, false),
                (MouseButton::WheelDown, false),
                (MouseButton::Right, true),
            ]
        );
    }

    #[test]
    fn test_utf8_text() {
        assert_eq!(decode("é日🎉".as_bytes()), vec![
            Event::Text("é".into()),
            Event::Text("日".into()),
            Event::Text("🎉".into()),
        ]);
    }

    #[test]
    fn test_invalid_utf8_skipped() {
        let events = decode(b"\xff\x80a");
        assert_eq!(events, vec![Event::Key(KeyEvent::char('a'))]);
    }

    #[test]
    fn test_split_sequence_waits_for_rest() {
        let mut decoder = InputDecoder::new();
        decoder.feed(b"\x1b[");
        assert_eq!(decoder.next_event(), None);
        assert!(decoder.has_pending());

        decoder.feed(b"1;5");
        assert_eq!(decoder.next_event(), None);

        decoder.feed(b"A");
        let event = decoder.next_event().unwrap();
        assert_eq!(event.as_key().unwrap().code, KeyCode::Up);
        assert!(!decoder.has_pending());
    }

    #[test]
    fn test_split_utf8_waits_for_rest() {
        let bytes = "日".as_bytes();
        let mut decoder = InputDecoder::new();
        decoder.feed(&bytes[..1]);
        assert_eq!(decoder.next_event(), None);
        decoder.feed(&bytes[1..]);
        assert_eq!(decoder.next_event(), Some(Event::Text("日".into())));
    }

    #[test]
    fn test_overlong_sequence_discarded() {
        let mut decoder = InputDecoder::new();
        decoder.feed(b"\x1b[");
        decoder.feed(&[b'1'; MAX_SEQUENCE + 4]);
        assert_eq!(decoder.next_event(), None);
        assert!(!decoder.has_pending());

        decoder.feed(b"k");
        assert_eq!(decoder.next_event(), Some(Event::Key(KeyEvent::char('k'))));
    }

    #[test]
    fn test_discard_pending() {
        let mut decoder = InputDecoder::new();
        decoder.feed(b"\x1b[<0;1");
        assert_eq!(decoder.next_event(), None);
        decoder.discard_pending();
        assert!(!decoder.has_pending());
    }
}
