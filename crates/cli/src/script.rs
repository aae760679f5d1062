//! Replay scripts and the bus that plays them.
//!
//! ```text
//! # comment
//! keys A,START        # held from here on
//! 40 03 00            # 25 bits by default
//! 00 /8               # explicit bit count
//! keys none
//! ```

use std::collections::VecDeque;

use gba_input_maps::{GbaKey, KeyInput};
use joybus_responder::{Bus, InputSource, RECEIVE_BUFFER_LEN};

use crate::error::CliError;

/// One frame to clock in, with the keys held while it is answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFrame {
    pub line: usize,
    pub bytes: Vec<u8>,
    pub bits: usize,
    pub keys: KeyInput,
}

/// A frame as played, and what came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub line: usize,
    pub request: Vec<u8>,
    pub bits: usize,
    pub keys: KeyInput,
    pub response: Option<Vec<u8>>,
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns [`CliError::Script`] for the first malformed line.
pub fn parse_script(text: &str) -> Result<Vec<ScriptFrame>, CliError> {
    let mut keys = KeyInput::NONE;
    let mut frames = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let mut words = content.splitn(2, char::is_whitespace);
        if words.next().is_some_and(|w| w.eq_ignore_ascii_case("keys")) {
            keys = parse_keys(words.next().unwrap_or_default(), line)?;
            continue;
        }

        let (bytes, bits) = parse_frame(content, line)?;
        frames.push(ScriptFrame {
            line,
            bytes,
            bits,
            keys,
        });
    }
    Ok(frames)
}

fn parse_keys(list: &str, line: usize) -> Result<KeyInput, CliError> {
    let list = list.trim();
    if list.is_empty() {
        return Err(CliError::script(line, "keys needs a key list or 'none'"));
    }
    if list.eq_ignore_ascii_case("none") {
        return Ok(KeyInput::NONE);
    }
    list.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|name| !name.is_empty())
        .try_fold(KeyInput::NONE, |input, name| {
            name.parse::<GbaKey>()
                .map(|key| input.with(key))
                .map_err(|e| CliError::script(line, e.to_string()))
        })
}

fn parse_frame(content: &str, line: usize) -> Result<(Vec<u8>, usize), CliError> {
    let mut parts = content.splitn(2, '/');
    let hex = parts.next().unwrap_or_default();

    let mut bytes = Vec::new();
    for token in hex.split_whitespace() {
        let token = token.trim_start_matches("0x");
        if token.len() % 2 != 0 {
            return Err(CliError::script(line, format!("odd number of hex digits in '{token}'")));
        }
        for pair in token.as_bytes().chunks(2) {
            let byte = std::str::from_utf8(pair)
                .ok()
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(|| CliError::script(line, format!("invalid hex byte in '{token}'")))?;
            bytes.push(byte);
        }
    }

    if bytes.is_empty() {
        return Err(CliError::script(line, "frame has no bytes"));
    }
    if bytes.len() > RECEIVE_BUFFER_LEN {
        return Err(CliError::script(
            line,
            format!("frame longer than {RECEIVE_BUFFER_LEN} bytes"),
        ));
    }

    let bits = match parts.next() {
        Some(count) => count
            .trim()
            .parse::<usize>()
            .map_err(|e| CliError::script(line, format!("invalid bit count: {e}")))?,
        None => bytes.len() * 8 + 1,
    };
    Ok((bytes, bits))
}

/// Feeds script frames to the poll loop and records the replies.
#[derive(Debug, Default)]
pub struct ScriptBus {
    pending: VecDeque<ScriptFrame>,
    exchanges: Vec<Exchange>,
}

impl ScriptBus {
    pub fn new(frames: &[ScriptFrame]) -> Self {
        Self {
            pending: frames.iter().cloned().collect(),
            exchanges: Vec::new(),
        }
    }

    pub fn into_exchanges(self) -> Vec<Exchange> {
        self.exchanges
    }
}

impl Bus for ScriptBus {
    fn receive(&mut self, buf: &mut [u8]) -> Option<usize> {
        let frame = self.pending.pop_front()?;
        for (dst, src) in buf.iter_mut().zip(&frame.bytes) {
            *dst = *src;
        }
        self.exchanges.push(Exchange {
            line: frame.line,
            request: frame.bytes,
            bits: frame.bits,
            keys: frame.keys,
            response: None,
        });
        Some(frame.bits)
    }

    fn send(&mut self, bytes: &[u8], _bits: usize) {
        if let Some(exchange) = self.exchanges.last_mut() {
            exchange.response = Some(bytes.to_vec());
        }
    }
}

/// Key states in frame order; one is consumed per received frame.
#[derive(Debug, Default)]
pub struct ScriptInput {
    keys: VecDeque<KeyInput>,
}

impl ScriptInput {
    pub fn new(frames: &[ScriptFrame]) -> Self {
        Self {
            keys: frames.iter().map(|f| f.keys).collect(),
        }
    }
}

impl InputSource for ScriptInput {
    fn snapshot(&mut self) -> KeyInput {
        self.keys.pop_front().unwrap_or(KeyInput::NONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_frames_and_keys() -> TestResult {
        let script = "\
# GameCube probe
00
keys a, start
40 03 00
4003 01 / 25
keys none
0x41 /8
";
        let frames = parse_script(script)?;
        assert_eq!(frames.len(), 4);
        let first = frames.first().ok_or("missing frame")?;
        assert_eq!(first.bits, 9);
        assert!(first.keys.is_empty());

        let second = frames.get(1).ok_or("missing frame")?;
        assert_eq!(second.bytes, vec![0x40, 0x03, 0x00]);
        assert_eq!(second.bits, 25);
        assert!(second.keys.is_pressed(GbaKey::A));
        assert!(second.keys.is_pressed(GbaKey::Start));

        let third = frames.get(2).ok_or("missing frame")?;
        assert_eq!(third.bytes, vec![0x40, 0x03, 0x01]);
        assert_eq!(third.line, 5);

        let last = frames.get(3).ok_or("missing frame")?;
        assert_eq!(last.bytes, vec![0x41]);
        assert_eq!(last.bits, 8);
        assert!(last.keys.is_empty());
        Ok(())
    }

    #[test]
    fn parse_rejects_bad_lines() {
        for (script, line) in [
            ("00\nkeys TURBO\n", 2),
            ("0\n", 1),
            ("zz\n", 1),
            ("00 /x\n", 1),
            ("# only\n/9\n", 2),
            ("keys\n", 1),
        ] {
            match parse_script(script) {
                Err(CliError::Script { line: got, .. }) => assert_eq!(got, line, "{script:?}"),
                other => assert!(other.is_err(), "{script:?} parsed"),
            }
        }
    }

    #[test]
    fn script_bus_records_replies() {
        let frames = vec![
            ScriptFrame {
                line: 1,
                bytes: vec![0x00],
                bits: 9,
                keys: KeyInput::NONE,
            },
            ScriptFrame {
                line: 2,
                bytes: vec![0x00, 0x00],
                bits: 17,
                keys: KeyInput::NONE,
            },
        ];
        let mut bus = ScriptBus::new(&frames);
        let mut buf = [0u8; 4];
        assert_eq!(bus.receive(&mut buf), Some(9));
        bus.send(&[0x05, 0x00, 0x01], 24);
        assert_eq!(bus.receive(&mut buf), Some(17));
        assert_eq!(bus.receive(&mut buf), None);

        let exchanges = bus.into_exchanges();
        assert_eq!(
            exchanges.first().and_then(|e| e.response.clone()),
            Some(vec![0x05, 0x00, 0x01])
        );
        assert_eq!(exchanges.get(1).and_then(|e| e.response.clone()), None);
    }
}
