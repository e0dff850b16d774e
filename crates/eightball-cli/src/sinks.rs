//! Line-oriented input and JSON output for headless runs.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use eightball_core::sink::{InputEvent, InputSource, RenderSink};
use eightball_sim::input::parse_command;
use eightball_sim::render::Frame;

/// Next command from `reader`, skipping blank, comment and malformed lines.
/// `None` once the reader is exhausted or fails.
fn read_command<R: BufRead>(reader: &mut R, line_no: &mut usize) -> Option<InputEvent> {
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => return None,
            Ok(_) => {
                *line_no += 1;
                match parse_command(&line) {
                    Ok(Some(event)) => return Some(event),
                    Ok(None) => {},
                    Err(e) => {
                        tracing::warn!(line = *line_no, error = %e, "Skipping shot command");
                    },
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Input read failed, treating as end of input");
                return None;
            },
        }
    }
}

/// Shot held back until the table is at rest; `Quit` passes straight through.
fn gate(next: &mut Option<InputEvent>, accepting: bool) -> Option<InputEvent> {
    match *next {
        Some(InputEvent::Quit) => next.take(),
        Some(InputEvent::Shot(_)) if accepting => next.take(),
        _ => None,
    }
}

/// Reads shot commands (`aim dx dy`, `click x y`, `quit`) from a script, one per poll.
pub struct LineInput<R> {
    reader: R,
    next: Option<InputEvent>,
    line_no: usize,
    eof: bool,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            next: None,
            line_no: 0,
            eof: false,
        }
    }
}

impl<R: BufRead> InputSource for LineInput<R> {
    fn poll(&mut self, accepting: bool) -> Option<InputEvent> {
        if self.next.is_none() && !self.eof {
            self.next = read_command(&mut self.reader, &mut self.line_no);
            self.eof = self.next.is_none();
        }
        gate(&mut self.next, accepting)
    }

    fn is_exhausted(&self) -> bool {
        self.eof && self.next.is_none()
    }
}

/// Commands read on a background thread, for interactive input.
///
/// While the balls roll, polling never blocks. At rest it waits for the next command.
pub struct ChannelInput {
    rx: Receiver<InputEvent>,
    next: Option<InputEvent>,
    closed: bool,
}

impl ChannelInput {
    /// `open` runs on the reader thread, so the reader need not be `Send`.
    pub fn spawn<R, F>(open: F) -> Self
    where
        R: BufRead,
        F: FnOnce() -> R + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut reader = open();
            let mut line_no = 0;
            while let Some(event) = read_command(&mut reader, &mut line_no) {
                if tx.send(event).is_err() {
                    break;
                }
            }
        });
        Self {
            rx,
            next: None,
            closed: false,
        }
    }
}

impl InputSource for ChannelInput {
    fn poll(&mut self, accepting: bool) -> Option<InputEvent> {
        if self.next.is_none() && !self.closed {
            let received = if accepting {
                self.rx.recv().map_err(|_| TryRecvError::Disconnected)
            } else {
                self.rx.try_recv()
            };
            match received {
                Ok(event) => self.next = Some(event),
                Err(TryRecvError::Disconnected) => self.closed = true,
                Err(TryRecvError::Empty) => {},
            }
        }
        gate(&mut self.next, accepting)
    }

    fn is_exhausted(&self) -> bool {
        self.closed && self.next.is_none()
    }
}

/// Writes every `every`-th frame as one JSON object per line.
pub struct JsonLinesRender<W: Write> {
    writer: W,
    every: u64,
    written: u64,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesRender<W> {
    pub fn new(writer: W, every: u64) -> Self {
        Self {
            writer,
            every: every.max(1),
            written: 0,
            error: None,
        }
    }

    pub fn frames_written(&self) -> u64 {
        self.written
    }

    /// Flush and report the first write error, if any.
    pub fn finish(mut self) -> io::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()
    }

    fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")
    }
}

impl<W: Write> RenderSink<Frame> for JsonLinesRender<W> {
    fn present(&mut self, frame: &Frame) {
        if self.error.is_some() || frame.step % self.every != 0 {
            return;
        }
        match self.write_frame(frame) {
            Ok(()) => self.written += 1,
            Err(e) => {
                tracing::warn!(error = %e, "Frame output failed, dropping further frames");
                self.error = Some(e);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eightball_core::sink::Aim;
    use eightball_core::vec2::Vec2;
    use eightball_core::sink::{CollectTelemetry, NullRender};
    use eightball_sim::config::SimulationConfig;
    use eightball_sim::{MatchOutcome, PoolMatch, run_match};

    #[test]
    fn line_input_skips_junk_and_holds_shots() {
        let script = "# break\naim -100 2\n\nbogus\nclick 300 300\nquit\n";
        let mut input = LineInput::new(script.as_bytes());
        assert_eq!(input.poll(false), None);
        assert_eq!(
            input.poll(true),
            Some(InputEvent::Shot(Aim::Offset(Vec2::new(-100.0, 2.0))))
        );
        assert_eq!(
            input.poll(true),
            Some(InputEvent::Shot(Aim::Pointer(Vec2::new(300.0, 300.0))))
        );
        assert!(!input.is_exhausted());
        assert_eq!(input.poll(true), Some(InputEvent::Quit));
        assert_eq!(input.poll(true), None);
        assert!(input.is_exhausted());
    }

    #[test]
    fn line_input_sees_quit_while_moving() {
        let mut input = LineInput::new("aim -100 2\nquit\n".as_bytes());
        assert!(matches!(input.poll(true), Some(InputEvent::Shot(_))));
        assert_eq!(input.poll(false), Some(InputEvent::Quit));
        assert!(input.is_exhausted());
    }

    #[test]
    fn quit_stops_a_frictionless_match() {
        let frictionless = SimulationConfig::new(1.0, 0.0).unwrap();
        let mut game = PoolMatch::new(frictionless, 1);
        let mut input = LineInput::new("aim -100 2\nquit\n".as_bytes());
        let outcome = run_match(
            &mut game,
            &mut input,
            &mut NullRender,
            &mut CollectTelemetry::default(),
            Some(20_000),
        );
        assert_eq!(outcome, MatchOutcome::Quit);
        assert_eq!(game.state().shots, 1);
        assert!(game.state().step < 20_000);
    }

    #[test]
    fn channel_input_delivers_in_order_then_closes() {
        let mut input = ChannelInput::spawn(|| "click 300 300\nnonsense\nquit\n".as_bytes());
        assert_eq!(
            input.poll(true),
            Some(InputEvent::Shot(Aim::Pointer(Vec2::new(300.0, 300.0))))
        );
        assert_eq!(input.poll(true), Some(InputEvent::Quit));
        assert_eq!(input.poll(true), None);
        assert!(input.is_exhausted());
    }

    #[test]
    fn json_lines_writes_every_nth_frame() {
        let mut game = PoolMatch::new(SimulationConfig::default(), 1);
        let mut out = Vec::new();
        let mut render = JsonLinesRender::new(&mut out, 2);
        game.shoot(Aim::Offset(Vec2::new(-50.0, 0.0)));
        for _ in 0..6 {
            game.step();
            render.present(&game.frame());
        }
        assert_eq!(render.frames_written(), 3);
        render.finish().unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["step"], 2);
        assert_eq!(first["balls"].as_array().map(Vec::len), Some(16));
    }
}
