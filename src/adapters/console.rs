//! Console [`OperatorPort`]: line-buffered keypad and a 16x2 LCD drawn
//! as text.
//!
//! Key mapping follows the HMI keypad: digits arrive as their numeric value
//! (`'7'` → 7), `+` and `-` as ASCII, and the end of an input line as the
//! configured confirmation key.  Any other printable character is passed
//! through as its byte.  A line without digits (a menu choice such as `+`)
//! does not confirm, so `+` Enter followed by `12345` Enter opens the door.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use heapless::String;
use log::warn;

use crate::app::ports::OperatorPort;
use crate::error::OperatorError;
use crate::interaction::screen::LCD_COLUMNS;

type Row = String<LCD_COLUMNS>;

pub struct ConsoleOperator<R, W> {
    input: R,
    output: W,
    confirm_key: u8,
    pending: VecDeque<u8>,
    rows: [Row; 2],
}

impl ConsoleOperator<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Keypad on stdin, display on stdout.
    pub fn stdio(confirm_key: u8) -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout(), confirm_key)
    }
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    pub fn new(input: R, output: W, confirm_key: u8) -> Self {
        Self {
            input,
            output,
            confirm_key,
            pending: VecDeque::new(),
            rows: [Row::new(), Row::new()],
        }
    }

    /// Current contents of both display rows.
    pub fn rows(&self) -> (&str, &str) {
        (self.rows[0].as_str(), self.rows[1].as_str())
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn map_key(&self, ch: char) -> Option<u8> {
        match ch {
            '\r' => None,
            '\n' => Some(self.confirm_key),
            '0'..='9' => ch.to_digit(10).map(|d| d as u8),
            c if c.is_ascii() && !c.is_ascii_control() => Some(c as u8),
            _ => None,
        }
    }

    fn refill(&mut self) -> Result<(), OperatorError> {
        let mut line = std::string::String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|_| OperatorError::InputClosed)?;
        if read == 0 {
            return Err(OperatorError::InputClosed);
        }
        let mut keys: Vec<u8> = line.chars().filter_map(|c| self.map_key(c)).collect();
        let has_digit = line.chars().any(|c| c.is_ascii_digit());
        if !has_digit && keys.last() == Some(&self.confirm_key) && keys.len() > 1 {
            keys.pop();
        }
        self.pending.extend(keys);
        Ok(())
    }

    fn render(&mut self) {
        let border = "-".repeat(LCD_COLUMNS);
        let frame = format!(
            "+{border}+\n|{:<w$}|\n|{:<w$}|\n+{border}+\n",
            self.rows[0].as_str(),
            self.rows[1].as_str(),
            w = LCD_COLUMNS,
        );
        if self
            .output
            .write_all(frame.as_bytes())
            .and_then(|_| self.output.flush())
            .is_err()
        {
            warn!("Console: display write failed");
        }
    }
}

impl<R: BufRead, W: Write> OperatorPort for ConsoleOperator<R, W> {
    fn get_pressed_key(&mut self) -> Result<u8, OperatorError> {
        loop {
            if let Some(key) = self.pending.pop_front() {
                return Ok(key);
            }
            self.refill()?;
        }
    }

    fn display(&mut self, row: u8, text: &str) {
        let Some(slot) = self.rows.get_mut(usize::from(row)) else {
            return;
        };
        slot.clear();
        for ch in text.chars() {
            if slot.push(ch).is_err() {
                break;
            }
        }
        if row == 1 {
            self.render();
        }
    }

    fn put_char(&mut self, ch: char) {
        // Characters past the last column are dropped, as on the LCD.
        if self.rows[1].push(ch).is_ok() {
            self.render();
        }
    }

    fn clear_screen(&mut self) {
        self.rows[0].clear();
        self.rows[1].clear();
    }
}
