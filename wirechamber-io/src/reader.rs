//! Raw event file reader.
//!
//! One channel hit per line, whitespace separated:
//!
//! ```text
//! # event  plane  wire  raw  [sequence]
//! 1        u1     120   1432
//! 1        u1     121   1390  0
//! 1        v1     88    1501
//! 2        u1     17    980
//! ```
//!
//! Consecutive lines sharing an event number form one event. Everything after
//! `#` is a comment. Plane names are resolved against the chamber's planes.
//! A malformed line is reported in place of the event it interrupts.

use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use std::str::FromStr;
use wirechamber_vdc::{PlaneHit, RawEvent, RawHit};

/// Iterator over the events of a raw event file.
pub struct RawEventReader<R> {
    lines: Lines<R>,
    planes: Vec<String>,
    line_number: usize,
    pending: Option<(u64, PlaneHit)>,
}

impl RawEventReader<BufReader<File>> {
    /// Opens an event file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P, planes: &[&str]) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), planes))
    }
}

impl<R: BufRead> RawEventReader<R> {
    /// Creates a reader resolving plane names to indices in `planes`.
    pub fn new(reader: R, planes: &[&str]) -> Self {
        Self {
            lines: reader.lines(),
            planes: planes.iter().map(ToString::to_string).collect(),
            line_number: 0,
            pending: None,
        }
    }

    /// Number of lines consumed so far.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn parse_error(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            line: self.line_number,
            message: message.into(),
        }
    }

    fn parse_field<T: FromStr>(&self, field: Option<&str>, name: &str) -> Result<T> {
        let field = field.ok_or_else(|| self.parse_error(format!("missing {name}")))?;
        field
            .parse()
            .map_err(|_| self.parse_error(format!("invalid {name}: '{field}'")))
    }

    fn parse_line(&self, line: &str) -> Result<Option<(u64, PlaneHit)>> {
        let content = line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            return Ok(None);
        }

        let mut fields = content.split_whitespace();
        let event: u64 = self.parse_field(fields.next(), "event number")?;
        let plane_name = fields
            .next()
            .ok_or_else(|| self.parse_error("missing plane name"))?;
        let plane = self
            .planes
            .iter()
            .position(|name| name == plane_name)
            .ok_or_else(|| self.parse_error(format!("unknown plane '{plane_name}'")))?;
        let wire: i32 = self.parse_field(fields.next(), "wire")?;
        let raw_time: i32 = self.parse_field(fields.next(), "raw time")?;
        let sequence: u32 = match fields.next() {
            Some(field) => self.parse_field(Some(field), "sequence")?,
            None => 0,
        };
        if let Some(extra) = fields.next() {
            return Err(self.parse_error(format!("unexpected field '{extra}'")));
        }

        Ok(Some((
            event,
            PlaneHit::new(plane, RawHit::new(wire, raw_time, sequence)),
        )))
    }
}

fn start_event(number: u64, hit: PlaneHit) -> RawEvent {
    let mut event = RawEvent::new(number);
    event.hits.push(hit);
    event
}

impl<R: BufRead> Iterator for RawEventReader<R> {
    type Item = Result<RawEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut event = self
            .pending
            .take()
            .map(|(number, hit)| start_event(number, hit));

        loop {
            let Some(line) = self.lines.next() else {
                return event.map(Ok);
            };
            self.line_number += 1;

            let line = match line {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            let (number, hit) = match self.parse_line(&line) {
                Ok(Some(parsed)) => parsed,
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            };

            if let Some(current) = event.as_mut() {
                if current.number == number {
                    current.hits.push(hit);
                    continue;
                }
                self.pending = Some((number, hit));
                return event.map(Ok);
            }
            event = Some(start_event(number, hit));
        }
    }
}
