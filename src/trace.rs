use std::{
    fs,
    io::{self, BufRead, BufReader},
    path::Path,
};

use xz2::read::XzDecoder;

use crate::error::TraceError;

/// Lazily reads whitespace-separated hex addresses, one line at a time.
pub struct Trace<R> {
    reader: R,
    buf: String,
    /// Byte offset of the next unread token in `buf`.
    pos: usize,
    line_no: usize,
    done: bool,
}

impl Trace<Box<dyn BufRead>> {
    /// Opens a trace file, decompressing it on the fly when it ends in `.xz`.
    pub fn open(path: &Path) -> io::Result<Self> {
        let stream = fs::File::open(path)?;
        let reader: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "xz") {
            Box::new(BufReader::new(XzDecoder::new(stream)))
        } else {
            Box::new(BufReader::new(stream))
        };
        Ok(Trace::new(reader))
    }
}

impl<R: BufRead> Trace<R> {
    pub fn new(reader: R) -> Self {
        Trace {
            reader,
            buf: String::new(),
            pos: 0,
            line_no: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for Trace<R> {
    type Item = Result<u32, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rest = &self.buf[self.pos..];
            let trimmed = rest.trim_start();
            if !trimmed.is_empty() {
                let start = self.pos + (rest.len() - trimmed.len());
                let len = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
                let token = &self.buf[start..start + len];
                self.pos = start + len;
                return Some(parse_addr(token).ok_or_else(|| TraceError::Parse {
                    token: token.to_owned(),
                    line: self.line_no,
                }));
            }
            if self.done {
                return None;
            }

            self.buf.clear();
            self.pos = 0;
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => self.line_no += 1,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            }
        }
    }
}

/// Parses one hex token, with or without a `0x` prefix.
pub fn parse_addr(token: &str) -> Option<u32> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u32::from_str_radix(digits, 16).ok()
}
