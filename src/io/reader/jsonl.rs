//! JSON Lines reader.
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::marker::PhantomData;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::Error;

/// Iterates over the records of a JSON Lines stream.
///
/// Blank lines are skipped. A line that can't be parsed yields an error,
/// and iteration can continue after it.
#[derive(Debug)]
pub struct Reader<T, R>
where
    R: Read,
{
    lines: Lines<BufReader<R>>,
    line_number: usize,
    record: PhantomData<T>,
}

pub type JsonlReader<T> = Reader<T, File>;

impl<T> JsonlReader<T> {
    pub fn from_path(src: &Path) -> Result<Self, Error> {
        if !src.exists() {
            return Err(Error::MissingFile(src.to_path_buf()));
        }
        let f = File::open(src)?;
        Ok(Self::new(f))
    }
}

impl<T, R> Reader<T, R>
where
    R: Read,
{
    pub fn new(inner: R) -> Self {
        Self {
            lines: BufReader::new(inner).lines(),
            line_number: 0,
            record: PhantomData,
        }
    }
}

impl<T, R> Iterator for Reader<T, R>
where
    T: DeserializeOwned,
    R: Read,
{
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_number += 1;
            match line {
                Ok(l) if l.trim().is_empty() => continue,
                Ok(l) => {
                    return Some(serde_json::from_str(&l).map_err(|e| {
                        Error::Custom(format!("line {}: {}", self.line_number, e))
                    }))
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Read a whole JSON Lines file, failing on the first invalid record.
pub fn read_all<T: DeserializeOwned>(src: &Path) -> Result<Vec<T>, Error> {
    JsonlReader::from_path(src)?.collect()
}
