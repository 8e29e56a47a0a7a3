//! JSON Lines writer.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;

use serde::Serialize;

use crate::error::Error;

use super::WriterTrait;

/// Writes one JSON document per line.
///
/// Strings are written as UTF-8, non-ASCII characters are not escaped.
pub struct Writer<T, W>
where
    W: Write,
{
    inner: BufWriter<W>,
    nb_records: usize,
    record: PhantomData<T>,
}

pub type JsonlWriter<T> = Writer<T, File>;

impl<T> JsonlWriter<T> {
    /// Create (or truncate) the file at `dst`.
    pub fn create(dst: &Path) -> Result<Self, Error> {
        let f = File::create(dst)?;
        Ok(Self::new(f))
    }
}

impl<T, W> Writer<T, W>
where
    W: Write,
{
    pub fn new(inner: W) -> Self {
        Self {
            inner: BufWriter::new(inner),
            nb_records: 0,
            record: PhantomData,
        }
    }

    /// Number of records written so far.
    pub fn nb_records(&self) -> usize {
        self.nb_records
    }

    /// Flush and get the inner writer back.
    pub fn into_inner(self) -> Result<W, Error> {
        self.inner
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}

impl<T, W> WriterTrait for Writer<T, W>
where
    T: Serialize,
    W: Write,
{
    type Item = T;

    fn write(&mut self, vals: Vec<T>) -> Result<(), Error> {
        for val in &vals {
            self.write_single(val)?;
        }
        Ok(())
    }

    fn write_single(&mut self, val: &T) -> Result<(), Error> {
        serde_json::to_writer(&mut self.inner, val)?;
        self.inner.write_all(b"\n")?;
        self.nb_records += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.inner.flush()?;
        Ok(())
    }
}
