//! Stage summaries.
//!
//! Every stage produces one summary row per language.
//! Rows are printed as an aligned table and saved as CSV in the results directory.
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::error::Error;

/// Render rows as a right-aligned text table, header included.
pub fn render_table<T: Serialize>(rows: &[T]) -> Result<String, Error> {
    let mut w = csv::Writer::from_writer(Vec::new());
    for row in rows {
        w.serialize(row)?;
    }
    let data = w.into_inner().map_err(|e| Error::Io(e.into_error()))?;

    let mut r = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(data.as_slice());
    let records: Vec<csv::StringRecord> = r.records().collect::<Result<_, _>>()?;

    let nb_cols = records.iter().map(|r| r.len()).max().unwrap_or(0);
    let widths: Vec<usize> = (0..nb_cols)
        .map(|col| {
            records
                .iter()
                .filter_map(|r| r.get(col))
                .map(|field| field.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut table = String::new();
    for record in &records {
        let line: Vec<String> = record
            .iter()
            .zip(&widths)
            .map(|(field, width)| format!("{:>width$}", field, width = width))
            .collect();
        table.push_str(&line.join("  "));
        table.push('\n');
    }
    Ok(table)
}

/// Print the summary on stdout and save it as CSV at `dst`.
pub fn report<T: Serialize>(title: &str, rows: &[T], dst: &Path) -> Result<(), Error> {
    println!("\n{title}:");
    print!("{}", render_table(rows)?);
    write_csv(rows, dst)
}

/// Save rows as CSV at `dst`, creating parent directories.
pub fn write_csv<T: Serialize>(rows: &[T], dst: &Path) -> Result<(), Error> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut w = csv::Writer::from_path(dst)?;
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    info!("summary written to {:?}", dst);
    Ok(())
}
