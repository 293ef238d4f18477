// THEORY:
// The `csv_sink` module is the pipeline's persistent output collaborator: an
// append-only CSV file with one row per successfully processed image. The
// sink owns the file format (header, field order, quoting) so that the
// workers only ever hand it a finished `ResultRow`. Appends flush before
// returning, which makes each append a single atomic operation from the
// pipeline's point of view, and write failures travel back to the caller
// instead of disappearing inside the sink.

use crate::core_modules::ranking::TOP_COLOR_COUNT;
use csv::Writer;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// The header row written once per output file.
pub const RESULT_HEADER: [&str; 4] = ["URL", "top_color1", "top_color2", "top_color3"];

/// One output record: the source URL plus up to three `#RRGGBB` strings in
/// descending-frequency order. Rows with fewer than three colors are padded
/// with empty fields so every record has exactly four.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub url: String,
    pub top_colors: Vec<String>,
}

/// Append-only CSV writer shared by all count workers.
pub struct CsvSink {
    path: PathBuf,
    writer: Writer<File>,
}

impl CsvSink {
    /// Opens the sink in append mode, creating the file and writing the
    /// header row only when the file is new or empty. Re-running over the
    /// same list therefore appends more rows instead of clobbering old ones.
    pub fn open(path: &Path) -> Result<Self, csv::Error> {
        let path = normalize_extension(path);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = Writer::from_writer(file);
        if needs_header {
            writer.write_record(RESULT_HEADER)?;
            writer.flush()?;
        }
        Ok(Self { path, writer })
    }

    /// Appends one record and flushes it to disk. Errors are returned to
    /// the emitting worker; a computed result is never silently dropped.
    pub fn append(&mut self, row: &ResultRow) -> Result<(), csv::Error> {
        let mut record = Vec::with_capacity(1 + TOP_COLOR_COUNT);
        record.push(row.url.as_str());
        for hex in row.top_colors.iter().take(TOP_COLOR_COUNT) {
            record.push(hex.as_str());
        }
        for _ in row.top_colors.len()..TOP_COLOR_COUNT {
            record.push("");
        }

        self.writer.write_record(&record)?;
        Ok(self.writer.flush()?)
    }

    /// The path actually written to, after extension normalization.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Appends a `.csv` extension when the given path carries none.
fn normalize_extension(path: &Path) -> PathBuf {
    match path.extension() {
        Some(extension) if extension == "csv" => path.to_path_buf(),
        _ => {
            let mut with_extension = path.as_os_str().to_owned();
            with_extension.push(".csv");
            PathBuf::from(with_extension)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CsvSink, ResultRow};
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("color_census_{name}_{}.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn row(url: &str, colors: &[&str]) -> ResultRow {
        ResultRow {
            url: url.to_owned(),
            top_colors: colors.iter().map(|c| (*c).to_owned()).collect(),
        }
    }

    #[test]
    fn open_writes_the_header_once() {
        let path = scratch("sink_header");
        {
            let mut sink = CsvSink::open(&path).unwrap();
            sink.append(&row("http://a.example/1.png", &["#FF0000", "#00FF00", "#0000FF"]))
                .unwrap();
        }
        // Reopening must not write a second header.
        {
            let mut sink = CsvSink::open(&path).unwrap();
            sink.append(&row("http://a.example/1.png", &["#FF0000", "#00FF00", "#0000FF"]))
                .unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "URL,top_color1,top_color2,top_color3");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], lines[2]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn short_rows_are_padded_to_four_fields() {
        let path = scratch("sink_padding");
        let mut sink = CsvSink::open(&path).unwrap();
        sink.append(&row("http://a.example/solid.png", &["#204060"])).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let data_line = contents.lines().nth(1).unwrap();
        assert_eq!(data_line, "http://a.example/solid.png,#204060,,");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_extension_is_normalized() {
        let base = std::env::temp_dir().join(format!("color_census_sink_ext_{}", std::process::id()));
        let expected = base.with_extension("csv");
        let _ = std::fs::remove_file(&expected);

        let sink = CsvSink::open(&base).unwrap();
        assert_eq!(sink.path(), expected.as_path());
        assert!(expected.exists());

        std::fs::remove_file(&expected).unwrap();
    }
}
