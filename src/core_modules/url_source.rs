// THEORY:
// The `url_source` module is the single producer's view of the input list: a
// text stream with one URL per line, consumed strictly sequentially. It owns
// the only fatal failure in the system. Without a readable URL list there is
// nothing to run, so `open` errors propagate all the way out, while a read
// error mid-stream merely ends submission early.

use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

/// Line-oriented reader over the URL list file.
pub struct UrlSource {
    lines: Lines<BufReader<File>>,
}

impl UrlSource {
    /// Opens the URL list. Failure here aborts the whole run.
    pub async fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path).await?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
        })
    }

    /// Yields the next URL, trimming surrounding whitespace and skipping
    /// blank lines. `None` terminates submission.
    pub async fn next_url(&mut self) -> io::Result<Option<String>> {
        while let Some(line) = self.lines.next_line().await? {
            let url = line.trim();
            if !url.is_empty() {
                return Ok(Some(url.to_owned()));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::UrlSource;
    use std::path::PathBuf;

    fn fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("color_census_{name}_{}.txt", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn yields_urls_in_file_order() {
        let path = fixture("url_order", "http://a.example/1.png\nhttp://b.example/2.jpg\n");
        let mut source = UrlSource::open(&path).await.unwrap();

        assert_eq!(source.next_url().await.unwrap().as_deref(), Some("http://a.example/1.png"));
        assert_eq!(source.next_url().await.unwrap().as_deref(), Some("http://b.example/2.jpg"));
        assert_eq!(source.next_url().await.unwrap(), None);

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn skips_blank_lines_and_trims_whitespace() {
        let path = fixture("url_blank", "\n  http://a.example/1.png  \n\n\t\nhttp://b.example/2.jpg");
        let mut source = UrlSource::open(&path).await.unwrap();

        assert_eq!(source.next_url().await.unwrap().as_deref(), Some("http://a.example/1.png"));
        assert_eq!(source.next_url().await.unwrap().as_deref(), Some("http://b.example/2.jpg"));
        assert_eq!(source.next_url().await.unwrap(), None);

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("color_census_no_such_input.txt");
        assert!(UrlSource::open(&path).await.is_err());
    }
}
