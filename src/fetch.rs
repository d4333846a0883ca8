// src/fetch.rs

use std::{fs::File, path::Path, time::Duration};

use reqwest::blocking::{Client, Response};
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};
use crate::iter::CsvIterator;
use crate::options::CsvOptions;
use crate::schema::CsvRecord;

/// Open `path` for reading.
pub fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// GET `url` and return the response body as a stream. A transport
/// failure or any non-2xx status is an error; nothing is retried.
pub fn open_url(url: &str) -> Result<Response> {
    let parsed = Url::parse(url).map_err(|source| Error::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    // no client-side timeout: cancellation is up to the caller
    let client = Client::builder()
        .timeout(None::<Duration>)
        .build()
        .map_err(|source| Error::Fetch {
            url: url.to_string(),
            source,
        })?;

    let resp = client
        .get(parsed.as_str())
        .send()
        .map_err(|source| Error::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = resp.status();
    if !status.is_success() {
        // resp is dropped here, releasing the connection
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status,
        });
    }
    debug!(%status, "response ok");
    Ok(resp)
}

impl<T: CsvRecord> CsvIterator<T, File> {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_options(path, &CsvOptions::default())
    }

    #[tracing::instrument(level = "info", skip(path, options), fields(path = %path.as_ref().display()))]
    pub fn from_file_with_options(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Self> {
        let file = open_file(path.as_ref())?;
        let it = Self::from_reader_with_options(file, options)?;
        info!(columns = it.headers().len(), "opened csv file");
        Ok(it)
    }
}

impl<T: CsvRecord> CsvIterator<T, Response> {
    pub fn from_url(url: &str) -> Result<Self> {
        Self::from_url_with_options(url, &CsvOptions::default())
    }

    #[tracing::instrument(level = "info", skip(options))]
    pub fn from_url_with_options(url: &str, options: &CsvOptions) -> Result<Self> {
        let resp = open_url(url)?;
        let it = Self::from_reader_with_options(resp, options)?;
        info!(columns = it.headers().len(), "opened csv url");
        Ok(it)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_record;
    use crate::error::ErrorKind;
    use anyhow::Result;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::NamedTempFile;

    csv_record! {
        #[derive(Debug, Default)]
        struct Person {
            #[csv("name,required")]
            name: String,
            #[csv("age")]
            age: i32,
            #[csv("email,required")]
            email: String,
        }
    }

    /// Serve a single HTTP response on a local port; returns the URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
                let mut line = String::new();
                // drain request headers
                while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                    if line == "\r\n" {
                        break;
                    }
                    line.clear();
                }
                let response = format!(
                    "{}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}/people.csv", addr)
    }

    #[test]
    fn test_from_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "name,age,email\nJohn Doe,30,john@example.com\nJane,25,jane@example.com\n")?;

        let mut it: CsvIterator<Person, File> = CsvIterator::from_file(tmp.path())?;
        let people = it.to_vec()?;
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].name, "John Doe");
        assert_eq!(people[1].age, 25);
        assert!(it.close());
        Ok(())
    }

    #[test]
    fn test_from_file_with_delimiter() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "name|email\nAnn|ann@example.com\n")?;

        let options = CsvOptions::new().delimiter(b'|');
        let mut it: CsvIterator<Person, File> =
            CsvIterator::from_file_with_options(tmp.path(), &options)?;
        assert_eq!(it.to_vec()?[0].email, "ann@example.com");
        Ok(())
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = CsvIterator::<Person, File>::from_file("/definitely/not/here.csv")
            .err()
            .expect("open should fail");
        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
        assert!(err.to_string().contains("here.csv"));
    }

    #[test]
    fn test_invalid_url() {
        let err = CsvIterator::<Person, Response>::from_url("not a url")
            .err()
            .expect("url should be rejected");
        assert!(matches!(err, Error::InvalidUrl { .. }));
        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
    }

    #[test]
    fn test_from_url() -> Result<()> {
        let url = serve_once(
            "HTTP/1.1 200 OK",
            "name,age,email\nJohn Doe,30,john@example.com\n",
        );
        let mut it: CsvIterator<Person, Response> = CsvIterator::from_url(&url)?;
        assert_eq!(it.headers(), &["name", "age", "email"]);
        let people = it.to_vec()?;
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].age, 30);
        Ok(())
    }

    #[test]
    fn test_from_url_bad_status() {
        let url = serve_once("HTTP/1.1 404 Not Found", "missing");
        let err = CsvIterator::<Person, Response>::from_url(&url)
            .err()
            .expect("404 should fail construction");
        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
        match err {
            Error::HttpStatus { status, .. } => assert_eq!(status.as_u16(), 404),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_from_url_schema_error() {
        let url = serve_once("HTTP/1.1 200 OK", "name,age\nJohn,30\n");
        let err = CsvIterator::<Person, Response>::from_url(&url)
            .err()
            .expect("missing email column should fail");
        assert_eq!(err.kind(), ErrorKind::SchemaInvalid);
        assert_eq!(err.column(), Some("email"));
    }
}
