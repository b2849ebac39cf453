//! Data Fetcher Module
//! Downloads the time series CSV and stores it on disk.

use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("Failed to write downloaded data to '{0}'")]
    Write(PathBuf, #[source] std::io::Error),
}

/// Fetches the upstream CSV with a blocking HTTP GET. No request timeout is set.
pub struct DataFetcher;

impl DataFetcher {
    /// Download `url` and write the payload to `dest`, replacing any existing file.
    ///
    /// Returns the number of bytes written.
    pub fn download_to(url: &str, dest: &Path) -> Result<usize, FetchError> {
        info!("Downloading data...");

        let client = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()
            .map_err(FetchError::Client)?;

        let response = client
            .get(url)
            .send()
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let status = response.status();
        let response = response
            .error_for_status()
            .map_err(|source| FetchError::HttpStatus {
                url: url.to_string(),
                status,
                source,
            })?;

        let bytes = response
            .bytes()
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        fs::write(dest, &bytes).map_err(|e| FetchError::Write(dest.to_path_buf(), e))?;
        debug!("Wrote {} bytes to {:?}", bytes.len(), dest);

        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    /// Serves one response on a local port after `delay`.
    fn serve_once(body: &'static str, delay: Duration) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/covid_data.csv", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }

            thread::sleep(delay);
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();
        });

        (url, handle)
    }

    #[test]
    fn slow_server_is_waited_for() {
        let body = "Admin2,Province_State\nBoulder,Colorado\n";
        let (url, server) = serve_once(body, Duration::from_secs(35));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("covid_data.csv");

        let written = DataFetcher::download_to(&url, &dest).unwrap();

        server.join().unwrap();
        assert_eq!(written, body.len());
        assert_eq!(fs::read_to_string(&dest).unwrap(), body);
    }

    #[test]
    fn malformed_url_fails_without_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("covid_data.csv");

        let result = DataFetcher::download_to("not a url", &dest);

        assert!(matches!(result, Err(FetchError::NetworkRequest(_, _))));
        assert!(!dest.exists());
    }
}
