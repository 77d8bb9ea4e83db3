use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use log::info;
use reqwest::blocking::Client;

use crate::error::NadacError;

pub const DEFAULT_URL: &str = "https://download.medicaid.gov/data/nadac-comparison-02-01-2023.csv";

/// Where the comparison CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Url(String),
    File(PathBuf),
}

impl DatasetSource {
    pub fn describe(&self) -> String {
        match self {
            DatasetSource::Url(url) => url.clone(),
            DatasetSource::File(path) => path.display().to_string(),
        }
    }

    /// Open the source as a byte stream. For URLs the response body is returned
    /// unread, so the caller pulls it in whatever block size it wants.
    ///
    /// `connect_timeout` bounds establishing the connection only. Reading the body
    /// has no deadline, so a slow download of the full file is not cut short.
    pub fn open(&self, connect_timeout: Duration) -> Result<Box<dyn Read>, NadacError> {
        match self {
            DatasetSource::Url(url) => {
                let client = Client::builder()
                    .connect_timeout(connect_timeout)
                    .timeout(None::<Duration>)
                    .build()
                    .map_err(|e| NadacError::unavailable(url.as_str(), e))?;
                let resp = client
                    .get(url.as_str())
                    .send()
                    .and_then(|resp| resp.error_for_status())
                    .map_err(|e| NadacError::unavailable(url.as_str(), e))?;
                info!("connected to {} ({})", url, resp.status());
                Ok(Box::new(resp))
            }
            DatasetSource::File(path) => {
                let file = File::open(path)
                    .map_err(|e| NadacError::unavailable(path.display().to_string(), e))?;
                Ok(Box::new(file))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_open_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "NDC Description,NDC").unwrap();

        let source = DatasetSource::File(file.path().to_path_buf());
        let mut body = String::new();
        source
            .open(Duration::from_secs(1))
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "NDC Description,NDC");
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = DatasetSource::File(dir.path().join("missing.csv"));
        match source.open(Duration::from_secs(1)) {
            Err(NadacError::SourceUnavailable { origin, .. }) => {
                assert!(origin.ends_with("missing.csv"));
            }
            Err(other) => panic!("expected SourceUnavailable, got {}", other),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_unreachable_url_is_source_unavailable() {
        // Port 9 on loopback has nothing listening
        let source = DatasetSource::Url("http://127.0.0.1:9/nadac.csv".to_string());
        let err = source.open(Duration::from_secs(2)).err().unwrap();
        assert!(matches!(err, NadacError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_slow_body_outlives_connect_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request).unwrap();
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 19\r\nConnection: close\r\n\r\n")
                .unwrap();
            stream.write_all(b"NDC Description").unwrap();
            stream.flush().unwrap();
            thread::sleep(Duration::from_millis(1500));
            stream.write_all(b",NDC").unwrap();
        });

        let source = DatasetSource::Url(format!("http://{}/nadac.csv", addr));
        let mut body = String::new();
        source
            .open(Duration::from_secs(1))
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "NDC Description,NDC");
        server.join().unwrap();
    }
}
