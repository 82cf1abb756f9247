use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use chatline::backend::HttpBackend;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Config with two literal profiles posting to `url`
#[allow(dead_code)]
pub fn config_yaml(url: &str) -> String {
    format!(
        r#"endpoint:
  url: "{}"
  timeout_seconds: 5
  connect_timeout_seconds: 2
profiles:
  - name: "English"
    backend_id: "eng-001"
  - name: "Arabic"
    backend_id: "ar-001"
    direction: rtl
"#,
        url
    )
}

/// URL on a local port with nothing listening
#[allow(dead_code)]
pub fn unused_local_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().expect("no local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}/chat", port)
}

/// `HttpBackend` posting to `{base_url}/chat`
#[allow(dead_code)]
pub fn http_backend(base_url: &str, timeout: Duration) -> HttpBackend {
    HttpBackend::new(
        url::Url::parse(&format!("{}/chat", base_url)).expect("valid url"),
        timeout,
        Duration::from_secs(2),
    )
    .expect("failed to build http backend")
}
