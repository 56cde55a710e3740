use std::{
    fs,
    path::{Path, PathBuf},
};

pub fn fixture_path(relative: impl AsRef<Path>) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

pub fn read_fixture(relative: impl AsRef<Path>) -> String {
    fs::read_to_string(fixture_path(relative)).expect("fixture file should be readable")
}

/// Client pointed at a local server, with the rate limit out of the way.
#[allow(dead_code)]
pub fn edgar_at(base: &str) -> xbrl_fetch::Edgar {
    let urls = xbrl_fetch::EdgarUrls {
        archives: format!("{base}/Archives/edgar"),
        data: base.to_string(),
        files: format!("{base}/files"),
    };
    let config = xbrl_fetch::EdgarConfig::new(
        "test_agent example@example.com",
        1000,
        std::time::Duration::from_secs(5),
        Some(urls),
    );
    xbrl_fetch::Edgar::with_config(config).unwrap()
}
