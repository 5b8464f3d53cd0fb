use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Env var holding a substring; only fixtures whose file name contains it run.
pub const FIXTURE_FILTER_ENV: &str = "MASK_FIXTURE";

/// A fixture file decoded into `T`.
pub struct Fixture<T> {
    pub name: String,
    pub path: PathBuf,
    pub data: T,
}

/// Every `*.toml` file directly under `dir`, sorted by name and narrowed by
/// [`FIXTURE_FILTER_ENV`] when set.
pub fn fixture_paths(dir: &Path) -> Vec<PathBuf> {
    let filter = std::env::var(FIXTURE_FILTER_ENV)
        .ok()
        .filter(|value| !value.is_empty());
    let entries = fs::read_dir(dir)
        .unwrap_or_else(|err| panic!("failed to read fixture dir {dir:?}: {err}"));
    let mut paths: Vec<PathBuf> = entries
        .map(|entry| {
            entry
                .unwrap_or_else(|err| panic!("failed to read entry in {dir:?}: {err}"))
                .path()
        })
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .filter(|path| match &filter {
            Some(filter) => fixture_name(path).contains(filter.as_str()),
            None => true,
        })
        .collect();
    paths.sort();
    paths
}

/// Read and decode one fixture. Panics with the file path on any error.
pub fn load_fixture<T: DeserializeOwned>(path: &Path) -> Fixture<T> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture {path:?}: {err}"));
    let data = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse fixture {path:?}: {err}"));
    Fixture {
        name: fixture_name(path),
        path: path.to_path_buf(),
        data,
    }
}

/// Load every fixture under `dir`, panicking if there are none.
pub fn load_fixtures<T: DeserializeOwned>(dir: &Path) -> Vec<Fixture<T>> {
    let paths = fixture_paths(dir);
    assert!(
        !paths.is_empty() || std::env::var(FIXTURE_FILTER_ENV).is_ok(),
        "no fixtures found in {dir:?}"
    );
    paths.iter().map(|path| load_fixture(path)).collect()
}

fn fixture_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
