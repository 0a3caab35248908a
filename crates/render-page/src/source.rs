use std::path::{Path, PathBuf};

use crate::config::{News, Profile, Publications, SiteData};

/// Where the content documents live, relative to the site root.
pub const PROFILE_PATH: &str = "config/profile.json";
pub const PUBLICATIONS_PATH: &str = "config/publications.json";
pub const NEWS_PATH: &str = "config/news.json";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("resource not found: {}", .0)]
    NotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fetches a resource by path.
pub trait ResourceSource {
    fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

/// Resources read from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSource { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceSource for DirSource {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let full = self.root.join(path);
        match fs_err::read_to_string(&full) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(full.display().to_string()))
            },
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to load {} config", .which)]
    Fetch {
        which: &'static str,
        #[source]
        source: FetchError,
    },
    #[error("Failed to parse {} config", .which)]
    Parse {
        which: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn load_one<T, S>(source: &S, which: &'static str, path: &str) -> Result<T, LoadError>
    where T: serde::de::DeserializeOwned,
        S: ResourceSource + ?Sized,
{
    let text = source.fetch(path)
        .map_err(|source| LoadError::Fetch { which, source })?;
    let value = serde_json::from_str(&text)
        .map_err(|source| LoadError::Parse { which, source })?;
    debug!("loaded {} config from {}", which, path);
    Ok(value)
}

/// Loads all three content documents. Any missing or malformed document
/// fails the whole load.
#[tracing::instrument(skip_all)]
pub fn load_site<S: ResourceSource + ?Sized>(source: &S) -> Result<SiteData, LoadError> {
    let profile: Profile = load_one(source, "profile", PROFILE_PATH)?;
    let publications: Publications = load_one(source, "publications", PUBLICATIONS_PATH)?;
    let news: News = load_one(source, "news", NEWS_PATH)?;
    Ok(SiteData {
        profile,
        publications,
        news,
    })
}
