use std::collections::BTreeSet;
use std::path::Path;

use url::Url;

use crate::error::TargetError;

use super::loader::read_target_file;

/// Ordered, de-duplicated, non-empty list of absolute http(s) URLs.
///
/// The list is fixed once built; virtual users share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetList {
    urls: Vec<String>,
}

impl TargetList {
    /// Builds a target list, trimming entries, dropping blanks and keeping the
    /// first occurrence of duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error when no URL remains or an entry is not an http(s) URL.
    pub fn new<I, S>(urls: I) -> Result<Self, TargetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut kept = Vec::new();
        for raw in urls {
            let url = raw.as_ref().trim();
            if url.is_empty() {
                continue;
            }
            validate_url(url)?;
            if seen.insert(url.to_owned()) {
                kept.push(url.to_owned());
            }
        }

        let list = Self { urls: kept };
        if list.is_empty() {
            return Err(TargetError::Empty);
        }
        Ok(list)
    }

    /// Reads a newline-delimited URL list or a CSV file with a `url` column.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, has a header without a
    /// `url` column, contains no URLs, or contains an invalid URL.
    pub fn from_file(path: &Path) -> Result<Self, TargetError> {
        let urls = read_target_file(path)?;
        Self::new(urls).map_err(|err| match err {
            TargetError::Empty => TargetError::FileEmpty {
                path: path.to_path_buf(),
            },
            other => other,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.urls.get(index).map(String::as_str)
    }

    /// URL at `index`, or an empty string when out of range.
    #[must_use]
    pub fn url(&self, index: usize) -> &str {
        self.get(index).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.urls
    }
}

fn validate_url(url: &str) -> Result<(), TargetError> {
    let parsed = Url::parse(url).map_err(|err| TargetError::InvalidUrl {
        url: url.to_owned(),
        source: err,
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(TargetError::UnsupportedScheme {
            url: url.to_owned(),
            scheme: scheme.to_owned(),
        }),
    }
}
