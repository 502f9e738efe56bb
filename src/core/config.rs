//! Run configuration and the extension filter

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::digest::HashAlgorithm;
use super::error::{DedupError, DedupResult};

pub const DEFAULT_REPORT_FILE: &str = "duplicate_report.txt";

/// Which file names qualify for scanning
///
/// Suffixes are matched against the whole lowercased file name, not the
/// dotted extension: `png` admits `picture.apng` too.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum ExtensionFilter {
    #[default]
    All,
    Suffixes(Vec<String>),
}

impl ExtensionFilter {
    pub fn suffixes<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ExtensionFilter::Suffixes(
            items
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            ExtensionFilter::All => true,
            ExtensionFilter::Suffixes(suffixes) => {
                let name = file_name.to_lowercase();
                suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
            }
        }
    }
}

impl FromStr for ExtensionFilter {
    type Err = DedupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(ExtensionFilter::All);
        }

        let filter = ExtensionFilter::suffixes(s.split(','));
        match &filter {
            ExtensionFilter::Suffixes(list) if list.is_empty() => Err(
                DedupError::InvalidConfiguration(format!("empty extension list: {:?}", s)),
            ),
            _ => Ok(filter),
        }
    }
}

impl fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionFilter::All => f.write_str("all"),
            ExtensionFilter::Suffixes(list) => f.write_str(&list.join(",")),
        }
    }
}

/// Validated inputs for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: PathBuf,
    pub quarantine_dir: PathBuf,
    pub algorithm: HashAlgorithm,
    pub filter: ExtensionFilter,
    pub report_path: PathBuf,
    /// Skip the quarantine directory when it lives under `root`
    pub exclude_quarantine: bool,
}

impl RunConfig {
    pub fn new(root: impl Into<PathBuf>, quarantine_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            quarantine_dir: quarantine_dir.into(),
            algorithm: HashAlgorithm::default(),
            filter: ExtensionFilter::default(),
            report_path: PathBuf::from(DEFAULT_REPORT_FILE),
            exclude_quarantine: true,
        }
    }

    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_filter(mut self, filter: ExtensionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_report_path(mut self, report_path: impl Into<PathBuf>) -> Self {
        self.report_path = report_path.into();
        self
    }

    pub fn with_exclude_quarantine(mut self, exclude: bool) -> Self {
        self.exclude_quarantine = exclude;
        self
    }

    /// Check the inputs before any file is touched
    pub fn validate(&self) -> DedupResult<()> {
        if !self.root.exists() {
            return Err(DedupError::InvalidConfiguration(format!(
                "root directory does not exist: {}",
                self.root.display()
            )));
        }
        if !self.root.is_dir() {
            return Err(DedupError::InvalidConfiguration(format!(
                "root is not a directory: {}",
                self.root.display()
            )));
        }
        if self.quarantine_dir.exists() && !self.quarantine_dir.is_dir() {
            return Err(DedupError::InvalidConfiguration(format!(
                "quarantine path is not a directory: {}",
                self.quarantine_dir.display()
            )));
        }
        if let ExtensionFilter::Suffixes(list) = &self.filter {
            if list.is_empty() {
                return Err(DedupError::InvalidConfiguration(
                    "extension filter has no suffixes".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Directory to leave out of traversal, if any
    pub fn excluded_dir(&self) -> Option<&Path> {
        if self.exclude_quarantine {
            Some(&self.quarantine_dir)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_all_filter_admits_everything() {
        let filter: ExtensionFilter = "all".parse().unwrap();
        assert_eq!(filter, ExtensionFilter::All);
        assert!(filter.matches("photo.png"));
        assert!(filter.matches("Makefile"));
        assert!(filter.matches(".hidden"));
    }

    #[test]
    fn test_all_filter_is_case_insensitive() {
        assert_eq!("ALL".parse::<ExtensionFilter>().unwrap(), ExtensionFilter::All);
        assert_eq!(" All ".parse::<ExtensionFilter>().unwrap(), ExtensionFilter::All);
    }

    #[test]
    fn test_suffix_match_ignores_case() {
        let filter: ExtensionFilter = "png".parse().unwrap();
        assert!(filter.matches("photo.PNG"));
        assert!(filter.matches("photo.png"));
        assert!(!filter.matches("photo.jpg"));
    }

    #[test]
    fn test_suffix_match_is_raw_ends_with() {
        let filter: ExtensionFilter = "png".parse().unwrap();
        assert!(filter.matches("picture.apng"));

        let filter: ExtensionFilter = "g".parse().unwrap();
        assert!(filter.matches("x.png"));
        assert!(filter.matches("y.jpg"));
        assert!(!filter.matches("z.gif"));
    }

    #[test]
    fn test_parse_comma_separated_list() {
        let filter: ExtensionFilter = " JPG, jpeg ,png,".parse().unwrap();
        assert_eq!(
            filter,
            ExtensionFilter::Suffixes(vec!["jpg".into(), "jpeg".into(), "png".into()])
        );
        assert_eq!(filter.to_string(), "jpg,jpeg,png");
    }

    #[test]
    fn test_parse_empty_list_is_invalid() {
        let err = " , ,".parse::<ExtensionFilter>().unwrap_err();
        assert!(matches!(err, DedupError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_validate_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let config = RunConfig::new(temp_dir.path().join("missing"), temp_dir.path().join("q"));
        assert!(matches!(
            config.validate(),
            Err(DedupError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_root_is_file() {
        let file = NamedTempFile::new().unwrap();
        let config = RunConfig::new(file.path(), "quarantine");
        assert!(matches!(
            config.validate(),
            Err(DedupError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_quarantine_is_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = NamedTempFile::new().unwrap();
        let config = RunConfig::new(temp_dir.path(), file.path());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = RunConfig::new(temp_dir.path(), temp_dir.path().join("CHECK"));
        assert!(config.validate().is_ok());
        assert_eq!(config.algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.filter, ExtensionFilter::All);
        assert_eq!(config.report_path, PathBuf::from(DEFAULT_REPORT_FILE));
        assert_eq!(config.excluded_dir(), Some(temp_dir.path().join("CHECK").as_path()));
        assert!(config.with_exclude_quarantine(false).excluded_dir().is_none());
    }
}
