//! Pulse sources
//!
//! A live deployment replays the timestamps a market-data collector wrote
//! to disk: one entry per captured step, named by its epoch-millisecond
//! timestamp (`1700000000000.json`, `1700000060000/`, ...).

use helios_core::Pulse;
use helios_ports::{PulseSource, PulseSourceError};
use std::path::{Path, PathBuf};

/// Reads pulses from the entry names of a directory
///
/// Each entry's stem must parse as an integer; dot-files are ignored.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn io_error(&self, error: std::io::Error) -> PulseSourceError {
        PulseSourceError::Io {
            path: self.dir.display().to_string(),
            error: error.to_string(),
        }
    }
}

impl PulseSource for DirectorySource {
    fn load(&self, start: i64, stop: i64) -> Result<Vec<Pulse>, PulseSourceError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| self.io_error(e))?;

        let mut pulses = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| self.io_error(e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let stem = name.split('.').next().unwrap_or_default();
            let millis: i64 = stem
                .parse()
                .map_err(|_| PulseSourceError::Malformed(name.clone()))?;

            if (start..=stop).contains(&millis) {
                pulses.push(Pulse(millis));
            }
        }
        Ok(pulses)
    }

    fn describe(&self) -> String {
        format!("directory {}", self.dir.display())
    }
}

/// In-memory pulse list, for tests and generated schedules
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pulses: Vec<i64>,
}

impl StaticSource {
    pub fn new(pulses: impl IntoIterator<Item = i64>) -> Self {
        Self {
            pulses: pulses.into_iter().collect(),
        }
    }

    /// Evenly spaced pulses: `start, start + step, ...` up to and including `stop`
    ///
    /// A non-positive step yields no pulses.
    pub fn every(start: i64, stop: i64, step: i64) -> Self {
        if step <= 0 {
            return Self::default();
        }
        Self::new((start..=stop).step_by(step as usize))
    }
}

impl PulseSource for StaticSource {
    fn load(&self, start: i64, stop: i64) -> Result<Vec<Pulse>, PulseSourceError> {
        Ok(self
            .pulses
            .iter()
            .copied()
            .filter(|p| (start..=stop).contains(p))
            .map(Pulse)
            .collect())
    }

    fn describe(&self) -> String {
        format!("{} static pulses", self.pulses.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_directory_source_filters_range() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["300.json", "100.json", "200", "400.json", ".hidden"] {
            fs::write(dir.path().join(name), b"{}").unwrap();
        }

        let source = DirectorySource::new(dir.path());
        let mut pulses = source.load(100, 300).unwrap();
        pulses.sort();
        assert_eq!(pulses, vec![Pulse(100), Pulse(200), Pulse(300)]);
    }

    #[test]
    fn test_directory_source_missing_dir() {
        let source = DirectorySource::new("/definitely/not/a/pulse/dir");
        assert!(matches!(
            source.load(0, 10),
            Err(PulseSourceError::Io { .. })
        ));
    }

    #[test]
    fn test_directory_source_malformed_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notapulse.json"), b"{}").unwrap();

        let source = DirectorySource::new(dir.path());
        assert_eq!(
            source.load(0, 10),
            Err(PulseSourceError::Malformed("notapulse.json".to_string()))
        );
    }

    #[test]
    fn test_static_source_every() {
        let source = StaticSource::every(0, 30, 10);
        assert_eq!(
            source.load(10, 30).unwrap(),
            vec![Pulse(10), Pulse(20), Pulse(30)]
        );
    }

    #[test]
    fn test_static_source_every_rejects_non_positive_step() {
        for step in [0, -10] {
            let source = StaticSource::every(0, 30, step);
            assert!(source.load(0, 30).unwrap().is_empty());
        }
    }
}
