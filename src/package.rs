//! Write the stamped worker to disk, raw and as a deployable zip.

use crate::{config::PackConfig, error::BuildError};
use std::{
    fs,
    io::{Cursor, Write},
    path::{Path, PathBuf},
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Destinations of both artifacts.
#[derive(Debug, Clone)]
pub struct Packager {
    output: PathBuf,
    raw_path: PathBuf,
    archive_path: PathBuf,
    /// Name of the single archive entry.
    entry_name: String,
}

/// Bytes as written to the two destinations.
#[derive(Debug, Clone)]
pub struct PackagedOutput {
    pub raw_bytes: Vec<u8>,
    pub archive_bytes: Vec<u8>,
}

impl Packager {
    pub fn new(config: &PackConfig) -> Self {
        Self {
            output: config.build.output.clone(),
            raw_path: config.build.raw_path(),
            archive_path: config.build.archive_path(),
            entry_name: config.build.archive_entry.clone(),
        }
    }

    pub fn raw_path(&self) -> &Path {
        &self.raw_path
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Create the output directory; a no-op when it already exists.
    pub fn prepare(&self) -> Result<(), BuildError> {
        fs::create_dir_all(&self.output).map_err(|err| BuildError::packaging(&self.output, err))
    }

    /// Write `source` verbatim to the raw destination.
    pub fn write_raw(&self, source: &str) -> Result<Vec<u8>, BuildError> {
        let bytes = source.as_bytes().to_vec();
        fs::write(&self.raw_path, &bytes).map_err(|err| BuildError::packaging(&self.raw_path, err))?;
        Ok(bytes)
    }

    /// Deflate `source` into a one-entry archive and write it out.
    pub fn write_archive(&self, source: &str) -> Result<Vec<u8>, BuildError> {
        let bytes = create_archive(&self.entry_name, source.as_bytes())
            .map_err(|err| BuildError::packaging(&self.archive_path, err))?;
        fs::write(&self.archive_path, &bytes)
            .map_err(|err| BuildError::packaging(&self.archive_path, err))?;
        Ok(bytes)
    }
}

/// In-memory zip holding exactly one deflated entry.
pub fn create_archive(entry_name: &str, content: &[u8]) -> zip::result::ZipResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(entry_name, options)?;
    zip.write_all(content)?;

    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    const SOURCE: &str = "// Build: x | Commit: unknown | Version: 1.0.0\n// @ts-nocheck\nexport default {};\n";

    fn packager(dir: &TempDir) -> Packager {
        let mut config = PackConfig::default();
        config.build.output = dir.path().join("dist");
        Packager::new(&config)
    }

    /// Both artifacts, raw first, as the build does it.
    fn package(packager: &Packager, source: &str) -> Result<PackagedOutput, BuildError> {
        packager.prepare()?;
        Ok(PackagedOutput {
            raw_bytes: packager.write_raw(source)?,
            archive_bytes: packager.write_archive(source)?,
        })
    }

    fn entries(archive: &[u8]) -> Vec<(String, String)> {
        let mut archive = ZipArchive::new(Cursor::new(archive)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut content = String::new();
                file.read_to_string(&mut content).unwrap();
                (file.name().to_owned(), content)
            })
            .collect()
    }

    #[test]
    fn test_create_archive_single_deflated_entry() {
        let bytes = create_archive("_worker.js", SOURCE.as_bytes()).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(&bytes)).unwrap();
        assert_eq!(archive.len(), 1);
        let file = archive.by_index(0).unwrap();
        assert_eq!(file.name(), "_worker.js");
        assert_eq!(file.compression(), CompressionMethod::Deflated);
    }

    #[test]
    fn test_package_writes_both_artifacts() {
        let dir = TempDir::new().unwrap();
        let packager = packager(&dir);

        let output = package(&packager, SOURCE).unwrap();

        let raw = fs::read(dir.path().join("dist/worker.js")).unwrap();
        let archive = fs::read(dir.path().join("dist/worker.zip")).unwrap();
        assert_eq!(raw, SOURCE.as_bytes());
        assert_eq!(raw, output.raw_bytes);
        assert_eq!(archive, output.archive_bytes);

        let entries = entries(&archive);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "_worker.js");
        assert_eq!(entries[0].1.as_bytes(), raw.as_slice());
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let packager = packager(&dir);

        packager.prepare().unwrap();
        packager.prepare().unwrap();
        assert!(dir.path().join("dist").is_dir());
    }

    #[test]
    fn test_package_overwrites_previous_build() {
        let dir = TempDir::new().unwrap();
        let packager = packager(&dir);

        package(&packager, "old").unwrap();
        package(&packager, SOURCE).unwrap();

        let raw = fs::read_to_string(packager.raw_path()).unwrap();
        assert_eq!(raw, SOURCE);
        let archive = fs::read(packager.archive_path()).unwrap();
        assert_eq!(entries(&archive)[0].1, SOURCE);
    }

    #[test]
    fn test_output_blocked_by_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("dist"), "not a directory").unwrap();

        let err = package(&packager(&dir), SOURCE).unwrap_err();
        assert!(matches!(err, BuildError::PackagingError { .. }));
    }
}
