//! Build metadata embedded in installed artifacts.
//!
//! The Go toolchain stamps every binary it builds with the main module's
//! path, version and checksum. Decoding is delegated to `go version -m`,
//! whose report looks like:
//! ```text
//! /proj/.gopack/bin/gopls: go1.21.5
//! 	path	golang.org/x/tools/gopls
//! 	mod	golang.org/x/tools/gopls	v0.14.2	h1:sIw6vjZiuQ9S7s0auUUkHlWgsCkKZFWDHmrge8LYsnc=
//! 	dep	github.com/BurntSushi/toml	v1.2.1	h1:9F2/+DoOYIOksmaJFPw1tGFy1eDnIJXg+UHjuD8lTak=
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{GopackError, Result};
use crate::layout::artifact_path;

/// What is actually installed for one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactMetadata {
    pub module_path: String,
    pub version: String,
    pub checksum: String,
}

/// Derive the artifact name from a module reference.
///
/// `example.com/foo/bar@v1.2.0` installs as `bar`.
pub fn binary_name(reference: &str) -> &str {
    let without_version = reference.split('@').next().unwrap_or(reference);
    without_version.rsplit('/').next().unwrap_or(without_version)
}

/// Reads the metadata of the artifact a reference installs to.
pub trait MetadataReader {
    /// Fails with `MetadataNotFound` when nothing is installed and
    /// `MetadataUnreadable` when the artifact cannot be decoded.
    fn read(&self, install_root: &Path, reference: &str) -> Result<ArtifactMetadata>;
}

/// Reads metadata by running `<go> version -m <artifact>`.
#[derive(Debug, Clone)]
pub struct GoVersionReader {
    program: PathBuf,
}

impl GoVersionReader {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        GoVersionReader {
            program: program.into(),
        }
    }
}

impl MetadataReader for GoVersionReader {
    fn read(&self, install_root: &Path, reference: &str) -> Result<ArtifactMetadata> {
        let path = artifact_path(install_root, binary_name(reference));
        if !path.exists() {
            return Err(GopackError::MetadataNotFound { path });
        }

        debug!(artifact = %path.display(), "reading build info");
        let output = Command::new(&self.program)
            .arg("version")
            .arg("-m")
            .arg(&path)
            .output()
            .map_err(|source| GopackError::ToolSpawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GopackError::MetadataUnreadable {
                path,
                detail: stderr.trim().to_string(),
            });
        }

        let report = String::from_utf8_lossy(&output.stdout);
        parse_build_info(&report).map_err(|detail| GopackError::MetadataUnreadable { path, detail })
    }
}

/// Extract the main module's metadata from a `go version -m` report.
pub fn parse_build_info(report: &str) -> std::result::Result<ArtifactMetadata, String> {
    let mut module_path = None;
    let mut main_module = None;

    for line in report.lines() {
        let mut fields = line.trim_start().split('\t');
        match fields.next() {
            Some("path") => module_path = fields.next().map(str::to_string),
            Some("mod") => {
                let _path = fields.next();
                let version = fields.next().unwrap_or_default().to_string();
                let checksum = fields.next().unwrap_or_default().to_string();
                main_module = Some((version, checksum));
            }
            _ => {}
        }
    }

    let module_path = module_path.ok_or("no main package path in build info")?;
    let (version, checksum) = main_module.ok_or("no main module in build info")?;
    if checksum.is_empty() {
        return Err(format!(
            "main module {module_path} {version} has no recorded checksum"
        ));
    }

    Ok(ArtifactMetadata {
        module_path,
        version,
        checksum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOPLS_REPORT: &str = "/p/.gopack/bin/gopls: go1.21.5\n\
        \tpath\tgolang.org/x/tools/gopls\n\
        \tmod\tgolang.org/x/tools/gopls\tv0.14.2\th1:sIw6=\n\
        \tdep\tgithub.com/BurntSushi/toml\tv1.2.1\th1:9F2=\n\
        \tbuild\t-buildmode=exe\n";

    #[test]
    fn binary_name_strips_path_and_version() {
        assert_eq!(binary_name("example.com/foo/bar"), "bar");
        assert_eq!(binary_name("example.com/foo/bar@v1.2.0"), "bar");
        assert_eq!(binary_name("example.com/foo/bar@latest"), "bar");
        assert_eq!(binary_name("tool"), "tool");
    }

    #[test]
    fn parses_main_module() {
        let meta = parse_build_info(GOPLS_REPORT).unwrap();
        assert_eq!(
            meta,
            ArtifactMetadata {
                module_path: "golang.org/x/tools/gopls".into(),
                version: "v0.14.2".into(),
                checksum: "h1:sIw6=".into(),
            }
        );
    }

    #[test]
    fn package_path_may_differ_from_module() {
        let report = "x: go1.22.0\n\
            \tpath\thonnef.co/go/tools/cmd/staticcheck\n\
            \tmod\thonnef.co/go/tools\tv0.4.6\th1:oFEH=\n";
        let meta = parse_build_info(report).unwrap();
        assert_eq!(meta.module_path, "honnef.co/go/tools/cmd/staticcheck");
        assert_eq!(meta.version, "v0.4.6");
    }

    #[test]
    fn devel_build_has_no_checksum() {
        let report = "x: go1.22.0\n\tpath\texample.com/cmd/x\n\tmod\texample.com/cmd/x\t(devel)\t\n";
        let err = parse_build_info(report).unwrap_err();
        assert!(err.contains("no recorded checksum"), "{err}");
    }

    #[test]
    fn missing_sections_are_unreadable() {
        assert!(parse_build_info("").is_err());
        assert!(parse_build_info("x: go1.22.0\n\tpath\texample.com/x\n").is_err());
    }

    #[test]
    fn reader_reports_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let reader = GoVersionReader::new("go");
        match reader.read(dir.path(), "example.com/foo/bar@v1.0.0") {
            Err(GopackError::MetadataNotFound { path }) => {
                assert_eq!(path, dir.path().join("bin").join("bar"));
            }
            other => panic!("expected MetadataNotFound, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn reader_parses_tool_output() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        std::fs::create_dir(&bin).unwrap();
        std::fs::write(bin.join("bar"), b"not really a binary").unwrap();

        let fake_go = dir.path().join("fake-go");
        std::fs::write(
            &fake_go,
            "#!/bin/sh\nprintf '%s: go1.22.0\\n\\tpath\\texample.com/foo/bar\\n\\tmod\\texample.com/foo/bar\\tv1.0.0\\th1:abc=\\n' \"$3\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&fake_go, std::fs::Permissions::from_mode(0o755)).unwrap();

        let meta = GoVersionReader::new(&fake_go)
            .read(dir.path(), "example.com/foo/bar")
            .unwrap();
        assert_eq!(meta.version, "v1.0.0");
        assert_eq!(meta.checksum, "h1:abc=");
    }

    #[cfg(unix)]
    #[test]
    fn reader_maps_tool_failure_to_unreadable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("bin").join("bar"), b"garbage").unwrap();

        let fake_go = dir.path().join("fake-go");
        std::fs::write(
            &fake_go,
            "#!/bin/sh\necho \"$3: could not read Go build info\" >&2\nexit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&fake_go, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = GoVersionReader::new(&fake_go)
            .read(dir.path(), "example.com/foo/bar")
            .unwrap_err();
        match err {
            GopackError::MetadataUnreadable { detail, .. } => {
                assert!(detail.contains("could not read Go build info"), "{detail}");
            }
            other => panic!("expected MetadataUnreadable, got {other:?}"),
        }
    }
}
