//! In-memory stand-ins for the toolchain, shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::process::ExitStatus;
use std::rc::Rc;

use gopack_core::{
    artifact_path, binary_name, ArtifactMetadata, GopackError, MetadataReader, Result,
};

use crate::cancel::CancelToken;
use crate::toolchain::BuildTool;

pub(crate) fn failed_status() -> ExitStatus {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(1 << 8)
    }
    #[cfg(windows)]
    {
        use std::os::windows::process::ExitStatusExt;
        ExitStatus::from_raw(1)
    }
}

/// Installed artifacts keyed by binary name. `None` marks an artifact whose
/// build info cannot be decoded. Clones share state.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeReader {
    artifacts: Rc<RefCell<HashMap<String, Option<ArtifactMetadata>>>>,
    reads: Rc<Cell<usize>>,
}

impl FakeReader {
    pub(crate) fn with(self, binary: &str, module: &str, version: &str, sum: &str) -> Self {
        self.set(
            binary,
            ArtifactMetadata {
                module_path: module.into(),
                version: version.into(),
                checksum: sum.into(),
            },
        );
        self
    }

    pub(crate) fn unreadable(self, binary: &str) -> Self {
        self.artifacts.borrow_mut().insert(binary.into(), None);
        self
    }

    pub(crate) fn set(&self, binary: &str, meta: ArtifactMetadata) {
        self.artifacts.borrow_mut().insert(binary.into(), Some(meta));
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl MetadataReader for FakeReader {
    fn read(&self, install_root: &Path, reference: &str) -> Result<ArtifactMetadata> {
        self.reads.set(self.reads.get() + 1);
        let binary = binary_name(reference);
        let path = artifact_path(install_root, binary);
        match self.artifacts.borrow().get(binary) {
            Some(Some(meta)) => Ok(meta.clone()),
            Some(None) => Err(GopackError::MetadataUnreadable {
                path,
                detail: "corrupt".into(),
            }),
            None => Err(GopackError::MetadataNotFound { path }),
        }
    }
}

/// Records every install and publishes the configured build into a
/// [`FakeReader`].
#[derive(Debug, Default)]
pub(crate) struct FakeTool {
    artifacts: FakeReader,
    builds: HashMap<String, ArtifactMetadata>,
    failing: HashSet<String>,
    calls: RefCell<Vec<String>>,
}

impl FakeTool {
    pub(crate) fn new(artifacts: &FakeReader) -> Self {
        FakeTool {
            artifacts: artifacts.clone(),
            ..Default::default()
        }
    }

    /// What installing `reference` produces.
    pub(crate) fn builds(mut self, reference: &str, module: &str, version: &str, sum: &str) -> Self {
        self.builds.insert(
            reference.into(),
            ArtifactMetadata {
                module_path: module.into(),
                version: version.into(),
                checksum: sum.into(),
            },
        );
        self
    }

    pub(crate) fn fails_on(mut self, reference: &str) -> Self {
        self.failing.insert(reference.into());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl BuildTool for FakeTool {
    fn install(&self, reference: &str, cancel: &CancelToken) -> Result<()> {
        cancel.check()?;
        self.calls.borrow_mut().push(reference.to_string());
        if self.failing.contains(reference) {
            return Err(GopackError::ExternalToolFailure {
                reference: reference.into(),
                status: failed_status(),
            });
        }
        let binary = binary_name(reference);
        let meta = self.builds.get(reference).cloned().unwrap_or_else(|| {
            let (module, version) = reference.split_once('@').unwrap_or((reference, "v1.0.0"));
            ArtifactMetadata {
                module_path: module.into(),
                version: version.into(),
                checksum: format!("h1:{binary}="),
            }
        });
        self.artifacts.set(binary, meta);
        Ok(())
    }
}
