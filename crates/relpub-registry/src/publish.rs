//! Build-and-publish workflow.
//!
//! For one target: find the release tagged with the package version, skip
//! if the target's asset is already attached, otherwise compile and
//! (unless suppressed) upload the executable. Each step runs to completion
//! before the next starts and every failure ends the run.

use std::fs;
use std::path::{Path, PathBuf};

use relpub_build::{CompileJob, Compiler, ToolchainEnv};
use relpub_targets::TargetId;

use crate::client::ReleaseHost;
use crate::error::{RegistryError, Result};
use crate::integrity::ContentHash;
use crate::release::Asset;

/// Inputs for one publish run.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Package version; must equal a release tag.
    pub version: String,
    /// Target to build; also the asset name.
    pub target: TargetId,
    /// Script entry point handed to the compiler.
    pub entry_point: PathBuf,
    /// Directory receiving the executable.
    pub output_dir: PathBuf,
    /// Build but do not upload.
    pub skip_upload: bool,
}

/// What a publish run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The asset was already attached; nothing was built.
    AlreadyPublished { asset: Asset },
    /// Built locally; upload suppressed.
    Built { path: PathBuf },
    /// Built and attached to the release.
    Uploaded {
        path: PathBuf,
        asset: Asset,
        hash: ContentHash,
    },
}

/// Create `dir` if needed. An existing directory is fine; anything else
/// that stops creation is an error.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    match fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(source) => Err(RegistryError::OutputDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Run the workflow for `request`.
///
/// The toolchain environment is only assembled once a build is actually
/// needed.
pub fn publish_artifact(
    request: &PublishRequest,
    host: &dyn ReleaseHost,
    compiler: &dyn Compiler,
) -> Result<PublishOutcome> {
    let target = &request.target;
    let asset_name = target.to_string();

    let release = host
        .find_release(&request.version)?
        .ok_or_else(|| RegistryError::ReleaseNotFound {
            version: request.version.clone(),
        })?;
    tracing::info!(
        release_id = release.id,
        tag = %release.tag_name,
        assets = release.assets.len(),
        "found release"
    );

    if let Some(asset) = release.asset(&asset_name) {
        tracing::info!(asset = %asset_name, size = ?asset.size, "asset already exists; skipping");
        return Ok(PublishOutcome::AlreadyPublished {
            asset: asset.clone(),
        });
    }

    ensure_output_dir(&request.output_dir)?;
    let job = CompileJob::new(&request.entry_point, target.clone(), &request.output_dir)
        .with_toolchain(ToolchainEnv::detect(target)?);
    tracing::info!("building {}", job.executable_path().display());
    let path = compiler.compile(&job)?;

    if request.skip_upload {
        tracing::info!(path = %path.display(), "build finished; skipping upload");
        return Ok(PublishOutcome::Built { path });
    }

    tracing::info!("build finished; uploading asset");
    log_output_dir(&request.output_dir);
    let data = fs::read(&path)?;
    let hash = ContentHash::compute(&data);
    tracing::info!(bytes = data.len(), %hash, "read {}", path.display());

    let asset = host.upload_asset(&release, &asset_name, &data)?;
    let expected = data.len() as u64;
    if let Some(actual) = asset.size {
        if actual != expected {
            return Err(RegistryError::UploadSizeMismatch {
                name: asset_name,
                expected,
                actual,
            });
        }
    }
    tracing::info!(asset = %asset.name, release_id = release.id, "uploaded");

    Ok(PublishOutcome::Uploaded { path, asset, hash })
}

fn log_output_dir(dir: &Path) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    match fs::read_dir(dir) {
        Ok(entries) => {
            let names: Vec<String> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            tracing::debug!(dir = %dir.display(), files = ?names, "output directory");
        }
        Err(e) => tracing::debug!(dir = %dir.display(), "cannot list output directory: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::Release;
    use relpub_build::BuildError;
    use std::cell::RefCell;

    /// In-memory host recording every call.
    struct FakeHost {
        releases: Vec<Release>,
        list_calls: RefCell<u32>,
        uploads: RefCell<Vec<(u64, String, usize)>>,
        stored_size: Option<u64>,
    }

    impl FakeHost {
        fn new(releases: Vec<Release>) -> Self {
            FakeHost {
                releases,
                list_calls: RefCell::new(0),
                uploads: RefCell::new(Vec::new()),
                stored_size: None,
            }
        }
    }

    impl ReleaseHost for FakeHost {
        fn list_releases(&self, page: u32) -> Result<Vec<Release>> {
            *self.list_calls.borrow_mut() += 1;
            Ok(if page == 1 {
                self.releases.clone()
            } else {
                Vec::new()
            })
        }

        fn upload_asset(&self, release: &Release, name: &str, data: &[u8]) -> Result<Asset> {
            self.uploads
                .borrow_mut()
                .push((release.id, name.to_string(), data.len()));
            Ok(Asset {
                name: name.to_string(),
                id: Some(99),
                size: Some(self.stored_size.unwrap_or(data.len() as u64)),
                state: Some("uploaded".to_string()),
            })
        }
    }

    /// Writes a fixed payload where the real compiler would.
    struct FakeCompiler {
        payload: &'static [u8],
        fail: bool,
        jobs: RefCell<Vec<CompileJob>>,
    }

    impl FakeCompiler {
        fn new(payload: &'static [u8]) -> Self {
            FakeCompiler {
                payload,
                fail: false,
                jobs: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.jobs.borrow().len()
        }
    }

    impl Compiler for FakeCompiler {
        fn compile(&self, job: &CompileJob) -> relpub_build::Result<PathBuf> {
            self.jobs.borrow_mut().push(job.clone());
            if self.fail {
                return Err(BuildError::MissingOutput {
                    path: job.executable_path(),
                });
            }
            let path = job.executable_path();
            fs::write(&path, self.payload)?;
            Ok(path)
        }
    }

    fn release(id: u64, tag: &str, assets: &[&str]) -> Release {
        Release {
            id,
            tag_name: tag.to_string(),
            assets: assets
                .iter()
                .map(|name| Asset {
                    name: name.to_string(),
                    id: None,
                    size: None,
                    state: None,
                })
                .collect(),
        }
    }

    fn request(dir: &Path, target: &str, skip_upload: bool) -> PublishRequest {
        PublishRequest {
            version: "5.2.0".to_string(),
            target: target.parse().unwrap(),
            entry_point: PathBuf::from("bin/cli.mjs"),
            output_dir: dir.join("dist"),
            skip_upload,
        }
    }

    #[test]
    fn existing_asset_skips_build_and_upload() {
        let dir = tempfile::tempdir().unwrap();
        let host = FakeHost::new(vec![
            release(2, "5.2.0", &["mac-x64-20.11.0", "linux-x64-20.11.0"]),
            release(1, "5.1.0", &[]),
        ]);
        let compiler = FakeCompiler::new(b"unused");
        let target = TargetId::new("darwin", "x64", "v20.11.0").unwrap();
        let req = PublishRequest {
            target,
            ..request(dir.path(), "linux-x64-1.0.0", false)
        };

        let outcome = publish_artifact(&req, &host, &compiler).unwrap();
        assert!(matches!(
            outcome,
            PublishOutcome::AlreadyPublished { ref asset } if asset.name == "mac-x64-20.11.0"
        ));
        assert_eq!(compiler.calls(), 0);
        assert!(host.uploads.borrow().is_empty());
        assert!(!dir.path().join("dist").exists());
    }

    #[test]
    fn skip_upload_builds_once_without_uploading() {
        let dir = tempfile::tempdir().unwrap();
        let host = FakeHost::new(vec![release(2, "5.2.0", &["mac-x64-20.11.0"])]);
        let compiler = FakeCompiler::new(b"\x7fELF binary");
        let req = request(dir.path(), "linux-x64-20.11.0", true);

        let outcome = publish_artifact(&req, &host, &compiler).unwrap();
        let expected = dir.path().join("dist").join("linux-x64-20.11.0");
        assert_eq!(outcome, PublishOutcome::Built { path: expected.clone() });
        assert!(expected.is_file());
        assert_eq!(compiler.calls(), 1);
        assert!(host.uploads.borrow().is_empty());
    }

    #[test]
    fn missing_asset_builds_and_uploads_once() {
        let dir = tempfile::tempdir().unwrap();
        let host = FakeHost::new(vec![release(7, "5.2.0", &[])]);
        let compiler = FakeCompiler::new(b"0123456789abcdef");
        let req = request(dir.path(), "linux-arm64-20.11.0", false);

        let outcome = publish_artifact(&req, &host, &compiler).unwrap();
        assert_eq!(compiler.calls(), 1);
        let uploads = host.uploads.borrow();
        assert_eq!(uploads.len(), 1);
        let (release_id, name, len) = &uploads[0];
        assert_eq!(*release_id, 7);
        assert_eq!(name, "linux-arm64-20.11.0");
        let on_disk = fs::metadata(dir.path().join("dist/linux-arm64-20.11.0"))
            .unwrap()
            .len();
        assert_eq!(*len as u64, on_disk);

        match outcome {
            PublishOutcome::Uploaded { asset, hash, .. } => {
                assert_eq!(asset.name, "linux-arm64-20.11.0");
                assert_eq!(hash, ContentHash::compute(b"0123456789abcdef"));
            }
            other => panic!("expected upload, got {other:?}"),
        }
    }

    #[test]
    fn windows_upload_reads_exe_but_names_asset_by_target() {
        let dir = tempfile::tempdir().unwrap();
        let host = FakeHost::new(vec![release(3, "5.2.0", &[])]);
        let compiler = FakeCompiler::new(b"MZ");
        let req = request(dir.path(), "windows-x64-20.11.0", false);

        let outcome = publish_artifact(&req, &host, &compiler).unwrap();
        match outcome {
            PublishOutcome::Uploaded { path, .. } => {
                assert_eq!(path, dir.path().join("dist/windows-x64-20.11.0.exe"));
            }
            other => panic!("expected upload, got {other:?}"),
        }
        assert_eq!(host.uploads.borrow()[0].1, "windows-x64-20.11.0");
    }

    #[test]
    fn missing_release_is_fatal_before_building() {
        let dir = tempfile::tempdir().unwrap();
        let host = FakeHost::new(vec![release(1, "5.1.0", &[])]);
        let compiler = FakeCompiler::new(b"unused");
        let req = request(dir.path(), "linux-x64-20.11.0", false);

        let err = publish_artifact(&req, &host, &compiler).unwrap_err();
        assert!(matches!(err, RegistryError::ReleaseNotFound { ref version } if version == "5.2.0"));
        assert!(err.to_string().contains("release not found for version 5.2.0"));
        assert_eq!(compiler.calls(), 0);
        assert!(host.uploads.borrow().is_empty());
    }

    #[test]
    fn compiler_failure_prevents_upload() {
        let dir = tempfile::tempdir().unwrap();
        let host = FakeHost::new(vec![release(1, "5.2.0", &[])]);
        let compiler = FakeCompiler {
            fail: true,
            ..FakeCompiler::new(b"")
        };
        let req = request(dir.path(), "linux-x64-20.11.0", false);

        let err = publish_artifact(&req, &host, &compiler).unwrap_err();
        assert!(matches!(err, RegistryError::Build(_)));
        assert_eq!(compiler.calls(), 1);
        assert!(host.uploads.borrow().is_empty());
    }

    #[test]
    fn stored_size_mismatch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = FakeHost::new(vec![release(1, "5.2.0", &[])]);
        host.stored_size = Some(3);
        let compiler = FakeCompiler::new(b"four");
        let req = request(dir.path(), "linux-x64-20.11.0", false);

        let err = publish_artifact(&req, &host, &compiler).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::UploadSizeMismatch {
                expected: 4,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn release_lookup_happens_once_per_run() {
        let dir = tempfile::tempdir().unwrap();
        let host = FakeHost::new(vec![release(1, "5.2.0", &[])]);
        let compiler = FakeCompiler::new(b"bin");
        publish_artifact(&request(dir.path(), "linux-x64-20.11.0", false), &host, &compiler).unwrap();
        assert_eq!(*host.list_calls.borrow(), 1);
    }

    #[test]
    fn output_dir_tolerates_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dist");
        ensure_output_dir(&out).unwrap();
        ensure_output_dir(&out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn output_dir_rejects_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dist");
        fs::write(&out, b"not a directory").unwrap();
        assert!(matches!(
            ensure_output_dir(&out),
            Err(RegistryError::OutputDir { .. })
        ));
    }

    #[test]
    fn output_dir_propagates_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("no").join("such").join("dist");
        assert!(ensure_output_dir(&out).is_err());
    }
}
