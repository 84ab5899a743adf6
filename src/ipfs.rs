use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::str::FromStr;

use cid::Cid;
use tokio::process::Command;

// ipfs add flags
// -r: Recursive, required for folders
// -w: Wrap, wraps the file in a folder so the filename is kept in the path
// -q: Quiet, only prints hashes
const ADD_DIR_FLAGS: &str = "-rq";
const ADD_FILE_FLAGS: &str = "-wq";
const NO_COPY_FLAG: &str = "--nocopy";

/// Result of adding a target to the local node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploaded {
    /// Cid of the root directory. This is what gets pinned
    pub folder_cid: Cid,
    /// Path used for links: `<folder_cid>/<filename>` for files,
    /// just the folder cid for directories
    pub file_cid: String,
}

/// Handle on a local ipfs executable
#[derive(Debug, Clone)]
pub struct IpfsBin {
    binary: PathBuf,
}

impl IpfsBin {
    /// Resolve `program` to an executable. Bare names are looked up on `PATH`,
    /// anything with a directory component is used as is.
    pub fn locate(program: &Path) -> Result<Self, IpfsError> {
        let binary = if program.components().count() > 1 {
            is_executable(program).then(|| program.to_path_buf())
        } else {
            search_path(program.as_os_str(), env::var_os("PATH"))
        };
        match binary {
            Some(binary) => {
                tracing::debug!(binary = %binary.display(), "found ipfs binary");
                Ok(Self { binary })
            }
            None => Err(IpfsError::NodeUnavailable(program.display().to_string())),
        }
    }

    /// Add a file or directory to the node
    pub async fn add(&self, path: &Path, no_copy: bool) -> Result<Uploaded, IpfsError> {
        if path.is_dir() {
            let cid = self.run_add(ADD_DIR_FLAGS, path, no_copy).await?;
            Ok(Uploaded {
                folder_cid: cid,
                file_cid: cid.to_string(),
            })
        } else if path.is_file() {
            let folder_cid = self.run_add(ADD_FILE_FLAGS, path, no_copy).await?;
            // Gateways can only serve names that survive as utf-8 path segments
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| IpfsError::InvalidTarget(path.display().to_string()))?;
            Ok(Uploaded {
                folder_cid,
                file_cid: format!("{}/{}", folder_cid, file_name),
            })
        } else {
            Err(IpfsError::InvalidTarget(path.display().to_string()))
        }
    }

    async fn run_add(&self, flags: &str, path: &Path, no_copy: bool) -> Result<Cid, IpfsError> {
        let mut command = Command::new(&self.binary);
        command.arg("add").arg(flags);
        if no_copy {
            command.arg(NO_COPY_FLAG);
        }
        command.arg(path).stdin(Stdio::null());

        tracing::debug!(?command, "running ipfs add");
        let output = command.output().await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                IpfsError::NodeUnavailable(format!("{}: {}", self.binary.display(), e))
            }
            _ => IpfsError::Io(e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IpfsError::UploadFailed(stderr.trim().to_string()));
        }

        // The root of whatever was added is always the last line
        let stdout = String::from_utf8_lossy(&output.stdout);
        let last = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .ok_or_else(|| IpfsError::UploadFailed("ipfs add printed no cid".to_string()))?;
        Cid::from_str(last)
            .map_err(|e| IpfsError::UploadFailed(format!("unexpected ipfs add output {last:?}: {e}")))
    }
}

fn search_path(program: &std::ffi::OsStr, path_var: Option<OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    env::split_paths(&path_var)
        .flat_map(|dir| {
            let plain = dir.join(program);
            let mut with_suffix = plain.clone().into_os_string();
            with_suffix.push(env::consts::EXE_SUFFIX);
            [plain, PathBuf::from(with_suffix)]
        })
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[derive(Debug, thiserror::Error)]
pub enum IpfsError {
    #[error("ipfs binary could not be found: {0}")]
    NodeUnavailable(String),
    #[error("ipfs command failed:\n\n{0}")]
    UploadFailed(String),
    #[error("{0} is an invalid path to file or dir")]
    InvalidTarget(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(all(test, unix))]
pub(crate) mod tests {
    use super::*;

    use std::os::unix::fs::PermissionsExt;

    pub const FILE_CID: &str = "QmT78zSuBmuS4z925WZfrqQ1qHaJ56DQaTfyMUF7F8ff5o";
    pub const ROOT_CID: &str = "QmUNLLsPACCz1vLxQVkXqqLX5R1X345qqfHbsf67hvA3Nn";

    /// Write an executable shell script standing in for `ipfs`. It records its
    /// arguments next to itself and prints `stdout`, exiting with `code`.
    pub fn stub_ipfs(dir: &Path, stdout: &str, stderr: &str, code: i32) -> PathBuf {
        let script = dir.join("ipfs");
        let args_file = dir.join("ipfs.args");
        let body = format!(
            "#!/bin/sh\necho \"$@\" > '{}'\nprintf '%s' '{}'\nprintf '%s' '{}' >&2\nexit {}\n",
            args_file.display(),
            stdout,
            stderr,
            code
        );
        std::fs::write(&script, body).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    pub fn recorded_args(dir: &Path) -> Option<String> {
        std::fs::read_to_string(dir.join("ipfs.args"))
            .ok()
            .map(|s| s.trim().to_string())
    }

    fn two_line_output() -> String {
        format!("{FILE_CID}\n{ROOT_CID}\n")
    }

    #[tokio::test]
    async fn add_file_wraps_and_appends_name() {
        let bin_dir = tempfile::tempdir().unwrap();
        let data_dir = tempfile::tempdir().unwrap();
        let target = data_dir.path().join("report.pdf");
        std::fs::write(&target, b"%PDF").unwrap();

        let ipfs = IpfsBin::locate(&stub_ipfs(bin_dir.path(), &two_line_output(), "", 0)).unwrap();
        let uploaded = ipfs.add(&target, false).await.unwrap();

        assert_eq!(uploaded.folder_cid.to_string(), ROOT_CID);
        assert_eq!(uploaded.file_cid, format!("{}/report.pdf", uploaded.folder_cid));
        assert_eq!(
            recorded_args(bin_dir.path()).unwrap(),
            format!("add -wq {}", target.display())
        );
    }

    #[tokio::test]
    async fn add_dir_is_recursive_and_cids_match() {
        let bin_dir = tempfile::tempdir().unwrap();
        let data_dir = tempfile::tempdir().unwrap();

        let ipfs = IpfsBin::locate(&stub_ipfs(bin_dir.path(), &two_line_output(), "", 0)).unwrap();
        let uploaded = ipfs.add(data_dir.path(), true).await.unwrap();

        assert_eq!(uploaded.folder_cid.to_string(), uploaded.file_cid);
        assert_eq!(uploaded.file_cid, ROOT_CID);
        assert_eq!(
            recorded_args(bin_dir.path()).unwrap(),
            format!("add -rq --nocopy {}", data_dir.path().display())
        );
    }

    #[tokio::test]
    async fn failed_add_carries_stderr() {
        let bin_dir = tempfile::tempdir().unwrap();
        let data_dir = tempfile::tempdir().unwrap();

        let stub = stub_ipfs(bin_dir.path(), "", "Error: no IPFS repo found", 1);
        let ipfs = IpfsBin::locate(&stub).unwrap();
        match ipfs.add(data_dir.path(), false).await {
            Err(IpfsError::UploadFailed(msg)) => assert_eq!(msg, "Error: no IPFS repo found"),
            other => panic!("expected UploadFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn garbage_output_is_an_upload_failure() {
        let bin_dir = tempfile::tempdir().unwrap();
        let data_dir = tempfile::tempdir().unwrap();

        let ipfs = IpfsBin::locate(&stub_ipfs(bin_dir.path(), "not-a-cid\n", "", 0)).unwrap();
        assert!(matches!(
            ipfs.add(data_dir.path(), false).await,
            Err(IpfsError::UploadFailed(_))
        ));

        let ipfs = IpfsBin::locate(&stub_ipfs(bin_dir.path(), "", "", 0)).unwrap();
        assert!(matches!(
            ipfs.add(data_dir.path(), false).await,
            Err(IpfsError::UploadFailed(_))
        ));
    }

    #[tokio::test]
    async fn non_utf8_file_name_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let bin_dir = tempfile::tempdir().unwrap();
        let data_dir = tempfile::tempdir().unwrap();
        let target = data_dir.path().join(OsStr::from_bytes(b"caf\xe9.txt"));
        std::fs::write(&target, b"latte").unwrap();

        let ipfs = IpfsBin::locate(&stub_ipfs(bin_dir.path(), &two_line_output(), "", 0)).unwrap();
        assert!(matches!(
            ipfs.add(&target, false).await,
            Err(IpfsError::InvalidTarget(_))
        ));
    }

    #[test]
    fn missing_binary_is_node_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("ipfs");
        assert!(matches!(
            IpfsBin::locate(&missing),
            Err(IpfsError::NodeUnavailable(_))
        ));
    }

    #[test]
    fn bare_name_is_searched_on_path() {
        let bin_dir = tempfile::tempdir().unwrap();
        let other_dir = tempfile::tempdir().unwrap();
        let stub = stub_ipfs(bin_dir.path(), "", "", 0);

        let path_var = env::join_paths([other_dir.path(), bin_dir.path()]).unwrap();
        let found = search_path(std::ffi::OsStr::new("ipfs"), Some(path_var));
        assert_eq!(found, Some(stub));

        let path_var = env::join_paths([other_dir.path()]).unwrap();
        assert_eq!(search_path(std::ffi::OsStr::new("ipfs"), Some(path_var)), None);
        assert_eq!(search_path(std::ffi::OsStr::new("ipfs"), None), None);
    }

    #[test]
    fn non_executable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("ipfs");
        std::fs::write(&plain, b"").unwrap();
        std::fs::set_permissions(&plain, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(IpfsBin::locate(&plain).is_err());
    }
}
