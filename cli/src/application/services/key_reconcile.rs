//! Replace one account's `authorized_keys`.
//!
//! Steps run in order and the first failure ends the attempt:
//! resolve home, ensure `.ssh`, back up the old file, write the payload and
//! re-assert modes, then (best effort) hand ownership to the account.
//!
//! The home directory belongs to the account, so `.ssh` and `authorized_keys`
//! must not be symlinks: a run as root would otherwise write through them.

use std::path::{Path, PathBuf};

use crate::application::ports::{AccountLookup, HostAccess};
use crate::domain::keys::{
    HomeLayout, KEYS_FILE_MODE, KeyArtifactPaths, KeyPayload, OwnershipOutcome, ROOT_ACCOUNT,
    ReconcileReport, SSH_DIR_MODE,
};
use crate::domain::ReconcileError;

/// Replace `account`'s `authorized_keys` with `payload`.
///
/// # Errors
///
/// Returns `UnknownAccount` / `HomeMissing` when the home cannot be resolved,
/// `SymlinkRefused` when `.ssh` or `authorized_keys` is a symlink,
/// `PermissionDenied` when the OS refuses a write, and `Io` for anything else.
pub fn apply(
    host: &impl HostAccess,
    layout: &HomeLayout,
    account: &str,
    payload: &KeyPayload,
) -> Result<ReconcileReport, ReconcileError> {
    let home = resolve_home(host, layout, account)?;
    let paths = KeyArtifactPaths::for_home(&home);
    let fail = |path: &Path| {
        let path = path.to_path_buf();
        move |err: anyhow::Error| classify(account, path, &err)
    };

    refuse_symlink(host, account, &paths.ssh_dir)?;
    host.create_dir(&paths.ssh_dir, SSH_DIR_MODE)
        .map_err(fail(&paths.ssh_dir))?;
    refuse_symlink(host, account, &paths.keys_file)?;

    let backed_up = host.exists(&paths.keys_file);
    if backed_up {
        host.copy(&paths.keys_file, &paths.backup_file)
            .map_err(fail(&paths.backup_file))?;
        tracing::info!(account, backup = %paths.backup_file.display(), "Created backup");
    }

    host.replace(&paths.keys_file, payload.as_bytes(), KEYS_FILE_MODE)
        .map_err(fail(&paths.keys_file))?;
    host.set_permissions(&paths.ssh_dir, SSH_DIR_MODE)
        .map_err(fail(&paths.ssh_dir))?;

    let ownership = assign_ownership(host, account, &paths);

    tracing::info!(
        account,
        path = %paths.keys_file.display(),
        bytes = payload.len(),
        "Updated authorized_keys"
    );

    Ok(ReconcileReport {
        account: account.to_string(),
        paths,
        backed_up,
        ownership,
    })
}

fn resolve_home(
    host: &impl HostAccess,
    layout: &HomeLayout,
    account: &str,
) -> Result<PathBuf, ReconcileError> {
    if account == ROOT_ACCOUNT {
        return Ok(layout.root_home.clone());
    }
    match host.lookup(account) {
        AccountLookup::Found(entry) => Ok(entry.home),
        AccountLookup::NotFound => Err(ReconcileError::UnknownAccount(account.to_string())),
        AccountLookup::Unavailable(reason) => {
            let home = layout.fallback_home(account);
            tracing::warn!(
                account,
                reason = %reason,
                home = %home.display(),
                "user database unavailable, falling back to conventional home"
            );
            if host.exists(&home) {
                Ok(home)
            } else {
                Err(ReconcileError::HomeMissing {
                    account: account.to_string(),
                    path: home,
                })
            }
        }
    }
}

fn refuse_symlink(
    host: &impl HostAccess,
    account: &str,
    path: &Path,
) -> Result<(), ReconcileError> {
    if host.is_symlink(path) {
        return Err(ReconcileError::SymlinkRefused {
            account: account.to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn assign_ownership(
    host: &impl HostAccess,
    account: &str,
    paths: &KeyArtifactPaths,
) -> OwnershipOutcome {
    if !host.is_elevated() {
        return OwnershipOutcome::Denied;
    }
    let AccountLookup::Found(entry) = host.lookup(account) else {
        tracing::debug!(account, "owner not resolvable, leaving ownership unchanged");
        return OwnershipOutcome::Unsupported;
    };
    for path in [&paths.keys_file, &paths.ssh_dir] {
        if let Err(e) = host.chown(path, entry.uid, entry.gid) {
            tracing::warn!(account, path = %path.display(), error = %e, "chown failed");
            return OwnershipOutcome::Unsupported;
        }
    }
    tracing::debug!(
        account,
        owner = %entry.name,
        uid = entry.uid,
        gid = entry.gid,
        "ownership assigned"
    );
    OwnershipOutcome::Applied
}

/// Map an infra failure to `PermissionDenied` or `Io` by the `io::Error` in its chain.
fn classify(account: &str, path: PathBuf, err: &anyhow::Error) -> ReconcileError {
    let denied = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
        .any(|io| io.kind() == std::io::ErrorKind::PermissionDenied);
    if denied {
        ReconcileError::PermissionDenied {
            account: account.to_string(),
            path,
        }
    } else {
        ReconcileError::Io {
            account: account.to_string(),
            detail: format!("{err:#}"),
        }
    }
}
