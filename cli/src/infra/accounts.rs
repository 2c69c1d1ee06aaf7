//! System accounts: passwd lookup, effective uid and ownership changes.
//!
//! `SystemHost` is the production `HostAccess`; its `LocalFs` half lives in
//! `crate::infra::fs`.

use std::path::Path;

use anyhow::{Context, Result};
use nix::fcntl::AtFlags;
use nix::unistd::{Gid, Uid, User};

use crate::application::ports::{
    AccountDirectory, AccountEntry, AccountLookup, FileOwnership, PrivilegeProbe,
};

/// The local machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl AccountDirectory for SystemHost {
    fn lookup(&self, name: &str) -> AccountLookup {
        match User::from_name(name) {
            Ok(Some(user)) => AccountLookup::Found(AccountEntry {
                name: user.name,
                home: user.dir,
                uid: user.uid.as_raw(),
                gid: user.gid.as_raw(),
            }),
            Ok(None) => AccountLookup::NotFound,
            Err(errno) => AccountLookup::Unavailable(errno.to_string()),
        }
    }
}

impl PrivilegeProbe for SystemHost {
    fn is_elevated(&self) -> bool {
        nix::unistd::geteuid().is_root()
    }
}

impl FileOwnership for SystemHost {
    fn chown(&self, path: &Path, uid: u32, gid: u32) -> Result<()> {
        nix::unistd::fchownat(
            None,
            path,
            Some(Uid::from_raw(uid)),
            Some(Gid::from_raw(gid)),
            AtFlags::AT_SYMLINK_NOFOLLOW,
        )
        .with_context(|| format!("changing owner of {} to {uid}:{gid}", path.display()))
    }
}
