//! Btrfs snapshot safety net.
//!
//! Before the first mutating step, a read-only snapshot of `/` is taken under
//! the snapshot directory and its path written to the [`SnapshotRecord`].
//! `--rollback` reads that record back and makes the snapshot the default
//! subvolume; the operator reboots to complete the swap.
//!
//! Any filesystem other than Btrfs (or any failure to tell) means no snapshot:
//! hardening still proceeds, rollback refuses.

pub mod btrfs;
pub mod detect;
pub mod record;

pub use btrfs::{SnapshotManager, SubvolumeId, parse_subvolume_id};
pub use detect::{is_snapshot_capable_root, root_filesystem_type};
pub use record::SnapshotRecord;
