//! Persistent score database, indexed by position ranks.
//!
//! A single flat file: byte 0 holds the checkpoint layer of the
//! retrograde build, byte `rank + 1` the score of `rank`. A cell stores
//! `score + 49`, so scores −48..=48 map to 1..=97 and 0 means
//! "uninitialized/unreachable". Layer 47 holds no reachable position
//! and is cut out of the file: ranks above it are remapped down by its
//! size on both read and write.
//!
//! Cell life cycle: uninitialized → 0 (SCC seeding for cycle members) →
//! final retrograde value.
//!
//! The file is sparse and may be shorter than the maximal rank; reads
//! past the end simply report "uninitialized". The database is optional
//! for search (a handle that failed to open answers every read with
//! "uninitialized"), but the retrograde build refuses to run without
//! one.
//!
//! The full file is on the order of 1.4 TB. Building it may fill up
//! your file system; do so only on a machine provisioned for it.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use parking_lot::RwLock;

use crate::board::Rank;
use crate::levels::{level, upper_limit};

/// Cell encoding offset: stored byte = score + 49.
const OFFSET: i8 = 49;

/// The score value that stands for "uninitialized"; never written.
pub const UNINITIALIZED: i8 = -OFFSET;

/// Handle on the score file. Reads share the lock; writes take it
/// exclusively.
pub struct Database {
    file: RwLock<Option<File>>,
    path: PathBuf,
}

impl Database {
    /// Open (or create) the score file read-write.
    ///
    /// An open failure is not fatal: the handle stays usable and
    /// answers every read with "uninitialized", which is what the
    /// search wants from a missing database. Writers must check
    /// [`Database::is_open`] first.
    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let file = match OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
        {
            Ok(file) => {
                debug!("opened score database {}", path.display());
                Some(file)
            }
            Err(err) => {
                warn!("could not open score database {}: {err}", path.display());
                None
            }
        };
        Database {
            file: RwLock::new(file),
            path,
        }
    }

    /// A handle with no backing file; every read is "uninitialized".
    #[must_use]
    pub fn closed() -> Self {
        Database {
            file: RwLock::new(None),
            path: PathBuf::new(),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.file.read().is_some()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cut layer 47 out of the cell addressing: the layer is
    /// unreachable and its span would only bloat the file.
    fn remap(rank: Rank) -> Rank {
        if rank >= upper_limit(47) {
            rank - upper_limit(47) + upper_limit(46)
        } else {
            rank
        }
    }

    /// Layer of a rank, rejected when it falls into the skipped layer.
    fn checked_level(rank: Rank) -> i8 {
        let level = level(rank);
        assert!(level != 47, "layer 47 is unreachable: rank {rank}");
        level
    }

    /// The layer checkpoint of the retrograde build, stored in byte 0.
    /// A closed database or a fresh file reads as 0.
    #[must_use]
    pub fn checkpoint(&self) -> i8 {
        let guard = self.file.read();
        let Some(file) = guard.as_ref() else {
            debug!("database closed: checkpoint defaults to 0");
            return 0;
        };

        let mut cell = [0u8; 1];
        match file.read_at(&mut cell, 0) {
            // Reading past the end of a fresh file: default.
            Ok(0) => 0,
            Ok(_) => cell[0] as i8,
            Err(err) => panic!("score database read failed: {err}"),
        }
    }

    /// Record the layer the build is working on.
    ///
    /// # Panics
    ///
    /// Panics on a closed database, a layer outside {0..48}\{47}, or an
    /// I/O error, all fatal for the build.
    pub fn set_checkpoint(&self, layer: i8) {
        assert!(
            (0..=48).contains(&layer) && layer != 47,
            "checkpoint layer out of range: {layer}"
        );

        let guard = self.file.write();
        let Some(file) = guard.as_ref() else {
            panic!("cannot write the checkpoint of a closed database");
        };
        if let Err(err) = file.write_all_at(&[layer as u8], 0) {
            panic!("score database write failed: {err}");
        }
    }

    /// Score of a rank: `None` while uninitialized, which covers a
    /// closed database, a hole, and a read past the end of the file.
    ///
    /// # Panics
    ///
    /// Panics on an out-of-range rank or a rank in layer 47.
    #[must_use]
    pub fn score(&self, rank: Rank) -> Option<i8> {
        let _ = Self::checked_level(rank);

        let guard = self.file.read();
        let file = guard.as_ref()?;

        let mut cell = [0u8; 1];
        match file.read_at(&mut cell, (Self::remap(rank) + 1) as u64) {
            // Past EOF: uninitialized, not an error.
            Ok(0) => None,
            Ok(_) => {
                let score = cell[0] as i8 - OFFSET;
                if score == UNINITIALIZED {
                    None
                } else {
                    Some(score)
                }
            }
            Err(err) => panic!("score database read failed: {err}"),
        }
    }

    /// Write a score cell. Writing the uninitialized sentinel is
    /// silently skipped: it is the absence of a value, not a value.
    ///
    /// # Panics
    ///
    /// Panics on a closed database, a score beyond the rank's layer
    /// bound, a rank in layer 47, or an I/O error.
    pub fn set_score(&self, rank: Rank, score: i8) {
        let level = Self::checked_level(rank);

        if score == UNINITIALIZED {
            debug!("rank {rank}: skip uninitialized sentinel");
            return;
        }
        assert!(
            (-level..=level).contains(&score),
            "score {score} out of layer {level} at rank {rank}"
        );

        let cell = [(score + OFFSET) as u8];
        let guard = self.file.write();
        let Some(file) = guard.as_ref() else {
            panic!("cannot write into a closed database");
        };
        if let Err(err) = file.write_all_at(&cell, (Self::remap(rank) + 1) as u64) {
            panic!("score database write failed: {err}");
        }
    }

    /// File length in bytes; test and diagnostics helper.
    pub fn len(&self) -> io::Result<u64> {
        let guard = self.file.read();
        match guard.as_ref() {
            Some(file) => Ok(file.metadata()?.len()),
            None => Ok(0),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.len(), Ok(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::layer_bounds;

    fn scratch() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::open(dir.path().join("oware.db"));
        assert!(db.is_open());
        (dir, db)
    }

    #[test]
    fn fresh_database_reads_uninitialized() {
        let (_dir, db) = scratch();
        assert_eq!(db.checkpoint(), 0);
        assert_eq!(db.score(0), None);
        assert_eq!(db.score(1_000_000), None);
    }

    #[test]
    fn score_roundtrip() {
        let (_dir, db) = scratch();
        // Rank 100 sits in layer 3: scores −3..=3 are storable.
        let rank = 100;
        assert_eq!(level(rank), 3);
        for score in -3..=3 {
            db.set_score(rank, score);
            assert_eq!(db.score(rank), Some(score));
        }
    }

    #[test]
    fn zero_score_is_a_value() {
        let (_dir, db) = scratch();
        db.set_score(5, 0);
        assert_eq!(db.score(5), Some(0));
        assert_eq!(db.score(6), None);
    }

    #[test]
    fn sentinel_writes_are_skipped() {
        let (_dir, db) = scratch();
        db.set_score(7, UNINITIALIZED);
        assert_eq!(db.score(7), None);
    }

    #[test]
    fn checkpoint_roundtrip() {
        let (_dir, db) = scratch();
        db.set_checkpoint(12);
        assert_eq!(db.checkpoint(), 12);
        db.set_checkpoint(48);
        assert_eq!(db.checkpoint(), 48);
    }

    #[test]
    fn layer_48_ranks_are_remapped_down() {
        let (_dir, db) = scratch();
        let (low48, _) = layer_bounds(48);
        db.set_score(low48, 3);
        assert_eq!(db.score(low48), Some(3));
        // The file ends where the remapped cell ends, far below the
        // nominal rank.
        let len = db.len().expect("len");
        assert_eq!(len as i64, Database::remap(low48) + 2);
        assert!((len as i64) < low48);
    }

    #[test]
    #[should_panic(expected = "layer 47")]
    fn layer_47_reads_panic() {
        let (_dir, db) = scratch();
        let (low47, _) = layer_bounds(47);
        let _ = db.score(low47);
    }

    #[test]
    #[should_panic(expected = "out of layer")]
    fn scores_beyond_the_layer_bound_panic() {
        let (_dir, db) = scratch();
        // Rank 5 is in layer 1.
        db.set_score(5, 2);
    }

    #[test]
    #[should_panic(expected = "checkpoint layer out of range")]
    fn checkpoint_47_panics() {
        let (_dir, db) = scratch();
        db.set_checkpoint(47);
    }

    #[test]
    fn closed_database_reads_default() {
        let db = Database::closed();
        assert!(!db.is_open());
        assert_eq!(db.checkpoint(), 0);
        assert_eq!(db.score(42), None);
    }

    #[test]
    #[should_panic(expected = "closed database")]
    fn closed_database_writes_panic() {
        Database::closed().set_score(1, 0);
    }
}
