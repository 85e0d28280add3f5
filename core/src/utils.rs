use crate::example::scratch_dir;
use std::{
    fs::{create_dir, remove_dir_all},
    io::{self, ErrorKind::NotFound},
    path::{Path, PathBuf},
};
use tracing::debug;

/// Recreates `<example>/.scouts` as an empty directory, returning its path. If the directory:
/// 1. Does not exist: will create the directory.
/// 2. Exists (empty or not): will delete it and its contents, then create it again.
///
/// Only a missing directory is tolerated during removal; any other removal error (e.g. a
/// permission error, or `.scouts` being a regular file) is returned. The example directory itself
/// must already exist.
pub fn reset_scratch_dir(example: &Path) -> io::Result<PathBuf> {
    let scouts = scratch_dir(example);
    match remove_dir_all(&scouts) {
        Err(error) if error.kind() == NotFound => debug!("{} did not exist", scouts.display()),
        Err(error) => return Err(error),
        Ok(()) => debug!("Removed {}", scouts.display()),
    }
    create_dir(&scouts)?;
    Ok(scouts)
}

#[cfg(test)]
mod tests {
    #[cfg(not(miri))]
    #[test]
    fn reset_scratch_dir_test() {
        use super::*;
        use crate::test_util::tempdir;
        use std::fs::{File, read_dir};

        let tempdir = tempdir().unwrap();
        let example = tempdir.path();
        let scouts = scratch_dir(example);
        // Counts the number of entries in .scouts (used to verify whether reset_scratch_dir
        // returned an empty directory).
        let entry_count = || read_dir(&scouts).unwrap().count();
        // Absent beforehand.
        assert_eq!(reset_scratch_dir(example).unwrap(), scouts);
        assert_eq!(entry_count(), 0);
        // Existing and empty.
        assert_eq!(reset_scratch_dir(example).unwrap(), scouts);
        assert_eq!(entry_count(), 0);
        // Existing and nonempty, including a nested scout directory.
        File::create_new(scouts.join("file.txt")).unwrap();
        create_dir(scouts.join("kotlin")).unwrap();
        File::create_new(scouts.join("kotlin").join("Main.kt")).unwrap();
        assert_eq!(entry_count(), 2);
        reset_scratch_dir(example).unwrap();
        assert_eq!(entry_count(), 0);
        reset_scratch_dir(example).unwrap();
        assert_eq!(entry_count(), 0);
    }

    #[cfg(not(miri))]
    #[test]
    fn reset_scratch_dir_errors() {
        use super::*;
        use crate::test_util::tempdir;
        use std::fs::File;

        let tempdir = tempdir().unwrap();
        // A regular file where .scouts should be is not silently replaced.
        let example = tempdir.path().join("file_scouts");
        create_dir(&example).unwrap();
        File::create_new(scratch_dir(&example)).unwrap();
        assert!(reset_scratch_dir(&example).is_err());
        assert!(scratch_dir(&example).is_file());
        // A missing example directory means .scouts cannot be created.
        assert!(reset_scratch_dir(&tempdir.path().join("missing")).is_err());
    }
}
