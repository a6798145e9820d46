use std::{
  io,
  path::{Path, PathBuf},
};

use tantivy::{
  directory::{
    error::{DeleteError, LockError, OpenDirectoryError, OpenReadError, OpenWriteError},
    Directory, DirectoryLock, FileHandle, Lock, MmapDirectory, WatchCallback, WatchHandle, WritePtr,
  },
  TantivyError,
};

/// `MmapDirectory` qui n'écrit jamais dans le répertoire de l'index.
///
/// Les verrous sont accordés sans fichier `.tantivy-*.lock` et toute écriture
/// échoue : un utilisateur qui n'a que le droit de lecture peut compter.
#[derive(Debug, Clone)]
pub struct ReadOnlyDirectory(MmapDirectory);

impl ReadOnlyDirectory {
  pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, OpenDirectoryError> {
    MmapDirectory::open(path).map(Self)
  }
}

fn read_only(path: &Path) -> io::Error {
  io::Error::new(
    io::ErrorKind::PermissionDenied,
    format!("index ouvert en lecture seule : écriture de {} refusée", path.display()),
  )
}

impl Directory for ReadOnlyDirectory {
  fn get_file_handle(&self, path: &Path) -> Result<Box<dyn FileHandle>, OpenReadError> {
    self.0.get_file_handle(path)
  }

  fn exists(&self, path: &Path) -> Result<bool, OpenReadError> {
    self.0.exists(path)
  }

  fn atomic_read(&self, path: &Path) -> Result<Vec<u8>, OpenReadError> {
    self.0.atomic_read(path)
  }

  fn delete(&self, path: &Path) -> Result<(), DeleteError> {
    Err(DeleteError::IoError {
      io_error: read_only(path),
      filepath: PathBuf::from(path),
    })
  }

  fn open_write(&self, path: &Path) -> Result<WritePtr, OpenWriteError> {
    Err(OpenWriteError::wrap_io_error(read_only(path), PathBuf::from(path)))
  }

  fn atomic_write(&self, path: &Path, _data: &[u8]) -> io::Result<()> {
    Err(read_only(path))
  }

  fn sync_directory(&self) -> io::Result<()> {
    Ok(())
  }

  // rien ne peut supprimer de fichier à travers ce répertoire
  fn acquire_lock(&self, _lock: &Lock) -> Result<DirectoryLock, LockError> {
    Ok(DirectoryLock::from(Box::new(())))
  }

  fn watch(&self, _watch_callback: WatchCallback) -> Result<WatchHandle, TantivyError> {
    Ok(WatchHandle::empty())
  }
}
