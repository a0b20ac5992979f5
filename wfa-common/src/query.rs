use std::ffi::c_void;
use std::path::Path;

use log::{debug, warn};
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::Storage::FileSystem::{
    BY_HANDLE_FILE_INFORMATION, CreateFileW, FILE_FLAG_BACKUP_SEMANTICS, FILE_SHARE_NONE,
    FindClose, FindFirstFileW, GetFileAttributesExW, GetFileExInfoStandard,
    GetFileInformationByHandle, OPEN_EXISTING, WIN32_FILE_ATTRIBUTE_DATA, WIN32_FIND_DATAW,
};
use windows::core::{PCWSTR, Result};

use crate::attributes::FileAttributes;
use crate::utils::osstr_to_wide;

pub type Strategy = fn(&Path) -> Result<FileAttributes>;

// Ordered by increasing cost and coverage; the last entry is authoritative.
pub const CASCADE: [(&str, Strategy); 3] = [
    ("metadata-lookup", by_metadata_lookup),
    ("directory-enumeration", by_directory_enumeration),
    ("handle-query", by_handle),
];

struct FindGuard {
    _handle: HANDLE,
}

impl Drop for FindGuard {
    fn drop(&mut self) {
        if let Err(error) = unsafe { FindClose(self._handle) } {
            warn!("Failed to close search handle: {error}");
        }
    }
}

struct HandleGuard {
    _handle: HANDLE,
}

impl Drop for HandleGuard {
    fn drop(&mut self) {
        if let Err(error) = unsafe { CloseHandle(self._handle) } {
            warn!("Failed to close object handle: {error}");
        }
    }
}

pub fn by_metadata_lookup(path: &Path) -> Result<FileAttributes> {
    let wide = osstr_to_wide(path.as_os_str())?;
    let mut data = WIN32_FILE_ATTRIBUTE_DATA::default();
    unsafe {
        GetFileAttributesExW(
            PCWSTR::from_raw(wide.as_ptr()),
            GetFileExInfoStandard,
            &mut data as *mut WIN32_FILE_ATTRIBUTE_DATA as *mut c_void,
        )?;
    }

    Ok(FileAttributes(data.dwFileAttributes))
}

pub fn by_directory_enumeration(path: &Path) -> Result<FileAttributes> {
    let wide = osstr_to_wide(path.as_os_str())?;
    let mut data = WIN32_FIND_DATAW::default();

    // One search call matching a single entry; wildcards match their first
    // entry and an empty match set surfaces the native not-found error.
    let search = unsafe { FindFirstFileW(PCWSTR::from_raw(wide.as_ptr()), &mut data)? };
    let _guard = FindGuard { _handle: search };

    Ok(FileAttributes(data.dwFileAttributes))
}

pub fn by_handle(path: &Path) -> Result<FileAttributes> {
    let wide = osstr_to_wide(path.as_os_str())?;

    // Zero-access open is enough for a metadata query; backup semantics let
    // directories and junction points be opened too.
    let handle = unsafe {
        CreateFileW(
            PCWSTR::from_raw(wide.as_ptr()),
            0,
            FILE_SHARE_NONE,
            None,
            OPEN_EXISTING,
            FILE_FLAG_BACKUP_SEMANTICS,
            None,
        )?
    };
    let _guard = HandleGuard { _handle: handle };

    let mut information = BY_HANDLE_FILE_INFORMATION::default();
    unsafe { GetFileInformationByHandle(handle, &mut information)? };

    Ok(FileAttributes(information.dwFileAttributes))
}

pub fn stat_file_attributes(path: impl AsRef<Path>) -> Result<FileAttributes> {
    let path = path.as_ref();
    let [fallbacks @ .., (_, authoritative)] = &CASCADE;

    for (name, strategy) in fallbacks {
        match strategy(path) {
            Ok(attributes) if !attributes.is_normal_only() => return Ok(attributes),
            Ok(_) => debug!(
                "{name} saw only the normal sentinel for {}, falling back",
                path.display()
            ),
            Err(error) => debug!("{name} failed for {}: {error}", path.display()),
        }
    }

    // The handle query is final: its sentinel is an answer rather than an
    // ambiguity, and on total failure its error is the one surfaced.
    authoritative(path)
}

#[cfg(test)]
mod tests {
    use super::CASCADE;

    #[test]
    fn cascade_order_is_declared() {
        let names: Vec<&str> = CASCADE.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            ["metadata-lookup", "directory-enumeration", "handle-query"]
        );
    }
}
