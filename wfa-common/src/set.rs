use std::path::Path;

use windows::Win32::Storage::FileSystem::SetFileAttributesW;
use windows::core::{PCWSTR, Result};

use crate::attributes::FileAttributes;
use crate::utils::osstr_to_wide;

// Single native call outside the query cascade; the error passes through
// untouched and no retry is attempted.
pub fn set_file_attributes(path: impl AsRef<Path>, attributes: FileAttributes) -> Result<()> {
    let wide = osstr_to_wide(path.as_ref().as_os_str())?;
    unsafe { SetFileAttributesW(PCWSTR::from_raw(wide.as_ptr()), attributes.into()) }
}
