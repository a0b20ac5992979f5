use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;

use windows::core::Error;

use crate::error::encoding_error;

pub fn osstr_to_wide(value: &OsStr) -> Result<Vec<u16>, Error> {
    let wide: Vec<u16> = value.encode_wide().chain(Some(0)).collect();
    if wide[..wide.len() - 1].contains(&0) {
        return Err(encoding_error());
    }

    Ok(wide)
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::osstr_to_wide;
    use crate::error::is_encoding_failure;

    #[test]
    fn appends_a_single_terminator() {
        let wide = osstr_to_wide(OsStr::new("attrib.txt")).expect("conversion failed");
        assert_eq!(wide.len(), "attrib.txt".len() + 1);
        assert_eq!(wide.last(), Some(&0));
    }

    #[test]
    fn rejects_interior_nul() {
        let error = osstr_to_wide(OsStr::new("bad\0name")).expect_err("conversion succeeded");
        assert!(is_encoding_failure(&error));
    }
}
