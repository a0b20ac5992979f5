use std::io::{self, Write};

use crate::attributes::{FLAG_TABLE, FileAttributes};

// Diagnostic output is best effort; a failed write is not worth an error.
pub fn write_attributes<W>(attributes: FileAttributes, sink: &mut W)
where
    W: Write,
{
    for (flag, name) in &FLAG_TABLE {
        if attributes.contains(*flag) {
            let _ = write!(sink, " {name}");
        }
    }

    let _ = writeln!(sink);
}

pub fn print_attributes(attributes: FileAttributes) {
    write_attributes(attributes, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use windows::Win32::Storage::FileSystem::{
        FILE_ATTRIBUTE_DIRECTORY, FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_REPARSE_POINT,
        FILE_ATTRIBUTE_SYSTEM,
    };

    use super::write_attributes;
    use crate::attributes::FileAttributes;

    fn rendered(attributes: FileAttributes) -> String {
        let mut sink = Vec::new();
        write_attributes(attributes, &mut sink);
        String::from_utf8(sink).expect("non-utf8 output")
    }

    #[test]
    fn empty_mask_is_just_a_newline() {
        assert_eq!(rendered(FileAttributes::default()), "\n");
    }

    #[test]
    fn names_follow_table_order_not_insertion_order() {
        let attributes = FileAttributes::default()
            .with(FILE_ATTRIBUTE_SYSTEM)
            .with(FILE_ATTRIBUTE_HIDDEN);
        assert_eq!(rendered(attributes), " HIDDEN SYSTEM\n");
    }

    #[test]
    fn junction_directory_renders_both_flags() {
        let attributes = FileAttributes::default()
            .with(FILE_ATTRIBUTE_REPARSE_POINT)
            .with(FILE_ATTRIBUTE_DIRECTORY);
        assert_eq!(rendered(attributes), " DIRECTORY REPARSE_POINT\n");
    }

    #[test]
    fn sentinel_renders_its_own_name() {
        assert_eq!(rendered(FileAttributes::NORMAL), " NORMAL\n");
    }
}
