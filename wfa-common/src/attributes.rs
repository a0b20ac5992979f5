use windows::Win32::Storage::FileSystem::{
    FILE_ATTRIBUTE_ARCHIVE, FILE_ATTRIBUTE_DEVICE, FILE_ATTRIBUTE_DIRECTORY,
    FILE_ATTRIBUTE_ENCRYPTED, FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_INTEGRITY_STREAM,
    FILE_ATTRIBUTE_NORMAL, FILE_ATTRIBUTE_NOT_CONTENT_INDEXED, FILE_ATTRIBUTE_NO_SCRUB_DATA,
    FILE_ATTRIBUTE_OFFLINE, FILE_ATTRIBUTE_PINNED, FILE_ATTRIBUTE_READONLY,
    FILE_ATTRIBUTE_RECALL_ON_DATA_ACCESS, FILE_ATTRIBUTE_RECALL_ON_OPEN,
    FILE_ATTRIBUTE_REPARSE_POINT, FILE_ATTRIBUTE_SPARSE_FILE, FILE_ATTRIBUTE_SYSTEM,
    FILE_ATTRIBUTE_TEMPORARY, FILE_ATTRIBUTE_UNPINNED, FILE_ATTRIBUTE_VIRTUAL,
    FILE_FLAGS_AND_ATTRIBUTES,
};

pub const FLAG_TABLE: [(FILE_FLAGS_AND_ATTRIBUTES, &str); 20] = [
    (FILE_ATTRIBUTE_READONLY, "READONLY"),
    (FILE_ATTRIBUTE_HIDDEN, "HIDDEN"),
    (FILE_ATTRIBUTE_SYSTEM, "SYSTEM"),
    (FILE_ATTRIBUTE_DIRECTORY, "DIRECTORY"),
    (FILE_ATTRIBUTE_ARCHIVE, "ARCHIVE"),
    (FILE_ATTRIBUTE_DEVICE, "DEVICE"),
    (FILE_ATTRIBUTE_NORMAL, "NORMAL"),
    (FILE_ATTRIBUTE_TEMPORARY, "TEMPORARY"),
    (FILE_ATTRIBUTE_SPARSE_FILE, "SPARSE_FILE"),
    (FILE_ATTRIBUTE_REPARSE_POINT, "REPARSE_POINT"),
    (FILE_ATTRIBUTE_OFFLINE, "OFFLINE"),
    (FILE_ATTRIBUTE_NOT_CONTENT_INDEXED, "NOT_CONTENT_INDEXED"),
    (FILE_ATTRIBUTE_ENCRYPTED, "ENCRYPTED"),
    (FILE_ATTRIBUTE_INTEGRITY_STREAM, "INTEGRITY_STREAM"),
    (FILE_ATTRIBUTE_VIRTUAL, "VIRTUAL"),
    (FILE_ATTRIBUTE_NO_SCRUB_DATA, "NO_SCRUB_DATA"),
    (FILE_ATTRIBUTE_RECALL_ON_OPEN, "RECALL_ON_OPEN"),
    (FILE_ATTRIBUTE_PINNED, "PINNED"),
    (FILE_ATTRIBUTE_UNPINNED, "UNPINNED"),
    (FILE_ATTRIBUTE_RECALL_ON_DATA_ACCESS, "RECALL_ON_DATA_ACCESS"),
];

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FileAttributes(pub u32);

impl FileAttributes {
    // The OS never combines FILE_ATTRIBUTE_NORMAL with any other flag, so a
    // mask equal to it means the query saw no extended attributes at all.
    pub const NORMAL: Self = Self(FILE_ATTRIBUTE_NORMAL.0);

    pub fn contains(self, flag: FILE_FLAGS_AND_ATTRIBUTES) -> bool {
        self.0 & flag.0 != 0
    }

    pub fn with(self, flag: FILE_FLAGS_AND_ATTRIBUTES) -> Self {
        Self(self.0 | flag.0)
    }

    pub fn without(self, flag: FILE_FLAGS_AND_ATTRIBUTES) -> Self {
        Self(self.0 & !flag.0)
    }

    pub fn is_normal_only(self) -> bool {
        self == Self::NORMAL
    }
}

impl From<u32> for FileAttributes {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<FileAttributes> for FILE_FLAGS_AND_ATTRIBUTES {
    fn from(attributes: FileAttributes) -> Self {
        Self(attributes.0)
    }
}

pub fn flag_by_name(name: &str) -> Option<FILE_FLAGS_AND_ATTRIBUTES> {
    FLAG_TABLE
        .iter()
        .find(|(_, flag_name)| flag_name.eq_ignore_ascii_case(name))
        .map(|(flag, _)| *flag)
}

#[cfg(test)]
mod tests {
    use windows::Win32::Storage::FileSystem::{
        FILE_ATTRIBUTE_ARCHIVE, FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_REPARSE_POINT,
    };

    use super::{FLAG_TABLE, FileAttributes, flag_by_name};

    #[test]
    fn sentinel_is_compared_by_equality() {
        assert_eq!(FileAttributes::NORMAL.0, 0x80);
        assert!(FileAttributes::NORMAL.is_normal_only());
        assert!(!FileAttributes::default().is_normal_only());
        assert!(!FileAttributes::NORMAL.with(FILE_ATTRIBUTE_HIDDEN).is_normal_only());
    }

    #[test]
    fn table_is_ordered_by_bit_value() {
        for window in FLAG_TABLE.windows(2) {
            assert!(window[0].0.0 < window[1].0.0);
        }
    }

    #[test]
    fn bit_manipulation_round_trips() {
        let attributes = FileAttributes::default().with(FILE_ATTRIBUTE_ARCHIVE);
        assert!(attributes.contains(FILE_ATTRIBUTE_ARCHIVE));
        assert!(!attributes.contains(FILE_ATTRIBUTE_HIDDEN));
        assert_eq!(attributes.without(FILE_ATTRIBUTE_ARCHIVE), FileAttributes::default());
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        assert_eq!(flag_by_name("archive"), Some(FILE_ATTRIBUTE_ARCHIVE));
        assert_eq!(flag_by_name("Reparse_Point"), Some(FILE_ATTRIBUTE_REPARSE_POINT));
        assert_eq!(flag_by_name("nonsense"), None);
    }
}
