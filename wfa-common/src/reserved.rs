use std::collections::HashSet;
use std::path::Path;

// Partial by design: the full set varies across Windows versions, so callers
// extend the list through configuration instead of relying on it being
// exhaustive.
const DEFAULT_NAMES: [&str; 24] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9", "CONIN$",
    "CONOUT$",
];

#[derive(Clone, Debug)]
pub struct ReservedNames {
    _names: HashSet<String>,
}

impl ReservedNames {
    pub fn extend<I>(&mut self, extra: I)
    where
        I: IntoIterator<Item = String>,
    {
        self._names
            .extend(extra.into_iter().map(|name| name.to_ascii_uppercase()));
    }

    // Device names are reserved in every directory, so only the final path
    // component matters. Extension rules vary by platform version and are
    // not modelled.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        let text = path.as_ref().to_string_lossy();
        let leaf = text.rsplit(['\\', '/']).next().unwrap_or(&text);
        self._names.contains(&leaf.to_ascii_uppercase())
    }
}

impl Default for ReservedNames {
    fn default() -> Self {
        Self {
            _names: DEFAULT_NAMES.iter().copied().map(String::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReservedNames;

    #[test]
    fn default_set_covers_the_classic_names() {
        let reserved = ReservedNames::default();
        assert!(reserved.contains("CON"));
        assert!(reserved.contains("nul"));
        assert!(reserved.contains("COM1"));
        assert!(reserved.contains("LPT9"));
        assert!(!reserved.contains("COM0"));
        assert!(!reserved.contains("report.txt"));
    }

    #[test]
    fn only_the_final_component_is_checked() {
        let reserved = ReservedNames::default();
        assert!(reserved.contains(r"C:\temp\CON"));
        assert!(reserved.contains("queue/aux"));
        assert!(!reserved.contains("CON.txt"));
    }

    #[test]
    fn extension_through_configuration() {
        let mut reserved = ReservedNames::default();
        reserved.extend(["trkwks".to_string()]);
        assert!(reserved.contains(r"\\.\pipe\trkwks"));
        assert!(!reserved.contains(r"\\.\pipe\other"));
    }
}
