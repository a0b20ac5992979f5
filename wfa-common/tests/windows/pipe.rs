use std::path::Path;

use wfa_common::error::{is_busy, is_not_found, is_timeout};
use wfa_common::query::{CASCADE, stat_file_attributes};

// Distributed Link Tracking pipe, present on stock Windows installations.
const SYSTEM_PIPE: &str = r"\\.\pipe\trkwks";

#[test]
fn pipe_exposes_only_the_normal_sentinel() {
    let path = Path::new(SYSTEM_PIPE);

    for (name, strategy) in &CASCADE {
        match strategy(path) {
            Ok(attributes) => {
                assert!(
                    attributes.is_normal_only(),
                    "{name} reported extended attributes {attributes:?} for a pipe"
                );
            }
            Err(error) if is_not_found(&error) => {
                eprintln!("skipping pipe test, {SYSTEM_PIPE} is absent: {error}");
                return;
            }
            Err(error) if is_busy(&error) || is_timeout(&error) => {
                eprintln!("{name} found {SYSTEM_PIPE} busy: {error}");
            }
            Err(error) => panic!("{name} failed on {SYSTEM_PIPE}: {error}"),
        }
    }

    match stat_file_attributes(path) {
        Ok(attributes) => assert!(attributes.is_normal_only()),
        Err(error) => assert!(
            is_busy(&error) || is_timeout(&error),
            "cascade failed on {SYSTEM_PIPE}: {error}"
        ),
    }
}
