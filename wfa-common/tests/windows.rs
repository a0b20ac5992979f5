#![cfg(windows)]

mod cascade {
    include!("windows/cascade.rs");
}
mod pipe {
    include!("windows/pipe.rs");
}
