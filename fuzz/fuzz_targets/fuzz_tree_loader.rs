//! Fuzz target for declaration-tree document parsing.
//!
//! Goal: The loader should **never panic** on any input.
//! It may report a malformed document, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_tree_loader
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only test valid UTF-8 strings (tree documents must be UTF-8)
    if let Ok(text) = std::str::from_utf8(data) {
        // Malformed input must degrade, never panic
        let _ = renameguard_tree::parse_tree(text);

        // Identifier lists accept anything line-shaped
        let _ = renameguard_tree::parse_identifier_list(text);
    }
});
