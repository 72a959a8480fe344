//! Integration tests driving the cargo-herald binary

mod helpers;
mod test_compare;
mod test_init;
mod test_notes;
mod test_release_needed;
