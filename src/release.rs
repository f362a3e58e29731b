//! Turns a detected change into a published release.
//!
//! [`version`] computes the tag to cut, [`publisher`] renders the notes and
//! creates the release, and [`gate`] keeps a push from being released twice
//! by this process.
pub mod gate;
pub mod publisher;
pub mod version;
