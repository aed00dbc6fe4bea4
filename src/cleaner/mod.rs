//! Tree walking and entry classification
//!
//! The session materializes a pre-order list of every directory in the
//! configuration namespace, then classifies entries one directory at a
//! time, driven by the caller advancing the cursor. The per-directory
//! step is the natural cancellation point; discovery itself is a
//! single atomic call.

mod session;

pub use session::{classify, CleanerSession, DirReport, ScanOptions, UnknownPair};
