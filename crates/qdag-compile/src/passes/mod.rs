//! Built-in compilation passes.
//!
//! - [`CancelCX`] and [`CancelInvolutions`]: remove adjacent self-inverse pairs
//! - [`CompactVertices`]: drop tombstones left by removals
//! - [`CircuitAnalysis`]: record [`CircuitMetrics`](crate::property::CircuitMetrics)
//! - [`IntegrityVerification`]: run the full circuit consistency check

mod analysis;
mod cancel;
mod compact;
mod verification;


pub use analysis::CircuitAnalysis;
pub use cancel::{CancelCX, CancelInvolutions, CancellationStats};
pub use compact::CompactVertices;
pub use verification::{IntegrityVerification, VerificationResult};
