//! RDS / RBDS broadcast data decoding library.
//!
//! Decodes the Radio Data System sideband (IEC 62106, and the North American
//! RBDS variant of NRSC-4) from the 16-bit data blocks produced by an FM
//! tuner or demodulator:
//! - block-to-group reassembly with per-block error handling
//! - basic program data: PI, PS, PTY/PTYN, TP/TA, MS, DI, AF lists
//! - radio text, clock time, country/language codes
//! - Open Data Application announcements
//! - RDS-TMC traffic messages (ISO 14819), single and multi group
//!
//! The decoder is deliberately conservative: most fields must be received
//! twice in a row before they are accepted, so a single corrupted block
//! never reaches the public state.
//!
//! # Example
//!
//! ```
//! use fmrds::{BlockLabel, RawBlock, RdsDecoder, UpdateFlags};
//!
//! let mut decoder = RdsDecoder::new(false);
//! for _ in 0..2 {
//!     decoder.add(RawBlock::new(BlockLabel::A, 0x1234));
//!     decoder.add(RawBlock::new(BlockLabel::B, 0x0000));
//!     decoder.add(RawBlock::new(BlockLabel::C, 0x0000));
//!     let updated = decoder.add(RawBlock::new(BlockLabel::D, 0x0000));
//!     if updated.contains(UpdateFlags::PI) {
//!         assert_eq!(decoder.pi(), 0x1234);
//!     }
//! }
//! assert!(decoder.valid_fields().contains(UpdateFlags::PI));
//! ```

mod bits;
pub mod block;
pub mod decoder;
pub mod group;
mod staged;
mod tables;
pub mod tmc;

// Re-export the main types for convenience
pub use block::{BlockLabel, RawBlock};
pub use decoder::{AfSet, DiFlags, Oda, RdsDecoder, RdsTime, UpdateFlags, MAX_AF, MAX_ODA};
pub use group::{Group, GroupVersion, RdsStatistics};
pub use tmc::{Tmc, TmcAdditional, TmcMessage, MAX_TMC_ADDITIONAL};
