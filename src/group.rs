//! Assembled RDS groups and reception statistics.

use serde::Serialize;

/// Version of an RDS group, selected by bit 11 of block B.
///
/// Version B groups repeat the PI code in block C (transmitted as C′) and
/// carry half the payload of their version A counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GroupVersion {
    #[default]
    A,
    B,
}

/// One complete 104-bit RDS group, reduced to its payload fields.
///
/// Blocks C and D are kept as raw bytes; their meaning depends entirely on
/// the group type and is only resolved by the per-type decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Group {
    /// Program Identification code from block A.
    pub pi: u16,
    /// Group type code (0..15) from the high nibble of block B.
    pub group_id: u8,
    /// Group version from bit 11 of block B.
    pub version: GroupVersion,
    /// Group-type specific payload: the low 5 bits of block B.
    pub data_b_lsb: u8,
    /// High byte of block C.
    pub data_c_msb: u8,
    /// Low byte of block C.
    pub data_c_lsb: u8,
    /// High byte of block D.
    pub data_d_msb: u8,
    /// Low byte of block D.
    pub data_d_lsb: u8,
}

/// Reception statistics, updated on every call to
/// [`RdsDecoder::add`](crate::RdsDecoder::add).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RdsStatistics {
    /// Total number of blocks fed to the decoder.
    pub block_cnt: u32,
    /// Blocks discarded because they were marked uncorrectable.
    pub block_error_cnt: u32,
    /// Blocks accepted after upstream error correction.
    pub block_corrected_cnt: u32,
    /// Complete groups assembled.
    pub group_cnt: u32,
    /// Blocks that arrived with the wrong label for the assembler state.
    pub group_error_cnt: u32,
    /// Per-group-type counters, indexed by group id.
    pub group_type_cnt: [u32; 16],
}
