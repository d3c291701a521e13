//! RDS-TMC decoding (Traffic Message Channel, ISO 14819).
//!
//! TMC traffic messages ride in type 8A groups; the carrying station
//! announces the channel through an ODA with AID 0xCD46/0xCD47 and transmits
//! the channel parameters in the same type 3A groups. Both paths demand that
//! a group is received twice in a row before it is trusted.
//!
//! A user message is either *single group* (one 8A group carries the whole
//! event) or *multi group*: a first group with the primary fields, followed
//! by up to four continuation groups whose payload forms a continuous bit
//! stream of labelled additional-information records.

use heapless::Vec;
use serde::Serialize;
use tracing::{debug, trace};

use crate::bits::BitCursor;
use crate::group::Group;
use crate::staged::Staged;

/// Capacity of the additional-information list of one message.
pub const MAX_TMC_ADDITIONAL: usize = 28;

/// A multi-group message carries at most four 28-bit payload windows.
const MAX_TMC_WINDOWS: usize = 4;

/// Single-group flag: bit 4 of the block B payload.
const TMC_SINGLE_GROUP: u8 = 0x10;
/// Tuning-information flag: bit 3 of the block B payload.
const TMC_TUNING_INFO: u8 = 0x08;

/// Data lengths of the additional-information records, indexed by label
/// (ISO 14819-1 section 5.5.1).
const ADDITIONAL_LEN: [u8; 16] = [3, 3, 5, 5, 5, 8, 8, 8, 8, 11, 16, 16, 16, 16, 0, 0];

/// Labels are 4 bits wide.
const LABEL_LEN: usize = 4;
/// Label 15 is reserved for future use and skipped without storing.
const LABEL_RESERVED: u16 = 15;

/// One additional-information record of a multi-group message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TmcAdditional {
    pub label: u8,
    pub data: u16,
}

/// A decoded TMC user message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TmcMessage {
    /// Duration and persistence code.
    pub dp: u8,
    /// Drivers are advised to follow the diversion.
    pub follow_diversion: bool,
    /// Event direction: `true` = negative.
    pub neg_direction: bool,
    /// Extent of the event in location-table steps (0..7).
    pub extent: u8,
    /// Event code (11 bits).
    pub event: u16,
    /// Location code in the location table.
    pub location: u16,
    /// Number of optional 28-bit payload windows received (0 for a
    /// single-group message).
    pub length: u8,
    /// Additional-information records unpacked from the optional payload.
    pub additional: Vec<TmcAdditional, MAX_TMC_ADDITIONAL>,
}

/// TMC channel parameters announced in type 3A groups, plus the most
/// recently validated user message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Tmc {
    /// Location Table Number.
    pub ltn: u8,
    /// Alternative Frequency Indicator.
    pub afi: bool,
    /// The service transmits in enhanced mode.
    pub enhanced_mode: bool,
    /// Message Geographical Scope.
    pub mgs: u8,
    /// Gap parameter: 8A groups between consecutive TMC transmissions.
    pub gap: u8,
    /// Service Identifier.
    pub sid: u8,
    /// Activity time (enhanced mode only).
    pub t_a: u8,
    /// Window time (enhanced mode only).
    pub t_w: u8,
    /// Delay time (enhanced mode only).
    pub t_d: u8,
    /// Most recently validated user message.
    pub msg: TmcMessage,
}

/// Result of feeding an 8A group to the user-message decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TmcUserEvent {
    /// Group staged, ignored or part of an incomplete multi-group.
    None,
    /// A single-group message was published.
    SingleGroup { changed: bool },
    /// A multi-group message completed and was published.
    MultiGroup { changed: bool },
}

/// Staging state and public parameters of the TMC subsystem.
#[derive(Debug, Default)]
pub(crate) struct TmcDecoder {
    /// Public TMC state.
    pub(crate) tmc: Tmc,
    /// Receive-twice gate for 8A user-message groups.
    prev_user_group: Staged<Group>,
    /// Receive-twice gate for 3A system-information groups.
    prev_sys_group: Staged<Group>,
    /// Multi-group message under assembly.
    pending: TmcMessage,
    /// Optional 28-bit payload windows of the pending message.
    windows: [u32; MAX_TMC_WINDOWS],
    /// Continuity index of the pending multi-group.
    continuity_id: u8,
    /// Sequence id of the most recent continuation group.
    grp_seq_id: u8,
}

impl TmcDecoder {
    /// Decode the TMC system information of a type 3A group announcing AID
    /// 0xCD46/0xCD47. Returns `None` while the group is staged, otherwise
    /// whether the public parameters changed.
    pub(crate) fn decode_system(&mut self, grp: &Group) -> Option<bool> {
        if !self.prev_sys_group.observe(grp) {
            return None;
        }
        // The repeat of an accepted group must not re-trigger.
        self.prev_sys_group.invalidate();

        let before = self.tmc.clone();
        // Bits 14-15 of block C carry the variant code.
        match grp.data_c_msb >> 6 {
            0 => {
                self.tmc.ltn = (grp.data_c_msb & 0x0f) << 2 | grp.data_c_lsb >> 6;
                self.tmc.afi = grp.data_c_lsb & 0x20 != 0;
                self.tmc.enhanced_mode = grp.data_c_lsb & 0x10 != 0;
                self.tmc.mgs = grp.data_c_lsb & 0x0f;
            }
            1 => {
                self.tmc.gap = (grp.data_c_msb & 0x30) >> 4;
                self.tmc.sid = (grp.data_c_msb & 0x0f) << 2 | grp.data_c_lsb >> 6;
                // Timing parameters are only defined in enhanced mode.
                if self.tmc.enhanced_mode {
                    self.tmc.t_a = (grp.data_c_lsb & 0x30) >> 4;
                    self.tmc.t_w = (grp.data_c_lsb & 0x0c) >> 2;
                    self.tmc.t_d = grp.data_c_lsb & 0x03;
                }
            }
            _ => {}
        }
        debug!(
            ltn = self.tmc.ltn,
            sid = self.tmc.sid,
            "TMC system information accepted"
        );
        Some(before != self.tmc)
    }

    /// Decode an 8A user-message group. The group must be received twice in
    /// a row before any branch runs.
    pub(crate) fn decode_user(&mut self, grp: &Group) -> TmcUserEvent {
        if !self.prev_user_group.observe(grp) {
            trace!("TMC group staged, awaiting repetition");
            return TmcUserEvent::None;
        }
        // Broadcasters repeat TMC groups three times by default; poison the
        // staging slot so the extra repetition is not accepted again.
        self.prev_user_group.invalidate();

        let single = grp.data_b_lsb & TMC_SINGLE_GROUP != 0;
        let tuning = grp.data_b_lsb & TMC_TUNING_INFO != 0;
        if tuning {
            // Tuning information (variants 4..9): reception acknowledged,
            // content not decoded.
            trace!(
                variant = grp.data_b_lsb & 0x0f,
                "TMC tuning information ignored"
            );
            return TmcUserEvent::None;
        }
        if single {
            self.decode_single_group(grp)
        } else {
            self.decode_multi_group(grp)
        }
    }

    /// Primary event fields shared by single-group messages and the first
    /// group of a multi-group message.
    fn primary_message(grp: &Group) -> TmcMessage {
        TmcMessage {
            dp: grp.data_b_lsb & 0x07,
            follow_diversion: grp.data_c_msb & 0x80 != 0,
            neg_direction: grp.data_c_msb & 0x40 != 0,
            extent: (grp.data_c_msb & 0x38) >> 3,
            event: u16::from(grp.data_c_msb & 0x07) << 8 | u16::from(grp.data_c_lsb),
            location: u16::from(grp.data_d_msb) << 8 | u16::from(grp.data_d_lsb),
            length: 0,
            additional: Vec::new(),
        }
    }

    fn decode_single_group(&mut self, grp: &Group) -> TmcUserEvent {
        let msg = Self::primary_message(grp);
        debug!(
            event = msg.event,
            location = msg.location,
            extent = msg.extent,
            "TMC single-group message"
        );
        let changed = self.tmc.msg != msg;
        self.tmc.msg = msg;
        TmcUserEvent::SingleGroup { changed }
    }

    fn decode_multi_group(&mut self, grp: &Group) -> TmcUserEvent {
        // Bit 15 of block C: first group indicator. Bit 14: second group
        // indicator. Bits 12-13: group sequence id (all but the first group).
        let first = grp.data_c_msb & 0x80 != 0;
        let second = grp.data_c_msb & 0x40 != 0;
        let continuity = grp.data_b_lsb & 0x07;
        let seq = (grp.data_c_msb & 0x30) >> 4;
        let mut completed = false;

        if first {
            self.continuity_id = continuity;
            self.pending = Self::primary_message(grp);
            trace!(continuity_id = continuity, "TMC multi-group started");
        } else if second && continuity == self.continuity_id {
            self.grp_seq_id = seq;
            self.windows[0] = Self::window(grp);
            self.pending.length = 1;
            completed = seq == 0;
        } else if continuity == self.continuity_id && seq == self.grp_seq_id.wrapping_sub(1) {
            // Sequence ids count strictly down to zero.
            if usize::from(self.pending.length) < MAX_TMC_WINDOWS {
                self.grp_seq_id = seq;
                self.windows[usize::from(self.pending.length)] = Self::window(grp);
                self.pending.length += 1;
                completed = seq == 0;
            }
        }

        if !completed {
            return TmcUserEvent::None;
        }
        let mut msg = self.pending.clone();
        unpack_additional(&self.windows[..usize::from(msg.length)], &mut msg.additional);
        debug!(
            event = msg.event,
            location = msg.location,
            windows = msg.length,
            fields = msg.additional.len(),
            "TMC multi-group message complete"
        );
        let changed = self.tmc.msg != msg;
        self.tmc.msg = msg;
        TmcUserEvent::MultiGroup { changed }
    }

    /// Pack the optional payload of a continuation group: bits 11..0 of
    /// block C followed by all of block D, left-aligned with the low four
    /// bits unused.
    fn window(grp: &Group) -> u32 {
        u32::from(grp.data_c_msb & 0x0f) << 28
            | u32::from(grp.data_c_lsb) << 20
            | u32::from(grp.data_d_msb) << 12
            | u32::from(grp.data_d_lsb) << 4
    }
}

/// Unpack the additional-information records from the payload windows.
///
/// The stream is a sequence of 4-bit labels, each followed by the number of
/// data bits the label dictates; labels and data may straddle window
/// boundaries. Unpacking stops when a read would run past the last populated
/// window.
fn unpack_additional(windows: &[u32], fields: &mut Vec<TmcAdditional, MAX_TMC_ADDITIONAL>) {
    fields.clear();
    let mut cursor = BitCursor::new(windows);
    while let Some(label) = cursor.take(LABEL_LEN) {
        let len = usize::from(ADDITIONAL_LEN[usize::from(label)]);
        let Some(data) = cursor.take(len) else {
            break;
        };
        if label == LABEL_RESERVED {
            continue;
        }
        let record = TmcAdditional {
            label: label as u8,
            data,
        };
        if fields.push(record).is_err() {
            break;
        }
    }
}

#[cfg(test)]
#[path = "tmc_tests.rs"]
mod tests;
