//! The RDS decoder: block reassembly, group dispatch and field extraction.
//!
//! [`RdsDecoder`] is a plain state machine fed one [`RawBlock`] at a time.
//! Four consecutive error-free blocks labelled A, B, C (or C′), D form a
//! group; a complete group is dispatched to the decoder for its group type.
//! Newly received field values are held in staging buffers until they pass
//! their validation rule (most fields must be received twice in a row), and
//! only then copied to the public state. Every call to [`RdsDecoder::add`]
//! returns the set of public fields that call changed.

use std::borrow::Cow;

use bitflags::bitflags;
use serde::Serialize;
use tracing::{debug, trace};

use crate::block::{BlockLabel, RawBlock};
use crate::group::{Group, GroupVersion, RdsStatistics};
use crate::staged::Staged;
use crate::tables;
use crate::tmc::{Tmc, TmcDecoder, TmcUserEvent};

/// Capacity of the alternative-frequency list.
pub const MAX_AF: usize = 25;
/// Capacity of the ODA announcement table.
pub const MAX_ODA: usize = 18;

bitflags! {
    /// Decoded RDS fields, used both for the update mask returned by
    /// [`RdsDecoder::add`] and for [`RdsDecoder::valid_fields`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct UpdateFlags: u32 {
        /// Program Identification.
        const PI = 1 << 0;
        /// Program Type.
        const PTY = 1 << 1;
        /// Traffic Program flag.
        const TP = 1 << 2;
        /// Program Service name.
        const PS = 1 << 3;
        /// Traffic Announcement flag.
        const TA = 1 << 4;
        /// Decoder Identification.
        const DI = 1 << 5;
        /// Music/Speech flag.
        const MS = 1 << 6;
        /// Program Type Name.
        const PTYN = 1 << 7;
        /// Radio Text.
        const RT = 1 << 8;
        /// Clock time and date.
        const TIME = 1 << 9;
        /// TMC availability (decode information).
        const TMC = 1 << 10;
        /// Alternative Frequencies.
        const AF = 1 << 11;
        /// Extended Country Code.
        const ECC = 1 << 12;
        /// Language Code.
        const LC = 1 << 13;
        /// TMC single-group message.
        const TMC_SG = 1 << 14;
        /// TMC multi-group message.
        const TMC_MG = 1 << 15;
        /// TMC system information.
        const TMC_SYS = 1 << 16;
        /// Open Data Application announcement.
        const ODA = 1 << 17;
    }
}

bitflags! {
    /// Decoder Identification bits, assembled from four type 0 groups.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DiFlags: u8 {
        /// Stereo broadcast.
        const STEREO = 0x01;
        /// Artificial-head recording.
        const ARTIFICIAL_HEAD = 0x02;
        /// Compressed transmission.
        const COMPRESSED = 0x04;
        /// PTY is dynamically switched.
        const STATIC_PTY = 0x08;
    }
}

/// One Open Data Application announced in a type 3A group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Oda {
    /// Group type the application data is carried in.
    pub group_id: u8,
    /// Version of the carrying group.
    pub version: GroupVersion,
    /// Application Identification code.
    pub aid: u16,
}

/// The alternative-frequency list of the tuned program.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AfSet {
    /// Number of frequencies the broadcaster announced.
    pub announced_af: u8,
    frequencies: heapless::Vec<u32, MAX_AF>,
}

impl AfSet {
    /// The frequencies collected so far, in Hz.
    pub fn frequencies(&self) -> &[u32] {
        &self.frequencies
    }

    /// Translate an AF code and insert the frequency, rejecting code 0
    /// ("not to be used"), duplicates, and anything beyond the announced
    /// count. VHF codes map to 87.5 MHz + n·100 kHz; LF/MF codes 1..15 map
    /// to 153 kHz + (n−1)·9 kHz and codes from 16 on to 531 kHz + (n−16)·9
    /// kHz (IEC 62106 section 6.2.1.6).
    fn insert(&mut self, af: u8, vhf: bool) -> bool {
        if af == 0 {
            return false;
        }
        let freq = if vhf {
            87_500_000 + u32::from(af) * 100_000
        } else if af <= 15 {
            153_000 + u32::from(af - 1) * 9_000
        } else {
            531_000 + u32::from(af - 16) * 9_000
        };
        if self.frequencies.len() >= usize::from(self.announced_af) {
            return false;
        }
        if self.frequencies.contains(&freq) {
            return false;
        }
        self.frequencies.push(freq).is_ok()
    }
}

/// A civil timestamp decoded from a type 4A clock-time group.
///
/// The broadcast UTC time has the local offset already applied; `offset`
/// records that offset in seconds east of UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RdsTime {
    pub year: i32,
    /// 1..12.
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// Local offset in seconds east of UTC.
    pub offset: i32,
}

impl RdsTime {
    /// Convert a Modified Julian Day plus UTC time and offset code into
    /// civil local time. The offset (half-hour units, bit 5 is the sign) is
    /// applied before the calendar conversion so that a carry moves the
    /// date as well; the MJD split itself follows IEC 62106 annex G.
    fn from_mjd(mjd: u32, utc_hour: u8, utc_minute: u8, utc_offset: u8) -> Self {
        let halves = i32::from(utc_offset & 0x1f);
        let offset_minutes = if utc_offset & 0x20 != 0 {
            -30 * halves
        } else {
            30 * halves
        };
        let total = i32::from(utc_hour) * 60 + i32::from(utc_minute) + offset_minutes;
        let local_mjd = i64::from(mjd) + i64::from(total.div_euclid(24 * 60));
        let minutes = total.rem_euclid(24 * 60);

        let days = local_mjd as f64;
        let y = ((days - 15078.2) / 365.25).floor() as i32;
        let year_days = (f64::from(y) * 365.25).floor();
        let m = ((days - 14956.1 - year_days) / 30.6001).floor() as i32;
        let month_days = (f64::from(m) * 30.6001).floor();
        let d = (days - 14956.0 - year_days - month_days) as i32;
        let k = i32::from(m == 14 || m == 15);

        RdsTime {
            year: 1900 + y + k,
            month: (m - 1 - 12 * k) as u8,
            day: d as u8,
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
            offset: offset_minutes * 60,
        }
    }
}

/// Assembler state: which blocks of the current group have arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DecodeState {
    #[default]
    Empty,
    AReceived,
    BReceived,
    CReceived,
}

/// Stateful RDS/RBDS decoder.
///
/// Feed blocks with [`add`](Self::add) and read the decoded fields through
/// the accessors; [`valid_fields`](Self::valid_fields) reports which fields
/// have passed validation. The decoder never fails on corrupt input, it
/// counts it in [`statistics`](Self::statistics) and keeps going.
pub struct RdsDecoder {
    // Public decoded state.
    is_rbds: bool,
    pi: u16,
    pty: u8,
    tp: bool,
    ta: bool,
    ms: bool,
    di: DiFlags,
    ecc: u8,
    lc: u8,
    rt_ab_flag: bool,
    ptyn_ab_flag: bool,
    ps: [u8; 8],
    rt: [u8; 64],
    rt_length: u8,
    ptyn: [u8; 8],
    af: AfSet,
    oda: heapless::Vec<Oda, MAX_ODA>,
    time: RdsTime,
    tmc: TmcDecoder,
    statistics: RdsStatistics,
    valid_fields: UpdateFlags,
    decode_information: UpdateFlags,

    // Staging state.
    state: DecodeState,
    raw: [u16; 4],
    group: Group,
    new_pi: Staged<u16>,
    new_pty: Staged<u8>,
    new_ecc: Staged<u8>,
    new_lc: Staged<u8>,
    new_mjd: Staged<u32>,
    new_ps: [u8; 8],
    new_ps_valid: [bool; 8],
    new_ptyn: [[u8; 4]; 2],
    new_ptyn_valid: [bool; 2],
    new_rt: [u8; 64],
    next_rt_segment: u8,
    new_di: DiFlags,
    next_di_segment: u8,
}

impl RdsDecoder {
    /// Create an empty decoder. `is_rbds` selects the North American PTY
    /// table for [`pty_name`](Self::pty_name).
    pub fn new(is_rbds: bool) -> Self {
        Self {
            is_rbds,
            pi: 0,
            pty: 0,
            tp: false,
            ta: false,
            ms: false,
            di: DiFlags::empty(),
            ecc: 0,
            lc: 0,
            rt_ab_flag: false,
            ptyn_ab_flag: false,
            ps: [0; 8],
            rt: [0; 64],
            rt_length: 0,
            ptyn: [0; 8],
            af: AfSet::default(),
            oda: heapless::Vec::new(),
            time: RdsTime::default(),
            tmc: TmcDecoder::default(),
            statistics: RdsStatistics::default(),
            valid_fields: UpdateFlags::empty(),
            decode_information: UpdateFlags::empty(),
            state: DecodeState::Empty,
            raw: [0; 4],
            group: Group::default(),
            new_pi: Staged::new(),
            new_pty: Staged::new(),
            new_ecc: Staged::new(),
            new_lc: Staged::new(),
            new_mjd: Staged::new(),
            new_ps: [0; 8],
            new_ps_valid: [false; 8],
            new_ptyn: [[0; 4]; 2],
            new_ptyn_valid: [false; 2],
            new_rt: [0; 64],
            next_rt_segment: 0,
            new_di: DiFlags::empty(),
            next_di_segment: 0,
        }
    }

    /// Clear all decoded and staging state. The RDS/RBDS selection always
    /// survives; the statistics survive when `preserve_statistics` is set.
    pub fn reset(&mut self, preserve_statistics: bool) {
        let statistics = std::mem::take(&mut self.statistics);
        *self = Self::new(self.is_rbds);
        if preserve_statistics {
            self.statistics = statistics;
        }
    }

    /// Feed one received block.
    ///
    /// Returns the set of public fields whose value changed through this
    /// call. Blocks marked uncorrectable and blocks whose label does not fit
    /// the assembler state are counted and discarded; decoding happens only
    /// when a complete group has been assembled.
    pub fn add(&mut self, block: RawBlock) -> UpdateFlags {
        self.statistics.block_cnt += 1;
        let label = if block.error {
            self.statistics.block_error_cnt += 1;
            None
        } else {
            if block.corrected {
                self.statistics.block_corrected_cnt += 1;
            }
            Some(block.label)
        };

        match (self.state, label) {
            (DecodeState::Empty, Some(BlockLabel::A)) => {
                self.raw = [block.data, 0, 0, 0];
                self.state = DecodeState::AReceived;
            }
            (DecodeState::Empty, _) => {
                self.statistics.group_error_cnt += 1;
            }
            (DecodeState::AReceived, Some(BlockLabel::B)) => {
                self.raw[1] = block.data;
                self.state = DecodeState::BReceived;
            }
            (DecodeState::BReceived, Some(BlockLabel::C | BlockLabel::CPrime)) => {
                self.raw[2] = block.data;
                self.state = DecodeState::CReceived;
            }
            (DecodeState::CReceived, Some(BlockLabel::D)) => {
                self.raw[3] = block.data;
                self.state = DecodeState::Empty;
                self.statistics.group_cnt += 1;
                return self.decode_group();
            }
            _ => {
                trace!(state = ?self.state, "unexpected block, group discarded");
                self.statistics.group_error_cnt += 1;
                self.state = DecodeState::Empty;
            }
        }
        UpdateFlags::empty()
    }

    /// Decode a freshly assembled group: common fields from blocks A and B,
    /// then the group-type specific decoder.
    fn decode_group(&mut self) -> UpdateFlags {
        self.group = Group::default();
        let mut updated = self.decode_block_a();
        updated |= self.decode_block_b();
        self.group.data_c_msb = (self.raw[2] >> 8) as u8;
        self.group.data_c_lsb = (self.raw[2] & 0xff) as u8;
        self.group.data_d_msb = (self.raw[3] >> 8) as u8;
        self.group.data_d_lsb = (self.raw[3] & 0xff) as u8;

        self.statistics.group_type_cnt[usize::from(self.group.group_id)] += 1;
        updated
            | match self.group.group_id {
                0 => self.decode_group0(),
                1 => self.decode_group1(),
                2 => self.decode_group2(),
                3 => self.decode_group3(),
                4 => self.decode_group4(),
                8 => self.decode_group8(),
                10 => self.decode_group10(),
                id => {
                    trace!(group_id = id, "no decoder for this group type");
                    UpdateFlags::empty()
                }
            }
    }

    /// Block A carries the PI code. A PI that differs from the accepted one
    /// is a channel switch only if it arrives twice in a row; a lone
    /// deviating PI is corruption and stays staged.
    fn decode_block_a(&mut self) -> UpdateFlags {
        let pi = self.raw[0];
        self.group.pi = pi;
        if pi != self.pi && self.new_pi.observe(&pi) {
            self.pi = pi;
            self.valid_fields |= UpdateFlags::PI;
            debug!(pi = format_args!("{pi:#06x}"), "PI accepted");
            return UpdateFlags::PI;
        }
        UpdateFlags::empty()
    }

    /// Block B carries the group type, version, TP, PTY and five bits of
    /// group-type specific payload. TP is a single bit and accepted at once;
    /// PTY follows the receive-twice rule.
    fn decode_block_b(&mut self) -> UpdateFlags {
        let msb = (self.raw[1] >> 8) as u8;
        let lsb = (self.raw[1] & 0xff) as u8;
        let mut updated = UpdateFlags::empty();

        self.group.group_id = msb >> 4;
        self.group.version = if msb & 0x08 != 0 {
            GroupVersion::B
        } else {
            GroupVersion::A
        };
        self.group.data_b_lsb = lsb & 0x1f;

        let tp = msb & 0x04 != 0;
        if self.tp != tp {
            self.tp = tp;
            updated |= UpdateFlags::TP;
        }
        self.valid_fields |= UpdateFlags::TP;

        let pty = (msb << 3 | lsb >> 5) & 0x1f;
        if self.pty == pty {
            // Already known; keep the candidate fresh.
            self.new_pty.stage(pty);
            return updated;
        }
        if self.new_pty.observe(&pty) {
            self.pty = pty;
            self.valid_fields |= UpdateFlags::PTY;
            updated |= UpdateFlags::PTY;
        }
        updated
    }

    /// Type 0: PS name, TA/MS flags, DI bits and (version A) the AF list.
    fn decode_group0(&mut self) -> UpdateFlags {
        let grp = self.group;
        let mut updated = UpdateFlags::empty();

        let ta = grp.data_b_lsb & 0x10 != 0;
        if self.ta != ta {
            self.ta = ta;
            updated |= UpdateFlags::TA;
        }
        self.valid_fields |= UpdateFlags::TA;

        let ms = grp.data_b_lsb & 0x08 != 0;
        if self.ms != ms {
            self.ms = ms;
            updated |= UpdateFlags::MS;
        }
        self.valid_fields |= UpdateFlags::MS;

        let segment = grp.data_b_lsb & 0x03;

        // Two PS characters per group; each position is validated by a
        // repeated reception, and a single disagreement restages the whole
        // name. PS drift must never be adopted half-way.
        self.add_ps(usize::from(segment) * 2, grp.data_d_msb);
        if self.add_ps(usize::from(segment) * 2 + 1, grp.data_d_lsb) {
            if self.ps != self.new_ps {
                self.ps = self.new_ps;
                updated |= UpdateFlags::PS;
                debug!(ps = %String::from_utf8_lossy(&self.ps), "PS published");
            }
            self.valid_fields |= UpdateFlags::PS;
        }

        // One DI bit per group, its position given by the segment number.
        // Bits are only trusted when the segments arrive in order.
        let di_bit = grp.data_b_lsb & 0x04 != 0;
        if segment == 0 || segment == self.next_di_segment {
            match segment {
                0 => {
                    self.new_di.set(DiFlags::STEREO, di_bit);
                    self.next_di_segment = 1;
                }
                1 => {
                    self.new_di.set(DiFlags::ARTIFICIAL_HEAD, di_bit);
                    self.next_di_segment = 2;
                }
                2 => {
                    self.new_di.set(DiFlags::COMPRESSED, di_bit);
                    self.next_di_segment = 3;
                }
                _ => {
                    self.new_di.set(DiFlags::STATIC_PTY, di_bit);
                    if self.di != self.new_di {
                        self.di = self.new_di;
                        updated |= UpdateFlags::DI;
                    }
                    self.next_di_segment = 0;
                    self.valid_fields |= UpdateFlags::DI;
                }
            }
        } else {
            self.next_di_segment = 0;
            self.new_di = DiFlags::empty();
        }

        if grp.version == GroupVersion::A && self.add_af() {
            updated |= UpdateFlags::AF;
        }
        updated
    }

    /// Stage one PS character. Returns `true` once all eight positions have
    /// been validated by a repeated reception.
    fn add_ps(&mut self, pos: usize, ps_char: u8) -> bool {
        if self.new_ps[pos] == ps_char {
            self.new_ps_valid[pos] = true;
        } else {
            self.new_ps[pos] = ps_char;
            self.new_ps_valid = [false; 8];
        }
        self.new_ps_valid.iter().all(|&valid| valid)
    }

    /// AF codes from block C of type 0A groups (IEC 62106 section 6.2.1.6).
    fn add_af(&mut self) -> bool {
        let c_msb = self.group.data_c_msb;
        let mut c_lsb = self.group.data_c_lsb;
        let mut updated = false;

        // 250: the second byte is an LF/MF frequency.
        if c_msb == 250 {
            updated |= self.af.insert(c_lsb, false);
            c_lsb = 0;
        }
        // 224..249 announce the size of the AF list (224 = none).
        if (224..=249).contains(&c_msb) {
            self.af.announced_af = c_msb - 224;
        }
        // 1..204 are VHF carrier frequencies.
        if c_msb < 205 {
            updated |= self.af.insert(c_msb, true);
        }
        if c_lsb < 205 {
            updated |= self.af.insert(c_lsb, true);
        }
        if self.af.announced_af != 0 && self.af.frequencies.len() >= usize::from(self.af.announced_af)
        {
            self.valid_fields |= UpdateFlags::AF;
        }
        updated
    }

    /// Type 1 (version A): slow labeling codes. Variant 0 carries the ECC,
    /// variant 3 the language code; both follow the receive-twice rule.
    fn decode_group1(&mut self) -> UpdateFlags {
        let grp = self.group;
        if grp.version != GroupVersion::A {
            return UpdateFlags::empty();
        }
        let mut updated = UpdateFlags::empty();
        match (grp.data_c_msb >> 4) & 0x07 {
            0 => {
                if self.new_ecc.observe(&grp.data_c_lsb) {
                    self.valid_fields |= UpdateFlags::ECC;
                    if self.ecc != grp.data_c_lsb {
                        self.ecc = grp.data_c_lsb;
                        updated |= UpdateFlags::ECC;
                    }
                }
            }
            3 => {
                if self.new_lc.observe(&grp.data_c_lsb) {
                    self.valid_fields |= UpdateFlags::LC;
                    if self.lc != grp.data_c_lsb {
                        self.lc = grp.data_c_lsb;
                        updated |= UpdateFlags::LC;
                    }
                }
            }
            _ => {}
        }
        updated
    }

    /// Type 2: radio text, 64 characters in version A (4 per segment from
    /// blocks C and D), 32 in version B (2 per segment from block D).
    fn decode_group2(&mut self) -> UpdateFlags {
        let grp = self.group;
        let mut updated = UpdateFlags::empty();

        let segment = grp.data_b_lsb & 0x0f;
        let ab_flag = grp.data_b_lsb & 0x10 != 0;

        // A flipped A/B flag announces a new text; everything received so
        // far belongs to the previous one.
        if ab_flag != self.rt_ab_flag {
            debug!("radio text A/B flag toggled, text cleared");
            self.rt_ab_flag = ab_flag;
            self.rt = [0; 64];
            self.rt_length = 0;
            self.new_rt = [0; 64];
            self.next_rt_segment = 0;
            self.valid_fields.remove(UpdateFlags::RT);
            updated |= UpdateFlags::RT;
        }

        // Segments are only accepted in order; segment 0 restarts.
        if segment == 0 || segment == self.next_rt_segment {
            if grp.version == GroupVersion::A {
                let pos = usize::from(segment) * 4;
                self.new_rt[pos] = grp.data_c_msb;
                self.new_rt[pos + 1] = grp.data_c_lsb;
                self.new_rt[pos + 2] = grp.data_d_msb;
                self.new_rt[pos + 3] = grp.data_d_lsb;
            } else {
                // Block C repeats the PI code and is ignored.
                let pos = usize::from(segment) * 2;
                self.new_rt[pos] = grp.data_d_msb;
                self.new_rt[pos + 1] = grp.data_d_lsb;
            }
            self.next_rt_segment = segment + 1;
            if segment == 0x0f {
                let length = if grp.version == GroupVersion::A { 64 } else { 32 };
                if self.publish_rt(length) {
                    updated |= UpdateFlags::RT;
                }
            }
        }

        // A carriage return ends the text early; the first one wins.
        if let Some(pos) = self.new_rt.iter().position(|&ch| ch == 0x0d) {
            self.new_rt[pos] = 0;
            if self.publish_rt(pos) {
                updated |= UpdateFlags::RT;
            }
        }
        updated
    }

    /// Publish the staged radio text with the given length. Returns whether
    /// the public text changed.
    fn publish_rt(&mut self, length: usize) -> bool {
        self.valid_fields |= UpdateFlags::RT;
        self.next_rt_segment = 0;
        let changed = usize::from(self.rt_length) != length
            || self.rt[..length] != self.new_rt[..length];
        if changed {
            self.rt_length = length as u8;
            self.rt[..length].copy_from_slice(&self.new_rt[..length]);
            debug!(
                rt = %String::from_utf8_lossy(&self.rt[..length]),
                "radio text published"
            );
        }
        changed
    }

    /// Type 3 (version A): Open Data Application announcements. AIDs 0xCD46
    /// and 0xCD47 announce TMC and feed the TMC system decoder.
    fn decode_group3(&mut self) -> UpdateFlags {
        let grp = self.group;
        if grp.version != GroupVersion::A {
            return UpdateFlags::empty();
        }
        let mut updated = UpdateFlags::empty();

        let oda = Oda {
            group_id: (grp.data_b_lsb & 0x1e) >> 1,
            version: if grp.data_b_lsb & 0x01 != 0 {
                GroupVersion::B
            } else {
                GroupVersion::A
            },
            aid: u16::from(grp.data_d_msb) << 8 | u16::from(grp.data_d_lsb),
        };

        match self
            .oda
            .iter_mut()
            .find(|known| known.group_id == oda.group_id && known.version == oda.version)
        {
            Some(known) => {
                if known.aid != oda.aid {
                    known.aid = oda.aid;
                    updated |= UpdateFlags::ODA;
                    self.decode_information |= UpdateFlags::ODA;
                }
            }
            None => {
                if self.oda.push(oda).is_ok() {
                    debug!(
                        group_id = oda.group_id,
                        aid = format_args!("{:#06x}", oda.aid),
                        "ODA announced"
                    );
                    updated |= UpdateFlags::ODA;
                    self.decode_information |= UpdateFlags::ODA;
                }
            }
        }

        if oda.aid == 0xcd46 || oda.aid == 0xcd47 {
            self.decode_information |= UpdateFlags::TMC;
            if let Some(changed) = self.tmc.decode_system(&grp) {
                self.valid_fields |= UpdateFlags::TMC_SYS;
                if changed {
                    updated |= UpdateFlags::TMC_SYS;
                }
            }
        }
        updated
    }

    /// Type 4 (version A): clock time. The MJD must be received twice; only
    /// then are time and offset extracted and converted.
    fn decode_group4(&mut self) -> UpdateFlags {
        let grp = self.group;
        if grp.version != GroupVersion::A {
            return UpdateFlags::empty();
        }
        let mjd = u32::from(grp.data_b_lsb & 0x03) << 15
            | u32::from(grp.data_c_msb) << 7
            | u32::from(grp.data_c_lsb >> 1);
        if !self.new_mjd.observe(&mjd) {
            return UpdateFlags::empty();
        }

        let utc_hour = (grp.data_c_lsb & 0x01) << 4 | grp.data_d_msb >> 4;
        let utc_minute = (grp.data_d_msb & 0x0f) << 2 | grp.data_d_lsb >> 6;
        let utc_offset = grp.data_d_lsb & 0x3f;
        let time = RdsTime::from_mjd(mjd, utc_hour, utc_minute, utc_offset);

        self.valid_fields |= UpdateFlags::TIME;
        if self.time != time {
            debug!(?time, "clock time published");
            self.time = time;
            return UpdateFlags::TIME;
        }
        UpdateFlags::empty()
    }

    /// Type 8 (version A): TMC user messages.
    fn decode_group8(&mut self) -> UpdateFlags {
        let grp = self.group;
        if grp.version != GroupVersion::A {
            return UpdateFlags::empty();
        }
        match self.tmc.decode_user(&grp) {
            TmcUserEvent::None => UpdateFlags::empty(),
            TmcUserEvent::SingleGroup { changed } => {
                let newly_valid = !self.valid_fields.contains(UpdateFlags::TMC_SG);
                self.valid_fields |= UpdateFlags::TMC_SG;
                self.valid_fields.remove(UpdateFlags::TMC_MG);
                if changed || newly_valid {
                    UpdateFlags::TMC_SG
                } else {
                    UpdateFlags::empty()
                }
            }
            TmcUserEvent::MultiGroup { changed } => {
                let newly_valid = !self.valid_fields.contains(UpdateFlags::TMC_MG);
                self.valid_fields |= UpdateFlags::TMC_MG;
                self.valid_fields.remove(UpdateFlags::TMC_SG);
                if changed || newly_valid {
                    UpdateFlags::TMC_MG
                } else {
                    UpdateFlags::empty()
                }
            }
        }
    }

    /// Type 10 (version A): program type name, two segments of four
    /// characters, each validated by a repeated reception.
    fn decode_group10(&mut self) -> UpdateFlags {
        let grp = self.group;
        if grp.version != GroupVersion::A {
            return UpdateFlags::empty();
        }
        let mut updated = UpdateFlags::empty();

        let segment = usize::from(grp.data_b_lsb & 0x01);
        let ab_flag = grp.data_b_lsb & 0x10 != 0;

        if ab_flag != self.ptyn_ab_flag {
            debug!("PTYN A/B flag toggled, name cleared");
            self.ptyn_ab_flag = ab_flag;
            self.ptyn = [0; 8];
            self.new_ptyn = [[0; 4]; 2];
            self.new_ptyn_valid = [false; 2];
            self.valid_fields.remove(UpdateFlags::PTYN);
            updated |= UpdateFlags::PTYN;
        }

        let chars = [
            grp.data_c_msb,
            grp.data_c_lsb,
            grp.data_d_msb,
            grp.data_d_lsb,
        ];
        if self.new_ptyn[segment] == chars {
            self.new_ptyn_valid[segment] = true;
        } else {
            self.new_ptyn[segment] = chars;
            self.new_ptyn_valid[segment] = false;
        }

        if self.new_ptyn_valid[0] && self.new_ptyn_valid[1] {
            let mut ptyn = [0u8; 8];
            ptyn[..4].copy_from_slice(&self.new_ptyn[0]);
            ptyn[4..].copy_from_slice(&self.new_ptyn[1]);
            self.valid_fields |= UpdateFlags::PTYN;
            if self.ptyn != ptyn {
                self.ptyn = ptyn;
                updated |= UpdateFlags::PTYN;
                debug!(ptyn = %String::from_utf8_lossy(&self.ptyn), "PTYN published");
            }
        }
        updated
    }

    // Accessors.

    /// The decoder was created for the RBDS (North American) variant.
    pub fn is_rbds(&self) -> bool {
        self.is_rbds
    }

    /// The most recently completed group, valid until the next call to
    /// [`add`](Self::add) completes another one.
    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Program Identification code.
    pub fn pi(&self) -> u16 {
        self.pi
    }

    /// Program Type code (0..31).
    pub fn pty(&self) -> u8 {
        self.pty
    }

    /// Traffic Program flag.
    pub fn tp(&self) -> bool {
        self.tp
    }

    /// Traffic Announcement flag.
    pub fn ta(&self) -> bool {
        self.ta
    }

    /// Music (`true`) / speech flag.
    pub fn ms(&self) -> bool {
        self.ms
    }

    /// Decoder Identification bits.
    pub fn di(&self) -> DiFlags {
        self.di
    }

    /// Extended Country Code.
    pub fn ecc(&self) -> u8 {
        self.ecc
    }

    /// Language code.
    pub fn lc(&self) -> u8 {
        self.lc
    }

    /// Program Service name, raw bytes.
    pub fn ps(&self) -> &[u8; 8] {
        &self.ps
    }

    /// Program Service name as text.
    pub fn ps_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.ps)
    }

    /// Radio text, raw bytes of the current length.
    pub fn rt(&self) -> &[u8] {
        &self.rt[..usize::from(self.rt_length)]
    }

    /// Radio text as text.
    pub fn rt_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.rt())
    }

    /// Program Type Name, raw bytes.
    pub fn ptyn(&self) -> &[u8; 8] {
        &self.ptyn
    }

    /// Program Type Name as text.
    pub fn ptyn_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.ptyn)
    }

    /// Alternative-frequency list.
    pub fn af(&self) -> &AfSet {
        &self.af
    }

    /// Announced Open Data Applications.
    pub fn oda(&self) -> &[Oda] {
        &self.oda
    }

    /// Most recently decoded clock time.
    pub fn time(&self) -> &RdsTime {
        &self.time
    }

    /// TMC channel parameters and the last validated user message.
    pub fn tmc(&self) -> &Tmc {
        &self.tmc.tmc
    }

    /// Reception statistics.
    pub fn statistics(&self) -> &RdsStatistics {
        &self.statistics
    }

    /// Fields that have passed validation since the last reset.
    pub fn valid_fields(&self) -> UpdateFlags {
        self.valid_fields
    }

    /// Decoder-level capabilities observed on the channel (ODA, TMC).
    pub fn decode_information(&self) -> UpdateFlags {
        self.decode_information
    }

    /// Localized PTY name from the RDS or RBDS table.
    pub fn pty_name(&self) -> Option<&'static str> {
        tables::pty_name(self.pty, self.is_rbds)
    }

    /// Two-letter country code derived from the ECC and the PI top nibble.
    pub fn country_code(&self) -> &'static str {
        tables::country_code(self.ecc, self.pi)
    }

    /// Language name from the language code.
    pub fn language_name(&self) -> &'static str {
        tables::language_name(self.lc)
    }

    /// Coverage-area name from PI bits 8..11.
    pub fn coverage_name(&self) -> &'static str {
        tables::coverage_name(self.pi)
    }
}

impl Default for RdsDecoder {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
#[path = "decoder_tests.rs"]
mod tests;
