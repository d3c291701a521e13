// Unit tests for the TMC subsystem.
// Included via #[cfg(test)] mod in tmc.rs.

use super::*;
use crate::group::GroupVersion;

fn user_group(data_b_lsb: u8, c: u16, d: u16) -> Group {
    Group {
        pi: 0x1234,
        group_id: 8,
        version: GroupVersion::A,
        data_b_lsb,
        data_c_msb: (c >> 8) as u8,
        data_c_lsb: (c & 0xff) as u8,
        data_d_msb: (d >> 8) as u8,
        data_d_lsb: (d & 0xff) as u8,
    }
}

fn sys_group(c: u16, d: u16) -> Group {
    Group {
        group_id: 3,
        ..user_group(0, c, d)
    }
}

/// Feed a group twice; the first reception only stages it.
fn accept_user(decoder: &mut TmcDecoder, grp: &Group) -> TmcUserEvent {
    assert_eq!(
        decoder.decode_user(grp),
        TmcUserEvent::None,
        "first reception must only stage the group"
    );
    decoder.decode_user(grp)
}

#[test]
fn test_single_group_message() {
    let mut decoder = TmcDecoder::default();
    // Single-group flag, dp=3; extent=2, event=0x120; location=0xABCD.
    let grp = user_group(0x13, 0x1120, 0xABCD);

    let event = accept_user(&mut decoder, &grp);
    assert_eq!(event, TmcUserEvent::SingleGroup { changed: true });
    assert_eq!(decoder.tmc.msg.dp, 3);
    assert_eq!(decoder.tmc.msg.extent, 2);
    assert_eq!(decoder.tmc.msg.event, 0x120);
    assert_eq!(decoder.tmc.msg.location, 0xABCD);
    assert_eq!(decoder.tmc.msg.length, 0);
    assert!(decoder.tmc.msg.additional.is_empty());
}

#[test]
fn test_accepted_group_does_not_retrigger() {
    let mut decoder = TmcDecoder::default();
    let grp = user_group(0x13, 0x1120, 0xABCD);

    accept_user(&mut decoder, &grp);
    // The standard repetition count for TMC groups is three: the third copy
    // must land in an empty staging slot and not publish again.
    assert_eq!(decoder.decode_user(&grp), TmcUserEvent::None);
    // A fourth copy confirms the restaged third.
    assert_eq!(
        decoder.decode_user(&grp),
        TmcUserEvent::SingleGroup { changed: false }
    );
}

#[test]
fn test_multi_group_with_one_continuation() {
    let mut decoder = TmcDecoder::default();
    // First group: continuity 5, extent 2, event 0x123, location 0x4567.
    let first = user_group(0x05, 0x9123, 0x4567);
    // Second group, sequence 0: payload 0x5AB ++ 0xFFFF decodes as one
    // label-5 record (data 0xAB) followed by reserved labels.
    let second = user_group(0x05, 0x45AB, 0xFFFF);

    assert_eq!(accept_user(&mut decoder, &first), TmcUserEvent::None);
    let event = accept_user(&mut decoder, &second);
    assert_eq!(event, TmcUserEvent::MultiGroup { changed: true });

    let msg = &decoder.tmc.msg;
    assert!(msg.follow_diversion, "bit 15 doubles as the first-group flag");
    assert!(!msg.neg_direction);
    assert_eq!(msg.extent, 2);
    assert_eq!(msg.event, 0x123);
    assert_eq!(msg.location, 0x4567);
    assert_eq!(msg.length, 1);
    assert_eq!(msg.additional.len(), 1);
    assert_eq!(msg.additional[0], TmcAdditional { label: 5, data: 0xAB });
}

#[test]
fn test_multi_group_field_straddles_windows() {
    let mut decoder = TmcDecoder::default();
    let first = user_group(0x03, 0x88AB, 0x1234);
    // Sequence 1: window 0 = 0xABEEF9B (label 10, data 0xBEEF, label 9 and
    // the first 4 bits of its data).
    let second = user_group(0x03, 0x5ABE, 0xEF9B);
    // Sequence 0: window 1 = 0x4A00000 (the remaining 7 data bits, then
    // zero padding).
    let third = user_group(0x03, 0x04A0, 0x0000);

    assert_eq!(accept_user(&mut decoder, &first), TmcUserEvent::None);
    assert_eq!(accept_user(&mut decoder, &second), TmcUserEvent::None);
    let event = accept_user(&mut decoder, &third);
    assert_eq!(event, TmcUserEvent::MultiGroup { changed: true });

    let msg = &decoder.tmc.msg;
    assert_eq!(msg.event, 0x0AB);
    assert_eq!(msg.extent, 1);
    assert_eq!(msg.location, 0x1234);
    assert_eq!(msg.length, 2);
    let fields: std::vec::Vec<_> = msg.additional.iter().copied().collect();
    assert_eq!(
        fields,
        vec![
            TmcAdditional {
                label: 10,
                data: 0xBEEF
            },
            TmcAdditional {
                label: 9,
                data: 0x5A5
            },
            TmcAdditional { label: 0, data: 0 },
            TmcAdditional { label: 0, data: 0 },
            TmcAdditional { label: 0, data: 0 },
        ]
    );
}

#[test]
fn test_multi_group_continuity_mismatch_ignored() {
    let mut decoder = TmcDecoder::default();
    let first = user_group(0x05, 0x9123, 0x4567);
    // Continuity 6 does not match the pending message (5).
    let second = user_group(0x06, 0x45AB, 0xFFFF);

    accept_user(&mut decoder, &first);
    assert_eq!(accept_user(&mut decoder, &second), TmcUserEvent::None);
    assert_eq!(decoder.tmc.msg, TmcMessage::default());
}

#[test]
fn test_multi_group_sequence_gap_ignored() {
    let mut decoder = TmcDecoder::default();
    let first = user_group(0x05, 0x9123, 0x4567);
    // Second group with sequence id 2.
    let second = user_group(0x05, 0x65AB, 0xFFFF);
    // Continuation with sequence id 0 -- expected was 1.
    let skipped = user_group(0x05, 0x05AB, 0xFFFF);

    accept_user(&mut decoder, &first);
    accept_user(&mut decoder, &second);
    assert_eq!(accept_user(&mut decoder, &skipped), TmcUserEvent::None);
    assert_eq!(decoder.tmc.msg, TmcMessage::default());
}

#[test]
fn test_tuning_information_is_acknowledged_not_decoded() {
    let mut decoder = TmcDecoder::default();
    // Tuning-info flag with variant 4.
    let grp = user_group(TMC_TUNING_INFO | 0x04, 0x1234, 0x5678);
    assert_eq!(accept_user(&mut decoder, &grp), TmcUserEvent::None);
    assert_eq!(decoder.tmc.msg, TmcMessage::default());
}

#[test]
fn test_system_variant_0() {
    let mut decoder = TmcDecoder::default();
    // Variant 0: ltn=0x21, afi, enhanced mode, mgs=5.
    let grp = sys_group(0x0875, 0xCD46);

    assert_eq!(decoder.decode_system(&grp), None, "first reception stages");
    assert_eq!(decoder.decode_system(&grp), Some(true));
    assert_eq!(decoder.tmc.ltn, 0x21);
    assert!(decoder.tmc.afi);
    assert!(decoder.tmc.enhanced_mode);
    assert_eq!(decoder.tmc.mgs, 5);
}

#[test]
fn test_system_variant_1_timing_needs_enhanced_mode() {
    let mut decoder = TmcDecoder::default();
    // Variant 1: gap=2, sid=0x15, t_a=3, t_w=2, t_d=1.
    let variant1 = sys_group(0x6579, 0xCD46);

    decoder.decode_system(&variant1);
    assert_eq!(decoder.decode_system(&variant1), Some(true));
    assert_eq!(decoder.tmc.gap, 2);
    assert_eq!(decoder.tmc.sid, 0x15);
    assert_eq!(decoder.tmc.t_a, 0, "timing ignored outside enhanced mode");

    // Announce enhanced mode (variant 0), then repeat variant 1.
    let variant0 = sys_group(0x0875, 0xCD46);
    decoder.decode_system(&variant0);
    decoder.decode_system(&variant0);
    decoder.decode_system(&variant1);
    assert_eq!(decoder.decode_system(&variant1), Some(true));
    assert_eq!(decoder.tmc.t_a, 3);
    assert_eq!(decoder.tmc.t_w, 2);
    assert_eq!(decoder.tmc.t_d, 1);
}

#[test]
fn test_system_repeat_does_not_refire() {
    let mut decoder = TmcDecoder::default();
    let grp = sys_group(0x0875, 0xCD46);

    decoder.decode_system(&grp);
    assert_eq!(decoder.decode_system(&grp), Some(true));
    assert_eq!(
        decoder.decode_system(&grp),
        None,
        "third repetition restages instead of re-firing"
    );
    assert_eq!(
        decoder.decode_system(&grp),
        Some(false),
        "re-acceptance of identical parameters reports no change"
    );
}

#[test]
fn test_unpack_label_14_has_no_data() {
    let mut fields = Vec::new();
    // label 5 + data 0xAB, then four label-14 records (no data).
    unpack_additional(&[0x5ABE_EEE0], &mut fields);
    let got: std::vec::Vec<_> = fields.iter().copied().collect();
    assert_eq!(
        got,
        vec![
            TmcAdditional {
                label: 5,
                data: 0xAB
            },
            TmcAdditional { label: 14, data: 0 },
            TmcAdditional { label: 14, data: 0 },
            TmcAdditional { label: 14, data: 0 },
            TmcAdditional { label: 14, data: 0 },
        ]
    );
}

#[test]
fn test_unpack_stops_at_truncated_record() {
    let mut fields = Vec::new();
    // label 10 wants 16 data bits but only 24 bits follow in the single
    // window: 10, then 16 bits, then 4 bits of label 10 again with only
    // 4 bits remaining -> stop.
    unpack_additional(&[0xABCD_EA00], &mut fields);
    let got: std::vec::Vec<_> = fields.iter().copied().collect();
    assert_eq!(
        got,
        vec![TmcAdditional {
            label: 10,
            data: 0xBCDE
        }]
    );
}
