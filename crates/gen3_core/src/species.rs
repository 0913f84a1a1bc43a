//! Species numbering.
//!
//! The games store an internal index that matches the national pokédex for
//! the first two generations and then diverges: internal 252..=276 are unused
//! placeholders and the third generation occupies internal 277..=411 in a
//! different order. The offset tables below bridge the two.

pub const FIRST_UNALIGNED_NATIONAL: u16 = 252;
pub const FIRST_UNALIGNED_INTERNAL: u16 = 277;
pub const MAX_NATIONAL_ID: u16 = 386;

#[rustfmt::skip]
const NATIONAL_TO_INTERNAL_OFFSETS: [i8; 135] = [
    25, 25, 25, 25, 25, 25, 25, 25, 25, 25, 25, 25,
    25, 25, 25, 25, 25, 25, 25, 25, 25, 25, 25, 25,
    28, 28, 31, 31, 112, 112, 112, 28, 28, 21, 21, 77,
    77, 77, 11, 11, 11, 77, 77, 77, 39, 39, 52, 21,
    15, 15, 20, 52, 78, 78, 78, 49, 49, 28, 28, 42,
    42, 73, 73, 48, 51, 51, 12, 12, -7, -7, 17, 17,
    -3, 26, 26, -19, 4, 4, 4, 13, 13, 25, 25, 45,
    43, 11, 11, -16, -16, -15, -15, -25, -25, 43, 43, 43,
    43, -21, -21, 34, -35, 24, 24, 6, 6, 12, 53, 17,
    0, -15, -15, -22, -22, -22, 7, 7, 7, 12, -45, 24,
    24, 24, 24, 24, 24, 24, 24, 24, 27, 27, 22, 22,
    22, 24, 24,
];

#[rustfmt::skip]
const INTERNAL_TO_NATIONAL_OFFSETS: [i8; 135] = [
    -25, -25, -25, -25, -25, -25, -25, -25, -25, -25, -25, -25,
    -25, -25, -25, -25, -25, -25, -25, -25, -25, -25, -25, -25,
    -11, -11, -11, -28, -28, -21, -21, 19, -31, -31, -28, -28,
    7, 7, -15, -15, 35, 25, 25, -21, 3, -20, 16, 16,
    45, 15, 15, 21, 21, -12, -12, -4, -4, -4, -39, -39,
    -28, -28, -17, -17, 22, 22, 22, -13, -13, 15, 15, -11,
    -11, -52, -26, -26, -42, -42, -52, -49, -49, -25, -25, 0,
    -6, -6, -48, -77, -77, -77, -51, -51, -12, -77, -77, -77,
    -7, -7, -7, -17, -24, -24, -43, -45, -12, -78, -78, -78,
    -34, -73, -73, -43, -43, -43, -43, -112, -112, -112, -24, -24,
    -24, -24, -24, -24, -24, -24, -24, -22, -22, -22, -27, -27,
    -24, -24, -53,
];

/// National ids past the table are assumed to be identity mapped.
pub const fn national_to_internal(national: u16) -> u16 {
    let shift = national.wrapping_sub(FIRST_UNALIGNED_NATIONAL) as usize;
    if shift >= NATIONAL_TO_INTERNAL_OFFSETS.len() {
        return national;
    }
    national.wrapping_add_signed(NATIONAL_TO_INTERNAL_OFFSETS[shift] as i16)
}

/// Returns 0 for internal ids with no national counterpart (the unused
/// placeholder block and anything past the table).
pub const fn internal_to_national(internal: u16) -> u16 {
    if internal < FIRST_UNALIGNED_NATIONAL {
        return internal;
    }
    let shift = internal.wrapping_sub(FIRST_UNALIGNED_INTERNAL) as usize;
    if shift >= INTERNAL_TO_NATIONAL_OFFSETS.len() {
        return 0;
    }
    internal.wrapping_add_signed(INTERNAL_TO_NATIONAL_OFFSETS[shift] as i16)
}

pub fn generation(national_id: u16) -> Option<u8> {
    match national_id {
        1..=151 => Some(1),
        152..=251 => Some(2),
        252..=386 => Some(3),
        _ => None,
    }
}

pub fn generation_range(generation: u8) -> Option<(u16, u16)> {
    match generation {
        1 => Some((1, 151)),
        2 => Some((152, 251)),
        3 => Some((252, 386)),
        _ => None,
    }
}

pub fn is_legendary(national_id: u16) -> bool {
    matches!(
        national_id,
        144..=146 | 150 | 243..=245 | 249 | 250 | 377..=384
    )
}

pub fn is_mythical(national_id: u16) -> bool {
    matches!(national_id, 151 | 251 | 385 | 386)
}

/// The three starter lines of each generation, nine species apiece.
pub fn is_starter(national_id: u16) -> bool {
    matches!(national_id, 1..=9 | 152..=160 | 252..=260)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_below_threshold_both_directions() {
        for id in 0..FIRST_UNALIGNED_NATIONAL {
            assert_eq!(national_to_internal(id), id);
            assert_eq!(internal_to_national(id), id);
        }
    }

    #[test]
    fn known_pairs() {
        assert_eq!(internal_to_national(282), 257);
        assert_eq!(national_to_internal(257), 282);
        assert_eq!(internal_to_national(277), 252);
        assert_eq!(national_to_internal(252), 277);
        assert_eq!(national_to_internal(386), 410);
    }

    #[test]
    fn round_trips_every_mapped_internal_id() {
        for internal in FIRST_UNALIGNED_INTERNAL..FIRST_UNALIGNED_INTERNAL + 135 {
            let national = internal_to_national(internal);
            assert_ne!(national, 0, "internal {internal}");
            assert_eq!(national_to_internal(national), internal);
        }
    }

    #[test]
    fn mapped_range_covers_third_generation_exactly_once() {
        let mut nationals: Vec<u16> = (FIRST_UNALIGNED_INTERNAL..FIRST_UNALIGNED_INTERNAL + 135)
            .map(internal_to_national)
            .collect();
        nationals.sort_unstable();
        let expected: Vec<u16> = (252..=386).collect();
        assert_eq!(nationals, expected);
    }

    #[test]
    fn unmapped_ids_are_asymmetric() {
        // Placeholder block between the aligned and relocated ranges.
        assert_eq!(internal_to_national(260), 0);
        assert_eq!(internal_to_national(412), 0);
        assert_eq!(internal_to_national(u16::MAX), 0);
        assert_eq!(national_to_internal(387), 387);
        assert_eq!(national_to_internal(1000), 1000);
    }

    #[test]
    fn classifications() {
        assert_eq!(generation(25), Some(1));
        assert_eq!(generation(152), Some(2));
        assert_eq!(generation(386), Some(3));
        assert_eq!(generation(0), None);
        assert_eq!(generation(387), None);
        assert_eq!(generation_range(2), Some((152, 251)));

        assert!(is_legendary(150));
        assert!(is_legendary(384));
        assert!(!is_legendary(151));
        assert!(is_mythical(151));
        assert!(is_mythical(385));
        assert!(!is_mythical(150));
        assert!(is_starter(1));
        assert!(is_starter(260));
        assert!(!is_starter(10));
        assert!(!is_starter(261));
    }
}
