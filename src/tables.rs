//! Lookup tables for presenting decoded RDS codes.
//!
//! The tables mirror the assignments of IEC 62106 (RDS) and NRSC-4 (RBDS).
//! They are presentation helpers only; the decoder itself stores the raw
//! codes.

/// Program Type names, RDS assignment (IEC 62106 annex F).
static PTY_RDS: [&str; 32] = [
    "None",
    "News",
    "Affairs",
    "Info",
    "Sport",
    "Education",
    "Drama",
    "Culture",
    "Science",
    "Varied Speech",
    "Pop Music",
    "Rock Music",
    "Easy Listening",
    "Light Classics M",
    "Serious Classics",
    "Other Music",
    "Weather",
    "Finance",
    "Children",
    "Social Affairs",
    "Religion",
    "Phone In",
    "Travel & Touring",
    "Leisure & Hobby",
    "Jazz Music",
    "Country Music",
    "National Music",
    "Oldies Music",
    "Folk Music",
    "Documentary",
    "Alarm Test",
    "Alarm!",
];

/// Program Type names, RBDS assignment (NRSC-4).
static PTY_RBDS: [&str; 32] = [
    "None",
    "News",
    "Information",
    "Sports",
    "Talk",
    "Rock",
    "Classic Rock",
    "Adult Hits",
    "Soft Rock",
    "Top 40",
    "Country",
    "Oldies",
    "Soft",
    "Nostalgia",
    "Jazz",
    "Classical",
    "R&B",
    "Soft R&B",
    "Foreign Language",
    "Religious Music",
    "Religious Talk",
    "Personality",
    "Public",
    "College",
    "Spanish Talk",
    "Spanish Music",
    "Hip-Hop",
    "Unassigned",
    "Unassigned",
    "Weather",
    "Emergency Test",
    "Emergency",
];

/// Area coverage names derived from PI bits 8..11.
static COVERAGE: [&str; 16] = [
    "Local",
    "International",
    "National",
    "Supra-Regional",
    "Regional 1",
    "Regional 2",
    "Regional 3",
    "Regional 4",
    "Regional 5",
    "Regional 6",
    "Regional 7",
    "Regional 8",
    "Regional 9",
    "Regional 10",
    "Regional 11",
    "Regional 12",
];

/// Language names indexed by the RDS language code. The standard leaves
/// codes 44..=68 unassigned.
static LANGUAGES: [Option<&str>; 128] = [
    Some("Unknown"),
    Some("Albanian"),
    Some("Breton"),
    Some("Catalan"),
    Some("Croatian"),
    Some("Welsh"),
    Some("Czech"),
    Some("Danish"),
    Some("German"),
    Some("English"),
    Some("Spanish"),
    Some("Esperanto"),
    Some("Estonian"),
    Some("Basque"),
    Some("Faroese"),
    Some("French"),
    Some("Frisian"),
    Some("Irish"),
    Some("Gaelic"),
    Some("Galician"),
    Some("Icelandic"),
    Some("Italian"),
    Some("Lappish"),
    Some("Latin"),
    Some("Latvian"),
    Some("Luxembourgian"),
    Some("Lithuanian"),
    Some("Hungarian"),
    Some("Maltese"),
    Some("Dutch"),
    Some("Norwegian"),
    Some("Occitan"),
    Some("Polish"),
    Some("Portuguese"),
    Some("Romanian"),
    Some("Ramansh"),
    Some("Serbian"),
    Some("Slovak"),
    Some("Slovene"),
    Some("Finnish"),
    Some("Swedish"),
    Some("Turkish"),
    Some("Flemish"),
    Some("Walloon"),
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    Some("Zulu"),
    Some("Vietnamese"),
    Some("Uzbek"),
    Some("Urdu"),
    Some("Ukrainian"),
    Some("Thai"),
    Some("Telugu"),
    Some("Tatar"),
    Some("Tamil"),
    Some("Tadzhik"),
    Some("Swahili"),
    Some("Sranan Tongo"),
    Some("Somali"),
    Some("Sinhalese"),
    Some("Shona"),
    Some("Serbo-Croat"),
    Some("Ruthenian"),
    Some("Russian"),
    Some("Quechua"),
    Some("Pushtu"),
    Some("Punjabi"),
    Some("Persian"),
    Some("Papamiento"),
    Some("Oriya"),
    Some("Nepali"),
    Some("Ndebele"),
    Some("Marathi"),
    Some("Moldavian"),
    Some("Malaysian"),
    Some("Malagasay"),
    Some("Macedonian"),
    Some("Laotian"),
    Some("Korean"),
    Some("Khmer"),
    Some("Kazahkh"),
    Some("Kannada"),
    Some("Japanese"),
    Some("Indonesian"),
    Some("Hindi"),
    Some("Hebrew"),
    Some("Hausa"),
    Some("Gurani"),
    Some("Gujurati"),
    Some("Greek"),
    Some("Georgian"),
    Some("Fulani"),
    Some("Dani"),
    Some("Churash"),
    Some("Chinese"),
    Some("Burmese"),
    Some("Bulgarian"),
    Some("Bengali"),
    Some("Belorussian"),
    Some("Bambora"),
    Some("Azerbaijani"),
    Some("Assamese"),
    Some("Armenian"),
    Some("Arabic"),
    Some("Amharic"),
];

/// Two-letter country codes for the European ECC range 0xE0..0xE4, indexed
/// by ECC low nibble and the country code in the PI top nibble. The standard
/// leaves some combinations undefined; E4-7 is defined as a dash.
static COUNTRY_EUROPE: [[Option<&str>; 16]; 5] = [
    [
        None,
        Some("DE"),
        Some("DZ"),
        Some("AD"),
        Some("IL"),
        Some("IT"),
        Some("BE"),
        Some("RU"),
        Some("PS"),
        Some("AL"),
        Some("AT"),
        Some("HU"),
        Some("MT"),
        Some("DE"),
        None,
        Some("EG"),
    ],
    [
        None,
        Some("GR"),
        Some("CY"),
        Some("SM"),
        Some("CH"),
        Some("JO"),
        Some("FI"),
        Some("LU"),
        Some("BG"),
        Some("DK"),
        Some("GI"),
        Some("IQ"),
        Some("GB"),
        Some("LY"),
        Some("RO"),
        Some("FR"),
    ],
    [
        None,
        Some("MA"),
        Some("CZ"),
        Some("PL"),
        Some("VA"),
        Some("SK"),
        Some("SY"),
        Some("TN"),
        None,
        Some("LI"),
        Some("IS"),
        Some("MC"),
        Some("LT"),
        Some("RS"),
        Some("ES"),
        Some("NO"),
    ],
    [
        None,
        Some("ME"),
        Some("IE"),
        Some("TR"),
        Some("MK"),
        None,
        None,
        None,
        Some("NL"),
        Some("LV"),
        Some("LB"),
        Some("AZ"),
        Some("HR"),
        Some("KZ"),
        Some("SE"),
        Some("BY"),
    ],
    [
        None,
        Some("MD"),
        Some("EE"),
        Some("KG"),
        None,
        None,
        Some("UA"),
        Some("-"),
        Some("PT"),
        Some("SI"),
        Some("AM"),
        None,
        Some("GE"),
        None,
        None,
        Some("BA"),
    ],
];

/// Localized PTY name, or `None` when the code is out of range.
pub(crate) fn pty_name(pty: u8, is_rbds: bool) -> Option<&'static str> {
    let table = if is_rbds { &PTY_RBDS } else { &PTY_RDS };
    table.get(usize::from(pty)).copied()
}

/// Language name for an RDS language code; holes map to "Unknown".
pub(crate) fn language_name(lc: u8) -> &'static str {
    LANGUAGES
        .get(usize::from(lc))
        .copied()
        .flatten()
        .unwrap_or("Unknown")
}

/// Coverage-area name from PI bits 8..11.
pub(crate) fn coverage_name(pi: u16) -> &'static str {
    COVERAGE[usize::from((pi >> 8) & 0x0f)]
}

/// Two-letter country code from the ECC and the PI top nibble.
///
/// Only the European ECC range 0xE0..0xE4 is tabulated; everything else,
/// including the combinations the standard leaves undefined, maps to
/// "Unknown".
pub(crate) fn country_code(ecc: u8, pi: u16) -> &'static str {
    let ecc_h = ecc >> 4;
    let ecc_l = ecc & 0x0f;
    let cc = (pi >> 12) as usize;
    if ecc_h == 0x0e && ecc_l <= 0x04 {
        return COUNTRY_EUROPE[usize::from(ecc_l)][cc].unwrap_or("Unknown");
    }
    "Unknown"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pty_tables_differ() {
        assert_eq!(pty_name(4, false), Some("Sport"));
        assert_eq!(pty_name(4, true), Some("Talk"));
        assert_eq!(pty_name(31, false), Some("Alarm!"));
        assert_eq!(pty_name(31, true), Some("Emergency"));
        assert_eq!(pty_name(32, false), None);
    }

    #[test]
    fn test_language_holes_are_unknown() {
        assert_eq!(language_name(9), "English");
        assert_eq!(language_name(44), "Unknown");
        assert_eq!(language_name(68), "Unknown");
        assert_eq!(language_name(69), "Zulu");
        assert_eq!(language_name(127), "Amharic");
        assert_eq!(language_name(200), "Unknown");
    }

    #[test]
    fn test_country_lookup() {
        // ECC 0xE0, country code 0xD -> Germany.
        assert_eq!(country_code(0xE0, 0xD123), "DE");
        // ECC 0xE1, country code 0xF -> France.
        assert_eq!(country_code(0xE1, 0xF000), "FR");
        // Undefined cell.
        assert_eq!(country_code(0xE0, 0x0000), "Unknown");
        // Non-European ECC.
        assert_eq!(country_code(0xA0, 0xD123), "Unknown");
    }

    #[test]
    fn test_coverage_lookup() {
        assert_eq!(coverage_name(0x0000), "Local");
        assert_eq!(coverage_name(0x0200), "National");
        assert_eq!(coverage_name(0x0F00), "Regional 12");
    }
}
