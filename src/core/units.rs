//! UN/ECE Recommendation 20 unit codes accepted on UBL-TR documents.
//!
//! The full Rec 20 list has ~2000 codes; GİB publishes the subset that
//! appears on Turkish e-documents. This covers the common part of it,
//! with the Turkish display name used on printed invoices.

/// Check whether `code` is a known unit code.
pub fn is_known_unit_code(code: &str) -> bool {
    lookup(code).is_some()
}

/// Turkish display name for a unit code (e.g. "C62" → "Adet").
pub fn unit_name(code: &str) -> Option<&'static str> {
    lookup(code).map(|idx| UNIT_CODES[idx].1)
}

fn lookup(code: &str) -> Option<usize> {
    UNIT_CODES.binary_search_by(|(c, _)| (*c).cmp(code)).ok()
}

/// Sorted by code for binary search.
static UNIT_CODES: &[(&str, &str)] = &[
    ("ANN", "Yıl"),
    ("BX", "Kutu"),
    ("C62", "Adet"),
    ("CMK", "Santimetrekare"),
    ("CMT", "Santimetre"),
    ("CT", "Karton"),
    ("DAY", "Gün"),
    ("DZN", "Düzine"),
    ("GRM", "Gram"),
    ("HUR", "Saat"),
    ("KGM", "Kilogram"),
    ("KJO", "Kilojoule"),
    ("KMT", "Kilometre"),
    ("KWH", "Kilovatsaat"),
    ("KWT", "Kilovat"),
    ("LTR", "Litre"),
    ("MGM", "Miligram"),
    ("MIN", "Dakika"),
    ("MLT", "Mililitre"),
    ("MMT", "Milimetre"),
    ("MON", "Ay"),
    ("MTK", "Metrekare"),
    ("MTQ", "Metreküp"),
    ("MTR", "Metre"),
    ("MWH", "Megavatsaat"),
    ("NPR", "Çift"),
    ("PA", "Paket"),
    ("PR", "Çift"),
    ("R9", "Bin metreküp"),
    ("SET", "Set"),
    ("SM3", "Standart metreküp"),
    ("TNE", "Ton"),
    ("WEE", "Hafta"),
    ("XBX", "Kutu"),
    ("XPX", "Palet"),
    ("XSA", "Çuval"),
];
