/// Constants describing the source file's column layout.
pub mod columns {
    /// External application identifier column.
    pub const ID: &str = "azonosito";
    /// Applicant organization display name column.
    pub const ORGANIZATION_NAME: &str = "szervezet_neve";
    /// Tax identifier column; numeric in some file revisions.
    pub const TAX_ID: &str = "adoszama";
    /// Category/classification label column.
    pub const CLASSIFICATION: &str = "besorolas";
    /// Seat city column.
    pub const CITY: &str = "szekhely_varos";
    /// Seat country column.
    pub const COUNTRY: &str = "szekhely_orszag";
    /// Organization type column.
    pub const ORGANIZATION_TYPE: &str = "szervezet_tipusa";
    /// Granted amount column; locale-formatted text in some revisions.
    pub const AMOUNT: &str = "tamogatas";
    /// Decision/status column.
    pub const DECISION: &str = "palyazati_dontes";
    /// Application subject column, canonical spelling.
    pub const SUBJECT: &str = "palyazat_targya";
    /// Misspelled subject column used by legacy file revisions.
    ///
    /// Checked before [`SUBJECT`]; older exports only carry this name.
    pub const SUBJECT_LEGACY: &str = "palyat_targya";
    /// County column.
    pub const COUNTY: &str = "megye";
    /// Region column.
    pub const REGION: &str = "regio";
}

/// Canonical decision vocabulary and its lowercase source forms.
pub mod decisions {
    /// Winning application.
    pub const WINNER: &str = "Nyertes";
    /// Application evaluated but not funded.
    pub const NOT_FUNDED: &str = "Nem támogatott";
    /// Rejected application.
    pub const REJECTED: &str = "Elutasított";
    /// Formally invalid application.
    pub const INVALID: &str = "Érvénytelen";
    /// Waitlisted application.
    pub const WAITLISTED: &str = "Várólistás";
    /// Sentinel for empty or absent decision values.
    pub const UNKNOWN: &str = "Ismeretlen";

    /// Exact lowercase-to-canonical mapping applied before the
    /// capitalize-first fallback.
    pub const CANONICAL: [(&str, &str); 5] = [
        ("nyertes", WINNER),
        ("nem támogatott", NOT_FUNDED),
        ("elutasított", REJECTED),
        ("érvénytelen", INVALID),
        ("várólistás", WAITLISTED),
    ];
}

/// Default values substituted for missing or null source fields.
pub mod defaults {
    /// Placeholder for absent text fields (name, tax ID, city, type).
    pub const NOT_AVAILABLE: &str = "N/A";
    /// Classification assigned when the source column is absent.
    pub const CLASSIFICATION_OTHER: &str = "Egyéb";
    /// Home country of the dataset, assumed when the column is absent.
    pub const HOME_COUNTRY: &str = "Magyarország";
    /// Prefix for synthesized record identifiers (`proj-{row_index}`).
    pub const SYNTHETIC_ID_PREFIX: &str = "proj-";
    /// Display name for groups whose organization name is empty.
    pub const UNNAMED_ORGANIZATION: &str = "Névtelen szervezet";
}

/// Constants used by identity resolution.
pub mod identity {
    /// Lowercase, trimmed tax-ID values that mean "no data recorded".
    ///
    /// A tax ID matching one of these (or the empty string) is treated as
    /// absent and grouping falls back to the organization name.
    pub const NO_DATA_TAX_IDS: [&str; 2] = ["nincs adat", "n/a"];
    /// Number of entries kept in each ranked top-winners view.
    pub const TOP_GROUP_LIMIT: usize = 50;
}

/// Constants used by the delimited-text export format.
pub mod export {
    /// Field delimiter for delimited-text exports.
    pub const DELIMITER: char = ',';
    /// Quote character used when escaping fields.
    pub const QUOTE: char = '"';
    /// Header row, in the fixed record column order.
    pub const HEADERS: [&str; 12] = [
        "Azonosító",
        "Szervezet neve",
        "Adószám",
        "Besorolás",
        "Székhely város",
        "Székhely ország",
        "Szervezet típusa",
        "Támogatás",
        "Pályázati döntés",
        "Pályázat tárgya",
        "Megye",
        "Régió",
    ];
}

/// Well-known input file locations served alongside the dashboard.
pub mod dataset {
    /// Default relative path of the columnar grant data file.
    pub const DATA_PATH: &str = "data/data.parquet";
    /// Default relative path of the city boundary GeoJSON file.
    pub const BOUNDARY_PATH: &str = "data/varos.geojson";
}
