/// External application identifier carried by a record.
/// Examples: `NEAO-KP-1-2022/1-000123`, `proj-42` (synthesized fallback)
pub type RecordId = String;
/// Tax identifier string as normalized from the source column.
/// Examples: `18158713-1-42`, `12345678`, `N/A`
pub type TaxId = String;
/// Resolved identity key used to collapse records into one group.
/// Examples: `12345678` (tax-derived), `Pro Ruris Egyesület` (name fallback)
pub type GroupKey = String;
/// Normalized decision label from the fixed vocabulary.
/// Examples: `Nyertes`, `Nem támogatott`, `Ismeretlen`
pub type Decision = String;
/// Category key used in aggregate breakdowns (city, classification, type).
/// Examples: `Budapest`, `Egyéb`, `Egyesület`
pub type CategoryKey = String;
/// Source column name in the decoded table.
/// Examples: `szervezet_neve`, `tamogatas`
pub type FieldName = String;
