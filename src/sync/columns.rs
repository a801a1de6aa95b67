//! Sheet column labels and the attributes they feed.

pub const NAME: &str = "Name";
pub const CALLSIGN: &str = "Callsign";
pub const PHONETIC: &str = "Phonetic";
pub const COLOUR: &str = "Colour";

pub const MGP_ID: &str = "MGP ID";
pub const FPVS_UUID: &str = "FPVS UUID";
pub const COUNTRY: &str = "Country";
pub const ELRS_BIND_PHRASE: &str = "ELRS Bind Phrase";
pub const VELOCIDRONE_UUID: &str = "Velocidrone UUID";
pub const FAI_NUMBER: &str = "FAI Number";

/// Attribute holding the ELRS bind phrase.
pub const COMM_ELRS: &str = "comm_elrs";

/// Checkbox attribute switched on whenever a bind phrase is written.
pub const ELRS_ACTIVE: &str = "elrs_active";

/// Maps a sheet column to the pilot attribute it populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeColumn {
    pub column: &'static str,
    pub attribute: &'static str,
}

/// Every column that feeds a custom attribute, in write order.
pub const ATTRIBUTE_COLUMNS: &[AttributeColumn] = &[
    AttributeColumn {
        column: MGP_ID,
        attribute: "mgp_pilot_id",
    },
    AttributeColumn {
        column: FPVS_UUID,
        attribute: "fpvs_uuid",
    },
    AttributeColumn {
        column: COUNTRY,
        attribute: "country",
    },
    AttributeColumn {
        column: ELRS_BIND_PHRASE,
        attribute: COMM_ELRS,
    },
    AttributeColumn {
        column: VELOCIDRONE_UUID,
        attribute: "velo_uid",
    },
    AttributeColumn {
        column: FAI_NUMBER,
        attribute: "fainumber",
    },
];
