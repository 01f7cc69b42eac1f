use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::BatchError;

macro_rules! item_fields {
    ($($variant:ident => $name:literal,)+) => {
        /// Item fields an operator may target with an import.
        ///
        /// Used to validate submissions. The pipeline itself still writes the
        /// field by name and lets the catalog accept or reject it.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum ItemField {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl ItemField {
            pub const ALL: &'static [ItemField] = &[$(ItemField::$variant,)+];

            /// Field name as it appears in the item record's `item_data`.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ItemField::$variant => $name,)+
                }
            }
        }
    };
}

item_fields! {
    Pid => "pid",
    Barcode => "barcode",
    CreationDate => "creation_date",
    ModificationDate => "modification_date",
    BaseStatus => "base_status",
    AwaitingReshelving => "awaiting_reshelving",
    ReshelvingTime => "reshelving_time",
    PhysicalMaterialType => "physical_material_type",
    Policy => "policy",
    Provenance => "provenance",
    PoLine => "po_line",
    IssueDate => "issue_date",
    IsMagnetic => "is_magnetic",
    ArrivalDate => "arrival_date",
    ExpectedArrivalDate => "expected_arrival_date",
    YearOfIssue => "year_of_issue",
    EnumerationA => "enumeration_a",
    EnumerationB => "enumeration_b",
    EnumerationC => "enumeration_c",
    EnumerationD => "enumeration_d",
    EnumerationE => "enumeration_e",
    EnumerationF => "enumeration_f",
    EnumerationG => "enumeration_g",
    EnumerationH => "enumeration_h",
    ChronologyI => "chronology_i",
    ChronologyJ => "chronology_j",
    ChronologyK => "chronology_k",
    ChronologyL => "chronology_l",
    ChronologyM => "chronology_m",
    BreakIndicator => "break_indicator",
    PatternType => "pattern_type",
    LinkingNumber => "linking_number",
    TypeOfUnit => "type_of_unit",
    Description => "description",
    ReplacementCost => "replacement_cost",
    ReceivingOperator => "receiving_operator",
    ProcessType => "process_type",
    WorkOrderType => "work_order_type",
    WorkOrderAt => "work_order_at",
    InventoryNumber => "inventory_number",
    InventoryDate => "inventory_date",
    InventoryPrice => "inventory_price",
    ReceiveNumber => "receive_number",
    WeedingNumber => "weeding_number",
    WeedingDate => "weeding_date",
    Library => "library",
    Location => "location",
    AlternativeCallNumber => "alternative_call_number",
    AlternativeCallNumberType => "alternative_call_number_type",
    AltNumberSource => "alt_number_source",
    StorageLocationId => "storage_location_id",
    Pages => "pages",
    Pieces => "pieces",
    PublicNote => "public_note",
    FulfillmentNote => "fulfillment_note",
    DueDate => "due_date",
    DueDatePolicy => "due_date_policy",
    InternalNote1 => "internal_note_1",
    InternalNote2 => "internal_note_2",
    InternalNote3 => "internal_note_3",
    StatisticsNote1 => "statistics_note_1",
    StatisticsNote2 => "statistics_note_2",
    StatisticsNote3 => "statistics_note_3",
    Requested => "requested",
    Edition => "edition",
    Imprint => "imprint",
    Language => "language",
    LibraryDetails => "library_details",
    ParsedAltCallNumber => "parsed_alt_call_number",
    ParsedCallNumber => "parsed_call_number",
    ParsedIssueLevelDescription => "parsed_issue_level_description",
    TitleAbcnph => "title_abcnph",
    PhysicalCondition => "physical_condition",
    CommittedToRetain => "committed_to_retain",
    RetentionReason => "retention_reason",
    RetentionNote => "retention_note",
}

impl Default for ItemField {
    fn default() -> Self {
        ItemField::InternalNote1
    }
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemField {
    type Err = BatchError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ItemField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| BatchError::UnknownField(name.to_string()))
    }
}
