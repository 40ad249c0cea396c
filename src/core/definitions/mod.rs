//! Maps and helpers providing serialization-related information about
//! fields: the field catalogue (C1).
//!
//! The catalogue is read-only after startup. `ordinal` drives canonical
//! field ordering: ascending `(type_code, nth)` packed into one i32.

mod field_tables;

use hashbrown::HashMap;
use lazy_static::lazy_static;

use crate::utils::ToBytes;

use self::field_tables::{FIELDS, LEDGER_ENTRY_TYPES, TRANSACTION_TYPES, TYPES};

pub const CODE_MIN_VALUE: i16 = 1;
pub const CODE_MAX_VALUE: i16 = u8::MAX as i16;

/// A container for simultaneous storage of a field's type code and
/// field code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldHeader {
    pub type_code: i16,
    pub field_code: i16,
}

/// A collection of serialization information about a specific field.
#[derive(Debug, Clone)]
pub struct FieldInstance {
    pub nth: i16,
    pub is_vl_encoded: bool,
    pub is_serialized: bool,
    pub is_signing: bool,
    pub associated_type: String,
    pub name: String,
    pub header: FieldHeader,
    pub ordinal: i32,
}

impl FieldInstance {
    fn new(entry: &field_tables::FieldEntry, type_code: i16) -> Self {
        FieldInstance {
            nth: entry.nth,
            is_vl_encoded: entry.is_vl_encoded,
            is_serialized: entry.is_serialized,
            is_signing: entry.is_signing_field,
            name: entry.name.to_string(),
            ordinal: (type_code as i32) << 16 | entry.nth as i32,
            header: FieldHeader {
                type_code,
                field_code: entry.nth,
            },
            associated_type: entry.type_name.to_string(),
        }
    }
}

impl core::fmt::Display for FieldHeader {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}_{}", self.type_code, self.field_code)
    }
}

impl ToBytes for FieldHeader {
    /// Convert the FieldHeader to its wire prefix.
    fn to_bytes(&self) -> Vec<u8> {
        let mut header_bytes = vec![];

        if self.type_code < 16 {
            if self.field_code < 16 {
                let shift = (self.type_code << 4 | self.field_code) as u8;
                header_bytes.push(shift);
            } else {
                header_bytes.push((self.type_code << 4) as u8);
                header_bytes.push(self.field_code as u8);
            }
        } else if self.field_code < 16 {
            header_bytes.push(self.field_code as u8);
            header_bytes.push(self.type_code as u8);
        } else {
            header_bytes.push(0);
            header_bytes.push(self.type_code as u8);
            header_bytes.push(self.field_code as u8);
        }

        header_bytes
    }
}

lazy_static! {
    static ref TYPE_CODE_MAP: HashMap<&'static str, i16> = TYPES.iter().copied().collect();
    static ref FIELD_INSTANCE_MAP: HashMap<&'static str, FieldInstance> = {
        let mut map = HashMap::with_capacity(FIELDS.len());
        for entry in FIELDS {
            let type_code = *TYPE_CODE_MAP
                .get(entry.type_name)
                .expect("field manifest names an unknown type");
            map.insert(entry.name, FieldInstance::new(entry, type_code));
        }
        map
    };
    static ref FIELD_HEADER_NAME_MAP: HashMap<FieldHeader, &'static str> = {
        let mut map = HashMap::with_capacity(FIELDS.len());
        for entry in FIELDS {
            let type_code = *TYPE_CODE_MAP.get(entry.type_name).expect("unknown type");
            map.insert(
                FieldHeader {
                    type_code,
                    field_code: entry.nth,
                },
                entry.name,
            );
        }
        map
    };
    static ref TRANSACTION_TYPE_MAP: HashMap<&'static str, i16> =
        TRANSACTION_TYPES.iter().copied().collect();
    static ref TRANSACTION_TYPE_CODE_MAP: HashMap<i16, &'static str> =
        TRANSACTION_TYPES.iter().map(|(name, code)| (*code, *name)).collect();
    static ref LEDGER_ENTRY_TYPE_MAP: HashMap<&'static str, i16> =
        LEDGER_ENTRY_TYPES.iter().copied().collect();
    static ref LEDGER_ENTRY_TYPE_CODE_MAP: HashMap<i16, &'static str> =
        LEDGER_ENTRY_TYPES.iter().map(|(name, code)| (*code, *name)).collect();
}

/// Returns the serialization metadata for a field name.
pub fn get_field_instance(field_name: &str) -> Option<FieldInstance> {
    FIELD_INSTANCE_MAP.get(field_name).cloned()
}

/// Returns the field name for a decoded field header.
pub fn get_field_name_from_header(field_header: &FieldHeader) -> Option<&'static str> {
    FIELD_HEADER_NAME_MAP.get(field_header).copied()
}

/// Returns the header for a field name.
pub fn get_field_header_from_name(field_name: &str) -> Option<FieldHeader> {
    FIELD_INSTANCE_MAP.get(field_name).map(|f| f.header.clone())
}

/// Returns the type code for a serialization type name.
pub fn get_field_type_code(type_name: &str) -> Option<i16> {
    TYPE_CODE_MAP.get(type_name).copied()
}

/// Returns the wire code for a transaction type name.
pub fn get_transaction_type_code(transaction_type: &str) -> Option<i16> {
    TRANSACTION_TYPE_MAP.get(transaction_type).copied()
}

/// Returns the transaction type name for a wire code.
pub fn get_transaction_type_name(code: i16) -> Option<&'static str> {
    TRANSACTION_TYPE_CODE_MAP.get(&code).copied()
}

/// Returns the wire code for a ledger entry type name.
pub fn get_ledger_entry_type_code(entry_type: &str) -> Option<i16> {
    LEDGER_ENTRY_TYPE_MAP.get(entry_type).copied()
}

/// Returns the ledger entry type name for a wire code.
pub fn get_ledger_entry_type_name(code: i16) -> Option<&'static str> {
    LEDGER_ENTRY_TYPE_CODE_MAP.get(&code).copied()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_headers_are_globally_unique() {
        assert_eq!(FIELD_HEADER_NAME_MAP.len(), FIELD_INSTANCE_MAP.len());
    }

    #[test]
    fn test_known_field_headers() {
        let account = get_field_instance("Account").unwrap();
        assert_eq!(account.header.type_code, 8);
        assert_eq!(account.header.field_code, 1);
        assert!(account.is_vl_encoded);

        let fee = get_field_instance("Fee").unwrap();
        assert_eq!(fee.header.type_code, 6);
        assert_eq!(fee.header.field_code, 8);

        let sequence = get_field_instance("Sequence").unwrap();
        assert_eq!(sequence.header.type_code, 2);
        assert_eq!(sequence.header.field_code, 4);
    }

    #[test]
    fn test_field_id_bytes() {
        use crate::utils::ToBytes;

        assert_eq!(
            get_field_header_from_name("Account").unwrap().to_bytes(),
            vec![0x81]
        );
        assert_eq!(
            get_field_header_from_name("Fee").unwrap().to_bytes(),
            vec![0x68]
        );
        assert_eq!(
            get_field_header_from_name("Sequence").unwrap().to_bytes(),
            vec![0x24]
        );
    }

    #[test]
    fn test_name_round_trip() {
        for name in ["Balance", "OwnerCount", "TickSize", "Asset2", "Indexes"] {
            let header = get_field_header_from_name(name).unwrap();
            assert_eq!(get_field_name_from_header(&header), Some(name));
        }
    }

    #[test]
    fn test_transaction_type_codes() {
        assert_eq!(get_transaction_type_code("Payment"), Some(0));
        assert_eq!(get_transaction_type_code("AMMCreate"), Some(35));
        assert_eq!(get_transaction_type_name(21), Some("AccountDelete"));
        assert_eq!(get_transaction_type_code("Bogus"), None);
    }
}
