//! Registry table schema and value encodings.

pub mod field_def;
pub mod list_codec;

pub use field_def::{
    Condition, FieldDefinition, FieldType, canonical_columns, canonical_name, columns, field,
    options, registry_fields, table_schema,
};
pub use list_codec::{decode_list, encode_list, parse_legacy_list};
