//! Boolean encodings of the non-boolean feature theories.

pub mod enums;
pub mod integer;
pub mod version;


pub use enums::{
    enum_variable, translate_enum_comparison, translate_enum_in, EnumMapping, ENUM_FEATURE_PREFIX,
};
pub use integer::{
    collect_int_predicates, encode_int_predicate, int_variable, IntPredicateMapping,
    IntegerEncoding, IntegerEncodingStore, FEATURE_DEF_PREFIX, PREDICATE_PREFIX,
};
pub use version::{
    helper_variables, installed, translate_version_comparison, version_mapping,
    version_propositions, VersionMapping, VersionStore, VERSION_FEATURE_PREFIX,
};
