// Entity Models
//
// One entity: the SWIFT code record. The headquarters/branch relationship is
// derived from the code itself, so there is no separate branch entity.

pub mod swift_code;

pub use swift_code::{
    canonical_code, is_headquarter_code, CountrySwiftCodes, NewSwiftCode, SwiftCode,
    SwiftCodeDetails, SwiftCodeRegistry, SwiftCodeSummary, BRANCH_PREFIX_LEN,
    HEADQUARTER_SUFFIX,
};
