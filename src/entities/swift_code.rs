// 🏦 SWIFT Code Entity + Registry
//
// A SWIFT (BIC) code is 11 characters: an 8-character institution+location prefix
// followed by a 3-character branch suffix. Suffix "XXX" marks the headquarters.
//
// The headquarters/branch relationship is never stored. It is recomputed from the
// code structure every time somebody asks for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::RegistryError;

/// Length of the institution+location part of a code
pub const BRANCH_PREFIX_LEN: usize = 8;

/// Branch suffix reserved for the primary office
pub const HEADQUARTER_SUFFIX: &str = "XXX";

/// Canonical form of a code: trimmed, uppercase
pub fn canonical_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// True iff the code's branch suffix is `XXX`
pub fn is_headquarter_code(code: &str) -> bool {
    canonical_code(code).ends_with(HEADQUARTER_SUFFIX)
}

// ============================================================================
// SWIFT CODE ENTITY
// ============================================================================

/// One bank identifier record.
///
/// Field names on the wire follow the public API (`swiftCode`, `bankName`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwiftCode {
    #[serde(rename = "swiftCode")]
    pub code: String,

    #[serde(rename = "bankName")]
    pub bank_name: String,

    pub address: String,

    /// ISO 3166-1 alpha-2, uppercase
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,

    /// Uppercase
    #[serde(rename = "countryName")]
    pub country_name: String,

    #[serde(rename = "isHeadquarter")]
    pub is_headquarter: bool,
}

impl SwiftCode {
    /// Build a record with a caller-supplied headquarters flag.
    ///
    /// Strings are trimmed; code, country code and country name are uppercased.
    /// The flag is taken as given and not checked against the code suffix.
    pub fn new(
        code: &str,
        bank_name: &str,
        address: &str,
        country_iso2: &str,
        country_name: &str,
        is_headquarter: bool,
    ) -> Self {
        SwiftCode {
            code: canonical_code(code),
            bank_name: bank_name.trim().to_string(),
            address: address.trim().to_string(),
            country_iso2: country_iso2.trim().to_uppercase(),
            country_name: country_name.trim().to_uppercase(),
            is_headquarter,
        }
    }

    /// Build a record from a source row: the headquarters flag is derived from the code
    pub fn from_source(
        code: &str,
        bank_name: &str,
        address: &str,
        country_iso2: &str,
        country_name: &str,
    ) -> Self {
        SwiftCode::new(
            code,
            bank_name,
            address,
            country_iso2,
            country_name,
            is_headquarter_code(code),
        )
    }

    /// First 8 characters of the code.
    ///
    /// Codes shorter than 8 characters have no prefix and never group with anything.
    pub fn branch_prefix(&self) -> Option<&str> {
        match self.code.char_indices().nth(BRANCH_PREFIX_LEN) {
            Some((end, _)) => Some(&self.code[..end]),
            None if self.code.chars().count() == BRANCH_PREFIX_LEN => Some(&self.code),
            None => None,
        }
    }

    /// Case-insensitive exact match on the code
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.trim().eq_ignore_ascii_case(code.trim())
    }

    /// True iff `self` is a branch of the headquarters record `hq`
    pub fn is_branch_of(&self, hq: &SwiftCode) -> bool {
        if !hq.is_headquarter || self.is_headquarter {
            return false;
        }

        match (self.branch_prefix(), hq.branch_prefix()) {
            (Some(own), Some(theirs)) => own.eq_ignore_ascii_case(theirs),
            _ => false,
        }
    }

    /// Sanitized view (no country name)
    pub fn summary(&self) -> SwiftCodeSummary {
        SwiftCodeSummary::from(self)
    }
}

// ============================================================================
// BOUNDARY SHAPES
// ============================================================================

/// Record without `countryName`, used in branch lists and country listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwiftCodeSummary {
    pub address: String,

    #[serde(rename = "bankName")]
    pub bank_name: String,

    #[serde(rename = "countryISO2")]
    pub country_iso2: String,

    #[serde(rename = "isHeadquarter")]
    pub is_headquarter: bool,

    #[serde(rename = "swiftCode")]
    pub code: String,
}

impl From<&SwiftCode> for SwiftCodeSummary {
    fn from(record: &SwiftCode) -> Self {
        Self {
            address: record.address.clone(),
            bank_name: record.bank_name.clone(),
            country_iso2: record.country_iso2.clone(),
            is_headquarter: record.is_headquarter,
            code: record.code.clone(),
        }
    }
}

/// Result of a point lookup.
///
/// `branches` is present only for headquarters records (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwiftCodeDetails {
    #[serde(flatten)]
    pub record: SwiftCode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<SwiftCodeSummary>>,
}

/// Result of a country listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountrySwiftCodes {
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,

    /// Taken from the first matching record
    #[serde(rename = "countryName")]
    pub country_name: String,

    #[serde(rename = "swiftCodes")]
    pub swift_codes: Vec<SwiftCodeSummary>,
}

/// Insertion request body.
///
/// Every field is optional at the parsing stage so that missing fields surface as
/// a validation failure rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSwiftCode {
    #[serde(rename = "swiftCode", alias = "code")]
    pub swift_code: Option<String>,

    #[serde(rename = "bankName", alias = "institutionName")]
    pub bank_name: Option<String>,

    pub address: Option<String>,

    #[serde(rename = "countryISO2", alias = "countryCode")]
    pub country_iso2: Option<String>,

    #[serde(rename = "countryName")]
    pub country_name: Option<String>,

    /// Absent means `false`
    #[serde(rename = "isHeadquarter", alias = "isHeadquarters")]
    pub is_headquarter: Option<bool>,
}

impl NewSwiftCode {
    /// Check required fields and build the canonical record
    pub fn validate(self) -> Result<SwiftCode, RegistryError> {
        let mut missing = Vec::new();

        let code = required(self.swift_code, "swiftCode", &mut missing);
        let bank_name = required(self.bank_name, "bankName", &mut missing);
        let address = required(self.address, "address", &mut missing);
        let country_iso2 = required(self.country_iso2, "countryISO2", &mut missing);
        let country_name = required(self.country_name, "countryName", &mut missing);

        if !missing.is_empty() {
            return Err(RegistryError::MissingFields { fields: missing });
        }

        Ok(SwiftCode::new(
            &code,
            &bank_name,
            &address,
            &country_iso2,
            &country_name,
            self.is_headquarter.unwrap_or(false),
        ))
    }
}

fn required(value: Option<String>, field: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            missing.push(field);
            String::new()
        }
    }
}

// ============================================================================
// SWIFT CODE REGISTRY
// ============================================================================

#[derive(Debug, Default)]
struct Dataset {
    records: Vec<SwiftCode>,
    loaded_at: Option<DateTime<Utc>>,
}

/// In-memory registry of SWIFT codes.
///
/// Cloning the registry clones the handle, not the data. All operations go through
/// one read-write lock: lookups share it, mutations hold it exclusively, and `adopt`
/// replaces the whole dataset under a single write guard.
#[derive(Debug, Clone, Default)]
pub struct SwiftCodeRegistry {
    dataset: Arc<RwLock<Dataset>>,
}

impl SwiftCodeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that already holds `records`
    pub fn with_records(records: Vec<SwiftCode>) -> Result<Self, RegistryError> {
        let registry = Self::new();
        registry.adopt(records)?;
        Ok(registry)
    }

    // Mutations are a single push/remove/assign, so a poisoned lock still guards
    // a consistent dataset.
    fn read(&self) -> RwLockReadGuard<'_, Dataset> {
        self.dataset.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Dataset> {
        self.dataset.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the active dataset.
    ///
    /// Duplicate codes (or two headquarters sharing a prefix) in `records` reject the
    /// whole set and leave the previous dataset active.
    pub fn adopt(&self, records: Vec<SwiftCode>) -> Result<usize, RegistryError> {
        if let Err(e) = check_dataset(&records) {
            tracing::warn!(error = ?e, "rejected SWIFT code dataset");
            return Err(e);
        }

        let count = records.len();
        {
            let mut dataset = self.write();
            dataset.records = records;
            dataset.loaded_at = Some(Utc::now());
        }

        tracing::info!(count, "adopted SWIFT code dataset");
        Ok(count)
    }

    /// Look up one record by code (case-insensitive)
    pub fn get(&self, code: &str) -> Result<SwiftCode, RegistryError> {
        let dataset = self.read();
        dataset
            .records
            .iter()
            .find(|r| r.matches_code(code))
            .cloned()
            .ok_or_else(|| not_found(code))
    }

    /// Look up one record; headquarters also get their branches
    pub fn get_with_branches(&self, code: &str) -> Result<SwiftCodeDetails, RegistryError> {
        let dataset = self.read();
        let record = dataset
            .records
            .iter()
            .find(|r| r.matches_code(code))
            .ok_or_else(|| not_found(code))?;

        let branches = record.is_headquarter.then(|| {
            dataset
                .records
                .iter()
                .filter(|candidate| candidate.is_branch_of(record))
                .map(SwiftCodeSummary::from)
                .collect()
        });

        Ok(SwiftCodeDetails {
            record: record.clone(),
            branches,
        })
    }

    /// All records of one country, in dataset order
    pub fn list_by_country(&self, country_iso2: &str) -> Result<CountrySwiftCodes, RegistryError> {
        let country = country_iso2.trim().to_uppercase();
        let dataset = self.read();

        let matching: Vec<&SwiftCode> = dataset
            .records
            .iter()
            .filter(|r| r.country_iso2 == country)
            .collect();

        let first = matching.first().ok_or_else(|| RegistryError::CountryNotFound {
            country_iso2: country.clone(),
        })?;

        Ok(CountrySwiftCodes {
            country_name: first.country_name.clone(),
            swift_codes: matching.iter().map(|r| SwiftCodeSummary::from(*r)).collect(),
            country_iso2: country,
        })
    }

    /// Add a record; the headquarters flag is kept as supplied
    pub fn insert(&self, record: SwiftCode) -> Result<(), RegistryError> {
        let mut dataset = self.write();

        if dataset.records.iter().any(|r| r.matches_code(&record.code)) {
            return Err(RegistryError::AlreadyExists { code: record.code });
        }

        if record.is_headquarter {
            if let Some(existing) = dataset
                .records
                .iter()
                .find(|r| r.is_headquarter && shares_prefix(r, &record))
            {
                return Err(RegistryError::DuplicateHeadquarters {
                    prefix: record.branch_prefix().unwrap_or_default().to_string(),
                    existing: existing.code.clone(),
                });
            }
        }

        tracing::debug!(code = %record.code, "inserted SWIFT code");
        dataset.records.push(record);
        Ok(())
    }

    /// Remove a record by code, returning it
    pub fn delete(&self, code: &str) -> Result<SwiftCode, RegistryError> {
        let mut dataset = self.write();
        let position = dataset
            .records
            .iter()
            .position(|r| r.matches_code(code))
            .ok_or_else(|| not_found(code))?;

        let removed = dataset.records.remove(position);
        tracing::debug!(code = %removed.code, "deleted SWIFT code");
        Ok(removed)
    }

    /// Number of records in the active dataset
    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }

    /// Copy of the active dataset, taken under one read guard
    pub fn snapshot(&self) -> Vec<SwiftCode> {
        self.read().records.clone()
    }

    /// When the active dataset was last adopted
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.read().loaded_at
    }
}

fn not_found(code: &str) -> RegistryError {
    RegistryError::CodeNotFound {
        code: code.trim().to_string(),
    }
}

fn shares_prefix(a: &SwiftCode, b: &SwiftCode) -> bool {
    match (a.branch_prefix(), b.branch_prefix()) {
        (Some(x), Some(y)) => x.eq_ignore_ascii_case(y),
        _ => false,
    }
}

/// Uniqueness of codes and of headquarters per prefix
fn check_dataset(records: &[SwiftCode]) -> Result<(), RegistryError> {
    let mut codes = HashSet::with_capacity(records.len());
    // prefix -> first headquarters code that claimed it
    let mut headquarters: HashMap<String, String> = HashMap::new();

    for record in records {
        let code = canonical_code(&record.code);
        if !codes.insert(code.clone()) {
            return Err(RegistryError::AlreadyExists { code });
        }

        if record.is_headquarter {
            if let Some(prefix) = record.branch_prefix() {
                let prefix = prefix.to_ascii_uppercase();
                if let Some(existing) = headquarters.get(&prefix) {
                    return Err(RegistryError::DuplicateHeadquarters {
                        existing: existing.clone(),
                        prefix,
                    });
                }
                headquarters.insert(prefix, code);
            }
        }
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn hq() -> SwiftCode {
        SwiftCode::from_source("AAAABBCCXXX", "Alpha Bank", "1 Main St", "BB", "Bravo")
    }

    fn branch() -> SwiftCode {
        SwiftCode::from_source("AAAABBCC001", "Alpha Bank", "2 Side St", "BB", "Bravo")
    }

    fn test_code() -> SwiftCode {
        SwiftCode::new(
            "TESTCODE123",
            "TEST BANK",
            "123 Test Street",
            "TS",
            "TESTLAND",
            true,
        )
    }

    fn sample_registry() -> SwiftCodeRegistry {
        SwiftCodeRegistry::with_records(vec![
            hq(),
            branch(),
            SwiftCode::from_source("AAAABBCC002", "Alpha Bank", "3 Side St", "BB", "Bravo"),
            SwiftCode::from_source("ZZZZBBCCXXX", "Zulu Bank", "9 Far Rd", "BB", "Bravo"),
            SwiftCode::from_source("QQQQCCDD001", "Quebec Bank", "5 Quay", "cc", "charlie"),
        ])
        .unwrap()
    }

    #[test]
    fn test_canonicalization() {
        let record = SwiftCode::new(
            "  aaaabbccxxx ",
            "  Alpha Bank ",
            " 1 Main St\t",
            " bb ",
            " Bravo ",
            false,
        );

        assert_eq!(record.code, "AAAABBCCXXX");
        assert_eq!(record.bank_name, "Alpha Bank");
        assert_eq!(record.address, "1 Main St");
        assert_eq!(record.country_iso2, "BB");
        assert_eq!(record.country_name, "BRAVO");
        // Caller-supplied flag is kept even though the suffix says headquarters
        assert!(!record.is_headquarter);
    }

    #[test]
    fn test_headquarter_derived_from_suffix() {
        assert!(hq().is_headquarter);
        assert!(!branch().is_headquarter);
        assert!(SwiftCode::from_source("aaaabbccxxx", "", "", "", "").is_headquarter);
        assert!(!SwiftCode::from_source("AAAABBCCXX1", "", "", "", "").is_headquarter);
    }

    #[test]
    fn test_branch_prefix() {
        assert_eq!(hq().branch_prefix(), Some("AAAABBCC"));
        assert_eq!(branch().branch_prefix(), Some("AAAABBCC"));

        let exact = SwiftCode::new("AAAABBCC", "", "", "", "", false);
        assert_eq!(exact.branch_prefix(), Some("AAAABBCC"));

        let short = SwiftCode::new("SHORT", "", "", "", "", true);
        assert_eq!(short.branch_prefix(), None);
    }

    #[test]
    fn test_is_branch_of() {
        assert!(branch().is_branch_of(&hq()));
        assert!(!hq().is_branch_of(&hq()));
        assert!(!hq().is_branch_of(&branch()));

        let other = SwiftCode::from_source("ZZZZBBCC001", "", "", "BB", "");
        assert!(!other.is_branch_of(&hq()));

        let short_hq = SwiftCode::new("SHORT", "", "", "", "", true);
        let short_branch = SwiftCode::new("SHORT", "", "", "", "", false);
        assert!(!short_branch.is_branch_of(&short_hq));
    }

    #[test]
    fn test_summary_omits_country_name() {
        let json = serde_json::to_value(hq().summary()).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 5);
        assert!(!obj.contains_key("countryName"));
        assert_eq!(obj["swiftCode"], "AAAABBCCXXX");
        assert_eq!(obj["bankName"], "Alpha Bank");
        assert_eq!(obj["countryISO2"], "BB");
        assert_eq!(obj["isHeadquarter"], true);
    }

    #[test]
    fn test_new_swift_code_validate() {
        let request: NewSwiftCode = serde_json::from_value(serde_json::json!({
            "swiftCode": " testcode123 ",
            "bankName": "TEST BANK",
            "address": "123 Test Street",
            "countryISO2": "ts",
            "countryName": "Testland",
            "isHeadquarter": true
        }))
        .unwrap();

        let record = request.validate().unwrap();
        assert_eq!(record, test_code());
    }

    #[test]
    fn test_new_swift_code_aliases_and_default_flag() {
        let request: NewSwiftCode = serde_json::from_value(serde_json::json!({
            "code": "AAAABBCC001",
            "institutionName": "Alpha Bank",
            "address": "2 Side St",
            "countryISO2": "BB",
            "countryName": "Bravo"
        }))
        .unwrap();

        let record = request.validate().unwrap();
        assert_eq!(record.code, "AAAABBCC001");
        assert_eq!(record.bank_name, "Alpha Bank");
        assert!(!record.is_headquarter);
    }

    #[test]
    fn test_new_swift_code_missing_fields() {
        let request = NewSwiftCode {
            swift_code: Some("AAAABBCC001".to_string()),
            address: Some("   ".to_string()),
            ..Default::default()
        };

        let err = request.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err,
            RegistryError::MissingFields {
                fields: vec!["bankName", "address", "countryISO2", "countryName"],
            }
        );
    }

    #[test]
    fn test_get_case_insensitive() {
        let registry = sample_registry();

        let found = registry.get("aaaabbccxxx").unwrap();
        assert_eq!(found, hq());

        let found = registry.get("  AAAABBCC001 ").unwrap();
        assert_eq!(found, branch());
    }

    #[test]
    fn test_get_not_found() {
        let registry = sample_registry();
        let err = registry.get("NONEXISTENTCODE").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "SWIFT code not found.");
    }

    #[test]
    fn test_get_with_branches_headquarter() {
        let registry = SwiftCodeRegistry::with_records(vec![hq(), branch()]).unwrap();

        let details = registry.get_with_branches("AAAABBCCXXX").unwrap();
        assert_eq!(details.record, hq());
        assert_eq!(details.branches, Some(vec![branch().summary()]));
    }

    #[test]
    fn test_get_with_branches_exact_branch_set() {
        let registry = sample_registry();

        let details = registry.get_with_branches("AAAABBCCXXX").unwrap();
        let codes: Vec<String> = details
            .branches
            .unwrap()
            .into_iter()
            .map(|b| b.code)
            .collect();

        // Other headquarters and other prefixes are excluded
        assert_eq!(codes, vec!["AAAABBCC001", "AAAABBCC002"]);

        let lonely = registry.get_with_branches("ZZZZBBCCXXX").unwrap();
        assert_eq!(lonely.branches, Some(vec![]));
    }

    #[test]
    fn test_get_with_branches_on_branch_has_no_branches_key() {
        let registry = sample_registry();
        let details = registry.get_with_branches("AAAABBCC001").unwrap();
        assert!(details.branches.is_none());

        let json = serde_json::to_value(&details).unwrap();
        assert!(json.get("branches").is_none());
        assert_eq!(json["countryName"], "BRAVO");
    }

    #[test]
    fn test_list_by_country() {
        let registry = sample_registry();

        let listing = registry.list_by_country("bb").unwrap();
        assert_eq!(listing.country_iso2, "BB");
        assert_eq!(listing.country_name, "BRAVO");
        assert_eq!(listing.swift_codes.len(), 4);
        assert_eq!(listing.swift_codes[0].code, "AAAABBCCXXX");

        let listing = registry.list_by_country("CC").unwrap();
        assert_eq!(listing.country_name, "CHARLIE");
        assert_eq!(listing.swift_codes.len(), 1);
    }

    #[test]
    fn test_list_by_country_empty_is_not_found() {
        let registry = sample_registry();
        let err = registry.list_by_country("ZZ").unwrap_err();
        assert_eq!(
            err,
            RegistryError::CountryNotFound {
                country_iso2: "ZZ".to_string()
            }
        );
    }

    #[test]
    fn test_insert_then_conflict() {
        let registry = SwiftCodeRegistry::new();

        registry.insert(test_code()).unwrap();
        assert_eq!(registry.len(), 1);

        let err = registry.insert(test_code()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.to_string(), "SWIFT code already exists.");
        assert_eq!(registry.len(), 1);

        let found = registry.get("TESTCODE123").unwrap();
        assert_eq!(found.bank_name, "TEST BANK");
    }

    #[test]
    fn test_insert_conflict_is_case_insensitive() {
        let registry = sample_registry();
        let before = registry.snapshot();

        let mut lower = branch();
        lower.code = "aaaabbcc001".to_string();
        let err = registry.insert(lower).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn test_insert_keeps_caller_headquarter_flag() {
        let registry = SwiftCodeRegistry::new();
        let flagged = SwiftCode::new("NEWBANKX001", "New", "Addr", "NB", "Nowhere", true);
        registry.insert(flagged).unwrap();

        assert!(registry.get("NEWBANKX001").unwrap().is_headquarter);
    }

    #[test]
    fn test_insert_rejects_second_headquarter_for_prefix() {
        let registry = sample_registry();
        let before = registry.len();

        let rogue = SwiftCode::new("AAAABBCC999", "Alpha Bank", "Addr", "BB", "Bravo", true);
        let err = registry.insert(rogue).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(matches!(
            err,
            RegistryError::DuplicateHeadquarters { ref existing, .. } if existing == "AAAABBCCXXX"
        ));
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn test_one_headquarter_per_prefix_in_loaded_data() {
        let registry = sample_registry();
        let records = registry.snapshot();

        let mut prefixes = HashSet::new();
        for record in records.iter().filter(|r| r.is_headquarter) {
            assert!(prefixes.insert(record.branch_prefix().unwrap().to_string()));
        }
    }

    #[test]
    fn test_delete() {
        let registry = sample_registry();
        let before = registry.len();

        let removed = registry.delete("aaaabbcc002").unwrap();
        assert_eq!(removed.code, "AAAABBCC002");
        assert_eq!(registry.len(), before - 1);

        let err = registry.get("AAAABBCC002").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_missing_leaves_dataset_unchanged() {
        let registry = sample_registry();
        let before = registry.len();

        let err = registry.delete("NOPE").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn test_adopt_replaces_dataset() {
        let registry = sample_registry();
        assert!(registry.loaded_at().is_some());

        let count = registry.adopt(vec![test_code()]).unwrap();
        assert_eq!(count, 1);
        assert_eq!(registry.snapshot(), vec![test_code()]);
        assert!(registry.get("AAAABBCCXXX").is_err());
    }

    #[test]
    fn test_adopt_rejects_duplicates_and_keeps_previous() {
        let registry = sample_registry();
        let before = registry.snapshot();

        let mut dup = hq();
        dup.code = "aaaabbccxxx".to_string();
        let err = registry.adopt(vec![hq(), branch(), dup]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn test_adopt_rejects_second_headquarter_for_prefix() {
        let registry = sample_registry();
        let before = registry.snapshot();

        let rogue = SwiftCode::new("AAAABBCC001", "Alpha Bank", "2 Side St", "BB", "Bravo", true);
        let err = registry.adopt(vec![hq(), rogue]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(
            err,
            RegistryError::DuplicateHeadquarters {
                prefix: "AAAABBCC".to_string(),
                existing: "AAAABBCCXXX".to_string(),
            }
        );
        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn test_clone_shares_dataset() {
        let registry = SwiftCodeRegistry::new();
        let handle = registry.clone();

        handle.insert(test_code()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_concurrent_adopt_is_atomic() {
        use std::thread;

        fn country_set(country: &str) -> Vec<SwiftCode> {
            (0..200)
                .map(|i| {
                    SwiftCode::from_source(&format!("BANK{}{:03}", country, i), "", "", country, "")
                })
                .collect()
        }

        let registry = SwiftCodeRegistry::with_records(country_set("AA")).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snapshot = registry.snapshot();
                        assert_eq!(snapshot.len(), 200);
                        let first = snapshot[0].country_iso2.clone();
                        assert!(snapshot.iter().all(|r| r.country_iso2 == first));
                    }
                })
            })
            .collect();

        let writer = {
            let registry = registry.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    let country = if i % 2 == 0 { "BB" } else { "AA" };
                    registry.adopt(country_set(country)).unwrap();
                }
            })
        };

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
