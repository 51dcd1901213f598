/// ChEMBL identifier validation.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, SaferError};

lazy_static! {
    static ref CHEMBL_ID: Regex = Regex::new(r"^CHEMBL[0-9]+$").unwrap();
}

/// Validate a ChEMBL drug identifier (e.g. `CHEMBL25`).
/// Surrounding whitespace is trimmed; the returned id is the trimmed form.
pub fn validate_chembl_id(input: &str) -> Result<String> {
    let id = input.trim();
    if !CHEMBL_ID.is_match(id) {
        return Err(SaferError::InvalidDrugId(input.to_string()));
    }
    Ok(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        assert_eq!(validate_chembl_id("CHEMBL25").unwrap(), "CHEMBL25");
        assert_eq!(validate_chembl_id("  CHEMBL3137343 ").unwrap(), "CHEMBL3137343");
    }

    #[test]
    fn test_invalid_ids() {
        for bad in ["", "CHEMBL", "chembl25", "CHEMBL25a", "ENSG00000073756", "CHEMBL 25"] {
            assert!(
                matches!(validate_chembl_id(bad), Err(SaferError::InvalidDrugId(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
