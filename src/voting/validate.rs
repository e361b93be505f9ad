use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::models::{Catalog, NewVote, Selections, barangay};

const MIN_NAME_CHARS: usize = 2;
const MAX_NAME_CHARS: usize = 100;

lazy_static! {
    static ref CONTACT_NUMBER: Regex = Regex::new(r"^[0-9]{11}$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Raw body of `POST /api/submit-vote`.
#[derive(Debug, Clone, Deserialize)]
pub struct VoteSubmission {
    pub voter_name: String,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub barangay: Option<String>,
    pub votes: HashMap<String, Vec<String>>,
}

pub fn validate_submission(
    catalog: &Catalog,
    submission: VoteSubmission,
) -> Result<NewVote, ValidationError> {
    Ok(NewVote {
        voter_name: validate_voter_name(&submission.voter_name)?,
        contact_number: validate_contact(submission.contact_number.as_deref())?,
        barangay: validate_barangay(submission.barangay.as_deref())?,
        votes: filter_selections(catalog, &submission.votes)?,
    })
}

/// Keeps only catalog candidates for each catalog position and enforces selection limits.
///
/// Every catalog position gets an entry, empty if nothing valid was picked. Unknown
/// positions and unknown candidate names are dropped without an error.
pub fn filter_selections(
    catalog: &Catalog,
    requested: &HashMap<String, Vec<String>>,
) -> Result<Selections, ValidationError> {
    let mut selections = Selections::new();

    for position in catalog.positions() {
        let mut picked: Vec<String> = Vec::new();
        for name in requested.get(&position.name).into_iter().flatten() {
            if position.has_candidate(name) && !picked.contains(name) {
                picked.push(name.clone());
            }
        }

        if picked.len() > position.max_votes {
            return Err(ValidationError(format!(
                "Too many votes for {}. Maximum is {}",
                position.name, position.max_votes
            )));
        }

        selections.insert(position.name.clone(), picked);
    }

    Ok(selections)
}

pub fn validate_contact(contact: Option<&str>) -> Result<Option<String>, ValidationError> {
    // Blank means absent; anything else must already be exactly 11 digits.
    match contact.filter(|c| !c.trim().is_empty()) {
        None => Ok(None),
        Some(c) if CONTACT_NUMBER.is_match(c) => Ok(Some(c.to_string())),
        Some(_) => Err(ValidationError("Contact number must be 11 digits".to_string())),
    }
}

fn validate_barangay(name: Option<&str>) -> Result<Option<String>, ValidationError> {
    match name.map(str::trim).filter(|b| !b.is_empty()) {
        None => Ok(None),
        Some(b) if barangay::is_known(b) => Ok(Some(b.to_string())),
        Some(b) => Err(ValidationError(format!("Unknown barangay: {b}"))),
    }
}

fn validate_voter_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    let chars = name.chars().count();

    if chars < MIN_NAME_CHARS {
        return Err(ValidationError(format!(
            "Voter name must be at least {MIN_NAME_CHARS} characters"
        )));
    }
    if chars > MAX_NAME_CHARS {
        return Err(ValidationError(format!(
            "Voter name must be at most {MAX_NAME_CHARS} characters"
        )));
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::COUNCIL_POSITION;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{
                "MAYOR": { "candidates": ["A", "B"] },
                "VICE MAYOR": { "candidates": ["V1", "V2"] },
                "MEMBER, SANGGUNIANG PANLUNGSOD": {
                    "candidates": ["C1", "C2", "C3", "C4", "C5", "C6", "C7", "C8", "C9", "C10"]
                }
            }"#,
        )
        .unwrap()
    }

    fn submission(votes: &[(&str, &[&str])]) -> VoteSubmission {
        VoteSubmission {
            voter_name: "Maria Clara".to_string(),
            contact_number: Some("09171234567".to_string()),
            barangay: Some("Tibanga".to_string()),
            votes: votes
                .iter()
                .map(|(p, c)| (p.to_string(), c.iter().map(|s| s.to_string()).collect()))
                .collect(),
        }
    }

    fn councillors(n: usize) -> Vec<&'static str> {
        ["C1", "C2", "C3", "C4", "C5", "C6", "C7", "C8", "C9", "C10"][..n].to_vec()
    }

    #[test]
    fn every_position_gets_an_entry() {
        let vote = validate_submission(&catalog(), submission(&[("MAYOR", &["A"])])).unwrap();

        assert_eq!(vote.votes.len(), 3);
        assert_eq!(vote.votes["MAYOR"], vec!["A"]);
        assert!(vote.votes["VICE MAYOR"].is_empty());
        assert!(vote.votes[COUNCIL_POSITION].is_empty());
    }

    #[test]
    fn unknown_names_and_positions_are_dropped() {
        let vote = validate_submission(
            &catalog(),
            submission(&[("MAYOR", &["Nobody", "B"]), ("GOVERNOR", &["G1"])]),
        )
        .unwrap();

        assert_eq!(vote.votes["MAYOR"], vec!["B"]);
        assert!(!vote.votes.contains_key("GOVERNOR"));
    }

    #[test]
    fn unknown_names_do_not_count_toward_the_limit() {
        let vote = validate_submission(&catalog(), submission(&[("MAYOR", &["X", "A", "Y"])]))
            .unwrap();
        assert_eq!(vote.votes["MAYOR"], vec!["A"]);
    }

    #[test]
    fn repeated_names_collapse() {
        let vote =
            validate_submission(&catalog(), submission(&[("MAYOR", &["A", "A"])])).unwrap();
        assert_eq!(vote.votes["MAYOR"], vec!["A"]);
    }

    #[test]
    fn over_limit_names_the_position() {
        let err = validate_submission(&catalog(), submission(&[("MAYOR", &["A", "B"])]))
            .unwrap_err();
        assert_eq!(err.0, "Too many votes for MAYOR. Maximum is 1");

        let nine = councillors(9);
        let err =
            validate_submission(&catalog(), submission(&[(COUNCIL_POSITION, nine.as_slice())]))
                .unwrap_err();
        assert!(err.0.contains(COUNCIL_POSITION));
        assert!(err.0.contains("Maximum is 8"));
    }

    #[test]
    fn council_accepts_eight() {
        let eight = councillors(8);
        let vote =
            validate_submission(&catalog(), submission(&[(COUNCIL_POSITION, eight.as_slice())]))
                .unwrap();
        assert_eq!(vote.votes[COUNCIL_POSITION].len(), 8);
    }

    #[test]
    fn contact_number_format() {
        assert_eq!(
            validate_contact(Some("09171234567")).unwrap().as_deref(),
            Some("09171234567")
        );
        assert_eq!(validate_contact(None).unwrap(), None);
        assert_eq!(validate_contact(Some("  ")).unwrap(), None);

        for bad in [
            "0917abc4567",
            "0917123456",
            "091712345678",
            "+6391712345",
            " 09171234567 ",
            "09171234567\n",
        ] {
            assert!(validate_contact(Some(bad)).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn malformed_contact_fails_submission() {
        let mut sub = submission(&[("MAYOR", &["A"])]);
        sub.contact_number = Some("0917abc4567".to_string());
        let err = validate_submission(&catalog(), sub).unwrap_err();
        assert_eq!(err.0, "Contact number must be 11 digits");
    }

    #[test]
    fn barangay_must_be_known() {
        let mut sub = submission(&[]);
        sub.barangay = Some("Atlantis".to_string());
        assert!(validate_submission(&catalog(), sub).is_err());

        let mut sub = submission(&[]);
        sub.barangay = Some(String::new());
        assert_eq!(validate_submission(&catalog(), sub).unwrap().barangay, None);
    }

    #[test]
    fn voter_name_is_trimmed_and_bounded() {
        let mut sub = submission(&[]);
        sub.voter_name = "  Jose Rizal ".to_string();
        assert_eq!(validate_submission(&catalog(), sub).unwrap().voter_name, "Jose Rizal");

        let mut sub = submission(&[]);
        sub.voter_name = " J ".to_string();
        assert!(validate_submission(&catalog(), sub).is_err());

        let mut sub = submission(&[]);
        sub.voter_name = "x".repeat(101);
        assert!(validate_submission(&catalog(), sub).is_err());
    }
}
