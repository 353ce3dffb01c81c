//! Derived identifiers.
//!
//! All identifiers are pure functions of the analysis, the authority and the
//! clock year, so they come out the same for every document of one run.

use crate::package::constants::default;
use sha2::{Digest, Sha256};

/// Program token taken from the last segment of the work identifier.
///
/// A leading `Prg` is stripped (ignoring ASCII case); an absent or empty
/// segment yields `fallback`.
///
/// # Examples
///
/// ```rust
/// use stoppack::scenario::program_token;
///
/// assert_eq!(program_token(Some("/akn/nl/act/gm0001/2025/PrgClimate"), "Programma"), "Climate");
/// assert_eq!(program_token(None, "Programma"), "Programma");
/// ```
pub fn program_token(work_id: Option<&str>, fallback: &str) -> String {
    let segment = work_id
        .map(|id| id.trim().trim_end_matches('/'))
        .and_then(|id| id.rsplit('/').next())
        .unwrap_or_default()
        .trim();

    let prefix = default::PROGRAM_PREFIX;
    let stripped = match segment.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &segment[prefix.len()..],
        _ => segment,
    };

    if stripped.is_empty() {
        fallback.to_string()
    } else {
        stripped.to_string()
    }
}

/// Goal of a publication or validation: the program's planning period.
pub fn publication_goal(authority: &str, program: &str, year: i32) -> String {
    format!(
        "/join/id/proces/{authority}/{year}/Prog{program}PPD{year}{}",
        year + 4
    )
}

/// Goal of a withdrawal.
pub fn withdrawal_goal(authority: &str, program: &str, year: i32) -> String {
    format!("/join/id/proces/{authority}/{year}/Intrekking{program}{year}")
}

/// Goal of a hand-over.
pub fn hand_over_goal(authority: &str, program: &str, year: i32) -> String {
    format!("/join/id/proces/{authority}/{year}/Doorlevering{program}{year}")
}

/// Six-digit pseudo-identifier of a work.
///
/// The first three bytes of the SHA-256 digest of the work identifier are
/// read as a big-endian 24-bit integer and reduced modulo one million. An
/// empty work identifier yields `000000`.
pub fn pseudo_code(work_id: &str) -> String {
    if work_id.is_empty() {
        return "000000".to_string();
    }
    let digest = Sha256::digest(work_id.as_bytes());
    let value = (u32::from(digest[0]) << 16) | (u32::from(digest[1]) << 8) | u32::from(digest[2]);
    format!("{:06}", value % 1_000_000)
}

/// Identifier of the regulation in consolidated state.
pub fn consolidation_id(authority: &str, year: i32, code: &str) -> String {
    format!("/akn/nl/act/{authority}/{year}/CONS{code}")
}

/// Work identifier of the decision generated for a run.
pub fn decision_work(authority: &str, year: i32, label: &str, program: &str) -> String {
    format!("/akn/nl/bill/{authority}/{year}/{label}{program}")
}

/// Expression identifier of a work at `date` (ISO format).
pub fn expression_at(work: &str, date: &str) -> String {
    format!("{work}/nld@{date}")
}

/// Authority path in the tooi vocabulary.
pub fn authority_path(kind: &str, code: &str) -> String {
    format!("/tooi/id/{kind}/{code}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_publication_goal_example() {
        let program = program_token(Some("/akn/nl/act/GM0001/2025/PrgClimate"), "Programma");
        assert_eq!(
            publication_goal("GM0001", &program, 2025),
            "/join/id/proces/GM0001/2025/ProgClimatePPD20252029"
        );
    }

    #[test]
    fn test_program_token_variants() {
        assert_eq!(program_token(Some("/akn/nl/act/gm1/2025/prgWater/"), "P"), "Water");
        assert_eq!(program_token(Some("/akn/nl/act/gm1/2025/Klimaat"), "P"), "Klimaat");
        assert_eq!(program_token(Some("/akn/nl/act/gm1/2025/Prg"), "P"), "P");
        assert_eq!(program_token(Some(""), "Programma"), "Programma");
        assert_eq!(program_token(Some("Pr"), "P"), "Pr");
    }

    #[test]
    fn test_withdrawal_and_hand_over_goals() {
        assert_eq!(
            withdrawal_goal("gm0001", "Climate", 2025),
            "/join/id/proces/gm0001/2025/IntrekkingClimate2025"
        );
        assert_eq!(
            hand_over_goal("gm0001", "Climate", 2026),
            "/join/id/proces/gm0001/2026/DoorleveringClimate2026"
        );
    }

    #[test]
    fn test_pseudo_code_of_empty_work() {
        assert_eq!(pseudo_code(""), "000000");
    }

    #[test]
    fn test_pseudo_code_known_value() {
        // SHA-256("abc") starts with ba 78 16: 0xba7816 = 12220438
        assert_eq!(pseudo_code("abc"), "220438");
    }

    #[test]
    fn test_consolidation_id() {
        assert_eq!(
            consolidation_id("gm0001", 2025, "220438"),
            "/akn/nl/act/gm0001/2025/CONS220438"
        );
    }

    proptest! {
        #[test]
        fn prop_pseudo_code_is_stable_six_digits(work in ".{1,64}") {
            let code = pseudo_code(&work);
            prop_assert_eq!(code.len(), 6);
            prop_assert!(code.chars().all(|c| c.is_ascii_digit()));
            prop_assert_eq!(code, pseudo_code(&work));
        }
    }
}
