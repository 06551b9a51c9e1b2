//! Boundary coverage for the user validation rules.

use super::*;
use crate::test_support::FixtureClock;
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

const VALID_FIRST: &str = "Ada";
const VALID_LAST: &str = "Lovelace";
const VALID_USERNAME: &str = "ada1";
const VALID_DOB: &str = "1905-12-10";

#[fixture]
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
}

fn draft(first: &str, last: &str, username: &str, dob: &str) -> UserDraft {
    UserDraft::new(first, last, username, dob)
}

fn check(first: &str, last: &str, username: &str, dob: &str, today: NaiveDate) -> Result<UserFields, UserValidationError> {
    validate_user(&draft(first, last, username, dob), today)
}

#[rstest]
fn accepts_valid_draft(today: NaiveDate) {
    let fields = check(VALID_FIRST, VALID_LAST, VALID_USERNAME, VALID_DOB, today)
        .expect("valid draft");
    assert_eq!(fields.first_name(), VALID_FIRST);
    assert_eq!(fields.last_name(), VALID_LAST);
    assert_eq!(fields.username(), VALID_USERNAME);
    assert_eq!(
        fields.date_of_birth(),
        NaiveDate::from_ymd_opt(1905, 12, 10).expect("valid date")
    );
}

#[rstest]
#[case("   ", VALID_LAST, VALID_USERNAME, UserValidationError::BlankFirstName)]
#[case(VALID_FIRST, "", VALID_USERNAME, UserValidationError::BlankLastName)]
#[case(VALID_FIRST, VALID_LAST, "\t", UserValidationError::BlankUsername)]
fn rejects_blank_fields(
    today: NaiveDate,
    #[case] first: &str,
    #[case] last: &str,
    #[case] username: &str,
    #[case] expected: UserValidationError,
) {
    assert_eq!(check(first, last, username, VALID_DOB, today), Err(expected));
}

#[rstest]
fn blank_names_are_reported_before_malformed_dates(today: NaiveDate) {
    assert_eq!(
        check(" ", VALID_LAST, VALID_USERNAME, "not-a-date", today),
        Err(UserValidationError::BlankFirstName)
    );
}

#[rstest]
#[case("")]
#[case("1905/12/10")]
#[case("10-12-1905")]
#[case("1905-2-10")]
#[case("1905-02-30")]
#[case("1905-13-01")]
#[case(" 1905-12-10")]
#[case("1905-12-10T00:00:00Z")]
fn rejects_malformed_dates(today: NaiveDate, #[case] dob: &str) {
    let err = check(VALID_FIRST, VALID_LAST, VALID_USERNAME, dob, today)
        .expect_err("malformed date");
    assert_eq!(err, UserValidationError::MalformedDateOfBirth);
    assert!(err.is_parse_error());
}

#[rstest]
#[case("2024-06-01", true)]
#[case("2024-06-02", false)]
#[case("1900-01-01", true)]
#[case("1899-12-31", false)]
fn date_of_birth_boundaries(today: NaiveDate, #[case] dob: &str, #[case] accepted: bool) {
    let result = check(VALID_FIRST, VALID_LAST, VALID_USERNAME, dob, today);
    assert_eq!(result.is_ok(), accepted, "dob {dob}: {result:?}");
}

#[rstest]
fn future_and_early_dates_have_distinct_errors(today: NaiveDate) {
    assert_eq!(
        check(VALID_FIRST, VALID_LAST, VALID_USERNAME, "2024-06-02", today),
        Err(UserValidationError::DateOfBirthInFuture)
    );
    assert_eq!(
        check(VALID_FIRST, VALID_LAST, VALID_USERNAME, "1899-12-31", today),
        Err(UserValidationError::DateOfBirthTooEarly)
    );
}

#[rstest]
#[case(1, false)]
#[case(2, true)]
#[case(49, true)]
#[case(50, true)]
#[case(51, false)]
fn first_name_length_boundaries(today: NaiveDate, #[case] len: usize, #[case] accepted: bool) {
    let name = "a".repeat(len);
    let result = check(&name, VALID_LAST, VALID_USERNAME, VALID_DOB, today);
    match result {
        Ok(_) => assert!(accepted, "length {len} should be rejected"),
        Err(err) => {
            assert!(!accepted, "length {len} should be accepted");
            assert_eq!(
                err,
                UserValidationError::FirstNameLength {
                    min: NAME_MIN,
                    max: NAME_MAX
                }
            );
        }
    }
}

#[rstest]
#[case(1, false)]
#[case(2, true)]
#[case(50, true)]
#[case(51, false)]
fn last_name_length_boundaries(today: NaiveDate, #[case] len: usize, #[case] accepted: bool) {
    let name = "b".repeat(len);
    let result = check(VALID_FIRST, &name, VALID_USERNAME, VALID_DOB, today);
    assert_eq!(result.is_ok(), accepted);
    if !accepted {
        assert!(matches!(
            result,
            Err(UserValidationError::LastNameLength { .. })
        ));
    }
}

#[rstest]
#[case(2, false)]
#[case(3, true)]
#[case(16, true)]
#[case(17, false)]
fn username_length_boundaries(today: NaiveDate, #[case] len: usize, #[case] accepted: bool) {
    let username = "u".repeat(len);
    let result = check(VALID_FIRST, VALID_LAST, &username, VALID_DOB, today);
    assert_eq!(result.is_ok(), accepted);
    if !accepted {
        assert_eq!(
            result,
            Err(UserValidationError::UsernameLength {
                min: USERNAME_MIN,
                max: USERNAME_MAX
            })
        );
    }
}

#[rstest]
fn lengths_count_characters_not_bytes(today: NaiveDate) {
    let name = "é".repeat(NAME_MAX);
    assert!(name.len() > NAME_MAX);
    assert!(check(&name, VALID_LAST, VALID_USERNAME, VALID_DOB, today).is_ok());
}

#[rstest]
#[case("ada_1")]
#[case("ada 1")]
#[case("ada-1")]
#[case("ada!")]
fn rejects_non_alphanumeric_usernames(today: NaiveDate, #[case] username: &str) {
    assert_eq!(
        check(VALID_FIRST, VALID_LAST, username, VALID_DOB, today),
        Err(UserValidationError::UsernameNotAlphanumeric)
    );
}

#[rstest]
#[case("Zoë")]
#[case("Łukasz")]
#[case("Юлия")]
fn accepts_unicode_letters_in_names(today: NaiveDate, #[case] first: &str) {
    assert!(check(first, VALID_LAST, VALID_USERNAME, VALID_DOB, today).is_ok());
}

#[rstest]
fn accepts_unicode_alphanumeric_username(today: NaiveDate) {
    assert!(check(VALID_FIRST, VALID_LAST, "Zoë2024", VALID_DOB, today).is_ok());
}

#[rstest]
#[case("Ada1", VALID_LAST, UserValidationError::FirstNameNotLetters)]
#[case("Ada Mary", VALID_LAST, UserValidationError::FirstNameNotLetters)]
#[case("O'Brien", VALID_LAST, UserValidationError::FirstNameNotLetters)]
#[case(VALID_FIRST, "Love-lace", UserValidationError::LastNameNotLetters)]
#[case(VALID_FIRST, "Lovelace2", UserValidationError::LastNameNotLetters)]
fn rejects_names_with_non_letters(
    today: NaiveDate,
    #[case] first: &str,
    #[case] last: &str,
    #[case] expected: UserValidationError,
) {
    assert_eq!(check(first, last, VALID_USERNAME, VALID_DOB, today), Err(expected));
}

#[rstest]
fn username_rule_precedes_name_letter_rule(today: NaiveDate) {
    assert_eq!(
        check("Ada1", VALID_LAST, "ada_1", VALID_DOB, today),
        Err(UserValidationError::UsernameNotAlphanumeric)
    );
}

#[rstest]
fn surrounding_whitespace_is_trimmed(today: NaiveDate) {
    let fields = check("  Ada ", " Lovelace", "ada1  ", VALID_DOB, today).expect("valid draft");
    assert_eq!(fields.first_name(), "Ada");
    assert_eq!(fields.last_name(), "Lovelace");
    assert_eq!(fields.username(), "ada1");
}

#[rstest]
#[case(UserValidationError::BlankUsername, UserField::Username, "blank")]
#[case(UserValidationError::MalformedDateOfBirth, UserField::DateOfBirth, "malformed_date")]
#[case(UserValidationError::LastNameNotLetters, UserField::LastName, "not_letters")]
fn errors_expose_field_and_code(
    #[case] err: UserValidationError,
    #[case] field: UserField,
    #[case] code: &str,
) {
    assert_eq!(err.field(), field);
    assert_eq!(err.code(), code);
}

#[rstest]
fn messages_match_client_contract() {
    assert_eq!(
        UserValidationError::UsernameLength {
            min: USERNAME_MIN,
            max: USERNAME_MAX
        }
        .to_string(),
        "username must be between 3 and 16 characters"
    );
    assert_eq!(
        UserValidationError::DateOfBirthTooEarly.to_string(),
        "date of birth cannot be before January 1, 1900"
    );
}

#[rstest]
fn validator_reads_today_from_clock() {
    let now = Utc
        .with_ymd_and_hms(2024, 6, 1, 23, 59, 0)
        .single()
        .expect("valid timestamp");
    let validator = UserValidator::new(Arc::new(FixtureClock::new(now)));

    assert!(validator
        .validate(&draft(VALID_FIRST, VALID_LAST, VALID_USERNAME, "2024-06-01"))
        .is_ok());
    assert_eq!(
        validator.validate(&draft(VALID_FIRST, VALID_LAST, VALID_USERNAME, "2024-06-02")),
        Err(UserValidationError::DateOfBirthInFuture)
    );
}
