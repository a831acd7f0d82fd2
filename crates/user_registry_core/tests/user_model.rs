use user_registry_core::{
    normalize_email, normalize_name, UserCandidate, UserRecord, UserValidationError,
    NAME_MAX_CHARS, NAME_MIN_CHARS,
};

fn candidate(name: &str, email: &str) -> UserCandidate {
    UserCandidate::new(name, email, None)
}

#[test]
fn valid_candidate_passes() {
    let candidate = UserCandidate::new("Juan Pérez", " Juan@Example.com ", Some("555-1234".into()));
    assert_eq!(candidate.validate(), Ok(()));
}

#[test]
fn empty_candidate_is_rejected_first() {
    assert_eq!(
        UserCandidate::default().validate(),
        Err(UserValidationError::EmptyCandidate)
    );
}

#[test]
fn phone_alone_is_not_an_empty_candidate() {
    let candidate = UserCandidate {
        phone: Some("555".to_string()),
        ..UserCandidate::default()
    };
    assert_eq!(candidate.validate(), Err(UserValidationError::MissingName));
}

#[test]
fn blank_or_missing_fields_are_rejected() {
    assert_eq!(
        candidate(" \t ", "a@b.co").validate(),
        Err(UserValidationError::MissingName)
    );
    assert_eq!(
        candidate("Valid", "   ").validate(),
        Err(UserValidationError::MissingEmail)
    );
    let no_email = UserCandidate {
        name: Some("Valid".to_string()),
        ..UserCandidate::default()
    };
    assert_eq!(no_email.validate(), Err(UserValidationError::MissingEmail));
}

#[test]
fn email_needs_at_sign_and_dot() {
    for email in ["userexample.com", "user@example", "plain"] {
        assert_eq!(
            candidate("Valid", email).validate(),
            Err(UserValidationError::InvalidEmailFormat),
            "{email}"
        );
    }
    assert_eq!(candidate("Valid", "a.b@c").validate(), Ok(()));
}

#[test]
fn name_length_bounds_apply_to_trimmed_name() {
    let shortest = "x".repeat(NAME_MIN_CHARS);
    let longest = "x".repeat(NAME_MAX_CHARS);
    assert_eq!(candidate(&shortest, "a@b.co").validate(), Ok(()));
    assert_eq!(
        candidate(&format!("  {longest}  "), "a@b.co").validate(),
        Ok(())
    );

    assert_eq!(
        candidate(" x ", "a@b.co").validate(),
        Err(UserValidationError::NameTooShort { len: 1 })
    );
    assert_eq!(
        candidate(&"x".repeat(NAME_MAX_CHARS + 1), "a@b.co").validate(),
        Err(UserValidationError::NameTooLong { len: 101 })
    );
}

#[test]
fn validation_does_not_modify_candidate() {
    let candidate = candidate("  Padded  ", " MIXED@Case.com ");
    let before = candidate.clone();
    candidate.validate().unwrap();
    assert_eq!(candidate, before);
}

#[test]
fn normalization_helpers_trim_and_lowercase() {
    assert_eq!(normalize_name("  Juan Pérez "), "Juan Pérez");
    assert_eq!(normalize_email(" Juan@Example.com "), "juan@example.com");
}

#[test]
fn record_serialization_uses_expected_wire_fields() {
    let record = UserRecord {
        id: Some(1),
        name: "Juan Pérez".to_string(),
        email: "juan@example.com".to_string(),
        phone: None,
    };

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["name"], "Juan Pérez");
    assert_eq!(json["email"], "juan@example.com");
    assert!(json["phone"].is_null());

    let decoded: UserRecord = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}
