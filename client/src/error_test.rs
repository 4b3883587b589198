use super::*;

#[test]
fn status_error_formats_code() {
    assert_eq!(ApiError::Status { status: 503 }.to_string(), "request failed: 503");
}

#[test]
fn unauthorized_is_flagged() {
    assert!(ApiError::Unauthorized.is_unauthorized());
    assert!(!ApiError::Network("offline".to_owned()).is_unauthorized());
}

#[test]
fn storage_remove_error_names_key() {
    let err = StorageError::Remove { key: "adminAuth".to_owned() };
    assert_eq!(err.to_string(), "failed to remove `adminAuth`");
}

#[test]
fn storage_write_error_names_key() {
    let err = StorageError::Write { key: "auth".to_owned() };
    assert_eq!(err.to_string(), "failed to write `auth`");
}
