//! Error conversion implementations.
//!
//! This module contains From trait implementations for third-party error
//! types that do not map onto a single variant through `#[from]`.

use super::types::Error;

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlError(format!("attribute error: {err}"))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Utf8Error(err.utf8_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_utf8_error_maps_to_utf8_variant() {
        let err = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::Utf8Error(_)));
    }

    #[test]
    fn test_precondition_classification() {
        assert!(Error::MissingAuthority.is_precondition());
        assert!(Error::InputNotFound("a.zip".into()).is_precondition());
        assert!(!Error::XmlError("bad".into()).is_precondition());
    }
}
