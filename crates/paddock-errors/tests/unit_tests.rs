//! Unit tests for all error variants.
//!
//! Tests Display implementations, std::error::Error implementations,
//! and From conversions.

use paddock_errors::{
    DecodeError, ErrorCategory, ErrorSeverity, PaddockError, StoreError, ValidationError,
};

mod store_error_tests {
    use super::*;

    #[test]
    fn test_all_variants_display() {
        let variants: Vec<StoreError> = vec![
            StoreError::Connect {
                addr: "127.0.0.1:6379".to_string(),
                reason: "refused".to_string(),
            },
            StoreError::Io(std::io::Error::other("broken pipe")),
            StoreError::Timeout { timeout_ms: 500 },
            StoreError::ConnectionClosed { pending: 3 },
            StoreError::command("SMEMBERS", "ERR oops"),
            StoreError::protocol("unexpected frame"),
            StoreError::Unavailable("offline".to_string()),
        ];

        for variant in variants {
            let msg = variant.to_string();
            assert!(!msg.is_empty(), "StoreError variant should have display message");
            let _: &dyn std::error::Error = &variant;
        }
    }

    #[test]
    fn test_connect_is_critical() {
        let err = StoreError::Connect {
            addr: "redis:6379".to_string(),
            reason: "dns".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.to_string().contains("redis:6379"));
    }
}

mod decode_error_tests {
    use super::*;

    #[test]
    fn test_field_accessor() {
        assert_eq!(
            DecodeError::invalid_integer("max_pilots", "twelve").field(),
            Some("max_pilots")
        );
        assert_eq!(
            DecodeError::invalid_timestamp("start_date", "soon").field(),
            Some("start_date")
        );
        assert_eq!(
            DecodeError::invalid_document("sponsors", "EOF").field(),
            Some("sponsors")
        );
        let scalar = DecodeError::InvalidScalar {
            key: "club:7".to_string(),
            reason: "EOF".to_string(),
        };
        assert_eq!(scalar.field(), None);
    }

    #[test]
    fn test_decode_is_warning() {
        let err = DecodeError::invalid_integer("order", "x");
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(err.category(), ErrorCategory::Decode);
        assert!(err.to_string().contains("'x'"));
    }
}

mod paddock_error_tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        let err: PaddockError = StoreError::Timeout { timeout_ms: 1 }.into();
        assert!(matches!(err, PaddockError::Store(_)));

        let err: PaddockError = ValidationError::required("id").into();
        assert!(matches!(err, PaddockError::InvalidInput(_)));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(PaddockError::not_found("season", "S9").status_code(), 404);
        assert_eq!(
            PaddockError::from(ValidationError::too_long("id", 200, 128)).status_code(),
            400
        );
        assert_eq!(
            PaddockError::from(StoreError::ConnectionClosed { pending: 1 }).status_code(),
            500
        );
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::NotFound.to_string(), "NotFound");
        assert_eq!(ErrorCategory::Transient.to_string(), "Transient");
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
    }
}
