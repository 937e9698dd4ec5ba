//! Pure mapping from [`StoreError`] variants to HTTP status codes.

use super::StoreError;

/// Maps a [`StoreError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `PreconditionFailed` -> 404 (the conditioned resource is absent)
/// - `IdGenerationExhausted` -> 503 (Service Unavailable, retryable)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
/// - `InvalidData` -> 400 (Bad Request)
pub fn store_error_to_status_code(error: &StoreError) -> u16 {
    match error {
        StoreError::NotFound { .. } => 404,
        StoreError::PreconditionFailed { .. } => 404,
        StoreError::IdGenerationExhausted { .. } => 503,
        StoreError::ConnectionFailed(_) => 503,
        StoreError::QueryFailed(_) => 500,
        StoreError::Serialization(_) => 500,
        StoreError::InvalidData(_) => 400,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = StoreError::NotFound {
            entity_type: "Order",
            id: "1234".to_string(),
        };
        assert_eq!(store_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_precondition_failed_maps_to_404() {
        let error = StoreError::PreconditionFailed {
            entity_type: "Shop",
            id: "9999".to_string(),
        };
        assert_eq!(store_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_id_generation_exhausted_maps_to_503() {
        let error = StoreError::IdGenerationExhausted { attempts: 10 };
        assert_eq!(store_error_to_status_code(&error), 503);
    }

    #[test]
    fn test_invalid_data_maps_to_400() {
        let error = StoreError::InvalidData("quantity is not a number".to_string());
        assert_eq!(store_error_to_status_code(&error), 400);
    }
}
