use diesel::r2d2::PoolError;
use validator::ValidationErrors;

use crate::data::models::WordError;

impl From<ValidationErrors> for WordError {
    fn from(err: ValidationErrors) -> Self {
        WordError::ValidationError(err.to_string())
    }
}

impl From<PoolError> for WordError {
    fn from(err: PoolError) -> Self {
        WordError::PoolError(err.to_string())
    }
}
