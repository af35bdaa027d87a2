//! Exit codes.
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | General error (bad input, unreadable image, I/O, storage) |
//! | 2 | Corrupted index database |

use simian_core::StoreError;
use simian_storage::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CliExitCode {
    Success = 0,
    Error = 1,
    Corruption = 2,
}

impl From<CliExitCode> for i32 {
    fn from(code: CliExitCode) -> Self {
        code as i32
    }
}

/// True if `error` says the stored index cannot be trusted.
fn is_corruption(error: &(dyn std::error::Error + 'static)) -> bool {
    if let Some(store) = error.downcast_ref::<StoreError>() {
        return matches!(
            store,
            StoreError::Corrupted(_)
                | StoreError::KeyCollision { .. }
                | StoreError::InvalidNodeState { .. }
        );
    }
    matches!(
        error.downcast_ref::<StorageError>(),
        Some(StorageError::IndexCorrupted { .. })
    )
}

/// Exit code for a failed command, looking through the whole error chain.
pub fn exit_code_for_error(error: &anyhow::Error) -> CliExitCode {
    if error.chain().any(is_corruption) {
        CliExitCode::Corruption
    } else {
        CliExitCode::Error
    }
}
