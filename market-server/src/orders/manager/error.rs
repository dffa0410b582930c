use crate::db::StorageError;
use crate::orders::traits::OrderError;
use shared::error::{AppError, ErrorCode};
use shared::order::{CommandError, CommandErrorCode, OrderStatus};
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Gig not found: {0}")]
    GigNotFound(i64),

    #[error("Gig is not available for ordering: {0}")]
    GigNotListable(i64),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid package: {0}")]
    InvalidPackage(String),

    #[error("You cannot order your own gig")]
    SelfOrder,

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Cannot {action} an order in status {from}")]
    InvalidTransition {
        from: OrderStatus,
        action: &'static str,
    },

    #[error("Maximum revisions exceeded ({max})")]
    RevisionLimitReached { max: u32 },

    #[error("Review already left for order {0}")]
    ReviewAlreadyLeft(String),

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Could not allocate a unique order code")]
    OrderCodeExhausted,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Map a storage error to an error code
fn classify_storage_error(e: &StorageError) -> CommandErrorCode {
    if let StorageError::Serialization(_) = e {
        return CommandErrorCode::InternalError;
    }

    // redb errors are classified by message
    let err_str = e.to_string().to_lowercase();

    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
    {
        return CommandErrorCode::StorageFull;
    }

    if err_str.contains("out of memory") || err_str.contains("cannot allocate") {
        return CommandErrorCode::OutOfMemory;
    }

    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return CommandErrorCode::StorageCorrupted;
    }

    // Database/Transaction/Table/Storage/Commit errors
    CommandErrorCode::SystemBusy
}

impl From<ManagerError> for CommandError {
    fn from(err: ManagerError) -> Self {
        let message = err.to_string();
        let code = match err {
            ManagerError::Storage(e) => {
                let code = classify_storage_error(&e);
                tracing::error!(error = %e, error_code = ?code, "Storage error occurred");
                code
            }
            ManagerError::OrderNotFound(_) => CommandErrorCode::OrderNotFound,
            ManagerError::GigNotFound(_) => CommandErrorCode::GigNotFound,
            ManagerError::GigNotListable(_) => CommandErrorCode::GigNotListable,
            ManagerError::UserNotFound(_) => CommandErrorCode::UserNotFound,
            ManagerError::InvalidPackage(_) => CommandErrorCode::InvalidPackage,
            ManagerError::SelfOrder => CommandErrorCode::SelfOrder,
            ManagerError::NotAuthorized(_) => CommandErrorCode::NotAuthorized,
            ManagerError::InvalidTransition { .. } => CommandErrorCode::InvalidTransition,
            ManagerError::RevisionLimitReached { .. } => CommandErrorCode::RevisionLimitReached,
            ManagerError::ReviewAlreadyLeft(_) => CommandErrorCode::ReviewAlreadyLeft,
            ManagerError::InvalidRating(_) => CommandErrorCode::InvalidRating,
            ManagerError::InvalidInput(_) => CommandErrorCode::InvalidInput,
            ManagerError::OrderCodeExhausted => CommandErrorCode::OrderCodeExhausted,
            ManagerError::Internal(_) => CommandErrorCode::InternalError,
        };
        CommandError::new(code, message)
    }
}

impl From<OrderError> for ManagerError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::OrderNotFound(id) => ManagerError::OrderNotFound(id),
            OrderError::GigNotFound(id) => ManagerError::GigNotFound(id),
            OrderError::GigNotListable(id) => ManagerError::GigNotListable(id),
            OrderError::UserNotFound(id) => ManagerError::UserNotFound(id),
            OrderError::InvalidPackage(msg) => ManagerError::InvalidPackage(msg),
            OrderError::SelfOrder => ManagerError::SelfOrder,
            OrderError::NotAuthorized(msg) => ManagerError::NotAuthorized(msg),
            OrderError::InvalidTransition { from, action } => {
                ManagerError::InvalidTransition { from, action }
            }
            OrderError::RevisionLimitReached { max } => ManagerError::RevisionLimitReached { max },
            OrderError::ReviewAlreadyLeft(id) => ManagerError::ReviewAlreadyLeft(id),
            OrderError::InvalidRating(rating) => ManagerError::InvalidRating(rating),
            OrderError::InvalidInput(msg) => ManagerError::InvalidInput(msg),
            OrderError::OrderCodeExhausted => ManagerError::OrderCodeExhausted,
            OrderError::Storage(msg) => ManagerError::Internal(msg),
        }
    }
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        command_error_to_app_error(CommandError::from(err))
    }
}

/// API-facing rendering of a failed command
pub fn command_error_to_app_error(err: CommandError) -> AppError {
    let code = match err.code {
        CommandErrorCode::OrderNotFound => ErrorCode::OrderNotFound,
        CommandErrorCode::GigNotFound => ErrorCode::GigNotFound,
        CommandErrorCode::GigNotListable => ErrorCode::GigNotListable,
        CommandErrorCode::UserNotFound => ErrorCode::UserNotFound,
        CommandErrorCode::InvalidPackage => ErrorCode::InvalidPackageType,
        CommandErrorCode::SelfOrder => ErrorCode::SelfOrderNotAllowed,
        CommandErrorCode::NotAuthorized => ErrorCode::NotOrderParty,
        CommandErrorCode::InvalidTransition => ErrorCode::OrderStateConflict,
        CommandErrorCode::RevisionLimitReached => ErrorCode::RevisionLimitReached,
        CommandErrorCode::ReviewAlreadyLeft => ErrorCode::ReviewAlreadyLeft,
        CommandErrorCode::InvalidRating => ErrorCode::InvalidRating,
        CommandErrorCode::InvalidInput => ErrorCode::ValidationFailed,
        CommandErrorCode::OrderCodeExhausted => ErrorCode::OrderCodeExhausted,
        CommandErrorCode::InternalError => ErrorCode::InternalError,
        CommandErrorCode::StorageFull => ErrorCode::StorageFull,
        CommandErrorCode::OutOfMemory => ErrorCode::OutOfMemory,
        CommandErrorCode::StorageCorrupted => ErrorCode::StorageCorrupted,
        CommandErrorCode::SystemBusy => ErrorCode::SystemBusy,
    };
    AppError::with_message(code, err.message)
}

pub type ManagerResult<T> = Result<T, ManagerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_error_keeps_its_kind() {
        let err: ManagerError = OrderError::InvalidTransition {
            from: OrderStatus::Completed,
            action: "deliver",
        }
        .into();
        let cmd: CommandError = err.into();
        assert_eq!(cmd.code, CommandErrorCode::InvalidTransition);
        assert_eq!(cmd.message, "Cannot deliver an order in status completed");

        let app = command_error_to_app_error(cmd);
        assert_eq!(app.code, ErrorCode::OrderStateConflict);
        assert_eq!(app.http_status(), http::StatusCode::CONFLICT);
    }

    #[test]
    fn test_authorization_maps_to_forbidden() {
        let cmd: CommandError = ManagerError::NotAuthorized("not your order".to_string()).into();
        let app = command_error_to_app_error(cmd);
        assert_eq!(app.code, ErrorCode::NotOrderParty);
        assert_eq!(app.http_status(), http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_self_order_is_validation() {
        let app: AppError = ManagerError::SelfOrder.into();
        assert_eq!(app.code, ErrorCode::SelfOrderNotAllowed);
        assert_eq!(app.http_status(), http::StatusCode::BAD_REQUEST);
    }
}
