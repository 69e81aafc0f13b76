use thiserror::Error;

/// All errors that can occur in PlayerVaults.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Access errors ---
    #[error("Access denied: only {limit} vault page(s) available")]
    AccessDenied { limit: u32 },

    #[error("Not authorized to open another player's vault")]
    Unauthorized,

    #[error("Player '{0}' not found")]
    PlayerNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- Storage errors ---
    #[error("Stored vault data is corrupt: {0}")]
    Corrupt(String),

    #[error("Failed to write vault data: {0}")]
    WriteFailed(String),

    #[error("Failed to read vault data: {0}")]
    ReadFailed(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- Audit errors ---
    #[error("Audit error: {0}")]
    Audit(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- CLI errors ---
    /// A command reply refusal, shown to the user as is.
    #[error("{0}")]
    Refused(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for PlayerVaults results.
pub type Result<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refused_displays_reply_verbatim() {
        let msg = "You only have access to 2 vaults.";
        assert_eq!(VaultError::Refused(msg.into()).to_string(), msg);
    }

    #[test]
    fn access_denied_mentions_limit() {
        assert!(VaultError::AccessDenied { limit: 3 }.to_string().contains('3'));
    }
}
