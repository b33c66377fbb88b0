//! Error types for the Ember emission engine.
use thiserror::Error;

use crate::types::Address;

/// Failures reported by the reward-token minting collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MintError {
    #[error("not a minter: {0}")] NotMinter(Address),
    #[error("mint rejected: {0}")] Rejected(String),
}

/// Failures reported by the pool registry collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown pool: {0}")] UnknownPool(Address),
    #[error("registry backend: {0}")] Backend(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid hex")] InvalidHex,
    #[error("invalid length: {0}")] InvalidLength(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmissionError {
    #[error("unauthorized caller: {0}")] Unauthorized(Address),
    #[error("router already allowed: {0}")] AlreadyAllowed(Address),
    #[error("router not allowed: {0}")] NotAllowed(Address),
    #[error("minter not authorized: {0}")] MinterNotAuthorized(Address),
    #[error("upstream pool registry not configured")] UpstreamNotConfigured,
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error("mint failed: {0}")] Mint(String),
    #[error(transparent)] Registry(#[from] RegistryError),
    #[error("storage: {0}")] Storage(String),
    #[error("config: {0}")] Config(String),
}

impl From<MintError> for EmissionError {
    fn from(err: MintError) -> Self {
        match err {
            MintError::NotMinter(minter) => Self::MinterNotAuthorized(minter),
            MintError::Rejected(reason) => Self::Mint(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_minter_maps_to_minter_not_authorized() {
        let who = Address::from_bytes([7; 20]);
        let err: EmissionError = MintError::NotMinter(who).into();
        assert_eq!(err, EmissionError::MinterNotAuthorized(who));
    }

    #[test]
    fn rejected_mint_keeps_reason() {
        let err: EmissionError = MintError::Rejected("cap reached".into()).into();
        assert_eq!(err.to_string(), "mint failed: cap reached");
    }

    #[test]
    fn registry_error_is_transparent() {
        let err: EmissionError = RegistryError::Backend("offline".into()).into();
        assert_eq!(err.to_string(), "registry backend: offline");
    }
}
