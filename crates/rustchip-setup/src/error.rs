use thiserror::Error;

/// The first payload field that keeps a payload from being encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidField {
    #[error("setup PIN code {0} does not fit the PIN field")]
    SetupPinCodeOutOfRange(u32),
    #[error("setup PIN code {0} is reserved")]
    ReservedSetupPinCode(u32),
    #[error("discriminator {0} does not fit the discriminator field")]
    DiscriminatorOutOfRange(u16),
    #[error("custom flow requires a non-zero vendor id")]
    MissingVendorId,
    #[error("custom flow requires a non-zero product id")]
    MissingProductId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetupPayloadError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidField),
    #[error("invalid manual code layout: {0}")]
    InvalidLayout(&'static str),
    #[error("manual code has {actual} digits, expected {short} or {long}")]
    InvalidCodeLength {
        actual: usize,
        short: usize,
        long: usize,
    },
    #[error("manual code has a non-digit character at position {position}")]
    InvalidCharacter { position: usize },
    #[error("custom flow bit does not match manual code length")]
    CustomFlowMismatch,
    #[error("manual code {group} group is out of range")]
    GroupOutOfRange { group: &'static str },
}
