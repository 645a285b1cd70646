//! Setup payload model and the all-numeric manual pairing code.
//!
//! A [`SetupPayload`] holds the commissioning fields a person transcribes to
//! pair a device. [`ManualSetupPayloadGenerator`] packs the discriminator, PIN
//! and custom-flow flag into a zero-padded decimal string (optionally followed
//! by vendor and product id groups); [`ManualSetupPayloadParser`] reverses it
//! with the same bit offsets and widths.
//!
//! # Feature flags
//!
//! - **`serde`**: derives `Serialize`/`Deserialize` on [`SetupPayload`].

/// Error types for payload validation and manual code parsing.
pub mod error;
/// Manual code layout, generator, and parser.
pub mod manual_code;
/// The setup payload record and its field constraints.
pub mod payload;

pub use error::{InvalidField, SetupPayloadError};
pub use manual_code::{ManualCodeLayout, ManualSetupPayloadGenerator, ManualSetupPayloadParser};
pub use payload::SetupPayload;
