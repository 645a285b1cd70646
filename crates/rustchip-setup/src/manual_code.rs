//! Manual pairing code generation and parsing.
//!
//! The short group packs, low bits first: the custom-flow flag (1 bit), the
//! setup PIN code (`pin_bits`), and the discriminator (`discriminator_bits`).
//! It is rendered as a zero-padded decimal of `short_code_digits` digits. When
//! custom flow is required, the vendor id and product id follow as their own
//! zero-padded groups, with no separators.

use core::fmt::Write;

use crate::error::SetupPayloadError;
use crate::payload::{
    SetupPayload, CUSTOM_FLOW_REQUIRED_FIELD_LENGTH_IN_BITS,
    MANUAL_SETUP_DISCRIMINATOR_FIELD_LENGTH_IN_BITS, MANUAL_SETUP_PRODUCT_ID_CHAR_LENGTH,
    MANUAL_SETUP_SHORT_CODE_CHAR_LENGTH, MANUAL_SETUP_VENDOR_ID_CHAR_LENGTH,
    SETUP_PIN_CODE_FIELD_LENGTH_IN_BITS,
};

const fn decimal_digits(mut value: u64) -> usize {
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}

/// Bit widths and digit counts of a manual code.
///
/// Only layouts whose largest packed value fits the short group, and whose
/// id groups can hold any `u16`, can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualCodeLayout {
    pin_bits: u32,
    discriminator_bits: u32,
    short_code_digits: usize,
    vendor_id_digits: usize,
    product_id_digits: usize,
}

const _: () = assert!(ManualCodeLayout::STANDARD.check().is_none());

impl ManualCodeLayout {
    pub const STANDARD: Self = Self {
        pin_bits: SETUP_PIN_CODE_FIELD_LENGTH_IN_BITS,
        discriminator_bits: MANUAL_SETUP_DISCRIMINATOR_FIELD_LENGTH_IN_BITS,
        short_code_digits: MANUAL_SETUP_SHORT_CODE_CHAR_LENGTH,
        vendor_id_digits: MANUAL_SETUP_VENDOR_ID_CHAR_LENGTH,
        product_id_digits: MANUAL_SETUP_PRODUCT_ID_CHAR_LENGTH,
    };

    pub const fn new(
        pin_bits: u32,
        discriminator_bits: u32,
        short_code_digits: usize,
        vendor_id_digits: usize,
        product_id_digits: usize,
    ) -> Result<Self, SetupPayloadError> {
        let layout = Self {
            pin_bits,
            discriminator_bits,
            short_code_digits,
            vendor_id_digits,
            product_id_digits,
        };
        match layout.check() {
            Some(reason) => Err(SetupPayloadError::InvalidLayout(reason)),
            None => Ok(layout),
        }
    }

    const fn check(&self) -> Option<&'static str> {
        if self.pin_bits == 0 || self.pin_bits > u32::BITS {
            return Some("PIN field must be 1 to 32 bits");
        }
        if self.discriminator_bits == 0 || self.discriminator_bits > u16::BITS {
            return Some("discriminator field must be 1 to 16 bits");
        }
        if decimal_digits(self.max_short_value()) > self.short_code_digits {
            return Some("short group cannot hold the packed fields");
        }
        if decimal_digits(u16::MAX as u64) > self.vendor_id_digits {
            return Some("vendor id group cannot hold a 16-bit id");
        }
        if decimal_digits(u16::MAX as u64) > self.product_id_digits {
            return Some("product id group cannot hold a 16-bit id");
        }
        None
    }

    pub const fn pin_bits(&self) -> u32 {
        self.pin_bits
    }

    pub const fn discriminator_bits(&self) -> u32 {
        self.discriminator_bits
    }

    pub const fn short_code_digits(&self) -> usize {
        self.short_code_digits
    }

    pub const fn vendor_id_digits(&self) -> usize {
        self.vendor_id_digits
    }

    pub const fn product_id_digits(&self) -> usize {
        self.product_id_digits
    }

    /// Length of a code carrying vendor and product id groups.
    pub const fn long_code_digits(&self) -> usize {
        self.short_code_digits + self.vendor_id_digits + self.product_id_digits
    }

    const fn packed_bits(&self) -> u32 {
        CUSTOM_FLOW_REQUIRED_FIELD_LENGTH_IN_BITS + self.pin_bits + self.discriminator_bits
    }

    const fn max_short_value(&self) -> u64 {
        (1u64 << self.packed_bits()) - 1
    }
}

impl Default for ManualCodeLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

fn short_payload_representation(payload: &SetupPayload, layout: &ManualCodeLayout) -> u64 {
    let mut offset = 0;
    let mut result = u64::from(payload.requires_custom_flow);
    offset += CUSTOM_FLOW_REQUIRED_FIELD_LENGTH_IN_BITS;

    result |= u64::from(payload.setup_pin_code) << offset;
    offset += layout.pin_bits();

    result |= u64::from(payload.discriminator) << offset;
    result
}

fn push_padded(out: &mut String, number: u64, width: usize) {
    // Writing into a String cannot fail.
    let _ = write!(out, "{number:0width$}");
}

/// Renders a [`SetupPayload`] as a manual pairing code.
#[derive(Debug, Clone)]
pub struct ManualSetupPayloadGenerator {
    payload: SetupPayload,
    layout: ManualCodeLayout,
}

impl ManualSetupPayloadGenerator {
    pub fn new(payload: SetupPayload) -> Self {
        Self::with_layout(payload, ManualCodeLayout::STANDARD)
    }

    pub fn with_layout(payload: SetupPayload, layout: ManualCodeLayout) -> Self {
        Self { payload, layout }
    }

    /// The full digit string, or `InvalidArgument` if the payload does not
    /// validate. No partial string is produced on failure.
    pub fn payload_decimal_string_representation(&self) -> Result<String, SetupPayloadError> {
        if let Err(field) = self.payload.validate_manual_code(&self.layout) {
            log::error!("failed encoding invalid payload: {field}");
            return Err(field.into());
        }

        let short = short_payload_representation(&self.payload, &self.layout);
        let mut code = String::with_capacity(self.layout.long_code_digits());
        push_padded(&mut code, short, self.layout.short_code_digits());

        if self.payload.requires_custom_flow {
            push_padded(
                &mut code,
                u64::from(self.payload.vendor_id),
                self.layout.vendor_id_digits(),
            );
            push_padded(
                &mut code,
                u64::from(self.payload.product_id),
                self.layout.product_id_digits(),
            );
        }
        Ok(code)
    }
}

/// Decodes a manual pairing code back into a [`SetupPayload`].
#[derive(Debug, Clone)]
pub struct ManualSetupPayloadParser<'a> {
    code: &'a str,
    layout: ManualCodeLayout,
}

impl<'a> ManualSetupPayloadParser<'a> {
    pub fn new(code: &'a str) -> Self {
        Self::with_layout(code, ManualCodeLayout::STANDARD)
    }

    pub fn with_layout(code: &'a str, layout: ManualCodeLayout) -> Self {
        Self { code, layout }
    }

    pub fn populate_payload(&self) -> Result<SetupPayload, SetupPayloadError> {
        let result = self.parse();
        if let Err(err) = &result {
            log::debug!("rejecting manual code: {err}");
        }
        result
    }

    fn parse(&self) -> Result<SetupPayload, SetupPayloadError> {
        let layout = &self.layout;
        if let Some(position) = self.code.bytes().position(|b| !b.is_ascii_digit()) {
            return Err(SetupPayloadError::InvalidCharacter { position });
        }

        let short_len = layout.short_code_digits();
        let long_len = layout.long_code_digits();
        let has_ids = match self.code.len() {
            len if len == short_len => false,
            len if len == long_len => true,
            actual => {
                return Err(SetupPayloadError::InvalidCodeLength {
                    actual,
                    short: short_len,
                    long: long_len,
                })
            }
        };

        let short = self.code[..short_len]
            .parse::<u64>()
            .ok()
            .filter(|v| *v <= layout.max_short_value())
            .ok_or(SetupPayloadError::GroupOutOfRange { group: "short" })?;

        let requires_custom_flow = short & 1 == 1;
        if requires_custom_flow != has_ids {
            return Err(SetupPayloadError::CustomFlowMismatch);
        }

        let mut offset = CUSTOM_FLOW_REQUIRED_FIELD_LENGTH_IN_BITS;
        let pin_mask = (1u64 << layout.pin_bits()) - 1;
        let setup_pin_code = ((short >> offset) & pin_mask) as u32;
        offset += layout.pin_bits();
        let discriminator_mask = (1u64 << layout.discriminator_bits()) - 1;
        let discriminator = ((short >> offset) & discriminator_mask) as u16;

        let mut payload = SetupPayload {
            requires_custom_flow,
            setup_pin_code,
            discriminator,
            ..SetupPayload::default()
        };

        if has_ids {
            let vendor_end = short_len + layout.vendor_id_digits();
            payload.vendor_id = parse_id_group(&self.code[short_len..vendor_end], "vendor id")?;
            payload.product_id = parse_id_group(&self.code[vendor_end..], "product id")?;
        }

        payload.validate_manual_code(layout)?;
        Ok(payload)
    }
}

fn parse_id_group(digits: &str, group: &'static str) -> Result<u16, SetupPayloadError> {
    digits
        .parse()
        .map_err(|_| SetupPayloadError::GroupOutOfRange { group })
}

#[cfg(test)]
mod tests {
    use super::{
        decimal_digits, push_padded, short_payload_representation, ManualCodeLayout,
        ManualSetupPayloadGenerator, ManualSetupPayloadParser,
    };
    use crate::error::{InvalidField, SetupPayloadError};
    use crate::payload::SetupPayload;
    use proptest::prelude::*;

    #[test]
    fn counts_decimal_digits() {
        assert_eq!(decimal_digits(0), 1);
        assert_eq!(decimal_digits(9), 1);
        assert_eq!(decimal_digits(10), 2);
        assert_eq!(decimal_digits(u32::MAX as u64), 10);
        assert_eq!(decimal_digits(u64::MAX), 20);
    }

    #[test]
    fn padded_groups_append_in_place() {
        let mut out = String::from("12");
        push_padded(&mut out, 7, 5);
        push_padded(&mut out, 123_456, 3);
        assert_eq!(out, "1200007123456");
    }

    #[test]
    fn standard_layout_fills_thirty_two_bits() {
        let layout = ManualCodeLayout::STANDARD;
        assert_eq!(layout.max_short_value(), u32::MAX as u64);
        assert_eq!(layout.long_code_digits(), 20);
        assert_eq!(ManualCodeLayout::default(), layout);
    }

    #[test]
    fn packs_fields_low_bits_first() {
        let payload = SetupPayload {
            requires_custom_flow: true,
            setup_pin_code: 0b101,
            discriminator: 0b11,
            ..SetupPayload::default()
        };
        let packed = short_payload_representation(&payload, &ManualCodeLayout::STANDARD);
        assert_eq!(packed, 1 | (0b101 << 1) | (0b11 << 28));
    }

    #[test]
    fn rejects_layouts_that_overflow_their_digits() {
        assert_eq!(
            ManualCodeLayout::new(27, 12, 11, 5, 5).unwrap_err(),
            SetupPayloadError::InvalidLayout("short group cannot hold the packed fields")
        );
        assert!(ManualCodeLayout::new(27, 12, 13, 5, 5).is_ok());
        assert!(ManualCodeLayout::new(27, 4, 10, 4, 5).is_err());
        assert!(ManualCodeLayout::new(0, 4, 10, 5, 5).is_err());
        assert!(ManualCodeLayout::new(27, 17, 30, 5, 5).is_err());
    }

    #[test]
    fn failed_encoding_produces_no_string() {
        let payload = SetupPayload {
            setup_pin_code: 20_202_021,
            discriminator: 16,
            ..SetupPayload::default()
        };
        let generator = ManualSetupPayloadGenerator::new(payload);
        assert_eq!(
            generator.payload_decimal_string_representation(),
            Err(SetupPayloadError::InvalidArgument(
                InvalidField::DiscriminatorOutOfRange(16)
            ))
        );
    }

    #[test]
    fn parser_rejects_malformed_codes() {
        assert_eq!(
            ManualSetupPayloadParser::new("12345").populate_payload(),
            Err(SetupPayloadError::InvalidCodeLength {
                actual: 5,
                short: 10,
                long: 20,
            })
        );
        assert_eq!(
            ManualSetupPayloadParser::new("40669358a2").populate_payload(),
            Err(SetupPayloadError::InvalidCharacter { position: 8 })
        );
        assert_eq!(
            ManualSetupPayloadParser::new("9999999999").populate_payload(),
            Err(SetupPayloadError::GroupOutOfRange { group: "short" })
        );
        // custom flow bit set but no id groups
        assert_eq!(
            ManualSetupPayloadParser::new("4066935883").populate_payload(),
            Err(SetupPayloadError::CustomFlowMismatch)
        );
        assert_eq!(
            ManualSetupPayloadParser::new("40669358839999920043").populate_payload(),
            Err(SetupPayloadError::GroupOutOfRange { group: "vendor id" })
        );
        assert_eq!(
            ManualSetupPayloadParser::new("0000000000").populate_payload(),
            Err(SetupPayloadError::InvalidArgument(
                InvalidField::ReservedSetupPinCode(0)
            ))
        );
    }

    proptest! {
        #[test]
        fn parser_inverts_generator(
            pin in 1u32..=99_999_998,
            discriminator in 0u16..16,
            custom in any::<bool>(),
            vendor_id in 1u16..=u16::MAX,
            product_id in 1u16..=u16::MAX,
        ) {
            let payload = SetupPayload {
                vendor_id: if custom { vendor_id } else { 0 },
                product_id: if custom { product_id } else { 0 },
                requires_custom_flow: custom,
                discriminator,
                setup_pin_code: pin,
            };
            prop_assume!(payload.is_valid_manual_code(&ManualCodeLayout::STANDARD));

            let code = ManualSetupPayloadGenerator::new(payload)
                .payload_decimal_string_representation()
                .unwrap();
            prop_assert!(code.bytes().all(|b| b.is_ascii_digit()));
            let parsed = ManualSetupPayloadParser::new(&code).populate_payload().unwrap();
            prop_assert_eq!(parsed, payload);
        }
    }
}
