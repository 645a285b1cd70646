use crate::error::InvalidField;
use crate::manual_code::ManualCodeLayout;

pub const CUSTOM_FLOW_REQUIRED_FIELD_LENGTH_IN_BITS: u32 = 1;
pub const SETUP_PIN_CODE_FIELD_LENGTH_IN_BITS: u32 = 27;
pub const MANUAL_SETUP_DISCRIMINATOR_FIELD_LENGTH_IN_BITS: u32 = 4;

pub const MANUAL_SETUP_SHORT_CODE_CHAR_LENGTH: usize = 10;
pub const MANUAL_SETUP_VENDOR_ID_CHAR_LENGTH: usize = 5;
pub const MANUAL_SETUP_PRODUCT_ID_CHAR_LENGTH: usize = 5;

/// Largest PIN a person can be asked to type as eight digits.
pub const MAX_SETUP_PIN_CODE: u32 = 99_999_998;

/// Trivially guessable PINs that must never be issued.
pub const RESERVED_SETUP_PIN_CODES: [u32; 11] = [
    11_111_111, 22_222_222, 33_333_333, 44_444_444, 55_555_555, 66_666_666, 77_777_777, 88_888_888,
    99_999_999, 12_345_678, 87_654_321,
];

/// Commissioning fields for one device.
///
/// A payload may hold values that cannot be encoded; validation happens when
/// a manual code is generated, not on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetupPayload {
    pub vendor_id: u16,
    pub product_id: u16,
    pub requires_custom_flow: bool,
    pub discriminator: u16,
    pub setup_pin_code: u32,
}

impl SetupPayload {
    /// Checks every field against `layout`, reporting the first that fails.
    pub fn validate_manual_code(&self, layout: &ManualCodeLayout) -> Result<(), InvalidField> {
        let pin = self.setup_pin_code;
        if pin == 0 || RESERVED_SETUP_PIN_CODES.contains(&pin) {
            return Err(InvalidField::ReservedSetupPinCode(pin));
        }
        if u64::from(pin) >= 1u64 << layout.pin_bits() || pin > MAX_SETUP_PIN_CODE {
            return Err(InvalidField::SetupPinCodeOutOfRange(pin));
        }
        if u64::from(self.discriminator) >= 1u64 << layout.discriminator_bits() {
            return Err(InvalidField::DiscriminatorOutOfRange(self.discriminator));
        }
        if self.requires_custom_flow {
            if self.vendor_id == 0 {
                return Err(InvalidField::MissingVendorId);
            }
            if self.product_id == 0 {
                return Err(InvalidField::MissingProductId);
            }
        }
        Ok(())
    }

    pub fn is_valid_manual_code(&self, layout: &ManualCodeLayout) -> bool {
        self.validate_manual_code(layout).is_ok()
    }
}
