use rustchip_core::tlv::{Element, Tag};
use rustchip_core::DecodeError;

/// Parse a tag written as `anon`, `ctx:<n>`, `common:<n>`, `implicit:<n>`, or
/// `fq:<vendor>:<profile>:<n>`.
///
/// Numbers accept the same radix prefixes as [`parse_int`].
pub fn parse_tag(s: &str) -> Result<Tag, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("anon") {
        return Ok(Tag::Anonymous);
    }
    let (kind, rest) = s
        .split_once(':')
        .ok_or_else(|| format!("invalid tag '{s}'"))?;
    match kind.to_ascii_lowercase().as_str() {
        "ctx" => Ok(Tag::Context(parse_int(rest)?)),
        "common" => Ok(Tag::CommonProfile(parse_int(rest)?)),
        "implicit" => Ok(Tag::ImplicitProfile(parse_int(rest)?)),
        "fq" => {
            let parts: Vec<&str> = rest.splitn(3, ':').collect();
            let [vendor, profile, tag] = parts.as_slice() else {
                return Err(format!("fully qualified tag '{s}' needs vendor:profile:tag"));
            };
            Ok(Tag::FullyQualified {
                vendor_id: parse_int(vendor)?,
                profile_num: parse_int(profile)?,
                tag_num: parse_int(tag)?,
            })
        }
        _ => Err(format!("unknown tag kind '{kind}'")),
    }
}

/// Parse an unsigned integer with an optional `0x`, `0o` or `0b` prefix.
pub fn parse_int<T: TryFrom<u64>>(s: &str) -> Result<T, String> {
    let s = s.trim();
    let lower = s.to_ascii_lowercase();
    let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else {
        (lower.as_str(), 10)
    };
    let value = u64::from_str_radix(digits, radix).map_err(|e| format!("'{s}': {e}"))?;
    T::try_from(value).map_err(|_| format!("'{s}' is out of range"))
}

/// Parse hex text into bytes.
///
/// Accepts an optional `0x` prefix and any mix of whitespace, `:` and `-`
/// between digits. Lines starting with `#` are comments.
pub fn parse_hex_bytes(s: &str) -> Result<Vec<u8>, String> {
    let mut nibbles = Vec::with_capacity(s.len());
    for line in s.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        let line = line
            .strip_prefix("0x")
            .or_else(|| line.strip_prefix("0X"))
            .unwrap_or(line);
        for c in line.chars() {
            if c.is_whitespace() || c == ':' || c == '-' {
                continue;
            }
            let Some(nibble) = c.to_digit(16) else {
                return Err(format!("invalid hex digit '{c}'"));
            };
            nibbles.push(nibble as u8);
        }
    }

    if nibbles.len() % 2 != 0 {
        return Err("hex input has an odd number of digits".to_string());
    }
    let bytes = nibbles
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect();
    Ok(bytes)
}

/// One-line rendering of an element: tag, type name, and scalar value.
pub fn format_element(element: &Element<'_>) -> Result<String, DecodeError> {
    let ty = element.element_type();
    let value = if ty.is_container() {
        return Ok(format!("{} {}", element.tag(), ty.name()));
    } else if ty.is_signed_integer() {
        element.as_i64()?.to_string()
    } else if ty.is_unsigned_integer() {
        element.as_u64()?.to_string()
    } else if ty.is_utf8_string() {
        format!("{:?}", element.as_str()?)
    } else if ty.is_byte_string() {
        let bytes = element.as_bytes()?;
        let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02x}")).collect();
        format!("[{}]", hex.join(" "))
    } else if element.is_null() {
        return Ok(format!("{} {}", element.tag(), ty.name()));
    } else if let Ok(b) = element.as_bool() {
        b.to_string()
    } else if let Ok(v) = element.as_f32() {
        v.to_string()
    } else {
        element.as_f64()?.to_string()
    };
    Ok(format!("{} {} {value}", element.tag(), ty.name()))
}
