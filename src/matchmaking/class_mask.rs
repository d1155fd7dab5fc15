//! Class tag to bitmask-bit mapping for the stacking constraint

/// Convert a class tag (1-11) to its bit in the stacking mask.
///
/// Tags 1-9 map to `1 << (tag - 1)`; tag 11 sits at bit 10 because slot 10
/// is unused in the upstream class table. Tag 0 (no class) and tag 10 carry
/// no bit and are never matched by a configured mask.
pub fn class_mask_bit(class_tag: u8) -> u32 {
    match class_tag {
        1..=9 => 1u32 << (class_tag - 1),
        11 => 1u32 << 10,
        _ => 0,
    }
}
