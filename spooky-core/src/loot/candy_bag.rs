use super::{DropKind, DropRequest};
use crate::constants::{CANDY_BAG_MAX, CANDY_BAG_MIN, CANDY_VARIANTS};
use crate::random::RandomSource;
use crate::wildcard::AssetCode;

/// Contents of one opened candy bag: a single candy variant, 1-3 of it.
pub fn open_candy_bag(rng: &mut dyn RandomSource) -> DropRequest {
    let variant = CANDY_VARIANTS[rng.next_index(CANDY_VARIANTS.len())];
    let quantity = rng.next_in_range(CANDY_BAG_MIN as i32, CANDY_BAG_MAX as i32) as u32;
    DropRequest {
        code: AssetCode::parse(variant),
        kind: DropKind::Item,
        quantity,
    }
}
