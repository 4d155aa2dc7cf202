//! Identifying-claim lookup.

use crate::principal::{kinds, Principal};

/// Claim kinds tried in order when matching against the admin allow-list.
pub const IDENTIFYING_CLAIMS: [&str; 2] = [kinds::PREFERRED_USERNAME, kinds::EMAIL];

/// Identifying string for `principal`: the first non-blank value among
/// `IDENTIFYING_CLAIMS`, or `None`. The value is returned as issued.
pub fn identifying_name(principal: &Principal) -> Option<&str> {
    IDENTIFYING_CLAIMS.iter().find_map(|kind| {
        principal
            .find_first(kind)
            .filter(|v| !v.trim().is_empty())
    })
}
