/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at storefront scale)
///
/// Timestamp-leading, so IDs sort by creation time.
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Derive a URL-safe slug from a product name.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single `-`, and trims leading/trailing dashes. Deterministic: the same
/// name always yields the same slug.
pub fn to_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            for lc in c.to_lowercase() {
                slug.push(lc);
            }
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_slug_basic() {
        assert_eq!(to_slug("Nike Slim Shirt"), "nike-slim-shirt");
    }

    #[test]
    fn test_to_slug_collapses_separators() {
        assert_eq!(to_slug("Adidas -- Fit  Pants"), "adidas-fit-pants");
    }

    #[test]
    fn test_to_slug_trims_edges() {
        assert_eq!(to_slug("  Puma Shoes!  "), "puma-shoes");
    }

    #[test]
    fn test_to_slug_deterministic() {
        assert_eq!(to_slug("Lacoste Free Pants"), to_slug("Lacoste Free Pants"));
    }

    #[test]
    fn test_to_slug_unicode_lowercase() {
        assert_eq!(to_slug("Áo Thun"), "áo-thun");
    }

    #[test]
    fn test_snowflake_id_positive() {
        let id = snowflake_id();
        assert!(id > 0);
    }
}
