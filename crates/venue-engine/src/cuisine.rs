//! Canonical cuisine/type keys to provider place-type tokens.
//!
//! The upstream planner emits language-independent keys (`italian`,
//! `middle_eastern`); only this table knows the provider's vocabulary.

/// Token used when nothing usable survives resolution.
pub const FALLBACK_TYPE: &str = "restaurant";

const REGISTRY: &[(&str, &[&str])] = &[
    ("italian", &["italian_restaurant"]),
    ("pizza", &["pizza_restaurant"]),
    ("sushi", &["sushi_restaurant"]),
    ("japanese", &["japanese_restaurant"]),
    ("ramen", &["ramen_restaurant"]),
    ("chinese", &["chinese_restaurant"]),
    ("thai", &["thai_restaurant"]),
    ("indian", &["indian_restaurant"]),
    ("mexican", &["mexican_restaurant"]),
    ("middle_eastern", &["middle_eastern_restaurant", "lebanese_restaurant"]),
    ("hummus", &["middle_eastern_restaurant"]),
    ("burger", &["hamburger_restaurant"]),
    ("steak", &["steak_house"]),
    ("seafood", &["seafood_restaurant"]),
    ("vegan", &["vegan_restaurant", "vegetarian_restaurant"]),
    ("vegetarian", &["vegetarian_restaurant"]),
    ("breakfast", &["breakfast_restaurant", "brunch_restaurant"]),
    ("cafe", &["cafe", "coffee_shop"]),
    ("coffee", &["coffee_shop", "cafe"]),
    ("bakery", &["bakery"]),
    ("dessert", &["dessert_shop", "ice_cream_shop"]),
    ("bar", &["bar"]),
    ("restaurant", &["restaurant"]),
];

/// Resolves canonical keys to a stable, de-duplicated list of provider
/// place types.
///
/// Keys are trimmed and lower-cased before lookup. An unknown key that is
/// already a valid provider token (`[a-z_]+`) passes through unchanged;
/// anything else is dropped. An empty outcome falls back to
/// [`FALLBACK_TYPE`].
#[must_use]
pub fn resolve_types<S: AsRef<str>>(keys: &[S]) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    for raw in keys {
        let key = raw.as_ref().trim().to_lowercase();
        let resolved: Vec<&str> = match REGISTRY.iter().find(|(k, _)| *k == key) {
            Some((_, provider_types)) => provider_types.to_vec(),
            None if is_provider_token(&key) => vec![key.as_str()],
            None => {
                tracing::debug!(key = %raw.as_ref(), "dropping unrecognised cuisine key");
                Vec::new()
            }
        };

        for token in resolved {
            if !tokens.iter().any(|t| t == token) {
                tokens.push(token.to_owned());
            }
        }
    }

    if tokens.is_empty() {
        tokens.push(FALLBACK_TYPE.to_owned());
    }
    tokens
}

fn is_provider_token(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_lowercase() || c == '_')
}
