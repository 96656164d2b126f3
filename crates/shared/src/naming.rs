//! Random gadget name generation.

use rand::seq::SliceRandom;
use rand::Rng;

/// Name used when the generator yields nothing usable.
pub const FALLBACK_GADGET_NAME: &str = "random-gadget";

const ADJECTIVES: [&str; 20] = [
    "swift",
    "silent",
    "brave",
    "mystic",
    "lucky",
    "fierce",
    "bold",
    "rapid",
    "graceful",
    "nimble",
    "elegant",
    "daring",
    "vibrant",
    "resolute",
    "majestic",
    "sly",
    "proud",
    "radiant",
    "vigilant",
    "audacious",
];

const NOUNS: [&str; 20] = [
    "panther", "tiger", "falcon", "dragon", "whale", "phoenix", "lion", "eagle", "shark", "wolf",
    "bear", "cobra", "leopard", "griffin", "hyena", "viper", "ox", "cheetah", "stallion", "ram",
];

/// Generate a gadget name in `adjective-noun-NNNN` format, e.g. `swift-falcon-4821`.
pub fn random_gadget_name() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("unnamed");
    let noun = NOUNS.choose(&mut rng).copied().unwrap_or("gadget");
    let number: u16 = rng.gen_range(1000..10000);

    format!("{}-{}-{}", adjective, noun, number)
}

/// Returns the generated name, or [`FALLBACK_GADGET_NAME`] if it is blank.
pub fn name_or_fallback(generated: Option<String>) -> String {
    generated
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_GADGET_NAME.to_string())
}

/// Upper-cases the first character of a name, leaving the rest untouched.
pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
