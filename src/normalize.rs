//! Clauson orthography normalization.
//!
//! Folds a headword into the canonical key stored in `normalized_word`:
//! Turkish-aware case folding, punctuation/digit stripping, and collapsing of
//! the transcription diacritics used in Clauson's dictionary.

/// Map a raw word to its canonical matching key.
///
/// The Turkish `I`/`İ` substitution must run before generic lowercasing,
/// otherwise `I` would fold to `i` instead of `ı`.
pub fn normalize(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let turkish: String = input
        .chars()
        .map(|c| match c {
            'I' => 'ı',
            'İ' => 'i',
            other => other,
        })
        .collect();

    turkish
        .to_lowercase()
        .chars()
        .filter(|&c| !is_stripped(c))
        .map(fold_diacritic)
        .collect()
}

/// Characters removed from the key entirely ("1 ı" -> "ı", "gı:ds" -> "gıds").
pub fn is_stripped(c: char) -> bool {
    c.is_ascii_digit()
        || c.is_whitespace()
        || matches!(c, '\u{feff}' | '*' | ':' | '/' | '-' | '.' | '(' | ')' | '[' | ']')
}

fn fold_diacritic(c: char) -> char {
    match c {
        'ñ' | 'ŋ' => 'n',
        'ḏ' | 'ḍ' => 'd',
        'ṭ' => 't',
        'ẓ' => 'z',
        'ā' | 'á' | 'ă' => 'a',
        'ī' => 'i',
        'ū' => 'u',
        'š' => 's',
        'γ' => 'g',
        'é' | 'ä' => 'e',
        'č' => 'c',
        other => other,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn clauson_char() -> impl Strategy<Value = char> {
        prop::sample::select(vec![
            'a', 'b', 'k', 'I', 'İ', 'ı', 'i', 'S', 'ş', 'ö', 'ü', 'ğ', 'ç', 'ñ', 'ŋ', 'ḏ', 'ḍ',
            'ṭ', 'ẓ', 'ā', 'á', 'ă', 'ī', 'ū', 'š', 'γ', 'é', 'ä', 'č', 'Ā', '1', '9', '*', ':',
            '/', ' ', '\t', '\u{feff}', '-', '.', '(', ')', '[', ']', '_', '%',
        ])
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(chars in prop::collection::vec(clauson_char(), 0..24)) {
            let raw: String = chars.into_iter().collect();
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn output_never_contains_stripped_characters(chars in prop::collection::vec(clauson_char(), 0..24)) {
            let raw: String = chars.into_iter().collect();
            prop_assert!(!normalize(&raw).chars().any(is_stripped));
        }
    }
}
