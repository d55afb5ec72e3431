//! Store-name slugs for the listing `filter` parameter.
//!
//! The upstream filter token is the store display name transliterated to
//! Latin, lowercased, with every run of other characters collapsed into a
//! single `_`. Cyrillic follows the Unidecode tables the site itself uses
//! (`х` is `kh`, `ю` is `iu`, the soft sign disappears, the hard sign
//! separates words); everything else goes through [`deunicode`], so `é` is
//! `e` and `№` is `no`.

use deunicode::deunicode_char;

/// Generate the `_`-separated slug for a display name.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut latin = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        if let Some(s) = transliterate(c) {
            latin.push_str(s);
        } else if c.is_ascii() {
            latin.push(c);
        } else {
            latin.push_str(deunicode_char(c).unwrap_or(" "));
        }
    }

    latin
        .to_ascii_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn transliterate(c: char) -> Option<&'static str> {
    let s = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'э' => "e",
        'ё' => "io",
        'ж' => "zh",
        'з' => "z",
        'и' | 'й' => "i",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' => " ",
        'ы' => "y",
        'ь' => "",
        'ю' => "iu",
        'я' => "ia",
        _ => return None,
    };
    Some(s)
}
