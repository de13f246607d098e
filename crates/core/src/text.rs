//! Text helpers that do not involve the store.

use unicode_normalization::UnicodeNormalization;

/// Convert a string into compatibility normal form (NFKC) and collapse
/// all runs of whitespace into single spaces.
pub fn format_string(s: &str) -> String {
    let normalized: String = s.nfkc().collect();
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Create the key for a new record: the year followed by every author's
/// last name, without spaces and transliterated to ASCII.
pub fn generate_key<'a, I>(year: i32, last_names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut key = year.to_string();
    for last in last_names {
        for c in last.chars().filter(|c| !c.is_whitespace()) {
            match transliterate(c) {
                Some(ascii) => key.push_str(ascii),
                None => key.push(c),
            }
        }
    }
    key
}

/// BibTeX keys should be ASCII.
fn transliterate(c: char) -> Option<&'static str> {
    let ascii = match c {
        'à' | 'á' | 'â' | 'ã' | 'å' | 'ā' => "a",
        'ä' | 'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' => "e",
        'î' | 'ï' | 'í' | 'ī' | 'į' | 'ì' => "i",
        'ł' => "l",
        'ñ' | 'ń' => "n",
        'ô' | 'ò' | 'ó' | 'ø' | 'ō' | 'õ' => "o",
        'ö' | 'œ' => "oe",
        'ß' => "ss",
        'ś' | 'š' => "s",
        'û' | 'ù' | 'ú' | 'ū' => "u",
        'ü' => "ue",
        'ÿ' => "y",
        'ž' | 'ź' | 'ż' => "z",
        'À' | 'Á' | 'Â' | 'Ã' | 'Å' | 'Ā' => "A",
        'Ä' | 'Æ' => "Ae",
        'Ç' | 'Ć' | 'Č' => "C",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ė' | 'Ę' => "E",
        'Î' | 'Ï' | 'Í' | 'Ī' | 'Į' | 'Ì' => "I",
        'Ł' => "L",
        'Ñ' | 'Ń' => "N",
        'Ô' | 'Ò' | 'Ó' | 'Ø' | 'Ō' | 'Õ' => "O",
        'Ö' | 'Œ' => "Oe",
        'Ś' | 'Š' => "S",
        'Û' | 'Ù' | 'Ú' | 'Ū' => "U",
        'Ü' => "Ue",
        'Ÿ' => "Y",
        'Ž' | 'Ź' | 'Ż' => "Z",
        _ => return None,
    };
    Some(ascii)
}
