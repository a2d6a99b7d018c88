//! ISBN detection and separator stripping.
//!
//! A query like `978-0-306-40615-7` is rewritten to its bare digit form so the
//! catalog can match it against stored identifiers. Anything that does not
//! pass an ISBN-10 or ISBN-13 checksum after stripping is returned untouched.

/// Return the separator-free form of `raw` if it is a valid ISBN-10 or
/// ISBN-13, otherwise return `raw` unchanged.
///
/// A separator is any single non-digit character whose left neighbour is a
/// digit and whose right neighbour is a digit or an `x`/`X` check character.
/// Neighbours are read from the original string, so runs of two or more
/// separators are left alone.
///
/// # Examples
///
/// ```
/// use shelf_search::classify::normalize_if_identifier;
///
/// assert_eq!(normalize_if_identifier("978-0-306-40615-7"), "9780306406157");
/// assert_eq!(normalize_if_identifier("the hobbit"), "the hobbit");
/// ```
pub fn normalize_if_identifier(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let stripped = strip_separators(raw);
    if is_valid_isbn(&stripped) {
        stripped
    } else {
        raw.to_string()
    }
}

/// Whether `raw` normalises to a checksum-valid ISBN.
pub fn is_identifier(raw: &str) -> bool {
    !raw.is_empty() && is_valid_isbn(&strip_separators(raw))
}

/// Drop every single non-digit character flanked by a digit on the left and a
/// digit or `x`/`X` on the right.
fn strip_separators(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|&(i, c)| {
            if c.is_ascii_digit() {
                return true;
            }
            let after_digit = i > 0 && chars[i - 1].is_ascii_digit();
            let before_digit_or_check = chars
                .get(i + 1)
                .is_some_and(|next| next.is_ascii_digit() || matches!(next, 'x' | 'X'));
            !(after_digit && before_digit_or_check)
        })
        .map(|(_, c)| *c)
        .collect()
}

fn is_valid_isbn(candidate: &str) -> bool {
    let chars: Vec<char> = candidate.chars().collect();
    match chars.len() {
        13 => isbn13_checksum_valid(&chars),
        10 => isbn10_checksum_valid(&chars),
        _ => false,
    }
}

/// Even positions weigh 1, odd positions weigh 3; the sum must be a multiple
/// of 10.
fn isbn13_checksum_valid(chars: &[char]) -> bool {
    let mut total = 0u32;
    for (i, c) in chars.iter().enumerate() {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        total += if i % 2 == 0 { digit } else { digit * 3 };
    }
    total % 10 == 0
}

/// Position `i` of the first nine digits weighs `10 - i`; the check character
/// counts 10 for `X`. The sum must be a multiple of 11.
fn isbn10_checksum_valid(chars: &[char]) -> bool {
    let mut total = 0u32;
    for (i, c) in chars[..9].iter().enumerate() {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        total += digit * (10 - i as u32);
    }
    total += match chars[9] {
        'x' | 'X' => 10,
        c => match c.to_digit(10) {
            Some(digit) => digit,
            None => return false,
        },
    };
    total % 11 == 0
}
