//! Character-Level Statistics

use regex::Regex;
use std::sync::OnceLock;

/// Characters whose occurrences are counted one feature each, in vector order
pub const COUNTED_CHARS: [char; 11] = ['.', '-', '_', '/', '?', '=', '@', '&', '%', '!', '#'];

/// Decimal digits plus the superscript, subscript, circled and other
/// digit-valued characters outside `Nd`
const DIGIT_CLASS: &str = concat!(
    r"[\p{Nd}\x{B2}\x{B3}\x{B9}\x{1369}-\x{1371}\x{19DA}\x{2070}\x{2074}-\x{2079}",
    r"\x{2080}-\x{2089}\x{2460}-\x{2468}\x{2474}-\x{247C}\x{2488}-\x{2490}\x{24EA}",
    r"\x{24F5}-\x{24FD}\x{24FF}\x{2776}-\x{277E}\x{2780}-\x{2788}\x{278A}-\x{2792}",
    r"\x{10A40}-\x{10A43}\x{10E60}-\x{10E68}\x{11052}-\x{1105A}\x{1F100}-\x{1F10C}]",
);

/// Letters only; combining marks are not letters
const LETTER_CLASS: &str = r"\p{L}";

/// Neither alphanumeric nor URL punctuation (`.-_/?:=&%@`)
const SPECIAL_CLASS: &str = r"[^\p{L}\p{N}.\-_/?:=&%@]";

struct CharClasses {
    digit: Regex,
    letter: Regex,
    special: Regex,
}

fn classes() -> &'static CharClasses {
    static CLASSES: OnceLock<CharClasses> = OnceLock::new();
    CLASSES.get_or_init(|| CharClasses {
        digit: Regex::new(DIGIT_CLASS).expect("digit class is a valid regex"),
        letter: Regex::new(LETTER_CLASS).expect("letter class is a valid regex"),
        special: Regex::new(SPECIAL_CLASS).expect("special class is a valid regex"),
    })
}

/// Whitespace removed around raw input: Unicode white space plus the
/// information separators U+001C..U+001F
pub fn is_trimmable(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Character class composition of a string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharProfile {
    /// Length in characters
    pub length: usize,
    /// Number of digit characters
    pub digits: usize,
    /// Number of alphabetic characters
    pub letters: usize,
    /// Characters that are neither alphanumeric nor URL punctuation
    pub special: usize,
}

impl CharProfile {
    /// Compute the profile of a string
    pub fn of(text: &str) -> Self {
        let classes = classes();
        Self {
            length: char_len(text),
            digits: classes.digit.find_iter(text).count(),
            letters: classes.letter.find_iter(text).count(),
            special: classes.special.find_iter(text).count(),
        }
    }

    /// Digit share of the length, 0 for empty strings
    pub fn digit_ratio(&self) -> f64 {
        ratio(self.digits, self.length)
    }

    /// Letter share of the length
    pub fn letter_ratio(&self) -> f64 {
        ratio(self.letters, self.length)
    }

    /// Special character share of the length
    pub fn special_ratio(&self) -> f64 {
        ratio(self.special, self.length)
    }
}

fn ratio(count: usize, length: usize) -> f64 {
    count as f64 / length.max(1) as f64
}

/// Count occurrences of a character
pub fn count_char(text: &str, needle: char) -> usize {
    text.chars().filter(|&c| c == needle).count()
}

/// Length in characters
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Longest slash-delimited segment and number of non-empty segments
pub fn path_segments(path: &str) -> (usize, usize) {
    path.split('/').fold((0, 0), |(longest, non_empty), segment| {
        let len = char_len(segment);
        (longest.max(len), non_empty + usize::from(len > 0))
    })
}
