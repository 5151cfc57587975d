//! Locale-aware string ordering for user-visible text.
//!
//! Approximates a root-locale collator for the names, types and regions
//! found in cloud inventories. Strings are decomposed (NFD) so that an
//! accented letter shares its base letter's primary weight. Levels:
//! primary is the case-folded base letters with punctuation before digits
//! before letters, secondary is the accents, tertiary is lowercase before
//! uppercase. Code-point order breaks what is left so distinct strings
//! never tie.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let left = collation_elements(a);
    let right = collation_elements(b);

    left.iter()
        .map(CollationElement::primary)
        .cmp(right.iter().map(CollationElement::primary))
        .then_with(|| {
            left.iter()
                .map(|e| e.marks.as_slice())
                .cmp(right.iter().map(|e| e.marks.as_slice()))
        })
        .then_with(|| {
            left.iter()
                .map(CollationElement::tertiary)
                .cmp(right.iter().map(CollationElement::tertiary))
        })
        .then_with(|| a.cmp(b))
}

/// A base character and the combining marks that follow it.
struct CollationElement {
    base: char,
    marks: Vec<char>,
}

impl CollationElement {
    fn primary(&self) -> (u8, char) {
        let c = self.base;
        let class = if c.is_alphabetic() {
            2
        } else if c.is_numeric() {
            1
        } else {
            0
        };
        (class, c.to_lowercase().next().unwrap_or(c))
    }

    fn tertiary(&self) -> u8 {
        u8::from(self.base.is_uppercase())
    }
}

fn collation_elements(s: &str) -> Vec<CollationElement> {
    let mut elements: Vec<CollationElement> = Vec::new();
    for c in s.nfd() {
        if is_combining_mark(c) {
            if let Some(last) = elements.last_mut() {
                last.marks.push(c);
                continue;
            }
        }
        elements.push(CollationElement {
            base: c,
            marks: Vec::new(),
        });
    }
    elements
}
