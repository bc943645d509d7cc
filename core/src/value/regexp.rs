use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::error::RegExpError;

/// Accepted flags, in canonical order.
const KNOWN_FLAGS: &str = "dgimsuy";

/// A regular expression with its flags and match cursor.
///
/// `Clone` reproduces source, flags and `last_index`.
#[derive(Debug, Clone)]
pub struct RegExp {
    source: String,
    flags: String,
    last_index: usize,
    compiled: Regex,
}

impl RegExp {
    pub fn new(source: &str, flags: &str) -> Result<Self, RegExpError> {
        let mut builder = RegexBuilder::new(source);
        let mut seen = String::new();

        for flag in flags.chars() {
            if !KNOWN_FLAGS.contains(flag) {
                return Err(RegExpError::UnknownFlag(flag));
            }
            if seen.contains(flag) {
                return Err(RegExpError::DuplicateFlag(flag));
            }
            seen.push(flag);

            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'u' => {
                    builder.unicode(true);
                }
                // d, g, y only change how exec() walks the haystack
                _ => {}
            }
        }

        let compiled = builder.build().map_err(|e| RegExpError::Pattern {
            pattern: source.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            source: source.to_string(),
            flags: KNOWN_FLAGS.chars().filter(|f| seen.contains(*f)).collect(),
            last_index: 0,
            compiled,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn global(&self) -> bool {
        self.flags.contains('g')
    }

    pub fn sticky(&self) -> bool {
        self.flags.contains('y')
    }

    pub fn last_index(&self) -> usize {
        self.last_index
    }

    pub fn set_last_index(&mut self, index: usize) {
        self.last_index = index;
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.compiled.is_match(haystack)
    }

    /// Finds the next match. Global and sticky expressions start at
    /// `last_index` and advance it; a miss resets it to zero.
    pub fn exec(&mut self, haystack: &str) -> Option<Range<usize>> {
        let sticky = self.sticky();
        if !(self.global() || sticky) {
            return self.compiled.find(haystack).map(|m| m.range());
        }

        let start = self.last_index;
        if start > haystack.len() || !haystack.is_char_boundary(start) {
            self.last_index = 0;
            return None;
        }

        let found = self
            .compiled
            .find_at(haystack, start)
            .filter(|m| !sticky || m.start() == start);

        match found {
            Some(m) => {
                self.last_index = m.end();
                Some(m.range())
            }
            None => {
                self.last_index = 0;
                None
            }
        }
    }
}

impl PartialEq for RegExp {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.flags == other.flags
            && self.last_index == other.last_index
    }
}
