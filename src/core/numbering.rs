use chrono::{Datelike, NaiveDate};

use super::error::EtsError;

/// Largest sequence value that fits the 9-digit serial part.
pub const MAX_SEQUENCE: u64 = 999_999_999;

/// Gapless GİB document number generator.
///
/// GİB document numbers are 16 characters: a 3 character series prefix,
/// the 4 digit year and a 9 digit zero-padded serial, e.g.
/// "ABC2024000000001". Numbers within a series and year must be issued
/// without gaps; the serial restarts at 1 every year.
#[derive(Debug, Clone)]
pub struct DocumentNumberSequence {
    prefix: String,
    year: i32,
    next_number: u64,
}

impl DocumentNumberSequence {
    /// Create a new sequence starting at 1.
    pub fn new(prefix: impl Into<String>, year: i32) -> Result<Self, EtsError> {
        Self::starting_at(prefix, year, 1)
    }

    /// Create a sequence continuing from a given serial.
    pub fn starting_at(
        prefix: impl Into<String>,
        year: i32,
        next_number: u64,
    ) -> Result<Self, EtsError> {
        let prefix = prefix.into();
        if !is_valid_prefix(&prefix) {
            return Err(EtsError::Numbering(format!(
                "series prefix '{prefix}' must be 3 upper-case letters or digits"
            )));
        }
        if !(1000..=9999).contains(&year) {
            return Err(EtsError::Numbering(format!(
                "year {year} must have 4 digits"
            )));
        }
        if next_number == 0 || next_number > MAX_SEQUENCE {
            return Err(EtsError::Numbering(format!(
                "serial {next_number} must be between 1 and {MAX_SEQUENCE}"
            )));
        }
        Ok(Self {
            prefix,
            year,
            next_number,
        })
    }

    /// Generate the next document number.
    pub fn next_number(&mut self) -> Result<String, EtsError> {
        if self.next_number > MAX_SEQUENCE {
            return Err(EtsError::Numbering(format!(
                "series {} exhausted for {}",
                self.prefix, self.year
            )));
        }
        let number = self.format(self.next_number);
        self.next_number += 1;
        Ok(number)
    }

    /// Preview the next number without consuming it.
    pub fn peek(&self) -> Option<String> {
        (self.next_number <= MAX_SEQUENCE).then(|| self.format(self.next_number))
    }

    fn format(&self, serial: u64) -> String {
        format!("{}{}{:09}", self.prefix, self.year, serial)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The serial that will be issued next.
    pub fn next_raw(&self) -> u64 {
        self.next_number
    }

    /// Advance to a new year, resetting the serial to 1.
    pub fn advance_year(&mut self, new_year: i32) -> Result<(), EtsError> {
        if new_year <= self.year {
            return Err(EtsError::Numbering(format!(
                "new year {new_year} must be greater than current year {}",
                self.year
            )));
        }
        if new_year > 9999 {
            return Err(EtsError::Numbering(format!(
                "year {new_year} must have 4 digits"
            )));
        }
        self.year = new_year;
        self.next_number = 1;
        Ok(())
    }

    /// Auto-advance year if the given date is in a new year.
    /// Returns true if the year was advanced.
    pub fn auto_advance(&mut self, date: NaiveDate) -> bool {
        let date_year = date.year();
        if date_year > self.year && date_year <= 9999 {
            self.year = date_year;
            self.next_number = 1;
            true
        } else {
            false
        }
    }
}

fn is_valid_prefix(prefix: &str) -> bool {
    prefix.len() == 3
        && prefix
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Check the format of a GİB document number.
pub fn is_valid_document_number(number: &str) -> bool {
    number.len() == 16
        && number.is_ascii()
        && is_valid_prefix(&number[..3])
        && number[3..].chars().all(|c| c.is_ascii_digit())
        && &number[7..] != "000000000"
}

/// Year part of a well-formed GİB document number.
pub fn document_number_year(number: &str) -> Option<i32> {
    if !is_valid_document_number(number) {
        return None;
    }
    number[3..7].parse().ok()
}
