// src/gps/tokenizer.rs
//! Comma-delimited field splitting for NMEA sentences

/// Fields of one sentence, padded to a fixed slot count.
///
/// Indexing past the last slot yields an empty field rather than panicking,
/// so truncated sentences decode as "missing" instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence<'a> {
    fields: Vec<&'a str>,
    present: usize,
}

impl<'a> TokenSequence<'a> {
    /// Split `line` on `,` into at most `max_fields` tokens.
    ///
    /// The final token keeps everything after the last split it was allowed
    /// to make, commas included. Slots with no corresponding field are empty.
    pub fn split(line: &'a str, max_fields: usize) -> Self {
        let mut fields: Vec<&'a str> = line.splitn(max_fields, ',').collect();
        let present = fields.len();
        fields.resize(max_fields, "");
        Self { fields, present }
    }

    /// Field at `index`, or `""` when out of range.
    pub fn get(&self, index: usize) -> &'a str {
        self.fields.get(index).copied().unwrap_or("")
    }

    /// Number of slots, equal to the `max_fields` the sequence was built with.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields actually present in the source line
    /// (trailing empty padding is not counted).
    pub fn present(&self) -> usize {
        self.present
    }
}
