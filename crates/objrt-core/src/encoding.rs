//! Method type encoding decoder
//!
//! A method type encoding is a sequence of `(type, frame offset)` pairs:
//! the return type first, then one pair per argument, e.g. `v16@0:8` or
//! `{Point=dd}32@0:8d16d24`. A type token runs until the first decimal digit
//! outside any aggregate; aggregates nest with `{}`, `[]` and `()`, so digits
//! inside them (array lengths, bitfield widths) belong to the type.

use thiserror::Error;

/// Decoding errors, with the byte position where decoding stopped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// A pair has no type characters
    #[error("empty type at position {position}")]
    EmptyType {
        /// Byte position of the offending pair
        position: usize,
    },

    /// A type is not followed by a frame offset
    #[error("missing frame offset at position {position}")]
    MissingOffset {
        /// Byte position where the offset was expected
        position: usize,
    },

    /// An aggregate closes without opening or never closes
    #[error("unbalanced aggregate at position {position}")]
    UnbalancedAggregate {
        /// Byte position of the offending bracket (or the end of input)
        position: usize,
    },

    /// The frame offset does not fit in a `usize`
    #[error("frame offset out of range at position {position}")]
    InvalidOffset {
        /// Byte position of the offset
        position: usize,
    },
}

/// One decoded `(type, frame offset)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedArg<'a> {
    /// Type text
    pub ty: &'a str,
    /// Frame offset in bytes
    pub offset: usize,
}

/// Borrowed view over a method type encoding
#[derive(Debug, Clone, Copy)]
pub struct TypeEncoding<'a> {
    source: &'a str,
}

impl<'a> TypeEncoding<'a> {
    /// Wrap an encoding string without validating it
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Underlying text
    pub fn as_str(&self) -> &'a str {
        self.source
    }

    /// Iterate over the pairs; iteration stops after the first error
    pub fn iter(&self) -> Pairs<'a> {
        Pairs {
            bytes: self.source.as_bytes(),
            source: self.source,
            pos: 0,
            failed: false,
        }
    }

    /// Decode every pair
    pub fn decode(&self) -> Result<Vec<EncodedArg<'a>>, EncodingError> {
        self.iter().collect()
    }

    /// Return type, the first pair's type
    pub fn return_type(&self) -> Result<&'a str, EncodingError> {
        match self.iter().next() {
            Some(pair) => pair.map(|pair| pair.ty),
            None => Err(EncodingError::EmptyType { position: 0 }),
        }
    }

    /// Number of arguments, the pairs after the return type
    ///
    /// The receiver and selector count as arguments, as they occupy frame
    /// slots like any other.
    pub fn argument_count(&self) -> Result<usize, EncodingError> {
        let mut pairs = 0usize;
        for pair in self.iter() {
            pair?;
            pairs += 1;
        }
        Ok(pairs.saturating_sub(1))
    }
}

/// Iterator over the pairs of a [`TypeEncoding`]
#[derive(Debug, Clone)]
pub struct Pairs<'a> {
    bytes: &'a [u8],
    source: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Pairs<'a> {
    fn scan_type(&mut self) -> Result<&'a str, EncodingError> {
        let start = self.pos;
        let mut stack: Vec<u8> = Vec::new();

        while let Some(&byte) = self.bytes.get(self.pos) {
            match byte {
                b'{' => stack.push(b'}'),
                b'[' => stack.push(b']'),
                b'(' => stack.push(b')'),
                b'}' | b']' | b')' => {
                    if stack.pop() != Some(byte) {
                        return Err(EncodingError::UnbalancedAggregate { position: self.pos });
                    }
                }
                b'0'..=b'9' if stack.is_empty() => break,
                _ => {}
            }
            self.pos += 1;
        }

        if !stack.is_empty() {
            return Err(EncodingError::UnbalancedAggregate { position: self.pos });
        }
        if self.pos == start {
            return Err(EncodingError::EmptyType { position: start });
        }
        Ok(&self.source[start..self.pos])
    }

    fn scan_offset(&mut self) -> Result<usize, EncodingError> {
        let start = self.pos;
        while self.bytes.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(EncodingError::MissingOffset { position: start });
        }
        self.source[start..self.pos]
            .parse()
            .map_err(|_| EncodingError::InvalidOffset { position: start })
    }
}

impl<'a> Iterator for Pairs<'a> {
    type Item = Result<EncodedArg<'a>, EncodingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.bytes.len() {
            return None;
        }

        let pair = self
            .scan_type()
            .and_then(|ty| self.scan_offset().map(|offset| EncodedArg { ty, offset }));
        if pair.is_err() {
            self.failed = true;
        }
        Some(pair)
    }
}
