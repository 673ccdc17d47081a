//! Parser for the conversion literal.
//!
//! ```text
//! Sequence   := Operation+
//! Operation  := Op Number
//! Op         := '+' | '-' | '*' | '/'
//! Number     := NonZeroLeadInt ['.' Digit+]
//!             | '0' '.' Digit* NonZeroDigit Digit*
//! ```
//!
//! The scanner walks the input once and must consume all of it. There are no
//! separators; whitespace or any other stray character is an error, reported
//! with the byte offset at which it was found.

use thiserror::Error;

use crate::sequence::{Operation, Operator};

/// Why a conversion literal was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("operation sequence is empty")]
    Empty,

    #[error("expected an operator (+, -, *, /) at offset {offset}, found {found:?}")]
    ExpectedOperator { offset: usize, found: char },

    #[error("operator at offset {offset} has no operand")]
    MissingOperand { offset: usize },

    #[error("expected a digit at offset {offset}, found {found:?}")]
    ExpectedDigit { offset: usize, found: char },

    #[error("operand at offset {offset} has a leading zero")]
    LeadingZero { offset: usize },

    #[error("operand at offset {offset} has no digits after the decimal point")]
    MissingFraction { offset: usize },

    #[error("operand at offset {offset} is zero")]
    ZeroOperand { offset: usize },

    #[error("operand {text:?} at offset {offset} is out of range")]
    OutOfRange { offset: usize, text: String },
}

/// Parse a full conversion literal into its steps.
pub fn parse_sequence(text: &str) -> Result<Vec<Operation>, ParseError> {
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut scanner = Scanner { text, pos: 0 };
    let mut operations = Vec::new();
    while !scanner.at_end() {
        operations.push(scanner.operation()?);
    }
    Ok(operations)
}

/// `true` if `text` is a complete, well-formed conversion literal.
pub fn is_valid_sequence(text: &str) -> bool {
    parse_sequence(text).is_ok()
}

struct Scanner<'a> {
    text: &'a str,
    // Byte offset; only ever advanced over ASCII, so it stays on a char boundary.
    pos: usize,
}

impl Scanner<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn operation(&mut self) -> Result<Operation, ParseError> {
        let op_offset = self.pos;
        let operator = match self.peek() {
            Some(c) => Operator::from_symbol(c).ok_or(ParseError::ExpectedOperator {
                offset: op_offset,
                found: c,
            })?,
            None => return Err(ParseError::Empty),
        };
        self.pos += 1;

        let start = self.pos;
        let operand = self.number(op_offset)?;
        Operation::new(operator, operand).map_err(|_| ParseError::OutOfRange {
            offset: start,
            text: self.text[start..self.pos].to_string(),
        })
    }

    fn number(&mut self, op_offset: usize) -> Result<f64, ParseError> {
        let start = self.pos;

        let int_digits = self.digits();
        if int_digits == 0 {
            return Err(match self.peek() {
                None => ParseError::MissingOperand { offset: op_offset },
                Some(found) => ParseError::ExpectedDigit {
                    offset: self.pos,
                    found,
                },
            });
        }
        let int_part = &self.text[start..start + int_digits];
        if int_digits > 1 && int_part.starts_with('0') {
            return Err(ParseError::LeadingZero { offset: start });
        }

        let mut nonzero = int_part != "0";
        if self.peek() == Some('.') {
            self.pos += 1;
            let frac_start = self.pos;
            if self.digits() == 0 {
                return Err(ParseError::MissingFraction { offset: start });
            }
            nonzero |= self.text[frac_start..self.pos].bytes().any(|b| b != b'0');
        }
        if !nonzero {
            return Err(ParseError::ZeroOperand { offset: start });
        }

        let literal = &self.text[start..self.pos];
        literal.parse::<f64>().map_err(|_| ParseError::OutOfRange {
            offset: start,
            text: literal.to_string(),
        })
    }

    // Consume a run of ASCII digits, returning how many there were.
    fn digits(&mut self) -> usize {
        let run = self.text[self.pos..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        self.pos += run;
        run
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_literals() {
        for text in [
            "+2",
            "*2",
            "+3.42",
            "+3.42*1.2/4",
            "*9/5+32",
            "-273.15*9/5+32",
            "*0.001",
            "/0.50",
            "*1.0",
            "+10",
        ] {
            assert!(is_valid_sequence(text), "{text:?} rejected");
        }
    }

    #[test]
    fn parses_operators_and_operands_in_order() {
        let ops = parse_sequence("-273.15*9/5+32").unwrap();
        let pairs: Vec<(char, f64)> = ops
            .iter()
            .map(|o| (o.operator().symbol(), o.operand()))
            .collect();
        assert_eq!(
            pairs,
            vec![('-', 273.15), ('*', 9.0), ('/', 5.0), ('+', 32.0)]
        );
    }

    #[test]
    fn rejects_empty_and_blank() {
        assert_eq!(parse_sequence(""), Err(ParseError::Empty));
        assert_eq!(
            parse_sequence(" "),
            Err(ParseError::ExpectedOperator { offset: 0, found: ' ' })
        );
    }

    #[test]
    fn rejects_missing_operator() {
        assert_eq!(
            parse_sequence("3.2"),
            Err(ParseError::ExpectedOperator { offset: 0, found: '3' })
        );
    }

    #[test]
    fn rejects_trailing_garbage_instead_of_skipping_it() {
        assert_eq!(
            parse_sequence("*3a"),
            Err(ParseError::ExpectedOperator { offset: 2, found: 'a' })
        );
        assert_eq!(
            parse_sequence("*9 /5"),
            Err(ParseError::ExpectedOperator { offset: 2, found: ' ' })
        );
        assert!(parse_sequence("*2x+3").is_err());
    }

    #[test]
    fn rejects_dangling_operator() {
        assert_eq!(
            parse_sequence("*2+"),
            Err(ParseError::MissingOperand { offset: 2 })
        );
        assert_eq!(
            parse_sequence("*+2"),
            Err(ParseError::ExpectedDigit { offset: 1, found: '+' })
        );
    }

    #[test]
    fn rejects_zero_operands() {
        assert_eq!(parse_sequence("*0"), Err(ParseError::ZeroOperand { offset: 1 }));
        assert_eq!(parse_sequence("+0.000"), Err(ParseError::ZeroOperand { offset: 1 }));
        assert!(parse_sequence("/0.0001").is_ok());
    }

    #[test]
    fn rejects_leading_zero_and_bare_point() {
        assert_eq!(parse_sequence("*05"), Err(ParseError::LeadingZero { offset: 1 }));
        assert_eq!(parse_sequence("*00.5"), Err(ParseError::LeadingZero { offset: 1 }));
        assert_eq!(parse_sequence("*5."), Err(ParseError::MissingFraction { offset: 1 }));
        assert_eq!(
            parse_sequence("*.5"),
            Err(ParseError::ExpectedDigit { offset: 1, found: '.' })
        );
    }

    #[test]
    fn rejects_values_outside_f64() {
        let huge = format!("*1{}", "0".repeat(400));
        assert!(matches!(
            parse_sequence(&huge),
            Err(ParseError::OutOfRange { offset: 1, .. })
        ));
    }

    #[test]
    fn reports_offsets_past_multibyte_input() {
        assert_eq!(
            parse_sequence("*2°"),
            Err(ParseError::ExpectedOperator { offset: 2, found: '°' })
        );
    }
}
