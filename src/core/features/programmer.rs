//! Programmer calculator: fixed-width integer and bitwise arithmetic
//!
//! Values are `u64` masked to the selected word size, so every operation wraps
//! exactly like two's-complement hardware of that width.

use std::fmt;
use std::str::FromStr;

use crate::shared::errors::{CalcError, CalcResult};

/// Text shown after a failed operation
pub const ERROR_DISPLAY: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Radix {
    Bin,
    Oct,
    #[default]
    Dec,
    Hex,
}

impl Radix {
    pub const ALL: [Radix; 4] = [Radix::Bin, Radix::Oct, Radix::Dec, Radix::Hex];

    pub fn label(self) -> &'static str {
        match self {
            Radix::Bin => "BIN",
            Radix::Oct => "OCT",
            Radix::Dec => "DEC",
            Radix::Hex => "HEX",
        }
    }

    pub fn base(self) -> u32 {
        match self {
            Radix::Bin => 2,
            Radix::Oct => 8,
            Radix::Dec => 10,
            Radix::Hex => 16,
        }
    }

    pub fn accepts(self, ch: char) -> bool {
        ch.to_digit(self.base()).is_some()
    }

    /// Parse digits in this radix, wrapping modulo 2^64. Empty text is zero and a
    /// leading `-` yields the two's complement.
    pub fn parse(self, text: &str) -> CalcResult<u64> {
        let trimmed = text.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let invalid = || CalcError::InvalidDigits { radix: self.label().to_string(), text: text.to_string() };
        if digits.is_empty() && !trimmed.is_empty() {
            return Err(invalid());
        }

        let base = u64::from(self.base());
        let mut value: u64 = 0;
        for ch in digits.chars() {
            let digit = ch.to_digit(self.base()).ok_or_else(invalid)?;
            value = value.wrapping_mul(base).wrapping_add(u64::from(digit));
        }

        Ok(if negative { value.wrapping_neg() } else { value })
    }

    pub fn render(self, value: u64) -> String {
        match self {
            Radix::Bin => format!("{:b}", value),
            Radix::Oct => format!("{:o}", value),
            Radix::Dec => value.to_string(),
            Radix::Hex => format!("{:X}", value),
        }
    }
}

impl FromStr for Radix {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Radix::ALL
            .into_iter()
            .find(|radix| radix.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalcError::UnknownRadix(s.to_string()))
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Integer width in bits: 8, 16, 32 or 64
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSize(u32);

impl WordSize {
    pub const SUPPORTED: [u32; 4] = [8, 16, 32, 64];

    pub fn new(bits: u32) -> CalcResult<Self> {
        if Self::SUPPORTED.contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(CalcError::UnsupportedWordSize(bits))
        }
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn mask(self) -> u64 {
        if self.0 >= 64 {
            u64::MAX
        } else {
            (1u64 << self.0) - 1
        }
    }
}

impl Default for WordSize {
    fn default() -> Self {
        Self(32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Not,
}

impl Operator {
    pub const ALL: [Operator; 10] = [
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::And,
        Operator::Or,
        Operator::Xor,
        Operator::Shl,
        Operator::Shr,
        Operator::Not,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Xor => "XOR",
            Operator::Shl => "SHL",
            Operator::Shr => "SHR",
            Operator::Not => "NOT",
        }
    }

    pub fn is_unary(self) -> bool {
        self == Operator::Not
    }
}

impl FromStr for Operator {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "//" => return Ok(Operator::Div),
            "<<" => return Ok(Operator::Shl),
            ">>" => return Ok(Operator::Shr),
            "&" => return Ok(Operator::And),
            "|" => return Ok(Operator::Or),
            _ => {}
        }
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol().eq_ignore_ascii_case(s))
            .ok_or_else(|| CalcError::UnknownOperator(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Apply `op` to `a` and `b` at the given width. `b` is ignored for `NOT`.
pub fn apply(op: Operator, a: u64, b: u64, word: WordSize) -> CalcResult<u64> {
    let mask = word.mask();
    let (a, b) = (a & mask, b & mask);
    let shift = b.min(u64::from(word.bits())) as u32;

    let result = match op {
        Operator::Add => a.wrapping_add(b),
        Operator::Sub => a.wrapping_sub(b),
        Operator::Mul => a.wrapping_mul(b),
        Operator::Div => {
            if b == 0 {
                return Err(CalcError::DivisionByZero);
            }
            a / b
        }
        Operator::And => a & b,
        Operator::Or => a | b,
        Operator::Xor => a ^ b,
        Operator::Shl => a.checked_shl(shift).unwrap_or(0),
        Operator::Shr => a.checked_shr(shift).unwrap_or(0),
        Operator::Not => !a,
    };

    Ok(result & mask)
}

/// One-shot evaluation of `lhs op rhs` with operands and result in `radix`
pub fn evaluate(lhs: &str, op: &str, rhs: Option<&str>, radix: Radix, word: WordSize) -> CalcResult<String> {
    let op: Operator = op.parse()?;
    let a = radix.parse(lhs)?;
    let b = match rhs {
        Some(text) if !op.is_unary() => radix.parse(text)?,
        None if !op.is_unary() => return Err(CalcError::MissingOperand(op.symbol().to_string())),
        _ => 0,
    };

    let result = apply(op, a, b, word)?;
    tracing::debug!(%op, a, b, result, bits = word.bits(), "programmer operation");
    Ok(radix.render(result))
}

/// Keypad-driven programmer calculator
#[derive(Debug, Clone)]
pub struct ProgrammerCalculator {
    display: String,
    radix: Radix,
    word_size: WordSize,
    pending: Option<(u64, Operator)>,
}

impl Default for ProgrammerCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgrammerCalculator {
    pub fn new() -> Self {
        Self {
            display: "0".to_string(),
            radix: Radix::default(),
            word_size: WordSize::default(),
            pending: None,
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn radix(&self) -> Radix {
        self.radix
    }

    pub fn word_size(&self) -> WordSize {
        self.word_size
    }

    pub fn is_error(&self) -> bool {
        self.display == ERROR_DISPLAY
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Displayed value masked to the word size; unreadable text counts as zero
    pub fn current_value(&self) -> u64 {
        if self.is_error() {
            return 0;
        }
        self.radix.parse(&self.display).unwrap_or(0) & self.word_size.mask()
    }

    /// Append a digit valid in the current radix. Returns false if it was ignored.
    pub fn press_digit(&mut self, ch: char) -> bool {
        let ch = ch.to_ascii_uppercase();
        if !self.radix.accepts(ch) {
            return false;
        }
        if self.display == "0" || self.is_error() {
            self.display = ch.to_string();
        } else {
            self.display.push(ch);
        }
        true
    }

    pub fn press_operator(&mut self, op: Operator) -> CalcResult<()> {
        if op.is_unary() {
            self.not();
            return Ok(());
        }

        let current = self.current_value();
        let accumulator = match self.pending {
            None => current,
            Some((acc, pending_op)) => match apply(pending_op, acc, current, self.word_size) {
                Ok(value) => value,
                Err(e) => {
                    self.fail();
                    return Err(e);
                }
            },
        };

        self.pending = Some((accumulator, op));
        self.display = "0".to_string();
        Ok(())
    }

    pub fn equals(&mut self) -> CalcResult<()> {
        let Some((acc, op)) = self.pending.take() else {
            return Ok(());
        };
        match apply(op, acc, self.current_value(), self.word_size) {
            Ok(value) => {
                self.show(value);
                Ok(())
            }
            Err(e) => {
                self.fail();
                Err(e)
            }
        }
    }

    pub fn not(&mut self) {
        let value = !self.current_value();
        self.show(value);
        self.pending = None;
    }

    pub fn clear(&mut self) {
        self.display = "0".to_string();
        self.pending = None;
    }

    /// Re-read the display in the old radix and render it in the new one
    pub fn set_radix(&mut self, radix: Radix) {
        let value = self.radix.parse(&self.display).unwrap_or(0);
        self.radix = radix;
        self.display = radix.render(value);
    }

    pub fn set_word_size(&mut self, bits: u32) -> CalcResult<()> {
        let word = WordSize::new(bits)?;
        let value = self.radix.parse(&self.display).unwrap_or(0);
        self.word_size = word;
        self.show(value);
        Ok(())
    }

    fn show(&mut self, value: u64) {
        self.display = self.radix.render(value & self.word_size.mask());
    }

    fn fail(&mut self) {
        self.display = ERROR_DISPLAY.to_string();
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn bits(n: u32) -> WordSize {
        WordSize::new(n).unwrap()
    }

    #[rstest]
    #[case(Operator::Add, 250, 10, 8, 4)]
    #[case(Operator::Sub, 0, 1, 8, 255)]
    #[case(Operator::Sub, 0, 1, 64, u64::MAX)]
    #[case(Operator::Mul, 16, 16, 8, 0)]
    #[case(Operator::Div, 7, 2, 32, 3)]
    #[case(Operator::And, 0b1100, 0b1010, 8, 0b1000)]
    #[case(Operator::Or, 0b1100, 0b1010, 8, 0b1110)]
    #[case(Operator::Xor, 0b1100, 0b1010, 8, 0b0110)]
    #[case(Operator::Shl, 1, 8, 8, 0)]
    #[case(Operator::Shl, 1, 7, 8, 128)]
    #[case(Operator::Shl, 1, 1000, 64, 0)]
    #[case(Operator::Shr, 256, 4, 16, 16)]
    #[case(Operator::Shr, u64::MAX, 64, 64, 0)]
    #[case(Operator::Not, 0, 0, 8, 255)]
    #[case(Operator::Not, 0, 0, 64, u64::MAX)]
    fn applies_masked(#[case] op: Operator, #[case] a: u64, #[case] b: u64, #[case] width: u32, #[case] expected: u64) {
        assert_eq!(apply(op, a, b, bits(width)).unwrap(), expected);
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(apply(Operator::Div, 1, 0, bits(32)), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn radix_round_trip_and_rendering() {
        assert_eq!(Radix::Hex.render(255), "FF");
        assert_eq!(Radix::Bin.render(5), "101");
        assert_eq!(Radix::Oct.render(8), "10");
        assert_eq!(Radix::Hex.parse("ff").unwrap(), 255);
        assert_eq!(Radix::Dec.parse("").unwrap(), 0);
        assert_eq!(Radix::Dec.parse("-1").unwrap() & bits(8).mask(), 255);
        assert!(Radix::Bin.parse("102").is_err());
        assert!(Radix::Dec.parse("-").is_err());
    }

    #[test]
    fn overlong_input_wraps_instead_of_panicking() {
        let text = "F".repeat(40);
        assert_eq!(Radix::Hex.parse(&text).unwrap(), u64::MAX);
        assert!(Radix::Dec.parse(&"9".repeat(100)).is_ok());
    }

    #[test]
    fn parses_operator_and_radix_names() {
        assert_eq!("xor".parse::<Operator>().unwrap(), Operator::Xor);
        assert_eq!("//".parse::<Operator>().unwrap(), Operator::Div);
        assert!("%".parse::<Operator>().is_err());
        assert_eq!("hex".parse::<Radix>().unwrap(), Radix::Hex);
        assert_eq!("BASE64".parse::<Radix>(), Err(CalcError::UnknownRadix("BASE64".into())));
        assert_eq!(WordSize::new(12), Err(CalcError::UnsupportedWordSize(12)));
    }

    #[test]
    fn evaluate_one_shot() {
        assert_eq!(evaluate("FF", "+", Some("1"), Radix::Hex, bits(8)).unwrap(), "0");
        assert_eq!(evaluate("0", "NOT", None, Radix::Dec, bits(16)).unwrap(), "65535");
        assert_eq!(
            evaluate("1", "SHL", None, Radix::Dec, bits(8)),
            Err(CalcError::MissingOperand("SHL".into()))
        );
        assert_eq!(evaluate("1", "/", Some("0"), Radix::Dec, bits(8)), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn digits_respect_radix() {
        let mut calc = ProgrammerCalculator::new();
        assert!(calc.press_digit('4'));
        assert!(calc.press_digit('2'));
        assert!(!calc.press_digit('A'));
        assert_eq!(calc.display(), "42");

        calc.set_radix(Radix::Hex);
        assert_eq!(calc.display(), "2A");
        assert!(calc.press_digit('f'));
        assert_eq!(calc.display(), "2AF");
    }

    #[test]
    fn leading_zero_is_replaced() {
        let mut calc = ProgrammerCalculator::new();
        calc.press_digit('0');
        calc.press_digit('7');
        assert_eq!(calc.display(), "7");
    }

    #[test]
    fn operators_chain() {
        let mut calc = ProgrammerCalculator::new();
        calc.press_digit('5');
        calc.press_operator(Operator::Add).unwrap();
        assert_eq!(calc.display(), "0");
        calc.press_digit('3');
        calc.press_operator(Operator::Mul).unwrap();
        calc.press_digit('2');
        calc.equals().unwrap();
        assert_eq!(calc.display(), "16");
        assert!(!calc.has_pending());
    }

    #[test]
    fn equals_without_pending_is_noop() {
        let mut calc = ProgrammerCalculator::new();
        calc.press_digit('9');
        calc.equals().unwrap();
        assert_eq!(calc.display(), "9");
    }

    #[test]
    fn division_by_zero_shows_error_and_recovers() {
        let mut calc = ProgrammerCalculator::new();
        calc.press_digit('8');
        calc.press_operator(Operator::Div).unwrap();
        assert_eq!(calc.equals(), Err(CalcError::DivisionByZero));
        assert!(calc.is_error());
        assert!(!calc.has_pending());

        calc.press_digit('3');
        assert_eq!(calc.display(), "3");
    }

    #[test]
    fn chained_division_by_zero_fails_on_next_operator() {
        let mut calc = ProgrammerCalculator::new();
        calc.press_digit('8');
        calc.press_operator(Operator::Div).unwrap();
        assert_eq!(calc.press_operator(Operator::Add), Err(CalcError::DivisionByZero));
        assert_eq!(calc.display(), ERROR_DISPLAY);
    }

    #[test]
    fn not_masks_and_clears_pending() {
        let mut calc = ProgrammerCalculator::new();
        calc.set_word_size(8).unwrap();
        calc.press_digit('1');
        calc.press_operator(Operator::Add).unwrap();
        calc.press_operator(Operator::Not).unwrap();
        assert_eq!(calc.display(), "255");
        assert!(!calc.has_pending());
    }

    #[test]
    fn word_size_change_remasks_display() {
        let mut calc = ProgrammerCalculator::new();
        for ch in "300".chars() {
            calc.press_digit(ch);
        }
        calc.set_word_size(8).unwrap();
        assert_eq!(calc.display(), "44");
        assert!(calc.set_word_size(7).is_err());
        assert_eq!(calc.word_size().bits(), 8);
    }

    #[test]
    fn clear_resets() {
        let mut calc = ProgrammerCalculator::new();
        calc.press_digit('1');
        calc.press_operator(Operator::Or).unwrap();
        calc.clear();
        assert_eq!(calc.display(), "0");
        assert!(!calc.has_pending());
    }
}
