//! Expression buffer state machine for the calculator display.
//!
//! The buffer is opaque text handed to the server; no arithmetic is ever
//! evaluated on this side. Three states, all encoded in the buffer itself
//! plus one flag: EMPTY (the neutral `"0"`), EDITING (accumulated tokens),
//! and RESULT (the last computed result, with the next digit entry
//! restarting the buffer instead of appending).

/// Neutral display value.
const NEUTRAL: &str = "0";

/// The in-progress, unevaluated calculator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionBuffer {
    input: String,
    reset_on_next_entry: bool,
}

impl Default for ExpressionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionBuffer {
    /// Creates a buffer in the EMPTY state.
    pub fn new() -> Self {
        Self {
            input: NEUTRAL.to_string(),
            reset_on_next_entry: false,
        }
    }

    /// The current display value.
    pub fn value(&self) -> &str {
        &self.input
    }

    /// True after a successful calculation, until the next entry or clear.
    pub fn holds_result(&self) -> bool {
        self.reset_on_next_entry
    }

    /// Appends a token to the buffer.
    ///
    /// In RESULT state the buffer restarts (the flag is consumed). A neutral
    /// `"0"` is replaced rather than prefixed, unless the token is a decimal
    /// point.
    pub fn append(&mut self, token: char) {
        if self.reset_on_next_entry {
            self.input.clear();
            self.reset_on_next_entry = false;
        }

        if self.input == NEUTRAL && token != '.' {
            self.input.clear();
        }

        self.input.push(token);
    }

    /// Resets the buffer to the EMPTY state.
    pub fn clear(&mut self) {
        self.input = NEUTRAL.to_string();
        self.reset_on_next_entry = false;
    }

    /// Removes the last character; an emptied buffer resets to `"0"`.
    pub fn backspace(&mut self) {
        self.input.pop();
        if self.input.is_empty() {
            self.input = NEUTRAL.to_string();
        }
    }

    /// Replaces the buffer with a computed result and enters RESULT state.
    pub fn accept_result(&mut self, result: &str) {
        self.input = result.to_string();
        self.reset_on_next_entry = true;
    }

    /// Resets to `"0"` after a failed calculation; no partial state remains.
    pub fn reset_after_error(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_neutral() {
        let buffer = ExpressionBuffer::new();
        assert_eq!(buffer.value(), "0");
        assert!(!buffer.holds_result());
    }

    #[test]
    fn test_neutral_zero_is_replaced_by_digit() {
        let mut buffer = ExpressionBuffer::new();
        buffer.append('5');
        assert_eq!(buffer.value(), "5");
    }

    #[test]
    fn test_neutral_zero_keeps_decimal_point() {
        let mut buffer = ExpressionBuffer::new();
        buffer.append('.');
        assert_eq!(buffer.value(), "0.");
    }

    #[test]
    fn test_append_accumulates_tokens() {
        let mut buffer = ExpressionBuffer::new();
        for c in "12+3.5".chars() {
            buffer.append(c);
        }
        assert_eq!(buffer.value(), "12+3.5");
    }

    #[test]
    fn test_result_state_restarts_on_entry() {
        let mut buffer = ExpressionBuffer::new();
        buffer.append('2');
        buffer.accept_result("4");
        assert_eq!(buffer.value(), "4");
        assert!(buffer.holds_result());

        buffer.append('7');
        assert_eq!(buffer.value(), "7");
        assert!(!buffer.holds_result());
    }

    #[test]
    fn test_clear_resets_result_flag() {
        let mut buffer = ExpressionBuffer::new();
        buffer.accept_result("42");
        buffer.clear();
        assert_eq!(buffer.value(), "0");
        assert!(!buffer.holds_result());
    }

    #[test]
    fn test_backspace_to_empty_restores_neutral() {
        let mut buffer = ExpressionBuffer::new();
        buffer.append('8');
        buffer.backspace();
        assert_eq!(buffer.value(), "0");

        buffer.backspace();
        assert_eq!(buffer.value(), "0");
    }

    #[test]
    fn test_no_leading_zero_prefix_over_sequences() {
        // For all append/clear/backspace sequences, "0" is replaced, never
        // prefixed: the buffer must not show a leading zero directly
        // followed by a non-decimal digit.
        let tokens = ['0', '1', '.', '+'];
        let mut buffer = ExpressionBuffer::new();

        for round in 0..200 {
            match round % 7 {
                0 | 1 | 2 | 3 => buffer.append(tokens[round % tokens.len()]),
                4 => buffer.backspace(),
                5 => buffer.append('0'),
                _ => buffer.clear(),
            }

            let bytes = buffer.value().as_bytes();
            if bytes.len() >= 2 && bytes[0] == b'0' {
                assert_eq!(
                    bytes[1], b'.',
                    "leading zero prefixed a digit: {:?}",
                    buffer.value()
                );
            }
        }
    }
}
