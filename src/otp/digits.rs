//! Four-slot code input with paste distribution and backspace navigation.

use serde::Serialize;

use super::error::OtpError;

pub const SLOT_COUNT: usize = 4;
const LAST_SLOT: usize = SLOT_COUNT - 1;

/// Per-slot values plus the slot that currently holds input focus.
///
/// Each slot is either empty or holds one character. Single-key entry only
/// accepts decimal digits; the paste path copies characters as they come.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DigitSlots {
    slots: [Option<char>; SLOT_COUNT],
    focus: usize,
}

impl DigitSlots {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an input-change event for the slot at `index`.
    ///
    /// # Errors
    /// Returns `OtpError::SlotOutOfRange` if `index` is not a valid slot.
    pub fn set(&mut self, index: usize, raw: &str) -> Result<(), OtpError> {
        check_index(index)?;

        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (None, _) => {
                self.slots[index] = None;
            }
            (Some(c), None) => {
                if !c.is_ascii_digit() {
                    return Ok(());
                }
                self.slots[index] = Some(c);
                if index < LAST_SLOT {
                    self.focus = index + 1;
                }
            }
            (Some(_), Some(_)) => {
                for (slot, c) in self.slots[index..].iter_mut().zip(raw.chars()) {
                    *slot = Some(c);
                }
                self.focus = LAST_SLOT;
            }
        }

        Ok(())
    }

    /// Backspace on the slot at `index`: hop left only when there is nothing to delete.
    ///
    /// # Errors
    /// Returns `OtpError::SlotOutOfRange` if `index` is not a valid slot.
    pub fn backspace(&mut self, index: usize) -> Result<(), OtpError> {
        check_index(index)?;

        if self.slots[index].is_none() && index > 0 {
            self.focus = index - 1;
        }

        Ok(())
    }

    #[must_use]
    pub fn focus(&self) -> usize {
        self.focus
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<char> {
        self.slots.get(index).copied().flatten()
    }

    #[must_use]
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.filled() == SLOT_COUNT
    }

    /// Joined slot values, `None` unless every slot is populated.
    #[must_use]
    pub fn joined(&self) -> Option<String> {
        self.slots.iter().copied().collect()
    }

    /// Slot values as strings, empty for unpopulated slots.
    #[must_use]
    pub fn values(&self) -> [String; SLOT_COUNT] {
        self.slots
            .map(|slot| slot.map(String::from).unwrap_or_default())
    }
}

fn check_index(index: usize) -> Result<(), OtpError> {
    if index < SLOT_COUNT {
        Ok(())
    } else {
        Err(OtpError::SlotOutOfRange { index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_with(code: &str) -> DigitSlots {
        let mut slots = DigitSlots::new();
        for (index, c) in code.chars().enumerate() {
            slots.set(index, &c.to_string()).unwrap();
        }
        slots
    }

    #[test]
    fn sequential_entry_joins_in_order() {
        for code in ["0000", "4821", "9173", "1204"] {
            let slots = filled_with(code);
            assert_eq!(slots.joined().as_deref(), Some(code));
        }
    }

    #[test]
    fn single_digit_advances_focus() {
        let mut slots = DigitSlots::new();
        slots.set(0, "7").unwrap();
        assert_eq!(slots.focus(), 1);
        slots.set(1, "3").unwrap();
        assert_eq!(slots.focus(), 2);
    }

    #[test]
    fn last_slot_keeps_focus() {
        let mut slots = DigitSlots::new();
        slots.set(2, "1").unwrap();
        assert_eq!(slots.focus(), 3);
        slots.set(3, "2").unwrap();
        assert_eq!(slots.focus(), 3);
    }

    #[test]
    fn non_digit_keystroke_is_ignored() {
        let mut slots = DigitSlots::new();
        slots.set(0, "a").unwrap();
        slots.set(0, " ").unwrap();
        assert_eq!(slots, DigitSlots::new());
    }

    #[test]
    fn empty_input_clears_without_moving_focus() {
        let mut slots = filled_with("12");
        assert_eq!(slots.focus(), 2);
        slots.set(1, "").unwrap();
        assert_eq!(slots.get(1), None);
        assert_eq!(slots.get(0), Some('1'));
        assert_eq!(slots.focus(), 2);
    }

    #[test]
    fn paste_fills_all_slots_and_focuses_last() {
        let mut slots = DigitSlots::new();
        slots.set(0, "4821").unwrap();
        assert_eq!(slots.values(), ["4", "8", "2", "1"]);
        assert_eq!(slots.focus(), 3);
    }

    #[test]
    fn paste_discards_overflow() {
        let mut slots = DigitSlots::new();
        slots.set(0, "123456").unwrap();
        assert_eq!(slots.joined().as_deref(), Some("1234"));
    }

    #[test]
    fn paste_from_middle_slot_keeps_earlier_slots() {
        let mut slots = filled_with("9999");
        slots.set(2, "12").unwrap();
        assert_eq!(slots.joined().as_deref(), Some("9912"));

        let mut slots = DigitSlots::new();
        slots.set(1, "56789").unwrap();
        assert_eq!(slots.values(), ["", "5", "6", "7"]);
        assert_eq!(slots.focus(), 3);
    }

    #[test]
    fn short_paste_still_focuses_last_slot() {
        let mut slots = DigitSlots::new();
        slots.set(0, "12").unwrap();
        assert_eq!(slots.values(), ["1", "2", "", ""]);
        assert_eq!(slots.focus(), 3);
    }

    #[test]
    fn paste_does_not_filter_non_digits() {
        let mut slots = DigitSlots::new();
        slots.set(0, "4a2b").unwrap();
        assert_eq!(slots.values(), ["4", "a", "2", "b"]);
        assert!(slots.is_complete());
    }

    #[test]
    fn backspace_on_empty_slot_moves_left() {
        let mut slots = filled_with("12");
        slots.backspace(2).unwrap();
        assert_eq!(slots.focus(), 1);
        // previous value is left for the next input event to clear
        assert_eq!(slots.get(1), Some('2'));
    }

    #[test]
    fn backspace_on_filled_slot_keeps_focus() {
        let mut slots = filled_with("123");
        assert_eq!(slots.focus(), 3);
        slots.backspace(2).unwrap();
        assert_eq!(slots.focus(), 3);
    }

    #[test]
    fn backspace_on_first_slot_stays() {
        let mut slots = DigitSlots::new();
        slots.backspace(0).unwrap();
        assert_eq!(slots.focus(), 0);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut slots = DigitSlots::new();
        assert!(matches!(
            slots.set(4, "1"),
            Err(OtpError::SlotOutOfRange { index: 4 })
        ));
        assert!(matches!(
            slots.backspace(9),
            Err(OtpError::SlotOutOfRange { index: 9 })
        ));
        assert_eq!(slots, DigitSlots::new());
    }

    #[test]
    fn incomplete_slots_do_not_join() {
        let slots = filled_with("482");
        assert_eq!(slots.filled(), 3);
        assert_eq!(slots.joined(), None);
    }
}
