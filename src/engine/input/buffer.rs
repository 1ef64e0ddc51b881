// Edge latching between frames and fixed ticks
//
// A frame may run zero or several simulation ticks. Presses and releases are
// latched here until a tick consumes them, and dropped if no tick does within
// a few ticks.

use super::action::ActionEvent;
use std::collections::VecDeque;

/// Maximum number of latched edges to store
const MAX_BUFFER_SIZE: usize = 30;

/// How many ticks an unconsumed edge survives
const BUFFER_TICKS: u32 = 5;

/// A single latched edge
#[derive(Debug, Clone, Copy)]
pub struct BufferedInput {
    pub event: ActionEvent,
    pub ticks_remaining: u32,
}

impl BufferedInput {
    pub fn new(event: ActionEvent) -> Self {
        Self {
            event,
            ticks_remaining: BUFFER_TICKS,
        }
    }

    /// Decrease the remaining ticks
    pub fn age(&mut self) {
        if self.ticks_remaining > 0 {
            self.ticks_remaining -= 1;
        }
    }

    pub fn is_expired(&self) -> bool {
        self.ticks_remaining == 0
    }
}

/// Edge buffer for a single player
#[derive(Debug)]
pub struct InputBuffer {
    buffer: VecDeque<BufferedInput>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(MAX_BUFFER_SIZE),
        }
    }

    /// Latch an edge; an identical edge already waiting is not duplicated
    pub fn push(&mut self, event: ActionEvent) {
        if !self.has(event) {
            self.buffer.push_back(BufferedInput::new(event));

            // Keep buffer size under control
            if self.buffer.len() > MAX_BUFFER_SIZE {
                self.buffer.pop_front();
            }
        }
    }

    pub fn has(&self, event: ActionEvent) -> bool {
        self.buffer.iter().any(|input| input.event == event)
    }

    /// Consume an edge if it is latched
    pub fn consume(&mut self, event: ActionEvent) -> bool {
        if let Some(pos) = self.buffer.iter().position(|input| input.event == event) {
            self.buffer.remove(pos);
            true
        } else {
            false
        }
    }

    /// Age every edge and drop expired ones. Call once per tick.
    pub fn update(&mut self) {
        for input in &mut self.buffer {
            input.age();
        }
        self.buffer.retain(|input| !input.is_expired());
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::super::action::Action;
    use super::*;

    const JUMP: ActionEvent = ActionEvent::Pressed(Action::Jump);
    const DASH: ActionEvent = ActionEvent::Pressed(Action::Dash);

    #[test]
    fn test_buffered_input_expiration() {
        let mut input = BufferedInput::new(JUMP);
        assert!(!input.is_expired());
        for _ in 0..BUFFER_TICKS {
            input.age();
        }
        assert!(input.is_expired());
    }

    #[test]
    fn test_buffer_no_duplicates() {
        let mut buffer = InputBuffer::new();
        buffer.push(JUMP);
        buffer.push(JUMP);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_press_and_release_are_distinct() {
        let mut buffer = InputBuffer::new();
        buffer.push(JUMP);
        buffer.push(ActionEvent::Released(Action::Jump));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_buffer_consume() {
        let mut buffer = InputBuffer::new();
        buffer.push(JUMP);
        assert!(buffer.consume(JUMP));
        assert!(!buffer.has(JUMP));
        assert!(!buffer.consume(JUMP));
    }

    #[test]
    fn test_buffer_expires_after_ticks() {
        let mut buffer = InputBuffer::new();
        buffer.push(JUMP);
        for _ in 0..BUFFER_TICKS - 1 {
            buffer.update();
        }
        assert!(buffer.has(JUMP));
        buffer.update();
        assert!(buffer.is_empty(), "Expired inputs should be removed");
    }

    #[test]
    fn test_buffer_clear() {
        let mut buffer = InputBuffer::new();
        buffer.push(JUMP);
        buffer.push(DASH);
        buffer.clear();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_buffer_max_size() {
        let mut buffer = InputBuffer::new();
        for i in 0..MAX_BUFFER_SIZE + 10 {
            let action = Action::ALL[i % Action::ALL.len()];
            buffer.push(if i % 2 == 0 {
                ActionEvent::Pressed(action)
            } else {
                ActionEvent::Released(action)
            });
        }
        assert!(buffer.len() <= MAX_BUFFER_SIZE);
    }
}
