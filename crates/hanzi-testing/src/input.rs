//! Mouse gesture simulation for terminal front-ends.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// A sequence of terminal events describing pen strokes and key presses.
#[derive(Debug, Clone, Default)]
pub struct GestureSequence {
    events: Vec<Event>,
}

impl GestureSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press the left button at a cell.
    pub fn press(&mut self, column: u16, row: u16) -> &mut Self {
        self.mouse(MouseEventKind::Down(MouseButton::Left), column, row)
    }

    /// Drag with the left button held.
    pub fn drag_to(&mut self, column: u16, row: u16) -> &mut Self {
        self.mouse(MouseEventKind::Drag(MouseButton::Left), column, row)
    }

    pub fn release(&mut self, column: u16, row: u16) -> &mut Self {
        self.mouse(MouseEventKind::Up(MouseButton::Left), column, row)
    }

    /// A full stroke through `cells`: press on the first, drag through the
    /// rest, release on the last.
    pub fn stroke(&mut self, cells: &[(u16, u16)]) -> &mut Self {
        let Some((&first, rest)) = cells.split_first() else {
            return self;
        };
        self.press(first.0, first.1);
        for &(column, row) in rest {
            self.drag_to(column, row);
        }
        let last = cells.last().copied().unwrap_or(first);
        self.release(last.0, last.1)
    }

    /// A straight stroke stepping one cell at a time from `from` to `to`.
    pub fn line(&mut self, from: (u16, u16), to: (u16, u16)) -> &mut Self {
        let dx = (to.0 as i32 - from.0 as i32).signum();
        let dy = (to.1 as i32 - from.1 as i32).signum();
        let (mut x, mut y) = (from.0 as i32, from.1 as i32);
        let mut cells = vec![from];
        while x != to.0 as i32 || y != to.1 as i32 {
            if x != to.0 as i32 {
                x += dx;
            }
            if y != to.1 as i32 {
                y += dy;
            }
            cells.push((x as u16, y as u16));
        }
        self.stroke(&cells)
    }

    pub fn char(&mut self, c: char) -> &mut Self {
        self.key(KeyCode::Char(c))
    }

    pub fn key(&mut self, code: KeyCode) -> &mut Self {
        self.events
            .push(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
        self
    }

    fn mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) -> &mut Self {
        self.events.push(Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }));
        self
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(seq: &GestureSequence) -> Vec<MouseEventKind> {
        seq.events()
            .iter()
            .filter_map(|e| match e {
                Event::Mouse(m) => Some(m.kind),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_stroke_shape() {
        let mut seq = GestureSequence::new();
        seq.stroke(&[(1, 1), (2, 1), (3, 1)]);
        assert_eq!(
            kinds(&seq),
            vec![
                MouseEventKind::Down(MouseButton::Left),
                MouseEventKind::Drag(MouseButton::Left),
                MouseEventKind::Drag(MouseButton::Left),
                MouseEventKind::Up(MouseButton::Left),
            ]
        );
    }

    #[test]
    fn test_line_steps_every_cell() {
        let mut seq = GestureSequence::new();
        seq.line((2, 5), (6, 5));
        // press + 4 drags + release
        assert_eq!(seq.len(), 6);
    }

    #[test]
    fn test_empty_stroke_is_ignored() {
        let mut seq = GestureSequence::new();
        seq.stroke(&[]).char('q');
        assert_eq!(seq.len(), 1);
        assert!(matches!(seq.events()[0], Event::Key(_)));
    }
}
