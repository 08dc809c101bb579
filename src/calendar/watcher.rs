use std::collections::VecDeque;

use super::anchor::MonthAnchor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    Forward,
    Backward,
}

/// Last month loaded at either end of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursors {
    pub forward: MonthAnchor,
    pub backward: MonthAnchor,
}

impl Cursors {
    /// Cursors for a window seeded with the months before and after `current`.
    pub fn around(current: MonthAnchor) -> Self {
        Cursors {
            forward: current.next(),
            backward: current.prev(),
        }
    }

    /// Moves the cursor of `extension` one month outwards and returns the
    /// new cursors together with the month to load.
    pub fn step(self, extension: Extension) -> (Cursors, MonthAnchor) {
        match extension {
            Extension::Forward => {
                let forward = self.forward.next();
                (Cursors { forward, ..self }, forward)
            }
            Extension::Backward => {
                let backward = self.backward.prev();
                (Cursors { backward, ..self }, backward)
            }
        }
    }
}

/// Decides on an extension from the visible range. Reaching the end wins
/// over reaching the start.
pub fn decide(first_visible: usize, last_visible: usize, count: usize) -> Option<Extension> {
    if last_visible + 1 == count {
        Some(Extension::Forward)
    } else if first_visible == 0 {
        Some(Extension::Backward)
    } else {
        None
    }
}

/// Collects extensions requested while the renderer is laying out. They are
/// applied later, in request order, once the triggering callback returned.
#[derive(Debug, Default)]
pub struct ScrollWatcher {
    pending: VecDeque<Extension>,
}

impl ScrollWatcher {
    pub fn on_visible_range_changed(
        &mut self,
        first_visible: usize,
        last_visible: usize,
        count: usize,
    ) -> Option<Extension> {
        let extension = decide(first_visible, last_visible, count)?;

        log::debug!(
            "Visible {}..={} of {} requests {:?} extension",
            first_visible,
            last_visible,
            count,
            extension
        );
        self.pending.push_back(extension);

        Some(extension)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn peek_pending(&self) -> Option<Extension> {
        self.pending.front().copied()
    }

    pub fn next_pending(&mut self) -> Option<Extension> {
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Month;

    #[test]
    fn last_unit_visible_extends_forward() {
        assert_eq!(decide(40, 128, 129), Some(Extension::Forward));
    }

    #[test]
    fn first_unit_visible_extends_backward() {
        assert_eq!(decide(0, 60, 129), Some(Extension::Backward));
    }

    #[test]
    fn both_edges_visible_prefers_forward() {
        assert_eq!(decide(0, 128, 129), Some(Extension::Forward));
    }

    #[test]
    fn interior_range_does_nothing() {
        assert_eq!(decide(1, 127, 129), None);
        let mut watcher = ScrollWatcher::default();
        assert_eq!(watcher.on_visible_range_changed(10, 20, 129), None);
        assert!(!watcher.has_pending());
    }

    #[test]
    fn requests_are_kept_in_order_without_dedup() {
        let mut watcher = ScrollWatcher::default();
        watcher.on_visible_range_changed(50, 128, 129);
        watcher.on_visible_range_changed(50, 128, 129);
        watcher.on_visible_range_changed(0, 10, 129);

        assert_eq!(watcher.peek_pending(), Some(Extension::Forward));
        assert_eq!(watcher.next_pending(), Some(Extension::Forward));
        assert_eq!(watcher.next_pending(), Some(Extension::Forward));
        assert_eq!(watcher.peek_pending(), Some(Extension::Backward));
        assert_eq!(watcher.next_pending(), Some(Extension::Backward));
        assert_eq!(watcher.next_pending(), None);
    }

    #[test]
    fn cursors_step_outwards() {
        let cursors = Cursors::around(MonthAnchor::new(Month::January, 2024));
        assert_eq!(cursors.backward, MonthAnchor::new(Month::December, 2023));
        assert_eq!(cursors.forward, MonthAnchor::new(Month::February, 2024));

        let (cursors, next) = cursors.step(Extension::Forward);
        assert_eq!(next, MonthAnchor::new(Month::March, 2024));
        assert_eq!(cursors.forward, next);

        let (cursors, prev) = cursors.step(Extension::Backward);
        assert_eq!(prev, MonthAnchor::new(Month::November, 2023));
        assert_eq!(cursors.backward, prev);
        assert_eq!(cursors.forward, MonthAnchor::new(Month::March, 2024));
    }
}
