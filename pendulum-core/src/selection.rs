//! Session-wide selection shared by the viewport, toolbar and edit form.

use std::fmt;

/// Handle returned by [`SelectionState::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type TickListener = Box<dyn FnMut(u64)>;

/// Which segment is selected, whether the edit panel is open, and the
/// render counter that forces dependent views to refresh.
///
/// All mutation goes through named operations so the index-validity rule
/// lives in one place: a selection is only trusted after
/// [`resolve`](Self::resolve) has checked it against the live chain.
#[derive(Default)]
pub struct SelectionState {
    selected: Option<usize>,
    edit_panel_open: bool,
    render_tick: u64,
    listeners: Vec<(SubscriptionId, TickListener)>,
    next_id: u64,
}

impl fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionState")
            .field("selected", &self.selected)
            .field("edit_panel_open", &self.edit_panel_open)
            .field("render_tick", &self.render_tick)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, index: Option<usize>) {
        if self.selected != index {
            log::debug!("selection {:?} -> {:?}", self.selected, index);
        }
        self.selected = index;
    }

    /// Selected index validated against a chain of `chain_len` segments.
    /// A stale index is cleared (and the panel closed) rather than returned.
    pub fn resolve(&mut self, chain_len: usize) -> Option<usize> {
        match self.selected {
            Some(i) if i >= chain_len => {
                log::warn!("clearing stale selection {i} (chain has {chain_len} segments)");
                self.selected = None;
                self.edit_panel_open = false;
                None
            }
            other => other,
        }
    }

    /// Last selected index without validation. Use [`resolve`](Self::resolve)
    /// before indexing into the chain.
    pub fn raw_selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn open_panel(&mut self) {
        self.edit_panel_open = true;
    }

    pub fn close_panel(&mut self) {
        self.edit_panel_open = false;
    }

    pub fn is_panel_open(&self) -> bool {
        self.edit_panel_open
    }

    pub fn render_tick(&self) -> u64 {
        self.render_tick
    }

    /// Advance the render counter and notify every subscriber.
    pub fn bump_render(&mut self) -> u64 {
        self.render_tick = self.render_tick.wrapping_add(1);
        let tick = self.render_tick;
        for (_, listener) in self.listeners.iter_mut() {
            listener(tick);
        }
        tick
    }

    pub fn subscribe(&mut self, listener: impl FnMut(u64) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn stale_selection_resolves_to_none_and_closes_panel() {
        let mut sel = SelectionState::new();
        sel.select(Some(2));
        sel.open_panel();
        assert_eq!(sel.resolve(3), Some(2));
        assert_eq!(sel.resolve(2), None);
        assert!(!sel.is_panel_open());
        assert_eq!(sel.raw_selected(), None);
    }

    #[test]
    fn subscribers_see_every_tick_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut sel = SelectionState::new();
        let sink = seen.clone();
        let id = sel.subscribe(move |t| sink.borrow_mut().push(t));
        sel.bump_render();
        sel.bump_render();
        assert!(sel.unsubscribe(id));
        assert!(!sel.unsubscribe(id));
        sel.bump_render();
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(sel.render_tick(), 3);
    }
}
