/// Host-side toggles that gate interaction and chrome.
///
/// Drag and resize flips are recorded as pending changes so the frame loop
/// can forward them to the engine exactly once, which is where an active
/// session gets cancelled.
#[derive(Debug, Clone, Copy)]
pub struct InteractionFlags {
    drag_enabled: bool,
    drag_dirty: bool,
    resize_enabled: bool,
    resize_dirty: bool,
    show_grid: bool,
    help_visible: bool,
}

impl Default for InteractionFlags {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl InteractionFlags {
    pub fn new(drag_enabled: bool, resize_enabled: bool) -> Self {
        Self {
            drag_enabled,
            drag_dirty: false,
            resize_enabled,
            resize_dirty: false,
            show_grid: true,
            help_visible: false,
        }
    }

    pub fn drag_enabled(&self) -> bool {
        self.drag_enabled
    }

    pub fn set_drag_enabled(&mut self, enabled: bool) {
        if self.drag_enabled == enabled {
            return;
        }
        self.drag_enabled = enabled;
        self.drag_dirty = true;
    }

    pub fn toggle_drag(&mut self) {
        let enabled = !self.drag_enabled;
        self.set_drag_enabled(enabled);
    }

    pub fn take_drag_change(&mut self) -> Option<bool> {
        if self.drag_dirty {
            self.drag_dirty = false;
            Some(self.drag_enabled)
        } else {
            None
        }
    }

    pub fn resize_enabled(&self) -> bool {
        self.resize_enabled
    }

    pub fn set_resize_enabled(&mut self, enabled: bool) {
        if self.resize_enabled == enabled {
            return;
        }
        self.resize_enabled = enabled;
        self.resize_dirty = true;
    }

    pub fn toggle_resize(&mut self) {
        let enabled = !self.resize_enabled;
        self.set_resize_enabled(enabled);
    }

    pub fn take_resize_change(&mut self) -> Option<bool> {
        if self.resize_dirty {
            self.resize_dirty = false;
            Some(self.resize_enabled)
        } else {
            None
        }
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn toggle_grid(&mut self) {
        self.show_grid = !self.show_grid;
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn set_help_visible(&mut self, visible: bool) {
        self.help_visible = visible;
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_toggle_and_take_change() {
        let mut s = InteractionFlags::default();
        assert!(s.drag_enabled());
        s.set_drag_enabled(true);
        // no change -> None
        assert!(s.take_drag_change().is_none());
        s.set_drag_enabled(false);
        assert_eq!(s.take_drag_change(), Some(false));
        // consumed
        assert!(s.take_drag_change().is_none());
        s.toggle_drag();
        assert!(s.drag_enabled());
        assert_eq!(s.take_drag_change(), Some(true));
    }

    #[test]
    fn resize_changes_are_tracked_separately() {
        let mut s = InteractionFlags::new(true, false);
        s.toggle_resize();
        assert!(s.take_drag_change().is_none());
        assert_eq!(s.take_resize_change(), Some(true));
    }
}
