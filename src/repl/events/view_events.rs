//! # View Events
//!
//! Events queued by the view model telling the renderer what to redraw.

/// Events emitted when view updates are needed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// Page table and pagination line need redrawing
    ListRedrawRequired,

    /// The modal form opened, changed or closed
    ModalChanged,

    /// Delete confirmation prompt should be shown
    ConfirmationRequired,

    /// Status bar (notifications, loading flag) needs updating
    StatusBarUpdateRequired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_events_should_compare_by_variant() {
        assert_eq!(ViewEvent::ListRedrawRequired, ViewEvent::ListRedrawRequired);
        assert_ne!(ViewEvent::ModalChanged, ViewEvent::StatusBarUpdateRequired);
    }
}
