// dispatch module - queue between action handlers and the window
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::core::formatting::FormatCommand;
use crate::core::sidebar::SidebarTab;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Themes,
    Fonts,
    AppLanguages,
    PreviewOptions,
    Preferences,
    About,
}

/// Work requested by an action handler, performed by the window on its
/// next frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    NewFile,
    OpenFile,
    OpenRecent(usize),
    ReopenLast,
    ClearHistory,
    Save,
    SaveAs,
    Rename,
    Reload,
    Export,
    Quit,

    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    CopyHtml,
    InsertImage,
    Find,
    Replace,
    FindNext,
    FindPrevious,
    SelectAll,
    HemingwayMode(bool),
    SpellCheck,

    Format(FormatCommand),

    FullScreen(bool),
    HtmlPreview(bool),
    DistractionFree(bool),
    Sidebar(bool),
    DarkMode(bool),
    ShowSidebarTab(SidebarTab),
    ZoomIn,
    ZoomOut,

    ShowDialog(DialogKind),
    OpenUrl(&'static str),
}

/// Shared FIFO of dispatches. Cloning shares the same queue.
#[derive(Debug, Clone, Default)]
pub struct DispatchQueue {
    inner: Rc<RefCell<VecDeque<Dispatch>>>,
}

impl DispatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, dispatch: Dispatch) {
        self.inner.borrow_mut().push_back(dispatch);
    }

    pub fn pop(&self) -> Option<Dispatch> {
        self.inner.borrow_mut().pop_front()
    }

    pub fn drain(&self) -> Vec<Dispatch> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// A handler that enqueues `dispatch` each time it runs.
    pub fn sender(&self, dispatch: Dispatch) -> impl FnMut() + 'static {
        let queue = self.clone();
        move || queue.push(dispatch.clone())
    }

    /// A toggle handler that enqueues `make(checked)`.
    pub fn toggle_sender(&self, make: fn(bool) -> Dispatch) -> impl FnMut(bool) + 'static {
        let queue = self.clone();
        move |checked| queue.push(make(checked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_queue() {
        let queue = DispatchQueue::new();
        let other = queue.clone();
        other.push(Dispatch::Save);
        queue.push(Dispatch::Quit);

        assert_eq!(queue.len(), 2);
        assert_eq!(other.drain(), vec![Dispatch::Save, Dispatch::Quit]);
        assert!(queue.is_empty());
    }

    #[test]
    fn senders_enqueue_on_call() {
        let queue = DispatchQueue::new();
        let mut send = queue.sender(Dispatch::OpenRecent(3));
        let mut toggle = queue.toggle_sender(Dispatch::FullScreen);

        send();
        toggle(true);

        assert_eq!(queue.pop(), Some(Dispatch::OpenRecent(3)));
        assert_eq!(queue.pop(), Some(Dispatch::FullScreen(true)));
        assert_eq!(queue.pop(), None);
    }
}
