//! "Active 5 minutes ago" line for a single user.
//!
//! [`ActivityLabel`] holds the props (user id and an optional color). [`ActivityLabelState`]
//! connects it to the store: it keeps the user's presence slice and a subscription that flags
//! the label for redraw when that slice, and nothing else, changes.
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{StatefulWidget, Widget},
};
use tracing::warn;

use super::label::Label;
use super::style::merge_styles;
use crate::presence::{presence_of, Clock, Humanizer, Presence, PresenceAccessor, PresenceIndex, SystemClock};
use crate::store::{Store, Subscription};
use crate::theme::ThemeContext;

static SYSTEM_CLOCK: SystemClock = SystemClock;

/// Activity line for one user
pub struct ActivityLabel<'a> {
    /// User whose activity is shown
    pub user_id: &'a str,
    /// Color override applied on top of the inherited text style
    pub color: Option<Color>,
    /// Inherited text style
    pub style: Style,
    humanizer: &'a Humanizer,
    clock: &'a dyn Clock,
}

impl<'a> ActivityLabel<'a> {
    /// Create a label for `user_id` using the default humanizer and the system clock
    pub fn new(user_id: &'a str) -> Self {
        Self {
            user_id,
            color: None,
            style: Style::default(),
            humanizer: Humanizer::shared_default(),
            clock: &SYSTEM_CLOCK,
        }
    }

    /// Set the color override
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the inherited style
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Use a configured humanizer
    pub fn humanizer(mut self, humanizer: &'a Humanizer) -> Self {
        self.humanizer = humanizer;
        self
    }

    /// Read the current instant from `clock`
    pub fn clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Text for a presence slice, read against the clock right now
    pub fn text_for(&self, presence: Option<&Presence>) -> Option<String> {
        let phrase = self.humanizer.humanize(presence, self.clock.now())?;
        Some(format!("Active {phrase}"))
    }

    /// Text for this label's user, looked up in the presence index
    pub fn text(&self, index: &PresenceIndex) -> Option<String> {
        self.text_for(index.get(self.user_id))
    }

    /// Style after merging the theme's text color, the inherited style and the override
    pub fn resolved_style(&self) -> Style {
        merge_styles([
            ThemeContext::select(|styles| styles.text_style()),
            Some(self.style),
            self.color.map(|color| Style::default().fg(color)),
        ])
    }

    /// The styled line for a presence slice, or `None` when the label renders nothing
    pub fn line_for(&self, presence: Option<&Presence>) -> Option<Line<'static>> {
        let text = self.text_for(presence)?;
        Some(Line::styled(text, self.resolved_style()))
    }

    /// The styled line for this label's user, looked up through the accessor
    pub fn line<S: PresenceAccessor + ?Sized>(&self, state: &S) -> Option<Line<'static>> {
        self.line_for(state.presence_index().get(self.user_id))
    }

    /// Render straight from the application state, without a subscription
    pub fn render_from<S: PresenceAccessor + ?Sized>(self, state: &S, area: Rect, buf: &mut Buffer) {
        let presence = state.presence_index().get(self.user_id);
        self.draw(presence, area, buf);
    }

    fn draw(&self, presence: Option<&Presence>, area: Rect, buf: &mut Buffer) {
        // Absent labels leave the buffer untouched.
        if let Some(text) = self.text_for(presence) {
            Label::new(text).style(self.resolved_style()).render(area, buf);
        }
    }
}

/// Store connection for an [`ActivityLabel`]
#[derive(Debug)]
pub struct ActivityLabelState {
    user_id: String,
    presence: Rc<RefCell<Option<Presence>>>,
    dirty: Rc<Cell<bool>>,
    _subscription: Subscription,
}

impl ActivityLabelState {
    /// Subscribe to `user_id`'s presence slice in `store`
    pub fn connect<S>(store: &Store<S>, user_id: impl Into<String>) -> Self
    where
        S: PresenceAccessor + 'static,
    {
        let user_id = user_id.into();
        let presence = Rc::new(RefCell::new(store.select(|state| presence_of(state, &user_id))));
        let dirty = Rc::new(Cell::new(true));

        let key = user_id.clone();
        let subscription = store.subscribe(
            move |state: &S| presence_of(state, &key),
            {
                let presence = Rc::clone(&presence);
                let dirty = Rc::clone(&dirty);
                move |slice: &Option<Presence>| {
                    *presence.borrow_mut() = slice.clone();
                    dirty.set(true);
                }
            },
        );

        Self {
            user_id,
            presence,
            dirty,
            _subscription: subscription,
        }
    }

    /// The user this state is subscribed to
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The latest presence slice seen for the user
    pub fn presence(&self) -> Ref<'_, Option<Presence>> {
        self.presence.borrow()
    }

    /// Whether the slice changed since the last draw
    pub fn needs_redraw(&self) -> bool {
        self.dirty.get()
    }

    /// Record that the current slice has been drawn
    pub fn mark_drawn(&self) {
        self.dirty.set(false);
    }
}

impl StatefulWidget for ActivityLabel<'_> {
    type State = ActivityLabelState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if state.user_id != self.user_id {
            warn!(
                label = self.user_id,
                state = state.user_id.as_str(),
                "Activity label drawn with state for another user"
            );
            return;
        }

        let presence = state.presence.borrow();
        self.draw(presence.as_ref(), area, buf);
        state.mark_drawn();
    }
}
