//! Scoped theme bindings.
//!
//! A screen provides its theme with [`ThemeContext::provide`] and keeps the returned
//! [`ThemeScope`] alive while it draws. Widgets anywhere below read the nearest binding with
//! [`ThemeContext::current`] or [`ThemeContext::select`], so layout code in between never has to
//! carry a theme parameter. Bindings are per thread; rendering happens on one thread.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use super::{Theme, ThemeStyles};

thread_local! {
    static BINDINGS: RefCell<Vec<(u64, Rc<Theme>)>> = const { RefCell::new(Vec::new()) };
    static NEXT_SCOPE_ID: Cell<u64> = const { Cell::new(0) };
    static NEUTRAL: Rc<Theme> = Rc::new(Theme::neutral());
}

/// Entry points for providing and reading the ambient theme
pub struct ThemeContext;

impl ThemeContext {
    /// Bind `theme` for everything drawn until the returned scope is dropped.
    ///
    /// A nested binding shadows the outer one; the two are never merged.
    pub fn provide(theme: impl Into<Rc<Theme>>) -> ThemeScope {
        let theme = theme.into();
        let id = NEXT_SCOPE_ID.with(|next| {
            let id = next.get();
            next.set(id.wrapping_add(1));
            id
        });

        let depth = BINDINGS.with(|bindings| {
            let mut bindings = bindings.borrow_mut();
            bindings.push((id, Rc::clone(&theme)));
            bindings.len()
        });
        debug!(scope = id, depth, "Theme provided");

        ThemeScope { id, theme }
    }

    /// Run `f` with `theme` bound, releasing the binding afterwards
    pub fn scoped<R>(theme: impl Into<Rc<Theme>>, f: impl FnOnce() -> R) -> R {
        let _scope = Self::provide(theme);
        f()
    }

    /// The nearest bound theme, or the neutral theme when nothing is bound
    pub fn current() -> Rc<Theme> {
        BINDINGS
            .with(|bindings| bindings.borrow().last().map(|(_, theme)| Rc::clone(theme)))
            .unwrap_or_else(|| NEUTRAL.with(Rc::clone))
    }

    /// Read only the style values a widget needs
    pub fn select<T>(f: impl FnOnce(&ThemeStyles) -> T) -> T {
        let theme = Self::current();
        f(&theme.styles)
    }

    /// Check whether any theme is bound on this thread
    pub fn is_provided() -> bool {
        Self::depth() > 0
    }

    /// Number of active bindings on this thread
    pub fn depth() -> usize {
        BINDINGS.with(|bindings| bindings.borrow().len())
    }
}

/// Guard for one theme binding; dropping it releases the binding
#[must_use = "the theme is unbound as soon as the scope is dropped"]
#[derive(Debug)]
pub struct ThemeScope {
    id: u64,
    theme: Rc<Theme>,
}

impl ThemeScope {
    /// The theme bound by this scope
    pub fn theme(&self) -> &Rc<Theme> {
        &self.theme
    }
}

impl Drop for ThemeScope {
    fn drop(&mut self) {
        // Thread-local storage may already be gone during thread teardown.
        let _ = BINDINGS.try_with(|bindings| {
            let mut bindings = bindings.borrow_mut();
            if let Some(pos) = bindings.iter().rposition(|(id, _)| *id == self.id) {
                bindings.remove(pos);
            }
        });
        debug!(scope = self.id, "Theme released");
    }
}
