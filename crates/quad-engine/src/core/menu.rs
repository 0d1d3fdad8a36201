use std::fmt;

/// Action a menu item triggers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MenuAction {
    Quit,
}

/// Keyboard equivalent of a menu item: the platform's primary modifier plus a key.
///
/// The primary modifier is Cmd on macOS and Ctrl elsewhere.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Shortcut {
    pub key: char,
}

impl Shortcut {
    pub const fn primary(key: char) -> Self {
        Self { key }
    }

    /// Returns true when `text` with the given modifier state triggers this shortcut.
    pub fn matches(&self, text: &str, modifiers: ShortcutModifiers) -> bool {
        if !modifiers.primary(cfg!(target_os = "macos")) || modifiers.alt || modifiers.shift {
            return false;
        }
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c.eq_ignore_ascii_case(&self.key),
            _ => false,
        }
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifier = if cfg!(target_os = "macos") { "Cmd" } else { "Ctrl" };
        write!(f, "{modifier}+{}", self.key.to_ascii_uppercase())
    }
}

/// Modifier keys held when a key was pressed.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl ShortcutModifiers {
    fn primary(self, mac: bool) -> bool {
        if mac { self.meta && !self.ctrl } else { self.ctrl && !self.meta }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MenuItem {
    pub title: String,
    pub action: MenuAction,
    pub shortcut: Option<Shortcut>,
}

/// Application menu: a single menu named after the process.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AppMenu {
    pub title: String,
    pub items: Vec<MenuItem>,
}

impl AppMenu {
    /// Menu with one `Quit <app>` item bound to primary+Q.
    pub fn standard(app_name: &str) -> Self {
        Self {
            title: app_name.to_string(),
            items: vec![MenuItem {
                title: format!("Quit {app_name}"),
                action: MenuAction::Quit,
                shortcut: Some(Shortcut::primary('q')),
            }],
        }
    }

    /// Resolves a key press to the action of the first matching item.
    pub fn action_for(&self, text: &str, modifiers: ShortcutModifiers) -> Option<MenuAction> {
        self.items
            .iter()
            .find(|item| item.shortcut.is_some_and(|s| s.matches(text, modifiers)))
            .map(|item| item.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary() -> ShortcutModifiers {
        if cfg!(target_os = "macos") {
            ShortcutModifiers { meta: true, ..Default::default() }
        } else {
            ShortcutModifiers { ctrl: true, ..Default::default() }
        }
    }

    #[test]
    fn standard_menu_has_single_quit_item() {
        let menu = AppMenu::standard("quad-demo");
        assert_eq!(menu.title, "quad-demo");
        assert_eq!(menu.items.len(), 1);
        assert_eq!(menu.items[0].title, "Quit quad-demo");
        assert_eq!(menu.items[0].action, MenuAction::Quit);
    }

    #[test]
    fn primary_q_quits() {
        let menu = AppMenu::standard("demo");
        assert_eq!(menu.action_for("q", primary()), Some(MenuAction::Quit));
        assert_eq!(menu.action_for("Q", primary()), Some(MenuAction::Quit));
    }

    #[test]
    fn plain_or_other_keys_do_nothing() {
        let menu = AppMenu::standard("demo");
        assert_eq!(menu.action_for("q", ShortcutModifiers::default()), None);
        assert_eq!(menu.action_for("w", primary()), None);
        assert_eq!(menu.action_for("qq", primary()), None);
        assert_eq!(menu.action_for("", primary()), None);
    }

    #[test]
    fn extra_modifiers_do_not_match() {
        let menu = AppMenu::standard("demo");
        let with_shift = ShortcutModifiers { shift: true, ..primary() };
        let with_alt = ShortcutModifiers { alt: true, ..primary() };
        assert_eq!(menu.action_for("q", with_shift), None);
        assert_eq!(menu.action_for("q", with_alt), None);
    }

    #[test]
    fn shortcut_display_names_platform_modifier() {
        let text = Shortcut::primary('q').to_string();
        assert!(text == "Cmd+Q" || text == "Ctrl+Q");
    }
}
