//! Menu screens and the game over name entry

use crate::highscores::{HighScores, TOP_N};

/// Longest name accepted for a high score
const MAX_NAME_LEN: usize = 12;

/// Menu screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuScreen {
    Main,
    HighScores,
}

/// Menu state
#[derive(Debug, Clone)]
pub struct Menu {
    pub screen: MenuScreen,
    pub selected: usize,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub item_type: MenuItemType,
}

#[derive(Debug, Clone)]
pub enum MenuItemType {
    /// Simple button that triggers an action
    Button(MenuAction),
    /// Display-only label (not selectable)
    Label { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    GoToScreen(MenuScreen),
    Back,
    Quit,
}

impl Menu {
    pub fn new() -> Self {
        Self::main_menu()
    }

    pub fn main_menu() -> Self {
        Self {
            screen: MenuScreen::Main,
            selected: 0,
            items: vec![
                button("Play", MenuAction::Play),
                button("High Scores", MenuAction::GoToScreen(MenuScreen::HighScores)),
                button("Quit", MenuAction::Quit),
            ],
        }
    }

    pub fn high_scores(scores: &HighScores) -> Self {
        let mut items: Vec<MenuItem> = scores
            .top(TOP_N)
            .iter()
            .enumerate()
            .map(|(i, entry)| MenuItem {
                label: format!("{}. {}", i + 1, entry.name),
                item_type: MenuItemType::Label {
                    text: format!("{} (Lv {}, {} lines)", entry.score, entry.level, entry.lines),
                },
            })
            .collect();

        if items.is_empty() {
            items.push(MenuItem {
                label: "No scores yet".to_string(),
                item_type: MenuItemType::Label {
                    text: String::new(),
                },
            });
        }
        items.push(button("Back", MenuAction::Back));

        Self {
            screen: MenuScreen::HighScores,
            selected: items.len() - 1,
            items,
        }
    }

    fn is_selectable(&self, idx: usize) -> bool {
        matches!(
            self.items.get(idx).map(|item| &item.item_type),
            Some(MenuItemType::Button(_))
        )
    }

    pub fn move_up(&mut self) {
        let len = self.items.len();
        for step in 1..=len {
            let idx = (self.selected + len - step) % len;
            if self.is_selectable(idx) {
                self.selected = idx;
                return;
            }
        }
    }

    pub fn move_down(&mut self) {
        let len = self.items.len();
        for step in 1..=len {
            let idx = (self.selected + step) % len;
            if self.is_selectable(idx) {
                self.selected = idx;
                return;
            }
        }
    }

    pub fn select(&self) -> Option<&MenuAction> {
        match self.items.get(self.selected).map(|item| &item.item_type) {
            Some(MenuItemType::Button(action)) => Some(action),
            _ => None,
        }
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

fn button(label: &str, action: MenuAction) -> MenuItem {
    MenuItem {
        label: label.to_string(),
        item_type: MenuItemType::Button(action),
    }
}

/// Name typed on the game over screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub value: String,
}

impl NameEntry {
    pub fn new(initial: &str) -> Self {
        let mut entry = Self {
            value: String::new(),
        };
        initial.chars().for_each(|c| entry.push(c));
        entry
    }

    /// Printable characters only, commas excluded so the CSV stays intact
    pub fn push(&mut self, c: char) {
        if c.is_control() || c == ',' || self.value.chars().count() >= MAX_NAME_LEN {
            return;
        }
        self.value.push(c);
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    /// Name to record, falling back when left blank
    pub fn finish(&self) -> String {
        let name = self.value.trim();
        if name.is_empty() {
            "Player".to_string()
        } else {
            name.to_string()
        }
    }
}
