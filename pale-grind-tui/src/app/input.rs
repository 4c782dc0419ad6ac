// src/app/input.rs
use super::{
    navigation_helpers::{row_next, row_previous},
    state::{ActiveModal, App},
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;

// Main key event handler method on App
impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) -> Result<()> {
        // Handle based on active modal first
        if self.active_modal != ActiveModal::None {
            self.handle_modal_input(key);
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.active_modal = ActiveModal::Help,
            KeyCode::Char('R') => self.active_modal = ActiveModal::ConfirmReset,
            KeyCode::Char('s') => self.share(),
            KeyCode::Char(' ') => self.toggle_workout(now),

            // Accordion
            KeyCode::Char('k') | KeyCode::Up => row_previous(self),
            KeyCode::Char('j') | KeyCode::Down => row_next(self),
            KeyCode::Enter => self.activate_selected(now)?,

            // Selected exercise
            KeyCode::Char('c' | 'x') => self.toggle_complete_selected(now)?,
            KeyCode::Char('l' | '+' | '=') | KeyCode::Right => self.step_set(true)?,
            KeyCode::Char('h' | '-') | KeyCode::Left => self.step_set(false)?,
            KeyCode::Char('t') => self.tip_key(),
            KeyCode::Esc => self.dismiss_tip(),
            KeyCode::PageDown => self.scroll_tip(true),
            KeyCode::PageUp => self.scroll_tip(false),

            // Rest
            KeyCode::Char('b') => self.start_default_rest(now),
            KeyCode::Char(c @ '1'..='9') => {
                let slot = c as usize - '1' as usize;
                self.start_rest_preset(slot, now);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_modal_input(&mut self, key: KeyEvent) {
        match self.active_modal {
            ActiveModal::Help => match key.code {
                KeyCode::Esc | KeyCode::Char('q' | '?') | KeyCode::Enter => {
                    self.active_modal = ActiveModal::None;
                }
                _ => {} // Ignore other keys in help
            },
            ActiveModal::ConfirmReset => match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
                    self.active_modal = ActiveModal::None;
                    self.reset_all();
                }
                KeyCode::Char('n' | 'N' | 'q') | KeyCode::Esc => {
                    self.active_modal = ActiveModal::None;
                }
                _ => {}
            },
            ActiveModal::None => {}
        }
    }
}
