//! Utility functions for the application.

/// UI utilities.
pub mod ui {
    use crate::structs::errors::DisplayError;
    use crossterm::{
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use ratatui::{backend::CrosstermBackend, Terminal};

    /// Set up the terminal for the UI.
    ///
    /// - Enable raw mode
    /// - Enter alternate screen
    ///
    /// Returns a `Terminal` instance.
    pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>, DisplayError> {
        enable_raw_mode()?;

        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(terminal)
    }

    /// Clean up the terminal.
    ///
    /// - Disable raw mode
    /// - Leave alternate screen
    ///
    /// This should be called when exiting the UI, even in case of errors.
    pub fn cleanup_terminal(
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<(), DisplayError> {
        disable_raw_mode()?;

        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

        terminal.show_cursor()?;

        Ok(())
    }
}
