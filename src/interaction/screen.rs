//! Operator-facing screens of the 16x2 display.

use crate::app::ports::OperatorPort;

/// Width of one display row.
pub const LCD_COLUMNS: usize = 16;

/// Every message the HMI shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    WelcomeDetail,
    CreatePassword,
    EnterNewPassword,
    ReEnterPassword,
    PasswordSet,
    ProvisionMismatch,
    MainMenu,
    InvalidOption,
    EnterPassword,
    IncorrectPassword,
    DoorUnlocking,
    WaitForEntry,
    DoorLocking,
    SystemLocked,
}

impl Screen {
    /// The two rows, each at most [`LCD_COLUMNS`] wide.
    pub const fn rows(self) -> (&'static str, &'static str) {
        match self {
            Self::Welcome => ("Smart Door", "locking system"),
            Self::WelcomeDetail => ("Keypad + PIR", "two-ECU lock"),
            Self::CreatePassword => ("Create pass :)", ""),
            Self::EnterNewPassword => ("Plz enter pass:", ""),
            Self::ReEnterPassword => ("Plz re-enter", "same pass:"),
            Self::PasswordSet => ("Password Set!", ""),
            Self::ProvisionMismatch => ("Mismatch!", "Try Again"),
            Self::MainMenu => ("(+) Open Door", "(-) Change Pass"),
            Self::InvalidOption => ("Invalid Option", ""),
            Self::EnterPassword => ("Enter Password:", ""),
            Self::IncorrectPassword => ("Incorrect Pass!", ""),
            Self::DoorUnlocking => ("Door is", "Unlocking..."),
            Self::WaitForEntry => ("Wait for people", "to enter"),
            Self::DoorLocking => ("Door is", "locking..."),
            Self::SystemLocked => ("System Locked!", ""),
        }
    }

    /// Clear the display and draw both rows.  The entry cursor is left on
    /// the second row.
    pub fn show<O: OperatorPort + ?Sized>(self, operator: &mut O) {
        let (top, bottom) = self.rows();
        operator.clear_screen();
        operator.display(0, top);
        operator.display(1, bottom);
    }
}
