//! Preference rows and the patron screen.

pub mod patron;
pub mod switch;

pub use patron::{
    AccountState, PATREON_URL, PatronAccount, PatronOutputs, PatronService, PatronViewModel,
};
pub use switch::{SwitchRow, switch_rows};
