//! Configuration section definitions.
//!
//! Each module corresponds to a section in `linkhint.toml`:
//!
//! | Module  | TOML Section | Purpose                                  |
//! |---------|--------------|------------------------------------------|
//! | `hints` | `[hints]`    | rel/as, include policy, filters, rules   |

mod hints;

pub use hints::{AsRule, HintsConfig, HintsFields, IncludeSetting, RelRule};
