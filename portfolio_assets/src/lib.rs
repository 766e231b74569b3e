//! Static assets embedded at compile time.
//!
//! Every file below `assets/` is exposed as a constant named after the file,
//! directories become modules (e.g. `templates::CONTACT_MESSAGE_HTML`).

include!(env!("ASSETS"));
