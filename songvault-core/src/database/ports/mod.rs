//! Repository ports (interfaces). Implementations live under
//! `database::infrastructure`.

pub mod songs;
