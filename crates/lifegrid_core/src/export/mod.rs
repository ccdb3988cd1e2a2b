//! Document exports of simulation state.

pub mod ics;
