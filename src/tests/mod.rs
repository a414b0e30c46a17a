//! rinex-examiner integrated tests
pub mod toolkit;

mod obs;
mod parsing;
