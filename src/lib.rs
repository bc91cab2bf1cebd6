//! `lindup` finds the lines that occur in more than one of its input files,
//! then keeps a single copy of each: the copy in the file the user chooses to
//! preserve.
//!
//! The kernel is two pure steps. The `index` module maps every distinct
//! non-empty line to the set of files containing it, and the `partition`
//! module turns that index, the preserved file, and a `Policy` into the lines
//! to delete and the lines to add. The `rewrite` module carries the result out
//! on disk, and the `run` module drives the whole dialogue with the user.
//!
//! Current Limitations:
//! * Every file is read into memory in its entirety.
//! * A "line" is zero or more non-newline bytes followed by a newline (or the
//!   end of the file). UTF-16 files are translated to UTF-8 when read, so a
//!   rewritten UTF-16 file comes out as UTF-8.

#![cfg_attr(debug_assertions, allow(dead_code, unused_imports))]
#![deny(unused_must_use)]
#![deny(clippy::all)]
#![allow(clippy::needless_return)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![warn(missing_docs)]

pub mod args;
pub mod fingerprint;
pub mod index;
pub mod logging;
pub mod operands;
pub mod partition;
pub mod prompt;
pub mod rewrite;
pub mod run;
pub mod signal;
pub mod styles;
pub mod text;
