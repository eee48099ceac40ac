// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Utility modules
//!
//! Terminal helpers shared by the CLI commands.

pub mod colors;
pub mod spinner;

pub use colors::*;
pub use spinner::*;
