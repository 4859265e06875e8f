// Copyright 2026 Pagelift Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pagelift — fetch one rendered page through headless Chromium and pull the
//! ordered image list out of its content container.
//!
//! The pipeline is acquire → navigate → extract → release: a browser session
//! is launched for the invocation, the page is loaded with a spoofed identity
//! header until the network settles, an in-page script collects the container
//! images, and the session is torn down on every exit path. Every failure is
//! folded into a single outcome shape for the boundary adapters (CLI, REST).

pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod rest;
