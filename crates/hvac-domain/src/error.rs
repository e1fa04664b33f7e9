// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Actuator-side validation errors.
//!
//! These map to 4.xx-class responses at whichever protocol surface
//! (HTTP, CoAP) ends up carrying the rejection; the mapping itself lives
//! at that surface, not here.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActuatorError {
    #[error("actuator '{0}' is not operational")]
    NotOperational(String),

    #[error("invalid command key '{0}'")]
    InvalidCommand(String),

    #[error("invalid status '{0}', must be ON or OFF")]
    InvalidStatus(String),

    #[error("{field} must be between {lo} and {hi}, got {value}")]
    InvalidRange {
        field: &'static str,
        value: i64,
        lo: i64,
        hi: i64,
    },

    #[error("cannot set {0} while actuator is OFF")]
    MagnitudeWhileOff(&'static str),
}
